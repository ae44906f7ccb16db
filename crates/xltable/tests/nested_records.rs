//! End-to-end table building over heterogeneous nested records

use pretty_assertions::assert_eq;
use serde_json::json;
use xltable::prelude::*;

fn records() -> Vec<Record> {
    vec![
        json!({
            "alpha": {
                "quebec": true,
                "papa": {"romeo": "Alabama", "sierra": "Georgia"}
            },
            "bravo": 2,
            "charlie": 3
        }),
        json!({"alpha": null, "bravo": 5, "charlie": 6}),
    ]
}

fn spec() -> ColumnSpec {
    ColumnSpec::new()
        .path("quebec", "alpha.quebec")
        .path("romeo", "alpha.papa.romeo")
        .path("sierra", "alpha.papa.sierra")
        .implicit("bravo")
        .implicit("charlie")
        .formula("delta", "=AVERAGE({bravo}, {charlie})")
}

/// The nested dataset with a null parent in the second record
#[test]
fn test_nested_dataset() {
    let options = TableOptions::new()
        .set_name("Table1")
        .set_style("Table Style Light 15")
        .set_total_row(true);
    let table = ExcelTable::with_options(&records(), &spec(), options).unwrap();

    assert_eq!(
        table.data()[0],
        vec![
            CellValue::Boolean(true),
            CellValue::string("Alabama"),
            CellValue::string("Georgia"),
            CellValue::Number(2.0),
            CellValue::Number(3.0),
            CellValue::formula("=AVERAGE(D2, E2)"),
        ]
    );
    assert_eq!(
        table.data()[1],
        vec![
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Number(5.0),
            CellValue::Number(6.0),
            CellValue::formula("=AVERAGE(D3, E3)"),
        ]
    );

    let headers: Vec<_> = table.columns().iter().map(|c| c.header.as_str()).collect();
    assert_eq!(headers, ["quebec", "romeo", "sierra", "bravo", "charlie", "delta"]);

    // header + 2 records + total row, 6 columns
    assert_eq!(table.coordinates(), (0, 0, 3, 5));
    assert_eq!(table.range().to_string(), "A1:F4");
}

#[test]
fn test_coordinates_without_total_row() {
    let records = vec![json!({}), json!({}), json!({})];
    let spec = ColumnSpec::new()
        .implicit("a")
        .implicit("b")
        .implicit("c")
        .implicit("d")
        .implicit("e");

    let table = ExcelTable::new(&records, &spec).unwrap();
    assert_eq!(table.coordinates(), (0, 0, 3, 4));

    let options = TableOptions::new().set_total_row(true);
    let table = ExcelTable::with_options(&records, &spec, options).unwrap();
    assert_eq!(table.coordinates(), (0, 0, 4, 4));
}

#[test]
fn test_header_only_table() {
    let table = ExcelTable::new(&[], &spec()).unwrap();
    assert!(table.data().is_empty());
    assert_eq!(table.column_count(), 6);
    assert_eq!(table.coordinates(), (0, 0, 0, 5));
}

#[test]
fn test_formula_references_later_column() {
    let records = vec![json!({"price": 4, "qty": 3})];
    let spec = ColumnSpec::new()
        .formula("total", "={price}*{qty}")
        .implicit("price")
        .implicit("qty");

    let table = ExcelTable::new(&records, &spec).unwrap();
    assert_eq!(table.data()[0][0], CellValue::formula("=B2*C2"));
    let total = &table.columns()[0];
    assert_eq!(total.header, "total");
    assert_eq!(total.formula.as_deref(), Some("=[@price]*[@qty]"));
    assert_eq!(total.total_function, None);
}

#[test]
fn test_function_accessor_sees_whole_record() {
    let records = records();
    let spec = ColumnSpec::new().function("state_count", |record: &Record| {
        record
            .pointer("/alpha/papa")
            .and_then(|papa| papa.as_object())
            .map_or(0, |papa| papa.len() as i64)
    });

    let table = ExcelTable::new(&records, &spec).unwrap();
    assert_eq!(table.data()[0][0], CellValue::Number(2.0));
    assert_eq!(table.data()[1][0], CellValue::Number(0.0));
}

#[test]
fn test_records_are_not_mutated() {
    let records = records();
    let before = records.clone();
    let _ = ExcelTable::new(&records, &spec()).unwrap();
    assert_eq!(records, before);
}

#[test]
fn test_definition_from_config() {
    let config = TableConfig::from_json_str(
        r#"{
            "name": "Table1",
            "style": "Table Style Light 15",
            "total_row": true,
            "columns": {
                "quebec": "alpha.quebec",
                "romeo": "alpha.papa.romeo",
                "sierra": "alpha.papa.sierra",
                "bravo": null,
                "charlie": null,
                "delta": {"formula": "=AVERAGE({bravo}, {charlie})"}
            }
        }"#,
    )
    .unwrap();

    let table = config.build(&records()).unwrap();
    assert_eq!(table, ExcelTable::with_options(
        &records(),
        &spec(),
        TableOptions::new()
            .set_name("Table1")
            .set_style("Table Style Light 15")
            .set_total_row(true),
    )
    .unwrap());

    let json = serde_json::to_value(table.definition()).unwrap();
    assert_eq!(json["coordinates"], json!([0, 0, 3, 5]));
    assert_eq!(
        json["options"]["data"][1],
        json!([null, null, null, 5.0, 6.0, "=AVERAGE(D3, E3)"])
    );
}
