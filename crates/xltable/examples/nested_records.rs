//! Example: flatten nested records into a worksheet table definition

use serde_json::json;
use xltable::prelude::*;

fn main() -> Result<()> {
    let records = vec![
        json!({
            "alpha": {
                "quebec": true,
                "papa": {
                    "romeo": "Alabama",
                    "sierra": "Georgia"
                }
            },
            "bravo": 2,
            "charlie": 3
        }),
        json!({
            "alpha": null,
            "bravo": 5,
            "charlie": 6
        }),
    ];

    let spec = ColumnSpec::new()
        .path("quebec", "alpha.quebec")
        .path("romeo", "alpha.papa.romeo")
        .path("sierra", "alpha.papa.sierra")
        .implicit("bravo")
        .implicit("charlie")
        .formula("delta", "=AVERAGE({bravo}, {charlie})");

    let options = TableOptions::new()
        .set_name("Table1")
        .set_style("Table Style Light 15")
        .set_total_row(true);

    let table = ExcelTable::with_options(&records, &spec, options)?;

    let (first_row, first_col, last_row, last_col) = table.coordinates();
    println!("Table spans {} ({first_row}, {first_col}, {last_row}, {last_col})", table.range());

    for column in table.columns() {
        match &column.formula {
            Some(formula) => println!("  column {:<8} formula {}", column.header, formula),
            None => println!("  column {}", column.header),
        }
    }

    for (index, row) in table.data().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        println!("  row {}: [{}]", index + 1, cells.join(", "));
    }

    println!("Done");
    Ok(())
}
