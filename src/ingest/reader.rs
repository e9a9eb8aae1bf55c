//! CSV → [`RawTable`] adapter used by the binary. Every non-empty cell is kept as text;
//! typing is left to [`super::normalize`].

use super::{RawTable, RawValue};
use crate::error::Result;
use std::io::Read;

pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        RawValue::Null
                    } else {
                        RawValue::Text(cell.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(RawTable { columns, rows })
}
