//! Input normalization: raw tabular payload → typed, sorted billing records.

mod dates;
pub mod reader;

pub use dates::parse_date;

use crate::error::{DetectError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_COLUMN: &str = "date";
pub const SERVICE_COLUMN: &str = "service";
pub const COST_COLUMN: &str = "cost";

/// A single untyped cell as delivered by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Column names plus rows of cells, in upload order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One billing observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub service: String,
    pub cost: f64,
}

impl Record {
    pub fn new(date: NaiveDate, service: impl Into<String>, cost: f64) -> Self {
        Self {
            date,
            service: service.into(),
            cost,
        }
    }
}

/// Records ordered by (service, date) ascending; ties keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(mut records: Vec<Record>) -> Self {
        // Vec::sort_by is stable
        records.sort_by(|a, b| a.service.cmp(&b.service).then(a.date.cmp(&b.date)));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_inner(self) -> Vec<Record> {
        self.records
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

struct ColumnIndex {
    date: usize,
    service: usize,
    cost: usize,
}

fn resolve_columns(columns: &[String]) -> Result<ColumnIndex> {
    let (mut date, mut service, mut cost) = (None, None, None);
    // Later duplicates win, as with a name → column map.
    for (i, name) in columns.iter().enumerate() {
        match name.trim().to_lowercase().as_str() {
            DATE_COLUMN => date = Some(i),
            SERVICE_COLUMN => service = Some(i),
            COST_COLUMN => cost = Some(i),
            _ => {}
        }
    }
    match (date, service, cost) {
        (Some(date), Some(service), Some(cost)) => Ok(ColumnIndex {
            date,
            service,
            cost,
        }),
        _ => {
            let missing = [(DATE_COLUMN, date), (SERVICE_COLUMN, service), (COST_COLUMN, cost)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            Err(DetectError::Schema { missing })
        }
    }
}

static MISSING: RawValue = RawValue::Null;

/// Short rows read as missing trailing cells.
fn cell(row: &[RawValue], i: usize) -> &RawValue {
    row.get(i).unwrap_or(&MISSING)
}

fn parse_error(column: &'static str, row: usize, value: &RawValue) -> DetectError {
    let value = match value {
        RawValue::Null => "null".to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => s.clone(),
    };
    DetectError::Parse { column, row, value }
}

fn coerce_date(value: &RawValue, row: usize) -> Result<NaiveDate> {
    match value {
        RawValue::Text(s) => parse_date(s).ok_or_else(|| parse_error(DATE_COLUMN, row, value)),
        // JSON callers send compact dates as bare numbers: 20250108
        RawValue::Number(n) if n.fract() == 0.0 && (0.0..1e8).contains(n) => {
            parse_date(&format!("{:08}", *n as u32)).ok_or_else(|| parse_error(DATE_COLUMN, row, value))
        }
        _ => Err(parse_error(DATE_COLUMN, row, value)),
    }
}

fn coerce_service(value: &RawValue, row: usize) -> Result<String> {
    let service = match value {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Null => String::new(),
    };
    if service.is_empty() {
        return Err(parse_error(SERVICE_COLUMN, row, value));
    }
    Ok(service)
}

fn coerce_cost(value: &RawValue, row: usize) -> Result<f64> {
    let cost = match value {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Null => None,
    };
    match cost {
        Some(c) if !c.is_nan() => Ok(c),
        _ => Err(parse_error(COST_COLUMN, row, value)),
    }
}

/// Validate and canonicalize a raw payload. `row` in errors is the zero-based data row.
pub fn normalize(table: &RawTable) -> Result<RecordSet> {
    let cols = resolve_columns(&table.columns)?;

    // Columns are coerced one at a time so the first failing column is reported.
    let dates = table
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| coerce_date(cell(row, cols.date), r))
        .collect::<Result<Vec<_>>>()?;
    let services = table
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| coerce_service(cell(row, cols.service), r))
        .collect::<Result<Vec<_>>>()?;
    let costs = table
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| coerce_cost(cell(row, cols.cost), r))
        .collect::<Result<Vec<_>>>()?;

    let records: Vec<Record> = dates
        .into_iter()
        .zip(services)
        .zip(costs)
        .map(|((date, service), cost)| Record { date, service, cost })
        .collect();

    tracing::debug!(rows = records.len(), "normalized input");
    Ok(RecordSet::new(records))
}
