use crate::error::ReportError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

pub const OPTIMAL_COST: &str = "OptimalCost";

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// The required run table as raw csv records, in file order.
/// Columns are only interpreted later, when the series are derived.
#[derive(Debug, Clone)]
pub struct RunTable {
    pub headers: csv::StringRecord,
    pub records: Vec<csv::StringRecord>,
}

impl RunTable {
    /// Load the required table.
    /// A missing file is reported before any attempt to open it,
    /// anything that stops the csv from being read is an unreadable input.
    pub fn from_path(path: &Path) -> Result<RunTable, ReportError> {
        if !path.exists() {
            return Err(ReportError::MissingRequiredInput(path.to_path_buf()));
        }
        let unreadable = |source| ReportError::UnreadableRequiredInput {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(|e| unreadable(csv::Error::from(e)))?;
        let table = RunTable::from_reader(file).map_err(unreadable)?;
        tracing::debug!(
            "read {} rows with columns {:?} from {}",
            table.records.len(),
            table.headers,
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RunTable, csv::Error> {
        let mut rdr = csv_reader(reader);
        let headers = rdr.headers()?.clone();
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        Ok(RunTable { headers, records })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of loading the optional reference table.
/// Every case but `Loaded` means the reference is absent;
/// the cases are kept apart only to report why.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    Loaded(f64),
    FileMissing,
    ColumnMissing,
    Empty,
    Unreadable(String),
}

impl ReferenceValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            ReferenceValue::Loaded(v) => Some(*v),
            _ => None,
        }
    }

    pub fn status_line(&self) -> String {
        match self {
            ReferenceValue::Loaded(v) => format!("optimal cost loaded: {}", v),
            ReferenceValue::FileMissing => {
                "optimal.csv not found, plotting without reference".to_string()
            }
            ReferenceValue::ColumnMissing => format!(
                "optimal.csv has no {} column, plotting without reference",
                OPTIMAL_COST
            ),
            ReferenceValue::Empty => "optimal.csv has no rows, plotting without reference".to_string(),
            ReferenceValue::Unreadable(e) => format!(
                "could not read optimal.csv ({}), plotting without reference",
                e
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    #[serde(rename = "OptimalCost")]
    optimal_cost: f64,
}

/// Reads the first `OptimalCost` value when the file exists.
/// Never fails, all problems end up as an absent reference.
pub fn load_reference(path: &Path) -> ReferenceValue {
    if !path.exists() {
        return ReferenceValue::FileMissing;
    }
    match std::fs::File::open(path) {
        Ok(file) => load_reference_from_reader(file),
        Err(e) => ReferenceValue::Unreadable(e.to_string()),
    }
}

pub fn load_reference_from_reader<R: Read>(reader: R) -> ReferenceValue {
    let mut rdr = csv_reader(reader);
    let has_column = match rdr.headers() {
        Ok(headers) => headers.iter().any(|h| h == OPTIMAL_COST),
        Err(e) => return ReferenceValue::Unreadable(e.to_string()),
    };
    if !has_column {
        return ReferenceValue::ColumnMissing;
    }
    match rdr.deserialize::<ReferenceRow>().next() {
        None => ReferenceValue::Empty,
        Some(Ok(row)) if row.optimal_cost.is_finite() => ReferenceValue::Loaded(row.optimal_cost),
        Some(Ok(row)) => ReferenceValue::Unreadable(format!(
            "{} is not a finite number",
            row.optimal_cost
        )),
        Some(Err(e)) => ReferenceValue::Unreadable(e.to_string()),
    }
}
