use crate::error::ReportError;
use crate::load::RunTable;
use crate::Variant;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ConvergenceRow {
    #[serde(rename = "Generation")]
    generation: f64,
    #[serde(rename = "Cost")]
    cost: f64,
}

#[derive(Debug, Deserialize)]
struct AnalysisRow {
    #[serde(rename = "Generation")]
    generation: f64,
    #[serde(rename = "AvgCost")]
    avg_cost: f64,
    #[serde(rename = "BestCost")]
    best_cost: f64,
    #[serde(rename = "StdDev")]
    std_dev: f64,
    #[serde(rename = "Temperature")]
    temperature: f64,
}

/// One csv row of a run table, checked before it reaches the chart.
trait RunRow: DeserializeOwned {
    fn generation(&self) -> f64;
    /// every column the row carries, by header name
    fn values(&self) -> Vec<(&'static str, f64)>;
}

impl RunRow for ConvergenceRow {
    fn generation(&self) -> f64 {
        self.generation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("Generation", self.generation), ("Cost", self.cost)]
    }
}

impl RunRow for AnalysisRow {
    fn generation(&self) -> f64 {
        self.generation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Generation", self.generation),
            ("AvgCost", self.avg_cost),
            ("BestCost", self.best_cost),
            ("StdDev", self.std_dev),
            ("Temperature", self.temperature),
        ]
    }
}

/// Best cost per generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceSeries {
    pub generation: Vec<i64>,
    pub cost: Vec<f64>,
}

/// Per generation population statistics and annealing temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSeries {
    pub generation: Vec<i64>,
    pub avg_cost: Vec<f64>,
    pub best_cost: Vec<f64>,
    pub std_dev: Vec<f64>,
    pub temperature: Vec<f64>,
}

/// The columns consumed by one report variant, exactly as recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Convergence(ConvergenceSeries),
    Analysis(AnalysisSeries),
}

impl Series {
    /// Extract the variant's columns from the run table.
    /// All the missing columns are reported at once;
    /// rows are neither sorted nor filled.
    pub fn derive(table: &RunTable, variant: Variant) -> Result<Series, ReportError> {
        let missing: Vec<String> = variant
            .required_columns()
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::StructuralMismatch { missing });
        }
        if table.is_empty() {
            return Err(ReportError::EmptySeries);
        }
        let series = match variant {
            Variant::Convergence => {
                let rows: Vec<ConvergenceRow> = deserialize_rows(table)?;
                Series::Convergence(ConvergenceSeries {
                    generation: rows.iter().map(|r| r.generation as i64).collect(),
                    cost: rows.iter().map(|r| r.cost).collect(),
                })
            }
            Variant::Analysis => {
                let rows: Vec<AnalysisRow> = deserialize_rows(table)?;
                Series::Analysis(AnalysisSeries {
                    generation: rows.iter().map(|r| r.generation as i64).collect(),
                    avg_cost: rows.iter().map(|r| r.avg_cost).collect(),
                    best_cost: rows.iter().map(|r| r.best_cost).collect(),
                    std_dev: rows.iter().map(|r| r.std_dev).collect(),
                    temperature: rows.iter().map(|r| r.temperature).collect(),
                })
            }
        };
        tracing::debug!("derived {} generations for {:?}", series.len(), variant);
        Ok(series)
    }

    pub fn variant(&self) -> Variant {
        match self {
            Series::Convergence(_) => Variant::Convergence,
            Series::Analysis(_) => Variant::Analysis,
        }
    }

    /// the shared x values of every panel
    pub fn generation(&self) -> &[i64] {
        match self {
            Series::Convergence(s) => &s.generation,
            Series::Analysis(s) => &s.generation,
        }
    }

    pub fn len(&self) -> usize {
        self.generation().len()
    }

    pub fn is_empty(&self) -> bool {
        self.generation().is_empty()
    }
}

/// Deserializes every record, rejecting values the chart cannot place:
/// anything not finite, and generations that are not whole numbers
/// (`3.0` is accepted as generation 3).
fn deserialize_rows<T: RunRow>(table: &RunTable) -> Result<Vec<T>, ReportError> {
    table
        .records
        .iter()
        .map(|record| {
            // the header is line 1
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let invalid = |message: String| ReportError::InvalidValue { line, message };
            let row: T = record
                .deserialize(Some(&table.headers))
                .map_err(|e| invalid(e.to_string()))?;
            if let Some((column, v)) = row.values().into_iter().find(|(_, v)| !v.is_finite()) {
                return Err(invalid(format!("{} {} is not a finite number", column, v)));
            }
            let g = row.generation();
            if g.fract() != 0. || g.abs() > i64::MAX as f64 {
                return Err(invalid(format!("Generation {} is not a whole number", g)));
            }
            Ok(row)
        })
        .collect()
}
