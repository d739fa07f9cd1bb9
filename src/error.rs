use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a report run.
/// The optional reference table never produces one of these,
/// see `load::ReferenceValue`.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not locate the running program: {0}")]
    ProgramLocation(#[source] std::io::Error),

    #[error("{} not found", .0.display())]
    MissingRequiredInput(PathBuf),

    #[error("could not read {} as csv: {source}", .path.display())]
    UnreadableRequiredInput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing column(s) {}", .missing.join(", "))]
    StructuralMismatch { missing: Vec<String> },

    #[error("invalid value on line {line}: {message}")]
    InvalidValue { line: u64, message: String },

    #[error("no generations to plot")]
    EmptySeries,

    #[error("could not write {}: {message}", .path.display())]
    OutputWriteFailure { path: PathBuf, message: String },
}
