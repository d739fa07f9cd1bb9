use crate::error::ReportError;
use crate::Variant;
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "Data";
pub const GA_STATS_CSV: &str = "ga_stats.csv";
pub const OPTIMAL_CSV: &str = "optimal.csv";

/// The two input tables of a run, resolved from the program location.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub ga_stats: PathBuf,
    pub optimal: PathBuf,
}

impl InputPaths {
    /// inputs live in the `Data` directory one level above the program,
    /// no I/O is done here
    pub fn from_program_dir(dir: &Path) -> InputPaths {
        let data_dir = dir.join("..").join(DATA_DIR);
        InputPaths {
            ga_stats: data_dir.join(GA_STATS_CSV),
            optimal: data_dir.join(OPTIMAL_CSV),
        }
    }
}

/// Directory holding the running executable,
/// independent of the caller's working directory.
pub fn program_dir() -> Result<PathBuf, ReportError> {
    let exe = std::env::current_exe().map_err(ReportError::ProgramLocation)?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(ReportError::ProgramLocation(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))),
    }
}

/// image file sibling to the program
pub fn output_path(dir: &Path, variant: Variant) -> PathBuf {
    dir.join(variant.output_file_name())
}
