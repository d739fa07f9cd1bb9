use crate::chart::{render, Figure};
use crate::error::ReportError;
use plotters::prelude::*;
use std::path::Path;
use std::process::{Command, Stdio};

/// renders the figure to png at `fout`, overwriting any previous report
pub fn save_png(figure: &Figure, fout: &Path) -> Result<(), ReportError> {
    let root = BitMapBackend::new(fout, figure.size).into_drawing_area();
    render(figure, &root).map_err(|e| ReportError::OutputWriteFailure {
        path: fout.to_path_buf(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOutcome {
    Opened,
    Skipped(String),
    Failed(String),
}

/// Shows a saved report with the platform's default viewer.
/// Best effort: nothing here can fail the run.
pub fn display(path: &Path) -> DisplayOutcome {
    if cfg!(target_os = "linux") && !has_display() {
        return DisplayOutcome::Skipped("no graphical session".to_string());
    }
    let mut cmd = viewer_command(path);
    let outcome = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => DisplayOutcome::Opened,
        Ok(status) => DisplayOutcome::Failed(format!("viewer exited with {}", status)),
        Err(e) => DisplayOutcome::Failed(e.to_string()),
    };
    tracing::debug!("display of {}: {:?}", path.display(), outcome);
    outcome
}

fn has_display() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|v| std::env::var_os(v).map_or(false, |s| !s.is_empty()))
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg("start").arg("").arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::compose;
    use crate::series::{ConvergenceSeries, Series};

    fn figure() -> Figure {
        let series = Series::Convergence(ConvergenceSeries {
            generation: vec![0, 1, 2],
            cost: vec![100., 80., 80.],
        });
        compose(&series, Some(75.))
    }

    #[test]
    fn viewer_gets_the_report_path() {
        let cmd = viewer_command(Path::new("/tmp/convergence_report.png"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().unwrap(), &"/tmp/convergence_report.png");
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("missing_dir").join("convergence_report.png");
        let err = save_png(&figure(), &fout).unwrap_err();
        assert!(matches!(err, ReportError::OutputWriteFailure { .. }));
    }

    #[test]
    fn save_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("convergence_report.png");
        std::fs::write(&fout, b"stale").unwrap();
        save_png(&figure(), &fout).unwrap();
        let first = std::fs::read(&fout).unwrap();
        assert_ne!(first, b"stale");
        save_png(&figure(), &fout).unwrap();
        assert_eq!(std::fs::read(&fout).unwrap(), first);
    }
}
