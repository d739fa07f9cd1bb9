use chrono::prelude::*;
use std::path::{Path, PathBuf};
pub mod chart;
pub mod cli;
pub mod emit;
pub mod error;
pub mod load;
pub mod locate;
pub mod series;

pub use error::ReportError;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The two reports drawn from the same run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// best cost per generation against the optimal cost
    Convergence,
    /// cost, diversity and temperature panels
    Analysis,
}

impl Variant {
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Variant::Convergence => &["Generation", "Cost"],
            Variant::Analysis => &[
                "Generation",
                "AvgCost",
                "BestCost",
                "StdDev",
                "Temperature",
            ],
        }
    }

    pub fn output_file_name(&self) -> &'static str {
        match self {
            Variant::Convergence => "convergence_report.png",
            Variant::Analysis => "ga_analysis_report.png",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variant::Convergence => "GA Convergence Analysis",
            Variant::Analysis => "GA Performance Analysis",
        }
    }

    /// pixels, width by height
    pub fn figure_size(&self) -> (u32, u32) {
        match self {
            Variant::Convergence => (1000, 600),
            Variant::Analysis => (1000, 1200),
        }
    }

    pub fn bin_name(&self) -> &'static str {
        match self {
            Variant::Convergence => "ga_convergence",
            Variant::Analysis => "ga_analysis",
        }
    }

    pub fn about(&self) -> &'static str {
        match self {
            Variant::Convergence => {
                "cli app to plot the GA best cost per generation against the optimal cost"
            }
            Variant::Analysis => {
                "cli app to plot GA cost convergence, population diversity and temperature"
            }
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub output: PathBuf,
    pub reference: load::ReferenceValue,
    pub display: emit::DisplayOutcome,
}

/// Locate, load, derive, compose, save and display, in this order.
/// Only a missing or unreadable run table and a failed save stop the run,
/// the optimal cost is dropped on any problem.
pub fn run(variant: Variant, program_dir: &Path) -> Result<Report, ReportError> {
    let (output, reference) = render_report(variant, program_dir)?;
    let display = emit::display(&output);
    if let emit::DisplayOutcome::Failed(e) = &display {
        tracing::warn!("could not display {}: {}", output.display(), e);
    }
    Ok(Report {
        output,
        reference,
        display,
    })
}

/// everything but the display, which is left to the caller
pub fn render_report(
    variant: Variant,
    program_dir: &Path,
) -> Result<(PathBuf, load::ReferenceValue), ReportError> {
    let inputs = locate::InputPaths::from_program_dir(program_dir);
    tracing::debug!("inputs: {:?}", inputs);
    let table = load::RunTable::from_path(&inputs.ga_stats)?;
    let reference = load::load_reference(&inputs.optimal);
    println!("{}", reference.status_line());
    if let load::ReferenceValue::Unreadable(e) = &reference {
        tracing::warn!("ignoring {}: {}", inputs.optimal.display(), e);
    }
    let series = series::Series::derive(&table, variant)?;
    let figure = chart::compose(&series, reference.value());
    let fout = locate::output_path(program_dir, variant);
    emit::save_png(&figure, &fout)?;
    println!(
        "{} report saved to {}",
        Local::now().format(DT_FORMAT),
        fout.display()
    );
    Ok((fout, reference))
}

/// min and max of a slice, skipping NAN and infinities, None if nothing is left
pub fn min_and_max(s: &[f64]) -> Option<(f64, f64)> {
    let mut values = s.iter().copied().filter(|v| v.is_finite());
    let first = values.next()?;
    let (mut min, mut max) = (first, first);
    for v in values {
        if v > max {
            max = v
        }
        if v < min {
            min = v
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_skips_non_finite() {
        assert_eq!(min_and_max(&[3., f64::NAN, -1., 7.]), Some((-1., 7.)));
        assert_eq!(min_and_max(&[f64::NAN]), None);
        assert_eq!(min_and_max(&[2., f64::INFINITY, f64::NEG_INFINITY]), Some((2., 2.)));
        assert_eq!(min_and_max(&[]), None);
    }

    #[test]
    fn variants_differ_in_output_name() {
        assert_ne!(
            Variant::Convergence.output_file_name(),
            Variant::Analysis.output_file_name()
        );
        assert_eq!(Variant::Convergence.required_columns()[0], "Generation");
        assert_eq!(Variant::Analysis.required_columns()[0], "Generation");
    }
}
