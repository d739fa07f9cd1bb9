use super::{Variant, VERSION};
use clap::{App, ArgMatches};

/// The report apps take no arguments,
/// clap still provides the `--help` and `--version` flags.
pub fn parse_cli(variant: Variant) -> ArgMatches<'static> {
    cli_app(variant).get_matches()
}

fn cli_app(variant: Variant) -> App<'static, 'static> {
    App::new(variant.bin_name())
        .version(VERSION.unwrap_or("unknown"))
        .about(variant.about())
}

/// Installs the stderr logger for diagnostics,
/// `RUST_LOG` selects the level and defaults to warnings.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_are_accepted() {
        let app = cli_app(Variant::Analysis);
        assert!(app.get_matches_from_safe(vec!["ga_analysis"]).is_ok());
        let app = cli_app(Variant::Analysis);
        assert!(app
            .get_matches_from_safe(vec!["ga_analysis", "--data", "x"])
            .is_err());
    }
}
