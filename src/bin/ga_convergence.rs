use ga_report::cli::{init_logging, parse_cli};
use ga_report::locate::program_dir;
use ga_report::{run, Variant};

fn main() {
    init_logging();
    parse_cli(Variant::Convergence);
    let report = program_dir().and_then(|dir| run(Variant::Convergence, &dir));
    if let Err(e) = report {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
