use clap::Parser;
use journalyzer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
