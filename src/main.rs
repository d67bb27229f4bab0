use clap::Parser;
use samcompare::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
