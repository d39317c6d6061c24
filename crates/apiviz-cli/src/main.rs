//! APIviz CLI - Graphviz class and package diagrams from API documentation

mod cli;
mod graphviz;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized inside run() once the CLI flags are known
    let mut app = cli::ApivizApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
