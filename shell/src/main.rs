//! Terminal shell for the personas registry.
//!
//! Registers the registry list as the only route, loads the first page on
//! start and reads line commands from stdin (`help` lists them).

mod app;
mod command;
mod render;
mod transport;

use std::io::{self, BufRead, Write};

use clap::Parser;
use personas_core::{FilterMode, PersonasScreen, ScreenConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use tracing::info;

use crate::app::{Flow, Shell};
use crate::command::Command;
use crate::transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "personas")]
#[command(about = "Browse and edit the personas registry")]
struct Args {
    /// Registry endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Records requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Trailing fraction of rows that triggers the next page
    #[arg(long, default_value_t = 0.1)]
    end_threshold: f32,

    /// Show records that pass every enabled filter instead of only the
    /// most recently enabled one
    #[arg(long)]
    conjunctive_filters: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> ScreenConfig {
        ScreenConfig {
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            end_threshold: self.end_threshold,
            filter_mode: if self.conjunctive_filters {
                FilterMode::Conjunctive
            } else {
                FilterMode::Exclusive
            },
        }
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("personas_core=debug,personas=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(args.verbose);
    info!(base_url = %args.base_url, page_size = args.page_size, "starting");

    let mut shell = Shell::new(PersonasScreen::new(args.config()), UreqTransport::new());
    println!("{}", shell.mount());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        match Command::parse(&line?) {
            Ok(command) => match shell.apply(command) {
                Flow::Continue(out) => println!("{out}"),
                Flow::Quit => break,
            },
            Err(err) => eprintln!("{err}"),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}
