use std::path::PathBuf;

use clap::Parser;

mod host;

use host::logging::LogDestination;

#[derive(Parser)]
#[command(
    name = "transcript-search",
    about = "Search every page of a paginated chat transcript"
)]
pub struct Args {
    /// Address of any transcript page; may carry `#search=<query>`
    #[arg(long)]
    url: String,

    /// Number of `page-NNN.html` files next to the page
    #[arg(long)]
    pages: u32,

    /// Text to search for (overrides a `#search=` fragment)
    query: Option<String>,

    /// RON file overriding scan and fetch settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the results as a standalone HTML page
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Where log lines go
    #[arg(long, value_enum, default_value = "terminal")]
    log: LogDestination,

    /// Also log per-page and per-batch progress
    #[arg(short, long)]
    verbose: bool,

    /// Close the overlay afterwards and print the resulting address
    #[arg(long)]
    close: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    host::logging::initialize(args.log, args.verbose);
    host::app::run(args)
}
