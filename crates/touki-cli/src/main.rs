mod cli;
mod fragments_cmd;
mod page_range;
mod records_cmd;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Text {
            ref file,
            ref format,
            ref unicode_norm,
        } => text_cmd::run(
            file,
            format,
            unicode_norm.as_ref().map(|n| n.to_unicode_norm()),
        ),
        cli::Commands::Fragments {
            ref file,
            ref pages,
            ref format,
            ref unicode_norm,
        } => fragments_cmd::run(
            file,
            pages.as_deref(),
            format,
            unicode_norm.as_ref().map(|n| n.to_unicode_norm()),
        ),
        cli::Commands::Records {
            ref files,
            ref format,
            jobs,
            max_file_size,
        } => records_cmd::run(files, format, jobs, max_file_size),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
