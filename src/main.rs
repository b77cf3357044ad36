//! xattr-tags command-line entry point

use anyhow::Result;
use clap::Parser;
use xattr_tags::cli::Args;
use xattr_tags::commands;

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    // Library crates log through `log`; fmt().init() forwards those records too
    tracing_subscriber::fmt()
        .with_max_level(args.output.log_level())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Running {:?}", args.command);

    let mut out = std::io::stdout().lock();
    commands::run(&args.command, &mut out)
}
