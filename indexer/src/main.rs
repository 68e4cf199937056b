use anyhow::Result;
use clap::Parser;
use std::io::{self, BufWriter, Write};
use tfidf_indexer::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let mut out = BufWriter::new(io::stdout().lock());
    run(&cli, &mut out)?;
    out.flush()?;
    Ok(())
}
