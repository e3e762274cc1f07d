use anyhow::Context;
use clap::Parser;

use jsonsearch_cli::{init_tracing, render_results, run, Cli};
use jsonsearch_core::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("loading configuration")?;
    let settings = cli.apply(config.settings().context("loading configuration")?)?;
    let results = run(&cli.query, &settings)?;
    println!("{}", render_results(&results)?);
    Ok(())
}
