use std::env;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use rooftop::app::{App, RunOptions};
use rooftop::config::GameOptions;
use rooftop::logging;

/// Parses `--seed N`, `--cosmetic-seed N`, `--frames N` and `--realtime`.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<(GameOptions, RunOptions)> {
    let mut options = GameOptions::default();
    let mut run = RunOptions::default();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| anyhow!("Missing value for {}", name));
        match arg.as_str() {
            "--seed" => options.seed = value("--seed")?.parse().context("Invalid --seed")?,
            "--cosmetic-seed" => {
                options.cosmetic_seed = value("--cosmetic-seed")?
                    .parse()
                    .context("Invalid --cosmetic-seed")?
            }
            "--frames" => run.frames = value("--frames")?.parse().context("Invalid --frames")?,
            "--realtime" => run.realtime = true,
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok((options, run))
}

pub fn main() -> Result<()> {
    logging::init("info")?;

    let (options, run) = parse_args(env::args().skip(1))?;
    info!(?options, ?run, "Parsed options");

    let mut app = App::new(options, run)?;
    app.run();
    Ok(())
}
