// src/bin/cli.rs
use checkin::cli::{self, Command};
use color_eyre::eyre::eyre;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let opts = match cli::parse_args(std::env::args().skip(1))? {
        Command::Help => {
            eprintln!("{}", cli::HELP);
            return Ok(());
        }
        Command::Run(opts) => opts,
    };

    // Site failures are reported in the summary; only setup errors land here.
    cli::run(opts).map_err(|e| eyre!("{e}"))?;
    Ok(())
}
