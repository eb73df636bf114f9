use anyhow::Context;
use clap::Parser;
use itusb1::{ErrorTally, Itusb1};

use cli::Commands;

mod cli;
mod status;
mod usb;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut errors = ErrorTally::new();
    let serial = cli.serial.as_deref();
    match cli.command {
        Commands::List => usb::list(&mut errors),
        Commands::Attach => status::attach(&mut open(serial)?, &mut errors),
        Commands::Detach => status::detach(&mut open(serial)?, &mut errors),
        Commands::Current { count } => status::current(&mut open(serial)?, count, &mut errors),
        Commands::Status => status::print_status(&mut open(serial)?, &mut errors),
        Commands::Info => usb::print_info(&open(serial)?, &mut errors),
        Commands::Reset => open(serial)?.reset(&mut errors),
    }
    errors
        .into_result()
        .context("the ITUSB1 did not complete the command")
}

/// Open the fixture with the given serial, or the first one found.
fn open(serial: Option<&str>) -> anyhow::Result<Itusb1> {
    let device = match serial {
        Some(serial) => {
            Itusb1::open(serial).with_context(|| format!("could not open ITUSB1 {serial}"))?
        }
        None => Itusb1::open_first().context("could not open an ITUSB1")?,
    };
    log::debug!("Opened fixture");
    Ok(device)
}
