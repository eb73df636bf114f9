use clap::Parser;

/// CLI for the ITUSB1 USB switch
///
/// Attaches and detaches a device under test from its host, and reports the
/// state of VBUS, the data lines and the overcurrent flag along with the
/// current drawn on VBUS.
///
/// Set RUST_LOG (or pass --verbose) to see what is sent to the fixture.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Serial number of the fixture to use. Defaults to the first one found.
    #[arg(short, long)]
    pub(crate) serial: Option<String>,
    /// Log the steps taken at debug level.
    #[arg(short, long)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// List the serial numbers of the attached fixtures.
    List,
    /// Attach the DUT: switch VBUS on, then connect the data lines.
    Attach,
    /// Detach the DUT: disconnect the data lines, then switch VBUS off.
    Detach,
    /// Measure the VBUS current in milliamps.
    Current {
        /// Number of successive measurements to take.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Show the line status and VBUS current.
    Status,
    /// Show the USB descriptors and configuration of the fixture.
    Info,
    /// Reset the fixture.
    Reset,
}
