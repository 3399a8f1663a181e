//! CLI argument definitions

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use slab_core::calculations::{BreakagePolicy, Room};

/// Eco-slab quotation calculator
#[derive(Debug, Parser)]
#[command(
    name = "slab-quote",
    version,
    about = "Estimate eco-slab beams, blocks and cost, and write a PDF quotation",
    after_help = "Rooms are given as WIDTHxLENGTH in metres, e.g. --room 3.0x5.0. \
                  With no rooms on the command line the calculator asks for them."
)]
pub struct Cli {
    /// Client the quotation is addressed to
    #[arg(short, long)]
    pub client: Option<String>,

    /// Room as WIDTHxLENGTH in metres (repeatable, order is kept)
    #[arg(short, long = "room", value_name = "WxL", value_parser = parse_room)]
    pub rooms: Vec<Room>,

    /// JSON file with rooms: an array of {width, length} or {client_name, rooms}
    #[arg(short = 'f', long, value_name = "PATH")]
    pub rooms_file: Option<PathBuf>,

    /// Directory the PDF is written to (defaults to the system temp dir)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Letterhead image for the PDF
    #[arg(long, value_name = "PATH", env = "ECO_SLAB_LOGO")]
    pub logo: Option<PathBuf>,

    /// How breakage is accumulated across rooms
    #[arg(long, value_enum, default_value_t = BreakageArg::RunningTotal)]
    pub breakage: BreakageArg,

    /// Quotation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Skip writing the PDF quotation
    #[arg(long)]
    pub no_pdf: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Breakage accumulation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BreakageArg {
    /// Recompute from the running block total; the last room's value is quoted
    RunningTotal,
    /// Sum each room's own allowance
    PerRoom,
}

impl From<BreakageArg> for BreakagePolicy {
    fn from(arg: BreakageArg) -> Self {
        match arg {
            BreakageArg::RunningTotal => BreakagePolicy::RunningTotal,
            BreakageArg::PerRoom => BreakagePolicy::PerRoom,
        }
    }
}

/// Parse `WIDTHxLENGTH` (also accepts `*` or `,` as the separator).
pub fn parse_room(s: &str) -> Result<Room, String> {
    let (width, length) = s
        .split_once(['x', 'X', '*', ','])
        .ok_or_else(|| format!("expected WIDTHxLENGTH, got '{}'", s))?;

    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width.trim()))?;
    let length: f64 = length
        .trim()
        .parse()
        .map_err(|_| format!("invalid length '{}'", length.trim()))?;

    Ok(Room::new(width, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_room() {
        assert_eq!(parse_room("3.0x5.0").unwrap(), Room::new(3.0, 5.0));
        assert_eq!(parse_room("4.2 X 3.6").unwrap(), Room::new(4.2, 3.6));
        assert_eq!(parse_room("2,2.7").unwrap(), Room::new(2.0, 2.7));
        assert!(parse_room("3.0").is_err());
        assert!(parse_room("ax5").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_rooms() {
        let cli = Cli::try_parse_from([
            "slab-quote",
            "--client",
            "Acme",
            "--room",
            "3.0x5.0",
            "-r",
            "2.0x2.7",
            "--breakage",
            "per-room",
            "--date",
            "2025-03-14",
            "--no-pdf",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.client.as_deref(), Some("Acme"));
        assert_eq!(cli.rooms, vec![Room::new(3.0, 5.0), Room::new(2.0, 2.7)]);
        assert_eq!(BreakagePolicy::from(cli.breakage), BreakagePolicy::PerRoom);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert!(cli.no_pdf);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_bad_room() {
        assert!(Cli::try_parse_from(["slab-quote", "--room", "3.0"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
