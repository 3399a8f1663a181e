//! # Eco-Slab Quotation CLI
//!
//! Collects a client name and room dimensions (flags, a JSON room file, or
//! interactive prompts), prints the estimate, and writes the PDF quotation.

mod cli;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slab_core::calculations::{calculate, Room, SlabInput};
use slab_core::errors::SlabError;
use slab_core::file_io::{load_room_list, save_quotation};
use slab_core::report::render_text_summary;
use slab_core::settings::QuotationSettings;

use crate::cli::Cli;

/// Client name used when none is given
const DEFAULT_CLIENT: &str = "LOGO";

/// Exit status for any other failure
const EXIT_FAILURE: u8 = 1;

/// Exit status when the estimate rejects its input
const EXIT_INVALID_INPUT: u8 = 2;

/// Smallest dimension the prompts accept (m)
const MIN_DIMENSION_M: f64 = 0.1;

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let slab_error = e.downcast_ref::<SlabError>();
            if json {
                if let Some(error_json) = slab_error.and_then(|err| serde_json::to_string_pretty(err).ok()) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", error_json);
                }
            }
            ExitCode::from(exit_status(slab_error))
        }
    }
}

/// Exit status for a failed run: 2 when the input was rejected, 1 otherwise.
fn exit_status(error: Option<&SlabError>) -> u8 {
    match error {
        Some(err) if err.is_input_error() => EXIT_INVALID_INPUT,
        _ => EXIT_FAILURE,
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut client = cli.client.clone();
    let mut rooms: Vec<Room> = Vec::new();

    if let Some(path) = &cli.rooms_file {
        let list = load_room_list(path)
            .with_context(|| format!("Failed to load rooms from {}", path.display()))?;
        if client.is_none() {
            client = list.client_name;
        }
        rooms.extend(list.rooms);
    }
    rooms.extend(cli.rooms.iter().copied());

    if rooms.is_empty() {
        let (prompted_client, prompted_rooms) =
            prompt_job(client.as_deref()).context("Failed to read rooms from the terminal")?;
        client = Some(prompted_client);
        rooms = prompted_rooms;
    }

    let client = client.unwrap_or_else(|| DEFAULT_CLIENT.to_string());
    info!(client = %client, rooms = rooms.len(), "estimating slab");

    let input = SlabInput::new(client, rooms).with_breakage_policy(cli.breakage.into());
    let summary = calculate(&input)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Calculation completed successfully!");
        println!();
        print!("{}", render_text_summary(&summary));
    }

    if cli.no_pdf {
        return Ok(());
    }

    let mut settings = QuotationSettings::default();
    if let Some(date) = cli.date {
        settings = settings.with_date(date);
    }
    if let Some(logo) = &cli.logo {
        settings = settings.with_logo(logo);
    }

    let output_dir = cli.output_dir.clone().unwrap_or_else(std::env::temp_dir);
    let path: PathBuf = save_quotation(&summary, &settings, &output_dir)?;

    if cli.json {
        eprintln!("Quotation PDF: {}", path.display());
    } else {
        println!();
        println!("Quotation PDF: {}", path.display());
    }
    Ok(())
}

/// Ask for the client and rooms the way the quotation form does.
fn prompt_job(client: Option<&str>) -> io::Result<(String, Vec<Room>)> {
    println!("Eco-Slab Quotation System");
    println!("=========================");
    println!();

    let client = match client {
        Some(name) => name.to_string(),
        None => prompt_line(&format!("Enter Client Name [{}]: ", DEFAULT_CLIENT))?
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT.to_string()),
    };

    let count: usize = prompt_value("Enter number of rooms [1]: ", 1, |n: &usize| *n >= 1)?;

    let mut rooms = Vec::with_capacity(count);
    for i in 1..=count {
        println!();
        println!("Room {}", i);
        let width = prompt_value(
            &format!("  Width of Room {} (m): ", i),
            MIN_DIMENSION_M,
            |w: &f64| *w >= MIN_DIMENSION_M,
        )?;
        let length = prompt_value(
            &format!("  Length of Room {} (m): ", i),
            MIN_DIMENSION_M,
            |l: &f64| *l >= MIN_DIMENSION_M,
        )?;
        rooms.push(Room::new(width, length));
    }
    println!();

    Ok((client, rooms))
}

/// Read one trimmed line; `None` for an empty answer.
fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }

    let trimmed = input.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Prompt until the answer parses and passes `accept`. An empty answer
/// takes the default.
fn prompt_value<T, F>(prompt: &str, default: T, accept: F) -> io::Result<T>
where
    T: FromStr + Copy,
    F: Fn(&T) -> bool,
{
    loop {
        let value = match prompt_line(prompt)? {
            None => default,
            Some(answer) => match answer.parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    println!("  '{}' is not a number, try again.", answer);
                    continue;
                }
            },
        };

        if accept(&value) {
            return Ok(value);
        }
        println!("  Value out of range, try again.");
    }
}
