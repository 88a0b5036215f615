use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

mod error;
mod gtfs;
mod resolve;
mod speed;
mod trip;

use crate::error::ProcessingError;
use crate::resolve::{Day, Selection};
use crate::speed::SpeedReport;

const ERROR_CONTEXT: &str =
    "failed to calculate route speed in provided GTFS feed with provided parameters";

/// Calculates the average operating speed of a bus route from a GTFS feed.
#[derive(Parser, Debug)]
#[clap(name = "route-speed")]
struct Args {
    /// Route short name to look up; wins over the id options
    #[clap(short = 'r', long)]
    route_short_name: Option<String>,

    /// Route id to look up
    #[clap(long)]
    route_id: Option<String>,

    /// Trip id to use directly
    #[clap(long)]
    trip_id: Option<String>,

    /// Absolute path to the GTFS feed; defaults to the current directory
    #[clap(short, long)]
    path: Option<PathBuf>,

    /// The feed ships shapes.txt and distance should be measured along it
    #[clap(short, long)]
    shape: bool,

    /// Only consider trips departing during this hour of the day
    #[clap(short = 't', long, value_parser = clap::value_parser!(u8).range(0..=23))]
    hour: Option<u8>,

    /// Only consider trips whose service runs on this day, "monday" through
    /// "sunday"
    #[clap(short, long)]
    day: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    print_banner(&args);

    match run(&args) {
        Ok(report) => {
            println!("* route distance = {} miles", report.distance_miles);
            println!("* route travel time = {} seconds", report.elapsed_seconds);
            println!("--> avg route speed = {} mph", report.speed_mph);
        }
        Err(err) => {
            error!("{}: {}", ERROR_CONTEXT, err);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<SpeedReport, ProcessingError> {
    let day = args.day.as_deref().map(Day::from_name).transpose()?;
    let selection = Selection {
        short_name: args.route_short_name.clone(),
        route_id: args.route_id.clone(),
        trip_id: args.trip_id.clone(),
        hour: args.hour,
        day,
    };

    let feed_dir = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let feed = gtfs::Feed::load(&feed_dir, args.shape)?;

    let trip_id = resolve::resolve_trip(&feed, &selection)?;
    println!("computing speed for trip {} ...", trip_id);

    let data = trip::TripData::extract(&feed, &trip_id)?;
    speed::average_speed(&data)
}

fn print_banner(args: &Args) {
    let rule = "=".repeat(64);
    println!("{}", rule);
    println!("GTFS route speed calculation script:");
    println!();

    match &args.path {
        Some(path) => println!("- reading the GTFS feed from {}", path.display()),
        None => println!("! no path was given, reading the GTFS feed from the current directory"),
    }
    if args.shape {
        println!("- measuring route distance along shapes.txt");
    } else {
        println!(
            "! shapes.txt not in use; the stops-only straight-line distance \
             approximation is not implemented"
        );
    }
    if let Some(hour) = args.hour {
        println!("- calculating route speed at hour {}", hour);
    }
    if let Some(day) = &args.day {
        println!("- restricting service to day {}", day);
    }
    if let Some(short_name) = &args.route_short_name {
        println!("- set route_short_name to {}", short_name);
    } else if let Some(route_id) = &args.route_id {
        println!("- set route_id to {}", route_id);
    } else if let Some(trip_id) = &args.trip_id {
        println!("- set trip_id to {}", trip_id);
    }
    println!("{}", rule);
}
