//! CLI tool to plan routes against the AQI route server.

use aqi_cli::{parse_envelope, render_summary};
use clap::Parser;
use serde_json::{json, Value};

/// Query route air-quality exposure between two cities
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// AQI route server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Origin city name
    #[arg(long)]
    origin: String,

    /// Destination city name
    #[arg(long)]
    destination: String,

    /// Print the raw JSON response instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let endpoint = format!("{}/v1/routes", args.url.trim_end_matches('/'));

    let client = reqwest::blocking::Client::new();
    let body: Value = client
        .post(&endpoint)
        .json(&json!({
            "originCity": args.origin,
            "destinationCity": args.destination,
        }))
        .send()?
        .json()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match parse_envelope(body) {
        Ok(response) => print!("{}", render_summary(&response)),
        Err(e) => {
            eprintln!("Route query failed: {}", e);
            return Err(e);
        }
    }
    Ok(())
}
