use clap::{Parser, Subcommand};
use eirelocate::geo::{county_names, GeoResolver};
use eirelocate::server;

/// Eirelocate — Irish county and town geodata resolver.
///
/// Resolves county bounding boxes and town lists from OpenStreetMap via
/// an Overpass interpreter, with caching and polite request pacing.
/// Results print as JSON on stdout; status lines go to stderr.
///
/// Examples:
///   eirelocate bounds Wicklow
///   eirelocate towns Galway
///   eirelocate search Wicklow bray
///   eirelocate serve --port 8080
#[derive(Parser)]
#[command(name = "eirelocate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a county's bounding box.
    Bounds {
        /// County name, with or without the "County " prefix.
        county: String,
    },
    /// List the towns and notable places in a county.
    Towns {
        county: String,
    },
    /// Search places in a county by name fragment.
    Search {
        county: String,
        /// Case-insensitive name fragment.
        text: String,
    },
    /// List the counties known to the built-in table.
    Counties,
    /// Run the HTTP API for the marketplace.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let resolver = GeoResolver::new();

    match cli.command {
        Command::Bounds { county } => match resolver.resolve_county_bounds(&county) {
            Some(bounds) => print_json(&bounds),
            None => {
                eprintln!("No bounds found for county '{}'.", county);
                std::process::exit(1);
            }
        },
        Command::Towns { county } => {
            let places = resolver.list_places_in_county(&county);
            eprintln!("  {} places in County {}", places.len(), county);
            print_json(&places);
        }
        Command::Search { county, text } => {
            let places = resolver.search_places_in_county(&county, &text);
            eprintln!("  {} matches for '{}' in County {}", places.len(), text, county);
            print_json(&places);
        }
        Command::Counties => print_json(&county_names()),
        Command::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
                eprintln!("Error: Cannot start async runtime: {}", e);
                std::process::exit(1);
            });
            runtime.block_on(server::start(&host, port));
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: Cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}
