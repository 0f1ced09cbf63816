//! CLI tool for gatequote - quotes door panels from an XLSX price book
//!
//! Usage:
//!   gatequote_cli <pricebook.xlsx> --summary
//!   gatequote_cli <pricebook.xlsx> --variant MasterPack --width 3000 --height 3200
//!   gatequote_cli <pricebook.xlsx> --variant ActiveRoll --width 2500 --height 2500 \
//!       --margin 10 --rate 4.4 -o quote.json
//!
//! Margin defaults to 0, the exchange rate to the built-in EUR->PLN default.
//! Data-quality warnings from the price book go to stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gatequote::quote::{self, DEFAULT_EXCHANGE_RATE};
use gatequote::{pricebook, QuoteRequest};

struct Args {
    input: String,
    summary: bool,
    variant: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    margin: f64,
    rate: f64,
    output: Option<String>,
}

fn usage() -> ! {
    eprintln!(
        "Usage: gatequote_cli <pricebook.xlsx> (--summary | --variant <id> --width <mm> --height <mm>) \
         [--margin <pct>] [--rate <eur-pln>] [-o output.json]"
    );
    std::process::exit(1);
}

fn parse_args() -> Args {
    let argv: Vec<String> = env::args().collect();
    if argv.len() < 2 {
        usage();
    }

    let mut args = Args {
        input: argv[1].clone(),
        summary: false,
        variant: None,
        width: None,
        height: None,
        margin: 0.0,
        rate: DEFAULT_EXCHANGE_RATE,
        output: None,
    };

    let mut i = 2;
    while i < argv.len() {
        let flag = argv[i].as_str();
        match flag {
            "--summary" => {
                args.summary = true;
                i += 1;
            }
            "--variant" | "--width" | "--height" | "--margin" | "--rate" | "-o" => {
                if i + 1 >= argv.len() {
                    eprintln!("Missing value for {flag}");
                    usage();
                }
                let value = argv[i + 1].as_str();
                match flag {
                    "--variant" => args.variant = Some(value.to_string()),
                    "--width" => {
                        args.width = Some(value.parse().unwrap_or_else(|_| {
                            eprintln!("Invalid width: {value}");
                            std::process::exit(1);
                        }));
                    }
                    "--height" => {
                        args.height = Some(value.parse().unwrap_or_else(|_| {
                            eprintln!("Invalid height: {value}");
                            std::process::exit(1);
                        }));
                    }
                    "--margin" => {
                        args.margin = value.parse().unwrap_or_else(|_| {
                            eprintln!("Invalid margin: {value}");
                            std::process::exit(1);
                        });
                    }
                    "--rate" => {
                        args.rate = value.parse().unwrap_or_else(|_| {
                            eprintln!("Invalid exchange rate: {value}");
                            std::process::exit(1);
                        });
                    }
                    "-o" => args.output = Some(value.to_string()),
                    _ => usage(),
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {flag}");
                usage();
            }
        }
    }

    args
}

fn emit(json: &str, output: Option<&str>) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}

fn main() {
    let args = parse_args();

    // Read input file
    let data = match fs::read(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    // Load the price book (warnings land on stderr via the console sink)
    let loaded = match pricebook::load_default(&data) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading price book: {}", e);
            std::process::exit(1);
        }
    };

    if args.summary {
        let json = match serde_json::to_string_pretty(&loaded.catalog) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing JSON: {}", e);
                std::process::exit(1);
            }
        };
        emit(&json, args.output.as_deref());
        return;
    }

    let (Some(variant), Some(width), Some(height)) = (args.variant, args.width, args.height)
    else {
        eprintln!("A quote needs --variant, --width and --height (or use --summary)");
        usage();
    };

    let request = QuoteRequest {
        variant,
        width,
        height,
        margin_percent: args.margin,
        exchange_rate: args.rate,
    };

    let quote = match quote::compute(&loaded.catalog, &request) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&quote) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };
    emit(&json, args.output.as_deref());
}
