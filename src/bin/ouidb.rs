//! ouidb: look up MAC address vendors and build the OUI database.

use clap::{Parser, Subcommand};
use ouidb::config::{Config, Overrides};
use ouidb::{DatabaseWriter, MacAddress, OuiDatabase, RegistryParser};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ouidb")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Memory-mapped OUI to vendor name database", long_about = None)]
struct Cli {
    /// Read configuration from <file>
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (default: oui.db)
    #[arg(short = 'D', long, global = true)]
    database: Option<PathBuf>,

    /// Amount of logging, as a syslog priority (0-7)
    #[arg(short, long, global = true)]
    debug: Option<u8>,

    /// Send logging to <file>
    #[arg(short, long, global = true)]
    logfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the vendor of one or more MAC addresses
    Lookup {
        /// MAC addresses, e.g. 00:17:f2:01:02:03
        #[arg(required = true)]
        macs: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the database from an IEEE oui.txt registry (optionally .gz)
    Build {
        /// Registry file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show how much of the database is in use
    Stats {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct LookupResult {
    mac: String,
    oui: String,
    company: u16,
    vendor: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let overrides = Overrides {
        database: cli.database,
        log_level: cli.debug,
        log_file: cli.logfile,
    };
    let config = match Config::resolve(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ouidb::logging::init(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Lookup { macs, json } => lookup(&config.database, &macs, json),
        Commands::Build { input } => build(&config.database, &input),
        Commands::Stats { json } => stats(&config.database, json),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn lookup(database: &Path, macs: &[String], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = OuiDatabase::open(database)?;

    let mut results = Vec::with_capacity(macs.len());
    for text in macs {
        let mac = MacAddress::parse_text(text);
        let company = db.lookup_company(mac);
        let vendor = match db.reconstruct_name(company) {
            Ok(name) if name.is_empty() => None,
            Ok(name) => Some(name),
            Err(e) => {
                log::warn!("Corrupt record for {}: {}", mac, e);
                None
            }
        };
        results.push(LookupResult {
            mac: mac.to_string(),
            oui: format!("{:06x}", mac.oui()),
            company,
            vendor,
        });
    }
    db.close();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!(
                "{}\t{}",
                result.mac,
                result.vendor.as_deref().unwrap_or("<unknown>")
            );
        }
    }
    Ok(())
}

fn build(database: &Path, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Reading registry {:?}", input);
    let records = RegistryParser::parse_file(input)?;

    let mut writer = DatabaseWriter::new();
    let skipped = writer.add_records(&records)?;

    let db = writer.build(database)?;
    db.close();

    println!(
        "Built {:?}: {} OUIs, {} companies, {} buckets",
        database,
        writer.vendor_count(),
        writer.company_count(),
        writer.bucket_count()
    );
    if skipped > 0 {
        println!("Skipped {} of {} registry records: database tables are full", skipped, records.len());
    }
    Ok(())
}

fn stats(database: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = OuiDatabase::open(database)?;
    let stats = db.stats();
    db.close();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Assigned OUIs: {}", stats.assigned_ouis);
        println!("Companies:     {}", stats.companies);
        println!("Buckets:       {}", stats.buckets);
    }
    Ok(())
}
