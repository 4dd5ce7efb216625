//! `platetrack`: plate inventory CLI.
//!
//! Receives, distributes and returns numbered plates, and reports stock
//! coverage and purchase suggestions. State lives in `<data-dir>/data.redb`;
//! a `catalog.yaml` or `usage.yaml` in the data dir pins that configuration.

mod commands;
mod setup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use platetrack_core::{ServiceConfig, ServiceError};

/// Plate inventory CLI.
#[derive(Parser, Debug)]
#[command(name = "platetrack", about = "Plate lifecycle and numbering-range tracker")]
struct Cli {
    /// Data directory (default: current directory).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// redb database file (default: <data-dir>/data.redb).
    #[arg(long = "db", global = true)]
    db: Option<PathBuf>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Receive a batch of new plates into stock.
    Intake {
        start: u32,
        /// Last number of the batch (default: start).
        end: Option<u32>,
        /// Equipment name (default: classified from the start number).
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Hand a batch of plates out to a destination.
    Distribute {
        start: u32,
        end: Option<u32>,
        /// Destination, e.g. "Construção" or any free text.
        #[arg(long = "to")]
        destination: String,
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Take a batch of distributed plates back (starts quarantine).
    Return {
        start: u32,
        end: Option<u32>,
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Correct a single plate, bypassing lifecycle checks.
    Edit {
        number: u32,
        #[arg(long)]
        equipment: Option<String>,
        /// IN_STOCK, DISTRIBUTED or RETURNED.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        /// Return date (RFC 3339) when forcing RETURNED.
        #[arg(long)]
        date_returned: Option<String>,
    },

    /// Show which equipment a number belongs to.
    Classify { number: u32 },

    /// Suggest the next number to order for an equipment.
    Next { equipment: String },

    /// List the equipment catalog.
    Catalog,

    /// Search the plate inventory.
    Inventory {
        #[arg(long, short = 's', default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        destination: Option<String>,
    },

    /// Reports.
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Purchase suggestions.
    Plan,

    /// Pinned annual usage overrides.
    Usage {
        #[command(subcommand)]
        action: UsageAction,
    },

    /// Write a full-data snapshot.
    Export {
        /// Output file (default: stdout).
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },

    /// Replace all data with a snapshot (admin).
    Import {
        file: PathBuf,
        /// Admin password (not recommended; use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete all plates, logs and usage overrides (admin).
    Clear {
        #[arg(long)]
        password: Option<String>,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Set or change the admin password.
    Password {
        /// New password (non-interactive, for automation).
        #[arg(long)]
        new: Option<String>,
        /// Current password when changing it.
        #[arg(long)]
        current: Option<String>,
    },

    /// Roll back to the automatic restore point.
    Restore {
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ReportKind {
    /// Stock coverage per equipment, lowest first.
    Forecast,
    /// Plates currently in the field.
    Allocated,
    /// Movement log, most recent first.
    History {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Headline numbers for today.
    Dashboard,
}

#[derive(Subcommand, Debug)]
enum UsageAction {
    /// Pin the annual usage of an equipment rule.
    Set { rule_id: String, annual: u32 },
    /// Remove a pinned usage.
    Clear { rule_id: String },
    /// List pinned usages.
    List,
}

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ServiceError>() {
                Some(se) => eprintln!("error [{}]: {}", se.error_code(), se),
                None => eprintln!("error: {:#}", e),
            }
            std::process::ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.output == "json";

    if let Commands::Version = cli.command {
        println!("platetrack v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = ServiceConfig {
        data_dir: cli.data_dir,
        db_path: cli.db,
    };
    let mut svc = setup::open_service(&config)?;

    match cli.command {
        Commands::Intake { start, end, equipment } => {
            commands::movement::intake(&mut svc, start, end, equipment, json)?;
        }
        Commands::Distribute {
            start,
            end,
            destination,
            equipment,
        } => {
            commands::movement::distribute(&mut svc, start, end, &destination, equipment, json)?;
        }
        Commands::Return { start, end, equipment } => {
            commands::movement::return_plates(&mut svc, start, end, equipment, json)?;
        }
        Commands::Edit {
            number,
            equipment,
            status,
            destination,
            date_returned,
        } => {
            let args = commands::movement::EditArgs {
                equipment,
                status,
                destination,
                date_returned,
            };
            commands::movement::edit(&mut svc, number, args, json)?;
        }
        Commands::Classify { number } => commands::report::classify(&svc, number, json)?,
        Commands::Next { equipment } => commands::report::next(&svc, &equipment, json)?,
        Commands::Catalog => commands::report::catalog(&svc, json)?,
        Commands::Inventory {
            search,
            status,
            destination,
        } => commands::report::inventory(&svc, search, status.as_deref(), destination, json)?,
        Commands::Report { kind } => match kind {
            ReportKind::Forecast => commands::report::forecast(&svc, json)?,
            ReportKind::Allocated => commands::report::allocated(&svc, json)?,
            ReportKind::History { limit } => commands::report::history(&svc, limit, json)?,
            ReportKind::Dashboard => commands::report::dashboard(&svc, json)?,
        },
        Commands::Plan => commands::report::plan(&svc, json)?,
        Commands::Usage { action } => match action {
            UsageAction::Set { rule_id, annual } => {
                svc.set_usage_override(&rule_id, annual)?;
                println!("Usage for {} pinned at {}/year.", rule_id, annual);
            }
            UsageAction::Clear { rule_id } => {
                svc.clear_usage_override(&rule_id)?;
                println!("Usage override for {} removed.", rule_id);
            }
            UsageAction::List => commands::report::usage(&svc, json)?,
        },
        Commands::Export { file } => commands::admin::export(&svc, file.as_deref())?,
        Commands::Import { file, password } => {
            let password = commands::admin::admin_password(password)?;
            commands::admin::import(&mut svc, &file, &password)?;
        }
        Commands::Clear { password, yes } => {
            if !yes && !commands::admin::confirm("Delete ALL plates, logs and usage overrides?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let password = commands::admin::admin_password(password)?;
            svc.clear_all(&password)?;
            println!("All data cleared. A restore point was saved.");
        }
        Commands::Password { new, current } => {
            commands::admin::set_password(&svc, new, current)?;
        }
        Commands::Restore { yes } => {
            commands::admin::restore(&mut svc, yes)?;
        }
        Commands::Version => {}
    }

    Ok(())
}
