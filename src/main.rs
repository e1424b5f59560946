//! Command-line access to the Invoicible API
//!
//! Non-interactive: each invocation runs one command and exits.

/// Version injected at compile time via INVOICIBLE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("INVOICIBLE_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use invoicible::{
    Client, Config, CustomerManager, EstimateManager, InvoiceManager, Page, Resource,
    CUSTOMERS_URI, ESTIMATES_URI, INVOICES_URI,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for the Invoicible invoicing service
#[derive(Parser, Debug)]
#[command(name = "invoicible", version = VERSION, about, long_about = None)]
struct Args {
    /// Company domain, e.g. mycompany.centrumfaktur.pl
    #[arg(short, long, global = true)]
    domain: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List customers, invoices or estimates
    List {
        kind: Kind,
        /// Start of the page; without it the whole listing is fetched
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long, default_value_t = Page::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Fetch and print one resource
    Show { resource_uri: String },
    /// Delete one resource
    Delete { resource_uri: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Customers,
    Invoices,
    Estimates,
}

impl Kind {
    /// Guess the kind from a resource uri such as `/api/1.0/invoices/3/`
    fn of_uri(uri: &str) -> Option<Self> {
        let path = url_path(uri);
        [
            (CUSTOMERS_URI, Kind::Customers),
            (INVOICES_URI, Kind::Invoices),
            (ESTIMATES_URI, Kind::Estimates),
        ]
        .into_iter()
        .find_map(|(prefix, kind)| {
            let id = path.strip_prefix(prefix)?.trim_end_matches('/');
            (!id.is_empty() && !id.contains('/')).then_some(kind)
        })
    }
}

fn url_path(uri: &str) -> &str {
    match uri.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => uri,
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("invoicible started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("invoicible").join("invoicible.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".invoicible").join("invoicible.log");
    }
    PathBuf::from("invoicible.log")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_all<T: Resource>(entities: &[T]) -> Result<()> {
    let listing = Value::Array(entities.iter().map(Resource::to_json).collect());
    print_json(&listing)
}

async fn list(client: Client, kind: Kind, page: Option<Page>) -> Result<()> {
    match kind {
        Kind::Customers => {
            let manager = CustomerManager::new(client)?;
            let customers = match page {
                Some(page) => manager.list(page).await?,
                None => manager.all().await?,
            };
            print_all(&customers)
        }
        Kind::Invoices => {
            let manager = InvoiceManager::new(client)?;
            let invoices = match page {
                Some(page) => manager.list(page).await?,
                None => manager.all().await?,
            };
            print_all(&invoices)
        }
        Kind::Estimates => {
            let manager = EstimateManager::new(client)?;
            let estimates = match page {
                Some(page) => manager.list(page).await?,
                None => manager.all().await?,
            };
            print_all(&estimates)
        }
    }
}

async fn show(client: Client, uri: &str) -> Result<()> {
    let json = match Kind::of_uri(uri) {
        Some(Kind::Customers) => invoicible::Customer::fetch(client, uri).await?.to_json(),
        Some(Kind::Invoices) => invoicible::Invoice::fetch(client, uri).await?.to_json(),
        Some(Kind::Estimates) => invoicible::Estimate::fetch(client, uri).await?.to_json(),
        None => client.get_resources(uri, &[]).await?,
    };
    print_json(&json)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    if let Some(domain) = args.domain {
        config.domain = Some(domain);
    }

    let client = Client::from_config(&config).with_context(|| {
        format!(
            "Invoicible is not configured. Put your keys in {:?} or set INVOICIBLE_* variables",
            Config::config_path().unwrap_or_default()
        )
    })?;

    tracing::info!("Using domain: {}", config.effective_domain());

    match args.command {
        Command::List {
            kind,
            offset,
            limit,
        } => list(client, kind, offset.map(|offset| Page::new(offset, limit))).await,
        Command::Show { resource_uri } => show(client, &resource_uri).await,
        Command::Delete { resource_uri } => {
            let deleted = client
                .delete_resource(&resource_uri)
                .await
                .with_context(|| format!("Failed to delete {}", resource_uri))?;
            if deleted {
                println!("deleted {}", resource_uri);
            } else {
                println!("{} was not deleted", resource_uri);
            }
            Ok(())
        }
    }
}
