//! Interim: a local-first manager for temporary-work employment records.
//!
//! Interim tracks the four record families of a staffing agency: employees,
//! client companies, assignment contracts, and the certificates issued from
//! them. All state is local, stored in a single SQLite-backed flat key-value
//! map partitioned into logical namespaces by key prefix.
//!
//! # Architecture
//!
//! ## One physical map, many namespaces
//!
//! Every registry is a [`core::store::Store`]: a prefixed view over the shared
//! backing map (`.interim/data/store.db`). The facade is deliberately thin:
//! get/set/has/delete/clear/replace-all over opaque JSON values, no indexing,
//! no transactions. Once a store is open its methods never fail; storage
//! trouble degrades into benign return values plus a `tracing` diagnostic.
//!
//! ## Registries
//!
//! - `employees`: the temporary workers
//! - `clients`: the companies taking them on
//! - `contracts`: bounded assignments linking the two
//! - `certificates`: work / end-of-contract attestations
//!
//! # Examples
//!
//! ```bash
//! # Initialize a workspace
//! interim init
//!
//! # Register people and companies
//! interim employee add --first-name Jean --last-name Moreau --qualification mason
//! interim client add --company-name "BTP Atlantique"
//!
//! # Place an assignment
//! interim contract add --employee <ID> --client <ID> --position mason \
//!     --start-date 2026-09-01 --end-date 2026-12-19 --hourly-rate-cents 1480
//!
//! # Raw namespace access
//! interim store --name config set theme '"dark"'
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: store facade, backing maps, SQLite plumbing, error type
//! - [`records`]: registry types and CLI for the staffing domain

pub mod core;
pub mod records;

use crate::core::backing::{BackingMap, SqliteMap};
use crate::core::store::{Store, StoreOptions};
use crate::core::{db, error, store};
use crate::records::{certificate, client, contract, employee};

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const INTERIM_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[clap(
    name = "interim",
    version = env!("CARGO_PKG_VERSION"),
    about = "Local-first temporary-work contract management"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize an Interim workspace in the current directory
    #[clap(name = "init", visible_alias = "i")]
    Init {
        /// Directory to initialize (defaults to current working directory).
        #[clap(short, long)]
        dir: Option<PathBuf>,
        /// Discard an existing workspace and start over.
        #[clap(long)]
        force: bool,
    },

    /// Manage employees
    #[clap(name = "employee", visible_alias = "e")]
    Employee(employee::EmployeeCli),

    /// Manage client companies
    #[clap(name = "client")]
    Client(client::ClientCli),

    /// Manage assignment contracts
    #[clap(name = "contract", visible_alias = "c")]
    Contract(contract::ContractCli),

    /// Issue and manage certificates
    #[clap(name = "certificate")]
    Certificate(certificate::CertificateCli),

    /// Raw access to any store namespace
    #[clap(name = "store", visible_alias = "s")]
    Store(StoreCli),

    /// Whole-dataset export, import, and usage
    #[clap(name = "data")]
    Data(DataCli),

    /// Subsystem schemas and discovery
    #[clap(name = "schema")]
    Schema(SchemaCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}

#[derive(clap::Args, Debug)]
struct StoreCli {
    /// Namespace name
    #[clap(long, default_value = "config")]
    name: String,
    /// Working-directory discriminator prefixed before the name
    #[clap(long)]
    cwd: Option<String>,
    #[clap(subcommand)]
    command: StoreCommand,
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Read one key, or every entry of the namespace when no key is given
    Get { key: Option<String> },
    /// Print every entry of the namespace
    List,
    /// Write a key. The value is parsed as JSON, falling back to a string.
    Set { key: String, value: String },
    /// Check whether a key exists
    Has { key: String },
    /// Delete a key (idempotent)
    Del { key: String },
    /// Remove every entry of this namespace
    Clear,
    /// Approximate stored size of this namespace
    Usage,
}

#[derive(clap::Args, Debug)]
struct DataCli {
    #[clap(subcommand)]
    command: DataCommand,
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Dump every registry as one JSON document
    Export,
    /// Replace every registry from a JSON document produced by `export`
    Import {
        #[clap(long)]
        path: PathBuf,
    },
    /// Per-registry stored size report
    Usage,
}

#[derive(clap::Args, Debug)]
struct SchemaCli {
    /// Optional: filter by subsystem name
    #[clap(long)]
    subsystem: Option<String>,
}

fn find_interim_project_root(start_dir: &Path) -> Result<PathBuf, error::InterimError> {
    let mut current_dir = PathBuf::from(start_dir);
    loop {
        if current_dir.join(".interim").exists() {
            return Ok(current_dir);
        }
        if !current_dir.pop() {
            return Err(error::InterimError::NotFound(
                "'.interim' directory not found in current or parent directories. Run `interim init` first.".to_string(),
            ));
        }
    }
}

fn init_workspace(dir: Option<PathBuf>, force: bool) -> Result<(), error::InterimError> {
    let target_dir = match dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    // The target may not exist yet; canonicalize only resolves existing paths.
    std::fs::create_dir_all(&target_dir).map_err(error::InterimError::IoError)?;
    let target_dir = std::fs::canonicalize(&target_dir).map_err(error::InterimError::IoError)?;

    let interim_root = target_dir.join(".interim");
    if interim_root.exists() {
        if !force {
            println!(
                "{} Workspace already initialized at {}",
                "⚠".bright_yellow(),
                target_dir.display()
            );
            println!(
                "    Use {} to discard it and start over.",
                "--force".bright_cyan()
            );
            return Ok(());
        }
        std::fs::remove_dir_all(&interim_root).map_err(error::InterimError::IoError)?;
    }

    let store_root = interim_root.join("data");
    std::fs::create_dir_all(&store_root).map_err(error::InterimError::IoError)?;
    db::initialize_store_db(&store_root)?;
    store::init_global_bridge();

    println!(
        "{} Workspace initialized at {}",
        "✓".bright_green(),
        target_dir.display()
    );
    println!(
        "    {} {}",
        "●".bright_green(),
        db::store_db_path(&store_root).display()
    );
    Ok(())
}

/// Registries of the four record families, one namespace each, sharing one
/// backing map handle.
pub struct Registries {
    pub employees: Store,
    pub clients: Store,
    pub contracts: Store,
    pub certificates: Store,
}

pub fn open_registries(backing: &Arc<dyn BackingMap>) -> Result<Registries, error::InterimError> {
    Ok(Registries {
        employees: records::open_registry(backing, employee::EMPLOYEE_NAMESPACE)?,
        clients: records::open_registry(backing, client::CLIENT_NAMESPACE)?,
        contracts: records::open_registry(backing, contract::CONTRACT_NAMESPACE)?,
        certificates: records::open_registry(backing, certificate::CERTIFICATE_NAMESPACE)?,
    })
}

fn run_store_cli(backing: &Arc<dyn BackingMap>, cli: StoreCli) -> Result<(), error::InterimError> {
    let store = Store::open(
        Arc::clone(backing),
        StoreOptions {
            name: Some(cli.name),
            cwd: cli.cwd,
            schema: None,
        },
    )?;

    match cli.command {
        StoreCommand::Get { key: Some(key) } => match store.get(&key) {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value).unwrap()),
            None => println!("(unset)"),
        },
        StoreCommand::Get { key: None } | StoreCommand::List => {
            let entries = store.entries();
            println!(
                "{}",
                serde_json::to_string_pretty(&Value::Object(entries)).unwrap()
            );
        }
        StoreCommand::Set { key, value } => {
            let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
            if !store.set(&key, Some(parsed)) {
                return Err(error::InterimError::WriteRefused(format!(
                    "{}/{}",
                    store.name(),
                    key
                )));
            }
            println!("{} {} set", "✓".bright_green(), key);
        }
        StoreCommand::Has { key } => {
            println!("{}", store.has(&key));
        }
        StoreCommand::Del { key } => {
            store.delete(&key);
            println!("{} {} deleted", "✓".bright_green(), key);
        }
        StoreCommand::Clear => {
            store.clear();
            println!(
                "{} namespace '{}' cleared",
                "✓".bright_green(),
                store.name()
            );
        }
        StoreCommand::Usage => {
            println!("{}", store.size_bytes());
        }
    }
    Ok(())
}

fn run_data_cli(registries: &Registries, cli: DataCli) -> Result<(), error::InterimError> {
    let all = [
        &registries.employees,
        &registries.clients,
        &registries.contracts,
        &registries.certificates,
    ];
    match cli.command {
        DataCommand::Export => {
            let mut dump = serde_json::Map::new();
            for store in all {
                dump.insert(store.name().to_string(), Value::Object(store.entries()));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&Value::Object(dump)).unwrap()
            );
        }
        DataCommand::Import { path } => {
            let raw = std::fs::read_to_string(&path).map_err(error::InterimError::IoError)?;
            let document: Value = serde_json::from_str(&raw)?;
            let Value::Object(mut namespaces) = document else {
                return Err(error::InterimError::ValidationError(
                    "import document must be a JSON object of namespaces".to_string(),
                ));
            };
            for store in all {
                if let Some(entries) = namespaces.remove(store.name()) {
                    store.replace_all(entries);
                    println!("{} {} restored", "✓".bright_green(), store.name());
                }
            }
            if !namespaces.is_empty() {
                let leftover: Vec<&str> = namespaces.keys().map(String::as_str).collect();
                println!("Skipped unknown namespaces: {}", leftover.join(", "));
            }
        }
        DataCommand::Usage => {
            for store in all {
                println!("{:<14} {} chars", store.name(), store.size_bytes());
            }
        }
    }
    Ok(())
}

fn run_schema_cli(cli: SchemaCli) -> Result<(), error::InterimError> {
    let mut schemas = std::collections::BTreeMap::new();
    schemas.insert("employee", employee::schema());
    schemas.insert("client", client::schema());
    schemas.insert("contract", contract::schema());
    schemas.insert("certificate", certificate::schema());

    let output = if let Some(sub) = cli.subsystem {
        schemas
            .get(sub.as_str())
            .cloned()
            .unwrap_or(serde_json::json!({ "error": "subsystem not found" }))
    } else {
        serde_json::json!({
            "schema_version": "1.0.0",
            "subsystems": schemas
        })
    };
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
    Ok(())
}

pub fn run() -> Result<(), error::InterimError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;

    let command = match cli.command {
        Command::Version => {
            println!("v{}", INTERIM_VERSION);
            return Ok(());
        }
        Command::Init { dir, force } => {
            return init_workspace(dir, force);
        }
        Command::Schema(schema_cli) => {
            return run_schema_cli(schema_cli);
        }
        other => other,
    };

    // Everything else needs an initialized workspace.
    let project_root = find_interim_project_root(&current_dir)?;
    let store_root = project_root.join(".interim").join("data");
    std::fs::create_dir_all(&store_root).map_err(error::InterimError::IoError)?;

    let backing: Arc<dyn BackingMap> =
        Arc::new(SqliteMap::open(&db::store_db_path(&store_root))?);
    store::init_global_bridge();
    let registries = open_registries(&backing)?;

    match command {
        Command::Employee(employee_cli) => {
            employee::run_employee_cli(&registries.employees, employee_cli)?;
        }
        Command::Client(client_cli) => {
            client::run_client_cli(&registries.clients, client_cli)?;
        }
        Command::Contract(contract_cli) => {
            contract::run_contract_cli(
                &registries.contracts,
                &registries.employees,
                &registries.clients,
                contract_cli,
            )?;
        }
        Command::Certificate(certificate_cli) => {
            certificate::run_certificate_cli(
                &registries.certificates,
                &registries.contracts,
                certificate_cli,
            )?;
        }
        Command::Store(store_cli) => {
            run_store_cli(&backing, store_cli)?;
        }
        Command::Data(data_cli) => {
            run_data_cli(&registries, data_cli)?;
        }
        _ => unreachable!(),
    }
    Ok(())
}
