//! Client registry: the companies that take on temporary workers.

use crate::core::error;
use crate::core::store::Store;
use crate::records;
use colored::Colorize;
use serde::{Deserialize, Serialize};

pub const CLIENT_NAMESPACE: &str = "clients";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Client {
    pub id: String,
    pub company_name: String,
    /// French company registration number, free-form here.
    pub siret: Option<String>,
    pub contact_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientInput {
    pub company_name: String,
    pub siret: Option<String>,
    pub contact_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub fn add_client(store: &Store, input: ClientInput) -> Result<String, error::InterimError> {
    if input.company_name.trim().is_empty() {
        return Err(error::InterimError::ValidationError(
            "client company name must not be empty".to_string(),
        ));
    }
    let id = ulid::Ulid::new().to_string();
    let client = Client {
        id: id.clone(),
        company_name: input.company_name,
        siret: input.siret,
        contact_name: input.contact_name,
        address: input.address,
        phone: input.phone,
        email: input.email,
        created_at: records::now_timestamp(),
        updated_at: None,
    };
    records::put_record(store, &id, &client)?;
    Ok(id)
}

pub fn get_client(store: &Store, id: &str) -> Result<Option<Client>, error::InterimError> {
    records::fetch_record(store, id)
}

pub fn list_clients(store: &Store) -> Vec<Client> {
    records::list_records(store)
}

pub fn remove_client(store: &Store, id: &str) -> Result<(), error::InterimError> {
    records::remove_record(store, id)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "client",
        "version": "0.1.0",
        "description": "Client-company registry",
        "commands": [
            { "name": "add", "description": "Register a client company", "parameters": ["company_name", "siret?", "contact_name?", "address?", "phone?", "email?"] },
            { "name": "list", "description": "List all clients" },
            { "name": "show", "description": "Show one client", "parameters": ["id"] },
            { "name": "remove", "description": "Remove a client", "parameters": ["id"] }
        ],
        "storage": ["store.db (namespace: clients)"]
    })
}

#[derive(clap::Args, Debug)]
pub struct ClientCli {
    #[clap(subcommand)]
    pub command: ClientCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum ClientCommand {
    /// Register a client company
    Add {
        #[clap(long)]
        company_name: String,
        /// Company registration number
        #[clap(long)]
        siret: Option<String>,
        #[clap(long)]
        contact_name: Option<String>,
        #[clap(long)]
        address: Option<String>,
        #[clap(long)]
        phone: Option<String>,
        #[clap(long)]
        email: Option<String>,
    },
    /// List clients
    List {
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Show one client
    Show { id: String },
    /// Remove a client
    Remove { id: String },
}

pub fn run_client_cli(store: &Store, cli: ClientCli) -> Result<(), error::InterimError> {
    match cli.command {
        ClientCommand::Add {
            company_name,
            siret,
            contact_name,
            address,
            phone,
            email,
        } => {
            let input = ClientInput {
                company_name: company_name.clone(),
                siret,
                contact_name,
                address,
                phone,
                email,
            };
            let id = add_client(store, input)?;
            println!(
                "{} Client registered: {} (id: {})",
                "✓".bright_green(),
                company_name,
                id
            );
        }
        ClientCommand::List { format } => {
            let clients = list_clients(store);
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&clients).unwrap());
            } else if clients.is_empty() {
                println!("No clients registered yet.");
            } else {
                for c in clients {
                    println!(
                        "{}  {}{}",
                        c.id.bright_black(),
                        c.company_name,
                        c.contact_name
                            .map(|n| format!(" (contact: {})", n))
                            .unwrap_or_default()
                    );
                }
            }
        }
        ClientCommand::Show { id } => match get_client(store, &id)? {
            Some(c) => println!("{}", serde_json::to_string_pretty(&c).unwrap()),
            None => println!("No client found for id {}", id),
        },
        ClientCommand::Remove { id } => {
            remove_client(store, &id)?;
            println!("{} Client removed: {}", "✓".bright_green(), id);
        }
    }
    Ok(())
}
