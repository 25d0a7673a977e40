//! Contract registry: temporary-work assignments linking an employee to a
//! client for a bounded period.
//!
//! Insertion checks that the referenced employee and client exist. The check
//! happens once, at insertion; the store itself never enforces the link, so a
//! later removal of the employee leaves a dangling ID in the contract.

use crate::core::error;
use crate::core::store::Store;
use crate::records;
use colored::Colorize;
use serde::{Deserialize, Serialize};

pub const CONTRACT_NAMESPACE: &str = "contracts";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Ended,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Contract {
    pub id: String,
    pub employee_id: String,
    pub client_id: String,
    pub position: String,
    /// Assignment start (YYYY-MM-DD).
    pub start_date: String,
    /// Planned end (YYYY-MM-DD). Temporary-work contracts are always bounded.
    pub end_date: String,
    pub hourly_rate_cents: u32,
    /// Legal motive for the assignment (e.g. seasonal peak, replacement).
    pub motive: Option<String>,
    pub status: ContractStatus,
    /// Actual end date, set when the contract is ended early or on time.
    pub ended_on: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContractInput {
    pub employee_id: String,
    pub client_id: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub hourly_rate_cents: u32,
    pub motive: Option<String>,
}

pub fn add_contract(
    contracts: &Store,
    employees: &Store,
    clients: &Store,
    input: ContractInput,
) -> Result<String, error::InterimError> {
    if !employees.has(&input.employee_id) {
        return Err(error::InterimError::NotFound(format!(
            "employee '{}'",
            input.employee_id
        )));
    }
    if !clients.has(&input.client_id) {
        return Err(error::InterimError::NotFound(format!(
            "client '{}'",
            input.client_id
        )));
    }
    if input.position.trim().is_empty() {
        return Err(error::InterimError::ValidationError(
            "contract position must not be empty".to_string(),
        ));
    }
    if input.end_date < input.start_date {
        return Err(error::InterimError::ValidationError(format!(
            "contract end date {} precedes start date {}",
            input.end_date, input.start_date
        )));
    }
    let id = ulid::Ulid::new().to_string();
    let contract = Contract {
        id: id.clone(),
        employee_id: input.employee_id,
        client_id: input.client_id,
        position: input.position,
        start_date: input.start_date,
        end_date: input.end_date,
        hourly_rate_cents: input.hourly_rate_cents,
        motive: input.motive,
        status: ContractStatus::Active,
        ended_on: None,
        created_at: records::now_timestamp(),
    };
    records::put_record(contracts, &id, &contract)?;
    Ok(id)
}

pub fn get_contract(store: &Store, id: &str) -> Result<Option<Contract>, error::InterimError> {
    records::fetch_record(store, id)
}

pub fn list_contracts(store: &Store, status: Option<ContractStatus>) -> Vec<Contract> {
    let all: Vec<Contract> = records::list_records(store);
    match status {
        Some(wanted) => all.into_iter().filter(|c| c.status == wanted).collect(),
        None => all,
    }
}

/// Mark a contract as ended on `date`. Idempotence is not offered here:
/// ending an already-ended contract is a validation error.
pub fn end_contract(store: &Store, id: &str, date: &str) -> Result<(), error::InterimError> {
    let mut contract = get_contract(store, id)?
        .ok_or_else(|| error::InterimError::NotFound(format!("contract '{}'", id)))?;
    if contract.status == ContractStatus::Ended {
        return Err(error::InterimError::ValidationError(format!(
            "contract '{}' is already ended",
            id
        )));
    }
    contract.status = ContractStatus::Ended;
    contract.ended_on = Some(date.to_string());
    records::put_record(store, id, &contract)
}

pub fn remove_contract(store: &Store, id: &str) -> Result<(), error::InterimError> {
    records::remove_record(store, id)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "contract",
        "version": "0.1.0",
        "description": "Temporary-work assignment registry",
        "commands": [
            { "name": "add", "description": "Create a contract", "parameters": ["employee", "client", "position", "start_date", "end_date", "hourly_rate_cents", "motive?"] },
            { "name": "list", "description": "List contracts, optionally by status", "parameters": ["status?"] },
            { "name": "show", "description": "Show one contract", "parameters": ["id"] },
            { "name": "end", "description": "Mark a contract as ended", "parameters": ["id", "date"] },
            { "name": "remove", "description": "Remove a contract", "parameters": ["id"] }
        ],
        "storage": ["store.db (namespace: contracts)"]
    })
}

#[derive(clap::Args, Debug)]
pub struct ContractCli {
    #[clap(subcommand)]
    pub command: ContractCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum ContractCommand {
    /// Create a contract between an employee and a client
    Add {
        /// Employee ID
        #[clap(long)]
        employee: String,
        /// Client ID
        #[clap(long)]
        client: String,
        #[clap(long)]
        position: String,
        /// Start date (YYYY-MM-DD)
        #[clap(long)]
        start_date: String,
        /// Planned end date (YYYY-MM-DD)
        #[clap(long)]
        end_date: String,
        /// Hourly rate in cents
        #[clap(long)]
        hourly_rate_cents: u32,
        /// Legal motive for the assignment
        #[clap(long)]
        motive: Option<String>,
    },
    /// List contracts
    List {
        /// Filter: 'active' or 'ended'
        #[clap(long)]
        status: Option<String>,
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Show one contract
    Show { id: String },
    /// Mark a contract as ended
    End {
        id: String,
        /// Actual end date (YYYY-MM-DD)
        #[clap(long)]
        date: String,
    },
    /// Remove a contract
    Remove { id: String },
}

pub fn run_contract_cli(
    contracts: &Store,
    employees: &Store,
    clients: &Store,
    cli: ContractCli,
) -> Result<(), error::InterimError> {
    match cli.command {
        ContractCommand::Add {
            employee,
            client,
            position,
            start_date,
            end_date,
            hourly_rate_cents,
            motive,
        } => {
            let input = ContractInput {
                employee_id: employee,
                client_id: client,
                position: position.clone(),
                start_date,
                end_date,
                hourly_rate_cents,
                motive,
            };
            let id = add_contract(contracts, employees, clients, input)?;
            println!(
                "{} Contract created: {} (id: {})",
                "✓".bright_green(),
                position,
                id
            );
        }
        ContractCommand::List { status, format } => {
            let wanted = match status.as_deref() {
                Some("active") => Some(ContractStatus::Active),
                Some("ended") => Some(ContractStatus::Ended),
                Some(other) => {
                    return Err(error::InterimError::ValidationError(format!(
                        "unknown contract status '{}'",
                        other
                    )));
                }
                None => None,
            };
            let listed = list_contracts(contracts, wanted);
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&listed).unwrap());
            } else if listed.is_empty() {
                println!("No contracts recorded yet.");
            } else {
                for c in listed {
                    let status = match c.status {
                        ContractStatus::Active => "active".bright_green(),
                        ContractStatus::Ended => "ended".bright_black(),
                    };
                    println!(
                        "{}  {} [{}] {} to {}",
                        c.id.bright_black(),
                        c.position,
                        status,
                        c.start_date,
                        c.end_date
                    );
                }
            }
        }
        ContractCommand::Show { id } => match get_contract(contracts, &id)? {
            Some(c) => println!("{}", serde_json::to_string_pretty(&c).unwrap()),
            None => println!("No contract found for id {}", id),
        },
        ContractCommand::End { id, date } => {
            end_contract(contracts, &id, &date)?;
            println!("{} Contract ended: {} ({})", "✓".bright_green(), id, date);
        }
        ContractCommand::Remove { id } => {
            remove_contract(contracts, &id)?;
            println!("{} Contract removed: {}", "✓".bright_green(), id);
        }
    }
    Ok(())
}
