//! Certificate registry: work and end-of-contract certificates issued to
//! employees from an existing contract.

use crate::core::error;
use crate::core::store::Store;
use crate::records;
use crate::records::contract;
use colored::Colorize;
use serde::{Deserialize, Serialize};

pub const CERTIFICATE_NAMESPACE: &str = "certificates";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CertificateKind {
    /// Attestation that the employee currently works (or worked) on the assignment.
    Work,
    /// End-of-contract certificate, issued once the assignment is over.
    EndOfContract,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Certificate {
    pub id: String,
    pub kind: CertificateKind,
    pub contract_id: String,
    /// Copied from the contract at issuance so the certificate stays readable
    /// even if the contract is later removed.
    pub employee_id: String,
    pub client_id: String,
    pub position: String,
    pub period_start: String,
    pub period_end: String,
    pub issued_at: String,
}

/// Issue a certificate from an existing contract. The employee, client, and
/// period are derived from the contract; an end-of-contract certificate
/// requires the contract to be ended first.
pub fn issue_certificate(
    certificates: &Store,
    contracts: &Store,
    contract_id: &str,
    kind: CertificateKind,
) -> Result<String, error::InterimError> {
    let source = contract::get_contract(contracts, contract_id)?
        .ok_or_else(|| error::InterimError::NotFound(format!("contract '{}'", contract_id)))?;

    if kind == CertificateKind::EndOfContract && source.status != contract::ContractStatus::Ended {
        return Err(error::InterimError::ValidationError(format!(
            "contract '{}' is still active; end it before issuing an end-of-contract certificate",
            contract_id
        )));
    }

    let period_end = source.ended_on.clone().unwrap_or(source.end_date.clone());
    let id = ulid::Ulid::new().to_string();
    let certificate = Certificate {
        id: id.clone(),
        kind,
        contract_id: contract_id.to_string(),
        employee_id: source.employee_id,
        client_id: source.client_id,
        position: source.position,
        period_start: source.start_date,
        period_end,
        issued_at: records::now_timestamp(),
    };
    records::put_record(certificates, &id, &certificate)?;
    Ok(id)
}

pub fn get_certificate(store: &Store, id: &str) -> Result<Option<Certificate>, error::InterimError> {
    records::fetch_record(store, id)
}

pub fn list_certificates(store: &Store) -> Vec<Certificate> {
    records::list_records(store)
}

pub fn remove_certificate(store: &Store, id: &str) -> Result<(), error::InterimError> {
    records::remove_record(store, id)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "certificate",
        "version": "0.1.0",
        "description": "Work and end-of-contract certificate registry",
        "commands": [
            { "name": "issue", "description": "Issue a certificate from a contract", "parameters": ["contract", "kind"] },
            { "name": "list", "description": "List certificates" },
            { "name": "show", "description": "Show one certificate", "parameters": ["id"] },
            { "name": "remove", "description": "Remove a certificate", "parameters": ["id"] }
        ],
        "storage": ["store.db (namespace: certificates)"]
    })
}

#[derive(clap::Args, Debug)]
pub struct CertificateCli {
    #[clap(subcommand)]
    pub command: CertificateCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum CertificateCommand {
    /// Issue a certificate from a contract
    Issue {
        /// Contract ID
        #[clap(long)]
        contract: String,
        /// Certificate kind: 'work' or 'end-of-contract'
        #[clap(long, default_value = "work")]
        kind: String,
    },
    /// List certificates
    List {
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Show one certificate
    Show { id: String },
    /// Remove a certificate
    Remove { id: String },
}

pub fn run_certificate_cli(
    certificates: &Store,
    contracts: &Store,
    cli: CertificateCli,
) -> Result<(), error::InterimError> {
    match cli.command {
        CertificateCommand::Issue { contract, kind } => {
            let kind = match kind.as_str() {
                "work" => CertificateKind::Work,
                "end-of-contract" => CertificateKind::EndOfContract,
                other => {
                    return Err(error::InterimError::ValidationError(format!(
                        "unknown certificate kind '{}'",
                        other
                    )));
                }
            };
            let id = issue_certificate(certificates, contracts, &contract, kind)?;
            println!("{} Certificate issued: {}", "✓".bright_green(), id);
        }
        CertificateCommand::List { format } => {
            let listed = list_certificates(certificates);
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&listed).unwrap());
            } else if listed.is_empty() {
                println!("No certificates issued yet.");
            } else {
                for c in listed {
                    let kind = match c.kind {
                        CertificateKind::Work => "work",
                        CertificateKind::EndOfContract => "end-of-contract",
                    };
                    println!(
                        "{}  {} for {} ({} to {})",
                        c.id.bright_black(),
                        kind,
                        c.position,
                        c.period_start,
                        c.period_end
                    );
                }
            }
        }
        CertificateCommand::Show { id } => match get_certificate(certificates, &id)? {
            Some(c) => println!("{}", serde_json::to_string_pretty(&c).unwrap()),
            None => println!("No certificate found for id {}", id),
        },
        CertificateCommand::Remove { id } => {
            remove_certificate(certificates, &id)?;
            println!("{} Certificate removed: {}", "✓".bright_green(), id);
        }
    }
    Ok(())
}
