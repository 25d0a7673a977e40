//! Employee registry: the temporary workers placed on assignments.

use crate::core::error;
use crate::core::store::Store;
use crate::records;
use colored::Colorize;
use serde::{Deserialize, Serialize};

pub const EMPLOYEE_NAMESPACE: &str = "employees";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub social_security_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub qualification: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub social_security_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub qualification: Option<String>,
}

pub fn add_employee(store: &Store, input: EmployeeInput) -> Result<String, error::InterimError> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(error::InterimError::ValidationError(
            "employee first and last name must not be empty".to_string(),
        ));
    }
    let id = ulid::Ulid::new().to_string();
    let employee = Employee {
        id: id.clone(),
        first_name: input.first_name,
        last_name: input.last_name,
        birth_date: input.birth_date,
        social_security_number: input.social_security_number,
        address: input.address,
        phone: input.phone,
        email: input.email,
        qualification: input.qualification,
        created_at: records::now_timestamp(),
        updated_at: None,
    };
    records::put_record(store, &id, &employee)?;
    Ok(id)
}

pub fn get_employee(store: &Store, id: &str) -> Result<Option<Employee>, error::InterimError> {
    records::fetch_record(store, id)
}

pub fn list_employees(store: &Store) -> Vec<Employee> {
    records::list_records(store)
}

pub fn remove_employee(store: &Store, id: &str) -> Result<(), error::InterimError> {
    records::remove_record(store, id)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "employee",
        "version": "0.1.0",
        "description": "Temporary-worker registry",
        "commands": [
            { "name": "add", "description": "Register an employee", "parameters": ["first_name", "last_name", "birth_date?", "ssn?", "address?", "phone?", "email?", "qualification?"] },
            { "name": "list", "description": "List all employees" },
            { "name": "show", "description": "Show one employee", "parameters": ["id"] },
            { "name": "remove", "description": "Remove an employee", "parameters": ["id"] }
        ],
        "storage": ["store.db (namespace: employees)"]
    })
}

#[derive(clap::Args, Debug)]
pub struct EmployeeCli {
    #[clap(subcommand)]
    pub command: EmployeeCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum EmployeeCommand {
    /// Register an employee
    Add {
        #[clap(long)]
        first_name: String,
        #[clap(long)]
        last_name: String,
        /// Birth date (YYYY-MM-DD)
        #[clap(long)]
        birth_date: Option<String>,
        /// Social security number
        #[clap(long)]
        ssn: Option<String>,
        #[clap(long)]
        address: Option<String>,
        #[clap(long)]
        phone: Option<String>,
        #[clap(long)]
        email: Option<String>,
        /// Trade or qualification (e.g. mason, forklift operator)
        #[clap(long)]
        qualification: Option<String>,
    },
    /// List employees
    List {
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Show one employee
    Show { id: String },
    /// Remove an employee
    Remove { id: String },
}

pub fn run_employee_cli(store: &Store, cli: EmployeeCli) -> Result<(), error::InterimError> {
    match cli.command {
        EmployeeCommand::Add {
            first_name,
            last_name,
            birth_date,
            ssn,
            address,
            phone,
            email,
            qualification,
        } => {
            let input = EmployeeInput {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                birth_date,
                social_security_number: ssn,
                address,
                phone,
                email,
                qualification,
            };
            let id = add_employee(store, input)?;
            println!(
                "{} Employee registered: {} {} (id: {})",
                "✓".bright_green(),
                first_name,
                last_name,
                id
            );
        }
        EmployeeCommand::List { format } => {
            let employees = list_employees(store);
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&employees).unwrap());
            } else if employees.is_empty() {
                println!("No employees registered yet.");
            } else {
                for e in employees {
                    println!(
                        "{}  {} {}{}",
                        e.id.bright_black(),
                        e.first_name,
                        e.last_name,
                        e.qualification
                            .map(|q| format!(" ({})", q))
                            .unwrap_or_default()
                    );
                }
            }
        }
        EmployeeCommand::Show { id } => match get_employee(store, &id)? {
            Some(e) => println!("{}", serde_json::to_string_pretty(&e).unwrap()),
            None => println!("No employee found for id {}", id),
        },
        EmployeeCommand::Remove { id } => {
            remove_employee(store, &id)?;
            println!("{} Employee removed: {}", "✓".bright_green(), id);
        }
    }
    Ok(())
}
