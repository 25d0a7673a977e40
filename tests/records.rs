use interim::core::backing::{BackingMap, MemoryMap};
use interim::core::error::InterimError;
use interim::records;
use interim::records::certificate::{self, CertificateKind};
use interim::records::client::{self, ClientInput};
use interim::records::contract::{self, ContractInput, ContractStatus};
use interim::records::employee::{self, EmployeeInput};
use std::sync::Arc;

struct Fixture {
    employees: interim::core::store::Store,
    clients: interim::core::store::Store,
    contracts: interim::core::store::Store,
    certificates: interim::core::store::Store,
}

fn fixture() -> Fixture {
    let backing: Arc<dyn BackingMap> = Arc::new(MemoryMap::new());
    Fixture {
        employees: records::open_registry(&backing, employee::EMPLOYEE_NAMESPACE)
            .expect("employees registry"),
        clients: records::open_registry(&backing, client::CLIENT_NAMESPACE)
            .expect("clients registry"),
        contracts: records::open_registry(&backing, contract::CONTRACT_NAMESPACE)
            .expect("contracts registry"),
        certificates: records::open_registry(&backing, certificate::CERTIFICATE_NAMESPACE)
            .expect("certificates registry"),
    }
}

fn sample_employee() -> EmployeeInput {
    EmployeeInput {
        first_name: "Jean".to_string(),
        last_name: "Moreau".to_string(),
        birth_date: Some("1988-04-02".to_string()),
        social_security_number: None,
        address: None,
        phone: Some("0601020304".to_string()),
        email: None,
        qualification: Some("mason".to_string()),
    }
}

fn sample_client() -> ClientInput {
    ClientInput {
        company_name: "BTP Atlantique".to_string(),
        siret: Some("73282932000074".to_string()),
        contact_name: Some("M. Leroy".to_string()),
        address: None,
        phone: None,
        email: None,
    }
}

fn sample_contract(employee_id: &str, client_id: &str) -> ContractInput {
    ContractInput {
        employee_id: employee_id.to_string(),
        client_id: client_id.to_string(),
        position: "mason".to_string(),
        start_date: "2026-09-01".to_string(),
        end_date: "2026-12-19".to_string(),
        hourly_rate_cents: 1480,
        motive: Some("seasonal peak".to_string()),
    }
}

#[test]
fn employee_crud_round_trip() {
    let fx = fixture();

    let id = employee::add_employee(&fx.employees, sample_employee()).expect("add");
    let fetched = employee::get_employee(&fx.employees, &id)
        .expect("get")
        .expect("present");
    assert_eq!(fetched.first_name, "Jean");
    assert_eq!(fetched.qualification.as_deref(), Some("mason"));

    assert_eq!(employee::list_employees(&fx.employees).len(), 1);

    employee::remove_employee(&fx.employees, &id).expect("remove");
    assert!(
        employee::get_employee(&fx.employees, &id)
            .expect("get after remove")
            .is_none()
    );
}

#[test]
fn removing_unknown_record_is_not_found() {
    let fx = fixture();
    let err = employee::remove_employee(&fx.employees, "nope").unwrap_err();
    assert!(matches!(err, InterimError::NotFound(_)));
}

#[test]
fn employee_name_is_required() {
    let fx = fixture();
    let mut input = sample_employee();
    input.first_name = "  ".to_string();
    let err = employee::add_employee(&fx.employees, input).unwrap_err();
    assert!(matches!(err, InterimError::ValidationError(_)));
}

#[test]
fn contract_requires_existing_employee_and_client() {
    let fx = fixture();
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");

    let err = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract("ghost-employee", &client_id),
    )
    .unwrap_err();
    assert!(matches!(err, InterimError::NotFound(_)));

    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let err = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract(&employee_id, "ghost-client"),
    )
    .unwrap_err();
    assert!(matches!(err, InterimError::NotFound(_)));
}

#[test]
fn contract_dates_must_be_ordered() {
    let fx = fixture();
    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");

    let mut input = sample_contract(&employee_id, &client_id);
    input.end_date = "2026-01-01".to_string();
    let err = contract::add_contract(&fx.contracts, &fx.employees, &fx.clients, input).unwrap_err();
    assert!(matches!(err, InterimError::ValidationError(_)));
}

#[test]
fn contract_lifecycle_and_status_filter() {
    let fx = fixture();
    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");

    let first = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract(&employee_id, &client_id),
    )
    .expect("first contract");
    let second = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract(&employee_id, &client_id),
    )
    .expect("second contract");

    contract::end_contract(&fx.contracts, &first, "2026-11-30").expect("end");

    let active = contract::list_contracts(&fx.contracts, Some(ContractStatus::Active));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second);

    let ended = contract::list_contracts(&fx.contracts, Some(ContractStatus::Ended));
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].ended_on.as_deref(), Some("2026-11-30"));

    // Ending twice is refused.
    let err = contract::end_contract(&fx.contracts, &first, "2026-12-01").unwrap_err();
    assert!(matches!(err, InterimError::ValidationError(_)));
}

#[test]
fn work_certificate_issues_from_active_contract() {
    let fx = fixture();
    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");
    let contract_id = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract(&employee_id, &client_id),
    )
    .expect("contract");

    let cert_id = certificate::issue_certificate(
        &fx.certificates,
        &fx.contracts,
        &contract_id,
        CertificateKind::Work,
    )
    .expect("work certificate");

    let cert = certificate::get_certificate(&fx.certificates, &cert_id)
        .expect("get")
        .expect("present");
    assert_eq!(cert.employee_id, employee_id);
    assert_eq!(cert.client_id, client_id);
    assert_eq!(cert.period_start, "2026-09-01");
    assert_eq!(cert.period_end, "2026-12-19");
}

#[test]
fn end_of_contract_certificate_requires_ended_contract() {
    let fx = fixture();
    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");
    let contract_id = contract::add_contract(
        &fx.contracts,
        &fx.employees,
        &fx.clients,
        sample_contract(&employee_id, &client_id),
    )
    .expect("contract");

    let err = certificate::issue_certificate(
        &fx.certificates,
        &fx.contracts,
        &contract_id,
        CertificateKind::EndOfContract,
    )
    .unwrap_err();
    assert!(matches!(err, InterimError::ValidationError(_)));

    contract::end_contract(&fx.contracts, &contract_id, "2026-11-30").expect("end");
    let cert_id = certificate::issue_certificate(
        &fx.certificates,
        &fx.contracts,
        &contract_id,
        CertificateKind::EndOfContract,
    )
    .expect("end-of-contract certificate");

    let cert = certificate::get_certificate(&fx.certificates, &cert_id)
        .expect("get")
        .expect("present");
    // The actual end date wins over the planned one.
    assert_eq!(cert.period_end, "2026-11-30");
}

#[test]
fn registries_share_one_backing_map_without_interference() {
    let fx = fixture();
    let employee_id = employee::add_employee(&fx.employees, sample_employee()).expect("employee");
    let client_id = client::add_client(&fx.clients, sample_client()).expect("client");

    // Clearing one registry must not touch the others.
    fx.contracts.clear();
    assert!(fx.employees.has(&employee_id));
    assert!(fx.clients.has(&client_id));
}
