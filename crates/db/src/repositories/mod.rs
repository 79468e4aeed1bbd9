//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. The approval orchestrator lives in `request`.

pub mod balance;
pub mod country;
pub mod employee;
pub mod policy;
pub mod request;

pub use balance::{BalanceError, BalanceRepository, RecalculationSummary};
pub use country::{CountryError, CountryRepository, CreateCountryInput, UpdateCountryInput};
pub use employee::{
    CreateEmployeeInput, EmployeeError, EmployeeRepository, UpdateEmployeeInput,
};
pub use policy::{CreatePolicyEntryInput, PolicyError, PolicyRepository, UpdatePolicyEntryInput};
pub use request::{
    ApprovalOutcome, CreateRequestInput, RequestError, RequestRepository, SweepSummary,
};
