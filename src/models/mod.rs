//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema
//! PostgreSQL de la portería (todas las tablas llevan `company_id`).

pub mod authorized;
pub mod person;
pub mod vehicle;
pub mod vehicle_person;
pub mod visit;

pub use authorized::{Authorized, AuthorizedSummary, NewAuthorized};
pub use person::{NewPerson, Person, PersonChanges, PersonRef};
pub use vehicle::{NewVehicle, Vehicle};
pub use vehicle_person::VehiclePersonLink;
pub use visit::{
    HistoryWindow, NewVisit, Visit, VisitDetail, VisitDetailRow, VisitEvent, VisitEventType,
    VisitStamp,
};
