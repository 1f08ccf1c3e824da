//! Repositorios
//!
//! Cada entidad tiene su trait de acceso a datos. `GateStore` los agrupa y es
//! el handle que se inyecta en `AppState`. Hay dos implementaciones:
//! `PgStore` (PostgreSQL vía sqlx) y `MemoryStore` (tests y desarrollo local).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Authorized, HistoryWindow, NewAuthorized, NewPerson, NewVehicle, NewVisit, Person,
    PersonChanges, PersonRef, Vehicle, VehiclePersonLink, Visit, VisitDetail, VisitEventType,
    VisitStamp,
};
use crate::utils::errors::AppResult;
use crate::utils::validation::Plate;

pub mod authorized_repository;
pub mod memory;
pub mod person_repository;
pub mod vehicle_people_repository;
pub mod vehicle_repository;
pub mod visit_repository;

pub use memory::MemoryStore;

/// Store PostgreSQL; las implementaciones viven en los `*_repository.rs`
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn list_people(&self, company_id: Uuid) -> AppResult<Vec<Person>>;

    async fn find_person(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Person>>;

    async fn find_person_by_name(
        &self,
        company_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<Person>>;

    async fn insert_person(&self, company_id: Uuid, person: &NewPerson) -> AppResult<Person>;

    async fn update_person(
        &self,
        company_id: Uuid,
        id: Uuid,
        changes: &PersonChanges,
    ) -> AppResult<Option<Person>>;

    async fn delete_person(&self, company_id: Uuid, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list_vehicles(&self, company_id: Uuid) -> AppResult<Vec<Vehicle>>;

    async fn find_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn find_vehicle_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Vehicle>>;

    async fn insert_vehicle(&self, company_id: Uuid, vehicle: &NewVehicle) -> AppResult<Vehicle>;

    /// Reemplaza placa, modelo y color
    async fn update_vehicle(
        &self,
        company_id: Uuid,
        id: Uuid,
        vehicle: &NewVehicle,
    ) -> AppResult<Option<Vehicle>>;

    /// Completa modelo/color solo donde la fila no los tiene
    async fn fill_vehicle_details(
        &self,
        id: Uuid,
        model: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<()>;

    async fn delete_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait AuthorizedRepository: Send + Sync {
    async fn list_authorized(&self, company_id: Uuid) -> AppResult<Vec<Authorized>>;

    async fn find_authorized_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Authorized>>;

    async fn insert_authorized(
        &self,
        company_id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Authorized>;

    async fn update_authorized(
        &self,
        company_id: Uuid,
        id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Option<Authorized>>;

    async fn delete_authorized(&self, company_id: Uuid, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait VehiclePeopleRepository: Send + Sync {
    async fn list_links(
        &self,
        company_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<Vec<VehiclePersonLink>>;

    async fn link(&self, company_id: Uuid, vehicle_id: Uuid, person_id: Uuid) -> AppResult<()>;

    async fn unlink(&self, company_id: Uuid, vehicle_id: Uuid, person_id: Uuid)
        -> AppResult<bool>;

    async fn people_for_vehicle(
        &self,
        company_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Vec<PersonRef>>;
}

#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Búsqueda sin filtro de empresa; el llamador verifica la pertenencia
    async fn find_visit(&self, id: Uuid) -> AppResult<Option<Visit>>;

    async fn find_open_visit(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Option<Visit>>;

    /// Inserta la visita y su evento `checkin` en una sola transacción
    async fn open_visit(&self, visit: &NewVisit) -> AppResult<Visit>;

    /// Cierra una visita abierta y registra el evento `checkout` en la misma
    /// transacción. Devuelve `None` si la visita ya estaba cerrada.
    async fn close_visit(
        &self,
        id: Uuid,
        company_id: Uuid,
        branch_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Visit>>;

    async fn list_open_visits(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
    ) -> AppResult<Vec<VisitDetail>>;

    /// Página del historial y total de coincidencias
    async fn visit_history(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        window: &HistoryWindow,
    ) -> AppResult<(Vec<VisitDetail>, i64)>;

    async fn recent_visits_for_vehicle(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<VisitStamp>>;

    async fn visit_detail(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<VisitDetail>>;

    async fn record_event(
        &self,
        visit_id: Option<Uuid>,
        event_type: VisitEventType,
        meta: serde_json::Value,
    ) -> AppResult<()>;
}

/// Handle completo de persistencia
pub trait GateStore:
    PersonRepository
    + VehicleRepository
    + AuthorizedRepository
    + VehiclePeopleRepository
    + VisitRepository
{
}

impl<T> GateStore for T where
    T: PersonRepository
        + VehicleRepository
        + AuthorizedRepository
        + VehiclePeopleRepository
        + VisitRepository
{
}
