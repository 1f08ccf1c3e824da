//! Store en memoria
//!
//! Implementa los mismos contratos que `PgStore`, incluidas las restricciones
//! de unicidad del schema, para tests y para levantar el servicio sin base de datos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    visit::{VisitPerson, VisitVehicle},
    Authorized, HistoryWindow, NewAuthorized, NewPerson, NewVehicle, NewVisit, Person,
    PersonChanges, PersonRef, Vehicle, VehiclePersonLink, Visit, VisitDetail, VisitEvent,
    VisitEventType, VisitStamp,
};
use crate::repositories::{
    AuthorizedRepository, PersonRepository, VehiclePeopleRepository, VehicleRepository,
    VisitRepository,
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::Plate;

#[derive(Debug, Clone)]
struct Scoped<T> {
    company_id: Uuid,
    row: T,
}

#[derive(Debug, Clone)]
struct LinkRow {
    company_id: Uuid,
    vehicle_id: Uuid,
    person_id: Uuid,
}

#[derive(Default)]
struct Tables {
    branches: HashMap<Uuid, String>,
    people: Vec<Scoped<Person>>,
    vehicles: Vec<Scoped<Vehicle>>,
    authorized: Vec<Scoped<Authorized>>,
    links: Vec<LinkRow>,
    visits: Vec<Visit>,
    events: Vec<VisitEvent>,
}

impl Tables {
    fn person(&self, id: Uuid) -> Option<&Person> {
        self.people.iter().map(|p| &p.row).find(|p| p.id == id)
    }

    fn vehicle(&self, id: Uuid) -> Option<&Vehicle> {
        self.vehicles.iter().map(|v| &v.row).find(|v| v.id == id)
    }

    fn detail(&self, visit: &Visit) -> VisitDetail {
        VisitDetail {
            id: visit.id,
            checkin_time: visit.checkin_time,
            checkout_time: visit.checkout_time,
            purpose: visit.purpose.clone(),
            person: visit
                .person_id
                .and_then(|id| self.person(id))
                .map(|p| VisitPerson {
                    full_name: p.full_name.clone(),
                    doc_number: p.doc_number.clone(),
                }),
            vehicle: visit
                .vehicle_id
                .and_then(|id| self.vehicle(id))
                .map(|v| VisitVehicle {
                    plate: v.plate.clone(),
                    model: v.model.clone(),
                    color: v.color.clone(),
                }),
            branch_name: self.branches.get(&visit.branch_id).cloned(),
        }
    }

    fn doc_number_taken(&self, company_id: Uuid, doc: &Option<String>, except: Option<Uuid>) -> bool {
        let Some(doc) = doc else {
            return false;
        };
        self.people.iter().any(|p| {
            p.company_id == company_id
                && Some(p.row.id) != except
                && p.row.doc_number.as_deref() == Some(doc.as_str())
        })
    }

    fn plate_taken(&self, company_id: Uuid, plate: &Plate, except: Option<Uuid>) -> bool {
        self.vehicles.iter().any(|v| {
            v.company_id == company_id && Some(v.row.id) != except && v.row.plate == plate.as_str()
        })
    }

    fn authorized_plate_taken(&self, company_id: Uuid, plate: &Plate, except: Option<Uuid>) -> bool {
        self.authorized.iter().any(|a| {
            a.company_id == company_id && Some(a.row.id) != except && a.row.plate == plate.as_str()
        })
    }

    fn sorted_desc(&self, mut visits: Vec<&Visit>) -> Vec<VisitDetail> {
        visits.sort_by(|a, b| b.checkin_time.cmp(&a.checkin_time));
        visits.into_iter().map(|v| self.detail(v)).collect()
    }
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::UniqueViolation(constraint.to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra el nombre de una filial (la tabla `branches` es de solo lectura en la API)
    pub async fn insert_branch(&self, branch_id: Uuid, name: &str) {
        let mut tables = self.tables.write().await;
        tables.branches.insert(branch_id, name.to_string());
    }

    /// Copia del log de eventos, en orden de inserción
    pub async fn events(&self) -> Vec<VisitEvent> {
        self.tables.read().await.events.clone()
    }

    /// Fija la hora de entrada de una visita existente
    pub async fn set_checkin_time(&self, visit_id: Uuid, at: DateTime<Utc>) -> bool {
        let mut tables = self.tables.write().await;
        match tables.visits.iter_mut().find(|v| v.id == visit_id) {
            Some(visit) => {
                visit.checkin_time = at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl PersonRepository for MemoryStore {
    async fn list_people(&self, company_id: Uuid) -> AppResult<Vec<Person>> {
        let tables = self.tables.read().await;
        let mut people: Vec<Person> = tables
            .people
            .iter()
            .filter(|p| p.company_id == company_id)
            .map(|p| p.row.clone())
            .collect();
        people.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(people)
    }

    async fn find_person(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Person>> {
        let tables = self.tables.read().await;
        Ok(tables
            .people
            .iter()
            .find(|p| p.company_id == company_id && p.row.id == id)
            .map(|p| p.row.clone()))
    }

    async fn find_person_by_name(
        &self,
        company_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<Person>> {
        let tables = self.tables.read().await;
        Ok(tables
            .people
            .iter()
            .find(|p| p.company_id == company_id && p.row.full_name == full_name)
            .map(|p| p.row.clone()))
    }

    async fn insert_person(&self, company_id: Uuid, person: &NewPerson) -> AppResult<Person> {
        let mut tables = self.tables.write().await;
        if tables.doc_number_taken(company_id, &person.doc_number, None) {
            return Err(unique_violation("people_company_doc_number_key"));
        }

        let row = Person {
            id: Uuid::new_v4(),
            full_name: person.full_name.clone(),
            doc_number: person.doc_number.clone(),
            phone: person.phone.clone(),
            email: person.email.clone(),
            notes: person.notes.clone(),
            photo_url: None,
        };
        tables.people.push(Scoped {
            company_id,
            row: row.clone(),
        });
        Ok(row)
    }

    async fn update_person(
        &self,
        company_id: Uuid,
        id: Uuid,
        changes: &PersonChanges,
    ) -> AppResult<Option<Person>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .people
            .iter()
            .position(|p| p.company_id == company_id && p.row.id == id)
        else {
            return Ok(None);
        };

        let mut updated = tables.people[index].row.clone();
        changes.apply_to(&mut updated);
        if tables.doc_number_taken(company_id, &updated.doc_number, Some(id)) {
            return Err(unique_violation("people_company_doc_number_key"));
        }

        tables.people[index].row = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_person(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.people.len();
        tables
            .people
            .retain(|p| !(p.company_id == company_id && p.row.id == id));
        let deleted = tables.people.len() < before;
        if deleted {
            tables.links.retain(|l| l.person_id != id);
            for visit in tables.visits.iter_mut().filter(|v| v.person_id == Some(id)) {
                visit.person_id = None;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn list_vehicles(&self, company_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables
            .vehicles
            .iter()
            .filter(|v| v.company_id == company_id)
            .map(|v| v.row.clone())
            .collect();
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(vehicles)
    }

    async fn find_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .iter()
            .find(|v| v.company_id == company_id && v.row.id == id)
            .map(|v| v.row.clone()))
    }

    async fn find_vehicle_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .iter()
            .find(|v| v.company_id == company_id && v.row.plate == plate.as_str())
            .map(|v| v.row.clone()))
    }

    async fn insert_vehicle(&self, company_id: Uuid, vehicle: &NewVehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables.plate_taken(company_id, &vehicle.plate, None) {
            return Err(unique_violation("vehicles_company_plate_key"));
        }

        let row = Vehicle {
            id: Uuid::new_v4(),
            plate: vehicle.plate.to_string(),
            model: vehicle.model.clone(),
            color: vehicle.color.clone(),
        };
        tables.vehicles.push(Scoped {
            company_id,
            row: row.clone(),
        });
        Ok(row)
    }

    async fn update_vehicle(
        &self,
        company_id: Uuid,
        id: Uuid,
        vehicle: &NewVehicle,
    ) -> AppResult<Option<Vehicle>> {
        let mut tables = self.tables.write().await;
        if tables.plate_taken(company_id, &vehicle.plate, Some(id)) {
            return Err(unique_violation("vehicles_company_plate_key"));
        }

        let Some(entry) = tables
            .vehicles
            .iter_mut()
            .find(|v| v.company_id == company_id && v.row.id == id)
        else {
            return Ok(None);
        };
        entry.row.plate = vehicle.plate.to_string();
        entry.row.model = vehicle.model.clone();
        entry.row.color = vehicle.color.clone();
        Ok(Some(entry.row.clone()))
    }

    async fn fill_vehicle_details(
        &self,
        id: Uuid,
        model: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(entry) = tables.vehicles.iter_mut().find(|v| v.row.id == id) {
            if entry.row.model.is_none() {
                entry.row.model = model.map(str::to_string);
            }
            if entry.row.color.is_none() {
                entry.row.color = color.map(str::to_string);
            }
        }
        Ok(())
    }

    async fn delete_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.vehicles.len();
        tables
            .vehicles
            .retain(|v| !(v.company_id == company_id && v.row.id == id));
        let deleted = tables.vehicles.len() < before;
        if deleted {
            tables.links.retain(|l| l.vehicle_id != id);
            for visit in tables.visits.iter_mut().filter(|v| v.vehicle_id == Some(id)) {
                visit.vehicle_id = None;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl AuthorizedRepository for MemoryStore {
    async fn list_authorized(&self, company_id: Uuid) -> AppResult<Vec<Authorized>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<Authorized> = tables
            .authorized
            .iter()
            .filter(|a| a.company_id == company_id)
            .map(|a| a.row.clone())
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn find_authorized_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Authorized>> {
        let tables = self.tables.read().await;
        Ok(tables
            .authorized
            .iter()
            .find(|a| a.company_id == company_id && a.row.plate == plate.as_str())
            .map(|a| a.row.clone()))
    }

    async fn insert_authorized(
        &self,
        company_id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Authorized> {
        let mut tables = self.tables.write().await;
        if tables.authorized_plate_taken(company_id, &entry.plate, None) {
            return Err(unique_violation("authorized_company_plate_key"));
        }

        let row = Authorized {
            id: Uuid::new_v4(),
            plate: entry.plate.to_string(),
            name: entry.name.clone(),
            department: entry.department.clone(),
        };
        tables.authorized.push(Scoped {
            company_id,
            row: row.clone(),
        });
        Ok(row)
    }

    async fn update_authorized(
        &self,
        company_id: Uuid,
        id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Option<Authorized>> {
        let mut tables = self.tables.write().await;
        if tables.authorized_plate_taken(company_id, &entry.plate, Some(id)) {
            return Err(unique_violation("authorized_company_plate_key"));
        }

        let Some(existing) = tables
            .authorized
            .iter_mut()
            .find(|a| a.company_id == company_id && a.row.id == id)
        else {
            return Ok(None);
        };
        existing.row.plate = entry.plate.to_string();
        existing.row.name = entry.name.clone();
        existing.row.department = entry.department.clone();
        Ok(Some(existing.row.clone()))
    }

    async fn delete_authorized(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.authorized.len();
        tables
            .authorized
            .retain(|a| !(a.company_id == company_id && a.row.id == id));
        Ok(tables.authorized.len() < before)
    }
}

#[async_trait]
impl VehiclePeopleRepository for MemoryStore {
    async fn list_links(
        &self,
        company_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<Vec<VehiclePersonLink>> {
        let tables = self.tables.read().await;
        let mut links: Vec<VehiclePersonLink> = tables
            .links
            .iter()
            .filter(|l| l.company_id == company_id)
            .filter(|l| vehicle_id.map_or(true, |id| l.vehicle_id == id))
            .filter_map(|l| {
                tables.person(l.person_id).map(|p| VehiclePersonLink {
                    vehicle_id: l.vehicle_id,
                    person_id: l.person_id,
                    person: PersonRef::from(p),
                })
            })
            .collect();
        links.sort_by(|a, b| a.person.full_name.cmp(&b.person.full_name));
        Ok(links)
    }

    async fn link(&self, company_id: Uuid, vehicle_id: Uuid, person_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .links
            .iter()
            .any(|l| l.vehicle_id == vehicle_id && l.person_id == person_id)
        {
            return Err(unique_violation("vehicle_people_pkey"));
        }
        if tables.vehicle(vehicle_id).is_none() || tables.person(person_id).is_none() {
            return Err(AppError::BadRequest(
                "Veículo ou pessoa inexistente.".to_string(),
            ));
        }
        tables.links.push(LinkRow {
            company_id,
            vehicle_id,
            person_id,
        });
        Ok(())
    }

    async fn unlink(
        &self,
        company_id: Uuid,
        vehicle_id: Uuid,
        person_id: Uuid,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.links.len();
        tables.links.retain(|l| {
            !(l.company_id == company_id && l.vehicle_id == vehicle_id && l.person_id == person_id)
        });
        Ok(tables.links.len() < before)
    }

    async fn people_for_vehicle(
        &self,
        company_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Vec<PersonRef>> {
        let links = self.list_links(company_id, Some(vehicle_id)).await?;
        Ok(links.into_iter().map(|l| l.person).collect())
    }
}

#[async_trait]
impl VisitRepository for MemoryStore {
    async fn find_visit(&self, id: Uuid) -> AppResult<Option<Visit>> {
        let tables = self.tables.read().await;
        Ok(tables.visits.iter().find(|v| v.id == id).cloned())
    }

    async fn find_open_visit(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Option<Visit>> {
        let tables = self.tables.read().await;
        Ok(tables
            .visits
            .iter()
            .find(|v| {
                v.belongs_to(company_id, branch_id)
                    && v.vehicle_id == Some(vehicle_id)
                    && v.is_open()
            })
            .cloned())
    }

    async fn open_visit(&self, visit: &NewVisit) -> AppResult<Visit> {
        let mut tables = self.tables.write().await;
        if let Some(vehicle_id) = visit.vehicle_id {
            let open_exists = tables.visits.iter().any(|v| {
                v.belongs_to(visit.company_id, visit.branch_id)
                    && v.vehicle_id == Some(vehicle_id)
                    && v.is_open()
            });
            if open_exists {
                return Err(unique_violation("visits_open_vehicle_key"));
            }
        }

        let created = Visit {
            id: Uuid::new_v4(),
            company_id: visit.company_id,
            branch_id: visit.branch_id,
            person_id: visit.person_id,
            vehicle_id: visit.vehicle_id,
            purpose: visit.purpose.clone(),
            checkin_time: Utc::now(),
            checkout_time: None,
        };
        tables.visits.push(created.clone());
        tables.events.push(VisitEvent {
            visit_id: Some(created.id),
            event_type: VisitEventType::Checkin,
            meta: serde_json::json!({}),
        });
        Ok(created)
    }

    async fn close_visit(
        &self,
        id: Uuid,
        company_id: Uuid,
        branch_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Visit>> {
        let mut tables = self.tables.write().await;
        let Some(visit) = tables
            .visits
            .iter_mut()
            .find(|v| v.id == id && v.belongs_to(company_id, branch_id) && v.is_open())
        else {
            return Ok(None);
        };
        visit.checkout_time = Some(at);
        let closed = visit.clone();

        tables.events.push(VisitEvent {
            visit_id: Some(closed.id),
            event_type: VisitEventType::Checkout,
            meta: serde_json::json!({}),
        });
        Ok(Some(closed))
    }

    async fn list_open_visits(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
    ) -> AppResult<Vec<VisitDetail>> {
        let tables = self.tables.read().await;
        let open: Vec<&Visit> = tables
            .visits
            .iter()
            .filter(|v| v.belongs_to(company_id, branch_id) && v.is_open())
            .collect();
        Ok(tables.sorted_desc(open))
    }

    async fn visit_history(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        window: &HistoryWindow,
    ) -> AppResult<(Vec<VisitDetail>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<&Visit> = tables
            .visits
            .iter()
            .filter(|v| {
                v.belongs_to(company_id, branch_id)
                    && window.matches(v.checkin_time, v.checkout_time)
            })
            .collect();
        let total = matching.len() as i64;

        let page = tables
            .sorted_desc(matching)
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn recent_visits_for_vehicle(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<VisitStamp>> {
        let tables = self.tables.read().await;
        let visits: Vec<&Visit> = tables
            .visits
            .iter()
            .filter(|v| v.belongs_to(company_id, branch_id) && v.vehicle_id == Some(vehicle_id))
            .collect();
        Ok(tables
            .sorted_desc(visits)
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|d| VisitStamp {
                id: d.id,
                checkin_time: d.checkin_time,
                checkout_time: d.checkout_time,
            })
            .collect())
    }

    async fn visit_detail(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<VisitDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .visits
            .iter()
            .find(|v| v.company_id == company_id && v.id == id)
            .map(|v| tables.detail(v)))
    }

    async fn record_event(
        &self,
        visit_id: Option<Uuid>,
        event_type: VisitEventType,
        meta: serde_json::Value,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.events.push(VisitEvent {
            visit_id,
            event_type,
            meta,
        });
        Ok(())
    }
}
