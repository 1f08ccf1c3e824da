//! Resolución de entidades por clave natural
//!
//! Busca una persona por nombre o un vehículo por placa dentro de la empresa
//! y la crea si no existe. No hay transacción entre la búsqueda y el alta:
//! si otro request crea la misma fila en paralelo, la restricción única del
//! store devuelve el conflicto tal cual.

use uuid::Uuid;

use crate::models::{NewPerson, NewVehicle};
use crate::repositories::{PersonRepository, VehicleRepository};
use crate::utils::errors::AppResult;
use crate::utils::validation::Plate;

/// Id de la persona `full_name` de la empresa, creándola si hace falta
pub async fn ensure_person<S>(store: &S, company_id: Uuid, full_name: &str) -> AppResult<Uuid>
where
    S: PersonRepository + ?Sized,
{
    if let Some(person) = store.find_person_by_name(company_id, full_name).await? {
        return Ok(person.id);
    }

    let person = store
        .insert_person(company_id, &NewPerson::named(full_name))
        .await?;
    tracing::debug!("👤 Persona '{}' creada ({})", full_name, person.id);
    Ok(person.id)
}

/// Id del vehículo con `plate`, creándolo si hace falta.
///
/// Si ya existe, solo completa modelo y color donde la fila no los tiene.
pub async fn ensure_vehicle<S>(
    store: &S,
    company_id: Uuid,
    plate: &Plate,
    model: Option<&str>,
    color: Option<&str>,
) -> AppResult<Uuid>
where
    S: VehicleRepository + ?Sized,
{
    if let Some(vehicle) = store.find_vehicle_by_plate(company_id, plate).await? {
        let fills_model = vehicle.model.is_none() && model.is_some();
        let fills_color = vehicle.color.is_none() && color.is_some();
        if fills_model || fills_color {
            store.fill_vehicle_details(vehicle.id, model, color).await?;
        }
        return Ok(vehicle.id);
    }

    let vehicle = store
        .insert_vehicle(
            company_id,
            &NewVehicle {
                plate: plate.clone(),
                model: model.map(str::to_string),
                color: color.map(str::to_string),
            },
        )
        .await?;
    tracing::debug!("🚗 Vehículo {} creado ({})", plate, vehicle.id);
    Ok(vehicle.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn plate(value: &str) -> Plate {
        Plate::parse(value).unwrap()
    }

    #[tokio::test]
    async fn test_ensure_person_is_idempotent() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();

        let first = ensure_person(&store, company, "Maria Souza").await.unwrap();
        let second = ensure_person(&store, company, "Maria Souza").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_people(company).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_person_scoped_by_company() {
        let store = MemoryStore::new();
        let a = ensure_person(&store, Uuid::new_v4(), "Maria").await.unwrap();
        let b = ensure_person(&store, Uuid::new_v4(), "Maria").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_ensure_vehicle_fills_only_missing_details() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let abc = plate("ABC1234");

        let id = ensure_vehicle(&store, company, &abc, None, Some("prata"))
            .await
            .unwrap();
        let again = ensure_vehicle(&store, company, &abc, Some("Gol"), Some("preto"))
            .await
            .unwrap();
        assert_eq!(id, again);

        let vehicle = store.find_vehicle(company, id).await.unwrap().unwrap();
        assert_eq!(vehicle.model.as_deref(), Some("Gol"));
        assert_eq!(vehicle.color.as_deref(), Some("prata"));
    }

    #[tokio::test]
    async fn test_ensure_vehicle_keeps_existing_when_nothing_supplied() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let abc = plate("ABC1D23");

        let id = ensure_vehicle(&store, company, &abc, Some("Uno"), None)
            .await
            .unwrap();
        ensure_vehicle(&store, company, &abc, None, None).await.unwrap();

        let vehicle = store.find_vehicle(company, id).await.unwrap().unwrap();
        assert_eq!(vehicle.model.as_deref(), Some("Uno"));
        assert!(vehicle.color.is_none());
    }
}
