use std::sync::Arc;
use uuid::Uuid;

use crate::models::{NewPerson, Person, PersonChanges};
use crate::repositories::GateStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

const DUPLICATE_DOCUMENT: &str = "Já existe uma pessoa cadastrada com este documento nesta empresa.";
const PERSON_NOT_FOUND: &str = "Pessoa não encontrada.";

pub struct PersonController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
}

impl PersonController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Person>> {
        self.store.list_people(self.company_id).await
    }

    pub async fn create(&self, person: NewPerson) -> AppResult<Person> {
        let created = self
            .store
            .insert_person(self.company_id, &person)
            .await
            .map_err(|e| e.on_conflict(DUPLICATE_DOCUMENT))?;

        tracing::info!("👤 Persona registrada: {} ({})", created.full_name, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, changes: PersonChanges) -> AppResult<Person> {
        self.store
            .update_person(self.company_id, id, &changes)
            .await
            .map_err(|e| e.on_conflict(DUPLICATE_DOCUMENT))?
            .ok_or_else(|| not_found_error(PERSON_NOT_FOUND))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_person(self.company_id, id).await? {
            return Err(not_found_error(PERSON_NOT_FOUND));
        }
        tracing::info!("🗑️ Persona {} eliminada", id);
        Ok(())
    }
}
