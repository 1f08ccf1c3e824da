//! Modelo de Person
//!
//! Persona registrada en la portería. Mapea a la tabla `people`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Person principal - mapea a la tabla people
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: Uuid,
    pub full_name: String,
    pub doc_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

/// Referencia corta usada en vínculos y consultas por placa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PersonRef {
    pub id: Uuid,
    pub full_name: String,
}

impl From<&Person> for PersonRef {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            full_name: person.full_name.clone(),
        }
    }
}

/// Datos validados para insertar una persona
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPerson {
    pub full_name: String,
    pub doc_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl NewPerson {
    /// Persona mínima creada por resolución de nombre
    pub fn named(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            ..Default::default()
        }
    }
}

/// Cambios parciales sobre una persona; `None` conserva el valor actual.
/// En los campos anidados `Some(None)` limpia el valor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonChanges {
    pub full_name: Option<String>,
    pub doc_number: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
}

impl PersonChanges {
    pub fn apply_to(&self, person: &mut Person) {
        if let Some(full_name) = &self.full_name {
            person.full_name = full_name.clone();
        }
        if let Some(doc_number) = &self.doc_number {
            person.doc_number = doc_number.clone();
        }
        if let Some(phone) = &self.phone {
            person.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            person.email = email.clone();
        }
        if let Some(notes) = &self.notes {
            person.notes = notes.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            person.photo_url = photo_url.clone();
        }
    }
}
