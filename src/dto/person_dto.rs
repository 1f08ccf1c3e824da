use serde::Deserialize;
use validator::Validate;

use crate::models::{NewPerson, PersonChanges};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    blank_as_none, nullable_text, only_digits, required, RequestSchema,
};

const FULL_NAME_REQUIRED: &str = "Nome completo é obrigatório.";

/// Request para cadastrar una persona
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Nome muito longo."))]
    pub full_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Documento muito longo."))]
    pub doc_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 30, message = "Telefone muito longo."))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

impl RequestSchema for CreatePersonRequest {
    type Valid = NewPerson;

    fn finish(self) -> AppResult<NewPerson> {
        Ok(NewPerson {
            full_name: required(&self.full_name, FULL_NAME_REQUIRED)?,
            doc_number: self.doc_number,
            phone: self.phone.map(|p| only_digits(&p)).filter(|p| !p.is_empty()),
            email: self.email,
            notes: self.notes,
        })
    }
}

/// Request para actualizar una persona; solo se tocan los campos presentes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePersonRequest {
    #[validate(length(max = 200, message = "Nome muito longo."))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub doc_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub photo_url: Option<Option<String>>,
}

impl RequestSchema for UpdatePersonRequest {
    type Valid = PersonChanges;

    fn finish(self) -> AppResult<PersonChanges> {
        let full_name = match self.full_name {
            Some(name) => Some(required(&name, FULL_NAME_REQUIRED)?),
            None => None,
        };

        if let Some(Some(email)) = &self.email {
            if !validator::validate_email(email) {
                return Err(AppError::BadRequest("E-mail inválido.".to_string()));
            }
        }
        if let Some(Some(url)) = &self.photo_url {
            if !validator::validate_url(url) {
                return Err(AppError::BadRequest("URL da foto inválida.".to_string()));
            }
        }

        let phone = self
            .phone
            .map(|p| p.map(|p| only_digits(&p)).filter(|p| !p.is_empty()));

        Ok(PersonChanges {
            full_name,
            doc_number: self.doc_number,
            phone,
            email: self.email,
            notes: self.notes,
            photo_url: self.photo_url,
        })
    }
}
