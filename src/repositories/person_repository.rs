use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewPerson, Person, PersonChanges};
use crate::repositories::{PersonRepository, PgStore};
use crate::utils::errors::AppResult;

const PERSON_COLUMNS: &str = "id, full_name, doc_number, phone, email, notes, photo_url";

#[async_trait]
impl PersonRepository for PgStore {
    async fn list_people(&self, company_id: Uuid) -> AppResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {} FROM people WHERE company_id = $1 ORDER BY full_name",
            PERSON_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(self.pool())
        .await?;

        Ok(people)
    }

    async fn find_person(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {} FROM people WHERE company_id = $1 AND id = $2",
            PERSON_COLUMNS
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(person)
    }

    async fn find_person_by_name(
        &self,
        company_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<Person>> {
        // Puede haber homónimos con documentos distintos; se toma el más antiguo
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {} FROM people WHERE company_id = $1 AND full_name = $2 \
             ORDER BY created_at LIMIT 1",
            PERSON_COLUMNS
        ))
        .bind(company_id)
        .bind(full_name)
        .fetch_optional(self.pool())
        .await?;

        Ok(person)
    }

    async fn insert_person(&self, company_id: Uuid, person: &NewPerson) -> AppResult<Person> {
        let created = sqlx::query_as::<_, Person>(&format!(
            r#"
            INSERT INTO people (id, company_id, full_name, doc_number, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PERSON_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&person.full_name)
        .bind(&person.doc_number)
        .bind(&person.phone)
        .bind(&person.email)
        .bind(&person.notes)
        .fetch_one(self.pool())
        .await?;

        Ok(created)
    }

    async fn update_person(
        &self,
        company_id: Uuid,
        id: Uuid,
        changes: &PersonChanges,
    ) -> AppResult<Option<Person>> {
        let mut tx = self.pool().begin().await?;

        let current = sqlx::query_as::<_, Person>(&format!(
            "SELECT {} FROM people WHERE company_id = $1 AND id = $2 FOR UPDATE",
            PERSON_COLUMNS
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut person) = current else {
            return Ok(None);
        };
        changes.apply_to(&mut person);

        let updated = sqlx::query_as::<_, Person>(&format!(
            r#"
            UPDATE people
            SET full_name = $3, doc_number = $4, phone = $5, email = $6, notes = $7, photo_url = $8
            WHERE company_id = $1 AND id = $2
            RETURNING {}
            "#,
            PERSON_COLUMNS
        ))
        .bind(company_id)
        .bind(id)
        .bind(&person.full_name)
        .bind(&person.doc_number)
        .bind(&person.phone)
        .bind(&person.email)
        .bind(&person.notes)
        .bind(&person.photo_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_person(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM people WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
