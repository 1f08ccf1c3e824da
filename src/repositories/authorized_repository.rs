use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Authorized, NewAuthorized};
use crate::repositories::{AuthorizedRepository, PgStore};
use crate::utils::errors::AppResult;
use crate::utils::validation::Plate;

#[async_trait]
impl AuthorizedRepository for PgStore {
    async fn list_authorized(&self, company_id: Uuid) -> AppResult<Vec<Authorized>> {
        let entries = sqlx::query_as::<_, Authorized>(
            "SELECT id, plate, name, department FROM authorized WHERE company_id = $1 ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(self.pool())
        .await?;

        Ok(entries)
    }

    async fn find_authorized_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Authorized>> {
        let entry = sqlx::query_as::<_, Authorized>(
            "SELECT id, plate, name, department FROM authorized WHERE company_id = $1 AND plate = $2",
        )
        .bind(company_id)
        .bind(plate.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(entry)
    }

    async fn insert_authorized(
        &self,
        company_id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Authorized> {
        let created = sqlx::query_as::<_, Authorized>(
            r#"
            INSERT INTO authorized (id, company_id, plate, name, department)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, plate, name, department
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(entry.plate.as_str())
        .bind(&entry.name)
        .bind(&entry.department)
        .fetch_one(self.pool())
        .await?;

        Ok(created)
    }

    async fn update_authorized(
        &self,
        company_id: Uuid,
        id: Uuid,
        entry: &NewAuthorized,
    ) -> AppResult<Option<Authorized>> {
        let updated = sqlx::query_as::<_, Authorized>(
            r#"
            UPDATE authorized
            SET plate = $3, name = $4, department = $5
            WHERE company_id = $1 AND id = $2
            RETURNING id, plate, name, department
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(entry.plate.as_str())
        .bind(&entry.name)
        .bind(&entry.department)
        .fetch_optional(self.pool())
        .await?;

        Ok(updated)
    }

    async fn delete_authorized(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authorized WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
