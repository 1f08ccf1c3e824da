use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{PersonRef, VehiclePersonLink};
use crate::repositories::{PgStore, VehiclePeopleRepository};
use crate::utils::errors::AppResult;

#[derive(Debug, FromRow)]
struct LinkRow {
    vehicle_id: Uuid,
    person_id: Uuid,
    full_name: String,
}

impl From<LinkRow> for VehiclePersonLink {
    fn from(row: LinkRow) -> Self {
        Self {
            vehicle_id: row.vehicle_id,
            person_id: row.person_id,
            person: PersonRef {
                id: row.person_id,
                full_name: row.full_name,
            },
        }
    }
}

#[async_trait]
impl VehiclePeopleRepository for PgStore {
    async fn list_links(
        &self,
        company_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<Vec<VehiclePersonLink>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT vp.vehicle_id, vp.person_id, p.full_name
            FROM vehicle_people vp
            JOIN people p ON p.id = vp.person_id
            WHERE vp.company_id = $1
              AND ($2::uuid IS NULL OR vp.vehicle_id = $2)
            ORDER BY p.full_name
            "#,
        )
        .bind(company_id)
        .bind(vehicle_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(VehiclePersonLink::from).collect())
    }

    async fn link(&self, company_id: Uuid, vehicle_id: Uuid, person_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO vehicle_people (company_id, vehicle_id, person_id) VALUES ($1, $2, $3)",
        )
        .bind(company_id)
        .bind(vehicle_id)
        .bind(person_id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn unlink(
        &self,
        company_id: Uuid,
        vehicle_id: Uuid,
        person_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM vehicle_people WHERE company_id = $1 AND vehicle_id = $2 AND person_id = $3",
        )
        .bind(company_id)
        .bind(vehicle_id)
        .bind(person_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn people_for_vehicle(
        &self,
        company_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Vec<PersonRef>> {
        let people = sqlx::query_as::<_, PersonRef>(
            r#"
            SELECT p.id, p.full_name
            FROM vehicle_people vp
            JOIN people p ON p.id = vp.person_id
            WHERE vp.company_id = $1 AND vp.vehicle_id = $2
            ORDER BY p.full_name
            "#,
        )
        .bind(company_id)
        .bind(vehicle_id)
        .fetch_all(self.pool())
        .await?;

        Ok(people)
    }
}
