use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewVehicle, Vehicle};
use crate::repositories::{PgStore, VehicleRepository};
use crate::utils::errors::AppResult;
use crate::utils::validation::Plate;

#[async_trait]
impl VehicleRepository for PgStore {
    async fn list_vehicles(&self, company_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT id, plate, model, color FROM vehicles WHERE company_id = $1 ORDER BY plate",
        )
        .bind(company_id)
        .fetch_all(self.pool())
        .await?;

        Ok(vehicles)
    }

    async fn find_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, plate, model, color FROM vehicles WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(vehicle)
    }

    async fn find_vehicle_by_plate(
        &self,
        company_id: Uuid,
        plate: &Plate,
    ) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, plate, model, color FROM vehicles WHERE company_id = $1 AND plate = $2",
        )
        .bind(company_id)
        .bind(plate.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(vehicle)
    }

    async fn insert_vehicle(&self, company_id: Uuid, vehicle: &NewVehicle) -> AppResult<Vehicle> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, company_id, plate, model, color)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, plate, model, color
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(vehicle.plate.as_str())
        .bind(&vehicle.model)
        .bind(&vehicle.color)
        .fetch_one(self.pool())
        .await?;

        Ok(created)
    }

    async fn update_vehicle(
        &self,
        company_id: Uuid,
        id: Uuid,
        vehicle: &NewVehicle,
    ) -> AppResult<Option<Vehicle>> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET plate = $3, model = $4, color = $5
            WHERE company_id = $1 AND id = $2
            RETURNING id, plate, model, color
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(vehicle.plate.as_str())
        .bind(&vehicle.model)
        .bind(&vehicle.color)
        .fetch_optional(self.pool())
        .await?;

        Ok(updated)
    }

    async fn fill_vehicle_details(
        &self,
        id: Uuid,
        model: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET model = COALESCE(model, $2), color = COALESCE(color, $3)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(model)
        .bind(color)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete_vehicle(&self, company_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
