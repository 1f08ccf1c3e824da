use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::models::{
    HistoryWindow, NewVisit, Visit, VisitDetail, VisitDetailRow, VisitEventType, VisitStamp,
};
use crate::repositories::{PgStore, VisitRepository};
use crate::utils::errors::AppResult;

const VISIT_COLUMNS: &str =
    "id, company_id, branch_id, person_id, vehicle_id, purpose, checkin_time, checkout_time";

/// SELECT base con persona, vehículo y filial
const DETAIL_SELECT: &str = r#"
    SELECT v.id, v.checkin_time, v.checkout_time, v.purpose,
           p.full_name AS person_full_name, p.doc_number AS person_doc_number,
           ve.plate AS vehicle_plate, ve.model AS vehicle_model, ve.color AS vehicle_color,
           b.name AS branch_name
    FROM visits v
    LEFT JOIN people p ON p.id = v.person_id
    LEFT JOIN vehicles ve ON ve.id = v.vehicle_id
    LEFT JOIN branches b ON b.id = v.branch_id
"#;

const HISTORY_FILTER: &str = r#"
    WHERE v.company_id = $1 AND v.branch_id = $2
      AND ((v.checkin_time BETWEEN $3 AND $4) OR (v.checkout_time BETWEEN $3 AND $4))
"#;

#[async_trait]
impl VisitRepository for PgStore {
    async fn find_visit(&self, id: Uuid) -> AppResult<Option<Visit>> {
        let visit = sqlx::query_as::<_, Visit>(&format!(
            "SELECT {} FROM visits WHERE id = $1",
            VISIT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(visit)
    }

    async fn find_open_visit(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Option<Visit>> {
        let visit = sqlx::query_as::<_, Visit>(&format!(
            "SELECT {} FROM visits \
             WHERE company_id = $1 AND branch_id = $2 AND vehicle_id = $3 \
               AND checkout_time IS NULL \
             LIMIT 1",
            VISIT_COLUMNS
        ))
        .bind(company_id)
        .bind(branch_id)
        .bind(vehicle_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(visit)
    }

    async fn open_visit(&self, visit: &NewVisit) -> AppResult<Visit> {
        let mut tx = self.pool().begin().await?;

        let created = sqlx::query_as::<_, Visit>(&format!(
            r#"
            INSERT INTO visits (id, company_id, branch_id, person_id, vehicle_id, purpose, checkin_time)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING {}
            "#,
            VISIT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(visit.company_id)
        .bind(visit.branch_id)
        .bind(visit.person_id)
        .bind(visit.vehicle_id)
        .bind(&visit.purpose)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO visit_events (visit_id, type, meta) VALUES ($1, $2, $3)")
            .bind(created.id)
            .bind(VisitEventType::Checkin.as_str())
            .bind(json!({}))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn close_visit(
        &self,
        id: Uuid,
        company_id: Uuid,
        branch_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Visit>> {
        let mut tx = self.pool().begin().await?;

        let closed = sqlx::query_as::<_, Visit>(&format!(
            r#"
            UPDATE visits
            SET checkout_time = $4
            WHERE id = $1 AND company_id = $2 AND branch_id = $3 AND checkout_time IS NULL
            RETURNING {}
            "#,
            VISIT_COLUMNS
        ))
        .bind(id)
        .bind(company_id)
        .bind(branch_id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(closed) = closed else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO visit_events (visit_id, type, meta) VALUES ($1, $2, $3)")
            .bind(closed.id)
            .bind(VisitEventType::Checkout.as_str())
            .bind(json!({}))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(closed))
    }

    async fn list_open_visits(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
    ) -> AppResult<Vec<VisitDetail>> {
        let rows = sqlx::query_as::<_, VisitDetailRow>(&format!(
            "{} WHERE v.company_id = $1 AND v.branch_id = $2 AND v.checkout_time IS NULL \
             ORDER BY v.checkin_time DESC",
            DETAIL_SELECT
        ))
        .bind(company_id)
        .bind(branch_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(VisitDetail::from).collect())
    }

    async fn visit_history(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        window: &HistoryWindow,
    ) -> AppResult<(Vec<VisitDetail>, i64)> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM visits v {}",
            HISTORY_FILTER
        ))
        .bind(company_id)
        .bind(branch_id)
        .bind(window.from)
        .bind(window.to)
        .fetch_one(self.pool())
        .await?;

        let rows = sqlx::query_as::<_, VisitDetailRow>(&format!(
            "{} {} ORDER BY v.checkin_time DESC LIMIT $5 OFFSET $6",
            DETAIL_SELECT, HISTORY_FILTER
        ))
        .bind(company_id)
        .bind(branch_id)
        .bind(window.from)
        .bind(window.to)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(self.pool())
        .await?;

        Ok((rows.into_iter().map(VisitDetail::from).collect(), total))
    }

    async fn recent_visits_for_vehicle(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        vehicle_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<VisitStamp>> {
        let visits = sqlx::query_as::<_, VisitStamp>(
            r#"
            SELECT id, checkin_time, checkout_time
            FROM visits
            WHERE company_id = $1 AND branch_id = $2 AND vehicle_id = $3
            ORDER BY checkin_time DESC
            LIMIT $4
            "#,
        )
        .bind(company_id)
        .bind(branch_id)
        .bind(vehicle_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(visits)
    }

    async fn visit_detail(&self, company_id: Uuid, id: Uuid) -> AppResult<Option<VisitDetail>> {
        let row = sqlx::query_as::<_, VisitDetailRow>(&format!(
            "{} WHERE v.company_id = $1 AND v.id = $2",
            DETAIL_SELECT
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(VisitDetail::from))
    }

    async fn record_event(
        &self,
        visit_id: Option<Uuid>,
        event_type: VisitEventType,
        meta: serde_json::Value,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO visit_events (visit_id, type, meta) VALUES ($1, $2, $3)")
            .bind(visit_id)
            .bind(event_type.as_str())
            .bind(meta)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
