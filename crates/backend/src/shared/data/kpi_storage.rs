use anyhow::Result;
use chrono::Utc;
use contracts::shared::kpi::TimeRange;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::db::get_connection;

/// Raw KPI payload as pushed by the precompute job, one row per (kpi_key, time_range).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kpi_payload")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kpi_key: String,
    pub time_range: String,
    pub raw_json: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn raw_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.raw_json)?)
    }
}

/// Insert or replace the payload stored for `kpi_key` and `range`.
pub async fn upsert(kpi_key: &str, range: TimeRange, raw: &serde_json::Value) -> Result<()> {
    upsert_with(get_connection()?, kpi_key, range, raw).await
}

pub async fn get(kpi_key: &str, range: TimeRange) -> Result<Option<Model>> {
    get_with(get_connection()?, kpi_key, range).await
}

/// Every stored payload, ordered by key then range.
pub async fn list_all() -> Result<Vec<Model>> {
    list_all_with(get_connection()?).await
}

pub(crate) async fn upsert_with(
    conn: &DatabaseConnection,
    kpi_key: &str,
    range: TimeRange,
    raw: &serde_json::Value,
) -> Result<()> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        kpi_key: Set(kpi_key.to_string()),
        time_range: Set(range.as_str().to_string()),
        raw_json: Set(serde_json::to_string(raw)?),
        updated_at: Set(Utc::now().to_rfc3339()),
    };

    // One statement against the (kpi_key, time_range) unique index; an existing row keeps its id.
    Entity::insert(active)
        .on_conflict(
            OnConflict::columns([Column::KpiKey, Column::TimeRange])
                .update_columns([Column::RawJson, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    tracing::debug!("Stored KPI payload: kpi_key={}, range={}", kpi_key, range.as_str());
    Ok(())
}

pub(crate) async fn get_with(
    conn: &DatabaseConnection,
    kpi_key: &str,
    range: TimeRange,
) -> Result<Option<Model>> {
    let result = Entity::find()
        .filter(Column::KpiKey.eq(kpi_key))
        .filter(Column::TimeRange.eq(range.as_str()))
        .one(conn)
        .await?;
    Ok(result)
}

pub(crate) async fn list_all_with(conn: &DatabaseConnection) -> Result<Vec<Model>> {
    let rows = Entity::find()
        .order_by_asc(Column::KpiKey)
        .order_by_asc(Column::TimeRange)
        .all(conn)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_replaces_existing_payload() {
        let conn = memory_connection().await;
        let first = json!({"meta": {"kpi_key": "otp", "variant": "line"}, "latest": {"value": 1}});
        let second = json!({"meta": {"kpi_key": "otp", "variant": "line"}, "latest": {"value": 2}});

        upsert_with(&conn, "otp", TimeRange::Last7Days, &first).await.unwrap();
        upsert_with(&conn, "otp", TimeRange::Last7Days, &second).await.unwrap();
        upsert_with(&conn, "otp", TimeRange::Last30Days, &first).await.unwrap();

        let stored = get_with(&conn, "otp", TimeRange::Last7Days).await.unwrap().unwrap();
        assert_eq!(stored.raw_value().unwrap(), second);
        assert_eq!(list_all_with(&conn).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_keeps_row_id() {
        let conn = memory_connection().await;
        upsert_with(&conn, "otp", TimeRange::Last7Days, &json!({"v": 1})).await.unwrap();
        let before = get_with(&conn, "otp", TimeRange::Last7Days).await.unwrap().unwrap();
        upsert_with(&conn, "otp", TimeRange::Last7Days, &json!({"v": 2})).await.unwrap();
        let after = get_with(&conn, "otp", TimeRange::Last7Days).await.unwrap().unwrap();
        assert_eq!(before.id, after.id);
        assert_eq!(after.raw_value().unwrap(), json!({"v": 2}));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_of_new_key_both_succeed() {
        let conn = memory_connection().await;
        let a = json!({"writer": "a"});
        let b = json!({"writer": "b"});

        let (ra, rb) = tokio::join!(
            upsert_with(&conn, "block_hours", TimeRange::Last90Days, &a),
            upsert_with(&conn, "block_hours", TimeRange::Last90Days, &b),
        );
        ra.unwrap();
        rb.unwrap();

        let rows = list_all_with(&conn).await.unwrap();
        assert_eq!(rows.len(), 1);
        let stored = rows[0].raw_value().unwrap();
        assert!(stored == a || stored == b);
    }

    #[tokio::test]
    async fn test_get_missing_payload() {
        let conn = memory_connection().await;
        assert!(get_with(&conn, "nope", TimeRange::Last30Days).await.unwrap().is_none());
    }
}
