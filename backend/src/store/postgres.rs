// src/store/postgres.rs
//
// Postgres-backed document store.
//
// Each collection is a table of JSONB documents:
//   seq  BIGSERIAL      -- insertion order ("natural" order)
//   id   TEXT PK        -- copy of doc->>'id'
//   doc  JSONB NOT NULL
//
// Every trait method is a single SQL statement, so concurrent writers on the
// same document are serialized by Postgres row locking.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{Postgres, QueryBuilder};

use crate::db::DbPool;
use crate::store::{
    document_id, Collection, DocumentStore, Filter, Sort, StoreResult,
};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Append ` WHERE doc ->> $n = $m AND ...` for each filter condition.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    let mut separator = " WHERE ";
    for (field, value) in filter.conditions() {
        qb.push(separator);
        qb.push("doc ->> ");
        qb.push_bind(field.clone());
        qb.push(" = ");
        qb.push_bind(value.clone());
        separator = " AND ";
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, collection: Collection, doc: JsonValue) -> StoreResult<()> {
        let id = document_id(&doc)?.to_string();

        sqlx::query(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2)",
            collection.as_str()
        ))
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: &Sort,
        limit: usize,
    ) -> StoreResult<Vec<JsonValue>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT doc FROM ");
        qb.push(collection.as_str());
        push_filter(&mut qb, filter);

        match sort {
            Sort::Natural => {
                qb.push(" ORDER BY seq ASC");
            }
            Sort::Descending(field) => {
                qb.push(" ORDER BY doc ->> ");
                qb.push_bind(field.clone());
                qb.push(" DESC NULLS LAST, seq DESC");
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let docs = qb
            .build_query_scalar::<JsonValue>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs)
    }

    async fn set_field_by_id(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> StoreResult<bool> {
        let result = sqlx::query(&format!(
            r#"
            UPDATE {}
            SET doc = doc || jsonb_build_object($2::text, $3::jsonb)
            WHERE id = $1
            "#,
            collection.as_str()
        ))
        // $1 = document id
        .bind(id)
        // $2 = field name, $3 = new value
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", collection.as_str()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(collection.as_str());
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
