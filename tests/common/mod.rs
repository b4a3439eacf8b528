#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use chrono::{Duration, TimeZone, Utc};
use magicrest::filtering::{FilterValue, GroupBy, OrderBy, SearchTarget};
use magicrest::{ApiError, Paginated, QueryParams, QueryTarget, ReadOptions, SeaOrmQuery, read_paginated};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Set, Statement};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub mod stock_movement;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// One clause handed to [`FakeQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Eq(String, FilterValue),
    In(String, Vec<FilterValue>),
    Contains(SearchTarget, String),
    Preload(String),
    SelectGrouped(GroupBy),
    GroupBy(Vec<String>),
    OrderBy(OrderBy),
}

/// What reached the fake at execution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Executed {
    pub counted: Option<Vec<Clause>>,
    pub fetched: Option<(Vec<Clause>, u64, u64)>,
}

/// In-memory [`QueryTarget`] that records clauses instead of building SQL.
///
/// Every row is returned regardless of clauses; `total` stands in for the
/// count the database would report.
#[derive(Debug, Clone, Default)]
pub struct FakeQuery {
    clauses: Vec<Clause>,
    rows: Vec<i64>,
    total: Option<u64>,
    count_error: Option<String>,
    fetch_error: Option<String>,
    executed: Arc<Mutex<Executed>>,
}

impl FakeQuery {
    pub fn with_rows(rows: impl IntoIterator<Item = i64>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Report `total` matching rows regardless of the stored ones.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn failing_count(mut self, message: &str) -> Self {
        self.count_error = Some(message.to_string());
        self
    }

    pub fn failing_fetch(mut self, message: &str) -> Self {
        self.fetch_error = Some(message.to_string());
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Handle on what the consumed query eventually executed.
    pub fn executed(&self) -> Arc<Mutex<Executed>> {
        Arc::clone(&self.executed)
    }

    fn push(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }
}

#[async_trait]
impl QueryTarget for FakeQuery {
    type Row = i64;

    fn filter_eq(self, field: &str, value: FilterValue) -> Self {
        self.push(Clause::Eq(field.to_string(), value))
    }

    fn filter_in(self, field: &str, values: Vec<FilterValue>) -> Self {
        self.push(Clause::In(field.to_string(), values))
    }

    fn filter_contains(self, target: &SearchTarget, pattern: &str) -> Self {
        self.push(Clause::Contains(target.clone(), pattern.to_string()))
    }

    fn preload(self, relation: &str) -> Self {
        self.push(Clause::Preload(relation.to_string()))
    }

    fn select_grouped(self, group: &GroupBy) -> Self {
        self.push(Clause::SelectGrouped(group.clone()))
    }

    fn group_by(self, fields: &[String]) -> Self {
        self.push(Clause::GroupBy(fields.to_vec()))
    }

    fn order_by(self, order: &OrderBy) -> Self {
        self.push(Clause::OrderBy(order.clone()))
    }

    async fn count(&self) -> Result<u64, DbErr> {
        self.executed.lock().unwrap().counted = Some(self.clauses.clone());
        if let Some(message) = &self.count_error {
            return Err(DbErr::Custom(message.clone()));
        }
        Ok(self.total.unwrap_or(self.rows.len() as u64))
    }

    async fn fetch(self, limit: u64, offset: u64) -> Result<Vec<i64>, DbErr> {
        self.executed.lock().unwrap().fetched = Some((self.clauses.clone(), limit, offset));
        if let Some(message) = self.fetch_error {
            return Err(DbErr::Custom(message));
        }
        Ok(self
            .rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE stock_movements (
            id BLOB PRIMARY KEY NOT NULL,
            gudang_id BLOB NOT NULL,
            status TEXT NOT NULL,
            jumlah INTEGER NOT NULL,
            keterangan TEXT NOT NULL,
            created_at TEXT NOT NULL
        )"
        .to_string(),
    ))
    .await?;

    Ok(db)
}

pub const GUDANG_A: Uuid = Uuid::from_u128(0xa);
pub const GUDANG_B: Uuid = Uuid::from_u128(0xb);

/// Twelve movements, newest last: even ones in warehouse A, odd ones in B.
/// `jumlah` is the index times ten, and every third row mentions "baut".
pub async fn seed_movements(db: &DatabaseConnection) -> Result<Vec<stock_movement::Model>, DbErr> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().unwrap();

    let models: Vec<stock_movement::Model> = (0..12_i32)
        .map(|i| stock_movement::Model {
            id: Uuid::from_u128(0x100 + u128::try_from(i).unwrap()),
            gudang_id: if i % 2 == 0 { GUDANG_A } else { GUDANG_B },
            status: if i < 8 { "masuk" } else { "keluar" }.to_string(),
            jumlah: i * 10,
            keterangan: if i % 3 == 0 {
                format!("Baut M{i} 100% baja")
            } else {
                format!("Mur {i}")
            },
            created_at: start + Duration::minutes(i64::from(i)),
        })
        .collect();

    stock_movement::Entity::insert_many(models.iter().cloned().map(|model| stock_movement::ActiveModel {
        id: Set(model.id),
        gudang_id: Set(model.gudang_id),
        status: Set(model.status),
        jumlah: Set(model.jumlah),
        keterangan: Set(model.keterangan),
        created_at: Set(model.created_at),
    }))
    .exec_without_returning(db)
    .await?;

    Ok(models)
}

/// Insert one extra movement in warehouse A, newer than the seeded ones.
pub async fn insert_movement(db: &DatabaseConnection, jumlah: i32, keterangan: &str) -> Result<(), DbErr> {
    let created_at = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).single().unwrap();
    stock_movement::Entity::insert(stock_movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        gudang_id: Set(GUDANG_A),
        status: Set("masuk".to_string()),
        jumlah: Set(jumlah),
        keterangan: Set(keterangan.to_string()),
        created_at: Set(created_at),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// One endpoint for plain listing and `groupby`, hence JSON rows.
async fn list_movements(
    params: QueryParams,
    State(db): State<DatabaseConnection>,
) -> Result<Paginated<serde_json::Value>, ApiError> {
    let options = ReadOptions::new()
        .with_search_field("keterangan")
        .with_page_size(5)
        .with_group_by(true);
    let query = SeaOrmQuery::new(&db, stock_movement::Entity::find()).into_json();
    Ok(read_paginated(&params, query, &options).await?)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let api = Router::new()
        .route("/movements", axum::routing::get(list_movements))
        .with_state(db);

    Router::new().nest("/api/v1", api)
}
