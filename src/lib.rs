//! # magicrest
//!
//! Turn a REST query string into a validated, paginated Sea-ORM read.
//!
//! ```rust,ignore
//! use magicrest::{ApiError, Paginated, QueryParams, ReadOptions, SeaOrmQuery, read_paginated};
//!
//! async fn list_movements(
//!     params: QueryParams,
//!     State(db): State<DatabaseConnection>,
//! ) -> Result<Paginated<movement::Model>, ApiError> {
//!     let options = ReadOptions::new().with_search_field("keterangan");
//!     let query = SeaOrmQuery::new(&db, movement::Entity::find());
//!     Ok(read_paginated(&params, query, &options).await?)
//! }
//! ```
//!
//! `GET /movements?filter[gudang_id]=<uuid>&search=baut&order=jumlah desc&page=2`
//! answers with
//!
//! ```json
//! {"data": [...], "meta": {"pagination": {"page": 2, "pageSize": 10, "pageCount": 3, "total": 27, "hasNext": true, "hasPrev": true}}}
//! ```

pub mod compose;
pub mod config;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod params;
pub mod query;
pub mod read;

pub use config::{ReadOptions, ResolvedOptions};
pub use database::{Preload, SeaOrmQuery};
pub use errors::{ApiError, ReadError, RejectedFilter};
pub use filtering::{FieldType, FilterCondition, FilterKind, FilterValue, PaginationMeta};
pub use params::QueryParams;
pub use query::QueryTarget;
pub use read::{Meta, Paginated, read_paginated};
