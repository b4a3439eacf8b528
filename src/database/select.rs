use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Value,
    sea_query::{Alias, BinOper, Expr, Func, SimpleExpr},
};
use serde_json::Value as JsonValue;
use std::marker::PhantomData;

use crate::filtering::{FilterValue, GroupBy, LIKE_ESCAPE, OrderBy, SearchTarget, SortKey};
use crate::query::QueryTarget;

/// Eager loading of named relations after a page has been fetched.
///
/// Sea-ORM resolves relations through static types, so turning a relation
/// *name* from the query string into a load is up to the row type. Rows that
/// have nothing to preload can rely on the default, which does nothing.
///
/// ```rust,ignore
/// #[async_trait]
/// impl Preload for Movement {
///     async fn preload(db: &DatabaseConnection, rows: &mut Vec<Self>, relations: &[String]) -> Result<(), DbErr> {
///         if relations.iter().any(|r| r == "Gudang") {
///             // load warehouses for `rows` ...
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Preload: Sized + Send {
    async fn preload(
        db: &DatabaseConnection,
        rows: &mut Vec<Self>,
        relations: &[String],
    ) -> Result<(), DbErr> {
        let _ = (db, rows, relations);
        Ok(())
    }
}

/// JSON rows carry no relations of their own.
impl Preload for JsonValue {}

/// Column reference for `column` or `relation.column`.
fn column_expr(path: &str) -> Expr {
    match path.split_once('.') {
        Some((relation, column)) => Expr::col((Alias::new(relation), Alias::new(column))),
        None => Expr::col(Alias::new(path)),
    }
}

fn search_column(target: &SearchTarget) -> Expr {
    match target {
        SearchTarget::Column(column) => Expr::col(Alias::new(column)),
        SearchTarget::Qualified { relation, column } => {
            Expr::col((Alias::new(relation), Alias::new(column)))
        }
    }
}

/// `UPPER(column) LIKE UPPER(pattern) ESCAPE '\'`.
///
/// Both sides are folded by the database, so whatever `UPPER` means on the
/// backend (ASCII only on SQLite) applies to column and needle alike.
fn contains_expr(target: &SearchTarget, pattern: &str) -> SimpleExpr {
    let needle = SimpleExpr::Binary(
        Box::new(Func::upper(Expr::val(pattern)).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant(LIKE_ESCAPE.into())),
    );
    SimpleExpr::Binary(
        Box::new(Func::upper(search_column(target)).into()),
        BinOper::Like,
        Box::new(needle),
    )
}

fn sort_expr(key: &SortKey) -> SimpleExpr {
    match key {
        SortKey::Column(column) => column_expr(column).into(),
        SortKey::Max(column) => Func::max(column_expr(column)).into(),
    }
}

/// [`QueryTarget`] over a Sea-ORM [`Select`].
///
/// Rows are materialized as `M`, which defaults to the entity's model. A
/// model needs every one of its columns, which a `groupby` select does not
/// have. An endpoint that allows grouping should use
/// [`SeaOrmQuery::into_json`], which serves both modes, or
/// [`SeaOrmQuery::into_rows`] with a row type shaped like the group.
pub struct SeaOrmQuery<'db, E: EntityTrait, M = <E as EntityTrait>::Model> {
    db: &'db DatabaseConnection,
    select: Select<E>,
    preloads: Vec<String>,
    rows: PhantomData<fn() -> M>,
}

impl<'db, E: EntityTrait> SeaOrmQuery<'db, E> {
    /// Wrap a prepared select; it may already carry joins and conditions.
    pub fn new(db: &'db DatabaseConnection, select: Select<E>) -> Self {
        Self {
            db,
            select,
            preloads: Vec::new(),
            rows: PhantomData,
        }
    }
}

impl<'db, E: EntityTrait, M> SeaOrmQuery<'db, E, M> {
    /// Materialize rows as `R` instead.
    #[must_use]
    pub fn into_rows<R>(self) -> SeaOrmQuery<'db, E, R> {
        SeaOrmQuery {
            db: self.db,
            select: self.select,
            preloads: self.preloads,
            rows: PhantomData,
        }
    }

    /// Materialize rows as JSON objects holding whatever columns the select
    /// produced.
    #[must_use]
    pub fn into_json(self) -> SeaOrmQuery<'db, E, JsonValue> {
        self.into_rows()
    }

    /// Relations requested so far, in request order.
    #[must_use]
    pub fn preloads(&self) -> &[String] {
        &self.preloads
    }

    /// The select as built so far.
    #[must_use]
    pub fn as_select(&self) -> &Select<E> {
        &self.select
    }

    fn map_select(self, f: impl FnOnce(Select<E>) -> Select<E>) -> Self {
        Self {
            select: f(self.select),
            ..self
        }
    }
}

impl<E: EntityTrait, M> Clone for SeaOrmQuery<'_, E, M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db,
            select: self.select.clone(),
            preloads: self.preloads.clone(),
            rows: PhantomData,
        }
    }
}

#[async_trait]
impl<'db, E, M> QueryTarget for SeaOrmQuery<'db, E, M>
where
    E: EntityTrait,
    E::Model: Sync + 'db,
    M: FromQueryResult + Preload + Send + Sync,
{
    type Row = M;

    fn filter_eq(self, field: &str, value: FilterValue) -> Self {
        self.map_select(|select| select.filter(column_expr(field).eq(Value::from(value))))
    }

    fn filter_in(self, field: &str, values: Vec<FilterValue>) -> Self {
        self.map_select(|select| {
            select.filter(column_expr(field).is_in(values.into_iter().map(Value::from)))
        })
    }

    fn filter_contains(self, target: &SearchTarget, pattern: &str) -> Self {
        let condition = contains_expr(target, pattern);
        self.map_select(|select| select.filter(condition))
    }

    fn preload(mut self, relation: &str) -> Self {
        self.preloads.push(relation.to_string());
        self
    }

    fn select_grouped(self, group: &GroupBy) -> Self {
        self.map_select(|select| {
            let select = group
                .fields
                .iter()
                .fold(select.select_only(), |select, field| {
                    select.expr(SimpleExpr::from(column_expr(field)))
                });
            select.expr_as(
                SimpleExpr::from(Func::max(column_expr(&group.latest))),
                group.latest.as_str(),
            )
        })
    }

    fn group_by(self, fields: &[String]) -> Self {
        self.map_select(|select| {
            fields.iter().fold(select, |select, field| {
                select.group_by(SimpleExpr::from(column_expr(field)))
            })
        })
    }

    fn order_by(self, order: &OrderBy) -> Self {
        self.map_select(|select| select.order_by(sort_expr(&order.key), order.direction.into()))
    }

    async fn count(&self) -> Result<u64, DbErr> {
        PaginatorTrait::count(self.select.clone(), self.db).await
    }

    async fn fetch(self, limit: u64, offset: u64) -> Result<Vec<M>, DbErr> {
        let mut rows = self
            .select
            .limit(limit)
            .offset(offset)
            .into_model::<M>()
            .all(self.db)
            .await?;

        if !self.preloads.is_empty() {
            tracing::debug!(relations = ?self.preloads, rows = rows.len(), "Preloading relations");
            M::preload(self.db, &mut rows, &self.preloads).await?;
        }
        Ok(rows)
    }
}
