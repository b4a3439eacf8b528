use magicrest::Preload;
use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gudang_id: Uuid,
    pub status: String,
    pub jumlah: i32,
    pub keterangan: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Preload for Model {}

/// Row shape of `groupby=gudang_id`.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct LatestPerGudang {
    pub gudang_id: Uuid,
    pub created_at: String,
}

impl Preload for LatestPerGudang {}

/// Movement row that remembers which relations were loaded into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithRelations {
    pub jumlah: i32,
    pub relations: Vec<String>,
    /// Rows in the page the preload ran on
    pub batch: usize,
}

impl FromQueryResult for WithRelations {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            jumlah: res.try_get(pre, "jumlah")?,
            relations: Vec::new(),
            batch: 0,
        })
    }
}

#[async_trait::async_trait]
impl Preload for WithRelations {
    async fn preload(
        _db: &DatabaseConnection,
        rows: &mut Vec<Self>,
        relations: &[String],
    ) -> Result<(), DbErr> {
        let batch = rows.len();
        for row in rows.iter_mut() {
            row.relations = relations.to_vec();
            row.batch = batch;
        }
        Ok(())
    }
}
