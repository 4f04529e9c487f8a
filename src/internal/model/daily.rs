use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A claimed daily reward; the IP column ties accounts to the machines they were used from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dailies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub ip: String,
    pub received_at: i64, // unix millis
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
