use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::internal::custom_command::CustomCommand;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_commands")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub guild_id: i64,
    pub label: String,
    #[sea_orm(column_type = "Text")]
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CustomCommand {
    fn from(model: Model) -> Self {
        CustomCommand {
            label: model.label,
            code: model.code,
        }
    }
}
