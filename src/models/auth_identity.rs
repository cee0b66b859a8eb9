use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub role: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::provider_identity::Entity")]
    ProviderIdentities,
}

impl Related<super::provider_identity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProviderIdentities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
