use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Login credential for one provider. `(provider, entity_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub provider: String,
    /// Login name for the provider (the email for `emailpass`)
    pub entity_id: String,
    pub auth_identity_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auth_identity::Entity",
        from = "Column::AuthIdentityId",
        to = "super::auth_identity::Column::Id"
    )]
    AuthIdentity,
}

impl Related<super::auth_identity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthIdentity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
