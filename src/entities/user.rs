use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account registered with either an email address or a normalized Turkish
/// phone number (at least one is always present).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::biometric_credential::Entity")]
    BiometricCredentials,
}

impl Related<super::biometric_credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BiometricCredentials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
