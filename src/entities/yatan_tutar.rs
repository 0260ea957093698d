use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deposited amount ("yatan tutar") tied to a work period, used to reconcile
/// what was actually paid against the recorded nakliye totals.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = YatanTutar)]
#[sea_orm(table_name = "yatan_tutarlar")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Monetary value deposited
    pub tutar: Decimal,

    /// Deposit date
    pub yatis_tarihi: DateTime<Utc>,

    /// Work-period start
    pub donem_baslangic: DateTime<Utc>,
    /// Work-period end
    pub donem_bitis: DateTime<Utc>,

    /// Free-text notes
    pub aciklama: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
