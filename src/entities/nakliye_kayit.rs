use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transportation record ("nakliye kaydı"): one haul for a customer with its
/// charge breakdown. `toplam` is maintained by the service as the sum of the
/// six charge components; `sistem` is an independently entered reference
/// amount compared against it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = NakliyeKayit)]
#[sea_orm(table_name = "nakliye_kayitlari")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Transaction date
    pub tarih: DateTime<Utc>,

    /// Sequence number (free text in the source system)
    pub sira_no: String,

    /// Optional code
    pub kod: Option<String>,

    /// Customer name
    pub musteri: String,

    /// Waybill number
    pub irsaliye_no: String,

    /// Import flag
    pub ithalat: bool,
    /// Export flag
    pub ihracat: bool,
    /// Empty-container flag
    pub bos: bool,

    /// Empty-haul charge
    pub bos_tasima: Decimal,
    /// Reefer charge
    pub reefer: Decimal,
    /// Waiting charge
    pub bekleme: Decimal,
    /// Overnight charge
    pub geceleme: Decimal,
    /// Sunday/weekend charge
    pub pazar: Decimal,
    /// Per-diem charge
    pub harcirah: Decimal,

    /// Computed total of the six charge components
    pub toplam: Decimal,
    /// Independently entered reference amount
    pub sistem: Decimal,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
