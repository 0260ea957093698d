use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::nakliye_kayit::{self, Entity, Model};
use crate::errors::ServiceError;
use crate::services::nakliye::month_bounds;

/// Aggregate view over nakliye records. `fark` is the reconciliation gap:
/// the reference amount minus the recorded charge totals.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryReport {
    pub kayit_sayisi: u64,
    pub toplam: Decimal,
    pub sistem: Decimal,
    pub fark: Decimal,
}

fn summarize(records: &[Model]) -> Result<SummaryReport, ServiceError> {
    let overflow = || ServiceError::InternalError("Report totals exceed the numeric range".into());

    let mut toplam = Decimal::ZERO;
    let mut sistem = Decimal::ZERO;
    for record in records {
        toplam = toplam.checked_add(record.toplam).ok_or_else(overflow)?;
        sistem = sistem.checked_add(record.sistem).ok_or_else(overflow)?;
    }
    let fark = sistem.checked_sub(toplam).ok_or_else(overflow)?;

    Ok(SummaryReport {
        kayit_sayisi: records.len() as u64,
        toplam,
        sistem,
        fark,
    })
}

/// Service producing summary reports.
#[derive(Clone)]
pub struct ReportsService {
    db: Arc<DbPool>,
}

impl ReportsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Totals over all records, or over one calendar month when both `year`
    /// and `month` are given. Supplying only one of the two is an error.
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<SummaryReport, ServiceError> {
        let records = match (year, month) {
            (Some(year), Some(month)) => {
                let (start, end) = month_bounds(year, month)?;
                Entity::find()
                    .filter(nakliye_kayit::Column::Tarih.gte(start))
                    .filter(nakliye_kayit::Column::Tarih.lt(end))
                    .all(&*self.db)
                    .await?
            }
            (None, None) => Entity::find().all(&*self.db).await?,
            _ => {
                return Err(ServiceError::ValidationError(
                    "year and month must be supplied together".into(),
                ))
            }
        };

        summarize(&records)
    }
}
