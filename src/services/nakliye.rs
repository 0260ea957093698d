use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::nakliye_kayit::{self, Entity, Model};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Default page size, matching the source system's list endpoint.
pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNakliyeInput {
    pub tarih: DateTime<Utc>,
    pub sira_no: String,
    #[serde(default)]
    pub kod: Option<String>,
    pub musteri: String,
    pub irsaliye_no: String,
    #[serde(default)]
    pub ithalat: bool,
    #[serde(default)]
    pub ihracat: bool,
    #[serde(default)]
    pub bos: bool,
    #[serde(default)]
    pub bos_tasima: Decimal,
    #[serde(default)]
    pub reefer: Decimal,
    #[serde(default)]
    pub bekleme: Decimal,
    #[serde(default)]
    pub geceleme: Decimal,
    #[serde(default)]
    pub pazar: Decimal,
    #[serde(default)]
    pub harcirah: Decimal,
    #[serde(default)]
    pub sistem: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNakliyeInput {
    pub tarih: Option<DateTime<Utc>>,
    pub sira_no: Option<String>,
    pub kod: Option<String>,
    pub musteri: Option<String>,
    pub irsaliye_no: Option<String>,
    pub ithalat: Option<bool>,
    pub ihracat: Option<bool>,
    pub bos: Option<bool>,
    pub bos_tasima: Option<Decimal>,
    pub reefer: Option<Decimal>,
    pub bekleme: Option<Decimal>,
    pub geceleme: Option<Decimal>,
    pub pazar: Option<Decimal>,
    pub harcirah: Option<Decimal>,
    pub sistem: Option<Decimal>,
}

impl UpdateNakliyeInput {
    /// True when the request would change nothing, which the source system
    /// rejects outright.
    pub fn is_empty(&self) -> bool {
        self.tarih.is_none()
            && self.sira_no.is_none()
            && self.kod.is_none()
            && self.musteri.is_none()
            && self.irsaliye_no.is_none()
            && self.ithalat.is_none()
            && self.ihracat.is_none()
            && self.bos.is_none()
            && self.bos_tasima.is_none()
            && self.reefer.is_none()
            && self.bekleme.is_none()
            && self.geceleme.is_none()
            && self.pazar.is_none()
            && self.harcirah.is_none()
            && self.sistem.is_none()
    }
}

/// Outcome of a bulk delete: deletes run sequentially with no rollback, so a
/// partial result is possible and reported as such.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct BulkDeleteOutcome {
    pub deleted: u64,
    pub failed: u64,
}

/// Sum of the six charge components. `toplam` is always derived from this;
/// client-supplied totals are ignored. Components whose sum exceeds the
/// `Decimal` range are rejected rather than left to overflow.
pub fn charge_total(
    bos_tasima: Decimal,
    reefer: Decimal,
    bekleme: Decimal,
    geceleme: Decimal,
    pazar: Decimal,
    harcirah: Decimal,
) -> Result<Decimal, ServiceError> {
    [reefer, bekleme, geceleme, pazar, harcirah]
        .into_iter()
        .try_fold(bos_tasima, |acc, charge| acc.checked_add(charge))
        .ok_or_else(|| {
            ServiceError::ValidationError("Charge components are too large to total".into())
        })
}

/// Contains-pattern for a lowercased search term. `%`, `_` and the escape
/// character itself are escaped so the term matches literally.
fn search_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Half-open UTC range covering one calendar month.
pub fn month_bounds(
    year: i32,
    month: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    if !(1..=12).contains(&month) {
        return Err(ServiceError::ValidationError(format!(
            "Month must be 1-12, got {}",
            month
        )));
    }

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServiceError::ValidationError(format!("Invalid period {}-{}", year, month)))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServiceError::ValidationError(format!("Invalid period {}-{}", year, month)))?;

    Ok((start, end))
}

/// Service for managing nakliye records.
#[derive(Clone)]
pub struct NakliyeService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl NakliyeService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Lists records sorted by transaction date, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Model>, ServiceError> {
        let records = Entity::find()
            .order_by_desc(nakliye_kayit::Column::Tarih)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Model>, ServiceError> {
        Ok(Entity::find_by_id(id).one(&*self.db).await?)
    }

    /// Case-insensitive substring search over customer, sequence number and
    /// waybill number. A blank term degrades to a plain list, like the
    /// source system's search box.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Model>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(skip, limit).await;
        }

        let pattern = search_pattern(term);
        let like = |pattern: &str| LikeExpr::new(pattern).escape('\\');
        let condition = Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col(nakliye_kayit::Column::Musteri)))
                    .like(like(&pattern)),
            )
            .add(
                Expr::expr(Func::lower(Expr::col(nakliye_kayit::Column::SiraNo)))
                    .like(like(&pattern)),
            )
            .add(
                Expr::expr(Func::lower(Expr::col(nakliye_kayit::Column::IrsaliyeNo)))
                    .like(like(&pattern)),
            );

        let records = Entity::find()
            .filter(condition)
            .order_by_desc(nakliye_kayit::Column::Tarih)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    /// Exactly the records whose `tarih` falls in the given calendar month.
    #[instrument(skip(self))]
    pub async fn list_period(&self, year: i32, month: u32) -> Result<Vec<Model>, ServiceError> {
        let (start, end) = month_bounds(year, month)?;
        let records = Entity::find()
            .filter(nakliye_kayit::Column::Tarih.gte(start))
            .filter(nakliye_kayit::Column::Tarih.lt(end))
            .order_by_desc(nakliye_kayit::Column::Tarih)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateNakliyeInput) -> Result<Model, ServiceError> {
        if input.musteri.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "musteri must not be empty".into(),
            ));
        }

        let toplam = charge_total(
            input.bos_tasima,
            input.reefer,
            input.bekleme,
            input.geceleme,
            input.pazar,
            input.harcirah,
        )?;

        let model = nakliye_kayit::ActiveModel {
            id: Set(Uuid::new_v4()),
            tarih: Set(input.tarih),
            sira_no: Set(input.sira_no),
            kod: Set(input.kod),
            musteri: Set(input.musteri),
            irsaliye_no: Set(input.irsaliye_no),
            ithalat: Set(input.ithalat),
            ihracat: Set(input.ihracat),
            bos: Set(input.bos),
            bos_tasima: Set(input.bos_tasima),
            reefer: Set(input.reefer),
            bekleme: Set(input.bekleme),
            geceleme: Set(input.geceleme),
            pazar: Set(input.pazar),
            harcirah: Set(input.harcirah),
            toplam: Set(toplam),
            sistem: Set(input.sistem),
            created_at: Set(Utc::now()),
        };

        let created = model.insert(&*self.db).await?;
        self.event_sender
            .send(Event::NakliyeCreated(created.id))
            .await;
        Ok(created)
    }

    /// Partial update. Fields left out of the request are untouched;
    /// `toplam` is recomputed from the resulting charge components.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateNakliyeInput,
    ) -> Result<Model, ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::ValidationError(
                "Nothing to update".into(),
            ));
        }

        let existing = Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Nakliye record {} not found", id)))?;

        let bos_tasima = input.bos_tasima.unwrap_or(existing.bos_tasima);
        let reefer = input.reefer.unwrap_or(existing.reefer);
        let bekleme = input.bekleme.unwrap_or(existing.bekleme);
        let geceleme = input.geceleme.unwrap_or(existing.geceleme);
        let pazar = input.pazar.unwrap_or(existing.pazar);
        let harcirah = input.harcirah.unwrap_or(existing.harcirah);
        let toplam = charge_total(bos_tasima, reefer, bekleme, geceleme, pazar, harcirah)?;

        let mut active: nakliye_kayit::ActiveModel = existing.into();
        if let Some(v) = input.tarih {
            active.tarih = Set(v);
        }
        if let Some(v) = input.sira_no {
            active.sira_no = Set(v);
        }
        if let Some(v) = input.kod {
            active.kod = Set(Some(v));
        }
        if let Some(v) = input.musteri {
            active.musteri = Set(v);
        }
        if let Some(v) = input.irsaliye_no {
            active.irsaliye_no = Set(v);
        }
        if let Some(v) = input.ithalat {
            active.ithalat = Set(v);
        }
        if let Some(v) = input.ihracat {
            active.ihracat = Set(v);
        }
        if let Some(v) = input.bos {
            active.bos = Set(v);
        }
        active.bos_tasima = Set(bos_tasima);
        active.reefer = Set(reefer);
        active.bekleme = Set(bekleme);
        active.geceleme = Set(geceleme);
        active.pazar = Set(pazar);
        active.harcirah = Set(harcirah);
        active.toplam = Set(toplam);
        if let Some(v) = input.sistem {
            active.sistem = Set(v);
        }

        let updated = active.update(&*self.db).await?;
        self.event_sender
            .send(Event::NakliyeUpdated(updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Nakliye record {} not found",
                id
            )));
        }
        self.event_sender.send(Event::NakliyeDeleted(id)).await;
        Ok(())
    }

    /// Deletes a set of records one by one, the way the source client looped
    /// over single-record deletes. Failures are counted, not rolled back.
    #[instrument(skip(self, ids))]
    pub async fn bulk_delete(&self, ids: &[Uuid]) -> Result<BulkDeleteOutcome, ServiceError> {
        let mut outcome = BulkDeleteOutcome {
            deleted: 0,
            failed: 0,
        };

        for id in ids {
            match self.delete(*id).await {
                Ok(()) => outcome.deleted += 1,
                Err(_) => outcome.failed += 1,
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn charge_total_sums_all_components() {
        let total = charge_total(
            dec!(100.50),
            dec!(25),
            dec!(10.25),
            dec!(0),
            dec!(7.75),
            dec!(3),
        )
        .unwrap();
        assert_eq!(total, dec!(146.50));
    }

    #[test]
    fn charge_total_rejects_overflowing_components() {
        let result = charge_total(
            Decimal::MAX,
            Decimal::MAX,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn search_pattern_escapes_like_metacharacters() {
        assert_eq!(search_pattern("Arkas"), "%arkas%");
        assert_eq!(search_pattern("%50"), "%\\%50%");
        assert_eq!(search_pattern("IRS_1"), "%irs\\_1%");
        assert_eq!(search_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (start, end) = month_bounds(2025, 2).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-02-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn month_bounds_reject_invalid_months() {
        assert!(month_bounds(2025, 0).is_err());
        assert!(month_bounds(2025, 13).is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateNakliyeInput::default().is_empty());
        let input = UpdateNakliyeInput {
            reefer: Some(dec!(5)),
            ..Default::default()
        };
        assert!(!input.is_empty());
    }

    proptest! {
        // toplam = bos_tasima + reefer + bekleme + geceleme + pazar + harcirah
        // for arbitrary non-negative amounts expressible in cents.
        #[test]
        fn charge_total_matches_component_sum(
            a in 0u64..10_000_000,
            b in 0u64..10_000_000,
            c in 0u64..10_000_000,
            d in 0u64..10_000_000,
            e in 0u64..10_000_000,
            f in 0u64..10_000_000,
        ) {
            let cents = |v: u64| Decimal::new(v as i64, 2);
            let total = charge_total(cents(a), cents(b), cents(c), cents(d), cents(e), cents(f))
                .unwrap();
            prop_assert_eq!(total, cents(a + b + c + d + e + f));
        }
    }
}
