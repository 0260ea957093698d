use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{nakliye_kayit, yatan_tutar};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// On-disk backup document. `version` is carried for forward compatibility
/// but import accepts any value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackupDocument {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub nakliye_kayitlari: Vec<nakliye_kayit::Model>,
    #[serde(default)]
    pub yatan_tutarlar: Vec<yatan_tutar::Model>,
}

/// Result of a backup import: rows already present are skipped, not
/// duplicated, so re-importing the same file is harmless.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportOutcome {
    pub nakliye_imported: u64,
    pub nakliye_skipped: u64,
    pub yatan_imported: u64,
    pub yatan_skipped: u64,
}

/// Identity of a nakliye row for duplicate suppression. IDs are regenerated
/// on import, so equality is judged on business fields instead.
fn nakliye_dup_key(sira_no: &str, musteri: &str, irsaliye_no: &str) -> (String, String, String) {
    (
        sira_no.trim().to_string(),
        musteri.trim().to_string(),
        irsaliye_no.trim().to_string(),
    )
}

fn yatan_dup_key(record: &yatan_tutar::Model) -> (String, DateTime<Utc>, DateTime<Utc>) {
    (
        record.tutar.to_string(),
        record.yatis_tarihi,
        record.donem_baslangic,
    )
}

/// Service for exporting and importing full-database JSON backups.
#[derive(Clone)]
pub struct BackupService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl BackupService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Snapshots every record into a single document.
    #[instrument(skip(self, user))]
    pub async fn export(
        &self,
        user: Option<serde_json::Value>,
    ) -> Result<BackupDocument, ServiceError> {
        let nakliye_kayitlari = nakliye_kayit::Entity::find()
            .order_by_desc(nakliye_kayit::Column::Tarih)
            .all(&*self.db)
            .await?;
        let yatan_tutarlar = yatan_tutar::Entity::find()
            .order_by_desc(yatan_tutar::Column::YatisTarihi)
            .all(&*self.db)
            .await?;

        Ok(BackupDocument {
            timestamp: Utc::now(),
            version: "1.0".to_string(),
            user,
            nakliye_kayitlari,
            yatan_tutarlar,
        })
    }

    /// Merges a backup document into the database. Rows matching an existing
    /// record on their duplicate key are skipped; the rest are inserted under
    /// fresh IDs so an import never collides with live rows.
    #[instrument(skip(self, document))]
    pub async fn import(&self, document: BackupDocument) -> Result<ImportOutcome, ServiceError> {
        let mut outcome = ImportOutcome {
            nakliye_imported: 0,
            nakliye_skipped: 0,
            yatan_imported: 0,
            yatan_skipped: 0,
        };

        let mut nakliye_seen: HashSet<(String, String, String)> =
            nakliye_kayit::Entity::find()
                .all(&*self.db)
                .await?
                .iter()
                .map(|r| nakliye_dup_key(&r.sira_no, &r.musteri, &r.irsaliye_no))
                .collect();

        for record in document.nakliye_kayitlari {
            let key = nakliye_dup_key(&record.sira_no, &record.musteri, &record.irsaliye_no);
            if !nakliye_seen.insert(key) {
                outcome.nakliye_skipped += 1;
                continue;
            }

            let model = nakliye_kayit::ActiveModel {
                id: Set(Uuid::new_v4()),
                tarih: Set(record.tarih),
                sira_no: Set(record.sira_no),
                kod: Set(record.kod),
                musteri: Set(record.musteri),
                irsaliye_no: Set(record.irsaliye_no),
                ithalat: Set(record.ithalat),
                ihracat: Set(record.ihracat),
                bos: Set(record.bos),
                bos_tasima: Set(record.bos_tasima),
                reefer: Set(record.reefer),
                bekleme: Set(record.bekleme),
                geceleme: Set(record.geceleme),
                pazar: Set(record.pazar),
                harcirah: Set(record.harcirah),
                toplam: Set(record.toplam),
                sistem: Set(record.sistem),
                created_at: Set(Utc::now()),
            };
            model.insert(&*self.db).await?;
            outcome.nakliye_imported += 1;
        }

        let mut yatan_seen: HashSet<(String, DateTime<Utc>, DateTime<Utc>)> =
            yatan_tutar::Entity::find()
                .all(&*self.db)
                .await?
                .iter()
                .map(yatan_dup_key)
                .collect();

        for record in document.yatan_tutarlar {
            let key = yatan_dup_key(&record);
            if !yatan_seen.insert(key) {
                outcome.yatan_skipped += 1;
                continue;
            }

            let model = yatan_tutar::ActiveModel {
                id: Set(Uuid::new_v4()),
                tutar: Set(record.tutar),
                yatis_tarihi: Set(record.yatis_tarihi),
                donem_baslangic: Set(record.donem_baslangic),
                donem_bitis: Set(record.donem_bitis),
                aciklama: Set(record.aciklama),
                created_at: Set(Utc::now()),
            };
            model.insert(&*self.db).await?;
            outcome.yatan_imported += 1;
        }

        self.event_sender
            .send(Event::BackupImported {
                imported: outcome.nakliye_imported + outcome.yatan_imported,
                skipped: outcome.nakliye_skipped + outcome.yatan_skipped,
            })
            .await;

        Ok(outcome)
    }
}
