use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::yatan_tutar::{self, Entity, Model};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateYatanTutarInput {
    pub tutar: Decimal,
    pub yatis_tarihi: DateTime<Utc>,
    pub donem_baslangic: DateTime<Utc>,
    pub donem_bitis: DateTime<Utc>,
    #[serde(default)]
    pub aciklama: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateYatanTutarInput {
    pub tutar: Option<Decimal>,
    pub yatis_tarihi: Option<DateTime<Utc>>,
    pub donem_baslangic: Option<DateTime<Utc>>,
    pub donem_bitis: Option<DateTime<Utc>>,
    pub aciklama: Option<String>,
}

impl UpdateYatanTutarInput {
    pub fn is_empty(&self) -> bool {
        self.tutar.is_none()
            && self.yatis_tarihi.is_none()
            && self.donem_baslangic.is_none()
            && self.donem_bitis.is_none()
            && self.aciklama.is_none()
    }
}

/// Service for managing deposit records.
#[derive(Clone)]
pub struct YatanTutarService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl YatanTutarService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Lists deposits sorted by deposit date, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Model>, ServiceError> {
        let records = Entity::find()
            .order_by_desc(yatan_tutar::Column::YatisTarihi)
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

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateYatanTutarInput) -> Result<Model, ServiceError> {
        if input.donem_bitis < input.donem_baslangic {
            return Err(ServiceError::ValidationError(
                "Period end must not precede period start".into(),
            ));
        }

        let model = yatan_tutar::ActiveModel {
            id: Set(Uuid::new_v4()),
            tutar: Set(input.tutar),
            yatis_tarihi: Set(input.yatis_tarihi),
            donem_baslangic: Set(input.donem_baslangic),
            donem_bitis: Set(input.donem_bitis),
            aciklama: Set(input.aciklama),
            created_at: Set(Utc::now()),
        };

        let created = model.insert(&*self.db).await?;
        self.event_sender
            .send(Event::YatanTutarCreated(created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateYatanTutarInput,
    ) -> Result<Model, ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::ValidationError("Nothing to update".into()));
        }

        let existing = Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Deposit record {} not found", id)))?;

        let donem_baslangic = input.donem_baslangic.unwrap_or(existing.donem_baslangic);
        let donem_bitis = input.donem_bitis.unwrap_or(existing.donem_bitis);
        if donem_bitis < donem_baslangic {
            return Err(ServiceError::ValidationError(
                "Period end must not precede period start".into(),
            ));
        }

        let mut active: yatan_tutar::ActiveModel = existing.into();
        if let Some(v) = input.tutar {
            active.tutar = Set(v);
        }
        if let Some(v) = input.yatis_tarihi {
            active.yatis_tarihi = Set(v);
        }
        active.donem_baslangic = Set(donem_baslangic);
        active.donem_bitis = Set(donem_bitis);
        if let Some(v) = input.aciklama {
            active.aciklama = Set(Some(v));
        }

        let updated = active.update(&*self.db).await?;
        self.event_sender
            .send(Event::YatanTutarUpdated(updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Deposit record {} not found",
                id
            )));
        }
        self.event_sender.send(Event::YatanTutarDeleted(id)).await;
        Ok(())
    }
}
