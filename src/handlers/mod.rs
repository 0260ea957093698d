use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::backup::BackupService;
use crate::services::nakliye::NakliyeService;
use crate::services::reports::ReportsService;
use crate::services::yatan_tutar::YatanTutarService;

pub mod auth;
pub mod backup;
pub mod nakliye;
pub mod reports;
pub mod yatan_tutar;

/// All domain services, constructed once at startup and cloned into the
/// application state.
#[derive(Clone)]
pub struct AppServices {
    pub nakliye: NakliyeService,
    pub yatan_tutar: YatanTutarService,
    pub backup: BackupService,
    pub reports: ReportsService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            nakliye: NakliyeService::new(db.clone(), event_sender.clone()),
            yatan_tutar: YatanTutarService::new(db.clone(), event_sender.clone()),
            backup: BackupService::new(db.clone(), event_sender),
            reports: ReportsService::new(db),
        }
    }
}
