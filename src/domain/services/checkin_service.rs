use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    models::checkin::{CheckinFilter, CheckinHistoryEntry, CheckinRecord},
    ports::{CheckinRepository, GuestRepository},
};
use crate::error::AppError;

/// Opens and closes visits. Keeps at most one active record per guest.
pub struct CheckinService {
    guest_repo: Arc<dyn GuestRepository>,
    checkin_repo: Arc<dyn CheckinRepository>,
}

impl CheckinService {
    pub fn new(guest_repo: Arc<dyn GuestRepository>, checkin_repo: Arc<dyn CheckinRepository>) -> Self {
        Self { guest_repo, checkin_repo }
    }

    pub async fn check_in(&self, guest_id: &str) -> Result<CheckinRecord, AppError> {
        let guest = self.guest_repo.find_by_id(guest_id).await?
            .ok_or(AppError::GuestNotFound)?;

        if self.checkin_repo.find_active_by_guest(&guest.id).await?.is_some() {
            warn!(guest_id = %guest.id, "Rejected check-in: already on site");
            return Err(AppError::AlreadyCheckedIn);
        }

        let record = CheckinRecord::new(guest.id);
        let created = self.checkin_repo.create(&record).await?;

        info!(guest_id = %created.guest_id, checkin_id = %created.id, "Guest checked in");
        Ok(created)
    }

    pub async fn check_out(&self, guest_id: &str) -> Result<CheckinRecord, AppError> {
        let guest = self.guest_repo.find_by_id(guest_id).await?
            .ok_or(AppError::GuestNotFound)?;

        let mut record = self.checkin_repo.find_active_by_guest(&guest.id).await?
            .ok_or_else(|| {
                warn!(guest_id = %guest.id, "Rejected check-out: not on site");
                AppError::NotCheckedIn
            })?;

        record.close();
        let closed = self.checkin_repo.close(&record).await?;

        info!(guest_id = %closed.guest_id, checkin_id = %closed.id, "Guest checked out");
        Ok(closed)
    }

    pub async fn list_checkins(&self, filter: &CheckinFilter) -> Result<Vec<CheckinHistoryEntry>, AppError> {
        self.checkin_repo.list(filter).await
    }
}
