use std::sync::Arc;
use crate::domain::ports::{CheckinRepository, GuestRepository, SequenceRepository};
use crate::domain::services::{checkin_service::CheckinService, guest_service::GuestService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub guest_repo: Arc<dyn GuestRepository>,
    pub checkin_repo: Arc<dyn CheckinRepository>,
    pub guest_service: Arc<GuestService>,
    pub checkin_service: Arc<CheckinService>,
}

impl AppState {
    /// Wires the services on top of one storage backend.
    pub fn new(
        config: Config,
        guest_repo: Arc<dyn GuestRepository>,
        checkin_repo: Arc<dyn CheckinRepository>,
        sequence_repo: Arc<dyn SequenceRepository>,
    ) -> Self {
        let guest_service = Arc::new(GuestService::new(
            guest_repo.clone(),
            checkin_repo.clone(),
            sequence_repo,
        ));
        let checkin_service = Arc::new(CheckinService::new(guest_repo.clone(), checkin_repo.clone()));

        Self {
            config,
            guest_repo,
            checkin_repo,
            guest_service,
            checkin_service,
        }
    }
}
