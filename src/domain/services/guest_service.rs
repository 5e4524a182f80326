use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::domain::{
    models::guest::{
        normalize_contact, Guest, GuestChanges, GuestPage, GuestQuery, GuestSummary,
        GuestWithStatus, NewGuest, Pagination, SearchParams,
    },
    ports::{CheckinRepository, GuestRepository, SequenceRepository},
    services::display_id::{self, MAX_SEQUENCE_PER_YEAR},
};
use crate::error::AppError;

const PUBLIC_SEARCH_LIMIT: i64 = 10;

pub struct GuestService {
    guest_repo: Arc<dyn GuestRepository>,
    checkin_repo: Arc<dyn CheckinRepository>,
    sequence_repo: Arc<dyn SequenceRepository>,
}

impl GuestService {
    pub fn new(
        guest_repo: Arc<dyn GuestRepository>,
        checkin_repo: Arc<dyn CheckinRepository>,
        sequence_repo: Arc<dyn SequenceRepository>,
    ) -> Self {
        Self { guest_repo, checkin_repo, sequence_repo }
    }

    pub async fn create_guest(&self, data: NewGuest) -> Result<Guest, AppError> {
        if self.guest_repo.find_by_name(&data.name).await?.is_some() {
            warn!("Rejected registration: name already taken");
            return Err(AppError::DuplicateGuest);
        }

        let display_id = self.generate_display_id().await?;

        let guest = Guest::new(display_id, data.name, data.contact);
        let created = self.guest_repo.create(&guest).await?;

        info!(guest_id = %created.id, display_id = created.display_id, "Guest registered");
        Ok(created)
    }

    async fn generate_display_id(&self) -> Result<i64, AppError> {
        let year = Utc::now().year();
        let sequence = self.sequence_repo.next_for_year(year).await?;

        if sequence > MAX_SEQUENCE_PER_YEAR {
            warn!(year, sequence, "Display id sequence exhausted");
            return Err(AppError::SequenceLimitExceeded);
        }

        let display_id = display_id::compose(year, sequence);

        // The unique index still guards the insert; this catches a counter that
        // was reset or seeded below existing ids.
        if self.guest_repo.find_by_display_id(display_id).await?.is_some() {
            return Err(AppError::DisplayIdGenerationFailed);
        }

        Ok(display_id)
    }

    pub async fn get_guest_by_id(&self, id: &str) -> Result<Option<GuestWithStatus>, AppError> {
        let Some(guest) = self.guest_repo.find_by_id(id).await? else {
            return Ok(None);
        };

        let active = self.checkin_repo.find_active_by_guest(&guest.id).await?;

        Ok(Some(GuestWithStatus {
            guest,
            is_currently_checked_in: active.is_some(),
            current_checkin_id: active.as_ref().map(|c| c.id.clone()),
            last_checkin_at: active.map(|c| c.checkin_at),
        }))
    }

    pub async fn update_guest(&self, id: &str, data: GuestChanges) -> Result<Guest, AppError> {
        let mut guest = self.guest_repo.find_by_id(id).await?
            .ok_or(AppError::GuestNotFound)?;

        if let Some(name) = data.name
            && name != guest.name {
            let taken = self.guest_repo.find_by_name(&name).await?
                .is_some_and(|existing| existing.id != guest.id);
            if taken {
                warn!(guest_id = %id, "Rejected rename: name already taken");
                return Err(AppError::DuplicateGuest);
            }
            guest.name = name;
        }

        if let Some(contact) = data.contact {
            guest.contact = normalize_contact(Some(contact));
        }

        let updated = self.guest_repo.update(&guest).await?;
        info!(guest_id = %id, "Guest updated");
        Ok(updated)
    }

    pub async fn delete_guest(&self, id: &str) -> Result<(), AppError> {
        let guest = self.guest_repo.find_by_id(id).await?
            .ok_or(AppError::GuestNotFound)?;

        if self.checkin_repo.find_active_by_guest(&guest.id).await?.is_some() {
            warn!(guest_id = %id, "Rejected delete: guest is checked in");
            return Err(AppError::GuestCurrentlyCheckedIn);
        }

        self.guest_repo.delete(&guest.id).await?;
        info!(guest_id = %id, "Guest deleted");
        Ok(())
    }

    /// Admin listing with visit statistics.
    pub async fn search_guests(&self, params: SearchParams) -> Result<GuestPage, AppError> {
        let query = GuestQuery::parse(params.search.as_deref());

        let total_count = self.guest_repo.count(&query).await?;
        let guests = self.guest_repo
            .search(&query, i64::from(params.limit), params.offset())
            .await?;

        let ids: Vec<String> = guests.iter().map(|g| g.id.clone()).collect();

        let (active, counts, last_visits) = if ids.is_empty() {
            (Vec::new(), Vec::new(), Vec::new())
        } else {
            (
                self.checkin_repo.list_active_by_guests(&ids).await?,
                self.checkin_repo.count_by_guests(&ids).await?,
                self.checkin_repo.last_checkout_by_guests(&ids).await?,
            )
        };

        let active: HashSet<String> = active.into_iter().map(|c| c.guest_id).collect();
        let counts: HashMap<String, i64> = counts.into_iter().collect();
        let last_visits: HashMap<_, _> = last_visits.into_iter().collect();

        let guests = guests
            .into_iter()
            .map(|guest| GuestSummary {
                is_currently_checked_in: active.contains(&guest.id),
                total_visits: counts.get(&guest.id).copied().unwrap_or(0),
                last_visit_at: last_visits.get(&guest.id).copied(),
                guest,
            })
            .collect();

        Ok(GuestPage {
            guests,
            pagination: Pagination::new(params.page, params.limit, total_count),
        })
    }

    /// Kiosk lookup by badge number or name.
    pub async fn search_guests_public(&self, term: &str) -> Result<Vec<GuestWithStatus>, AppError> {
        let query = GuestQuery::parse(Some(term));

        let guests = self.guest_repo.search(&query, PUBLIC_SEARCH_LIMIT, 0).await?;
        let ids: Vec<String> = guests.iter().map(|g| g.id.clone()).collect();

        let mut active: HashMap<String, _> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.checkin_repo.list_active_by_guests(&ids).await?
                .into_iter()
                .map(|c| (c.guest_id.clone(), c))
                .collect()
        };

        Ok(guests
            .into_iter()
            .map(|guest| {
                let current = active.remove(&guest.id);
                GuestWithStatus {
                    is_currently_checked_in: current.is_some(),
                    current_checkin_id: current.as_ref().map(|c| c.id.clone()),
                    last_checkin_at: current.map(|c| c.checkin_at),
                    guest,
                }
            })
            .collect())
    }
}
