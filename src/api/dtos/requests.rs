use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::models::{
    checkin::CheckinFilter,
    guest::{GuestChanges, NewGuest, SearchParams},
};

/// Accepts an empty string (meaning "no contact") or an email address.
fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    if contact.is_empty() || contact.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("contact must be a valid email address".into()))
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_contact"))]
    pub contact: Option<String>,
}

impl From<CreateGuestRequest> for NewGuest {
    fn from(req: CreateGuestRequest) -> Self {
        Self { name: req.name, contact: req.contact }
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateGuestRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_contact"))]
    pub contact: Option<String>,
}

impl From<UpdateGuestRequest> for GuestChanges {
    fn from(req: UpdateGuestRequest) -> Self {
        Self { name: req.name, contact: req.contact }
    }
}

#[derive(Deserialize, Validate)]
pub struct GuestSearchQuery {
    pub search: Option<String>,
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl From<GuestSearchQuery> for SearchParams {
    fn from(q: GuestSearchQuery) -> Self {
        let defaults = SearchParams::default();
        Self {
            search: q.search,
            page: q.page.unwrap_or(defaults.page),
            limit: q.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Deserialize)]
pub struct PublicSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
}

impl From<CheckinListQuery> for CheckinFilter {
    fn from(q: CheckinListQuery) -> Self {
        Self {
            start_date: q.start_date,
            end_date: q.end_date,
            guest_name: q.guest_name,
        }
    }
}
