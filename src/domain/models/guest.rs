use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub display_id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(display_id: i64, name: String, contact: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_id,
            name,
            contact: normalize_contact(contact),
            created_at: Utc::now(),
        }
    }
}

/// Empty contact strings are stored as NULL.
pub fn normalize_contact(contact: Option<String>) -> Option<String> {
    contact.filter(|c| !c.is_empty())
}

pub struct NewGuest {
    pub name: String,
    pub contact: Option<String>,
}

/// Partial update. `None` leaves the field untouched; `contact: Some("")` clears it.
#[derive(Default)]
pub struct GuestChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
}

/// Case folding applied to stored names and to search terms alike.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// How a free-text search term is matched against guests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestQuery {
    Any,
    /// A numeric term no display id can equal.
    Nothing,
    DisplayId(i64),
    NameContains(String),
}

impl GuestQuery {
    /// Purely numeric terms are exact display-id lookups, anything else is a
    /// case-insensitive name substring.
    pub fn parse(term: Option<&str>) -> Self {
        match term {
            None | Some("") => GuestQuery::Any,
            Some(t) if t.bytes().all(|b| b.is_ascii_digit()) => match t.parse() {
                Ok(display_id) => GuestQuery::DisplayId(display_id),
                Err(_) => GuestQuery::Nothing,
            },
            Some(t) => GuestQuery::NameContains(t.to_string()),
        }
    }

    /// LIKE pattern against the folded name column, with wildcards escaped by `\`.
    pub fn like_pattern(needle: &str) -> String {
        let mut escaped = String::with_capacity(needle.len() + 2);
        escaped.push('%');
        for ch in fold_name(needle).chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { search: None, page: 1, limit: 50 }
    }
}

impl SearchParams {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// Guest plus the state of its current visit, if any.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GuestWithStatus {
    #[serde(flatten)]
    pub guest: Guest,
    pub is_currently_checked_in: bool,
    pub current_checkin_id: Option<String>,
    pub last_checkin_at: Option<DateTime<Utc>>,
}

/// Admin listing row: guest plus visit history figures.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    #[serde(flatten)]
    pub guest: Guest,
    pub is_currently_checked_in: bool,
    pub total_visits: i64,
    pub last_visit_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_count: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total_count,
            total_pages: (total_count + limit_i - 1) / limit_i,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct GuestPage {
    pub guests: Vec<GuestSummary>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_terms_are_display_id_lookups() {
        assert_eq!(GuestQuery::parse(Some("42")), GuestQuery::DisplayId(42));
        assert_eq!(GuestQuery::parse(Some("2026001")), GuestQuery::DisplayId(2026001));
        assert_eq!(GuestQuery::parse(Some("99999999999999999999999")), GuestQuery::Nothing);
    }

    #[test]
    fn test_mixed_terms_are_name_searches() {
        assert_eq!(GuestQuery::parse(Some("ann")), GuestQuery::NameContains("ann".into()));
        assert_eq!(GuestQuery::parse(Some("42a")), GuestQuery::NameContains("42a".into()));
        assert_eq!(GuestQuery::parse(Some(" 42")), GuestQuery::NameContains(" 42".into()));
        assert_eq!(GuestQuery::parse(Some("")), GuestQuery::Any);
        assert_eq!(GuestQuery::parse(None), GuestQuery::Any);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(GuestQuery::like_pattern("Ann"), "%ann%");
        assert_eq!(GuestQuery::like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_folding_covers_non_ascii() {
        assert_eq!(fold_name("Élodie"), "élodie");
        assert_eq!(GuestQuery::like_pattern("ÉLO"), "%élo%");
        assert_eq!(fold_name("ÖZGÜR"), fold_name("özgür"));
    }

    #[test]
    fn test_pagination_rounds_up() {
        assert_eq!(Pagination::new(1, 50, 120).total_pages, 3);
        assert_eq!(Pagination::new(1, 50, 100).total_pages, 2);
        assert_eq!(Pagination::new(1, 50, 0).total_pages, 0);
        assert_eq!(SearchParams { search: None, page: 3, limit: 50 }.offset(), 100);
    }

    #[test]
    fn test_empty_contact_is_normalized_to_none() {
        assert_eq!(normalize_contact(Some(String::new())), None);
        assert_eq!(normalize_contact(None), None);
        assert_eq!(normalize_contact(Some("a@b.io".into())), Some("a@b.io".into()));
    }
}
