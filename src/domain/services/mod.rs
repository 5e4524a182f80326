pub mod checkin_service;
pub mod display_id;
pub mod guest_service;
