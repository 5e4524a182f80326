pub mod checkin;
pub mod guest;
pub mod health;
