//! State behind each screen. A page never renders anything: it holds what the
//! screen shows and exposes the actions the screen offers.

pub mod account;
pub mod dashboard;
pub mod listings;
pub mod login;
pub mod offers;
pub mod pickups;
pub mod signup;
