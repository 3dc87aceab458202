//! Domain services composed from the repositories.

pub mod auth;
pub mod checkout;
pub mod payment;
