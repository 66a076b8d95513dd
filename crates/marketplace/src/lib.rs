//! Marketplace listings.
//!
//! The marketplace is a stub: it serves a fixed catalog of interviewer
//! listings and has no storage of its own.

pub mod listing;

pub use listing::{MarketplaceListing, catalog};
