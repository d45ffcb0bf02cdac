//! Utility modules for the CampusSync API.
//!
//! - [`password`]: hashing secrets for new accounts off the async workers

pub mod password;
