//! # CampusSync CLI
//!
//! Administrative and seeding utilities for CampusSync development.
//!
//! Seeded rows are inserted through the same `TransactionContext` the server
//! uses, one transaction per table, in chunked multi-row statements.
//!
//! ## Usage
//!
//! ```ignore
//! use campussync_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default(), &password_hash).await?;
//! ```

pub mod admin;
pub mod seeder;
