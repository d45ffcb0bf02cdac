//! # CampusSync Core
//!
//! Foundational types shared by every CampusSync crate.
//!
//! - [`errors`]: the typed failure taxonomy (`AuthFailure`, `TransactionError`,
//!   `WriteError`) and the HTTP-facing [`AppError`]
//! - [`secrets`]: pluggable secret comparison (bcrypt or constant-time plaintext)
//! - [`file_storage`]: storage seam for uploaded assignment documents
//!
//! # Example
//!
//! ```ignore
//! use campussync_core::{AppError, AuthFailure, SecretVerifier, BcryptSecrets};
//!
//! let secrets = BcryptSecrets::with_default_cost()?;
//! let stored = secrets.hash("s3cret")?;
//! assert!(secrets.verify("s3cret", &stored)?);
//!
//! let err: AppError = AuthFailure::NoMatch.into();
//! ```

pub mod errors;
pub mod file_storage;
pub mod secrets;

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by the object-safe async seams (storage, sessions,
/// connections) across the workspace.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthFailure, CoreError, TransactionError, WriteError};
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use secrets::{BcryptSecrets, PlaintextSecrets, SecretError, SecretVerifier};
