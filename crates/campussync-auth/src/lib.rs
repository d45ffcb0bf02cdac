//! # CampusSync Auth
//!
//! Who is acting, and whether they may.
//!
//! - [`verifier`]: checks an (identifier, secret, claimed role) triple against
//!   the store for that role and produces an [`Identity`]
//! - [`session`]: opaque-token sessions holding one `Identity` each, with TTL
//!   expiry behind the [`SessionStore`] seam
//! - [`router`]: maps every action name to the one role allowed to perform it
//!   and checks a session against it before any write happens
//! - [`store`]: the per-role credential lookup the verifier reads from
//!
//! # Example
//!
//! ```ignore
//! use campussync_auth::{CredentialVerifier, router};
//!
//! let identity = verifier.verify("stu1@x.com", "pw", "student").await?;
//! let session = sessions.create(identity).await?;
//!
//! let (action, actor) = router::authorize_action(Some(&session), "saveAttendance")?;
//! ```

pub mod identity;
pub mod router;
pub mod session;
pub mod store;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

// Re-export commonly used types at crate root
pub use identity::Identity;
pub use router::{Action, authorize, authorize_action, authorize_student_record};
pub use session::{InMemorySessionStore, Session, SessionError, SessionStore, generate_token};
pub use store::{CredentialRecord, CredentialStore, PgCredentialStore};
pub use verifier::CredentialVerifier;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryCredentialStore;
