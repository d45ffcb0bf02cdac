//! Request extractors for session handling.
//!
//! 1. Client sends `Authorization: Bearer <session token>`
//! 2. [`session::CurrentSession`] looks the token up in the session store
//! 3. The role router (or one of the `Require*` extractors) checks the
//!    session's role before the handler touches the database
//!
//! ```ignore
//! use crate::middleware::session::{Authenticated, RequireAdmin};
//!
//! async fn me(Authenticated(session): Authenticated) -> impl IntoResponse { /* ... */ }
//! async fn list_faculty(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse { /* ... */ }
//! ```

pub mod session;
