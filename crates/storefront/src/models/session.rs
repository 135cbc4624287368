//! Session state types.
//!
//! The session stores only the user id and email. The full principal,
//! including roles and capability flags, is re-read from the database on
//! every request so that flag changes take effect immediately; nothing
//! privilege-bearing is trusted from the cookie.

use serde::{Deserialize, Serialize};

use marigold_core::UserId;

/// Session keys used to store values in the session.
pub mod session_keys {
    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// The logged-in user reference stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID to re-fetch the principal by.
    pub id: UserId,
    /// Email at login time (display/logging only).
    pub email: String,
}
