//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{User, VerificationRecord};
use crate::error::AccountResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a freshly provisioned user; a concurrent insert for the same
    /// subject is not an error (first writer wins)
    async fn insert_if_absent(&self, user: &User) -> AccountResult<()>;

    /// Find by the token issuer's opaque subject
    async fn find_by_subject(&self, subject: &str) -> AccountResult<Option<User>>;

    /// Find by internal ID
    async fn find_by_id(&self, user_id: Uuid) -> AccountResult<Option<User>>;

    /// Find the user whose *current* verification submission carries this
    /// scan reference (superseded submissions never match)
    async fn find_by_active_scan_ref(&self, scan_ref: &str) -> AccountResult<Option<User>>;

    /// Compare-and-set write: persists the user iff the stored version still
    /// equals `user.version`, bumping it by one. Returns false on conflict.
    async fn update(&self, user: &User) -> AccountResult<bool>;

    /// Archive a superseded verification submission (audit history)
    async fn archive_verification(
        &self,
        user_id: Uuid,
        record: &VerificationRecord,
    ) -> AccountResult<()>;
}
