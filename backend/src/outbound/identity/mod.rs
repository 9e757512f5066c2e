//! Bundled identity store adapters.
//!
//! - [`InMemoryIdentityStore`] keeps roles, users, and membership edges in
//!   process memory and enforces a [`PasswordPolicy`] on new accounts.
//! - [`SnapshotFile`] loads and saves that store as a JSON document so the
//!   command line can work against a persistent file.

mod file;
mod memory;
mod password;
mod snapshot;

pub use self::file::{SnapshotFile, SnapshotFileError};
pub use self::memory::InMemoryIdentityStore;
pub use self::password::PasswordPolicy;
pub use self::snapshot::{IdentitySnapshot, MembershipRecord, StoredUser};
