use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a time-ordered UUID v7 identifier newtype.
///
/// All SkillSwap entities share the same identifier shape: an opaque
/// UUID v7, sortable by creation time, with a short form for logs.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered identifier (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                format!("{}:{}", $prefix, &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a registered user (credit account holder).
    UserId,
    "usr"
);

uuid_id!(
    /// Reference to a skill in the external skill catalog.
    ///
    /// The core never resolves skill metadata (name, category); it treats
    /// skills as opaque references, exactly like the source of record does.
    SkillId,
    "skl"
);

uuid_id!(
    /// Identity of a match between two users.
    MatchId,
    "mch"
);

uuid_id!(
    /// Identity of a scheduled teaching session.
    SessionId,
    "ses"
);
