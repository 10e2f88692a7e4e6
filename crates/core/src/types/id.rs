//! Newtype IDs for type-safe entity references.
//!
//! The spa API is inconsistent about id encoding: some endpoints return
//! `"id": 12`, others `"id": "12"` or an opaque string. Every id is therefore
//! stored as a string and accepts either JSON form on deserialization.

use serde::Deserialize;

/// Raw JSON id as sent by the API.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use serenity_core::define_id;
/// define_id!(RoomId);
/// define_id!(TherapistId);
///
/// let room = RoomId::new("7");
/// let therapist = TherapistId::new("7");
///
/// // These are different types, so this won't compile:
/// // let _: RoomId = therapist;
/// assert_eq!(room.as_str(), therapist.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_raw_id(deserializer).map(Self)
            }
        }

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Deserialize an id that may be a JSON string or integer.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor an integer.
pub fn deserialize_raw_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

// Define standard entity IDs
define_id!(ServiceId);
define_id!(PackageId);
define_id!(BlogId);
define_id!(TestimonialId);
define_id!(ContactId);

/// Which catalog a cart item came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Service,
    Package,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Package => "package",
        }
    }
}

/// Anything that can be placed in the cart.
///
/// Services and packages live in separate tables and may share a numeric
/// id, so the catalog kind is part of the identity.
///
/// ```rust
/// # use serenity_core::types::{ItemId, PackageId, ServiceId};
/// let service = ItemId::from(ServiceId::new("3"));
/// let package = ItemId::from(PackageId::new("3"));
/// assert_ne!(service, package);
/// assert_eq!(service.to_string(), "service:3");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize
)]
pub struct ItemId {
    kind: ItemKind,
    #[serde(deserialize_with = "deserialize_raw_id")]
    id: String,
}

impl ItemId {
    #[must_use]
    pub fn service(id: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Service,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn package(id: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Package,
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The catalog id without its kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

impl From<ServiceId> for ItemId {
    fn from(id: ServiceId) -> Self {
        Self::service(id.0)
    }
}

impl From<PackageId> for ItemId {
    fn from(id: PackageId) -> Self {
        Self::package(id.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_integer_json() {
        let id: ServiceId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_id_from_string_json() {
        let id: PackageId = serde_json::from_str("\"pkg-7\"").unwrap();
        assert_eq!(id, PackageId::new("pkg-7"));
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = BlogId::new("9");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"9\"");
    }

    #[test]
    fn test_id_rejects_objects() {
        assert!(serde_json::from_str::<ContactId>("{}").is_err());
    }

    #[test]
    fn test_item_id_keeps_catalog_kind() {
        let service = ItemId::from(ServiceId::new("3"));
        let package = ItemId::from(PackageId::new("3"));
        assert_eq!(service, ItemId::service("3"));
        assert_eq!(package.kind(), ItemKind::Package);
        assert_eq!(service.as_str(), package.as_str());
        assert_ne!(service, package);
    }

    #[test]
    fn test_item_id_json_carries_kind() {
        let id: ItemId = serde_json::from_str(r#"{"kind":"package","id":7}"#).unwrap();
        assert_eq!(id, ItemId::package("7"));
        assert_eq!(
            serde_json::to_string(&ItemId::service("2")).unwrap(),
            r#"{"kind":"service","id":"2"}"#
        );
    }
}
