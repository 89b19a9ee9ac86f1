//! Typed identifiers per entity kind.
//!
//! Ids are opaque strings. Older snapshots stored numeric ids (timestamps),
//! so deserialization accepts JSON numbers too and keeps their decimal text.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Str(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(x) => x.to_string(),
        }
    }
}

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Fresh random (UUID v4) id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                RawId::deserialize(d).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

element_id!(
    /// Identifier of a [`Point`](super::Point).
    PointId
);
element_id!(
    /// Identifier of a [`LineSegment`](super::LineSegment).
    LineId
);
element_id!(
    /// Identifier of a [`Polygon`](super::Polygon).
    PolygonId
);
element_id!(
    /// Identifier of a [`Note`](super::Note).
    NoteId
);
element_id!(
    /// Identifier of a [`Circle`](super::Circle).
    CircleId
);
element_id!(
    /// Untyped id of any element, as written in note links on the wire.
    ElementId
);
