//! Resource model shared by the HTTP client and its consumers.
//!
//! Every resource instance is built through [`Resource::from_json`] (or the
//! type's [`Default`], which is what `from_json` falls back to field by
//! field). Values are never assembled by copying loose JSON properties onto a
//! struct, so the declared defaults and derived helpers always apply.

use std::fmt;

use serde_json::Value;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use entry::{Entry, EntryKind};

mod amount;
pub mod category;
pub mod entry;

/// Identifier assigned by the backing store on creation.
pub type ResourceId = u64;

/// A typed record exposed by the backing store under a collection path.
pub trait Resource: Clone + fmt::Debug + Default + Send + Sync + 'static {
    /// Collection path relative to the API base (e.g. `api/categories`).
    const COLLECTION: &'static str;

    /// Human readable singular name, used in logs and page titles.
    const LABEL: &'static str;

    fn id(&self) -> Option<ResourceId>;

    fn name(&self) -> Option<&str>;

    /// Builds a fully typed instance from any JSON value.
    ///
    /// Total: unknown fields are ignored, missing or mistyped fields take the
    /// type's declared default, and a non-object input yields the default
    /// instance.
    fn from_json(raw: &Value) -> Self;

    /// Wire shape sent to the backing store.
    fn to_json(&self) -> Value;

    /// Two instances are the same logical record iff both ids are present and
    /// equal.
    fn same_record(&self, other: &Self) -> bool {
        matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b)
    }
}

/// Lenient field readers used by the `from_json` implementations.
pub(crate) mod fields {
    use serde_json::Value;

    use crate::ResourceId;

    fn present<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
        raw.get(key).filter(|value| !value.is_null())
    }

    pub(crate) fn string(raw: &Value, key: &str) -> Option<String> {
        present(raw, key)?.as_str().map(str::to_string)
    }

    /// Ids come back as numbers from the store, but select widgets hand them
    /// over as strings.
    pub(crate) fn id(raw: &Value, key: &str) -> Option<ResourceId> {
        match present(raw, key)? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn boolean(raw: &Value, key: &str) -> Option<bool> {
        match present(raw, key)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => match text.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn object<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
        present(raw, key).filter(|value| value.is_object())
    }

    pub(crate) fn value<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
        present(raw, key)
    }
}
