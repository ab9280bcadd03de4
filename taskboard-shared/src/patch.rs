/// Tri-state field wrapper for partial updates
///
/// A JSON update payload can leave a field out, set it to `null`, or give it
/// a value. `Option<T>` collapses the first two, so update payloads use
/// `Patch<T>` with `#[serde(default)]` instead:
///
/// - field missing  → [`Patch::Absent`] (leave unchanged)
/// - `null`         → [`Patch::Null`] (clear, where the column allows it)
/// - a value        → [`Patch::Value`] (overwrite)
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use taskboard_shared::patch::Patch;
///
/// #[derive(Deserialize)]
/// struct UpdateTask {
///     #[serde(default)]
///     title: Patch<String>,
///     #[serde(default)]
///     content: Patch<String>,
/// }
///
/// let update: UpdateTask = serde_json::from_str(r#"{"content": null}"#).unwrap();
/// assert!(update.title.is_absent());
/// assert!(update.content.is_null());
/// ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial-update payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not present in the payload
    #[default]
    Absent,

    /// Field explicitly set to `null`
    Null,

    /// Field set to a value
    Value(T),
}

/// Error returned when `null` is sent for a field that cannot be cleared
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must not be null")]
pub struct NullNotAllowed {
    /// Name of the offending field
    pub field: &'static str,
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// Returns the value if one was supplied
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into the `Option<Option<T>>` shape used by model update structs
    ///
    /// `None` means "leave unchanged", `Some(None)` means "clear".
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(value) => Some(Some(value)),
        }
    }

    /// Converts a patch for a NOT NULL column
    ///
    /// # Errors
    ///
    /// Returns [`NullNotAllowed`] when the payload carried an explicit `null`.
    pub fn into_required(self, field: &'static str) -> Result<Option<T>, NullNotAllowed> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(NullNotAllowed { field }),
            Patch::Value(value) => Ok(Some(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present; missing keys hit `Default`
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}
