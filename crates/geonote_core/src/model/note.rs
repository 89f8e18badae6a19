//! Note domain model.
//!
//! # Responsibility
//! - Define the record shape stored in the collection slot.
//! - Provide creation (`NewNote`) and shallow-merge (`NotePatch`) inputs.
//!
//! # Invariants
//! - `id` is an opaque string; new notes get a UUID v4, stored ids of any
//!   other shape are kept as-is.
//! - `created_at` is ISO-8601 UTC with millisecond precision and `Z` suffix.
//! - Coordinates, title and category are accepted as-is, without validation.
//! - A non-finite coordinate is written as `null` and read back as NaN, so
//!   one such note never makes the rest of the slot unreadable.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a note, persisted as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Fresh random identifier (hyphenated UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(value))
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One user-created geographic annotation.
///
/// Serialized field names follow the persisted slot format:
/// `id`, `lat`, `lng`, `title`, `description`, `category`, `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(deserialize_with = "coordinate_or_nan")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate_or_nan")]
    pub lng: f64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form grouping key; compared case-sensitively.
    pub category: String,
    pub created_at: String,
}

impl Note {
    /// Builds a note from caller input with a fresh id and creation timestamp.
    pub fn create(input: NewNote) -> Self {
        Self::with_id(NoteId::generate(), now_iso8601(), input)
    }

    /// Builds a note with caller-provided identity.
    ///
    /// `create` delegates here; tests use it to build notes with fixed
    /// identity and timestamps.
    pub fn with_id(id: NoteId, created_at: impl Into<String>, input: NewNote) -> Self {
        Self {
            id,
            lat: input.lat,
            lng: input.lng,
            title: input.title,
            description: input.description,
            category: input.category,
            created_at: created_at.into(),
        }
    }

    /// Returns a copy with every provided patch field applied.
    pub fn merged(&self, patch: &NotePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    /// Shallow merge: `Some` fields overwrite, `None` fields are retained.
    pub fn apply(&mut self, patch: &NotePatch) {
        if let Some(lat) = patch.lat {
            self.lat = lat;
        }
        if let Some(lng) = patch.lng {
            self.lng = lng;
        }
        if let Some(title) = patch.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(description) = patch.description.as_ref() {
            self.description = description.clone();
        }
        if let Some(category) = patch.category.as_ref() {
            self.category = category.clone();
        }
    }
}

/// Create input: every note field except `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewNote {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
}

impl NewNote {
    pub fn new(lat: f64, lng: f64, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            title: title.into(),
            description: None,
            category: category.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial field set for update.
///
/// Has no `id` or `created_at` field, so identity and creation time cannot be
/// overwritten through update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotePatch {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub title: Option<String>,
    /// `Some(None)` clears the description; `None` keeps it.
    pub description: Option<Option<String>>,
    pub category: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn position(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            ..Self::default()
        }
    }

    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.lat.is_none()
            && self.lng.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }
}

/// `serde_json` writes NaN and infinities as `null`; read `null` back as NaN.
fn coordinate_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{now_iso8601, NewNote, Note, NoteId, NotePatch};

    #[test]
    fn timestamp_is_millisecond_utc() {
        let stamp = now_iso8601();
        assert_eq!(stamp.len(), 24);
        assert!(stamp.ends_with('Z'));
        assert_eq!(&stamp[10..11], "T");
        assert_eq!(&stamp[19..20], ".");
    }

    #[test]
    fn serialized_shape_uses_camel_case_and_omits_missing_description() {
        let note = Note::create(NewNote::new(1.0, 2.0, "A", "food"));
        let value = serde_json::to_value(&note).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("createdAt"));
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("description"));
        assert_eq!(object["id"], note.id.as_str());
        assert_eq!(note.id.as_str().len(), 36);
    }

    #[test]
    fn null_coordinates_read_back_as_nan() {
        let raw = r#"{"id":"n1","lat":null,"lng":7.5,"title":"t","category":"c","createdAt":"x"}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.id, NoteId::new("n1"));
        assert!(note.lat.is_nan());
        assert_eq!(note.lng, 7.5);

        let written = serde_json::to_string(&note).unwrap();
        assert!(written.contains(r#""lat":null"#));
    }

    #[test]
    fn patch_keeps_absent_fields_and_can_clear_description() {
        let note = Note::create(NewNote::new(1.0, 2.0, "A", "food").with_description("d"));

        let retitled = note.merged(&NotePatch::title("A2"));
        assert_eq!(retitled.title, "A2");
        assert_eq!(retitled.description.as_deref(), Some("d"));
        assert_eq!(retitled.category, "food");
        assert_eq!(retitled.id, note.id);
        assert_eq!(retitled.created_at, note.created_at);

        let cleared = note.merged(&NotePatch {
            description: Some(None),
            ..NotePatch::default()
        });
        assert_eq!(cleared.description, None);
        assert!(NotePatch::default().is_empty());
    }
}
