use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

pub type NoteId = String;

/// A single note as stored under the notes key.
///
/// Timestamps are kept as epoch milliseconds on disk. Title and body are not
/// validated here; the form owns that rule, so decoding accepts whatever is
/// stored. Missing or `null` fields are filled in through [`StoredNote`] so a
/// single damaged record never rejects the whole collection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "StoredNote")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lenient on-disk shape of a note.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNote {
    #[serde(default)]
    id: Option<NoteId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<StoredNote> for Note {
    fn from(raw: StoredNote) -> Self {
        let id = raw.id.unwrap_or_else(|| {
            let id = generate_id();
            log::warn!("event=note_repair field=id id={}", id);
            id
        });
        // A record with neither timestamp dates from the epoch.
        let created_at = raw.created_at.or(raw.updated_at).unwrap_or_default();
        Note {
            id,
            title: raw.title.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Raw title/body pair handed from the form to the notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
}

impl Note {
    pub fn new(id: NoteId, title: String, body: String) -> Self {
        let now = now();
        Note {
            id,
            title,
            body,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Random v4 UUID from the OS source, or `<millis>-<hex>` when the OS source
/// cannot be read.
pub fn generate_id() -> NoteId {
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string(),
        Err(err) => {
            log::warn!("event=id_fallback reason={}", err);
            fallback_id(Utc::now())
        }
    }
}

fn fallback_id(at: DateTime<Utc>) -> NoteId {
    let seed = at.timestamp_nanos_opt().unwrap_or_default() as u64;
    let suffix: u64 = StdRng::seed_from_u64(seed).gen();
    format!("{}-{:x}", at.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generated_ids_are_uuids_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn fallback_id_is_prefixed_with_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = fallback_id(at);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, "1700000000123");
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn decodes_the_stored_layout() {
        let raw = r#"{"id":"n1","title":"Grocery list","body":"milk",
            "createdAt":1700000000000,"updatedAt":1700000005000}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.id, "n1");
        assert_eq!(note.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(
            note.updated_at.map(|d| d.timestamp_millis()),
            Some(1_700_000_005_000)
        );

        let encoded = serde_json::to_value(&note).unwrap();
        assert_eq!(encoded["createdAt"], 1_700_000_000_000i64);
        assert_eq!(encoded["body"], "milk");
    }

    #[test]
    fn tolerates_missing_fields_in_hand_edited_data() {
        let raw = r#"{"id":"n2","createdAt":1700000000000}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert!(note.title.is_empty());
        assert!(note.body.is_empty());
        assert!(note.updated_at.is_none());
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let raw = r#"{"id":"n3","title":null,"body":null,"updatedAt":1700000005000}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.body, "");
        assert_eq!(note.created_at.timestamp_millis(), 1_700_000_005_000);
    }

    #[test]
    fn undated_note_falls_back_to_the_epoch() {
        let raw = r#"{"title":"Orphan","createdAt":null}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.created_at.timestamp_millis(), 0);
        assert!(note.updated_at.is_none());
        assert!(!note.id.is_empty());
    }

    #[test]
    fn new_note_has_equal_timestamps() {
        let note = Note::new("x".into(), "A".into(), "B".into());
        assert_eq!(note.updated_at, Some(note.created_at));
    }
}
