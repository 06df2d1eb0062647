//! Entry form parsing and validation for the new/edit actions.
//!
//! # Invariants
//! - Validation stops at the first failing field, in the order
//!   title, body, moods; exactly one message is reported.
//! - The edit action reads title and body only; submitted moods are ignored.
//! - Title and body are kept verbatim; only emptiness is rejected.

use moodjournal_core::MoodId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const BODY_REQUIRED: &str = "Body is required";
pub const UNKNOWN_MOOD: &str = "Unknown mood";

/// Raw submitted fields. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryForm {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub moods: Vec<String>,
}

/// Per-field validation messages; serialized with explicit nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub body: Option<String>,
    pub moods: Option<String>,
}

/// Title and body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryText {
    pub title: String,
    pub body: String,
}

/// Form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub title: String,
    pub body: String,
    pub mood_ids: Vec<MoodId>,
}

impl EntryForm {
    /// Builds a form from url-encoded style pairs. Repeated `moods` keys
    /// accumulate; for `title`/`body` the first value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "title" if form.title.is_none() => form.title = Some(value.into()),
                "body" if form.body.is_none() => form.body = Some(value.into()),
                "moods" => form.moods.push(value.into()),
                _ => {}
            }
        }
        form
    }

    /// Validation for the edit action.
    pub fn validate_text(&self) -> Result<EntryText, FieldErrors> {
        let title = required(self.title.as_deref()).ok_or_else(|| FieldErrors {
            title: Some(TITLE_REQUIRED.to_string()),
            ..FieldErrors::default()
        })?;
        let body = required(self.body.as_deref()).ok_or_else(|| FieldErrors {
            body: Some(BODY_REQUIRED.to_string()),
            ..FieldErrors::default()
        })?;
        Ok(EntryText {
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    /// Validation for the new-entry action: title, body, then mood ids.
    pub fn validate(&self) -> Result<ValidEntry, FieldErrors> {
        let EntryText { title, body } = self.validate_text()?;
        let mood_ids = self
            .moods
            .iter()
            .map(|raw| Uuid::parse_str(raw.trim()))
            .collect::<Result<Vec<MoodId>, _>>()
            .map_err(|_| FieldErrors {
                moods: Some(UNKNOWN_MOOD.to_string()),
                ..FieldErrors::default()
            })?;
        Ok(ValidEntry {
            title,
            body,
            mood_ids,
        })
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{EntryForm, BODY_REQUIRED, TITLE_REQUIRED, UNKNOWN_MOOD};
    use uuid::Uuid;

    #[test]
    fn missing_title_is_reported_before_body() {
        let errors = EntryForm::default().validate().unwrap_err();
        assert_eq!(errors.title.as_deref(), Some(TITLE_REQUIRED));
        assert_eq!(errors.body, None);
    }

    #[test]
    fn empty_body_is_reported_when_title_present() {
        let form = EntryForm::from_pairs([("title", "Day one"), ("body", "")]);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.title, None);
        assert_eq!(errors.body.as_deref(), Some(BODY_REQUIRED));
    }

    #[test]
    fn whitespace_only_fields_are_accepted_verbatim() {
        let form = EntryForm::from_pairs([("title", " "), ("body", "  x ")]);
        let valid = form.validate().unwrap();
        assert_eq!(valid.title, " ");
        assert_eq!(valid.body, "  x ");
    }

    #[test]
    fn repeated_mood_keys_accumulate() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let form = EntryForm::from_pairs([
            ("title".to_string(), "t".to_string()),
            ("body".to_string(), "b".to_string()),
            ("moods".to_string(), first.to_string()),
            ("moods".to_string(), second.to_string()),
        ]);
        assert_eq!(form.validate().unwrap().mood_ids, vec![first, second]);
    }

    #[test]
    fn malformed_mood_id_is_a_field_error() {
        let form = EntryForm::from_pairs([("title", "t"), ("body", "b"), ("moods", "happy")]);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.moods.as_deref(), Some(UNKNOWN_MOOD));
    }

    #[test]
    fn edit_validation_ignores_submitted_moods() {
        let form = EntryForm::from_pairs([("title", "t"), ("body", "b"), ("moods", "happy")]);
        let text = form.validate_text().unwrap();
        assert_eq!((text.title.as_str(), text.body.as_str()), ("t", "b"));

        let errors = EntryForm::from_pairs([("body", "b"), ("moods", "happy")])
            .validate_text()
            .unwrap_err();
        assert_eq!(errors.title.as_deref(), Some(TITLE_REQUIRED));
    }

    #[test]
    fn field_errors_serialize_with_nulls() {
        let errors = EntryForm::default().validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": TITLE_REQUIRED, "body": null, "moods": null })
        );
    }
}
