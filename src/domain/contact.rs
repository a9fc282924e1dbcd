//! Contact domain model.
//!
//! This module defines [`Contact`], the unit of the contact list, its opaque
//! identifier [`ContactId`], and [`ContactRecord`], the shape delivered by a
//! contact source before selection state is attached.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque, unique contact identifier.
///
/// Sources may deliver ids as JSON numbers or strings; both forms map onto the
/// same textual id, so `1` and `"1"` identify the same contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct ContactId(String);

impl ContactId {
    /// Returns the textual form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ContactId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<ContactId> for String {
    fn from(id: ContactId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl From<WireId> for ContactId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => Self::from(n),
            WireId::Text(s) => Self(s),
        }
    }
}

/// A contact as delivered by a contact source.
///
/// Unknown fields in the payload (such as `email`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar: String,
}

/// A contact shown in the list.
///
/// `selected` is local UI state: it starts as `false` when the collection is
/// loaded and is only ever changed by a toggle, which produces a new collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub selected: bool,
}

impl Contact {
    /// Creates an unselected contact.
    pub fn new(
        id: impl Into<ContactId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar: avatar.into(),
            selected: false,
        }
    }

    /// Returns `"first last"`, the name searched and displayed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns `"last first"`, the name searched under the reversed policy.
    #[must_use]
    pub fn reversed_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Returns up to two uppercase initials, used in place of the avatar image.
    #[must_use]
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            avatar: record.avatar,
            selected: false,
        }
    }
}

/// Builds a collection from fetched records.
///
/// Every contact starts unselected and fetch order is preserved. Records whose id
/// was already seen are dropped (first occurrence wins) so ids stay unique within
/// the collection.
#[must_use]
pub fn collection_from_records(records: Vec<ContactRecord>) -> Vec<Contact> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut contacts = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.id.clone()) {
            contacts.push(Contact::from(record));
        } else {
            tracing::warn!(contact_id = %record.id, "dropping contact with duplicate id");
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_are_the_same_id() {
        let records: Vec<ContactRecord> = serde_json::from_str(
            r#"[{"id": 7, "first_name": "A", "last_name": "B", "avatar": ""},
                {"id": "7", "first_name": "C", "last_name": "D", "avatar": ""}]"#,
        )
        .unwrap();
        assert_eq!(records[0].id, records[1].id);
        assert_eq!(records[0].id.as_str(), "7");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record: ContactRecord = serde_json::from_str(
            r#"{"id": 1, "email": "egor@example.com", "first_name": "Egor", "last_name": "Emelyanov", "avatar": "https://example.com/1.jpg"}"#,
        )
        .unwrap();
        assert_eq!(record.first_name, "Egor");
        assert_eq!(record.avatar, "https://example.com/1.jpg");
    }

    #[test]
    fn collection_starts_unselected_and_drops_duplicates() {
        let records = vec![
            ContactRecord { id: 1u64.into(), first_name: "Egor".into(), last_name: "Emelyanov".into(), avatar: String::new() },
            ContactRecord { id: 2u64.into(), first_name: "Anna".into(), last_name: "Ivanova".into(), avatar: String::new() },
            ContactRecord { id: 1u64.into(), first_name: "Dup".into(), last_name: "Licate".into(), avatar: String::new() },
        ];

        let contacts = collection_from_records(records);

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].first_name, "Egor");
        assert_eq!(contacts[1].first_name, "Anna");
        assert!(contacts.iter().all(|c| !c.selected));
    }

    #[test]
    fn names_and_initials() {
        let contact = Contact::new(2u64, "anna", "Ivanova", "");
        assert_eq!(contact.full_name(), "anna Ivanova");
        assert_eq!(contact.reversed_name(), "Ivanova anna");
        assert_eq!(contact.initials(), "AI");
        assert_eq!(Contact::new(3u64, "", "", "").initials(), "");
    }
}
