//! Selection toggling over the contact collection.

use crate::domain::{Contact, ContactId};

/// Outcome of a [`toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    /// The new collection.
    pub contacts: Vec<Contact>,
    /// Ids of every selected contact after the toggle, in collection order.
    pub selected_ids: Vec<ContactId>,
    /// Whether a contact with the requested id existed.
    pub changed: bool,
}

/// Flips the selection of the contact with `id` and returns a new collection.
///
/// All other contacts keep their value and position. An unknown id is a silent
/// no-op: the collection comes back unchanged with `changed == false`.
///
/// # Example
///
/// ```
/// use zontacts::domain::Contact;
/// use zontacts::list::toggle;
///
/// let contacts = vec![Contact::new(1u64, "Egor", "Emelyanov", "")];
/// let toggled = toggle(&contacts, &1u64.into());
///
/// assert!(toggled.contacts[0].selected);
/// assert!(!contacts[0].selected);
/// assert_eq!(toggled.selected_ids.len(), 1);
/// ```
#[must_use]
pub fn toggle(contacts: &[Contact], id: &ContactId) -> Toggled {
    let mut changed = false;

    let contacts: Vec<Contact> = contacts
        .iter()
        .map(|contact| {
            if contact.id == *id {
                changed = true;
                Contact {
                    selected: !contact.selected,
                    ..contact.clone()
                }
            } else {
                contact.clone()
            }
        })
        .collect();

    if !changed {
        tracing::debug!(contact_id = %id, "toggle ignored, id not in collection");
    }

    let selected_ids = selected_ids(&contacts);

    Toggled {
        contacts,
        selected_ids,
        changed,
    }
}

/// Ids of the selected contacts, in collection order.
#[must_use]
pub fn selected_ids(contacts: &[Contact]) -> Vec<ContactId> {
    contacts
        .iter()
        .filter(|contact| contact.selected)
        .map(|contact| contact.id.clone())
        .collect()
}
