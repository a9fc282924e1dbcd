//! Search filter over the contact collection.
//!
//! A contact matches when the search term is a case-insensitive substring of its
//! full name `"first last"` or, under [`MatchPolicy::ForwardAndReversed`], of
//! `"last first"`. Matches keep collection order; there is no ranking.
//!
//! Case folding is per character (the first char of `char::to_lowercase`), so
//! character positions in the folded text line up with the original text and
//! highlight ranges can be reported directly.

use crate::domain::Contact;

/// Which name orderings a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Match against `"first last"` only.
    Forward,
    /// Match against `"first last"` and `"last first"`.
    #[default]
    ForwardAndReversed,
}

impl MatchPolicy {
    /// Parses a policy name from configuration.
    ///
    /// Accepts `forward` and `reversed` (or `forward_reversed`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "forward" => Some(Self::Forward),
            "reversed" | "forward_reversed" | "forward-reversed" => Some(Self::ForwardAndReversed),
            _ => None,
        }
    }
}

/// The subsequence of a collection matching the current search term.
///
/// Stores indices into the collection rather than copies. A view is only
/// meaningful together with the collection it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    /// A view containing every contact of a collection of `len` contacts.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Collection index of the `position`-th visible contact.
    ///
    /// Returns `None` for positions past the end of the view, which happens when
    /// a stale position outlives a narrowing search.
    #[must_use]
    pub fn collection_index(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    /// Returns the contact at `position`, or `None` if the position is stale.
    #[must_use]
    pub fn get<'a>(&self, contacts: &'a [Contact], position: usize) -> Option<&'a Contact> {
        self.collection_index(position)
            .and_then(|index| contacts.get(index))
    }

    /// Iterates the visible contacts in collection order.
    pub fn iter<'a>(&'a self, contacts: &'a [Contact]) -> impl Iterator<Item = &'a Contact> + 'a {
        self.indices.iter().filter_map(move |&index| contacts.get(index))
    }
}

/// Computes the filtered view of `contacts` for `term`.
///
/// An empty term yields every contact in collection order.
///
/// # Example
///
/// ```
/// use zontacts::domain::Contact;
/// use zontacts::list::{filter, MatchPolicy};
///
/// let contacts = vec![
///     Contact::new(1u64, "Egor", "Emelyanov", ""),
///     Contact::new(2u64, "Anna", "Ivanova", ""),
/// ];
///
/// let view = filter(&contacts, "ivan", MatchPolicy::ForwardAndReversed);
/// let ids: Vec<_> = view.iter(&contacts).map(|c| c.id.to_string()).collect();
/// assert_eq!(ids, vec!["2"]);
/// ```
#[must_use]
pub fn filter(contacts: &[Contact], term: &str, policy: MatchPolicy) -> FilteredView {
    let _span = tracing::debug_span!("filter_contacts",
        total_contacts = contacts.len(),
        term_len = term.len(),
        policy = ?policy
    ).entered();

    if term.is_empty() {
        return FilteredView::all(contacts.len());
    }

    let needle = fold(term);
    let indices: Vec<usize> = contacts
        .iter()
        .enumerate()
        .filter(|(_, contact)| matches_folded(contact, &needle, policy))
        .map(|(index, _)| index)
        .collect();

    tracing::debug!(matched = indices.len(), "search filter applied");

    FilteredView { indices }
}

/// Computes highlight ranges for `term` within the displayed `"first last"` name.
///
/// Ranges are `(start, end)` character indices with exclusive end. A match found
/// only in the reversed `"last first"` form is mapped back onto the positions the
/// same characters occupy in the forward name. Returns an empty vector when the
/// term is empty or does not match.
#[must_use]
pub fn match_ranges(contact: &Contact, term: &str, policy: MatchPolicy) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return vec![];
    }

    let needle = fold(term);

    if let Some(start) = find(&fold(&contact.full_name()), &needle) {
        return vec![(start, start + needle.len())];
    }

    if policy != MatchPolicy::ForwardAndReversed {
        return vec![];
    }

    let Some(start) = find(&fold(&contact.reversed_name()), &needle) else {
        return vec![];
    };

    let first_len = contact.first_name.chars().count();
    let last_len = contact.last_name.chars().count();

    let positions: Vec<usize> = (start..start + needle.len())
        .map(|reversed_pos| {
            if reversed_pos < last_len {
                first_len + 1 + reversed_pos
            } else if reversed_pos == last_len {
                first_len
            } else {
                reversed_pos - last_len - 1
            }
        })
        .collect();

    coalesce(positions)
}

fn matches_folded(contact: &Contact, needle: &[char], policy: MatchPolicy) -> bool {
    if find(&fold(&contact.full_name()), needle).is_some() {
        return true;
    }
    policy == MatchPolicy::ForwardAndReversed
        && find(&fold(&contact.reversed_name()), needle).is_some()
}

fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Merges sorted-by-construction positions into contiguous `(start, end)` runs.
fn coalesce(mut positions: Vec<usize>) -> Vec<(usize, usize)> {
    positions.sort_unstable();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for pos in positions {
        match ranges.last_mut() {
            Some((_, end)) if *end == pos => *end = pos + 1,
            _ => ranges.push((pos, pos + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Contact> {
        vec![
            Contact::new(1u64, "Egor", "Emelyanov", ""),
            Contact::new(2u64, "Anna", "Ivanova", ""),
            Contact::new(3u64, "Ivan", "Petrov", ""),
            Contact::new(4u64, "Olga", "Smirnova", ""),
        ]
    }

    fn ids(view: &FilteredView, contacts: &[Contact]) -> Vec<String> {
        view.iter(contacts).map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn empty_term_returns_collection_unchanged() {
        let contacts = sample();
        let view = filter(&contacts, "", MatchPolicy::ForwardAndReversed);
        let visible: Vec<Contact> = view.iter(&contacts).cloned().collect();
        assert_eq!(visible, contacts);
    }

    #[test]
    fn matching_is_case_insensitive_and_keeps_order() {
        let contacts = sample();
        let view = filter(&contacts, "IVAN", MatchPolicy::Forward);
        assert_eq!(ids(&view, &contacts), vec!["2", "3"]);
    }

    #[test]
    fn reversed_policy_matches_last_name_first() {
        let contacts = sample();

        let forward = filter(&contacts, "ivanova anna", MatchPolicy::Forward);
        assert!(forward.is_empty());

        let reversed = filter(&contacts, "ivanova anna", MatchPolicy::ForwardAndReversed);
        assert_eq!(ids(&reversed, &contacts), vec!["2"]);
    }

    #[test]
    fn reversed_policy_subsumes_forward() {
        let contacts = sample();
        for term in ["a", "an", "nova", "egor e", "o", "x", "petrov ivan"] {
            let forward = filter(&contacts, term, MatchPolicy::Forward);
            let both = filter(&contacts, term, MatchPolicy::ForwardAndReversed);
            for contact in forward.iter(&contacts) {
                assert!(both.iter(&contacts).any(|c| c.id == contact.id), "term {term:?}");
            }
        }
    }

    #[test]
    fn filtered_contacts_all_match_and_rejected_ones_do_not() {
        let contacts = sample();
        for term in ["a", "ov", "van", "smirnova olga", "zz", " "] {
            let view = filter(&contacts, term, MatchPolicy::ForwardAndReversed);
            let kept: Vec<&Contact> = view.iter(&contacts).collect();
            for contact in &contacts {
                let needle = term.to_lowercase();
                let expected = contact.full_name().to_lowercase().contains(&needle)
                    || contact.reversed_name().to_lowercase().contains(&needle);
                let included = kept.iter().any(|c| c.id == contact.id);
                assert_eq!(included, expected, "term {term:?} contact {}", contact.id);
            }
        }
    }

    #[test]
    fn stale_positions_resolve_to_nothing() {
        let contacts = sample();
        let view = filter(&contacts, "ivan", MatchPolicy::Forward);
        assert!(view.get(&contacts, 1).is_some());
        assert!(view.get(&contacts, 2).is_none());
        assert!(view.collection_index(99).is_none());
    }

    #[test]
    fn forward_match_highlights_contiguous_range() {
        let anna = Contact::new(2u64, "Anna", "Ivanova", "");
        assert_eq!(match_ranges(&anna, "na iv", MatchPolicy::Forward), vec![(2, 7)]);
        assert!(match_ranges(&anna, "", MatchPolicy::Forward).is_empty());
        assert!(match_ranges(&anna, "zz", MatchPolicy::ForwardAndReversed).is_empty());
    }

    #[test]
    fn reversed_match_maps_back_to_forward_positions() {
        // "Anna Ivanova" forward, "Ivanova Anna" reversed.
        let anna = Contact::new(2u64, "Anna", "Ivanova", "");

        // "ova an" covers "ova" at the end of the last name, the space, and "An".
        let ranges = match_ranges(&anna, "ova an", MatchPolicy::ForwardAndReversed);
        assert_eq!(ranges, vec![(0, 2), (4, 5), (9, 12)]);

        assert!(match_ranges(&anna, "ova an", MatchPolicy::Forward).is_empty());
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(MatchPolicy::from_name("forward"), Some(MatchPolicy::Forward));
        assert_eq!(MatchPolicy::from_name(" Reversed "), Some(MatchPolicy::ForwardAndReversed));
        assert_eq!(MatchPolicy::from_name("fuzzy"), None);
    }
}
