//! Note storage: the per-user note lifecycle (add, list, delete, clear, search).
//!
//! Display positions are 1-based and computed at read time from the user's
//! notes in insertion order, so they shift after deletions.

use std::num::IntErrorKind;

use async_trait::async_trait;

use crate::{
    domain::{NoteId, UserId},
    errors::{Error, InvalidPosition},
    Result,
};

mod memory;
mod sqlite;

pub use memory::MemoryNoteStore;
pub use sqlite::SqliteNoteStore;

/// A stored note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
}

/// A note as shown to the user: its current 1-based position and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedNote {
    pub index: usize,
    pub text: String,
}

/// Storage port for notes. Every operation is scoped to one user.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Append a note and return the user's new note count.
    async fn add(&self, user_id: UserId, text: &str) -> Result<usize>;

    /// All of the user's notes in insertion order.
    async fn list(&self, user_id: UserId) -> Result<Vec<ListedNote>>;

    /// Delete the note at a 1-based position of the current listing and return its text.
    ///
    /// Out-of-range positions fail with `InvalidPosition::OutOfRange` and leave the store as is.
    async fn delete_at(&self, user_id: UserId, position: i64) -> Result<String>;

    /// Remove every note of the user. Other users are unaffected.
    async fn clear(&self, user_id: UserId) -> Result<()>;

    /// Case-insensitive substring search, numbered consistently with `list`.
    async fn search(&self, user_id: UserId, query: &str) -> Result<Vec<ListedNote>>;

    async fn count(&self, user_id: UserId) -> Result<usize>;
}

/// Resolve a `/delete` argument to a position. Only the first word counts.
///
/// Range checking happens in the store, which knows the current count. Integers
/// too large for `i64` saturate so they fail there as out of range.
pub fn parse_position(args: &str) -> Result<i64> {
    let Some(first) = args.split_whitespace().next() else {
        return Err(InvalidPosition::Missing.into());
    };
    match first.parse::<i64>() {
        Ok(position) => Ok(position),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(InvalidPosition::NotANumber(first.to_string()).into()),
        },
    }
}

/// Collapse the `/search` arguments into a single-spaced query.
pub fn normalize_query(args: &str) -> String {
    args.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number a user's ordered notes starting at 1.
pub(crate) fn enumerate_notes<I>(texts: I) -> Vec<ListedNote>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ListedNote { index: i + 1, text })
        .collect()
}

/// Keep the notes whose text contains `query`, ignoring case.
pub(crate) fn filter_matching(notes: Vec<ListedNote>, query: &str) -> Result<Vec<ListedNote>> {
    if query.trim().is_empty() {
        return Err(Error::EmptyQuery);
    }
    let needle = query.to_lowercase();
    Ok(notes
        .into_iter()
        .filter(|n| n.text.to_lowercase().contains(&needle))
        .collect())
}

/// Map a 1-based position onto a 0-based offset, or fail with `OutOfRange`.
pub(crate) fn checked_offset(position: i64, count: usize) -> Result<usize> {
    if position < 1 || position as u64 > count as u64 {
        return Err(InvalidPosition::OutOfRange { position, count }.into());
    }
    Ok((position - 1) as usize)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_position_takes_first_word() {
        assert_eq!(parse_position("3").unwrap(), 3);
        assert_eq!(parse_position("  12 extra words").unwrap(), 12);
        assert_eq!(parse_position("-1").unwrap(), -1);
    }

    #[test]
    fn parse_position_reports_missing_and_non_numeric() {
        assert!(matches!(
            parse_position("   ").unwrap_err(),
            Error::InvalidPosition(InvalidPosition::Missing)
        ));
        match parse_position("two").unwrap_err() {
            Error::InvalidPosition(InvalidPosition::NotANumber(s)) => assert_eq!(s, "two"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            parse_position("1.5").unwrap_err(),
            Error::InvalidPosition(InvalidPosition::NotANumber(_))
        ));
    }

    #[test]
    fn parse_position_saturates_huge_integers() {
        assert_eq!(parse_position("99999999999999999999").unwrap(), i64::MAX);
        assert_eq!(parse_position("-99999999999999999999").unwrap(), i64::MIN);
        assert!(matches!(
            parse_position("9999999999999999999x").unwrap_err(),
            Error::InvalidPosition(InvalidPosition::NotANumber(_))
        ));
    }

    #[test]
    fn normalize_query_collapses_whitespace() {
        assert_eq!(normalize_query("  buy   milk \n"), "buy milk");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn checked_offset_bounds() {
        assert_eq!(checked_offset(1, 3).unwrap(), 0);
        assert_eq!(checked_offset(3, 3).unwrap(), 2);
        assert!(checked_offset(0, 3).is_err());
        assert!(checked_offset(4, 3).is_err());
        assert!(checked_offset(1, 0).is_err());
    }
}
