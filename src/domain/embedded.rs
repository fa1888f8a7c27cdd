//! Append/remove operations over ordered sub-collections embedded in a
//! parent document (likes, comments, experience and education entries).
//!
//! All operations are pure over the in-memory `Vec`; the handler layer owns
//! loading and persisting the parent document. Lookups are linear scans and
//! the first match wins.

use thiserror::Error;
use uuid::Uuid;

/// Sub-document owned exclusively by a parent document.
pub trait EmbeddedEntry {
    fn entry_id(&self) -> Uuid;

    /// User that created the entry, for kinds that track authorship.
    fn authored_by(&self) -> Option<Uuid> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("an entry by this author already exists")]
    Duplicate,

    #[error("entry not found")]
    NotFound,

    #[error("entry belongs to another user")]
    Forbidden,
}

/// Prepend `entry`; sub-collections are ordered most-recent-first.
pub fn append<E: EmbeddedEntry>(entries: &mut Vec<E>, entry: E) {
    entries.insert(0, entry);
}

/// Prepend `entry`, rejecting a second entry by the same author.
pub fn append_unique_author<E: EmbeddedEntry>(entries: &mut Vec<E>, entry: E) -> Result<(), EditError> {
    if let Some(author) = entry.authored_by() {
        if entries.iter().any(|e| e.authored_by() == Some(author)) {
            return Err(EditError::Duplicate);
        }
    }
    entries.insert(0, entry);
    Ok(())
}

/// Remove the entry with `entry_id`. Remaining entries keep their order.
pub fn remove<E: EmbeddedEntry>(entries: &mut Vec<E>, entry_id: Uuid) -> Result<E, EditError> {
    let index = entries
        .iter()
        .position(|e| e.entry_id() == entry_id)
        .ok_or(EditError::NotFound)?;
    Ok(entries.remove(index))
}

/// Remove the entry with `entry_id`, allowed only for its author.
///
/// Keyed strictly on the entry id; the requester is an ownership gate, never
/// a lookup key.
pub fn remove_owned<E: EmbeddedEntry>(
    entries: &mut Vec<E>,
    entry_id: Uuid,
    requester: Uuid,
) -> Result<E, EditError> {
    let index = entries
        .iter()
        .position(|e| e.entry_id() == entry_id)
        .ok_or(EditError::NotFound)?;
    if entries[index].authored_by() != Some(requester) {
        return Err(EditError::Forbidden);
    }
    Ok(entries.remove(index))
}

/// Remove the first entry authored by `author` (unlike path; the uniqueness
/// invariant means at most one can exist).
pub fn remove_by_author<E: EmbeddedEntry>(entries: &mut Vec<E>, author: Uuid) -> Result<E, EditError> {
    let index = entries
        .iter()
        .position(|e| e.authored_by() == Some(author))
        .ok_or(EditError::NotFound)?;
    Ok(entries.remove(index))
}
