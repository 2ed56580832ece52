//! The ordered conversation log.

use crate::entry::Entry;
use crate::error::EngineError;
use atelier_common_core::EntryId;

/// A flat, time-ordered list of entries with unique ids.
///
/// The log owns a monotonic id allocator seeded above the largest id it has
/// ever seen, so ids minted together (a critique/suggestion pair) can never
/// collide with each other or with backend-issued ids already present.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    entries: Vec<Entry>,
    next_id: i64,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    /// An empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a log from persisted entries, preserving order.
    ///
    /// Fails on duplicate ids; the allocator is seeded past the maximum.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, EngineError> {
        let mut log = Self::new();
        for entry in entries {
            log.push(entry)?;
        }
        Ok(log)
    }

    /// Mint a fresh id, unique within this log.
    pub fn allocate_id(&mut self) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, entry: Entry) -> Result<(), EngineError> {
        self.reserve_id(entry.id)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Insert entries immediately after the entry with the given id,
    /// in the order given.
    pub fn insert_after(&mut self, after: EntryId, entries: Vec<Entry>) -> Result<(), EngineError> {
        let index = self
            .position(after)
            .ok_or(EngineError::UnknownEntry(after))?;
        for (i, entry) in entries.iter().enumerate() {
            // Ids must be unique against the log and within the batch.
            if entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(EngineError::DuplicateId(entry.id));
            }
            self.reserve_id(entry.id)?;
        }
        // Splice keeps everything after `after` in original order.
        self.entries.splice(index + 1..index + 1, entries);
        Ok(())
    }

    /// Remove the entries with the given ids, preserving the order of the
    /// rest. Unknown ids are ignored.
    pub fn remove(&mut self, ids: &[EntryId]) {
        self.entries.retain(|e| !ids.contains(&e.id));
    }

    /// Is the id free for a new entry?
    fn reserve_id(&mut self, id: EntryId) -> Result<(), EngineError> {
        if self.contains(id) {
            return Err(EngineError::DuplicateId(id));
        }
        if id.as_i64() >= self.next_id {
            self.next_id = id.as_i64() + 1;
        }
        Ok(())
    }

    /// Does an entry with this id exist?
    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Index of the entry with the given id.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// The entry with the given id.
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries in order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the log empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    #[test]
    fn test_allocate_monotonic() {
        let mut log = ConversationLog::new();
        let a = log.allocate_id();
        let b = log.allocate_id();
        assert!(a < b);
    }

    #[test]
    fn test_allocator_seeded_past_existing_ids() {
        let mut log = ConversationLog::new();
        log.push(Entry::user(EntryId::new(1700000000000), "hi")).unwrap();
        let fresh = log.allocate_id();
        assert!(fresh.as_i64() > 1700000000000);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut log = ConversationLog::new();
        log.push(Entry::user(EntryId::new(1), "a")).unwrap();
        let err = log.push(Entry::user(EntryId::new(1), "b")).unwrap_err();
        assert_eq!(err, EngineError::DuplicateId(EntryId::new(1)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_insert_after_preserves_order() {
        let mut log = ConversationLog::new();
        log.push(Entry::user(EntryId::new(1), "u1")).unwrap();
        log.push(Entry::user(EntryId::new(2), "u2")).unwrap();

        log.insert_after(
            EntryId::new(1),
            vec![
                Entry::critique(EntryId::new(10), EntryId::new(1), "c"),
                Entry::suggestion(EntryId::new(11), EntryId::new(1), "s"),
            ],
        )
        .unwrap();

        let ids: Vec<i64> = log.iter().map(|e| e.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 10, 11, 2]);
    }

    #[test]
    fn test_insert_after_unknown_anchor() {
        let mut log = ConversationLog::new();
        log.push(Entry::user(EntryId::new(1), "u1")).unwrap();
        let err = log
            .insert_after(EntryId::new(99), vec![Entry::user(EntryId::new(2), "x")])
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownEntry(EntryId::new(99)));
    }

    #[test]
    fn test_remove_ignores_unknown_ids() {
        let mut log = ConversationLog::new();
        log.push(Entry::user(EntryId::new(1), "u1")).unwrap();
        log.push(Entry::user(EntryId::new(2), "u2")).unwrap();
        log.remove(&[EntryId::new(2), EntryId::new(42)]);
        assert_eq!(log.len(), 1);
        assert!(log.contains(EntryId::new(1)));
    }

    #[test]
    fn test_from_entries_seeds_allocator() {
        let entries = vec![
            Entry::user(EntryId::new(5), "u"),
            Entry::ai_response(EntryId::new(9), "m", "r", None),
        ];
        let mut log = ConversationLog::from_entries(entries).unwrap();
        assert_eq!(log.allocate_id(), EntryId::new(10));
    }
}
