//! Append-only audit log container.

use crate::event::AuditEvent;

/// An in-memory, append-only sequence of audit events.
///
/// Entries are never mutated or removed; the only write operation is
/// `append`, and append order is preserved. A reader that tolerates seeing
/// a prefix can therefore read concurrently with a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog<E: AuditEvent> {
    entries: Vec<E>,
}

impl<E: AuditEvent> AuditLog<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a log from previously persisted entries (assumed time-ordered).
    pub fn from_entries(entries: Vec<E>) -> Self {
        Self { entries }
    }

    /// Append one event to the tail of the log.
    pub fn append(&mut self, event: E) {
        self.entries.push(event);
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn last(&self) -> Option<&E> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.entries.iter()
    }
}

impl<E: AuditEvent> Default for AuditLog<E> {
    fn default() -> Self {
        Self::new()
    }
}
