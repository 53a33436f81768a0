//! Append-only, hash-chained event journal.
//!
//! Off-core consumers (the status front end, the oracle server) read events
//! from here. Each entry commits to its predecessor, so any rewrite of
//! history is detected by [`EventJournal::verify`].

use crate::core::{now, Error, Hash256, Result, Timestamp};
use crate::events::event::Event;
use crate::identity::sha3_256_multi;
use serde::{Deserialize, Serialize};

/// One journaled event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 0
    pub sequence: u64,
    pub recorded_at: Timestamp,
    pub event: Event,
    /// Hash of the previous entry, zero for the first
    pub parent_hash: Hash256,
    /// Content hash of this entry
    pub entry_hash: Hash256,
}

impl JournalEntry {
    fn new(sequence: u64, event: Event, parent_hash: Hash256) -> Result<Self> {
        let mut entry = Self {
            sequence,
            recorded_at: now(),
            event,
            parent_hash,
            entry_hash: Hash256::zero(),
        };
        entry.entry_hash = entry.compute_hash()?;
        Ok(entry)
    }

    /// SHA3-256 over every field except the hash itself.
    pub fn compute_hash(&self) -> Result<Hash256> {
        let event_bytes = bincode::serialize(&self.event)?;
        let recorded_at = self.recorded_at.to_rfc3339();
        Ok(sha3_256_multi(&[
            &self.sequence.to_le_bytes(),
            recorded_at.as_bytes(),
            self.parent_hash.as_bytes(),
            &event_bytes,
        ]))
    }
}

/// Result of journal verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JournalVerification {
    pub valid: bool,
    pub entries_verified: u64,
    /// Sequence of the first entry that failed, if any
    pub first_invalid_sequence: Option<u64>,
}

/// The event journal.
#[derive(Clone, Debug, Default)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of the latest entry, zero when empty.
    pub fn head_hash(&self) -> Hash256 {
        self.entries
            .last()
            .map(|entry| entry.entry_hash.clone())
            .unwrap_or_default()
    }

    /// Build entries for `events` chained onto the current head, without
    /// appending them.
    pub fn prepare<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<Vec<JournalEntry>> {
        let mut sequence = self.entries.len() as u64;
        let mut parent = self.head_hash();
        let mut prepared = Vec::new();
        for event in events {
            let entry = JournalEntry::new(sequence, event.clone(), parent)?;
            parent = entry.entry_hash.clone();
            sequence += 1;
            prepared.push(entry);
        }
        Ok(prepared)
    }

    /// Append entries from [`EventJournal::prepare`]. The head must not have
    /// moved in between.
    pub(crate) fn commit(&mut self, entries: Vec<JournalEntry>) {
        self.entries.extend(entries);
    }

    /// Append one event.
    pub fn append(&mut self, event: Event) -> Result<Hash256> {
        let entry = JournalEntry::new(self.entries.len() as u64, event, self.head_hash())?;
        let hash = entry.entry_hash.clone();
        self.entries.push(entry);
        Ok(hash)
    }

    /// Append events in order. Nothing is appended if any entry fails.
    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
        let entries = self.prepare(events)?;
        self.commit(entries);
        Ok(())
    }

    /// Entry at `sequence`.
    pub fn get(&self, sequence: u64) -> Option<&JournalEntry> {
        self.entries.get(sequence as usize)
    }

    /// Entries from `sequence` onwards, for consumers resuming a feed.
    pub fn since(&self, sequence: u64) -> &[JournalEntry] {
        let start = (sequence as usize).min(self.entries.len());
        &self.entries[start..]
    }

    /// Entries whose event has the given name.
    pub fn by_name(&self, name: &str) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.event.name() == name)
            .collect()
    }

    /// All entries.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Check sequence numbers, parent links and content hashes.
    pub fn verify(&self) -> Result<JournalVerification> {
        let mut verification = JournalVerification {
            valid: true,
            entries_verified: 0,
            first_invalid_sequence: None,
        };
        let mut parent = Hash256::zero();

        for (position, entry) in self.entries.iter().enumerate() {
            let intact = entry.sequence == position as u64
                && entry.parent_hash == parent
                && entry.compute_hash()? == entry.entry_hash;

            if !intact {
                verification.valid = false;
                verification.first_invalid_sequence = Some(position as u64);
                break;
            }

            parent = entry.entry_hash.clone();
            verification.entries_verified += 1;
        }

        Ok(verification)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Import from JSON, rejecting a broken chain.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<JournalEntry> = serde_json::from_str(json)?;
        let journal = Self { entries };

        let verification = journal.verify()?;
        if !verification.valid {
            return Err(Error::JournalIntegrityViolated(
                verification.first_invalid_sequence.unwrap_or(0),
            ));
        }

        Ok(journal)
    }
}
