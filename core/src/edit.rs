//! Single-record edit session backing the edit modal.
//!
//! The buffer is a detached copy of one record. Nothing is written back to
//! the loaded list until the server accepts the update; commits are not
//! serialized, so overlapping saves resolve as last-response-wins.

use tracing::{info, warn};

use crate::client::PersonasClient;
use crate::error::{ApiError, EditError};
use crate::http::HttpRequest;
use crate::types::{Persona, PersonaField};

/// A commit handed to the host: the request to execute and the record it
/// carries, which is what gets spliced into the list on success.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub request: HttpRequest,
    pub record: Persona,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The record at this index of the full list was replaced.
    Replaced(usize),
    /// The server accepted the update but no loaded record has its code.
    Unmatched,
    Failed(EditError),
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    buffer: Option<Persona>,
    visible: bool,
}

impl EditSession {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn buffer(&self) -> Option<&Persona> {
        self.buffer.as_ref()
    }

    pub fn open(&mut self, record: &Persona) {
        self.buffer = Some(record.clone());
        self.visible = true;
    }

    pub fn set_field(&mut self, field: PersonaField, value: impl Into<String>) -> Result<(), EditError> {
        let buffer = self.buffer.as_mut().ok_or(EditError::NotEditing)?;
        buffer.set(field, value);
        Ok(())
    }

    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), EditError> {
        let buffer = self.buffer.as_mut().ok_or(EditError::NotEditing)?;
        buffer.set_by_name(name, value);
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.buffer = None;
        self.visible = false;
    }

    /// Snapshot the buffer into an update request.
    pub fn begin_commit(&self, client: &PersonasClient) -> Result<PendingCommit, EditError> {
        let record = self.buffer.clone().ok_or(EditError::NotEditing)?;
        let request = client.build_update(&record)?;
        Ok(PendingCommit { request, record })
    }

    /// Apply the server's answer to `pending`.
    ///
    /// On success the first record in `records` sharing the pending record's
    /// code is replaced and the modal closes. On failure the buffer, the
    /// list and the modal are left as they were.
    pub fn finish_commit(
        &mut self,
        pending: PendingCommit,
        result: Result<Persona, ApiError>,
        records: &mut [Persona],
    ) -> CommitOutcome {
        if let Err(err) = result {
            warn!(code = %pending.record.code, error = %err, "update failed");
            return CommitOutcome::Failed(err.into());
        }

        let outcome = match records.iter().position(|r| r.code == pending.record.code) {
            Some(index) => {
                info!(code = %pending.record.code, index, "record updated");
                records[index] = pending.record;
                CommitOutcome::Replaced(index)
            }
            None => {
                warn!(code = %pending.record.code, "updated record is not loaded");
                CommitOutcome::Unmatched
            }
        };
        self.cancel();
        outcome
    }
}
