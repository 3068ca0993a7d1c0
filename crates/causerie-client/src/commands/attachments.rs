//! Attachment staging commands.

use tracing::debug;

use crate::attachments::{FileCandidate, StagedSummary};
use crate::error::{ClientError, Result};
use crate::state::SharedSession;

/// Stage a batch of selected files on the active composition.
///
/// Unsupported media kinds are discarded silently; a batch that would
/// exceed the capacity is rejected in full. Returns the staged count.
pub fn stage_files(session: &SharedSession, files: Vec<FileCandidate>) -> Result<usize> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    guard.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;

    let staged = guard.composition.stager.add_files(files)?;
    debug!(staged, "Files staged");
    Ok(staged)
}

/// Remove one staged file by position. Out of range is a no-op.
pub fn remove_staged_file(session: &SharedSession, index: usize) -> Result<()> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    guard.composition.stager.remove_file(index);
    Ok(())
}

/// The staged files, projected for display.
pub fn staged_files(session: &SharedSession) -> Result<Vec<StagedSummary>> {
    let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    Ok(guard
        .composition
        .stager
        .staged()
        .iter()
        .map(StagedSummary::from)
        .collect())
}
