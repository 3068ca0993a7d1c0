//! Pre-send attachment staging.
//!
//! Files are held locally until the send completes; only then do they
//! become persisted attachments with server URLs. A staged image may
//! carry a preview resource (an object URL in a browser shell); every
//! preview is released exactly once, on removal or on clear, with drop as
//! the backstop.

use bytes::Bytes;
use tracing::debug;

use causerie_shared::types::MediaKind;

use crate::error::{ClientError, Result};

/// A handle to a locally created preview resource.
///
/// The wrapped hook runs exactly once: on explicit release, or on drop if
/// nothing released it first.
pub struct PreviewResource {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl PreviewResource {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Run the release hook. Subsequent calls are no-ops.
    pub fn release(&mut self) {
        if let Some(hook) = self.release.take() {
            hook();
        }
    }
}

impl Drop for PreviewResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for PreviewResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewResource")
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// A file the user selected, not yet classified or staged.
#[derive(Debug)]
pub struct FileCandidate {
    pub name: String,
    pub mime: String,
    pub data: Bytes,
    pub preview: Option<PreviewResource>,
}

/// A validated file awaiting send. Carries no server identity.
#[derive(Debug)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub kind: MediaKind,
    pub size: u64,
    pub data: Bytes,
    pub preview: Option<PreviewResource>,
}

/// Lightweight projection of a staged file for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSummary {
    pub name: String,
    pub kind: MediaKind,
    pub size: u64,
}

impl From<&StagedFile> for StagedSummary {
    fn from(file: &StagedFile) -> Self {
        Self {
            name: file.name.clone(),
            kind: file.kind,
            size: file.size,
        }
    }
}

/// Holds and validates files prior to send.
#[derive(Debug)]
pub struct AttachmentStager {
    staged: Vec<StagedFile>,
    max: usize,
}

impl AttachmentStager {
    pub fn new(max: usize) -> Self {
        Self {
            staged: Vec::new(),
            max,
        }
    }

    /// Stage a batch of files.
    ///
    /// Candidates whose MIME type maps to no supported media kind are
    /// discarded silently (their previews release on drop). If the batch
    /// would push the staged count past the capacity, nothing is staged
    /// and the whole add is rejected.
    pub fn add_files(&mut self, candidates: Vec<FileCandidate>) -> Result<usize> {
        let valid: Vec<StagedFile> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let kind = MediaKind::from_mime(&candidate.mime)?;
                Some(StagedFile {
                    size: candidate.data.len() as u64,
                    name: candidate.name,
                    mime: candidate.mime,
                    kind,
                    data: candidate.data,
                    preview: candidate.preview,
                })
            })
            .collect();

        if self.staged.len() + valid.len() > self.max {
            debug!(
                staged = self.staged.len(),
                adding = valid.len(),
                max = self.max,
                "Attachment batch rejected"
            );
            return Err(ClientError::AttachmentCapacity { max: self.max });
        }

        self.staged.extend(valid);
        Ok(self.staged.len())
    }

    /// Remove exactly one staged file by position, releasing its preview.
    /// Out of range is a no-op.
    pub fn remove_file(&mut self, index: usize) {
        if index < self.staged.len() {
            let mut file = self.staged.remove(index);
            if let Some(preview) = file.preview.as_mut() {
                preview.release();
            }
        }
    }

    /// Release every staged preview and empty the set. Called on a
    /// successful send and on room switch.
    pub fn clear(&mut self) {
        for file in &mut self.staged {
            if let Some(preview) = file.preview.as_mut() {
                preview.release();
            }
        }
        self.staged.clear();
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}
