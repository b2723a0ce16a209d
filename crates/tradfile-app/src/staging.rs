//! Staged document collection
//!
//! [`FileStagingManager`] is the only owner of the working set. Everything
//! else (handlers, the orchestrator, the headless front-end) goes through its
//! operations or reads a [`FileStagingManager::snapshot`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tradfile_core::{is_pdf_path, StagedFile};

/// Ordered, de-duplicated collection of staged documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStagingManager {
    files: Vec<StagedFile>,
}

impl FileStagingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every candidate with a `.pdf` extension that is not already
    /// staged. Returns the number of entries added.
    ///
    /// Duplicates within `candidates` collapse onto the first occurrence.
    pub fn admit<I, P>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut known: HashSet<PathBuf> = self.files.iter().map(|f| f.path.clone()).collect();
        let before = self.files.len();

        for candidate in candidates {
            let path = candidate.into();
            if !is_pdf_path(&path) || known.contains(&path) {
                continue;
            }
            known.insert(path.clone());
            self.files.push(StagedFile::new(path));
        }

        self.files.len() - before
    }

    /// Remove a file unless it is in flight. Returns whether it was removed.
    pub fn dismiss(&mut self, path: &Path) -> bool {
        match self.files.iter().position(|f| f.path == path) {
            Some(index) if !self.files[index].translating => {
                self.files.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Read-only view in insertion order.
    pub fn snapshot(&self) -> &[StagedFile] {
        &self.files
    }

    /// Flag every staged file as in flight.
    pub fn mark_all_translating(&mut self) {
        for file in &mut self.files {
            file.translating = true;
        }
    }

    /// Remove every in-flight file, returning the removed entries in order.
    pub fn remove_translating(&mut self) -> Vec<StagedFile> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.translating);
        self.files = kept;
        removed
    }

    /// Clear the in-flight flag on every file. Returns how many were flagged.
    pub fn release_translating(&mut self) -> usize {
        let mut released = 0;
        for file in self.files.iter_mut().filter(|f| f.translating) {
            file.translating = false;
            released += 1;
        }
        released
    }

    pub fn translating_count(&self) -> usize {
        self.files.iter().filter(|f| f.translating).count()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn get(&self, path: &Path) -> Option<&StagedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
