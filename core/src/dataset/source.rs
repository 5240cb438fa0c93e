use crate::dataset::tags::{get_string_value, SOP_INSTANCE_UID};
use crate::error::{Result, SplitError};
use dicom_object::{open_file, FileDicomObject, InMemDicomObject};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A DICOM file accepted by [`DicomDirectory`]
#[derive(Debug, Clone)]
pub struct DicomEntry {
    /// Path of the file on disk
    pub path: PathBuf,

    /// Parsed file object, including its meta group
    pub dataset: FileDicomObject<InMemDicomObject>,
}

/// Why a directory entry was left out of the sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum SkipReason {
    /// The file could not be parsed as DICOM
    Unreadable(String),
    /// The file parsed but carries no SOPInstanceUID
    MissingInstanceUid,
}

/// A directory entry that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Single-pass sequence of the valid DICOM files in a directory
///
/// The listing is taken when the directory is opened; files are parsed
/// lazily as the sequence advances. Entries that fail to parse, or that
/// have no SOPInstanceUID, are skipped with a warning and recorded in
/// [`DicomDirectory::skipped`].
///
/// # Example
///
/// ```no_run
/// use dicomsplit_core::DicomDirectory;
///
/// let mut directory = DicomDirectory::open("scans/session1").unwrap();
/// for entry in directory.by_ref() {
///     println!("{}", entry.path.display());
/// }
/// println!("skipped {} files", directory.skipped().len());
/// ```
#[derive(Debug)]
pub struct DicomDirectory {
    directory: PathBuf,
    pending: std::vec::IntoIter<PathBuf>,
    skipped: Vec<SkippedFile>,
}

impl DicomDirectory {
    /// Lists `directory`
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::ReadDirectory`] if the directory cannot be listed.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let read_error = |source| SplitError::ReadDirectory {
            path: directory.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&directory).map_err(read_error)? {
            paths.push(entry.map_err(read_error)?.path());
        }
        debug!("Listed {} entries in {}", paths.len(), directory.display());

        Ok(Self {
            directory,
            pending: paths.into_iter(),
            skipped: Vec::new(),
        })
    }

    /// The directory being listed
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Entries skipped so far
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Consumes the sequence and returns the skipped entries
    pub fn into_skipped(self) -> Vec<SkippedFile> {
        self.skipped
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match &reason {
            SkipReason::Unreadable(e) => warn!("{} is not a valid DICOM file: {}", name, e),
            SkipReason::MissingInstanceUid => {
                warn!("{} is not a valid DICOM file: no SOPInstanceUID", name)
            }
        }
        self.skipped.push(SkippedFile { path, reason });
    }
}

impl Iterator for DicomDirectory {
    type Item = DicomEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(path) = self.pending.next() {
            let dataset = match open_file(&path) {
                Ok(dataset) => dataset,
                Err(e) => {
                    self.skip(path, SkipReason::Unreadable(e.to_string()));
                    continue;
                }
            };

            let has_instance_uid = get_string_value(&dataset, SOP_INSTANCE_UID)
                .map(|uid| !uid.is_empty())
                .unwrap_or(false);
            if !has_instance_uid {
                self.skip(path, SkipReason::MissingInstanceUid);
                continue;
            }

            return Some(DicomEntry { path, dataset });
        }
        None
    }
}
