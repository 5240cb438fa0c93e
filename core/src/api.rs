use crate::dataset::tags::{put_strs, IMAGE_POSITION_PATIENT};
use crate::dataset::{
    read_pixel_buffer, set_pixel_data, use_native_encoding, DicomDirectory, DicomEntry,
    PixelBuffer, SkippedFile,
};
use crate::error::{Result, SplitError, SplitWarning};
use crate::identity::{IdentifierRewriter, RunIdentifiers, SourceReference};
use crate::split::{AxisSlice, AxisSplitter};
use crate::types::{SpatialGeometry, SplitConfig};
use dicom_core::VR;
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Splits every DICOM file of a directory into `n` sub-volumes
///
/// Output `i` of every input file is written to `<input>.<i + 1>` under its
/// original file name, with cropped pixels, a recomputed origin and
/// rewritten identifiers.
///
/// # Example
///
/// ```no_run
/// use dicomsplit_core::{DicomSplitter, SplitConfig};
///
/// // two animals side by side along the columns
/// let splitter = DicomSplitter::new(SplitConfig::with_count(2)).unwrap();
/// let summary = splitter.split_directory("scans/cage4").unwrap();
///
/// assert_eq!(summary.outputs.len(), 2);
/// println!("wrote {:?} files per split", summary.files_written);
/// ```
#[derive(Debug, Clone)]
pub struct DicomSplitter {
    config: SplitConfig,
    n: usize,
}

impl DicomSplitter {
    /// Validates `config` and resolves the split count
    ///
    /// # Errors
    ///
    /// Returns the configuration error found by [`SplitConfig::validate`].
    pub fn new(config: SplitConfig) -> Result<Self> {
        let n = config.validate()?;
        Ok(Self { config, n })
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Number of outputs per input file
    pub fn n(&self) -> usize {
        self.n
    }

    /// Splits every valid file of `input`
    ///
    /// Series UIDs, and study UIDs unless assigned per file, are generated
    /// once for this call and shared by every file of the directory.
    ///
    /// # Errors
    ///
    /// Fails if `input` cannot be listed, an output directory cannot be
    /// created or an output file cannot be written. Invalid input files and
    /// unusable pixel data only produce warnings.
    pub fn split_directory(&self, input: impl AsRef<Path>) -> Result<SplitSummary> {
        let input = input.as_ref();
        info!("Splitting {} into {} volumes", input.display(), self.n);

        let mut source = DicomDirectory::open(input)?;
        let outputs = make_output_paths(input, self.n)?;
        let run = RunIdentifiers::new(&self.config, self.n);
        let rewriter = IdentifierRewriter::new(&self.config, &run, self.n);

        let mut summary = SplitSummary::new(input, outputs);
        for entry in source.by_ref() {
            self.split_file(&entry, &rewriter, &mut summary)?;
        }
        summary.skipped = source.into_skipped();

        info!(
            "Processed {} files from {} ({} skipped, {} warnings)",
            summary.files_processed,
            input.display(),
            summary.skipped.len(),
            summary.warnings.len()
        );
        Ok(summary)
    }

    fn split_file(
        &self,
        entry: &DicomEntry,
        rewriter: &IdentifierRewriter<'_>,
        summary: &mut SplitSummary,
    ) -> Result<()> {
        let Some(file_name) = entry.path.file_name() else {
            return Ok(());
        };
        debug!("Splitting {}", entry.path.display());

        let mut warnings = Vec::new();
        let pixels = self.load_pixels(entry, file_name, &mut warnings);
        let geometry = match &pixels {
            Some(_) if !self.config.preserve_origin => {
                let geometry = SpatialGeometry::from_dataset(&entry.dataset);
                if geometry.is_none() {
                    warn!(
                        "{}: image plane attributes missing, keeping ImagePositionPatient",
                        file_name.to_string_lossy()
                    );
                    warnings.push(SplitWarning::MissingGeometry);
                }
                geometry
            }
            _ => None,
        };

        let source = SourceReference::from_dataset(&entry.dataset);
        let (identities, mut identity_warnings) = rewriter.identities(&entry.dataset);
        warnings.append(&mut identity_warnings);

        let splitter = AxisSplitter::new(pixels.as_ref(), self.config.axis, self.n);
        for (piece, identity) in splitter.iter().zip(&identities) {
            let mut file = entry.dataset.clone();

            if let (Some(array), Some(start)) = (&piece.array, &piece.start) {
                set_pixel_data(&mut file, array);
                if array.is_decoded() {
                    use_native_encoding(&mut file);
                }
                if let Some(geometry) = &geometry {
                    let (row, column) = array.in_plane(start);
                    let position = geometry.position_of(row, column);
                    put_strs(
                        &mut file,
                        IMAGE_POSITION_PATIENT,
                        VR::DS,
                        position.to_decimal_strings(),
                    );
                }
            }
            if piece.shifted {
                warnings.push(SplitWarning::UnevenSplit {
                    axis: self.config.axis,
                    n: self.n,
                    split: piece.index + 1,
                });
            }

            rewriter.apply(identity, &source, &mut file);

            let path = summary.outputs[piece.index].join(file_name);
            file.write_to_file(&path)
                .map_err(|source| SplitError::WriteFile {
                    path: path.clone(),
                    source,
                })?;
            debug!("Wrote {}", path.display());
            summary.files_written[piece.index] += 1;
        }

        summary.files_processed += 1;
        summary
            .warnings
            .extend(warnings.into_iter().map(|warning| FileWarning {
                file: entry.path.clone(),
                warning,
            }));
        Ok(())
    }

    /// Reads the pixel buffer, `None` when it cannot be split
    fn load_pixels(
        &self,
        entry: &DicomEntry,
        file_name: &OsStr,
        warnings: &mut Vec<SplitWarning>,
    ) -> Option<PixelBuffer> {
        let name = file_name.to_string_lossy();
        let pixels = match read_pixel_buffer(&entry.dataset) {
            Ok(Some(pixels)) => pixels,
            Ok(None) => {
                warn!("{}: no pixel data, duplicating metadata only", name);
                warnings.push(SplitWarning::PixelDataUnavailable(
                    "no PixelData element".to_string(),
                ));
                return None;
            }
            Err(e) => {
                warn!("{}: {}, duplicating metadata only", name, e);
                warnings.push(SplitWarning::PixelDataUnavailable(e.to_string()));
                return None;
            }
        };

        if self.config.axis >= pixels.ndim() {
            warn!(
                "{}: axis {} out of range for {} pixel axes, duplicating metadata only",
                name,
                self.config.axis,
                pixels.ndim()
            );
            warnings.push(SplitWarning::AxisOutOfRange {
                axis: self.config.axis,
                ndim: pixels.ndim(),
            });
            return None;
        }
        Some(pixels)
    }
}

/// A warning raised while splitting one input file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FileWarning {
    pub file: PathBuf,
    pub warning: SplitWarning,
}

/// Outcome of splitting one directory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SplitSummary {
    /// The input directory
    pub input: PathBuf,

    /// Output directories, index `i` holds split `i`
    pub outputs: Vec<PathBuf>,

    /// Input files that were split
    pub files_processed: usize,

    /// Files written to each output directory
    pub files_written: Vec<usize>,

    /// Directory entries that were not valid DICOM files
    pub skipped: Vec<SkippedFile>,

    pub warnings: Vec<FileWarning>,
}

impl SplitSummary {
    fn new(input: &Path, outputs: Vec<PathBuf>) -> Self {
        Self {
            input: input.to_path_buf(),
            files_written: vec![0; outputs.len()],
            outputs,
            files_processed: 0,
            skipped: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Total number of files written
    pub fn total_written(&self) -> usize {
        self.files_written.iter().sum()
    }
}

/// Output directory of split `index`: `<input>.<index + 1>`
///
/// Trailing separators of `input` are ignored.
///
/// ```
/// use dicomsplit_core::api::directory_name;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(directory_name(Path::new("scans/cage4/"), 0), PathBuf::from("scans/cage4.1"));
/// assert_eq!(directory_name(Path::new("scans/cage4"), 2), PathBuf::from("scans/cage4.3"));
/// ```
pub fn directory_name(input: &Path, index: usize) -> PathBuf {
    let mut name = input.components().as_path().as_os_str().to_os_string();
    name.push(format!(".{}", index + 1));
    PathBuf::from(name)
}

/// Creates the `n` output directories of `input`
///
/// Directories that already exist are reused.
///
/// # Errors
///
/// Returns [`SplitError::CreateDirectory`] if a directory cannot be created.
pub fn make_output_paths(input: &Path, n: usize) -> Result<Vec<PathBuf>> {
    (0..n)
        .map(|i| {
            let path = directory_name(input, i);
            match fs::create_dir(&path) {
                Ok(()) => debug!("Created {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
                    debug!("Reusing {}", path.display())
                }
                Err(source) => return Err(SplitError::CreateDirectory { path, source }),
            }
            Ok(path)
        })
        .collect()
}
