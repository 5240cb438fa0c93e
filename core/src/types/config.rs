use crate::error::{Result, SplitError};
use crate::identity::is_valid_uid;

/// Default text written to DerivationDescription
pub const DEFAULT_DERIVATION_DESCRIPTION: &str =
    "Split from a group acquisition into one volume per subject";

/// Default delimiter between sub-identifiers in PatientName and PatientID
pub const DEFAULT_PATIENT_DELIMITER: char = '_';

/// How study instance UIDs are assigned when none are supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum StudyUidMode {
    /// One new study per split, shared by every file of the run
    #[default]
    Shared,

    /// A new study for every output file
    PerFile,
}

/// Configuration of a directory split
///
/// The split count comes from `series_uids` when it is given, otherwise
/// from `count`. Every per-split list must have one entry per split.
///
/// # Example
///
/// ```
/// use dicomsplit_core::{SplitConfig, StudyUidMode};
///
/// let config = SplitConfig::with_count(3)
///     .with_axis(0)
///     .with_series_descriptions(vec!["A".into(), "B".into(), "C".into()])
///     .with_study_uid_mode(StudyUidMode::PerFile);
///
/// assert_eq!(config.validate().unwrap(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitConfig {
    /// Array axis to split along (0 rows, 1 columns for single-frame images)
    pub axis: usize,

    /// Number of splits
    pub count: Option<usize>,

    /// Series instance UID for each split; its length sets the split count
    pub series_uids: Option<Vec<String>>,

    /// Keep ImagePositionPatient instead of recomputing it for each piece
    pub preserve_origin: bool,

    /// Series description for each split
    pub series_descriptions: Option<Vec<String>>,

    /// Study instance UID for each split
    pub study_uids: Option<Vec<String>>,

    /// Study UID assignment when `study_uids` is not given
    pub study_uid_mode: StudyUidMode,

    /// Patient name for each split
    pub patient_names: Option<Vec<String>>,

    /// Patient ID for each split
    pub patient_ids: Option<Vec<String>>,

    /// Delimiter used to parse per-subject patient names and IDs
    pub patient_delimiter: char,

    /// Text written to DerivationDescription
    pub derivation_description: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            axis: 1, // columns
            count: None,
            series_uids: None,
            preserve_origin: false,
            series_descriptions: None,
            study_uids: None,
            study_uid_mode: StudyUidMode::Shared,
            patient_names: None,
            patient_ids: None,
            patient_delimiter: DEFAULT_PATIENT_DELIMITER,
            derivation_description: DEFAULT_DERIVATION_DESCRIPTION.to_string(),
        }
    }
}

impl SplitConfig {
    /// Splits into `count` pieces
    pub fn with_count(count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::default()
        }
    }

    /// Splits into one piece per series UID
    pub fn with_series_uids(series_uids: Vec<String>) -> Self {
        Self {
            series_uids: Some(series_uids),
            ..Self::default()
        }
    }

    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    pub fn preserve_origin(mut self, preserve: bool) -> Self {
        self.preserve_origin = preserve;
        self
    }

    pub fn with_series_descriptions(mut self, descriptions: Vec<String>) -> Self {
        self.series_descriptions = Some(descriptions);
        self
    }

    pub fn with_study_uids(mut self, study_uids: Vec<String>) -> Self {
        self.study_uids = Some(study_uids);
        self
    }

    pub fn with_study_uid_mode(mut self, mode: StudyUidMode) -> Self {
        self.study_uid_mode = mode;
        self
    }

    pub fn with_patient_names(mut self, names: Vec<String>) -> Self {
        self.patient_names = Some(names);
        self
    }

    pub fn with_patient_ids(mut self, ids: Vec<String>) -> Self {
        self.patient_ids = Some(ids);
        self
    }

    pub fn with_patient_delimiter(mut self, delimiter: char) -> Self {
        self.patient_delimiter = delimiter;
        self
    }

    pub fn with_derivation_description(mut self, description: impl Into<String>) -> Self {
        self.derivation_description = description.into();
        self
    }

    /// Number of splits, from the series UID list or the count
    ///
    /// # Errors
    ///
    /// [`SplitError::SplitCountUnresolved`] when neither is given,
    /// [`SplitError::ZeroSplits`] when the result is zero.
    pub fn split_count(&self) -> Result<usize> {
        let n = match (&self.series_uids, self.count) {
            (Some(uids), _) => uids.len(),
            (None, Some(count)) => count,
            (None, None) => return Err(SplitError::SplitCountUnresolved),
        };
        if n == 0 {
            return Err(SplitError::ZeroSplits);
        }
        Ok(n)
    }

    /// Checks the configuration and returns the split count
    ///
    /// # Errors
    ///
    /// Returns an error if the split count cannot be resolved, a per-split
    /// list has the wrong length, or a supplied UID is malformed.
    pub fn validate(&self) -> Result<usize> {
        let n = self.split_count()?;

        let lists = [
            ("series descriptions", &self.series_descriptions),
            ("study UIDs", &self.study_uids),
            ("patient names", &self.patient_names),
            ("patient IDs", &self.patient_ids),
        ];
        for (what, list) in lists {
            if let Some(list) = list {
                if list.len() != n {
                    return Err(SplitError::LengthMismatch {
                        what,
                        expected: n,
                        actual: list.len(),
                    });
                }
            }
        }

        let supplied_uids = self.series_uids.iter().chain(&self.study_uids).flatten();
        for uid in supplied_uids {
            if !is_valid_uid(uid) {
                return Err(SplitError::InvalidUid(uid.clone()));
            }
        }

        if self.patient_delimiter.is_whitespace() {
            return Err(SplitError::InvalidConfig(
                "patient delimiter must not be whitespace".to_string(),
            ));
        }

        Ok(n)
    }
}
