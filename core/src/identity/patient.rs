use crate::error::SplitWarning;
use log::warn;

/// Token that ends many group names without naming a subject (e.g. a
/// session number)
const TRAILING_SESSION_TOKEN: &str = "1";

/// A group identifier broken into a root and one token per subject
///
/// `"CAGE4_M1_M2"` with delimiter `_` has root `CAGE4` and subjects
/// `M1`, `M2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectIdentifiers {
    pub root: String,
    pub subjects: Vec<String>,
    pub delimiter: char,
}

impl SubjectIdentifiers {
    /// Splits `raw` on `delimiter`; the first token is the root
    pub fn parse(raw: &str, delimiter: char) -> Self {
        let mut tokens = raw.split(delimiter).map(str::to_string);
        let root = tokens.next().unwrap_or_default();
        Self {
            root,
            subjects: tokens.collect(),
            delimiter,
        }
    }

    /// Drops a trailing `"1"` subject token, returning whether it did
    pub fn drop_trailing_session(&mut self) -> bool {
        if self.subjects.last().map(String::as_str) == Some(TRAILING_SESSION_TOKEN) {
            self.subjects.pop();
            true
        } else {
            false
        }
    }

    /// `root + delimiter + subject` for each subject
    pub fn subject_values(&self) -> Vec<String> {
        self.subjects
            .iter()
            .map(|subject| format!("{}{}{}", self.root, self.delimiter, subject))
            .collect()
    }
}

/// Derives one value per split from a PatientName or PatientID
///
/// A trailing `"1"` token is dropped. When the remaining subject count is
/// not `n`, the raw value is repeated `n` times. Both cases log a warning
/// and are returned alongside the values.
///
/// # Example
///
/// ```
/// use dicomsplit_core::identity::split_identifier;
///
/// let (values, warnings) = split_identifier("PatientID", "CAGE4_M1_M2", '_', 2);
/// assert_eq!(values, vec!["CAGE4_M1", "CAGE4_M2"]);
/// assert!(warnings.is_empty());
///
/// let (values, warnings) = split_identifier("PatientID", "CAGE4_M1_M2", '_', 3);
/// assert_eq!(values, vec!["CAGE4_M1_M2"; 3]);
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn split_identifier(
    field: &'static str,
    raw: &str,
    delimiter: char,
    n: usize,
) -> (Vec<String>, Vec<SplitWarning>) {
    let mut warnings = Vec::new();
    let mut parsed = SubjectIdentifiers::parse(raw, delimiter);

    if parsed.drop_trailing_session() {
        warn!(
            "{} {:?} ends with {:?}, ignoring it as a subject",
            field, raw, TRAILING_SESSION_TOKEN
        );
        warnings.push(SplitWarning::DroppedTrailingToken {
            field,
            value: raw.to_string(),
        });
    }

    if parsed.subjects.len() != n {
        warn!(
            "{} {:?} names {} subjects, expected {}; repeating it for every split",
            field,
            raw,
            parsed.subjects.len(),
            n
        );
        warnings.push(SplitWarning::SubjectCountMismatch {
            field,
            value: raw.to_string(),
            found: parsed.subjects.len(),
            expected: n,
        });
        return (vec![raw.to_string(); n], warnings);
    }

    (parsed.subject_values(), warnings)
}
