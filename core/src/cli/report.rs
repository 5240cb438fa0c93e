use crate::api::SplitSummary;
use crate::dataset::SkipReason;
use std::fmt;

/// Text report formatter for a directory split
pub struct TextReport<'a> {
    summary: &'a SplitSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a SplitSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        writeln!(f, "DICOM Split")?;
        writeln!(f, "===========")?;
        writeln!(f)?;
        writeln!(f, "Input:          {}", summary.input.display())?;
        writeln!(f, "Files split:    {}", summary.files_processed)?;
        writeln!(f, "Files skipped:  {}", summary.skipped.len())?;
        writeln!(f)?;

        writeln!(f, "Outputs")?;
        writeln!(f, "-------")?;
        for (path, written) in summary.outputs.iter().zip(&summary.files_written) {
            writeln!(f, "{} ({} files)", path.display(), written)?;
        }

        if !summary.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped")?;
            writeln!(f, "-------")?;
            for skipped in &summary.skipped {
                let reason = match &skipped.reason {
                    SkipReason::Unreadable(e) => e.as_str(),
                    SkipReason::MissingInstanceUid => "no SOPInstanceUID",
                };
                writeln!(f, "{}: {}", skipped.path.display(), reason)?;
            }
        }

        if !summary.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            writeln!(f, "--------")?;
            for warning in &summary.warnings {
                writeln!(f, "{}: {}", warning.file.display(), warning.warning)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FileWarning;
    use crate::dataset::SkippedFile;
    use crate::error::SplitWarning;
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let summary = SplitSummary {
            input: PathBuf::from("scans/cage4"),
            outputs: vec![
                PathBuf::from("scans/cage4.1"),
                PathBuf::from("scans/cage4.2"),
            ],
            files_processed: 12,
            files_written: vec![12, 12],
            skipped: vec![SkippedFile {
                path: PathBuf::from("scans/cage4/DICOMDIR"),
                reason: SkipReason::MissingInstanceUid,
            }],
            warnings: vec![FileWarning {
                file: PathBuf::from("scans/cage4/IM7"),
                warning: SplitWarning::MissingGeometry,
            }],
        };

        let output = format!("{}", TextReport::new(&summary));

        assert!(output.contains("Input:          scans/cage4"));
        assert!(output.contains("Files split:    12"));
        assert!(output.contains("scans/cage4.2 (12 files)"));
        assert!(output.contains("scans/cage4/DICOMDIR: no SOPInstanceUID"));
        assert!(output.contains("scans/cage4/IM7: image plane attributes missing"));
    }

    #[test]
    fn test_text_report_omits_empty_sections() {
        let summary = SplitSummary {
            input: PathBuf::from("scan"),
            outputs: vec![PathBuf::from("scan.1")],
            files_processed: 0,
            files_written: vec![0],
            skipped: Vec::new(),
            warnings: Vec::new(),
        };

        let output = format!("{}", TextReport::new(&summary));
        assert!(!output.contains("Skipped"));
        assert!(!output.contains("Warnings"));
    }
}
