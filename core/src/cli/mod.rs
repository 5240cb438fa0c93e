pub mod report;

use crate::types::{SplitConfig, StudyUidMode, DEFAULT_DERIVATION_DESCRIPTION};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dicom-split
#[derive(Parser, Debug)]
#[command(name = "dicom-split")]
#[command(about = "Split DICOM volumes holding several subjects into one volume per subject")]
#[command(version)]
#[command(group(ArgGroup::new("splits").required(true).args(["count", "uids"])))]
pub struct Cli {
    /// Directories of DICOM files, each split on its own
    #[arg(value_name = "DICOM_DIRECTORY", required = true)]
    pub directories: Vec<PathBuf>,

    /// Pixel array axis to split along (0 rows, 1 columns)
    #[arg(short, long, default_value_t = 1)]
    pub axis: usize,

    /// Number of volumes to split into
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Comma-separated series instance UIDs, one per volume; `SOP/SERIES` pairs are accepted
    #[arg(short, long, value_delimiter = ',', value_parser = parse_series_uid)]
    pub uids: Option<Vec<String>>,

    /// Keep ImagePositionPatient instead of recomputing it
    #[arg(short = 'o', long)]
    pub preserve_origin: bool,

    /// Comma-separated series descriptions, one per volume
    #[arg(short, long, value_delimiter = ',')]
    pub descriptions: Option<Vec<String>>,

    /// Comma-separated study instance UIDs, one per volume
    #[arg(short, long, value_delimiter = ',', conflicts_with = "unique_study")]
    pub study_uids: Option<Vec<String>>,

    /// Give every output file its own study
    #[arg(long)]
    pub unique_study: bool,

    /// Comma-separated patient names, one per volume
    #[arg(long, value_delimiter = ',')]
    pub patient_names: Option<Vec<String>>,

    /// Comma-separated patient IDs, one per volume
    #[arg(long, value_delimiter = ',')]
    pub patient_ids: Option<Vec<String>>,

    /// Delimiter between sub-identifiers in PatientName and PatientID
    #[arg(long, default_value_t = '_')]
    pub patient_delimiter: char,

    /// Text written to DerivationDescription
    #[arg(long, default_value = DEFAULT_DERIVATION_DESCRIPTION)]
    pub derivation_description: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the split configuration shared by every directory
    pub fn to_config(&self) -> SplitConfig {
        let mut config = match &self.uids {
            Some(uids) => SplitConfig::with_series_uids(uids.clone()),
            None => SplitConfig {
                count: self.count,
                ..SplitConfig::default()
            },
        }
        .with_axis(self.axis)
        .preserve_origin(self.preserve_origin)
        .with_patient_delimiter(self.patient_delimiter)
        .with_derivation_description(self.derivation_description.as_str());

        if self.unique_study {
            config = config.with_study_uid_mode(StudyUidMode::PerFile);
        }
        if let Some(descriptions) = &self.descriptions {
            config = config.with_series_descriptions(descriptions.clone());
        }
        if let Some(study_uids) = &self.study_uids {
            config = config.with_study_uids(study_uids.clone());
        }
        if let Some(names) = &self.patient_names {
            config = config.with_patient_names(names.clone());
        }
        if let Some(ids) = &self.patient_ids {
            config = config.with_patient_ids(ids.clone());
        }
        config
    }
}

/// Keeps the series part of a `SOP/SERIES` pair
fn parse_series_uid(value: &str) -> Result<String, String> {
    let uid = match value.split_once('/') {
        Some((_, series)) => series,
        None => value,
    };
    if uid.is_empty() {
        return Err(format!("no series UID in {:?}", value));
    }
    Ok(uid.to_string())
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_arguments() {
        let cli = Cli::try_parse_from(["dicom-split", "-n", "3", "-a", "0", "scan"]).unwrap();
        let config = cli.to_config();

        assert_eq!(cli.directories, vec![PathBuf::from("scan")]);
        assert_eq!(config.count, Some(3));
        assert_eq!(config.axis, 0);
        assert_eq!(config.study_uid_mode, StudyUidMode::Shared);
        assert_eq!(config.derivation_description, DEFAULT_DERIVATION_DESCRIPTION);
        assert_eq!(config.validate().unwrap(), 3);
    }

    #[test]
    fn test_uid_arguments() {
        let cli = Cli::try_parse_from([
            "dicom-split",
            "scan",
            "other",
            "--unique-study",
            "-u",
            "1.2.3/1.2.4,1.2.5",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(cli.directories.len(), 2);
        assert_eq!(
            config.series_uids,
            Some(vec!["1.2.4".to_string(), "1.2.5".to_string()])
        );
        assert_eq!(config.study_uid_mode, StudyUidMode::PerFile);
        assert_eq!(config.validate().unwrap(), 2);
    }

    #[test]
    fn test_list_arguments_leave_directories() {
        let cli = Cli::try_parse_from([
            "dicom-split",
            "-n",
            "2",
            "-d",
            "LEFT,RIGHT",
            "--patient-ids",
            "M1,M2",
            "scan",
            "other",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(
            cli.directories,
            vec![PathBuf::from("scan"), PathBuf::from("other")]
        );
        assert_eq!(
            config.series_descriptions,
            Some(vec!["LEFT".to_string(), "RIGHT".to_string()])
        );
        assert_eq!(
            config.patient_ids,
            Some(vec!["M1".to_string(), "M2".to_string()])
        );
        assert_eq!(config.validate().unwrap(), 2);
    }

    #[test]
    fn test_split_count_required() {
        assert!(Cli::try_parse_from(["dicom-split", "scan"]).is_err());
        assert!(Cli::try_parse_from(["dicom-split", "-n", "2", "-u", "1.2", "scan"]).is_err());
    }

    #[test]
    fn test_parse_series_uid() {
        assert_eq!(parse_series_uid("1.2.3").unwrap(), "1.2.3");
        assert_eq!(parse_series_uid("1.2.3/4.5").unwrap(), "4.5");
        assert!(parse_series_uid("1.2.3/").is_err());
    }
}
