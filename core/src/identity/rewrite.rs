use crate::dataset::tags::{
    get_int_value, get_string_value, put_str, PATIENT_ID, PATIENT_NAME, SERIES_DESCRIPTION,
    SERIES_INSTANCE_UID, SERIES_NUMBER, SOP_INSTANCE_UID, STUDY_INSTANCE_UID,
};
use crate::error::SplitWarning;
use crate::identity::patient::split_identifier;
use crate::identity::provenance::{attach_provenance, SourceReference};
use crate::identity::uid::{generate_uid, generate_uids};
use crate::types::{ImageType, SplitConfig, StudyUidMode};
use dicom_core::VR;
use dicom_object::{FileDicomObject, InMemDicomObject};

/// Appended to the source SeriesDescription when no descriptions are given
pub const SERIES_DESCRIPTION_SUFFIX: &str = " (split)";

/// Identifiers shared by every file of one run
///
/// Split `i` of every input file lands in series `series_uids[i]`, and in
/// study `study_uids[i]` unless studies are assigned per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentifiers {
    pub series_uids: Vec<String>,
    pub study_uids: Option<Vec<String>>,
}

impl RunIdentifiers {
    /// Takes supplied UIDs from `config` and generates the rest
    pub fn new(config: &SplitConfig, n: usize) -> Self {
        let series_uids = config
            .series_uids
            .clone()
            .unwrap_or_else(|| generate_uids(n));
        let study_uids = match (&config.study_uids, config.study_uid_mode) {
            (Some(uids), _) => Some(uids.clone()),
            (None, StudyUidMode::Shared) => Some(generate_uids(n)),
            (None, StudyUidMode::PerFile) => None,
        };
        Self {
            series_uids,
            study_uids,
        }
    }

    /// One study UID per split for the next input file
    pub fn study_uids_for_file(&self) -> Vec<String> {
        match &self.study_uids {
            Some(uids) => uids.clone(),
            None => generate_uids(self.series_uids.len()),
        }
    }
}

/// Identifier set of one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIdentity {
    pub index: usize,
    pub sop_instance_uid: String,
    pub series_instance_uid: String,
    pub study_instance_uid: String,
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub series_number: i64,
    pub series_description: String,
}

/// Derives and applies the identifiers of the `n` outputs of a source file
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRewriter<'a> {
    config: &'a SplitConfig,
    run: &'a RunIdentifiers,
    n: usize,
}

impl<'a> IdentifierRewriter<'a> {
    pub fn new(config: &'a SplitConfig, run: &'a RunIdentifiers, n: usize) -> Self {
        Self { config, run, n }
    }

    /// Computes the identifier set of every split of `source`
    ///
    /// Patient identifier warnings are returned with the sets.
    pub fn identities(
        &self,
        source: &InMemDicomObject,
    ) -> (Vec<SplitIdentity>, Vec<SplitWarning>) {
        let mut warnings = Vec::new();
        let study_uids = self.run.study_uids_for_file();
        let patient_names = self.patient_values(
            source,
            PATIENT_NAME,
            "PatientName",
            &self.config.patient_names,
            &mut warnings,
        );
        let patient_ids = self.patient_values(
            source,
            PATIENT_ID,
            "PatientID",
            &self.config.patient_ids,
            &mut warnings,
        );
        let series_number = get_int_value(source, SERIES_NUMBER).map(i64::from);
        let series_description = get_string_value(source, SERIES_DESCRIPTION);

        let identities = (0..self.n)
            .map(|i| SplitIdentity {
                index: i,
                sop_instance_uid: generate_uid(),
                series_instance_uid: self.run.series_uids[i].clone(),
                study_instance_uid: study_uids[i].clone(),
                patient_name: patient_names.as_ref().map(|names| names[i].clone()),
                patient_id: patient_ids.as_ref().map(|ids| ids[i].clone()),
                series_number: split_series_number(series_number, i),
                series_description: match &self.config.series_descriptions {
                    Some(descriptions) => descriptions[i].clone(),
                    None => split_series_description(series_description.as_deref()),
                },
            })
            .collect();

        (identities, warnings)
    }

    fn patient_values(
        &self,
        source: &InMemDicomObject,
        tag: dicom_core::Tag,
        field: &'static str,
        overrides: &Option<Vec<String>>,
        warnings: &mut Vec<SplitWarning>,
    ) -> Option<Vec<String>> {
        if let Some(values) = overrides {
            return Some(values.clone());
        }
        let raw = get_string_value(source, tag)?;
        let (values, mut found) =
            split_identifier(field, &raw, self.config.patient_delimiter, self.n);
        warnings.append(&mut found);
        Some(values)
    }

    /// Writes `identity` and the derivation provenance into `file`
    pub fn apply(
        &self,
        identity: &SplitIdentity,
        source: &SourceReference,
        file: &mut FileDicomObject<InMemDicomObject>,
    ) {
        put_str(file, SOP_INSTANCE_UID, VR::UI, identity.sop_instance_uid.as_str());
        let meta = file.meta_mut();
        meta.media_storage_sop_instance_uid = identity.sop_instance_uid.clone();
        meta.update_information_group_length();

        put_str(
            file,
            SERIES_INSTANCE_UID,
            VR::UI,
            identity.series_instance_uid.as_str(),
        );
        put_str(
            file,
            STUDY_INSTANCE_UID,
            VR::UI,
            identity.study_instance_uid.as_str(),
        );
        if let Some(name) = &identity.patient_name {
            put_str(file, PATIENT_NAME, VR::PN, name.as_str());
        }
        if let Some(id) = &identity.patient_id {
            put_str(file, PATIENT_ID, VR::LO, id.as_str());
        }
        put_str(
            file,
            SERIES_NUMBER,
            VR::IS,
            identity.series_number.to_string(),
        );
        put_str(
            file,
            SERIES_DESCRIPTION,
            VR::LO,
            identity.series_description.as_str(),
        );

        attach_provenance(file, source, &self.config.derivation_description);
        ImageType::split().write_to(file);
    }
}

/// `original * 10 + index + 1`, or `index + 1` without an original
pub fn split_series_number(original: Option<i64>, index: usize) -> i64 {
    original.unwrap_or(0) * 10 + index as i64 + 1
}

/// Maximum length of an LO value
const LO_MAX_CHARS: usize = 64;

fn split_series_description(original: Option<&str>) -> String {
    match original {
        Some(description) if !description.is_empty() => {
            let keep = LO_MAX_CHARS - SERIES_DESCRIPTION_SUFFIX.len();
            let head: String = description.chars().take(keep).collect();
            format!("{}{}", head.trim_end(), SERIES_DESCRIPTION_SUFFIX)
        }
        _ => SERIES_DESCRIPTION_SUFFIX.trim_start().to_string(),
    }
}
