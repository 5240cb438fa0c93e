use crate::dataset::tags::{
    get_string_value, put_str, CODE_MEANING, CODE_VALUE, CODING_SCHEME_DESIGNATOR,
    DERIVATION_CODE_SEQUENCE, DERIVATION_DESCRIPTION, PURPOSE_OF_REFERENCE_CODE_SEQUENCE,
    REFERENCED_SOP_CLASS_UID, REFERENCED_SOP_INSTANCE_UID, SOP_CLASS_UID, SOP_INSTANCE_UID,
    SOURCE_IMAGE_SEQUENCE,
};
use dicom_core::value::DataSetSequence;
use dicom_core::{DataElement, Tag, VR};
use dicom_object::InMemDicomObject;

/// A coded concept from a DICOM context group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodedConcept {
    pub value: &'static str,
    pub scheme: &'static str,
    pub meaning: &'static str,
}

/// CID 7203 derivation: one subject extracted from a group acquisition
pub const EXTRACTION_OF_SUBJECT: CodedConcept = CodedConcept {
    value: "113131",
    scheme: "DCM",
    meaning: "Extraction of individual subject from group",
};

/// CID 7202 purpose of reference: the source imaged a group of subjects
pub const GROUP_PREDECESSOR: CodedConcept = CodedConcept {
    value: "113130",
    scheme: "DCM",
    meaning: "Predecessor containing group of imaging subjects",
};

impl CodedConcept {
    /// Code sequence macro item for this concept
    pub fn to_item(&self) -> InMemDicomObject {
        let mut item = InMemDicomObject::new_empty();
        put_str(&mut item, CODE_VALUE, VR::SH, self.value);
        put_str(&mut item, CODING_SCHEME_DESIGNATOR, VR::SH, self.scheme);
        put_str(&mut item, CODE_MEANING, VR::LO, self.meaning);
        item
    }
}

/// The instance a split output derives from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
}

impl SourceReference {
    /// Captures SOPClassUID and SOPInstanceUID of the source dataset
    pub fn from_dataset(dcm: &InMemDicomObject) -> Self {
        Self {
            sop_class_uid: get_string_value(dcm, SOP_CLASS_UID).unwrap_or_default(),
            sop_instance_uid: get_string_value(dcm, SOP_INSTANCE_UID).unwrap_or_default(),
        }
    }

    /// Source image sequence item referencing this instance
    pub fn to_item(&self) -> InMemDicomObject {
        let mut item = InMemDicomObject::new_empty();
        put_str(&mut item, REFERENCED_SOP_CLASS_UID, VR::UI, self.sop_class_uid.as_str());
        put_str(
            &mut item,
            REFERENCED_SOP_INSTANCE_UID,
            VR::UI,
            self.sop_instance_uid.as_str(),
        );
        item.put(DataElement::new(
            PURPOSE_OF_REFERENCE_CODE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![GROUP_PREDECESSOR.to_item()]),
        ));
        item
    }
}

/// Records that `dcm` was extracted from `source`
///
/// Sets DerivationDescription and appends one item each to
/// DerivationCodeSequence and SourceImageSequence, keeping existing items.
pub fn attach_provenance(dcm: &mut InMemDicomObject, source: &SourceReference, description: &str) {
    put_str(dcm, DERIVATION_DESCRIPTION, VR::ST, description);
    append_item(dcm, DERIVATION_CODE_SEQUENCE, EXTRACTION_OF_SUBJECT.to_item());
    append_item(dcm, SOURCE_IMAGE_SEQUENCE, source.to_item());
}

fn append_item(dcm: &mut InMemDicomObject, tag: Tag, item: InMemDicomObject) {
    let mut items: Vec<InMemDicomObject> = dcm
        .element(tag)
        .ok()
        .and_then(|elem| elem.items())
        .map(|items| items.to_vec())
        .unwrap_or_default();
    items.push(item);
    dcm.put(DataElement::new(tag, VR::SQ, DataSetSequence::from(items)));
}
