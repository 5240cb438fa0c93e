//! Fixtures shared by unit tests

use crate::dataset::tags::*;
use dicom_core::value::{PixelFragmentSequence, Value};
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_dictionary_std::uids::{EXPLICIT_VR_LITTLE_ENDIAN, MR_IMAGE_STORAGE};
use dicom_object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use std::path::Path;

/// A 4x6 single-frame MR image whose pixel at (r, c) holds `r * 10 + c`
pub(crate) fn sample_file(sop_instance_uid: &str) -> FileDicomObject<InMemDicomObject> {
    let mut dcm = InMemDicomObject::new_empty();
    put_str(&mut dcm, SOP_CLASS_UID, VR::UI, MR_IMAGE_STORAGE);
    put_str(&mut dcm, SOP_INSTANCE_UID, VR::UI, sop_instance_uid);
    put_strs(&mut dcm, IMAGE_TYPE, VR::CS, ["ORIGINAL", "PRIMARY"]);
    put_str(&mut dcm, STUDY_INSTANCE_UID, VR::UI, "1.2.826.0.1.1");
    put_str(&mut dcm, SERIES_INSTANCE_UID, VR::UI, "1.2.826.0.1.1.7");
    put_str(&mut dcm, SERIES_NUMBER, VR::IS, "7");
    put_str(&mut dcm, SERIES_DESCRIPTION, VR::LO, "T2 TSE");
    put_str(&mut dcm, PATIENT_NAME, VR::PN, "CAGE4_M1_M2");
    put_str(&mut dcm, PATIENT_ID, VR::LO, "G4_A_B");
    put_strs(&mut dcm, IMAGE_POSITION_PATIENT, VR::DS, ["-10", "-20", "5"]);
    put_strs(
        &mut dcm,
        IMAGE_ORIENTATION_PATIENT,
        VR::DS,
        ["1", "0", "0", "0", "1", "0"],
    );
    put_strs(&mut dcm, PIXEL_SPACING, VR::DS, ["0.5", "0.5"]);
    put_u16(&mut dcm, SAMPLES_PER_PIXEL, 1);
    put_str(&mut dcm, PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
    put_u16(&mut dcm, ROWS, 4);
    put_u16(&mut dcm, COLUMNS, 6);
    put_u16(&mut dcm, BITS_ALLOCATED, 16);

    let pixels: Vec<u16> = (0..4u16)
        .flat_map(|r| (0..6u16).map(move |c| r * 10 + c))
        .collect();
    dcm.put(DataElement::new(
        PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(pixels.into_iter().collect()),
    ));

    dcm.with_meta(
        FileMetaTableBuilder::new()
            .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
            .media_storage_sop_class_uid(MR_IMAGE_STORAGE)
            .media_storage_sop_instance_uid(sop_instance_uid),
    )
    .unwrap()
}

/// Writes [`sample_file`] to `path`
pub(crate) fn write_sample(path: &Path, sop_instance_uid: &str) {
    sample_file(sop_instance_uid).write_to_file(path).unwrap();
}

/// RLE Lossless transfer syntax
pub(crate) const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// [`sample_file`] as an 8-bit RLE Lossless image, pixel (r, c) = `r * 10 + c`
pub(crate) fn rle_sample_file(sop_instance_uid: &str) -> FileDicomObject<InMemDicomObject> {
    let mut file = sample_file(sop_instance_uid);
    put_u16(&mut file, BITS_ALLOCATED, 8);
    put_u16(&mut file, Tag(0x0028, 0x0101), 8); // BitsStored
    put_u16(&mut file, Tag(0x0028, 0x0102), 7); // HighBit
    put_u16(&mut file, Tag(0x0028, 0x0103), 0); // PixelRepresentation

    let pixels: Vec<u8> = (0..4u8)
        .flat_map(|r| (0..6u8).map(move |c| r * 10 + c))
        .collect();

    // one segment at offset 64, stored as two literal runs of 12 bytes
    let mut fragment = vec![0u8; 64];
    fragment[0..4].copy_from_slice(&1u32.to_le_bytes());
    fragment[4..8].copy_from_slice(&64u32.to_le_bytes());
    for run in pixels.chunks(12) {
        fragment.push(run.len() as u8 - 1);
        fragment.extend_from_slice(run);
    }

    file.put(DataElement::new(
        PIXEL_DATA,
        VR::OB,
        Value::PixelSequence(PixelFragmentSequence::new(Vec::<u32>::new(), vec![fragment])),
    ));
    let meta = file.meta_mut();
    meta.transfer_syntax = RLE_LOSSLESS.to_string();
    meta.update_information_group_length();
    file
}
