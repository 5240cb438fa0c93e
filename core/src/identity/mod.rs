//! Identifiers and provenance of split outputs
//!
//! Every output gets a fresh SOPInstanceUID. Split `i` of every file in a
//! run shares one SeriesInstanceUID. Patient identifiers are derived per
//! subject from the group identifier of the source.

mod patient;
mod provenance;
mod rewrite;
mod uid;

pub use patient::{split_identifier, SubjectIdentifiers};
pub use provenance::{
    attach_provenance, CodedConcept, SourceReference, EXTRACTION_OF_SUBJECT, GROUP_PREDECESSOR,
};
pub use rewrite::{
    split_series_number, IdentifierRewriter, RunIdentifiers, SplitIdentity,
    SERIES_DESCRIPTION_SUFFIX,
};
pub use uid::{generate_uid, generate_uids, is_valid_uid, MAX_UID_LENGTH, UUID_UID_ROOT};
