//! Confidential tag catalog.
//!
//! Standard attributes that are confidential by default according to Annex E (Attribute
//! Confidentiality Profiles) of DICOM PS3.15. Study Instance UID, Series Instance UID,
//! SOP Instance UID and Patient ID are deliberately left out: they are given new values by the
//! [`substitutor`](crate::substitutor) instead of being removed, so that related instances can
//! still be grouped after de-identification.

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use std::collections::HashSet;
use std::sync::OnceLock;

static CATALOG: OnceLock<HashSet<Tag>> = OnceLock::new();

const CONFIDENTIAL_TAGS: &[Tag] = &[
    tags::ACCESSION_NUMBER,
    tags::ACQUISITION_COMMENTS,
    tags::ACQUISITION_CONTEXT_SEQUENCE,
    tags::ACQUISITION_DATE,
    tags::ACQUISITION_DATE_TIME,
    tags::ACQUISITION_DEVICE_PROCESSING_DESCRIPTION,
    tags::ACQUISITION_PROTOCOL_DESCRIPTION,
    tags::ACQUISITION_TIME,
    tags::ACTUAL_HUMAN_PERFORMERS_SEQUENCE,
    tags::ADDITIONAL_PATIENT_HISTORY,
    tags::ADDRESS_TRIAL,
    tags::ADMISSION_ID,
    tags::ADMITTING_DATE,
    tags::ADMITTING_DIAGNOSES_CODE_SEQUENCE,
    tags::ADMITTING_DIAGNOSES_DESCRIPTION,
    tags::ADMITTING_TIME,
    tags::AFFECTED_SOP_INSTANCE_UID,
    tags::ALLERGIES,
    tags::ARBITRARY,
    tags::AUTHOR_OBSERVER_SEQUENCE,
    tags::BRANCH_OF_SERVICE,
    tags::CASSETTE_ID,
    tags::COMMENTS_ON_THE_PERFORMED_PROCEDURE_STEP,
    tags::CONCATENATION_UID,
    tags::CONFIDENTIALITY_CONSTRAINT_ON_PATIENT_DATA_DESCRIPTION,
    tags::CONTENT_CREATOR_NAME,
    tags::CONTENT_CREATOR_IDENTIFICATION_CODE_SEQUENCE,
    tags::CONTENT_DATE,
    tags::CONTENT_SEQUENCE,
    tags::CONTENT_TIME,
    tags::CONTEXT_GROUP_EXTENSION_CREATOR_UID,
    tags::CONTRAST_BOLUS_AGENT,
    tags::CONTRIBUTION_DESCRIPTION,
    tags::COUNTRY_OF_RESIDENCE,
    tags::CREATOR_VERSION_UID,
    tags::CURRENT_OBSERVER_TRIAL,
    tags::CURRENT_PATIENT_LOCATION,
    Tag(0x5000, 0x3000), // CurveData, first group of 50xx
    tags::CURVE_DATE,
    tags::CURVE_TIME,
    tags::CUSTODIAL_ORGANIZATION_SEQUENCE,
    tags::DATA_SET_TRAILING_PADDING,
    tags::DERIVATION_DESCRIPTION,
    tags::DETECTOR_ID,
    tags::DEVICE_SERIAL_NUMBER,
    tags::DEVICE_UID,
    tags::DIGITAL_SIGNATURE_UID,
    tags::DIGITAL_SIGNATURES_SEQUENCE,
    tags::DIMENSION_ORGANIZATION_UID,
    tags::DISCHARGE_DIAGNOSIS_DESCRIPTION,
    tags::DISTRIBUTION_ADDRESS,
    tags::DISTRIBUTION_NAME,
    tags::DOSE_REFERENCE_UID,
    tags::END_ACQUISITION_DATE_TIME,
    tags::ETHNIC_GROUP,
    tags::EXPECTED_COMPLETION_DATE_TIME,
    tags::FAILED_SOP_INSTANCE_UID_LIST,
    tags::FIDUCIAL_UID,
    tags::FILLER_ORDER_NUMBER_IMAGING_SERVICE_REQUEST,
    tags::FRAME_COMMENTS,
    tags::FRAME_OF_REFERENCE_UID,
    tags::GANTRY_ID,
    tags::GENERATOR_ID,
    tags::GRAPHIC_ANNOTATION_SEQUENCE,
    tags::HUMAN_PERFORMER_NAME,
    tags::HUMAN_PERFORMER_ORGANIZATION,
    tags::ICON_IMAGE_SEQUENCE,
    tags::IDENTIFYING_COMMENTS,
    tags::IMAGE_COMMENTS,
    tags::IMAGE_PRESENTATION_COMMENTS,
    tags::IMAGING_SERVICE_REQUEST_COMMENTS,
    tags::IMPRESSIONS,
    tags::INSTANCE_COERCION_DATE_TIME,
    tags::INSTANCE_CREATOR_UID,
    tags::INSTITUTION_ADDRESS,
    tags::INSTITUTION_CODE_SEQUENCE,
    tags::INSTITUTION_NAME,
    tags::INSTITUTIONAL_DEPARTMENT_NAME,
    tags::INSURANCE_PLAN_IDENTIFICATION,
    tags::INTENDED_RECIPIENTS_OF_RESULTS_IDENTIFICATION_SEQUENCE,
    tags::INTERPRETATION_APPROVER_SEQUENCE,
    tags::INTERPRETATION_AUTHOR,
    tags::INTERPRETATION_DIAGNOSIS_DESCRIPTION,
    tags::INTERPRETATION_ID_ISSUER,
    tags::INTERPRETATION_RECORDER,
    tags::INTERPRETATION_TEXT,
    tags::INTERPRETATION_TRANSCRIBER,
    tags::IRRADIATION_EVENT_UID,
    tags::ISSUER_OF_ADMISSION_ID,
    tags::ISSUER_OF_PATIENT_ID,
    tags::ISSUER_OF_SERVICE_EPISODE_ID,
    tags::LARGE_PALETTE_COLOR_LOOKUP_TABLE_UID,
    tags::LAST_MENSTRUAL_DATE,
    tags::MAC,
    tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
    tags::MEDICAL_ALERTS,
    tags::MEDICAL_RECORD_LOCATOR,
    tags::MILITARY_RANK,
    tags::MODIFIED_ATTRIBUTES_SEQUENCE,
    tags::MODIFIED_IMAGE_DESCRIPTION,
    tags::MODIFYING_DEVICE_ID,
    tags::MODIFYING_DEVICE_MANUFACTURER,
    tags::NAME_OF_PHYSICIANS_READING_STUDY,
    tags::NAMES_OF_INTENDED_RECIPIENTS_OF_RESULTS,
    tags::OBSERVATION_DATE_TRIAL,
    tags::OBSERVATION_SUBJECT_UID_TRIAL,
    tags::OBSERVATION_TIME_TRIAL,
    tags::OBSERVATION_UID,
    tags::OCCUPATION,
    tags::OPERATOR_IDENTIFICATION_SEQUENCE,
    tags::OPERATORS_NAME,
    tags::ORIGINAL_ATTRIBUTES_SEQUENCE,
    tags::ORDER_CALLBACK_PHONE_NUMBER,
    tags::ORDER_ENTERED_BY,
    tags::ORDER_ENTERER_LOCATION,
    tags::OTHER_PATIENT_I_DS,
    tags::OTHER_PATIENT_I_DS_SEQUENCE,
    tags::OTHER_PATIENT_NAMES,
    Tag(0x6000, 0x4000), // OverlayComments, first group of 60xx
    Tag(0x6000, 0x3000), // OverlayData, first group of 60xx
    tags::OVERLAY_DATE,
    tags::OVERLAY_TIME,
    tags::PALETTE_COLOR_LOOKUP_TABLE_UID,
    tags::PARTICIPANT_SEQUENCE,
    tags::PATIENT_ADDRESS,
    tags::PATIENT_COMMENTS,
    tags::PATIENT_SEX_NEUTERED,
    tags::PATIENT_STATE,
    tags::PATIENT_TRANSPORT_ARRANGEMENTS,
    tags::PATIENT_AGE,
    tags::PATIENT_BIRTH_DATE,
    tags::PATIENT_BIRTH_NAME,
    tags::PATIENT_BIRTH_TIME,
    tags::PATIENT_INSTITUTION_RESIDENCE,
    tags::PATIENT_INSURANCE_PLAN_CODE_SEQUENCE,
    tags::PATIENT_MOTHER_BIRTH_NAME,
    tags::PATIENT_NAME,
    tags::PATIENT_PRIMARY_LANGUAGE_CODE_SEQUENCE,
    tags::PATIENT_PRIMARY_LANGUAGE_MODIFIER_CODE_SEQUENCE,
    tags::PATIENT_RELIGIOUS_PREFERENCE,
    tags::PATIENT_SEX,
    tags::PATIENT_SIZE,
    tags::PATIENT_TELEPHONE_NUMBERS,
    tags::PATIENT_WEIGHT,
    tags::PERFORMED_LOCATION,
    tags::PERFORMED_PROCEDURE_STEP_DESCRIPTION,
    tags::PERFORMED_PROCEDURE_STEP_END_DATE,
    tags::PERFORMED_PROCEDURE_STEP_END_DATE_TIME,
    tags::PERFORMED_PROCEDURE_STEP_END_TIME,
    tags::PERFORMED_PROCEDURE_STEP_ID,
    tags::PERFORMED_PROCEDURE_STEP_START_DATE,
    tags::PERFORMED_PROCEDURE_STEP_START_DATE_TIME,
    tags::PERFORMED_PROCEDURE_STEP_START_TIME,
    tags::PERFORMED_STATION_AE_TITLE,
    tags::PERFORMED_STATION_GEOGRAPHIC_LOCATION_CODE_SEQUENCE,
    tags::PERFORMED_STATION_NAME,
    tags::PERFORMED_STATION_NAME_CODE_SEQUENCE,
    tags::PERFORMING_PHYSICIAN_IDENTIFICATION_SEQUENCE,
    tags::PERFORMING_PHYSICIAN_NAME,
    tags::PERSON_ADDRESS,
    tags::PERSON_IDENTIFICATION_CODE_SEQUENCE,
    tags::PERSON_NAME,
    tags::PERSON_TELEPHONE_NUMBERS,
    tags::PHYSICIAN_APPROVING_INTERPRETATION,
    tags::PHYSICIANS_READING_STUDY_IDENTIFICATION_SEQUENCE,
    tags::PHYSICIANS_OF_RECORD,
    tags::PHYSICIANS_OF_RECORD_IDENTIFICATION_SEQUENCE,
    tags::PLACER_ORDER_NUMBER_IMAGING_SERVICE_REQUEST,
    tags::PLATE_ID,
    tags::PRE_MEDICATION,
    tags::PREGNANCY_STATUS,
    tags::PROCEDURE_STEP_CANCELLATION_DATE_TIME,
    tags::PROTOCOL_NAME,
    tags::REASON_FOR_THE_IMAGING_SERVICE_REQUEST,
    tags::REASON_FOR_STUDY,
    tags::REFERENCED_DIGITAL_SIGNATURE_SEQUENCE,
    tags::REFERENCED_FRAME_OF_REFERENCE_UID,
    tags::REFERENCED_GENERAL_PURPOSE_SCHEDULED_PROCEDURE_STEP_TRANSACTION_UID,
    tags::REFERENCED_IMAGE_SEQUENCE,
    tags::REFERENCED_OBSERVATION_UID_TRIAL,
    tags::REFERENCED_PATIENT_ALIAS_SEQUENCE,
    tags::REFERENCED_PATIENT_PHOTO_SEQUENCE,
    tags::REFERENCED_PATIENT_SEQUENCE,
    tags::REFERENCED_PERFORMED_PROCEDURE_STEP_SEQUENCE,
    tags::REFERENCED_SOP_INSTANCE_MAC_SEQUENCE,
    tags::REFERENCED_SOP_INSTANCE_UID,
    tags::REFERENCED_SOP_INSTANCE_UID_IN_FILE,
    tags::REFERENCED_STUDY_SEQUENCE,
    tags::REFERRING_PHYSICIAN_ADDRESS,
    tags::REFERRING_PHYSICIAN_IDENTIFICATION_SEQUENCE,
    tags::REFERRING_PHYSICIAN_NAME,
    tags::REFERRING_PHYSICIAN_TELEPHONE_NUMBERS,
    tags::REGION_OF_RESIDENCE,
    tags::RELATED_FRAME_OF_REFERENCE_UID,
    tags::REQUEST_ATTRIBUTES_SEQUENCE,
    tags::REQUESTED_CONTRAST_AGENT,
    tags::REQUESTED_PROCEDURE_COMMENTS,
    tags::REQUESTED_PROCEDURE_DESCRIPTION,
    tags::REQUESTED_PROCEDURE_ID,
    tags::REQUESTED_PROCEDURE_LOCATION,
    tags::REQUESTED_SOP_INSTANCE_UID,
    tags::REQUESTING_PHYSICIAN,
    tags::REQUESTING_SERVICE,
    tags::RESPONSIBLE_ORGANIZATION,
    tags::RESPONSIBLE_PERSON,
    tags::RESULTS_COMMENTS,
    tags::RESULTS_DISTRIBUTION_LIST_SEQUENCE,
    tags::RESULTS_ID_ISSUER,
    tags::REVIEWER_NAME,
    tags::SCHEDULED_HUMAN_PERFORMERS_SEQUENCE,
    tags::SCHEDULED_PATIENT_INSTITUTION_RESIDENCE,
    tags::SCHEDULED_PERFORMING_PHYSICIAN_IDENTIFICATION_SEQUENCE,
    tags::SCHEDULED_PERFORMING_PHYSICIAN_NAME,
    tags::SCHEDULED_PROCEDURE_STEP_END_DATE,
    tags::SCHEDULED_PROCEDURE_STEP_END_TIME,
    tags::SCHEDULED_PROCEDURE_STEP_DESCRIPTION,
    tags::SCHEDULED_PROCEDURE_STEP_LOCATION,
    tags::SCHEDULED_PROCEDURE_STEP_MODIFICATION_DATE_TIME,
    tags::SCHEDULED_PROCEDURE_STEP_START_DATE,
    tags::SCHEDULED_PROCEDURE_STEP_START_DATE_TIME,
    tags::SCHEDULED_PROCEDURE_STEP_START_TIME,
    tags::SCHEDULED_STATION_AE_TITLE,
    tags::SCHEDULED_STATION_GEOGRAPHIC_LOCATION_CODE_SEQUENCE,
    tags::SCHEDULED_STATION_NAME,
    tags::SCHEDULED_STATION_NAME_CODE_SEQUENCE,
    tags::SCHEDULED_STUDY_LOCATION,
    tags::SCHEDULED_STUDY_LOCATION_AE_TITLE,
    tags::SERIES_DATE,
    tags::SERIES_DESCRIPTION,
    tags::SERIES_TIME,
    tags::SERVICE_EPISODE_DESCRIPTION,
    tags::SERVICE_EPISODE_ID,
    tags::SMOKING_STATUS,
    tags::SOURCE_IMAGE_SEQUENCE,
    tags::SOURCE_SERIAL_NUMBER,
    tags::SPECIAL_NEEDS,
    tags::START_ACQUISITION_DATE_TIME,
    tags::STATION_NAME,
    tags::STORAGE_MEDIA_FILE_SET_UID,
    tags::STUDY_COMMENTS,
    tags::STUDY_DATE,
    tags::STUDY_DESCRIPTION,
    tags::STUDY_ID,
    tags::STUDY_ID_ISSUER,
    tags::STUDY_TIME,
    tags::SYNCHRONIZATION_FRAME_OF_REFERENCE_UID,
    tags::TARGET_UID,
    tags::TELEPHONE_NUMBER_TRIAL,
    tags::TEMPLATE_EXTENSION_CREATOR_UID,
    tags::TEMPLATE_EXTENSION_ORGANIZATION_UID,
    tags::TEXT_COMMENTS,
    tags::TEXT_STRING,
    tags::TIMEZONE_OFFSET_FROM_UTC,
    tags::TOPIC_AUTHOR,
    tags::TOPIC_KEYWORDS,
    tags::TOPIC_SUBJECT,
    tags::TOPIC_TITLE,
    tags::TRANSACTION_UID,
    tags::UID,
    tags::VERBAL_SOURCE_TRIAL,
    tags::VERBAL_SOURCE_IDENTIFIER_CODE_SEQUENCE_TRIAL,
    tags::VERIFYING_OBSERVER_IDENTIFICATION_CODE_SEQUENCE,
    tags::VERIFYING_OBSERVER_NAME,
    tags::VERIFYING_OBSERVER_SEQUENCE,
    tags::VERIFYING_ORGANIZATION,
    tags::VISIT_COMMENTS,
];

fn catalog() -> &'static HashSet<Tag> {
    CATALOG.get_or_init(|| CONFIDENTIAL_TAGS.iter().copied().collect())
}

/// Returns `true` if the tag is listed in the confidential tag catalog.
///
/// This only looks at the fixed list of standard attributes. Use
/// [`is_confidential`](crate::classifier::is_confidential) to also take private tags, curve data
/// and overlay data into account.
pub fn contains(tag: &Tag) -> bool {
    catalog().contains(tag)
}

/// Number of distinct tags in the catalog.
pub fn len() -> usize {
    catalog().len()
}

/// Iterates over the catalog in definition order.
pub fn iter() -> impl Iterator<Item = &'static Tag> {
    CONFIDENTIAL_TAGS.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_patient_demographics() {
        assert!(contains(&tags::PATIENT_NAME));
        assert!(contains(&tags::PATIENT_BIRTH_DATE));
        assert!(contains(&tags::PATIENT_SEX));
        assert!(contains(&tags::ACCESSION_NUMBER));
        assert!(contains(&tags::INSTITUTION_NAME));
    }

    #[test]
    fn test_contains_retired_attributes() {
        assert!(contains(&tags::ACQUISITION_COMMENTS));
        assert!(contains(&tags::ARBITRARY));
        assert!(contains(&tags::VERBAL_SOURCE_TRIAL));
        assert!(contains(&tags::DATA_SET_TRAILING_PADDING));
        assert!(contains(&tags::MEDIA_STORAGE_SOP_INSTANCE_UID));
        assert!(contains(&Tag(0x5000, 0x3000)));
        assert!(contains(&Tag(0x6000, 0x4000)));
    }

    #[test]
    fn test_linkage_identifiers_are_not_in_catalog() {
        assert!(!contains(&tags::STUDY_INSTANCE_UID));
        assert!(!contains(&tags::SERIES_INSTANCE_UID));
        assert!(!contains(&tags::SOP_INSTANCE_UID));
        assert!(!contains(&tags::PATIENT_ID));
    }

    #[test]
    fn test_structural_tags_are_not_in_catalog() {
        assert!(!contains(&tags::SOP_CLASS_UID));
        assert!(!contains(&tags::MODALITY));
        assert!(!contains(&tags::PIXEL_DATA));
        assert!(!contains(&tags::TRANSFER_SYNTAX_UID));
    }

    #[test]
    fn test_no_duplicates() {
        assert_eq!(len(), CONFIDENTIAL_TAGS.len());
        assert_eq!(iter().count(), len());
    }

    #[test]
    fn test_catalog_size() {
        assert!(len() > 240);
    }

    #[test]
    fn test_concurrent_reads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| contains(&tags::PATIENT_NAME)))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
