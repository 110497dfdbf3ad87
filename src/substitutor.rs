use crate::config::TracingLevel;
use crate::dataset::{Dataset, DatasetError};
use dicom_core::{Tag, VR};
use log::{debug, error, info};
use thiserror::Error;

/// A single value to write: the target tag, the new value and the VR to encode it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub tag: Tag,
    pub value: String,
    pub vr: VR,
}

impl Assignment {
    pub fn new(tag: Tag, value: impl Into<String>, vr: VR) -> Self {
        Self {
            tag,
            value: value.into(),
            vr,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source}")]
pub struct SubstitutionError {
    /// Tag of the assignment that failed.
    pub tag: Tag,
    /// Number of assignments applied before the failure. These are not undone.
    pub applied: usize,
    pub source: DatasetError,
}

/// Writes replacement values into a dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Substitutor {
    tracing_level: TracingLevel,
}

impl Substitutor {
    pub fn new(tracing_level: TracingLevel) -> Self {
        Self { tracing_level }
    }

    /// Applies `assignments` in order, creating each element if it is absent and overwriting its
    /// value otherwise.
    ///
    /// Stops at the first assignment the dataset rejects. The assignments before it stay
    /// applied, the ones after it are not attempted.
    ///
    /// Returns the number of assignments applied.
    pub fn substitute(
        &self,
        dataset: &mut dyn Dataset,
        assignments: &[Assignment],
    ) -> Result<usize, SubstitutionError> {
        for (applied, assignment) in assignments.iter().enumerate() {
            if let Err(err) =
                dataset.find_and_set_string(assignment.tag, &assignment.value, assignment.vr)
            {
                error!("failed to set {}: {err}", assignment.tag);
                return Err(SubstitutionError {
                    tag: assignment.tag,
                    applied,
                    source: err,
                });
            }
            if self.tracing_level.is_detailed() {
                debug!(
                    "set {} {} to {}",
                    assignment.tag, assignment.vr, assignment.value
                );
            }
        }

        if self.tracing_level.is_summary() {
            info!("substituted {} identifiers", assignments.len());
        }
        Ok(assignments.len())
    }
}

/// Applies `assignments` without tracing. See [`Substitutor::substitute`].
pub fn substitute(
    dataset: &mut dyn Dataset,
    assignments: &[Assignment],
) -> Result<usize, SubstitutionError> {
    Substitutor::default().substitute(dataset, assignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tags;
    use crate::test_utils::FakeDataset;
    use dicom_core::value::Value;
    use dicom_object::mem::InMemElement;
    use dicom_object::InMemDicomObject;

    fn assignments() -> Vec<Assignment> {
        vec![
            Assignment::new(tags::STUDY_INSTANCE_UID, "1.2.3", VR::UI),
            Assignment::new(tags::SERIES_INSTANCE_UID, "1.2.3.4", VR::UI),
            Assignment::new(tags::SOP_INSTANCE_UID, "1.2.3.4.5", VR::UI),
            Assignment::new(tags::PATIENT_ID, "ANON", VR::LO),
        ]
    }

    #[test]
    fn test_substitute_creates_and_overwrites() {
        let mut obj = InMemDicomObject::from_element_iter([
            InMemElement::new(tags::STUDY_INSTANCE_UID, VR::UI, Value::from("1.2.840.99")),
            InMemElement::new(tags::PATIENT_ID, VR::LO, Value::from("12345")),
        ]);

        let applied = substitute(&mut obj, &assignments()).unwrap();
        assert_eq!(applied, 4);
        assert_eq!(obj.string_value(tags::STUDY_INSTANCE_UID), Some("1.2.3".into()));
        assert_eq!(obj.string_value(tags::SERIES_INSTANCE_UID), Some("1.2.3.4".into()));
        assert_eq!(obj.string_value(tags::SOP_INSTANCE_UID), Some("1.2.3.4.5".into()));
        assert_eq!(obj.string_value(tags::PATIENT_ID), Some("ANON".into()));
        assert_eq!(Dataset::count(&obj), 4);
    }

    #[test]
    fn test_substitute_only_touches_targets() {
        let mut obj = InMemDicomObject::from_element_iter([InMemElement::new(
            tags::MODALITY,
            VR::CS,
            Value::from("CT"),
        )]);
        substitute(&mut obj, &assignments()).unwrap();

        let mut expected = vec![
            tags::MODALITY,
            tags::PATIENT_ID,
            tags::STUDY_INSTANCE_UID,
            tags::SERIES_INSTANCE_UID,
            tags::SOP_INSTANCE_UID,
        ];
        expected.sort();
        let mut actual = obj.tag_keys();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_substitute_stops_at_first_failure() {
        let mut dataset = FakeDataset::new().failing_set(tags::SOP_INSTANCE_UID);

        let err = substitute(&mut dataset, &assignments()).unwrap_err();
        assert_eq!(err.tag, tags::SOP_INSTANCE_UID);
        assert_eq!(err.applied, 2);

        // no rollback of what was applied, nothing attempted after the failure
        assert_eq!(dataset.string_value(tags::STUDY_INSTANCE_UID), Some("1.2.3".into()));
        assert_eq!(dataset.string_value(tags::SERIES_INSTANCE_UID), Some("1.2.3.4".into()));
        assert_eq!(dataset.string_value(tags::SOP_INSTANCE_UID), None);
        assert_eq!(dataset.string_value(tags::PATIENT_ID), None);
    }

    #[test]
    fn test_substitute_keeps_collaborator_message() {
        let mut dataset = FakeDataset::new().failing_set(tags::STUDY_INSTANCE_UID);
        let err = substitute(&mut dataset, &assignments()).unwrap_err();
        assert_eq!(
            err.to_string(),
            DatasetError::Unsupported(tags::STUDY_INSTANCE_UID).to_string()
        );
    }

    #[test]
    fn test_substitute_invalid_value() {
        let mut obj = InMemDicomObject::new_empty();
        let err = substitute(
            &mut obj,
            &[
                Assignment::new(tags::PATIENT_ID, "ANON", VR::LO),
                Assignment::new(tags::STUDY_INSTANCE_UID, "1.2.840.X", VR::UI),
            ],
        )
        .unwrap_err();
        assert_eq!(err.applied, 1);
        assert!(matches!(err.source, DatasetError::InvalidValue { .. }));
        assert_eq!(obj.string_value(tags::PATIENT_ID), Some("ANON".into()));
    }

    #[test]
    fn test_substitute_nothing() {
        let mut obj = InMemDicomObject::new_empty();
        assert_eq!(substitute(&mut obj, &[]), Ok(0));
        assert_eq!(Dataset::count(&obj), 0);
    }
}
