use crate::generator::{IdentifierGenerator, IdentifierKind};
use crate::substitutor::Assignment;

/// Replacement identifiers supplied by the caller.
///
/// Every value is optional. Missing and blank values are generated when the identifiers are
/// resolved, so a caller only has to provide the identifiers it wants to control (for example
/// the same Study Instance UID for all instances of one study).
///
/// # Example
///
/// ```
/// use dicom_deidentification::generator::{IdentifierGenerator, IdentifierKind};
/// use dicom_deidentification::identifiers::Identifiers;
///
/// let identifiers = Identifiers::new().with(IdentifierKind::PatientId, "ANON0001");
/// let resolved = identifiers.resolve(&IdentifierGenerator::default());
/// assert_eq!(resolved.get(IdentifierKind::PatientId), "ANON0001");
/// assert!(resolved.get(IdentifierKind::StudyInstanceUid).starts_with("9999.1.2."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    study_instance_uid: Option<String>,
    series_instance_uid: Option<String>,
    sop_instance_uid: Option<String>,
    patient_id: Option<String>,
}

impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: IdentifierKind, value: impl Into<String>) -> Self {
        self.set(kind, Some(value.into()));
        self
    }

    pub fn set(&mut self, kind: IdentifierKind, value: Option<String>) {
        *self.slot_mut(kind) = value;
    }

    /// The caller-supplied value for `kind`, if it is not blank.
    pub fn get(&self, kind: IdentifierKind) -> Option<&str> {
        let value = match kind {
            IdentifierKind::StudyInstanceUid => &self.study_instance_uid,
            IdentifierKind::SeriesInstanceUid => &self.series_instance_uid,
            IdentifierKind::SopInstanceUid => &self.sop_instance_uid,
            IdentifierKind::PatientId => &self.patient_id,
        };
        value.as_deref().filter(|value| !value.trim().is_empty())
    }

    /// Fills in every missing value with a freshly generated one.
    pub fn resolve(&self, generator: &IdentifierGenerator) -> ResolvedIdentifiers {
        self.resolve_with(|kind| generator.generate(kind))
    }

    /// Fills in every missing value with the one returned by `fallback`.
    pub fn resolve_with<F>(&self, mut fallback: F) -> ResolvedIdentifiers
    where
        F: FnMut(IdentifierKind) -> String,
    {
        let mut value = |kind: IdentifierKind| match self.get(kind) {
            Some(value) => value.to_string(),
            None => fallback(kind),
        };
        ResolvedIdentifiers {
            study_instance_uid: value(IdentifierKind::StudyInstanceUid),
            series_instance_uid: value(IdentifierKind::SeriesInstanceUid),
            sop_instance_uid: value(IdentifierKind::SopInstanceUid),
            patient_id: value(IdentifierKind::PatientId),
        }
    }

    fn slot_mut(&mut self, kind: IdentifierKind) -> &mut Option<String> {
        match kind {
            IdentifierKind::StudyInstanceUid => &mut self.study_instance_uid,
            IdentifierKind::SeriesInstanceUid => &mut self.series_instance_uid,
            IdentifierKind::SopInstanceUid => &mut self.sop_instance_uid,
            IdentifierKind::PatientId => &mut self.patient_id,
        }
    }
}

/// The four identifiers actually written into a de-identified dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifiers {
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub sop_instance_uid: String,
    pub patient_id: String,
}

impl ResolvedIdentifiers {
    pub fn get(&self, kind: IdentifierKind) -> &str {
        match kind {
            IdentifierKind::StudyInstanceUid => &self.study_instance_uid,
            IdentifierKind::SeriesInstanceUid => &self.series_instance_uid,
            IdentifierKind::SopInstanceUid => &self.sop_instance_uid,
            IdentifierKind::PatientId => &self.patient_id,
        }
    }

    /// The assignments to apply, in order: Study Instance UID, Series Instance UID,
    /// SOP Instance UID and Patient ID.
    pub fn assignments(&self) -> Vec<Assignment> {
        IdentifierKind::ALL
            .into_iter()
            .map(|kind| Assignment::new(kind.tag(), self.get(kind), kind.vr()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tags;
    use dicom_core::VR;

    fn resolved() -> ResolvedIdentifiers {
        Identifiers::new()
            .with(IdentifierKind::StudyInstanceUid, "1.2.3")
            .with(IdentifierKind::SeriesInstanceUid, "1.2.3.4")
            .with(IdentifierKind::SopInstanceUid, "1.2.3.4.5")
            .with(IdentifierKind::PatientId, "ANON")
            .resolve(&IdentifierGenerator::default())
    }

    #[test]
    fn test_assignments_order() {
        let assignments = resolved().assignments();
        let expected = [
            (tags::STUDY_INSTANCE_UID, "1.2.3", VR::UI),
            (tags::SERIES_INSTANCE_UID, "1.2.3.4", VR::UI),
            (tags::SOP_INSTANCE_UID, "1.2.3.4.5", VR::UI),
            (tags::PATIENT_ID, "ANON", VR::LO),
        ];
        assert_eq!(assignments.len(), 4);
        for (assignment, (tag, value, vr)) in assignments.iter().zip(expected) {
            assert_eq!(assignment.tag, tag);
            assert_eq!(assignment.value, value);
            assert_eq!(assignment.vr, vr);
        }
    }

    #[test]
    fn test_resolve_generates_missing_values() {
        let identifiers = Identifiers::new().with(IdentifierKind::SeriesInstanceUid, "1.2.3.4");
        let resolved = identifiers.resolve(&IdentifierGenerator::default());
        assert_eq!(resolved.series_instance_uid, "1.2.3.4");
        assert!(resolved.study_instance_uid.starts_with("9999.1.2."));
        assert!(resolved.sop_instance_uid.starts_with("9999.1.4."));
        assert_eq!(resolved.patient_id.len(), 20);
    }

    #[test]
    fn test_blank_values_are_generated() {
        let identifiers = Identifiers::new()
            .with(IdentifierKind::PatientId, "   ")
            .with(IdentifierKind::StudyInstanceUid, "");
        assert_eq!(identifiers.get(IdentifierKind::PatientId), None);
        assert_eq!(identifiers.get(IdentifierKind::StudyInstanceUid), None);

        let resolved = identifiers.resolve_with(|kind| format!("generated-{kind}"));
        assert_eq!(resolved.patient_id, "generated-patient");
        assert_eq!(resolved.study_instance_uid, "generated-study");
    }

    #[test]
    fn test_set_clears_value() {
        let mut identifiers = Identifiers::new().with(IdentifierKind::PatientId, "ANON");
        identifiers.set(IdentifierKind::PatientId, None);
        assert_eq!(identifiers, Identifiers::new());
    }
}
