use crate::dataset::Dataset;
use crate::generator::{IdentifierGenerator, IdentifierKind};
use crate::identifiers::{Identifiers, ResolvedIdentifiers};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Remembers which replacement was issued for which original identifier.
///
/// When many files are de-identified in one run, instances of the same study keep a common
/// Study Instance UID, series keep a common Series Instance UID and a patient keeps a single
/// Patient ID. The mapping lives in memory only and can be shared between threads.
#[derive(Debug, Default)]
pub struct IdentifierMapping {
    entries: Mutex<HashMap<(IdentifierKind, String), String>>,
}

impl IdentifierMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// The replacement for `original`, generating and remembering one on first use.
    pub fn replacement<F>(&self, kind: IdentifierKind, original: &str, generate: F) -> String
    where
        F: FnOnce() -> String,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry((kind, original.to_string()))
            .or_insert_with(generate)
            .clone()
    }

    pub fn get(&self, kind: IdentifierKind, original: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(kind, original.to_string())).cloned()
    }

    /// Resolves the identifiers for `dataset`.
    ///
    /// Values in `explicit` win. Otherwise the identifier already in the dataset is looked up,
    /// and a fresh one is generated when the dataset has none.
    pub fn resolve(
        &self,
        dataset: &dyn Dataset,
        explicit: &Identifiers,
        generator: &IdentifierGenerator,
    ) -> ResolvedIdentifiers {
        explicit.resolve_with(|kind| {
            match dataset
                .string_value(kind.tag())
                .filter(|original| !original.is_empty())
            {
                Some(original) => self.replacement(kind, &original, || generator.generate(kind)),
                None => generator.generate(kind),
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tags;
    use crate::test_utils::FakeDataset;
    use dicom_core::VR;
    use std::sync::Arc;

    fn instance(sop_instance_uid: &str) -> FakeDataset {
        FakeDataset::new()
            .with(tags::STUDY_INSTANCE_UID, VR::UI, "1.2.840.1")
            .with(tags::SERIES_INSTANCE_UID, VR::UI, "1.2.840.1.1")
            .with(tags::SOP_INSTANCE_UID, VR::UI, sop_instance_uid)
            .with(tags::PATIENT_ID, VR::LO, "12345")
    }

    #[test]
    fn test_same_study_same_replacement() {
        let mapping = IdentifierMapping::new();
        let generator = IdentifierGenerator::default();

        let first = mapping.resolve(&instance("1.2.840.1.1.1"), &Identifiers::new(), &generator);
        let second = mapping.resolve(&instance("1.2.840.1.1.2"), &Identifiers::new(), &generator);

        assert_eq!(first.study_instance_uid, second.study_instance_uid);
        assert_eq!(first.series_instance_uid, second.series_instance_uid);
        assert_eq!(first.patient_id, second.patient_id);
        assert_ne!(first.sop_instance_uid, second.sop_instance_uid);
        assert_ne!(first.study_instance_uid, "1.2.840.1");
        assert_eq!(mapping.len(), 5);
    }

    #[test]
    fn test_explicit_values_win() {
        let mapping = IdentifierMapping::new();
        let explicit = Identifiers::new().with(IdentifierKind::PatientId, "ANON");
        let resolved = mapping.resolve(
            &instance("1.2.840.1.1.1"),
            &explicit,
            &IdentifierGenerator::default(),
        );
        assert_eq!(resolved.patient_id, "ANON");
        assert_eq!(mapping.get(IdentifierKind::PatientId, "12345"), None);
    }

    #[test]
    fn test_missing_original_is_generated() {
        let mapping = IdentifierMapping::new();
        let resolved = mapping.resolve(
            &FakeDataset::new(),
            &Identifiers::new(),
            &IdentifierGenerator::default(),
        );
        assert!(resolved.study_instance_uid.starts_with("9999.1.2."));
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_replacement_shared_between_threads() {
        let mapping = Arc::new(IdentifierMapping::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mapping = Arc::clone(&mapping);
                std::thread::spawn(move || {
                    mapping.replacement(IdentifierKind::StudyInstanceUid, "1.2.3", || {
                        crate::generator::generate(IdentifierKind::StudyInstanceUid)
                    })
                })
            })
            .collect();
        let replacements: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(replacements.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
