use crate::dataset::{Dataset, DatasetError, ElementValue, ElementView};
use crate::tags;
use crate::vr;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{Tag, VR};
use dicom_object::mem::InMemElement;
use dicom_object::meta::FileMetaTableBuilder;
use dicom_object::{DefaultDicomObject, FileDicomObject, FileMetaTable};
use std::collections::{BTreeMap, HashSet};

pub(crate) fn make_file_meta() -> FileMetaTable {
    FileMetaTableBuilder::new()
        .media_storage_sop_class_uid("1.2.3")
        .media_storage_sop_instance_uid("2.3.4")
        .transfer_syntax("1.2.840.10008.1.2.1") // Explicit VR Little Endian
        .build()
        .unwrap()
}

/// A small CT-like record with a mix of confidential, structural and linkage attributes.
pub(crate) fn make_sample_object() -> DefaultDicomObject {
    let mut obj = FileDicomObject::new_empty_with_meta(make_file_meta());
    obj.put(InMemElement::new(tags::SOP_CLASS_UID, VR::UI, Value::from("1.2.840.10008.5.1.4.1.1.2")));
    obj.put(InMemElement::new(tags::SOP_INSTANCE_UID, VR::UI, Value::from("2.3.4")));
    obj.put(InMemElement::new(tags::STUDY_DATE, VR::DA, Value::from("20240115")));
    obj.put(InMemElement::new(tags::ACCESSION_NUMBER, VR::SH, Value::from("ACC0001")));
    obj.put(InMemElement::new(tags::MODALITY, VR::CS, Value::from("CT")));
    obj.put(InMemElement::new(tags::INSTITUTION_NAME, VR::LO, Value::from("General Hospital")));
    obj.put(InMemElement::new(tags::PATIENT_NAME, VR::PN, Value::from("Doe^Jane")));
    obj.put(InMemElement::new(tags::PATIENT_ID, VR::LO, Value::from("12345")));
    obj.put(InMemElement::new(tags::PATIENT_BIRTH_DATE, VR::DA, Value::from("19700101")));
    obj.put(InMemElement::new(tags::PATIENT_SEX, VR::CS, Value::from("F")));
    obj.put(InMemElement::new(tags::STUDY_INSTANCE_UID, VR::UI, Value::from("1.2.840.99.1")));
    obj.put(InMemElement::new(tags::SERIES_INSTANCE_UID, VR::UI, Value::from("1.2.840.99.1.1")));
    obj.put(InMemElement::new(tags::ROWS, VR::US, PrimitiveValue::from(512_u16)));
    obj.put(InMemElement::new(Tag(0x0009, 0x0010), VR::LO, Value::from("VENDOR")));
    obj.put(InMemElement::new(Tag(0x6000, 0x4000), VR::LT, Value::from("overlay note")));
    obj
}

/// In-memory [`Dataset`] whose operations can be made to fail for chosen tags.
#[derive(Debug, Default)]
pub(crate) struct FakeDataset {
    elements: BTreeMap<Tag, (VR, String)>,
    failing_delete: HashSet<Tag>,
    failing_set: HashSet<Tag>,
}

impl FakeDataset {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, tag: Tag, vr: VR, value: &str) -> Self {
        self.elements.insert(tag, (vr, value.into()));
        self
    }

    pub(crate) fn failing_delete(mut self, tag: Tag) -> Self {
        self.failing_delete.insert(tag);
        self
    }

    pub(crate) fn failing_set(mut self, tag: Tag) -> Self {
        self.failing_set.insert(tag);
        self
    }
}

impl Dataset for FakeDataset {
    fn count(&self) -> usize {
        self.elements.len()
    }

    fn elements(&self) -> Vec<ElementView> {
        self.elements
            .iter()
            .map(|(tag, (vr, value))| ElementView::new(*tag, *vr, ElementValue::Text(value.clone())))
            .collect()
    }

    fn delete_by_tag(&mut self, tag: Tag) -> Result<(), DatasetError> {
        if self.failing_delete.contains(&tag) {
            return Err(DatasetError::Mandatory(tag));
        }
        self.elements
            .remove(&tag)
            .map(|_| ())
            .ok_or(DatasetError::NotFound(tag))
    }

    fn find_and_set_string(&mut self, tag: Tag, value: &str, vr: VR) -> Result<(), DatasetError> {
        if self.failing_set.contains(&tag) {
            return Err(DatasetError::Unsupported(tag));
        }
        vr::check_value(vr, value).map_err(|source| DatasetError::InvalidValue { tag, source })?;
        self.elements.insert(tag, (vr, value.into()));
        Ok(())
    }

    fn string_value(&self, tag: Tag) -> Option<String> {
        self.elements.get(&tag).map(|(_, value)| value.clone())
    }
}
