//! The attribute table capability that redaction and substitution work against.
//!
//! Parsing and serialization belong to the codec (dicom-rs). This module only describes what
//! the de-identification steps need from a parsed attribute table, plus the adapters for the
//! two tables of a DICOM file: the main [`InMemDicomObject`](dicom_object::InMemDicomObject)
//! and the [`FileMetaTable`](dicom_object::FileMetaTable) header.

mod mem;
mod meta;

use crate::vr::ValueError;
use dicom_core::header::Header;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{DataDictionary, DataElement, Tag, VR};
use dicom_object::{FileDicomObject, InMemDicomObject};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("tag {0} not found")]
    NotFound(Tag),

    #[error("tag {0} is a mandatory file meta attribute and cannot be removed")]
    Mandatory(Tag),

    #[error("tag {0} cannot be set from a string in this dataset")]
    Unsupported(Tag),

    #[error("invalid value for tag {tag}: {source}")]
    InvalidValue { tag: Tag, source: ValueError },
}

/// Value of an element, independent of how the codec stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// Textual value, multiple values joined with a backslash.
    Text(String),

    /// Sequence with the given number of items.
    Sequence(usize),

    /// Binary, numeric or encapsulated data.
    Opaque,
}

/// Read-only snapshot of a single element of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    pub tag: Tag,
    pub vr: VR,
    pub value: ElementValue,
}

impl ElementView {
    pub fn new(tag: Tag, vr: VR, value: ElementValue) -> Self {
        Self { tag, vr, value }
    }

    pub(crate) fn from_element<I, P>(elem: &DataElement<I, P>) -> Self {
        let value = match elem.value() {
            Value::Primitive(primitive) => primitive_to_element_value(primitive),
            Value::Sequence(seq) => ElementValue::Sequence(seq.items().len()),
            _ => ElementValue::Opaque,
        };
        Self::new(elem.tag(), elem.vr(), value)
    }
}

fn primitive_to_element_value(primitive: &PrimitiveValue) -> ElementValue {
    match primitive {
        PrimitiveValue::Empty => ElementValue::Text(String::new()),
        PrimitiveValue::Str(_) | PrimitiveValue::Strs(_) => {
            ElementValue::Text(trim_padding(&primitive.to_str()))
        }
        _ => ElementValue::Opaque,
    }
}

pub(crate) fn trim_padding(value: &str) -> String {
    value.trim_end_matches(['\0', ' ']).to_string()
}

/// An ordered table of elements keyed by tag.
///
/// Tags are unique within one dataset and enumeration order is stable between calls as long as
/// the dataset is not modified. Implementations report failures through [`DatasetError`]; the
/// message is meant to be shown to operators as-is.
pub trait Dataset {
    /// Number of top-level elements.
    fn count(&self) -> usize;

    /// Snapshot of all top-level elements in stable order.
    fn elements(&self) -> Vec<ElementView>;

    /// Removes the element with the given tag.
    fn delete_by_tag(&mut self, tag: Tag) -> Result<(), DatasetError>;

    /// Sets a single string value, creating the element if it does not exist yet and
    /// overwriting the current value otherwise.
    fn find_and_set_string(&mut self, tag: Tag, value: &str, vr: VR) -> Result<(), DatasetError>;

    /// Reads back the textual value of an element, without trailing padding.
    fn string_value(&self, tag: Tag) -> Option<String>;

    fn element_at(&self, index: usize) -> Option<ElementView> {
        self.elements().into_iter().nth(index)
    }

    fn tag_keys(&self) -> Vec<Tag> {
        self.elements().into_iter().map(|elem| elem.tag).collect()
    }

    fn contains_tag(&self, tag: Tag) -> bool {
        self.elements().iter().any(|elem| elem.tag == tag)
    }

    /// Calls `visitor` on every item of the sequence element with the given tag and returns the
    /// number of items visited. Datasets without sequences visit nothing.
    fn visit_items_mut(&mut self, _tag: Tag, _visitor: &mut dyn FnMut(&mut dyn Dataset)) -> usize {
        0
    }
}

/// The two attribute tables of one DICOM record.
///
/// Either table may be unavailable, which de-identification treats as a precondition
/// violation.
pub trait DicomRecord {
    /// The main dataset with the clinical content.
    fn dataset_mut(&mut self) -> Option<&mut dyn Dataset>;

    /// The file meta information header.
    fn header_mut(&mut self) -> Option<&mut dyn Dataset>;
}

impl<D> DicomRecord for FileDicomObject<InMemDicomObject<D>>
where
    D: DataDictionary + Clone,
{
    fn dataset_mut(&mut self) -> Option<&mut dyn Dataset> {
        let obj: &mut InMemDicomObject<D> = self;
        Some(obj)
    }

    fn header_mut(&mut self) -> Option<&mut dyn Dataset> {
        Some(self.meta_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tags;
    use crate::test_utils::make_file_meta;
    use dicom_object::mem::InMemElement;

    #[test]
    fn test_element_view_text() {
        let elem: InMemElement = InMemElement::new(tags::PATIENT_NAME, VR::PN, Value::from("Doe^Jane "));
        let view = ElementView::from_element(&elem);
        assert_eq!(view.tag, tags::PATIENT_NAME);
        assert_eq!(view.vr, VR::PN);
        assert_eq!(view.value, ElementValue::Text("Doe^Jane".into()));
    }

    #[test]
    fn test_element_view_not_a_string() {
        let elem: InMemElement = InMemElement::new(tags::ROWS, VR::US, PrimitiveValue::from(512_u16));
        let view = ElementView::from_element(&elem);
        assert_eq!(view.value, ElementValue::Opaque);
    }

    #[test]
    fn test_element_view_empty() {
        let elem: InMemElement = InMemElement::new(tags::STUDY_ID, VR::SH, PrimitiveValue::Empty);
        let view = ElementView::from_element(&elem);
        assert_eq!(view.value, ElementValue::Text(String::new()));
    }

    #[test]
    fn test_record_exposes_both_tables() {
        let mut obj = FileDicomObject::new_empty_with_meta(make_file_meta());
        obj.put(InMemElement::new(tags::PATIENT_NAME, VR::PN, Value::from("Doe^Jane")));

        let dataset = obj.dataset_mut().unwrap();
        assert_eq!(dataset.count(), 1);
        assert!(dataset.contains_tag(tags::PATIENT_NAME));

        let header = obj.header_mut().unwrap();
        assert!(header.contains_tag(tags::MEDIA_STORAGE_SOP_INSTANCE_UID));
    }
}
