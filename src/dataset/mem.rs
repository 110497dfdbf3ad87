use super::{trim_padding, Dataset, DatasetError, ElementView};
use crate::vr;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{DataDictionary, DataElement, Tag, VR};
use dicom_object::InMemDicomObject;

impl<D> Dataset for InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    fn count(&self) -> usize {
        self.iter().count()
    }

    fn elements(&self) -> Vec<ElementView> {
        self.iter().map(ElementView::from_element).collect()
    }

    fn delete_by_tag(&mut self, tag: Tag) -> Result<(), DatasetError> {
        if self.remove_element(tag) {
            Ok(())
        } else {
            Err(DatasetError::NotFound(tag))
        }
    }

    fn find_and_set_string(&mut self, tag: Tag, value: &str, vr: VR) -> Result<(), DatasetError> {
        vr::check_value(vr, value).map_err(|source| DatasetError::InvalidValue { tag, source })?;
        self.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
        Ok(())
    }

    fn string_value(&self, tag: Tag) -> Option<String> {
        let elem = self.element(tag).ok()?;
        match elem.value() {
            Value::Primitive(PrimitiveValue::Empty) => Some(String::new()),
            Value::Primitive(primitive @ (PrimitiveValue::Str(_) | PrimitiveValue::Strs(_))) => {
                Some(trim_padding(&primitive.to_str()))
            }
            _ => None,
        }
    }

    fn visit_items_mut(&mut self, tag: Tag, visitor: &mut dyn FnMut(&mut dyn Dataset)) -> usize {
        let mut visited = 0;
        self.update_value(tag, |value| {
            if let Value::Sequence(seq) = value {
                for item in seq.items_mut().iter_mut() {
                    visitor(item);
                    visited += 1;
                }
            }
        });
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dataset::ElementValue;
    use crate::tags;
    use dicom_core::value::DataSetSequence;
    use dicom_object::mem::InMemElement;

    fn make_object() -> InMemDicomObject {
        InMemDicomObject::from_element_iter([
            InMemElement::new(tags::SOP_INSTANCE_UID, VR::UI, Value::from("1.2.3.4")),
            InMemElement::new(tags::PATIENT_NAME, VR::PN, Value::from("Doe^Jane")),
            InMemElement::new(tags::PATIENT_ID, VR::LO, Value::from("12345")),
        ])
    }

    #[test]
    fn test_count_and_order() {
        let obj = make_object();
        assert_eq!(Dataset::count(&obj), 3);
        // elements are kept sorted by tag
        assert_eq!(
            obj.tag_keys(),
            vec![tags::SOP_INSTANCE_UID, tags::PATIENT_NAME, tags::PATIENT_ID]
        );
        assert_eq!(obj.element_at(1).unwrap().tag, tags::PATIENT_NAME);
        assert_eq!(obj.element_at(3), None);
    }

    #[test]
    fn test_delete_by_tag() {
        let mut obj = make_object();
        assert_eq!(obj.delete_by_tag(tags::PATIENT_NAME), Ok(()));
        assert!(!obj.contains_tag(tags::PATIENT_NAME));
        assert_eq!(
            obj.delete_by_tag(tags::PATIENT_NAME),
            Err(DatasetError::NotFound(tags::PATIENT_NAME))
        );
    }

    #[test]
    fn test_find_and_set_string_overwrites() {
        let mut obj = make_object();
        obj.find_and_set_string(tags::PATIENT_ID, "ABC", VR::LO)
            .unwrap();
        assert_eq!(obj.string_value(tags::PATIENT_ID), Some("ABC".into()));
        assert_eq!(Dataset::count(&obj), 3);
    }

    #[test]
    fn test_find_and_set_string_creates() {
        let mut obj = make_object();
        obj.find_and_set_string(tags::STUDY_INSTANCE_UID, "1.2.3", VR::UI)
            .unwrap();
        assert_eq!(obj.string_value(tags::STUDY_INSTANCE_UID), Some("1.2.3".into()));
        assert_eq!(Dataset::count(&obj), 4);
    }

    #[test]
    fn test_find_and_set_string_invalid_value() {
        let mut obj = make_object();
        let result = obj.find_and_set_string(tags::STUDY_INSTANCE_UID, "not-a-uid", VR::UI);
        assert!(matches!(
            result,
            Err(DatasetError::InvalidValue { tag, .. }) if tag == tags::STUDY_INSTANCE_UID
        ));
        assert!(!obj.contains_tag(tags::STUDY_INSTANCE_UID));
    }

    #[test]
    fn test_string_value_of_non_string() {
        let mut obj = make_object();
        obj.put(InMemElement::new(
            tags::ROWS,
            VR::US,
            PrimitiveValue::from(256_u16),
        ));
        assert_eq!(obj.string_value(tags::ROWS), None);
        assert_eq!(obj.string_value(tags::STUDY_DATE), None);
    }

    #[test]
    fn test_visit_items_mut() {
        let item = InMemDicomObject::from_element_iter([InMemElement::new(
            tags::REFERENCED_SOP_INSTANCE_UID,
            VR::UI,
            Value::from("1.2.3"),
        )]);
        let mut obj = make_object();
        obj.put(InMemElement::new(
            tags::SOURCE_IMAGE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![item.clone(), item]),
        ));

        let visited = obj.visit_items_mut(tags::SOURCE_IMAGE_SEQUENCE, &mut |item| {
            item.delete_by_tag(tags::REFERENCED_SOP_INSTANCE_UID).unwrap();
        });
        assert_eq!(visited, 2);

        let view = obj
            .elements()
            .into_iter()
            .find(|elem| elem.tag == tags::SOURCE_IMAGE_SEQUENCE)
            .unwrap();
        assert_eq!(view.value, ElementValue::Sequence(2));

        let seq = obj.element(tags::SOURCE_IMAGE_SEQUENCE).unwrap();
        for item in seq.items().unwrap() {
            assert_eq!(Dataset::count(item), 0);
        }
    }

    #[test]
    fn test_visit_items_mut_not_a_sequence() {
        let mut obj = make_object();
        let visited = obj.visit_items_mut(tags::PATIENT_NAME, &mut |_| {});
        assert_eq!(visited, 0);
        let visited = obj.visit_items_mut(tags::SOURCE_IMAGE_SEQUENCE, &mut |_| {});
        assert_eq!(visited, 0);
    }
}
