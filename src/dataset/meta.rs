use super::{trim_padding, Dataset, DatasetError, ElementValue, ElementView};
use crate::vr;
use dicom_core::{Tag, VR};
use dicom_dictionary_std::tags::{
    FILE_META_INFORMATION_GROUP_LENGTH, FILE_META_INFORMATION_VERSION, IMPLEMENTATION_CLASS_UID,
    IMPLEMENTATION_VERSION_NAME, MEDIA_STORAGE_SOP_CLASS_UID, MEDIA_STORAGE_SOP_INSTANCE_UID,
    PRIVATE_INFORMATION, PRIVATE_INFORMATION_CREATOR_UID, RECEIVING_APPLICATION_ENTITY_TITLE,
    SENDING_APPLICATION_ENTITY_TITLE, SOURCE_APPLICATION_ENTITY_TITLE, TRANSFER_SYNTAX_UID,
};
use dicom_object::FileMetaTable;

fn text(tag: Tag, vr: VR, value: &str) -> ElementView {
    ElementView::new(tag, vr, ElementValue::Text(trim_padding(value)))
}

fn take_optional<T>(field: &mut Option<T>, tag: Tag) -> Result<(), DatasetError> {
    match field.take() {
        Some(_) => Ok(()),
        None => Err(DatasetError::NotFound(tag)),
    }
}

/// The file meta group has a fixed layout: optional attributes can be removed and set, the
/// mandatory ones can only be overwritten.
impl Dataset for FileMetaTable {
    fn count(&self) -> usize {
        Dataset::elements(self).len()
    }

    fn elements(&self) -> Vec<ElementView> {
        let mut elements = vec![
            ElementView::new(FILE_META_INFORMATION_GROUP_LENGTH, VR::UL, ElementValue::Opaque),
            ElementView::new(FILE_META_INFORMATION_VERSION, VR::OB, ElementValue::Opaque),
            text(MEDIA_STORAGE_SOP_CLASS_UID, VR::UI, &self.media_storage_sop_class_uid),
            text(MEDIA_STORAGE_SOP_INSTANCE_UID, VR::UI, &self.media_storage_sop_instance_uid),
            text(TRANSFER_SYNTAX_UID, VR::UI, &self.transfer_syntax),
            text(IMPLEMENTATION_CLASS_UID, VR::UI, &self.implementation_class_uid),
        ];

        let optional = [
            (IMPLEMENTATION_VERSION_NAME, VR::SH, &self.implementation_version_name),
            (SOURCE_APPLICATION_ENTITY_TITLE, VR::AE, &self.source_application_entity_title),
            (SENDING_APPLICATION_ENTITY_TITLE, VR::AE, &self.sending_application_entity_title),
            (RECEIVING_APPLICATION_ENTITY_TITLE, VR::AE, &self.receiving_application_entity_title),
            (PRIVATE_INFORMATION_CREATOR_UID, VR::UI, &self.private_information_creator_uid),
        ];
        for (tag, vr, value) in optional {
            if let Some(value) = value {
                elements.push(text(tag, vr, value));
            }
        }

        if self.private_information.is_some() {
            elements.push(ElementView::new(PRIVATE_INFORMATION, VR::OB, ElementValue::Opaque));
        }

        elements
    }

    fn delete_by_tag(&mut self, tag: Tag) -> Result<(), DatasetError> {
        match tag {
            IMPLEMENTATION_VERSION_NAME => take_optional(&mut self.implementation_version_name, tag)?,
            SOURCE_APPLICATION_ENTITY_TITLE => {
                take_optional(&mut self.source_application_entity_title, tag)?
            }
            SENDING_APPLICATION_ENTITY_TITLE => {
                take_optional(&mut self.sending_application_entity_title, tag)?
            }
            RECEIVING_APPLICATION_ENTITY_TITLE => {
                take_optional(&mut self.receiving_application_entity_title, tag)?
            }
            PRIVATE_INFORMATION_CREATOR_UID => {
                take_optional(&mut self.private_information_creator_uid, tag)?
            }
            PRIVATE_INFORMATION => take_optional(&mut self.private_information, tag)?,
            FILE_META_INFORMATION_GROUP_LENGTH
            | FILE_META_INFORMATION_VERSION
            | MEDIA_STORAGE_SOP_CLASS_UID
            | MEDIA_STORAGE_SOP_INSTANCE_UID
            | TRANSFER_SYNTAX_UID
            | IMPLEMENTATION_CLASS_UID => return Err(DatasetError::Mandatory(tag)),
            _ => return Err(DatasetError::NotFound(tag)),
        }
        self.update_information_group_length();
        Ok(())
    }

    fn find_and_set_string(&mut self, tag: Tag, value: &str, vr: VR) -> Result<(), DatasetError> {
        vr::check_value(vr, value).map_err(|source| DatasetError::InvalidValue { tag, source })?;
        let value = value.to_string();
        match tag {
            MEDIA_STORAGE_SOP_CLASS_UID => self.media_storage_sop_class_uid = value,
            MEDIA_STORAGE_SOP_INSTANCE_UID => self.media_storage_sop_instance_uid = value,
            TRANSFER_SYNTAX_UID => self.transfer_syntax = value,
            IMPLEMENTATION_CLASS_UID => self.implementation_class_uid = value,
            IMPLEMENTATION_VERSION_NAME => self.implementation_version_name = Some(value),
            SOURCE_APPLICATION_ENTITY_TITLE => self.source_application_entity_title = Some(value),
            SENDING_APPLICATION_ENTITY_TITLE => self.sending_application_entity_title = Some(value),
            RECEIVING_APPLICATION_ENTITY_TITLE => {
                self.receiving_application_entity_title = Some(value)
            }
            PRIVATE_INFORMATION_CREATOR_UID => self.private_information_creator_uid = Some(value),
            _ => return Err(DatasetError::Unsupported(tag)),
        }
        self.update_information_group_length();
        Ok(())
    }

    fn string_value(&self, tag: Tag) -> Option<String> {
        let value = match tag {
            MEDIA_STORAGE_SOP_CLASS_UID => Some(&self.media_storage_sop_class_uid),
            MEDIA_STORAGE_SOP_INSTANCE_UID => Some(&self.media_storage_sop_instance_uid),
            TRANSFER_SYNTAX_UID => Some(&self.transfer_syntax),
            IMPLEMENTATION_CLASS_UID => Some(&self.implementation_class_uid),
            IMPLEMENTATION_VERSION_NAME => self.implementation_version_name.as_ref(),
            SOURCE_APPLICATION_ENTITY_TITLE => self.source_application_entity_title.as_ref(),
            SENDING_APPLICATION_ENTITY_TITLE => self.sending_application_entity_title.as_ref(),
            RECEIVING_APPLICATION_ENTITY_TITLE => self.receiving_application_entity_title.as_ref(),
            PRIVATE_INFORMATION_CREATOR_UID => self.private_information_creator_uid.as_ref(),
            _ => None,
        };
        value.map(|value| trim_padding(value))
    }
}
