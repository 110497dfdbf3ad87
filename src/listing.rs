use crate::classifier::is_confidential;
use crate::dataset::{Dataset, ElementValue};
use dicom_core::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use std::fmt;

const UNKNOWN_ALIAS: &str = "Unknown";

/// One line of a tag listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagListing {
    pub tag: Tag,
    pub alias: &'static str,
    /// Textual value, `None` for sequences and binary or numeric values.
    pub value: Option<String>,
    pub confidential: bool,
}

impl fmt::Display for TagListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:04x},{:04x}) {}: ",
            self.tag.group(),
            self.tag.element(),
            self.alias
        )?;
        match &self.value {
            Some(value) => write!(f, "{value}")?,
            None => write!(f, "Not a string")?,
        }
        if self.confidential {
            write!(f, " [confidential]")?;
        }
        Ok(())
    }
}

pub(crate) fn get_tag_alias(tag: &Tag) -> Option<&'static str> {
    StandardDataDictionary.by_tag(*tag).map(|entry| entry.alias)
}

/// Lists the top-level elements of a dataset, marking the ones that redaction would remove.
pub fn list_tags(dataset: &dyn Dataset) -> Vec<TagListing> {
    dataset
        .elements()
        .into_iter()
        .map(|elem| TagListing {
            tag: elem.tag,
            alias: get_tag_alias(&elem.tag).unwrap_or(UNKNOWN_ALIAS),
            value: match elem.value {
                ElementValue::Text(value) => Some(value),
                ElementValue::Sequence(_) | ElementValue::Opaque => None,
            },
            confidential: is_confidential(&elem.tag),
        })
        .collect()
}
