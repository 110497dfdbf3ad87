use crate::catalog;
use dicom_core::Tag;

const OVERLAY_DATA_ELEMENT: u16 = 0x3000;
const OVERLAY_COMMENTS_ELEMENT: u16 = 0x4000;

pub(crate) fn is_private_tag(tag: &Tag) -> bool {
    // tags with odd group numbers are private tags
    tag.group() % 2 != 0
}

/// Curve data repeating groups `0x5000-0x50FF`.
pub(crate) fn is_curve_tag(tag: &Tag) -> bool {
    (tag.group() & 0xFF00) == 0x5000
}

/// Overlay repeating groups `0x6000-0x60FF`.
pub(crate) fn is_overlay_tag(tag: &Tag) -> bool {
    (tag.group() & 0xFF00) == 0x6000
}

pub(crate) fn is_overlay_comments_tag(tag: &Tag) -> bool {
    is_overlay_tag(tag) && tag.element() == OVERLAY_COMMENTS_ELEMENT
}

pub(crate) fn is_overlay_data_tag(tag: &Tag) -> bool {
    is_overlay_tag(tag) && tag.element() == OVERLAY_DATA_ELEMENT
}

/// Returns whether a DICOM tag holds confidential data that must not leave the controlled
/// environment.
///
/// The checks are done in this order, the first match wins:
/// 1. private tags (odd group number)
/// 2. curve data (groups `0x5000-0x50FF`)
/// 3. overlay comments (element `0x4000` in groups `0x6000-0x60FF`)
/// 4. overlay data (element `0x3000` in groups `0x6000-0x60FF`)
/// 5. membership of the confidential tag [`catalog`]
///
/// Curves and overlays are repeating groups, one group per plane, so they are matched by range
/// instead of being listed one by one in the catalog.
///
/// # Example
///
/// ```
/// use dicom_deidentification::classifier::is_confidential;
/// use dicom_deidentification::{tags, Tag};
///
/// assert!(is_confidential(&tags::PATIENT_NAME));
/// assert!(is_confidential(&Tag(0x0009, 0x0010))); // private
/// assert!(is_confidential(&Tag(0x6002, 0x4000))); // overlay comments, second plane
/// assert!(!is_confidential(&tags::MODALITY));
/// ```
pub fn is_confidential(tag: &Tag) -> bool {
    is_private_tag(tag)
        || is_curve_tag(tag)
        || is_overlay_comments_tag(tag)
        || is_overlay_data_tag(tag)
        || catalog::contains(tag)
}
