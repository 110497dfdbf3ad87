use dicom_core::VR;
use thiserror::Error;

pub(crate) const UID_MAX_LENGTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("value of {actual} characters exceeds the maximum of {max} for VR {vr}")]
    TooLong { vr: VR, max: usize, actual: usize },

    #[error("{0:?} is not a valid UID")]
    InvalidUid(String),

    #[error("VR {0} only holds a single value, got a multi-valued string")]
    MultipleValues(VR),

    #[error("VR {0} cannot be set from a string")]
    NotTextual(VR),
}

/// Maximum number of characters of a single value for textual VRs, or `None` when the VR
/// has no length limit that applies to string values.
pub(crate) fn max_length(vr: VR) -> Option<usize> {
    match vr {
        VR::AE => Some(16),
        VR::AS => Some(4),
        VR::CS => Some(16),
        VR::DA => Some(8),
        VR::DS => Some(16),
        VR::DT => Some(26),
        VR::IS => Some(12),
        VR::LO => Some(64),
        VR::LT => Some(10240),
        VR::PN => Some(64),
        VR::SH => Some(16),
        VR::ST => Some(1024),
        VR::TM => Some(14),
        VR::UI => Some(UID_MAX_LENGTH),
        _ => None,
    }
}

fn is_textual(vr: VR) -> bool {
    matches!(
        vr,
        VR::AE
            | VR::AS
            | VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::IS
            | VR::LO
            | VR::LT
            | VR::PN
            | VR::SH
            | VR::ST
            | VR::TM
            | VR::UC
            | VR::UI
            | VR::UR
            | VR::UT
    )
}

/// Checks whether a string is a syntactically valid DICOM UID.
///
/// A UID consists of at most 64 characters, made of numeric components separated by dots.
/// Components must not be empty and must not have leading zeros (a single `0` is fine).
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= UID_MAX_LENGTH
        && uid.split('.').all(|component| {
            !component.is_empty()
                && component.bytes().all(|b| b.is_ascii_digit())
                && (component == "0" || !component.starts_with('0'))
        })
}

/// Checks that a single string value can be encoded under the given VR.
pub fn check_value(vr: VR, value: &str) -> Result<(), ValueError> {
    if !is_textual(vr) {
        return Err(ValueError::NotTextual(vr));
    }

    if matches!(vr, VR::LO | VR::SH | VR::UI) && value.contains('\\') {
        return Err(ValueError::MultipleValues(vr));
    }

    if vr == VR::UI && !is_valid_uid(value) {
        return Err(ValueError::InvalidUid(value.into()));
    }

    if let Some(max) = max_length(vr) {
        // person names are limited per component group
        let actual = if vr == VR::PN {
            value.split('=').map(|group| group.chars().count()).max().unwrap_or(0)
        } else {
            value.chars().count()
        };
        if actual > max {
            return Err(ValueError::TooLong { vr, max, actual });
        }
    }

    Ok(())
}
