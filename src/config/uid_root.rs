use crate::vr::is_valid_uid;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

static UID_ROOT_REGEX: OnceLock<Regex> = OnceLock::new();
const UID_ROOT_MAX_LENGTH: usize = 32;
pub const UID_ROOT_DEFAULT_VALUE: &str = "9999";

/// The [`UidRoot`] struct represents a DICOM UID root that is used as prefix for the UIDs
/// generated during de-identification.
///
/// The [`UidRoot`] must follow DICOM UID format rules:
/// - Start with a digit 1-9
/// - Contain only numbers and dots
/// - Have no empty components and no components with leading zeros
///
/// It also must not have more than 32 characters, which leaves enough room for the generated
/// part of a UID.
///
/// # Example
///
/// ```
/// use dicom_deidentification::config::UidRoot;
///
/// // Create a valid UID root
/// let uid_root = "1.2.840.123".parse::<UidRoot>().unwrap();
/// assert_eq!(uid_root.as_prefix(), "1.2.840.123.");
///
/// // Invalid UID root (not starting with 1-9)
/// let invalid = "0.1.2".parse::<UidRoot>();
/// assert!(invalid.is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct UidRoot(String);

#[derive(Error, Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[error("{0} is not a valid UID root")]
pub struct UidRootError(pub String);

impl UidRoot {
    pub fn new(uid_root: &str) -> Result<Self, UidRootError> {
        let regex = UID_ROOT_REGEX.get_or_init(|| {
            Regex::new(&format!(
                r"^([1-9][0-9.]{{0,{}}})?$",
                UID_ROOT_MAX_LENGTH - 1
            ))
            .expect("UID root pattern is a valid regex")
        });

        let components = uid_root.strip_suffix('.').unwrap_or(uid_root);
        if !regex.is_match(uid_root) || (!uid_root.is_empty() && !is_valid_uid(components)) {
            return Err(UidRootError(format!(
                "{uid_root:?}: UID root must be empty or start with 1-9, contain only numbers and dots, and be no longer than {UID_ROOT_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(uid_root.into()))
    }

    /// The UID root used when none is configured (`"9999"`).
    pub fn default_root() -> Self {
        Self(UID_ROOT_DEFAULT_VALUE.into())
    }

    /// Returns a string representation of the [`UidRoot`] suitable for use as a UID prefix.
    ///
    /// If the [`UidRoot`] is not empty and does not end with a dot, a dot is appended.
    pub fn as_prefix(&self) -> String {
        if !self.0.is_empty() && !self.0.ends_with('.') {
            format!("{}.", self.0)
        } else {
            self.0.clone()
        }
    }
}

impl Default for UidRoot {
    /// Returns an empty [`UidRoot`], so generated UIDs start with the kind arc directly.
    fn default() -> Self {
        Self("".into())
    }
}

impl FromStr for UidRoot {
    type Err = UidRootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UidRoot::new(s)
    }
}

impl TryFrom<String> for UidRoot {
    type Error = UidRootError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UidRoot::new(&value)
    }
}

impl From<UidRoot> for String {
    fn from(uid_root: UidRoot) -> Self {
        uid_root.0
    }
}

impl AsRef<str> for UidRoot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
