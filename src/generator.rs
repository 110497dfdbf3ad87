use crate::config::UidRoot;
use crate::tags;
use chrono::Utc;
use dicom_core::{Tag, VR};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

const PATIENT_ID_LENGTH: usize = 20;
const NONCE_UPPER_BOUND: u32 = 100_000;

static LAST_SEQUENCE: AtomicU64 = AtomicU64::new(0);
static PROCESS_NONCE: OnceLock<u32> = OnceLock::new();

/// The four identifiers that link instances to their study, series and patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    StudyInstanceUid,
    SeriesInstanceUid,
    SopInstanceUid,
    PatientId,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid identifier kind")]
pub struct IdentifierKindError(String);

impl IdentifierKind {
    /// All kinds, in the order their values are assigned.
    pub const ALL: [IdentifierKind; 4] = [
        IdentifierKind::StudyInstanceUid,
        IdentifierKind::SeriesInstanceUid,
        IdentifierKind::SopInstanceUid,
        IdentifierKind::PatientId,
    ];

    /// The tag of the attribute holding this identifier.
    pub fn tag(&self) -> Tag {
        match self {
            IdentifierKind::StudyInstanceUid => tags::STUDY_INSTANCE_UID,
            IdentifierKind::SeriesInstanceUid => tags::SERIES_INSTANCE_UID,
            IdentifierKind::SopInstanceUid => tags::SOP_INSTANCE_UID,
            IdentifierKind::PatientId => tags::PATIENT_ID,
        }
    }

    /// The VR new values are encoded with.
    pub fn vr(&self) -> VR {
        match self {
            IdentifierKind::PatientId => VR::LO,
            _ => VR::UI,
        }
    }

    // arc appended to the UID root, one per kind of UID
    fn uid_arc(&self) -> Option<&'static str> {
        match self {
            IdentifierKind::StudyInstanceUid => Some("1.2"),
            IdentifierKind::SeriesInstanceUid => Some("1.3"),
            IdentifierKind::SopInstanceUid => Some("1.4"),
            IdentifierKind::PatientId => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierKind::StudyInstanceUid => "study",
            IdentifierKind::SeriesInstanceUid => "series",
            IdentifierKind::SopInstanceUid => "sop",
            IdentifierKind::PatientId => "patient",
        };
        write!(f, "{name}")
    }
}

impl FromStr for IdentifierKind {
    type Err = IdentifierKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "study" | "study_instance_uid" => Ok(IdentifierKind::StudyInstanceUid),
            "series" | "series_instance_uid" => Ok(IdentifierKind::SeriesInstanceUid),
            "sop" | "sop_instance_uid" => Ok(IdentifierKind::SopInstanceUid),
            "patient" | "patient_id" => Ok(IdentifierKind::PatientId),
            _ => Err(IdentifierKindError(s.into())),
        }
    }
}

/// Numeric identifiers used by embedding hosts: 0 study, 1 series, 2 SOP instance, 3 patient.
impl TryFrom<u8> for IdentifierKind {
    type Error = IdentifierKindError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        IdentifierKind::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| IdentifierKindError(value.to_string()))
    }
}

/// Generates fresh identifiers.
///
/// UIDs are built as `<uid root>.<kind arc>.<sequence>.<nonce>`, where the sequence is derived
/// from the current time and strictly increases within the process, and the nonce is a random
/// number picked once per process. Two UIDs issued by the same process are never equal, and
/// with a UID root of at most 32 characters the result always fits in the 64 characters a UID
/// may have.
///
/// Patient IDs are 20 random alphanumeric characters. They are unique enough for operational
/// use but are not suitable as unguessable tokens.
///
/// Nothing is persisted: uniqueness across restarts relies on the clock and the nonce only.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierGenerator {
    uid_root: UidRoot,
}

impl IdentifierGenerator {
    pub fn new(uid_root: UidRoot) -> Self {
        Self { uid_root }
    }

    pub fn generate(&self, kind: IdentifierKind) -> String {
        match kind.uid_arc() {
            Some(arc) => format!(
                "{}{}.{}.{}",
                self.uid_root.as_prefix(),
                arc,
                next_sequence(),
                process_nonce()
            ),
            None => random_patient_id(),
        }
    }
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new(UidRoot::default_root())
    }
}

/// Generates a fresh identifier of the given kind using the default UID root.
pub fn generate(kind: IdentifierKind) -> String {
    IdentifierGenerator::default().generate(kind)
}

fn next_sequence() -> u64 {
    let micros = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
    let now = micros.saturating_mul(1000);
    let previous = LAST_SEQUENCE
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}

fn process_nonce() -> u32 {
    *PROCESS_NONCE.get_or_init(|| rand::thread_rng().gen_range(1..NONCE_UPPER_BOUND))
}

fn random_patient_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PATIENT_ID_LENGTH)
        .map(char::from)
        .collect()
}
