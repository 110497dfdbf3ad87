use crate::config::{Config, TracingLevel};
use crate::dataset::DicomRecord;
use crate::generator::IdentifierGenerator;
use crate::identifiers::{Identifiers, ResolvedIdentifiers};
use crate::redactor::{RedactionReport, Redactor};
use crate::substitutor::Substitutor;
use log::{debug, error, info};
use std::fmt;
use thiserror::Error;

/// The steps of a de-identification run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DatasetRedaction,
    HeaderRedaction,
    Substitution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::DatasetRedaction => "dataset redaction",
            Phase::HeaderRedaction => "header redaction",
            Phase::Substitution => "identifier substitution",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    DatasetRedacted,
    HeaderRedacted,
    Substituted,
    Failed,
    Done,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{phase} failed: {message}")]
pub struct PipelineError {
    pub phase: Phase,
    /// Diagnostic of the failing step, unchanged.
    pub message: String,
}

impl PipelineError {
    fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub dataset: RedactionReport,
    pub header: RedactionReport,
    pub identifiers: ResolvedIdentifiers,
    pub state: State,
}

/// Runs the de-identification steps on one record: redact the main dataset, redact the
/// header, then write the replacement identifiers into the main dataset.
///
/// A missing dataset or header stops the run in the corresponding phase, before anything
/// else is attempted. Elements that cannot be removed do not stop the run, they are listed in
/// the [`Report`]. A failing assignment stops the run; changes made by earlier phases and
/// earlier assignments are kept.
///
/// The header pass runs after every successful dataset pass. Returning right after the
/// dataset pass, and only falling back to the header when the dataset pass fails, would leave
/// the header of every successfully processed record untouched.
///
/// # Example
///
/// ```
/// use dicom_deidentification::config::Config;
/// use dicom_deidentification::identifiers::Identifiers;
/// use dicom_deidentification::pipeline::{Pipeline, State};
/// use dicom_deidentification::tags;
/// use dicom_core::{value::Value, VR};
/// use dicom_object::mem::InMemElement;
/// use dicom_object::meta::FileMetaTableBuilder;
/// use dicom_object::FileDicomObject;
///
/// let meta = FileMetaTableBuilder::new()
///     .media_storage_sop_class_uid("1.2.3")
///     .media_storage_sop_instance_uid("2.3.4")
///     .transfer_syntax("1.2.840.10008.1.2.1")
///     .build()
///     .unwrap();
/// let mut obj = FileDicomObject::new_empty_with_meta(meta);
/// obj.put(InMemElement::new(tags::PATIENT_NAME, VR::PN, Value::from("Doe^Jane")));
///
/// let report = Pipeline::new(&Config::default())
///     .run(&mut obj, &Identifiers::new())
///     .unwrap();
/// assert_eq!(report.state, State::Done);
/// assert!(obj.element(tags::PATIENT_NAME).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    redactor: Redactor,
    substitutor: Substitutor,
    generator: IdentifierGenerator,
    tracing_level: TracingLevel,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        let tracing_level = config.get_tracing_level();
        Self {
            redactor: Redactor::new(config.get_redaction_scope(), tracing_level),
            substitutor: Substitutor::new(tracing_level),
            generator: IdentifierGenerator::new(config.get_uid_root().clone()),
            tracing_level,
        }
    }

    pub fn generator(&self) -> &IdentifierGenerator {
        &self.generator
    }

    /// Runs all phases, generating every identifier missing from `identifiers`.
    pub fn run(
        &self,
        record: &mut dyn DicomRecord,
        identifiers: &Identifiers,
    ) -> Result<Report, PipelineError> {
        self.run_with(record, identifiers.resolve(&self.generator))
    }

    /// Runs all phases with identifiers that are already resolved.
    pub fn run_with(
        &self,
        record: &mut dyn DicomRecord,
        identifiers: ResolvedIdentifiers,
    ) -> Result<Report, PipelineError> {
        let mut state = State::Start;
        self.trace(state);

        let dataset_report = match record.dataset_mut() {
            Some(dataset) => self.redactor.redact(dataset),
            None => return Err(self.fail(Phase::DatasetRedaction, "no dataset to redact")),
        };
        state = State::DatasetRedacted;
        self.trace(state);

        let header_report = match record.header_mut() {
            Some(header) => self.redactor.redact(header),
            None => return Err(self.fail(Phase::HeaderRedaction, "no header to redact")),
        };
        state = State::HeaderRedacted;
        self.trace(state);

        let dataset = record
            .dataset_mut()
            .ok_or_else(|| self.fail(Phase::Substitution, "no dataset to substitute into"))?;
        self.substitutor
            .substitute(dataset, &identifiers.assignments())
            .map_err(|err| self.fail(Phase::Substitution, err.to_string()))?;
        state = State::Substituted;
        self.trace(state);

        state = State::Done;
        if self.tracing_level.is_summary() {
            info!(
                "de-identified record: {} dataset and {} header elements removed",
                dataset_report.removed, header_report.removed
            );
        }

        Ok(Report {
            dataset: dataset_report,
            header: header_report,
            identifiers,
            state,
        })
    }

    fn trace(&self, state: State) {
        if self.tracing_level.is_detailed() {
            debug!("state {state:?}");
        }
    }

    fn fail(&self, phase: Phase, message: impl Into<String>) -> PipelineError {
        let err = PipelineError::new(phase, message);
        error!("{err}");
        self.trace(State::Failed);
        err
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
