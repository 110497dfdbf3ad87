//! De-identification of DICOM records.
//!
//! Confidential elements are removed from the main dataset and from the file meta header,
//! then the Study, Series and SOP Instance UIDs and the Patient ID are replaced, either with
//! values supplied by the caller or with freshly generated ones.
//!
//! # Example
//!
//! ```no_run
//! use dicom_deidentification::Deidentifier;
//! use std::fs::File;
//!
//! let deidentifier = Deidentifier::default();
//! let result = deidentifier.deidentify(File::open("input.dcm")?)?;
//! result.write(File::create("output.dcm")?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod identifiers;
pub mod listing;
pub mod mapping;
pub mod pipeline;
pub mod redactor;
pub mod substitutor;
pub mod vr;

#[cfg(test)]
mod test_utils;

pub use dicom_core::Tag;
pub use dicom_dictionary_std::tags;

use crate::config::Config;
use crate::identifiers::Identifiers;
use crate::mapping::IdentifierMapping;
use crate::pipeline::{Pipeline, PipelineError, Report};
use dicom_object::file::ReadPreamble;
use dicom_object::{DefaultDicomObject, OpenFileOptions};
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeidentificationError {
    #[error("failed to read DICOM data: {0}")]
    ReadError(String),

    #[error("failed to write DICOM data: {0}")]
    WriteError(String),

    #[error("{0}")]
    PipelineError(#[from] PipelineError),
}

pub type Result<T, E = DeidentificationError> = std::result::Result<T, E>;

/// A de-identified record, together with the record it was made from.
#[derive(Debug, Clone)]
pub struct DeidentificationResult {
    pub original: DefaultDicomObject,
    pub deidentified: DefaultDicomObject,
    pub report: Report,
}

impl DeidentificationResult {
    /// Writes the de-identified record, including preamble and file meta group.
    pub fn write<W: Write>(&self, to: W) -> Result<()> {
        self.deidentified
            .write_all(to)
            .map_err(|e| DeidentificationError::WriteError(e.to_string()))
    }
}

/// De-identifies DICOM files read from any [`Read`] source.
///
/// Besides running the [`Pipeline`], the media storage SOP instance UID of the file meta
/// header is updated to the new SOP Instance UID, so both keep referring to the same
/// instance.
#[derive(Debug)]
pub struct Deidentifier {
    pipeline: Pipeline,
    identifiers: Identifiers,
    mapping: Option<IdentifierMapping>,
}

impl Deidentifier {
    pub fn new(config: &Config) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            identifiers: Identifiers::new(),
            mapping: None,
        }
    }

    /// Uses the given replacement identifiers instead of generating them.
    pub fn with_identifiers(mut self, identifiers: Identifiers) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// Keeps replacement identifiers consistent across all records processed by this
    /// [`Deidentifier`]: records sharing an original identifier get the same replacement.
    pub fn with_mapping(mut self) -> Self {
        self.mapping = Some(IdentifierMapping::new());
        self
    }

    pub fn mapping(&self) -> Option<&IdentifierMapping> {
        self.mapping.as_ref()
    }

    pub fn deidentify<R: Read>(&self, src: R) -> Result<DeidentificationResult> {
        let obj = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Always)
            .from_reader(src)
            .map_err(|e| DeidentificationError::ReadError(e.to_string()))?;
        self.deidentify_object(obj)
    }

    pub fn deidentify_object(&self, original: DefaultDicomObject) -> Result<DeidentificationResult> {
        let mut obj = original.clone();

        let generator = self.pipeline.generator();
        let identifiers = match &self.mapping {
            Some(mapping) => mapping.resolve(&*obj, &self.identifiers, generator),
            None => self.identifiers.resolve(generator),
        };

        let report = self.pipeline.run_with(&mut obj, identifiers)?;

        let meta = obj.meta_mut();
        meta.media_storage_sop_instance_uid = report.identifiers.sop_instance_uid.clone();
        meta.update_information_group_length();

        Ok(DeidentificationResult {
            original,
            deidentified: obj,
            report,
        })
    }
}

impl Default for Deidentifier {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
