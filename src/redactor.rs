use crate::classifier::is_confidential;
use crate::config::{RedactionScope, TracingLevel};
use crate::dataset::{Dataset, DatasetError, ElementValue};
use dicom_core::Tag;
use log::{debug, info, warn};

/// A confidential element that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionFailure {
    pub tag: Tag,
    /// Diagnostic of the dataset, unchanged.
    pub message: String,
    /// The dataset requires the element, it can only be overwritten.
    pub mandatory: bool,
}

/// Outcome of one redaction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionReport {
    /// Number of elements removed.
    pub removed: usize,
    pub failures: Vec<RedactionFailure>,
}

impl RedactionReport {
    /// Whether every confidential element was removed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: RedactionReport) {
        self.removed += other.removed;
        self.failures.extend(other.failures);
    }
}

/// Removes confidential elements from a dataset.
///
/// Removal is best-effort: an element the dataset refuses to remove is recorded in the
/// [`RedactionReport`] and the pass carries on with the remaining ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Redactor {
    scope: RedactionScope,
    tracing_level: TracingLevel,
}

impl Redactor {
    pub fn new(scope: RedactionScope, tracing_level: TracingLevel) -> Self {
        Self {
            scope,
            tracing_level,
        }
    }

    pub fn redact(&self, dataset: &mut dyn Dataset) -> RedactionReport {
        let mut report = self.redact_top_level(dataset);

        if self.scope == RedactionScope::Nested {
            let sequences: Vec<Tag> = dataset
                .elements()
                .into_iter()
                .filter(|elem| matches!(elem.value, ElementValue::Sequence(_)))
                .map(|elem| elem.tag)
                .collect();

            for tag in sequences {
                dataset.visit_items_mut(tag, &mut |item| {
                    report.merge(self.redact_top_level(item));
                });
            }
        }

        if self.tracing_level.is_summary() {
            info!(
                "removed {} confidential elements, {} could not be removed",
                report.removed,
                report.failures.len()
            );
        }
        report
    }

    fn redact_top_level(&self, dataset: &mut dyn Dataset) -> RedactionReport {
        // collect first, the dataset is mutated below
        let confidential: Vec<Tag> = dataset
            .tag_keys()
            .into_iter()
            .filter(is_confidential)
            .collect();

        let mut report = RedactionReport::default();
        for tag in confidential {
            match dataset.delete_by_tag(tag) {
                Ok(()) => {
                    if self.tracing_level.is_detailed() {
                        debug!("removed {tag}");
                    }
                    report.removed += 1;
                }
                Err(err) => {
                    let mandatory = matches!(err, DatasetError::Mandatory(_));
                    if mandatory {
                        debug!("kept mandatory {tag}: {err}");
                    } else {
                        warn!("failed to remove {tag}: {err}");
                    }
                    report.failures.push(RedactionFailure {
                        tag,
                        message: err.to_string(),
                        mandatory,
                    });
                }
            }
        }
        report
    }
}

/// Removes the top-level confidential elements of `dataset`, without tracing.
pub fn redact(dataset: &mut dyn Dataset) -> RedactionReport {
    Redactor::default().redact(dataset)
}
