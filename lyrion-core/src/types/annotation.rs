//! Annotation (referent) records.

use serde::{Deserialize, Serialize};

use crate::constants::{ANNOTATION_URL_BASE, NO_EXPLANATION};

/// Result of one annotation lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Numeric annotation id
    pub annotation_id: String,
    /// Lyric fragment the annotation explains
    pub lyric: String,
    /// Explanation text; never empty on success
    pub explanation: String,
    /// Whether the lookup succeeded
    pub success: bool,
    /// Public annotation page
    pub url: String,
    /// Failure message for unsuccessful lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnnotationRecord {
    /// Creates a successful record.
    ///
    /// A missing or blank explanation becomes [`NO_EXPLANATION`] so that a
    /// fetched-but-empty annotation is distinguishable from a failed one.
    pub fn fetched(
        annotation_id: impl Into<String>,
        lyric: impl Into<String>,
        explanation: Option<String>,
    ) -> Self {
        let annotation_id = annotation_id.into();
        let explanation = explanation
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| NO_EXPLANATION.to_string());

        Self {
            url: Self::page_url(&annotation_id),
            annotation_id,
            lyric: lyric.into(),
            explanation,
            success: true,
            error: None,
        }
    }

    /// Creates a failed record for a batch entry.
    pub fn failed(annotation_id: impl Into<String>, error: impl Into<String>) -> Self {
        let annotation_id = annotation_id.into();
        let error = error.into();

        Self {
            url: Self::page_url(&annotation_id),
            annotation_id,
            lyric: String::new(),
            explanation: format!("Error fetching annotation: {}", error),
            success: false,
            error: Some(error),
        }
    }

    /// Public page URL for an annotation id.
    pub fn page_url(annotation_id: &str) -> String {
        format!("{}/{}", ANNOTATION_URL_BASE, annotation_id)
    }
}

/// Outcome of a batch annotation lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnotationBatch {
    /// One record per requested id, in request order
    pub annotations: Vec<AnnotationRecord>,
    /// Number of ids requested
    pub total_requested: usize,
    /// Records with `success == true`
    pub successful: usize,
    /// Records with `success == false`
    pub failed: usize,
    /// Wall time of the whole batch, in seconds
    pub processing_time: f64,
}

impl AnnotationBatch {
    /// Builds the batch summary from its records.
    pub fn new(annotations: Vec<AnnotationRecord>, processing_time: f64) -> Self {
        let successful = annotations.iter().filter(|a| a.success).count();
        let total_requested = annotations.len();

        Self {
            annotations,
            total_requested,
            successful,
            failed: total_requested - successful,
            processing_time,
        }
    }
}
