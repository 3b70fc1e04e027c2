//! Analysis pipeline: model invocation followed by normalization.

use std::sync::Arc;

use crate::error::AnalysisError;
use crate::normalize::normalize;
use crate::report::AnalysisReport;
use crate::vision::{ImageData, PatientContext, VisionModel};

/// Runs uploads through the vision model and normalizes the reply.
pub struct Analyzer {
    model: Arc<dyn VisionModel>,
}

impl Analyzer {
    /// Creates an analyzer over the given model.
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Analyzes an uploaded image with optional patient context.
    ///
    /// The reply is normalized into at least one structured report; an
    /// unstructured reply never fails. Only the model call itself can.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Upstream` if the model invocation fails.
    pub async fn analyze(
        &self,
        image: &ImageData,
        context: Option<&PatientContext>,
    ) -> Result<Vec<AnalysisReport>, AnalysisError> {
        let raw = self.model.describe_image(image, context).await?;

        tracing::debug!(reply_len = raw.len(), "normalizing model reply");
        let reports = normalize(&raw);

        tracing::info!(reports = reports.len(), "analysis completed");
        Ok(reports)
    }
}
