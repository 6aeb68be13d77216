//! One diagnosis request, end to end.
//!
//! predict -> resolve -> render QR and PDF. Recoverable problems after a
//! successful prediction degrade the result instead of failing it.

use tracing::{debug, warn};

use crate::domain::{Diagnosis, LeafImage, TreatmentKind};
use crate::error::{Error, Result};
use crate::inference::{predict, Interpreter};
use crate::recommend::{RecommendationTable, NOT_FOUND_MESSAGE};
use crate::report::{render_qr_with, render_report, QrOptions};

/// Per-request rendering options.
#[derive(Debug, Clone, Copy)]
pub struct DiagnoseOptions {
    /// Render the QR code and PDF report when a recommendation exists.
    pub render_artifacts: bool,
    /// QR code options.
    pub qr: QrOptions,
}

impl Default for DiagnoseOptions {
    fn default() -> Self {
        Self {
            render_artifacts: true,
            qr: QrOptions::default(),
        }
    }
}

/// Diagnoses one leaf image.
///
/// # Errors
///
/// Returns `Error::Inference` if the prediction fails. Missing
/// recommendations and invalid product URLs are reported through
/// `Diagnosis::notices` instead.
pub fn diagnose<S, I>(
    leaf: &LeafImage,
    treatment: TreatmentKind,
    class_names: &[S],
    handle: &I,
    table: &RecommendationTable,
    options: &DiagnoseOptions,
) -> Result<Diagnosis>
where
    S: AsRef<str>,
    I: Interpreter + ?Sized,
{
    let prediction = predict(&leaf.image, class_names, handle)?;
    debug!(
        "{}: {} ({:.2})",
        leaf.path, prediction.label, prediction.confidence
    );

    let mut diagnosis = Diagnosis {
        prediction,
        treatment,
        recommendation: None,
        qr_png: None,
        report_pdf: None,
        notices: Vec::new(),
    };

    let recommendation = match table.resolve(&diagnosis.prediction.label, treatment) {
        Ok(rec) => rec.clone(),
        Err(e @ Error::NotFound { .. }) => {
            debug!("{}: {e}", leaf.path);
            diagnosis.notices.push(NOT_FOUND_MESSAGE.to_string());
            return Ok(diagnosis);
        }
        Err(e) => return Err(e),
    };

    if options.render_artifacts {
        let rendered = render_qr_with(&recommendation.url, &options.qr).and_then(|qr| {
            let pdf = render_report(
                &diagnosis.prediction.label,
                treatment,
                &recommendation.text,
                &recommendation.url,
            )?;
            Ok((qr, pdf))
        });
        match rendered {
            Ok((qr, pdf)) => {
                diagnosis.qr_png = Some(qr);
                diagnosis.report_pdf = Some(pdf);
            }
            Err(e @ (Error::InvalidUrl { .. } | Error::Report(_))) => {
                warn!("{}: skipping QR code and report: {e}", leaf.path);
                diagnosis
                    .notices
                    .push(format!("QR code and report skipped: {e}"));
            }
            Err(e) => return Err(e),
        }
    }

    diagnosis.recommendation = Some(recommendation);
    Ok(diagnosis)
}
