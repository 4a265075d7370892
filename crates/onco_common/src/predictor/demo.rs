//! Canned cases for offline demos

use super::Predictor;
use crate::config::PredictorKind;
use crate::error::PredictionError;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoCase {
    pub patient_name: &'static str,
    pub cancer_type: &'static str,
    pub risk_assessment: &'static str,
    pub sensitivity: f64,
    pub specificity: f64,
    pub diagnosis_detail: &'static str,
}

pub const DEMO_CASES: [DemoCase; 5] = [
    DemoCase {
        patient_name: "John Doe",
        cancer_type: "Oral Squamous Cell Carcinoma",
        risk_assessment: "High Risk",
        sensitivity: 0.98,
        specificity: 0.99,
        diagnosis_detail: "Analysis indicates atypical squamous cells with features highly suggestive of malignancy. \
            Irregular cell clusters and high nucleus-to-cytoplasm ratio observed.",
    },
    DemoCase {
        patient_name: "Jane Smith",
        cancer_type: "Cervical Intraepithelial Neoplasia (CIN 2)",
        risk_assessment: "Medium Risk",
        sensitivity: 0.99,
        specificity: 0.98,
        diagnosis_detail: "Moderate dysplasia detected. Abnormal cell growth is confined to the basal two-thirds of \
            the epithelium. Close monitoring and follow-up are recommended.",
    },
    DemoCase {
        patient_name: "Robert Johnson",
        cancer_type: "Benign Leukoplakia",
        risk_assessment: "Low Risk",
        sensitivity: 0.99,
        specificity: 0.99,
        diagnosis_detail: "Image analysis shows thickened epithelial tissue, consistent with benign \
            hyperkeratosis. No signs of malignant transformation are currently visible.",
    },
    DemoCase {
        patient_name: "Emily Williams",
        cancer_type: "Oral Melanoma",
        risk_assessment: "High Risk",
        sensitivity: 0.98,
        specificity: 0.98,
        diagnosis_detail: "Atypical melanocytes with irregular pigmentation and morphology are present. \
            The pattern is highly indicative of a malignant melanoma.",
    },
    DemoCase {
        patient_name: "Michael Brown",
        cancer_type: "HPV-Negative Cells",
        risk_assessment: "Low Risk",
        sensitivity: 0.99,
        specificity: 0.99,
        diagnosis_detail: "The cellular morphology appears normal and consistent with healthy epithelial tissue. \
            No dysplastic changes or viral cytopathic effects were detected.",
    },
];

/// Picks a canned case after a fixed delay. The same image always maps to the
/// same case.
pub struct DemoPredictor {
    delay: Duration,
}

impl DemoPredictor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn case_for(image_data_uri: &str) -> &'static DemoCase {
        let checksum = image_data_uri
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        &DEMO_CASES[checksum % DEMO_CASES.len()]
    }
}

#[async_trait]
impl Predictor for DemoPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::Demo
    }

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let case = Self::case_for(&request.image_data_uri);
        debug!("  Demo case selected: {}", case.patient_name);

        Ok(RawPrediction::Structured(json!({
            "riskAssessment": case.risk_assessment,
            "confidenceScore": case.sensitivity,
            "cancerType": case.cancer_type,
            "patientName": case.patient_name,
            "sensitivity": case.sensitivity,
            "specificity": case.specificity,
            "diagnosisDetail": case.diagnosis_detail,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{normalize, BinaryLabels};
    use crate::output_schema::OutputSchema;

    #[test]
    fn test_case_selection_is_stable() {
        let a = DemoPredictor::case_for("data:image/png;base64,AAAA");
        let b = DemoPredictor::case_for("data:image/png;base64,AAAA");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_demo_output_normalizes() {
        let predictor = DemoPredictor::new(Duration::ZERO);
        let raw = predictor
            .predict(&PredictRequest::new("data:image/jpeg;base64,/9j/"))
            .await
            .unwrap();

        let result = normalize(
            raw,
            &OutputSchema::risk_result(),
            &BinaryLabels::default(),
            Some("Oral Cancer"),
        );
        let case = DemoPredictor::case_for("data:image/jpeg;base64,/9j/");

        assert!(result.is_success());
        assert_eq!(result.risk_assessment, case.risk_assessment);
        assert_eq!(result.confidence_score, case.sensitivity);
        // The case carries its own diagnosis, which wins over the request
        assert_eq!(result.cancer_type.as_deref(), Some(case.cancer_type));
        assert_eq!(result.extra_str("patientName"), Some(case.patient_name));
        assert_eq!(result.extra_str("diagnosisDetail"), Some(case.diagnosis_detail));
    }

    #[test]
    fn test_case_details_describe_findings() {
        let john = &DEMO_CASES[0];
        assert_eq!(john.patient_name, "John Doe");
        assert!(john.diagnosis_detail.starts_with("Analysis indicates atypical squamous cells"));
        assert!(john
            .diagnosis_detail
            .ends_with("high nucleus-to-cytoplasm ratio observed."));

        let michael = &DEMO_CASES[4];
        assert!(michael
            .diagnosis_detail
            .contains("No dysplastic changes or viral cytopathic effects were detected."));

        for case in DEMO_CASES {
            // Line continuations collapse to single spaces
            assert!(!case.diagnosis_detail.contains("  "), "{}", case.patient_name);
        }
    }
}
