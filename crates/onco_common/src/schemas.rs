//! JSON schemas for the OncoDetect API

use serde::{Deserialize, Serialize};

/// Body of `POST /api/predict`, also forwarded to HTTP upstreams.
///
/// Only `image_data_uri` is mandatory; the clinical fields vary by which
/// predictor is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub image_data_uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancer_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking_status: Option<String>,
}

impl PredictRequest {
    pub fn new(image_data_uri: impl Into<String>) -> Self {
        Self {
            image_data_uri: image_data_uri.into(),
            ..Default::default()
        }
    }

    /// True when any demographic/clinical field was supplied
    pub fn has_clinical_context(&self) -> bool {
        self.name.is_some()
            || self.age.is_some()
            || self.gender.is_some()
            || self.smoking_status.is_some()
    }
}

/// Response of `GET /v1/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub predictor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_fields() {
        let mut req = PredictRequest::new("data:image/png;base64,AAAA");
        req.image_type = Some("Radiograph".to_string());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"imageDataUri": "data:image/png;base64,AAAA", "imageType": "Radiograph"})
        );
        assert!(!req.has_clinical_context());
    }

    #[test]
    fn test_request_parses_clinical_fields() {
        let req: PredictRequest = serde_json::from_value(json!({
            "imageDataUri": "data:image/jpeg;base64,/9j/",
            "age": 54,
            "gender": "Female",
            "smokingStatus": "Former"
        }))
        .unwrap();
        assert_eq!(req.age, Some(54));
        assert_eq!(req.smoking_status.as_deref(), Some("Former"));
        assert!(req.has_clinical_context());
    }
}
