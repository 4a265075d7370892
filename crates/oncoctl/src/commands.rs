//! Command execution

use crate::cli::PredictArgs;
use crate::client::OncodClient;
use crate::display::{render_health, render_result};
use crate::errors::CtlError;
use crate::spinner::Spinner;
use onco_common::upload::ImageUpload;
use onco_common::PredictRequest;

/// Output preferences shared by every command
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

/// Validate the image locally, then build the request body
pub fn build_request(args: &PredictArgs) -> Result<PredictRequest, CtlError> {
    let upload =
        ImageUpload::from_path(&args.image).map_err(|e| CtlError::InvalidInput(e.to_string()))?;

    let mut request = PredictRequest::new(upload.to_data_uri());
    request.cancer_type = args.cancer_type.clone();
    request.image_type = args.image_type.clone();
    request.name = args.name.clone();
    request.age = args.age;
    request.gender = args.gender.clone();
    request.smoking_status = args.smoking_status.clone();
    Ok(request)
}

pub async fn predict(args: &PredictArgs, server: &str, output: Output) -> Result<(), CtlError> {
    let request = build_request(args)?;
    let client = OncodClient::new(server)?;

    let spinner = (!output.json).then(|| Spinner::new("Analyzing image"));
    let result = client.predict(&request).await;
    if let Some(spinner) = spinner {
        spinner.stop();
    }
    let result = result?;

    if output.json {
        let json = serde_json::to_string_pretty(&result).map_err(|e| CtlError::Other(e.into()))?;
        println!("{}", json);
    } else {
        print!("{}", render_result(&result, output.color));
    }

    match result.error {
        Some(message) => Err(CtlError::AnalysisFailed(message)),
        None => Ok(()),
    }
}

pub async fn health(server: &str, output: Output) -> Result<(), CtlError> {
    let client = OncodClient::new(server)?;
    let health = client.health().await?;

    if output.json {
        let json = serde_json::to_string_pretty(&health).map_err(|e| CtlError::Other(e.into()))?;
        println!("{}", json);
    } else {
        print!("{}", render_health(&health, output.color));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(image: PathBuf) -> PredictArgs {
        PredictArgs {
            image,
            cancer_type: Some("Cervical Cancer".to_string()),
            image_type: None,
            name: Some("Jane Smith".to_string()),
            age: Some(38),
            gender: None,
            smoking_status: None,
        }
    }

    #[test]
    fn test_build_request_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, bytes).unwrap();

        let request = build_request(&args(path)).unwrap();
        assert!(request.image_data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(request.cancer_type.as_deref(), Some("Cervical Cancer"));
        assert_eq!(request.age, Some(38));
    }

    #[test]
    fn test_build_request_rejects_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();

        let err = build_request(&args(path)).unwrap_err();
        assert_eq!(err.exit_code(), crate::errors::EXIT_INVALID_INPUT);
    }
}
