//! CLI - Command-line argument parsing

use crate::client::DEFAULT_SERVER;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use onco_common::upload::{CANCER_TYPES, IMAGE_TYPES};
use std::path::PathBuf;

/// OncoDetect CLI
#[derive(Parser, Debug)]
#[command(name = "oncoctl")]
#[command(about = "OncoDetect - cancer risk assessment from medical images", long_about = None)]
#[command(version = env!("ONCO_VERSION"))]
pub struct Cli {
    /// oncod base URL
    #[arg(long, global = true, env = "ONCOCTL_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Print raw JSON instead of the formatted view
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess one image
    Predict(PredictArgs),

    /// Show daemon health
    Health,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JPEG or PNG image, at most 5MB
    pub image: PathBuf,

    #[arg(long, value_parser = PossibleValuesParser::new(CANCER_TYPES.iter().copied()))]
    pub cancer_type: Option<String>,

    #[arg(long, value_parser = PossibleValuesParser::new(IMAGE_TYPES.iter().copied()))]
    pub image_type: Option<String>,

    /// Patient name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub smoking_status: Option<String>,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Predict(_) => "predict",
            Commands::Health => "health",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "oncoctl",
            "predict",
            "scan.png",
            "--cancer-type",
            "Oral Cancer",
            "--image-type",
            "Histopathology",
            "--age",
            "47",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.image, PathBuf::from("scan.png"));
                assert_eq!(args.cancer_type.as_deref(), Some("Oral Cancer"));
                assert_eq!(args.image_type.as_deref(), Some("Histopathology"));
                assert_eq!(args.age, Some(47));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_cancer_type_rejected() {
        let err = Cli::try_parse_from(["oncoctl", "predict", "scan.png", "--cancer-type", "Lung"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_server_flag() {
        let cli =
            Cli::try_parse_from(["oncoctl", "health", "--server", "http://10.0.0.2:9002"]).unwrap();
        assert_eq!(cli.server, "http://10.0.0.2:9002");
        assert_eq!(cli.command.name(), "health");
    }
}
