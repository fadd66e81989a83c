//! Command line arguments and turning payload files into submissions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ingress_core::{StageInput, ValidationRequest};
use uuid::Uuid;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "ingress",
    version,
    about = "Stage payloads, validate them and announce the valid ones"
)]
pub struct Args {
    /// Service the payloads are submitted to
    pub service: String,

    /// Payload category within the service
    pub category: String,

    /// Payload files to submit
    pub files: Vec<PathBuf>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "INGRESS_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Account the payloads are submitted for
    #[arg(short, long, env = "INGRESS_ACCOUNT", default_value = "0000001")]
    pub account: String,
}

/// Builds a stage input and validation request for each payload file.
#[derive(Debug, Clone)]
pub struct Intake {
    pub account: String,
    pub service: String,
    pub category: String,
}

impl Intake {
    pub fn from_args(args: &Args) -> Self {
        Self {
            account: args.account.clone(),
            service: args.service.clone(),
            category: args.category.clone(),
        }
    }

    pub async fn open(&self, path: &Path) -> Result<(StageInput, ValidationRequest)> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open payload {:?}", path))?;
        let size = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat payload {:?}", path))?
            .len();

        let request_id = Uuid::new_v4().simple().to_string();
        let input = StageInput::new(&request_id, &self.account, size, file);
        let request =
            ValidationRequest::new(request_id, &self.account, &self.service, &self.category)
                .with_principal(&self.account)
                .with_size(size);

        Ok((input, request))
    }
}
