use std::process::{Command, Output};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::InspectError;
use crate::model::ImageDetails;

/// Source of image metadata, keyed by image reference (`repo:tag`).
pub trait ImageInspector {
    /// Size of the image in bytes.
    fn inspect_size(&self, image_ref: &str) -> Result<u64, InspectError>;

    /// Size plus the metadata shown in the HTML report.
    fn inspect_details(&self, image_ref: &str) -> Result<(u64, ImageDetails), InspectError>;
}

/// Inspector backed by a docker-compatible CLI (`docker`, `podman`, ...).
pub struct RuntimeCli {
    program: String,
}

impl RuntimeCli {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, args: &[&str]) -> Result<String, InspectError> {
        let output = Command::new(&self.program).args(args).output().map_err(|source| {
            InspectError::Launch { program: self.program.clone(), source }
        })?;
        if !output.status.success() {
            return Err(InspectError::Failed(self.failure_message(args, &output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn failure_message(&self, args: &[&str], output: &Output) -> String {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.trim().is_empty() {
            format!("'{} {}' exited with status {}", self.program, args.join(" "), output.status)
        } else {
            stderr.trim().to_string()
        }
    }
}

impl ImageInspector for RuntimeCli {
    fn inspect_size(&self, image_ref: &str) -> Result<u64, InspectError> {
        let stdout = self.run(&["image", "inspect", image_ref, "--format", "{{.Size}}"])?;
        parse_size_output(&stdout)
    }

    fn inspect_details(&self, image_ref: &str) -> Result<(u64, ImageDetails), InspectError> {
        let stdout = self.run(&["image", "inspect", image_ref])?;
        let record = parse_inspect_output(&stdout)?;
        Ok(record.into_parts())
    }
}

/// Parse the output of `image inspect --format {{.Size}}`.
pub fn parse_size_output(stdout: &str) -> Result<u64, InspectError> {
    let value = stdout.trim();
    if value.is_empty() {
        return Err(InspectError::Malformed("empty output".to_string()));
    }
    value.parse::<u64>().map_err(|err| InspectError::Malformed(format!("'{value}': {err}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectRecord {
    pub size: u64,
    pub created: DateTime<Utc>,
    pub architecture: String,
    pub os: String,
    #[serde(rename = "RootFS", default)]
    pub root_fs: RootFs,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RootFs {
    #[serde(default)]
    pub layers: Vec<String>,
}

impl InspectRecord {
    pub fn into_parts(self) -> (u64, ImageDetails) {
        let details = ImageDetails {
            created: self.created,
            architecture: self.architecture,
            os: self.os,
            layers: self.root_fs.layers.len(),
        };
        (self.size, details)
    }
}

/// Parse the JSON array printed by `image inspect`; only the first entry counts.
pub fn parse_inspect_output(stdout: &str) -> Result<InspectRecord, InspectError> {
    let records: Vec<InspectRecord> = serde_json::from_str(stdout)?;
    records
        .into_iter()
        .next()
        .ok_or_else(|| InspectError::Malformed("empty inspect result".to_string()))
}
