use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Event delivered by the secret rotation scheduler.
///
/// `Step` stays a raw string so that an unknown step surfaces as
/// [`Error::UnsupportedStep`] before anything is contacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RotationEvent {
    pub secret_id: String,
    pub client_request_token: String,
    pub step: String,
}

impl RotationEvent {
    pub fn step(&self) -> Result<RotationStep, Error> {
        self.step.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStep {
    CreateSecret,
    SetSecret,
    TestSecret,
    FinishSecret,
}

impl RotationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationStep::CreateSecret => "createSecret",
            RotationStep::SetSecret => "setSecret",
            RotationStep::TestSecret => "testSecret",
            RotationStep::FinishSecret => "finishSecret",
        }
    }
}

impl FromStr for RotationStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createSecret" => Ok(RotationStep::CreateSecret),
            "setSecret" => Ok(RotationStep::SetSecret),
            "testSecret" => Ok(RotationStep::TestSecret),
            "finishSecret" => Ok(RotationStep::FinishSecret),
            other => Err(Error::UnsupportedStep(other.to_string())),
        }
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage label attached to a secret version by the secret store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionStage {
    Current,
    Pending,
}

impl VersionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStage::Current => "AWSCURRENT",
            VersionStage::Pending => "AWSPENDING",
        }
    }
}

impl fmt::Display for VersionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which version of a secret to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Whatever version carries the stage.
    Stage(VersionStage),
    /// A specific version, which must also carry the stage.
    Version { id: String, stage: VersionStage },
}

/// Rotation-relevant part of a secret's description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretMetadata {
    pub rotation_enabled: bool,
    /// Version id to the stage labels it carries.
    pub versions: HashMap<String, Vec<String>>,
}

impl SecretMetadata {
    pub fn stages_of(&self, version_id: &str) -> Option<&[String]> {
        self.versions.get(version_id).map(Vec::as_slice)
    }

    pub fn has_stage(&self, version_id: &str, stage: VersionStage) -> bool {
        self.stages_of(version_id)
            .map(|stages| stages.iter().any(|s| s == stage.as_str()))
            .unwrap_or(false)
    }

    /// Version currently labelled AWSCURRENT, if any.
    pub fn current_version(&self) -> Option<&str> {
        self.versions
            .iter()
            .find(|(_, stages)| stages.iter().any(|s| s == VersionStage::Current.as_str()))
            .map(|(id, _)| id.as_str())
    }
}
