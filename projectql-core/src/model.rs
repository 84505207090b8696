use crate::{ProjectqlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub uuid: Uuid,
    pub name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Tags are identified by name alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classifier {
    Application,
    Framework,
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    File,
    Platform,
    DeviceDriver,
    MachineLearningModel,
    Data,
}

impl Classifier {
    pub const ALL: [Classifier; 12] = [
        Classifier::Application,
        Classifier::Framework,
        Classifier::Library,
        Classifier::Container,
        Classifier::OperatingSystem,
        Classifier::Device,
        Classifier::Firmware,
        Classifier::File,
        Classifier::Platform,
        Classifier::DeviceDriver,
        Classifier::MachineLearningModel,
        Classifier::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classifier::Application => "APPLICATION",
            Classifier::Framework => "FRAMEWORK",
            Classifier::Library => "LIBRARY",
            Classifier::Container => "CONTAINER",
            Classifier::OperatingSystem => "OPERATING_SYSTEM",
            Classifier::Device => "DEVICE",
            Classifier::Firmware => "FIRMWARE",
            Classifier::File => "FILE",
            Classifier::Platform => "PLATFORM",
            Classifier::DeviceDriver => "DEVICE_DRIVER",
            Classifier::MachineLearningModel => "MACHINE_LEARNING_MODEL",
            Classifier::Data => "DATA",
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classifier {
    type Err = ProjectqlError;

    fn from_str(s: &str) -> Result<Self> {
        Classifier::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProjectqlError::InvalidClassifier(s.to_string()))
    }
}
