//! Conversion configuration files.
//!
//! A `ConversionConfig` records everything needed to repeat a conversion:
//! which subsystems, where their markup lives and which namespace it is
//! declared in, and how the script is shaped. All listed subsystems end up
//! in one script. Files are JSON; unset shaping options take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::converter::{XmlToCli, XmlToCliBuilder};
use crate::types::SubsystemAddStrategy;

/// One subsystem document to convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemSource {
    /// Subsystem name used in `/subsystem=<name>`
    pub subsystem: String,
    /// Namespace of the subsystem root element
    pub namespace: String,
    /// Markup file; relative paths resolve against the config file's directory
    pub xml_file: PathBuf,
    /// Markup is a bare fragment to be wrapped in `<subsystem>`
    #[serde(default)]
    pub fragment: bool,
}

impl SubsystemSource {
    pub fn new(
        subsystem: impl Into<String>,
        namespace: impl Into<String>,
        xml_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subsystem: subsystem.into(),
            namespace: namespace.into(),
            xml_file: xml_file.into(),
            fragment: false,
        }
    }

    fn validate(&self) -> Result<()> {
        let subsystem = self.subsystem.trim();
        if subsystem.is_empty() {
            anyhow::bail!("Subsystem name must be specified");
        }
        if subsystem.contains(char::is_whitespace) {
            anyhow::bail!("Subsystem name cannot contain whitespace: '{}'", subsystem);
        }

        if self.namespace.trim().is_empty() {
            anyhow::bail!("Namespace must be specified for subsystem '{}'", subsystem);
        }

        if self.xml_file.as_os_str().is_empty() {
            anyhow::bail!("XML file must be specified for subsystem '{}'", subsystem);
        }

        Ok(())
    }
}

/// Conversion settings that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Subsystems in script order
    pub subsystems: Vec<SubsystemSource>,
    #[serde(default)]
    pub strategy: SubsystemAddStrategy,
    #[serde(default = "default_batch")]
    pub batch: bool,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_batch() -> bool {
    true
}

impl ConversionConfig {
    /// Create a single-subsystem configuration with default shaping options
    pub fn new(
        subsystem: impl Into<String>,
        namespace: impl Into<String>,
        xml_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subsystems: vec![SubsystemSource::new(subsystem, namespace, xml_file)],
            strategy: SubsystemAddStrategy::default(),
            batch: true,
            base_dir: None,
        }
    }

    /// Append another subsystem to the script
    pub fn with_subsystem(mut self, source: SubsystemSource) -> Self {
        self.subsystems.push(source);
        self
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let mut config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.subsystems.is_empty() {
            anyhow::bail!("At least one subsystem must be specified");
        }

        let mut seen = HashSet::new();
        for source in &self.subsystems {
            source.validate()?;
            if !seen.insert(source.subsystem.trim()) {
                anyhow::bail!("Subsystem '{}' is listed more than once", source.subsystem.trim());
            }
        }

        Ok(())
    }

    /// Markup path of `source`, resolved against the directory the config came from
    pub fn xml_path(&self, source: &SubsystemSource) -> PathBuf {
        match &self.base_dir {
            Some(dir) if source.xml_file.is_relative() => dir.join(&source.xml_file),
            _ => source.xml_file.clone(),
        }
    }

    /// One builder per subsystem, in order, preloaded with the markup contents
    pub fn to_builders(&self) -> Result<Vec<XmlToCliBuilder>> {
        self.subsystems
            .iter()
            .map(|source| {
                XmlToCli::builder()
                    .subsystem_name(source.subsystem.trim())
                    .namespace(source.namespace.trim())
                    .fragment(source.fragment)
                    .strategy(self.strategy)
                    .batch(self.batch)
                    .xml_file(self.xml_path(source))
                    .with_context(|| {
                        format!("Failed to load markup for subsystem '{}'", source.subsystem)
                    })
            })
            .collect()
    }
}
