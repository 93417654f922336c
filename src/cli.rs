use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config_file::ConversionConfig;
use crate::converter::{XmlToCli, XmlToCliBuilder};
use crate::types::SubsystemAddStrategy;

const BANNER_START: &str = "# ========= CLI COMMANDS ==========";
const BANNER_END: &str = "# ============== END ==============";

/// xml2cli - turn subsystem XML into management console commands
#[derive(Parser)]
#[command(name = "xml2cli")]
#[command(about = "Converts subsystem XML configuration into a management CLI script")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert subsystem XML into a CLI script
    Convert {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        shape: ShapeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the operations read from subsystem XML as JSON
    Operations {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Render a JSON list of operations as a CLI script
    Render {
        /// JSON file as printed by the `operations` command
        operations: PathBuf,
        #[command(flatten)]
        shape: ShapeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a conversion configuration file and the XML it points to
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

/// Where the subsystem XML comes from.
///
/// `--subsystem`, `--namespace` and the XML files may each be given several
/// times; the n-th of each describe the n-th subsystem.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Conversion configuration file (replaces the options below)
    #[arg(short, long, conflicts_with_all = ["subsystem", "namespace", "fragment", "xml"])]
    pub config: Option<PathBuf>,

    /// Subsystem name, e.g. keycloak (repeatable)
    #[arg(short, long, required_unless_present = "config")]
    pub subsystem: Vec<String>,

    /// Namespace of the subsystem element, e.g. urn:jboss:domain:keycloak:1.1 (repeatable)
    #[arg(short, long, required_unless_present = "config")]
    pub namespace: Vec<String>,

    /// The XML files are bodies of the subsystem element, not whole documents
    #[arg(long)]
    pub fragment: bool,

    /// Subsystem XML files, one per subsystem
    #[arg(required_unless_present = "config")]
    pub xml: Vec<PathBuf>,
}

/// How the script is shaped
#[derive(Args, Debug, Clone, Default)]
pub struct ShapeArgs {
    /// Subsystem add handling: add, skip or add-if-not-there
    #[arg(long)]
    pub strategy: Option<SubsystemAddStrategy>,

    /// Do not wrap the operations in batch / run-batch
    #[arg(long)]
    pub no_batch: bool,
}

/// Where the script goes
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Frame the script with CLI COMMANDS / END comment lines
    #[arg(long)]
    pub banner: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

impl InputArgs {
    /// One converter builder per subsystem, either from the config file or
    /// from the individual options.
    pub fn to_builders(&self) -> Result<Vec<XmlToCliBuilder>> {
        if let Some(path) = &self.config {
            let config = ConversionConfig::load_from_file(path)?;
            config.validate()?;
            return config.to_builders();
        }

        let count = self.subsystem.len();
        if self.namespace.len() != count || self.xml.len() != count {
            anyhow::bail!(
                "Each subsystem needs one --namespace and one XML file \
                 (got {} subsystem(s), {} namespace(s), {} file(s))",
                count,
                self.namespace.len(),
                self.xml.len()
            );
        }

        self.subsystem
            .iter()
            .zip(&self.namespace)
            .zip(&self.xml)
            .map(|((subsystem, namespace), xml)| {
                let builder = XmlToCli::builder()
                    .subsystem_name(subsystem)
                    .namespace(namespace)
                    .fragment(self.fragment)
                    .xml_file(xml)?;
                Ok(builder)
            })
            .collect()
    }
}

impl ShapeArgs {
    /// Apply the overrides to every builder and build the converters.
    pub fn build_all(&self, builders: Vec<XmlToCliBuilder>) -> Result<Vec<XmlToCli>> {
        let converters = builders
            .into_iter()
            .map(|builder| self.apply(builder).build())
            .collect::<crate::error::Result<Vec<_>>>()?;
        Ok(converters)
    }

    /// Apply command-line overrides on top of whatever the builder holds.
    pub fn apply(&self, mut builder: XmlToCliBuilder) -> XmlToCliBuilder {
        if let Some(strategy) = self.strategy {
            builder = builder.strategy(strategy);
        }
        if self.no_batch {
            builder = builder.batch(false);
        }
        builder
    }
}

impl OutputArgs {
    /// The final output text: the script, optionally framed, with a trailing
    /// newline when there is anything to print.
    pub fn decorate(&self, script: &str) -> String {
        let mut out = String::new();
        if self.banner {
            out.push_str(BANNER_START);
            out.push('\n');
        }
        if !script.is_empty() {
            out.push_str(script);
            out.push('\n');
        }
        if self.banner {
            out.push_str(BANNER_END);
            out.push('\n');
        }
        out
    }
}
