//! Command-line interface definitions
//!
//! Subcommands map one-to-one onto the attribute accessor operations, plus a
//! `tag` group driving a tag backend and a `convert` group moving tags
//! between extended attributes and tag files.

use crate::backends::{FileTagBackend, XattrTagBackend, DEFAULT_TAG_KEY};
use crate::traits::TagBackend;
use crate::writers::FileFormat;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xattr_bridge::DEFAULT_DELIMITER;

/// Read and write delimited lists stored in extended attributes
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

/// Accessor and tag operations
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the value of an attribute
    Get(AttributeTarget),

    /// Create or replace an attribute
    Set {
        #[command(flatten)]
        target: AttributeTarget,

        /// New value
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Append a value to a delimited attribute
    Append {
        #[command(flatten)]
        target: AttributeTarget,

        /// Value to append
        #[arg(value_name = "VALUE")]
        value: String,

        #[command(flatten)]
        delimiter: DelimiterConfig,
    },

    /// Print each entry of a delimited attribute on its own line
    List {
        #[command(flatten)]
        target: AttributeTarget,

        #[command(flatten)]
        delimiter: DelimiterConfig,
    },

    /// Delete an attribute
    Remove(AttributeTarget),

    /// Print the names of all attributes on a file
    Keys {
        /// File to inspect
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Manage tags stored in an extended attribute or a tag file
    #[command(subcommand)]
    Tag(TagCommand),

    /// Move tags between extended attributes and tag files
    #[command(subcommand)]
    Convert(ConvertCommand),
}

/// Tag operations
#[derive(Subcommand, Debug, Clone)]
pub enum TagCommand {
    /// Add a tag to a file
    Add {
        /// Tagged file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Tag to add
        #[arg(value_name = "TAG")]
        tag: String,

        #[command(flatten)]
        store: TagStoreConfig,
    },

    /// Remove a tag from a file
    Remove {
        /// Tagged file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Tag to remove
        #[arg(value_name = "TAG")]
        tag: String,

        #[command(flatten)]
        store: TagStoreConfig,
    },

    /// Print the tags of a file, one per line
    Show {
        /// Tagged file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        store: TagStoreConfig,
    },

    /// Remove all tags from a file
    Clear {
        /// Tagged file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        store: TagStoreConfig,
    },
}

/// Conversion operations
#[derive(Subcommand, Debug, Clone)]
pub enum ConvertCommand {
    /// Copy the extended attribute tags of files into a tag file
    Export {
        /// Files whose tags are exported
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        file: TagFileConfig,

        #[command(flatten)]
        attribute: AttributeTagConfig,
    },

    /// Write the tags recorded in a tag file onto each file's extended attribute
    Import {
        #[command(flatten)]
        file: TagFileConfig,

        #[command(flatten)]
        attribute: AttributeTagConfig,
    },

    /// Rewrite a tag file in another format next to the original
    Format {
        /// Tag file to convert
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Format of SOURCE (defaults to its extension)
        #[arg(long, value_enum)]
        from: Option<FileFormat>,

        /// Format to write
        #[arg(long, value_enum)]
        to: FileFormat,
    },
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// File and attribute addressed by an accessor operation
#[derive(clap::Args, Debug, Clone)]
pub struct AttributeTarget {
    /// File whose attribute is accessed
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Full attribute name, including any namespace prefix (e.g. `user.tags`)
    #[arg(value_name = "KEY")]
    pub key: String,
}

/// Delimiter for list-valued attributes
#[derive(clap::Args, Debug, Clone)]
pub struct DelimiterConfig {
    /// Separator between entries
    #[arg(short, long = "delimiter", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,
}

/// Extended attribute holding a file's tags
///
/// Used by: `XattrTagBackend::new()`
#[derive(clap::Args, Debug, Clone)]
pub struct AttributeTagConfig {
    /// Attribute holding the tag list
    #[arg(long, default_value = DEFAULT_TAG_KEY)]
    pub key: String,

    #[command(flatten)]
    pub delimiter: DelimiterConfig,
}

impl AttributeTagConfig {
    /// Build the extended attribute backend this configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is empty.
    pub fn backend(&self) -> crate::Result<XattrTagBackend> {
        XattrTagBackend::new(self.key.as_str(), self.delimiter.delimiter.as_str())
    }
}

/// Tag file read and written by conversions
///
/// Used by: `FileTagBackend::open()`
#[derive(clap::Args, Debug, Clone)]
pub struct TagFileConfig {
    /// Tag file, or a directory to use its default tag file
    #[arg(long = "file", value_name = "FILE")]
    pub file: PathBuf,

    /// Tag file format (defaults to the file extension, or JSON for a directory)
    #[arg(long, value_enum)]
    pub format: Option<FileFormat>,
}

impl TagFileConfig {
    /// Open the tag file this configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the format cannot be determined or the existing
    /// tag file cannot be loaded.
    pub fn backend(&self) -> Result<FileTagBackend> {
        let backend = if self.file.is_dir() {
            FileTagBackend::open_in(&self.file, None, self.format.unwrap_or(FileFormat::Json))
        } else {
            FileFormat::resolve(&self.file, self.format)
                .and_then(|format| FileTagBackend::open(&self.file, format.writer()))
        };
        backend.with_context(|| format!("Failed to open tag file {}", self.file.display()))
    }
}

/// Where and how tags are stored
///
/// Tags go to an extended attribute unless `--file` names a tag file.
#[derive(clap::Args, Debug, Clone)]
pub struct TagStoreConfig {
    #[command(flatten)]
    pub attribute: AttributeTagConfig,

    /// Keep tags in this tag file (or the default tag file in this directory)
    #[arg(long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Tag file format (defaults to the file extension, or JSON for a directory)
    #[arg(long, value_enum, requires = "file")]
    pub format: Option<FileFormat>,
}

impl TagStoreConfig {
    /// Build the tag backend this configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is empty or the tag file cannot be
    /// opened.
    pub fn backend(&self) -> Result<Box<dyn TagBackend>> {
        match &self.file {
            Some(file) => {
                let config = TagFileConfig {
                    file: file.clone(),
                    format: self.format,
                };
                Ok(Box::new(config.backend()?))
            }
            None => Ok(Box::new(self.attribute.backend()?)),
        }
    }
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Maximum tracing level for the configured verbosity
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

// ============================================================================
// IMPLEMENTATION: Validation
// ============================================================================

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - An attribute key or tag key is empty
    /// - A tag delimiter is empty
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        let (key, tags) = match &self.command {
            Command::Get(target) | Command::Remove(target) => (Some(&target.key), None),
            Command::Set { target, .. }
            | Command::Append { target, .. }
            | Command::List { target, .. } => (Some(&target.key), None),
            Command::Keys { .. } | Command::Convert(ConvertCommand::Format { .. }) => (None, None),
            Command::Tag(
                TagCommand::Add { store, .. }
                | TagCommand::Remove { store, .. }
                | TagCommand::Show { store, .. }
                | TagCommand::Clear { store, .. },
            ) => (
                Some(&store.attribute.key),
                store.file.is_none().then_some(&store.attribute),
            ),
            Command::Convert(
                ConvertCommand::Export { attribute, .. } | ConvertCommand::Import { attribute, .. },
            ) => (Some(&attribute.key), Some(attribute)),
        };
        if key.is_some_and(String::is_empty) {
            anyhow::bail!("Attribute key must not be empty");
        }
        if tags.is_some_and(|config| config.delimiter.delimiter.is_empty()) {
            anyhow::bail!("Tag delimiter must not be empty");
        }

        Ok(())
    }
}
