//! Command execution
//!
//! Runs a parsed [`Command`] against the attribute store or a tag file and
//! writes its output to the given writer.

use crate::cli::{Command, ConvertCommand, TagCommand};
use crate::convert;
use crate::writers::FileFormat;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use xattr_bridge::accessor;

/// Run `command`, printing results to `out`
///
/// # Errors
///
/// Returns an error if the attribute operation fails or `out` cannot be
/// written to.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Get(target) => {
            let value = accessor::get(&target.path, &target.key)
                .with_context(|| format!("Failed to read '{}'", target.key))?;
            writeln!(out, "{value}")?;
        }
        Command::Set { target, value } => {
            accessor::set(&target.path, &target.key, value)
                .with_context(|| format!("Failed to set '{}'", target.key))?;
            tracing::info!("Set {} on {}", target.key, target.path.display());
        }
        Command::Append {
            target,
            value,
            delimiter,
        } => {
            accessor::append(&target.path, &target.key, value, &delimiter.delimiter)
                .with_context(|| format!("Failed to append to '{}'", target.key))?;
            tracing::info!("Appended to {} on {}", target.key, target.path.display());
        }
        Command::List { target, delimiter } => {
            let entries = accessor::get_list(&target.path, &target.key, &delimiter.delimiter)
                .with_context(|| format!("Failed to read '{}'", target.key))?;
            for entry in entries {
                writeln!(out, "{entry}")?;
            }
        }
        Command::Remove(target) => {
            accessor::remove(&target.path, &target.key)
                .with_context(|| format!("Failed to remove '{}'", target.key))?;
            tracing::info!("Removed {} from {}", target.key, target.path.display());
        }
        Command::Keys { path } => {
            let keys = accessor::list_keys(path)
                .with_context(|| format!("Failed to list attributes of {}", path.display()))?;
            for key in keys {
                writeln!(out, "{key}")?;
            }
        }
        Command::Tag(tag_command) => run_tag(tag_command, out)?,
        Command::Convert(convert_command) => run_convert(convert_command, out)?,
    }

    Ok(())
}

fn run_tag<W: Write>(command: &TagCommand, out: &mut W) -> Result<()> {
    match command {
        TagCommand::Add { path, tag, store } => {
            let mut backend = store.backend()?;
            backend
                .add_tag(path, tag)
                .with_context(|| format!("Failed to tag {}", path.display()))?;
            backend.commit_transactions()?;
        }
        TagCommand::Remove { path, tag, store } => {
            let mut backend = store.backend()?;
            backend
                .remove_tag(path, tag)
                .with_context(|| format!("Failed to untag {}", path.display()))?;
            backend.commit_transactions()?;
        }
        TagCommand::Show { path, store } => {
            let tags = store
                .backend()?
                .load_tags(path)
                .with_context(|| format!("Failed to load tags of {}", path.display()))?;
            for tag in tags {
                writeln!(out, "{tag}")?;
            }
        }
        TagCommand::Clear { path, store } => {
            let mut backend = store.backend()?;
            backend
                .clear_tags(path)
                .with_context(|| format!("Failed to clear tags of {}", path.display()))?;
            backend.commit_transactions()?;
        }
    }

    Ok(())
}

fn run_convert<W: Write>(command: &ConvertCommand, out: &mut W) -> Result<()> {
    match command {
        ConvertCommand::Export {
            paths,
            file,
            attribute,
        } => {
            let source = attribute.backend()?;
            let mut target = file.backend()?;
            let report =
                convert::copy_tags(paths.iter().map(PathBuf::as_path), &source, &mut target)
                    .with_context(|| {
                        format!("Failed to export tags to {}", file.file.display())
                    })?;
            writeln!(
                out,
                "Exported tags of {} files to {}",
                report.copied,
                target.store_path().display()
            )?;
        }
        ConvertCommand::Import { file, attribute } => {
            let source = file.backend()?;
            let mut target = attribute.backend()?;
            let paths = source.tagged_paths();
            let report =
                convert::copy_tags(paths.iter().map(PathBuf::as_path), &source, &mut target)
                    .with_context(|| {
                        format!("Failed to import tags from {}", file.file.display())
                    })?;
            writeln!(
                out,
                "Imported tags of {} files from {}",
                report.copied,
                source.store_path().display()
            )?;
            for skipped in &report.skipped {
                writeln!(out, "Skipped missing file {}", skipped.display())?;
            }
        }
        ConvertCommand::Format { source, from, to } => {
            let from = FileFormat::resolve(source, *from)?;
            let destination = convert::convert_file(source, from, *to)
                .with_context(|| format!("Failed to convert {}", source.display()))?;
            writeln!(out, "{}", destination.display())?;
        }
    }

    Ok(())
}
