//! Meta artefacts derived from a [`Directory`].

use hitfactor_core::{ClassLetter, Division};
use hitfactor_fs::ArtifactDir;
use serde::Serialize;
use std::io;
use thiserror::Error;

use super::{Directory, PriorityTiers};

/// Errors raised while writing directory meta files.
#[derive(Debug, Error)]
pub enum DirectoryWriteError {
    /// A meta value could not be serialised.
    #[error("failed to serialise {name}: {source}")]
    Serialise {
        /// Artefact file name.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A meta file could not be written.
    #[error("failed to write {name}: {source}")]
    Write {
        /// Artefact file name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised while reading tier lists back from a meta directory.
#[derive(Debug, Error)]
pub enum TierReadError {
    /// A tier file could not be read.
    #[error("failed to read {name}: {source}")]
    Read {
        /// Artefact file name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A tier file was not a JSON array of member numbers.
    #[error("failed to decode {name}: {source}")]
    Decode {
        /// Artefact file name.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Write the directory meta files into `dir` and return their names.
///
/// Produces `all.json`, `classified.json`, `memberIdToNumber.json`, one
/// `classified.<division>.json` per division and one
/// `classified.<tier>.json` per priority tier.
pub fn write_meta(directory: &Directory, dir: &ArtifactDir) -> Result<Vec<String>, DirectoryWriteError> {
    let mut written = Vec::new();
    write_json(dir, "all.json", directory.members(), &mut written)?;
    write_json(
        dir,
        "classified.json",
        &directory.classified_numbers(),
        &mut written,
    )?;
    write_json(
        dir,
        "memberIdToNumber.json",
        &directory.member_id_index(),
        &mut written,
    )?;
    for division in Division::ALL {
        let name = format!("classified.{}.json", division.short_code());
        write_json(dir, &name, &directory.division_members(division), &mut written)?;
    }
    for letter in ClassLetter::ALL {
        write_json(dir, &tier_file_name(letter), directory.tier(letter), &mut written)?;
    }
    Ok(written)
}

/// Load the `classified.<tier>.json` lists written by [`write_meta`].
///
/// Every tier file must be present; an empty tier is an empty array.
pub fn read_tiers(dir: &ArtifactDir) -> Result<PriorityTiers, TierReadError> {
    let mut lists = Vec::with_capacity(ClassLetter::ALL.len());
    for letter in ClassLetter::ALL {
        let name = tier_file_name(letter);
        let bytes = dir.read(&name).map_err(|source| TierReadError::Read {
            name: name.clone(),
            source,
        })?;
        let members: Vec<String> =
            serde_json::from_slice(&bytes).map_err(|source| TierReadError::Decode {
                name: name.clone(),
                source,
            })?;
        lists.push((letter, members));
    }
    Ok(PriorityTiers::from_lists(lists))
}

fn tier_file_name(letter: ClassLetter) -> String {
    format!("classified.{}.json", letter.tier_tag())
}

fn write_json<T: Serialize + ?Sized>(
    dir: &ArtifactDir,
    name: &str,
    value: &T,
    written: &mut Vec<String>,
) -> Result<(), DirectoryWriteError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| DirectoryWriteError::Serialise {
        name: name.to_owned(),
        source,
    })?;
    dir.write_atomic(name, bytes)
        .map_err(|source| DirectoryWriteError::Write {
            name: name.to_owned(),
            source,
        })?;
    written.push(name.to_owned());
    Ok(())
}
