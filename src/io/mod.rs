//! Loading of miner output directories.
//!
//! The mining step leaves one subdirectory per miner under a result
//! directory:
//!
//! ```text
//! result/
//!   AssignmentMatrixMiner/      idToFile.json, idToUser.json, AssignmentMatrix.json
//!   ChangedFilesMiner/          idToFile.json, idToUser.json, ChangedFilesByUser.json
//!   FileDependencyMatrixMiner/  idToFile.json, FileDependencyMatrix.json
//! ```
//!
//! This module only deserializes that layout into the engine's input
//! structures; callers with another encoding can construct the artifact
//! types directly and skip it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::builders::{AssignmentArtifact, ChangeArtifact, DependencyArtifact};
use crate::core::IdentifierMap;

pub const ASSIGNMENT_MINER_DIR: &str = "AssignmentMatrixMiner";
pub const CHANGED_FILES_MINER_DIR: &str = "ChangedFilesMiner";
pub const FILE_DEPENDENCY_MINER_DIR: &str = "FileDependencyMatrixMiner";

/// The three artifacts of one mining run.
#[derive(Clone, Debug)]
pub struct MinerOutput {
    pub assignment: AssignmentArtifact,
    pub dependency: DependencyArtifact,
    pub changes: ChangeArtifact,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_id_map(dir: &Path, file: &str) -> Result<IdentifierMap> {
    let path = dir.join(file);
    let raw: HashMap<String, String> = read_json(&path)?;
    IdentifierMap::from_raw(raw)
        .with_context(|| format!("invalid identifier map {}", path.display()))
}

pub fn load_assignment_artifact(result_dir: &Path) -> Result<AssignmentArtifact> {
    let dir = result_dir.join(ASSIGNMENT_MINER_DIR);
    Ok(AssignmentArtifact {
        id_to_file: read_id_map(&dir, "idToFile.json")?,
        id_to_user: read_id_map(&dir, "idToUser.json")?,
        assignment_matrix: read_json(&dir.join("AssignmentMatrix.json"))?,
    })
}

pub fn load_dependency_artifact(result_dir: &Path) -> Result<DependencyArtifact> {
    let dir = result_dir.join(FILE_DEPENDENCY_MINER_DIR);
    Ok(DependencyArtifact {
        id_to_file: read_id_map(&dir, "idToFile.json")?,
        file_dependency_matrix: read_json(&dir.join("FileDependencyMatrix.json"))?,
    })
}

pub fn load_change_artifact(result_dir: &Path) -> Result<ChangeArtifact> {
    let dir = result_dir.join(CHANGED_FILES_MINER_DIR);
    Ok(ChangeArtifact {
        id_to_file: read_id_map(&dir, "idToFile.json")?,
        id_to_user: read_id_map(&dir, "idToUser.json")?,
        changed_files_by_user: read_json(&dir.join("ChangedFilesByUser.json"))?,
    })
}

/// Load all three miner artifacts from one result directory.
pub fn load_miner_output(result_dir: &Path) -> Result<MinerOutput> {
    Ok(MinerOutput {
        assignment: load_assignment_artifact(result_dir)?,
        dependency: load_dependency_artifact(result_dir)?,
        changes: load_change_artifact(result_dir)?,
    })
}
