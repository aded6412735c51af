//! Dense matrix construction from raw mining artifacts.
//!
//! Each miner emits sparse maps keyed by its own integer id space. The
//! builders resolve every id to a name through the artifact's identifier maps
//! and produce dense [`LabeledMatrix`] values with full axis coverage, so
//! nothing downstream ever sees a raw miner id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::identifiers;
use crate::core::{IdentifierMap, LabeledMatrix};
use crate::errors::CongruenceError;

/// Sparse matrix form shared by the assignment and dependency artifacts:
/// outer key is the row id, inner key the column id.
pub type RawMatrix = HashMap<String, HashMap<String, f64>>;

/// Assignment miner output: which developer is assigned to which file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentArtifact {
    pub id_to_file: IdentifierMap,
    pub id_to_user: IdentifierMap,
    /// Outer key: user id. Inner key: file id.
    pub assignment_matrix: RawMatrix,
}

/// Dependency miner output: directed structural dependencies between files.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyArtifact {
    pub id_to_file: IdentifierMap,
    /// Outer key: depending file id. Inner key: depended-on file id.
    pub file_dependency_matrix: RawMatrix,
}

/// Changed-files miner output: the per-developer edit history. A file id
/// repeated in a developer's list is a repeated edit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeArtifact {
    pub id_to_file: IdentifierMap,
    pub id_to_user: IdentifierMap,
    pub changed_files_by_user: HashMap<String, Vec<String>>,
}

fn resolve(ids: &IdentifierMap, key: &str, artifact: &str) -> Result<usize, CongruenceError> {
    let id = identifiers::parse_id(key).ok_or_else(|| {
        CongruenceError::integrity(format!("{artifact}: invalid id key {key:?}"))
    })?;
    if ids.name(id).is_none() {
        return Err(CongruenceError::integrity(format!(
            "{artifact}: id {id} is not in the identifier map"
        )));
    }
    Ok(id)
}

fn check_weight(weight: f64, artifact: &str) -> Result<f64, CongruenceError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(CongruenceError::integrity(format!(
            "{artifact}: weight {weight} is not a non-negative number"
        )));
    }
    Ok(weight)
}

fn build_dense(
    raw: &RawMatrix,
    row_ids: &IdentifierMap,
    col_ids: &IdentifierMap,
    artifact: &str,
) -> Result<LabeledMatrix, CongruenceError> {
    let mut matrix = LabeledMatrix::zeros(row_ids.names().to_vec(), col_ids.names().to_vec())?;
    for (row_key, cells) in raw {
        let row = resolve(row_ids, row_key, artifact)?;
        for (col_key, &weight) in cells {
            let col = resolve(col_ids, col_key, artifact)?;
            matrix.set_at(row, col, check_weight(weight, artifact)?);
        }
    }
    Ok(matrix)
}

/// Developer-by-file assignment weights, zero-filled for pairs the miner did
/// not record.
pub fn build_assignment_matrix(
    artifact: &AssignmentArtifact,
) -> Result<LabeledMatrix, CongruenceError> {
    build_dense(
        &artifact.assignment_matrix,
        &artifact.id_to_user,
        &artifact.id_to_file,
        "assignment matrix",
    )
}

/// File-by-file dependency strengths. Files with no recorded dependencies
/// keep an explicit zero row so the file axis always covers the whole map.
pub fn build_dependency_matrix(
    artifact: &DependencyArtifact,
) -> Result<LabeledMatrix, CongruenceError> {
    build_dense(
        &artifact.file_dependency_matrix,
        &artifact.id_to_file,
        &artifact.id_to_file,
        "file dependency matrix",
    )
}

/// Developer-by-file change counts. Repeated (developer, file) occurrences
/// accumulate instead of overwriting.
pub fn build_change_activity_matrix(
    artifact: &ChangeArtifact,
) -> Result<LabeledMatrix, CongruenceError> {
    let mut matrix = LabeledMatrix::zeros(
        artifact.id_to_user.names().to_vec(),
        artifact.id_to_file.names().to_vec(),
    )?;
    for (user_key, file_keys) in &artifact.changed_files_by_user {
        let row = resolve(&artifact.id_to_user, user_key, "changed files")?;
        for file_key in file_keys {
            let col = resolve(&artifact.id_to_file, file_key, "changed files")?;
            matrix.add_at(row, col, 1.0);
        }
    }
    Ok(matrix)
}
