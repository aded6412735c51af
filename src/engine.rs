//! The full scoring pipeline: mined artifacts in, immutable snapshot out.

use chrono::{DateTime, Utc};
use im::Vector;

use crate::builders::{
    build_assignment_matrix, build_change_activity_matrix, build_dependency_matrix,
    AssignmentArtifact, ChangeArtifact, DependencyArtifact,
};
use crate::core::{DevInfo, LabeledMatrix, ScoreSnapshot};
use crate::errors::CongruenceError;
use crate::scoring;

/// Score one project version from its three mining artifacts.
///
/// Builds the assignment, dependency and change-activity matrices, derives CR
/// and CA, puts both on one shared developer ordering and computes STC. The
/// returned snapshot has no MC-STC yet; apply a roster with
/// [`ScoreSnapshot::with_roster`] once a human has flagged the security group.
pub fn score_project(
    project: impl Into<String>,
    timestamp: DateTime<Utc>,
    assignment: &AssignmentArtifact,
    dependency: &DependencyArtifact,
    changes: &ChangeArtifact,
) -> Result<ScoreSnapshot, CongruenceError> {
    let project = project.into();

    let assignment_matrix = build_assignment_matrix(assignment)?;
    let dependency_matrix = build_dependency_matrix(dependency)?;
    let change_matrix = build_change_activity_matrix(changes)?;
    log::debug!(
        "{project}: built {}x{} assignment, {}x{} dependency, {}x{} change activity",
        assignment_matrix.rows().len(),
        assignment_matrix.cols().len(),
        dependency_matrix.rows().len(),
        dependency_matrix.cols().len(),
        change_matrix.rows().len(),
        change_matrix.cols().len(),
    );

    let cr = scoring::compute_cr(&assignment_matrix, &dependency_matrix)?;
    let ca = scoring::compute_ca(&change_matrix)?;
    let (cr_matrix, ca_matrix) = align_developer_axes(cr, ca)?;

    let stc_value = scoring::stc(&cr_matrix, &ca_matrix);
    log::debug!("{project}: STC {stc_value}");

    // Until a human reclassifies them, every mined developer is a regular one.
    let dev_roster: Vector<DevInfo> = ca_matrix
        .rows()
        .iter()
        .cloned()
        .map(DevInfo::new)
        .collect();

    Ok(ScoreSnapshot {
        project,
        timestamp,
        cr_matrix,
        ca_matrix,
        stc_value,
        mc_stc_value: None,
        dev_roster,
    })
}

/// Rewrite CR and CA onto the union of their developer axes, CR's ordering
/// first. The two miners resolve to one email space but need not have seen
/// the same people; zero-filling keeps the scores unchanged while making the
/// shared ordering an actual structural property of the snapshot.
fn align_developer_axes(
    cr: LabeledMatrix,
    ca: LabeledMatrix,
) -> Result<(LabeledMatrix, LabeledMatrix), CongruenceError> {
    let mut devs: Vec<String> = cr.rows().to_vec();
    for dev in ca.rows() {
        if !cr.has_row(dev) {
            devs.push(dev.clone());
        }
    }
    let cr = cr.reindex(&devs, &devs)?;
    let ca = ca.reindex(&devs, &devs)?;
    Ok((cr, ca))
}
