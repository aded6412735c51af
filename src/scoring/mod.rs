//! Coordination-requirement and coordination-activity computation, plus the
//! STC and MC-STC congruence scores.

use std::collections::HashSet;

use crate::core::{DevInfo, LabeledMatrix};
use crate::errors::CongruenceError;

/// Coordination requirements: how much each developer pair *should*
/// coordinate, transitively through shared file dependencies.
///
/// `CR = (A . D) . A^T` over the developer-by-file assignment matrix `A` and
/// the file-by-file dependency matrix `D`. The file axes are matched by name;
/// a mismatch means the artifacts were mined over inconsistent file id spaces
/// and the computation is refused.
pub fn compute_cr(
    assignment: &LabeledMatrix,
    dependency: &LabeledMatrix,
) -> Result<LabeledMatrix, CongruenceError> {
    let ta_td = assignment.dot(dependency)?;
    ta_td.dot(&assignment.transpose())
}

/// Coordination activity: for every file, each ordered pair of distinct
/// editors gets one co-edit credit. Symmetric with a zero diagonal; files
/// with fewer than two editors contribute nothing.
pub fn compute_ca(change_activity: &LabeledMatrix) -> Result<LabeledMatrix, CongruenceError> {
    let devs: Vec<String> = change_activity.rows().to_vec();
    let mut ca = LabeledMatrix::zeros(devs.clone(), devs)?;

    let dev_count = change_activity.rows().len();
    for file in 0..change_activity.cols().len() {
        let editors: Vec<usize> = (0..dev_count)
            .filter(|&dev| change_activity.value_at(dev, file) > 0.0)
            .collect();
        // Pairwise loop over the editor list only, never the full roster.
        for &i in &editors {
            for &j in &editors {
                if i != j {
                    ca.add_at(i, j, 1.0);
                }
            }
        }
    }
    Ok(ca)
}

/// Socio-technical congruence: the fraction of required coordination pairs
/// that show any actual coordination.
///
/// Degenerate inputs are not an error: with no coordination requirements at
/// all the score is 0, keeping downstream classification total.
pub fn stc(cr: &LabeledMatrix, ca: &LabeledMatrix) -> f64 {
    let mut total = 0u64;
    let mut satisfied = 0u64;
    for (i, row) in cr.rows().iter().enumerate() {
        for (j, col) in cr.cols().iter().enumerate() {
            if cr.value_at(i, j) > 0.0 {
                total += 1;
                if ca.get(row, col).unwrap_or(0.0) > 0.0 {
                    satisfied += 1;
                }
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        satisfied as f64 / total as f64
    }
}

/// Security-aware congruence, restricted to cross-group pairs.
///
/// Developers on the CR axis are split into the security-flagged subset and
/// everyone else; only ordered (normal, security) and (security, normal)
/// pairs are visited, so the cost is proportional to the cross-pair count
/// rather than the squared roster size. Within-group coordination is
/// deliberately invisible to this score. Roster entries that name nobody on
/// the CR axis cannot form pairs and are ignored.
pub fn mc_stc<'a, I>(cr: &LabeledMatrix, ca: &LabeledMatrix, roster: I) -> f64
where
    I: IntoIterator<Item = &'a DevInfo>,
{
    let security_emails: HashSet<&str> = roster
        .into_iter()
        .filter(|dev| dev.is_security)
        .map(|dev| dev.email.as_str())
        .collect();
    let (security, normal): (Vec<&str>, Vec<&str>) = cr
        .rows()
        .iter()
        .map(String::as_str)
        .partition(|email| security_emails.contains(email));

    let mut cross_total = 0u64;
    let mut diff = 0u64;
    for &dev in &normal {
        for &sec in &security {
            for (a, b) in [(dev, sec), (sec, dev)] {
                if cr.get(a, b).unwrap_or(0.0) > 0.0 {
                    cross_total += 1;
                    if ca.get(a, b).unwrap_or(0.0) > 0.0 {
                        diff += 1;
                    }
                }
            }
        }
    }
    if cross_total == 0 {
        0.0
    } else {
        diff as f64 / cross_total as f64
    }
}
