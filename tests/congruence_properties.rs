//! Property-based tests for the congruence engine.
//!
//! These verify invariants that should hold for all inputs:
//! - Co-edit counting is symmetric with a zero diagonal
//! - CR computation is deterministic
//! - STC stays inside [0, 1] and is 0 for an all-zero CR
//! - MC-STC only sees cross-group pairs
//! - The risk classifier is total

use coordmap::{classify, compute_ca, compute_cr, mc_stc, stc, DevInfo, LabeledMatrix, RiskBand};
use proptest::prelude::*;

fn dev_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("dev{i}@example.com")).collect()
}

fn file_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("src/file{i}.rs")).collect()
}

fn matrix_from(rows: Vec<String>, cols: Vec<String>, grid: &[Vec<u8>]) -> LabeledMatrix {
    let mut m = LabeledMatrix::zeros(rows, cols).unwrap();
    for (i, row) in grid.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            m.set_at(i, j, f64::from(value));
        }
    }
    m
}

fn grid(rows: usize, cols: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..4, cols), rows)
}

/// Developer-by-file change activity of arbitrary small shape.
fn change_activity() -> impl Strategy<Value = LabeledMatrix> {
    (1usize..6, 0usize..6).prop_flat_map(|(devs, files)| {
        grid(devs, files)
            .prop_map(move |g| matrix_from(dev_labels(devs), file_labels(files), &g))
    })
}

proptest! {
    /// CA is symmetric and nobody coordinates with themselves.
    #[test]
    fn prop_ca_symmetric_with_zero_diagonal(change in change_activity()) {
        let ca = compute_ca(&change).unwrap();
        let n = ca.rows().len();

        for i in 0..n {
            prop_assert_eq!(ca.value_at(i, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(ca.value_at(i, j), ca.value_at(j, i));
            }
        }
    }

    /// Re-running the CR computation on identical inputs reproduces the
    /// matrix bit for bit.
    #[test]
    fn prop_cr_deterministic(
        input in (1usize..5, 1usize..5).prop_flat_map(|(devs, files)| {
            (Just(devs), Just(files), grid(devs, files), grid(files, files))
        })
    ) {
        let (devs, files, assignment_grid, dependency_grid) = input;
        let assignment = matrix_from(dev_labels(devs), file_labels(files), &assignment_grid);
        let dependency = matrix_from(file_labels(files), file_labels(files), &dependency_grid);

        let first = compute_cr(&assignment, &dependency).unwrap();
        let second = compute_cr(&assignment, &dependency).unwrap();
        prop_assert_eq!(first, second);
    }

    /// STC is a fraction of satisfied requirements, so it lives in [0, 1].
    #[test]
    fn prop_stc_bounded(
        input in (1usize..6).prop_flat_map(|devs| {
            (Just(devs), grid(devs, devs), grid(devs, devs))
        })
    ) {
        let (devs, cr_grid, ca_grid) = input;
        let cr = matrix_from(dev_labels(devs), dev_labels(devs), &cr_grid);
        let ca = matrix_from(dev_labels(devs), dev_labels(devs), &ca_grid);

        let score = stc(&cr, &ca);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// An all-zero CR means no requirements, which scores 0 by policy.
    #[test]
    fn prop_stc_zero_when_no_requirements(
        input in (1usize..6).prop_flat_map(|devs| (Just(devs), grid(devs, devs)))
    ) {
        let (devs, ca_grid) = input;
        let cr = matrix_from(dev_labels(devs), dev_labels(devs), &vec![vec![0u8; devs]; devs]);
        let ca = matrix_from(dev_labels(devs), dev_labels(devs), &ca_grid);

        prop_assert_eq!(stc(&cr, &ca), 0.0);
    }

    /// Rewriting every within-group entry of CR and CA leaves MC-STC
    /// untouched; only cross-group pairs are measured.
    #[test]
    fn prop_mc_stc_ignores_within_group_entries(
        input in (2usize..6).prop_flat_map(|devs| {
            (
                Just(devs),
                prop::collection::vec(any::<bool>(), devs),
                grid(devs, devs),
                grid(devs, devs),
                grid(devs, devs),
                grid(devs, devs),
            )
        })
    ) {
        let (devs, flags, cr_grid, ca_grid, cr_noise, ca_noise) = input;
        let labels = dev_labels(devs);
        let roster: Vec<DevInfo> = labels
            .iter()
            .zip(&flags)
            .map(|(email, &flagged)| {
                if flagged {
                    DevInfo::security(email.clone())
                } else {
                    DevInfo::new(email.clone())
                }
            })
            .collect();

        let cr = matrix_from(labels.clone(), labels.clone(), &cr_grid);
        let ca = matrix_from(labels.clone(), labels.clone(), &ca_grid);
        let base = mc_stc(&cr, &ca, &roster);

        let mut cr_rewritten = cr.clone();
        let mut ca_rewritten = ca.clone();
        for i in 0..devs {
            for j in 0..devs {
                if flags[i] == flags[j] {
                    cr_rewritten.set_at(i, j, f64::from(cr_noise[i][j]));
                    ca_rewritten.set_at(i, j, f64::from(ca_noise[i][j]));
                }
            }
        }

        prop_assert_eq!(base, mc_stc(&cr_rewritten, &ca_rewritten, &roster));
    }

    /// MC-STC is bounded like STC.
    #[test]
    fn prop_mc_stc_bounded(
        input in (1usize..6).prop_flat_map(|devs| {
            (
                Just(devs),
                prop::collection::vec(any::<bool>(), devs),
                grid(devs, devs),
                grid(devs, devs),
            )
        })
    ) {
        let (devs, flags, cr_grid, ca_grid) = input;
        let labels = dev_labels(devs);
        let roster: Vec<DevInfo> = labels
            .iter()
            .zip(&flags)
            .map(|(email, &flagged)| DevInfo {
                email: email.clone(),
                is_security: flagged,
            })
            .collect();

        let cr = matrix_from(labels.clone(), labels.clone(), &cr_grid);
        let ca = matrix_from(labels.clone(), labels, &ca_grid);

        let score = mc_stc(&cr, &ca, &roster);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// The classifier never panics and scores in [0, 1] always land in a
    /// real band.
    #[test]
    fn prop_classifier_total(score in prop::num::f64::ANY) {
        let band = classify(Some(score));
        if (0.0..=1.0).contains(&score) {
            prop_assert!(matches!(
                band,
                RiskBand::Low | RiskBand::Mid | RiskBand::High
            ));
        } else {
            prop_assert_eq!(band, RiskBand::Undefined);
        }
    }
}
