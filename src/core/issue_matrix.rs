use crate::core::sampling::{
    draw_until, poisson_nonzero, symmetric_dirichlet, take_random, MAX_REJECTION_ATTEMPTS,
};
use crate::domain::matrix::{IssueMatrix, IssueRow, WeightedRow};
use crate::domain::model::{IssueSpec, Module};
use crate::utils::error::Result;
use crate::utils::validation::check_probability;
use rand::Rng;
use std::collections::HashSet;

/// Distinct modules an issue touches, drawn from the whole module universe.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSelection {
    pub issue: String,
    pub modules: Vec<String>,
}

pub fn select_issue_modules<R: Rng + ?Sized>(
    rng: &mut R,
    issues: &[IssueSpec],
    modules: &[Module],
    n_modules: f64,
) -> Result<Vec<IssueSelection>> {
    issues
        .iter()
        .map(|issue| {
            let n = poisson_nonzero(rng, n_modules, &issue.id)?;
            let mut pool: Vec<String> = modules.iter().map(|m| m.id.clone()).collect();
            Ok(IssueSelection {
                issue: issue.id.clone(),
                modules: take_random(rng, &mut pool, n),
            })
        })
        .collect()
}

/// Issue→Module weights over the modules that survived in one repository.
///
/// Weight vectors are redrawn until they sum to one at output precision. Each
/// surviving issue also gets its `average_consecutive_commits` from
/// Poisson(`commits_lambda`), never zero.
pub fn synthesize_issue_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    selections: &[IssueSelection],
    retained_modules: &HashSet<&str>,
    commits_lambda: f64,
) -> Result<IssueMatrix> {
    let mut matrix = IssueMatrix::default();

    for selection in selections {
        let kept: Vec<String> = selection
            .modules
            .iter()
            .filter(|m| retained_modules.contains(m.as_str()))
            .cloned()
            .collect();
        if kept.is_empty() {
            tracing::debug!("{} touches no module here, dropped", selection.issue);
            continue;
        }

        let weights = draw_until(
            rng,
            &selection.issue,
            MAX_REJECTION_ATTEMPTS,
            |rng| symmetric_dirichlet(rng, kept.len()),
            |w| check_probability(w),
        )?;
        let average_consecutive_commits =
            poisson_nonzero(rng, commits_lambda, &selection.issue)? as f64;

        let row = WeightedRow {
            id: selection.issue.clone(),
            weights: kept.into_iter().zip(weights).collect(),
        };
        row.check("issue")?;
        matrix.issues.push(IssueRow {
            row,
            average_consecutive_commits,
        });
    }

    Ok(matrix)
}
