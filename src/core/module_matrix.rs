use crate::core::sampling::symmetric_dirichlet;
use crate::domain::matrix::{ModuleMatrix, WeightedRow};
use crate::domain::model::Module;
use crate::utils::error::Result;
use rand::Rng;
use std::collections::HashSet;

/// Files a module touches, sampled with replacement from the whole file universe.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSelection {
    pub module: String,
    pub files: Vec<String>,
}

pub fn select_module_files<R: Rng + ?Sized>(
    rng: &mut R,
    modules: &[Module],
    universe: &[String],
) -> Vec<ModuleSelection> {
    modules
        .iter()
        .map(|module| {
            let files = if universe.is_empty() {
                Vec::new()
            } else {
                (0..module.fan_out)
                    .map(|_| universe[rng.gen_range(0..universe.len())].clone())
                    .collect()
            };
            ModuleSelection {
                module: module.id.clone(),
                files,
            }
        })
        .collect()
}

/// Adds up the weights of repeated targets, keeping first-seen order.
pub(crate) fn aggregate(targets: &[String], weights: &[f64]) -> Vec<(String, f64)> {
    let mut merged: Vec<(String, f64)> = Vec::new();
    for (target, w) in targets.iter().zip(weights) {
        match merged.iter_mut().find(|(t, _)| t == target) {
            Some((_, total)) => *total += w,
            None => merged.push((target.clone(), *w)),
        }
    }
    merged
}

/// Module→File weights restricted to the files of one repository.
///
/// A module whose samples all fall outside the repository is left out.
pub fn synthesize_module_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    selections: &[ModuleSelection],
    repo_files: &HashSet<&str>,
) -> Result<ModuleMatrix> {
    let mut matrix = ModuleMatrix::default();

    for selection in selections {
        let kept: Vec<String> = selection
            .files
            .iter()
            .filter(|f| repo_files.contains(f.as_str()))
            .cloned()
            .collect();
        if kept.is_empty() {
            tracing::debug!("{} has no files here, dropped", selection.module);
            continue;
        }

        let weights = symmetric_dirichlet(rng, kept.len())?;
        let row = WeightedRow {
            id: selection.module.clone(),
            weights: aggregate(&kept, &weights),
        };
        row.check("module")?;
        matrix.modules.push(row);
    }

    Ok(matrix)
}
