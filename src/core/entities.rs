use crate::config::generator_config::{FileGroupsConfig, GeneratorConfig};
use crate::core::sampling::{normal, poisson_nonzero, symmetric_dirichlet, take_random, COHESION_SD};
use crate::domain::model::{
    Author, Contribution, Entities, FileGroup, FilePopulation, IssueSpec, Module,
};
use crate::utils::error::{Result, SynthError};
use crate::utils::validation::validate_probability_sum;
use rand::Rng;

fn fixed_count(mean: f64) -> usize {
    (mean.round() as usize).max(1)
}

/// Creates `n` files and deals them out to randomly sized groups.
///
/// Files left over once every group is filled (or none remain) form the
/// ungrouped population.
pub fn generate_files<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    prefix: &str,
    groups: &FileGroupsConfig,
) -> Result<FilePopulation> {
    if n == 0 {
        return Err(SynthError::InvalidConfigValueError {
            field: "Files.number".to_string(),
            value: n.to_string(),
            reason: "at least one file is needed".to_string(),
        });
    }

    let mut pool: Vec<String> = (0..n).map(|i| format!("{}_{}", prefix, i)).collect();
    let mut population = FilePopulation::default();

    for i in 0..groups.number {
        if pool.is_empty() {
            break;
        }
        let name = format!("FileGroup{}", i);
        let (size, p) = if groups.random {
            (
                poisson_nonzero(rng, groups.length, &name)?,
                normal(rng, groups.p, COHESION_SD)?,
            )
        } else {
            (fixed_count(groups.length), groups.p)
        };

        let files = take_random(rng, &mut pool, size);
        tracing::debug!("{} takes {} files (p = {:.4})", name, files.len(), p);
        population.groups.push(FileGroup { name, files, p });
    }

    population.ungrouped = pool;
    Ok(population)
}

pub fn generate_modules<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    prefix: &str,
    lambda: f64,
    random: bool,
) -> Result<Vec<Module>> {
    (0..n)
        .map(|i| {
            let id = format!("{}_{}", prefix, i);
            let fan_out = if random {
                poisson_nonzero(rng, lambda, &id)?
            } else {
                fixed_count(lambda)
            };
            Ok(Module { id, fan_out })
        })
        .collect()
}

pub fn generate_authors<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    prefix: &str,
    contribution: Contribution,
) -> Result<Vec<Author>> {
    if n == 0 {
        return Err(SynthError::InvalidConfigValueError {
            field: "Authors.number".to_string(),
            value: n.to_string(),
            reason: "at least one author is needed".to_string(),
        });
    }

    let weights = match contribution {
        Contribution::Equal => vec![1.0 / n as f64; n],
        Contribution::Random => symmetric_dirichlet(rng, n)?,
    };
    validate_probability_sum("authors", &weights)?;

    Ok(weights
        .into_iter()
        .enumerate()
        .map(|(i, p)| Author {
            name: format!("{}_{}", prefix, i),
            p,
        })
        .collect())
}

pub fn generate_issues(n: usize, prefix: &str) -> Vec<IssueSpec> {
    (0..n)
        .map(|i| IssueSpec {
            id: format!("{}_{}", prefix, i),
        })
        .collect()
}

/// Builds every population of the run: files, modules, authors, then issues.
pub fn generate_entities<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> Result<Entities> {
    let files = generate_files(
        rng,
        config.files.number,
        &config.files.prefix,
        &config.files.filegroups,
    )?;
    let modules = generate_modules(
        rng,
        config.modules.number,
        &config.modules.prefix,
        config.modules.lambda,
        config.modules.random,
    )?;
    let authors = generate_authors(
        rng,
        config.authors.number,
        &config.authors.prefix,
        config.authors.contribution,
    )?;
    let issues = generate_issues(config.issues.number, &config.issues.prefix);

    tracing::info!(
        "Generated {} files in {} groups ({} ungrouped), {} modules, {} authors, {} issues",
        files.file_count(),
        files.groups.len(),
        files.ungrouped.len(),
        modules.len(),
        authors.len(),
        issues.len()
    );

    Ok(Entities {
        files,
        modules,
        authors,
        issues,
    })
}
