use crate::config::generator_config::GeneratorConfig;
use crate::core::assembler::{assemble, RepositoryLayers};
use crate::core::entities::generate_entities;
use crate::core::file_matrix::synthesize_file_matrix;
use crate::core::issue_matrix::{select_issue_modules, synthesize_issue_matrix};
use crate::core::module_matrix::{select_module_files, synthesize_module_matrix};
use crate::core::partition::split_groups;
use crate::domain::graph::MarkovDocument;
use crate::domain::ports::MatrixSink;
use crate::utils::error::{Result, SynthError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct GeneratedRepository {
    pub id: String,
    pub document: MarkovDocument,
}

/// Runs the whole generation for `repo_count` repositories from one seed.
///
/// The random stream is consumed in a fixed order: entities, partition, the
/// module and issue selections over the full universes, then file, module
/// and issue matrices and the initial fan-out of each repository in turn.
/// Changing that order changes the output for the same seed.
///
/// The configuration is validated before the generator is seeded, so a bad
/// value never consumes randomness.
pub fn generate<S: MatrixSink>(
    config: &GeneratorConfig,
    repo_count: usize,
    seed: u64,
    sink: &mut S,
) -> Result<Vec<GeneratedRepository>> {
    config.validate_config()?;
    if repo_count == 0 {
        return Err(SynthError::InvalidConfigValueError {
            field: "split".to_string(),
            value: repo_count.to_string(),
            reason: "at least one repository is needed".to_string(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let entities = generate_entities(&mut rng, config)?;
    let repos = split_groups(&mut rng, &entities.files, repo_count, config.files.number)?;

    let universe = entities.files.all_files();
    let module_selections = select_module_files(&mut rng, &entities.modules, &universe);
    let issue_selections = select_issue_modules(
        &mut rng,
        &entities.issues,
        &entities.modules,
        config.issues.n_modules,
    )?;

    let mut generated = Vec::with_capacity(repos.len());
    for repo in &repos {
        tracing::info!("Processing {}", repo.id);

        let files = synthesize_file_matrix(&mut rng, repo, &entities.authors)?;
        sink.file_matrix(&repo.id, &files)?;

        let repo_files: HashSet<&str> = files.files.iter().map(String::as_str).collect();
        let modules = synthesize_module_matrix(&mut rng, &module_selections, &repo_files)?;
        sink.module_matrix(&repo.id, &modules)?;

        let retained: HashSet<&str> = modules.modules.iter().map(|m| m.id.as_str()).collect();
        let issues =
            synthesize_issue_matrix(&mut rng, &issue_selections, &retained, config.issues.lambda)?;
        sink.issue_matrix(&repo.id, &issues)?;

        let layers = RepositoryLayers {
            files,
            modules,
            issues,
        };
        let document = assemble(&mut rng, &repo.id, &layers, &entities.authors)?;
        generated.push(GeneratedRepository {
            id: repo.id.clone(),
            document,
        });
    }
    sink.finish()?;

    Ok(generated)
}
