use crate::core::sampling::{poisson_nonzero, take_random};
use crate::domain::model::{FileGroup, FilePopulation, Repository};
use crate::utils::error::{Result, SynthError};
use rand::Rng;

/// How many of `remaining` items the next bucket takes, given `buckets_left` buckets.
fn bucket_share<R: Rng + ?Sized>(
    rng: &mut R,
    remaining: usize,
    buckets_left: usize,
    subject: &str,
) -> Result<usize> {
    if remaining == 0 {
        return Ok(0);
    }
    let mean = remaining as f64 / buckets_left as f64;
    Ok(poisson_nonzero(rng, mean, subject)?.min(remaining))
}

/// Splits the cohesive groups and the ungrouped files across `repo_count` repositories.
///
/// Groups move whole. Every bucket but the last draws its share of groups and of
/// ungrouped files; the last takes whatever is left. A single repository is
/// just `repo_count == 1`.
pub fn split_groups<R: Rng + ?Sized>(
    rng: &mut R,
    population: &FilePopulation,
    repo_count: usize,
    total_files: usize,
) -> Result<Vec<Repository>> {
    if repo_count == 0 {
        return Err(SynthError::InvalidConfigValueError {
            field: "split".to_string(),
            value: repo_count.to_string(),
            reason: "at least one repository is needed".to_string(),
        });
    }
    if population.file_count() != total_files {
        return Err(SynthError::PartitionMismatch {
            expected: total_files,
            actual: population.file_count(),
        });
    }

    let mut groups: Vec<FileGroup> = population.groups.clone();
    let mut ungrouped: Vec<String> = population.ungrouped.clone();
    let mut repos = Vec::with_capacity(repo_count);

    for i in 0..repo_count - 1 {
        let id = format!("Repo_{}", i);
        let buckets_left = repo_count - i;

        let n_groups = bucket_share(rng, groups.len(), buckets_left, &id)?;
        let repo_groups = take_random(rng, &mut groups, n_groups);
        let n_ungrouped = bucket_share(rng, ungrouped.len(), buckets_left, &id)?;
        let repo_ungrouped = take_random(rng, &mut ungrouped, n_ungrouped);

        tracing::debug!(
            "{} gets {} groups and {} ungrouped files",
            id,
            repo_groups.len(),
            repo_ungrouped.len()
        );
        repos.push(Repository {
            id,
            files: FilePopulation {
                groups: repo_groups,
                ungrouped: repo_ungrouped,
            },
        });
    }

    repos.push(Repository {
        id: format!("Repo_{}", repo_count - 1),
        files: FilePopulation { groups, ungrouped },
    });

    let placed: usize = repos.iter().map(|r| r.files.file_count()).sum();
    if placed != total_files {
        return Err(SynthError::PartitionMismatch {
            expected: total_files,
            actual: placed,
        });
    }

    Ok(repos)
}
