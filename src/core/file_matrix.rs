use crate::core::sampling::{draw_until, symmetric_dirichlet, MAX_REJECTION_ATTEMPTS};
use crate::domain::matrix::{FileAuthor, FileMatrix};
use crate::domain::model::{Author, Repository, UNGROUPED};
use crate::utils::error::{Result, SynthError};
use crate::utils::validation::validate_open_probability;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Mass ungrouped files leak out of the file layer, spread over the block.
pub const UNGROUPED_LEAKAGE: f64 = 0.05;

struct AuthorPicker<'a> {
    authors: &'a [Author],
    index: WeightedIndex<f64>,
}

impl<'a> AuthorPicker<'a> {
    fn new(authors: &'a [Author]) -> Result<Self> {
        let index = WeightedIndex::new(authors.iter().map(|a| a.p)).map_err(|e| {
            SynthError::invariant("authors", format!("unusable author weights: {}", e))
        })?;
        Ok(Self { authors, index })
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a str {
        &self.authors[self.index.sample(rng)].name
    }
}

/// Dirichlet row over `n` files with `residual` taken off every entry.
fn shifted_row<R: Rng + ?Sized>(rng: &mut R, n: usize, residual: f64) -> Result<Vec<f64>> {
    Ok(symmetric_dirichlet(rng, n)?
        .into_iter()
        .map(|x| x - residual)
        .collect())
}

fn place_block(matrix: &mut FileMatrix, offset: usize, block: Vec<Vec<f64>>) {
    for (r, row) in block.into_iter().enumerate() {
        matrix.rows[offset + r][offset..offset + row.len()].copy_from_slice(&row);
    }
}

/// Builds the File×File matrix of one repository and binds every file to an author.
///
/// Each cohesive group is a diagonal block whose rows keep `p` of their mass
/// inside the group and are redrawn until strictly positive. The whole group
/// shares one author. Ungrouped files leak a fixed small mass, negative
/// entries are clamped to zero, and every file draws its own author.
pub fn synthesize_file_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    repo: &Repository,
    authors: &[Author],
) -> Result<FileMatrix> {
    let picker = AuthorPicker::new(authors)?;
    let mut matrix = FileMatrix::with_files(repo.files.all_files());
    let mut offset = 0;

    for group in &repo.files.groups {
        validate_open_probability(&group.name, group.p)?;
        let n = group.len();
        if n == 0 {
            continue;
        }
        let residual = (1.0 - group.p) / n as f64;

        let mut block = Vec::with_capacity(n);
        for _ in 0..n {
            let row = draw_until(
                rng,
                &group.name,
                MAX_REJECTION_ATTEMPTS,
                |rng| shifted_row(rng, n, residual),
                |row| row.iter().all(|x| *x > 0.0),
            )?;
            block.push(row);
        }
        let author = picker.pick(rng);

        for (i, row) in block.iter().enumerate() {
            matrix.authors.push(FileAuthor {
                author: author.to_string(),
                escape: 1.0 - row.iter().sum::<f64>(),
            });
            tracing::trace!("{} bound to {}", group.files[i], author);
        }
        place_block(&mut matrix, offset, block);
        offset += n;
    }

    let n = repo.files.ungrouped.len();
    if n > 0 {
        let residual = UNGROUPED_LEAKAGE / n as f64;
        let mut block = Vec::with_capacity(n);
        for _ in 0..n {
            let row: Vec<f64> = shifted_row(rng, n, residual)?
                .into_iter()
                .map(|x| x.max(0.0))
                .collect();
            block.push(row);
        }
        for row in &block {
            matrix.authors.push(FileAuthor {
                author: picker.pick(rng).to_string(),
                escape: 1.0 - row.iter().sum::<f64>(),
            });
        }
        place_block(&mut matrix, offset, block);
        offset += n;
    }

    if offset != matrix.len() {
        return Err(SynthError::invariant(
            format!("{} file matrix", repo.id),
            format!("placed {} of {} files", offset, matrix.len()),
        ));
    }
    matrix.check()?;

    tracing::debug!(
        "{}: file matrix {}x{} ({} in {})",
        repo.id,
        matrix.len(),
        matrix.len(),
        n,
        UNGROUPED
    );
    Ok(matrix)
}
