use markov_synth::core::entities::{generate_authors, generate_files};
use markov_synth::core::file_matrix::synthesize_file_matrix;
use markov_synth::core::partition::split_groups;
use markov_synth::config::generator_config::FileGroupsConfig;
use markov_synth::domain::model::Contribution;
use markov_synth::{generate, GeneratorConfig, NodeKind, NoopSink};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn config(files: usize, groups: usize, modules: usize, issues: usize, authors: usize) -> GeneratorConfig {
    GeneratorConfig::from_toml_str(&format!(
        r#"
[Files]
number = {files}
prefix = "File"

[Files.filegroups]
number = {groups}
random = true
length = 3
p = 0.85

[Modules]
number = {modules}
prefix = "Module"
lambda = 4
random = true

[Authors]
number = {authors}
prefix = "Author"
contribution = "random"

[Issues]
number = {issues}
prefix = "Issue"
n_modules = 2
lambda = 2
"#
    ))
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn population_and_partition_cover_every_file(
        seed in any::<u64>(),
        n in 1usize..80,
        groups in 0usize..15,
        repos in 1usize..5,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let settings = FileGroupsConfig { number: groups, random: true, length: 3.0, p: 0.9 };
        let population = generate_files(&mut rng, n, "File", &settings).unwrap();
        prop_assert_eq!(population.file_count(), n);

        let split = split_groups(&mut rng, &population, repos, n).unwrap();
        prop_assert_eq!(split.len(), repos);

        let mut seen = HashSet::new();
        for repo in &split {
            for file in repo.files.all_files() {
                prop_assert!(seen.insert(file));
            }
        }
        prop_assert_eq!(seen.len(), n);
    }

    #[test]
    fn file_rows_and_escapes_sum_to_one(seed in any::<u64>(), n in 1usize..40, authors in 1usize..6) {
        let mut rng = StdRng::seed_from_u64(seed);
        let settings = FileGroupsConfig { number: 4, random: false, length: 3.0, p: 0.7 };
        let population = generate_files(&mut rng, n, "File", &settings).unwrap();
        let authors = generate_authors(&mut rng, authors, "Author", Contribution::Random).unwrap();
        let author_total: f64 = authors.iter().map(|a| a.p).sum();
        prop_assert!((author_total - 1.0).abs() < 1e-6);

        let repo = split_groups(&mut rng, &population, 1, n).unwrap().remove(0);
        let matrix = synthesize_file_matrix(&mut rng, &repo, &authors).unwrap();
        for i in 0..matrix.len() {
            let total = matrix.row_sum(i) + matrix.authors[i].escape;
            prop_assert!((total - 1.0).abs() < 1e-6);
            prop_assert!(matrix.rows[i].iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn every_generated_row_is_stochastic(
        seed in any::<u64>(),
        files in 5usize..50,
        repos in 1usize..4,
    ) {
        let config = config(files, files / 4, 6, 8, 3);
        let generated = generate(&config, repos, seed, &mut NoopSink).unwrap();
        prop_assert_eq!(generated.len(), repos);

        let mut file_nodes = 0;
        for repo in &generated {
            let graph = repo.document.graph();
            prop_assert_eq!(graph.count_kind(NodeKind::Initial), 1);
            prop_assert_eq!(graph.count_kind(NodeKind::Author), 3);
            file_nodes += graph.count_kind(NodeKind::File);

            for (node, edges) in graph.rows() {
                prop_assert!(node.kind != NodeKind::Commit);
                if edges.is_empty() {
                    continue;
                }
                let total: f64 = edges.iter().map(|e| e.p).sum();
                prop_assert!((total - 1.0).abs() < 1e-6, "{} sums to {}", node, total);
            }
        }
        prop_assert_eq!(file_nodes, files);
    }
}
