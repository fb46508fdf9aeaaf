pub mod generator_config;

#[cfg(feature = "cli")]
use crate::core::engine::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "markov-synth")]
#[command(about = "Generates Markov transition graphs for synthetic repository histories")]
pub struct CliConfig {
    /// Path to the generator configuration (TOML, or YAML by extension)
    #[arg(short, long, default_value = "./configs/config.yaml")]
    pub input: String,

    /// Directory the transition documents are written to
    #[arg(short, long, default_value = "./output")]
    pub output: String,

    /// Number of repositories to split the files across (overrides the config)
    #[arg(short, long)]
    pub split: Option<usize>,

    /// Seed of the random stream (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Write the intermediate matrices as CSV into this directory
    #[arg(long)]
    pub dump_dir: Option<String>,

    /// Also pack all documents into one zip archive
    #[arg(long)]
    pub bundle: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log JSON lines instead of compact text
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Command-line values win over the configuration file, split defaults to 1.
    pub fn resolve(&self, config: &generator_config::GeneratorConfig) -> (usize, Option<u64>) {
        let split = self.split.or(config.split).unwrap_or(1);
        (split, self.seed.or(config.seed))
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(split) = self.split {
            validate_positive_number("--split", split, 1)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let config = generator_config::GeneratorConfig::from_toml_str(
            r#"
split = 3
seed = 7

[Files]
number = 4
prefix = "File"
[Files.filegroups]
number = 1
random = false
length = 2
p = 0.5

[Modules]
number = 1
prefix = "Module"
lambda = 1
random = false

[Authors]
number = 1
prefix = "Author"
contribution = "equal"

[Issues]
number = 1
prefix = "Issue"
n_modules = 1
lambda = 1
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from(["markov-synth", "--seed", "99"]);
        assert_eq!(cli.resolve(&config), (3, Some(99)));

        let cli = CliConfig::parse_from(["markov-synth", "-s", "2", "--format", "json"]);
        assert_eq!(cli.resolve(&config), (2, Some(7)));
        assert_eq!(cli.format, OutputFormat::Json);

        let cli = CliConfig::parse_from(["markov-synth", "--split", "0"]);
        assert!(cli.validate().is_err());
    }
}
