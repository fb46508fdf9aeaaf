use crate::domain::model::Contribution;
use crate::utils::error::{Result, SynthError};
use crate::utils::validation::{
    validate_positive_mean, validate_positive_number, validate_prefix, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(rename = "Files")]
    pub files: FilesConfig,
    #[serde(rename = "Modules")]
    pub modules: ModulesConfig,
    #[serde(rename = "Authors")]
    pub authors: AuthorsConfig,
    #[serde(rename = "Issues")]
    pub issues: IssuesConfig,
    /// Number of target repositories the files are split across.
    pub split: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub number: usize,
    pub prefix: String,
    pub filegroups: FileGroupsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGroupsConfig {
    pub number: usize,
    /// Draw sizes from Poisson(length) and cohesion from Normal(p, 0.01) instead of using them as is.
    pub random: bool,
    #[serde(alias = "lenght")]
    pub length: f64,
    pub p: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    pub number: usize,
    pub prefix: String,
    pub lambda: f64,
    pub random: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorsConfig {
    pub number: usize,
    pub prefix: String,
    pub contribution: Contribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesConfig {
    pub number: usize,
    pub prefix: String,
    /// Mean number of modules an issue touches.
    pub n_modules: f64,
    /// Mean of `average_consecutive_commits`.
    pub lambda: f64,
}

impl GeneratorConfig {
    /// 從檔案載入配置；`.yaml`/`.yml` 以 YAML 解析，其餘以 TOML 解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SynthError::MissingConfigError {
                field: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(SynthError::IoError)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SynthError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        serde_yaml::from_str(&processed_content).map_err(|e| SynthError::ConfigError {
            field: "yaml_parsing".to_string(),
            message: format!("YAML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${N_FILES})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SynthError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("Files.number", self.files.number, 1)?;
        validate_prefix("Files.prefix", &self.files.prefix)?;
        validate_positive_mean("Files.filegroups.length", self.files.filegroups.length)?;
        if self.files.filegroups.number > 0 {
            validate_range(
                "Files.filegroups.p",
                self.files.filegroups.p,
                f64::MIN_POSITIVE,
                1.0 - f64::EPSILON,
            )?;
        }

        validate_positive_number("Modules.number", self.modules.number, 1)?;
        validate_prefix("Modules.prefix", &self.modules.prefix)?;
        validate_positive_mean("Modules.lambda", self.modules.lambda)?;

        validate_positive_number("Authors.number", self.authors.number, 1)?;
        validate_prefix("Authors.prefix", &self.authors.prefix)?;

        validate_positive_number("Issues.number", self.issues.number, 1)?;
        validate_prefix("Issues.prefix", &self.issues.prefix)?;
        validate_positive_mean("Issues.n_modules", self.issues.n_modules)?;
        validate_positive_mean("Issues.lambda", self.issues.lambda)?;

        if let Some(split) = self.split {
            validate_positive_number("split", split, 1)?;
        }

        Ok(())
    }

    pub fn split(&self) -> usize {
        self.split.unwrap_or(1)
    }
}

impl Validate for GeneratorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
