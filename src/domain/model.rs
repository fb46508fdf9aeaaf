use serde::{Deserialize, Serialize};

/// Name of the catch-all group holding files that belong to no cohesive group.
pub const UNGROUPED: &str = "Ungrouped";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGroup {
    pub name: String,
    pub files: Vec<String>,
    /// Probability mass that transitions keep inside the group.
    pub p: f64,
}

impl FileGroup {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Cohesive groups plus the leftover ungrouped files.
///
/// Group membership is mutually exclusive, and `groups` together with
/// `ungrouped` always cover the whole file population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePopulation {
    pub groups: Vec<FileGroup>,
    pub ungrouped: Vec<String>,
}

impl FilePopulation {
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(FileGroup::len).sum::<usize>() + self.ungrouped.len()
    }

    /// All files, group by group, ungrouped files last.
    pub fn all_files(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.files.iter())
            .chain(self.ungrouped.iter())
            .cloned()
            .collect()
    }
}

/// A partition bucket: the slice of the file population owned by one target repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub files: FilePopulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    /// How many files (with replacement) the module samples.
    pub fan_out: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub p: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSpec {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contribution {
    Equal,
    Random,
}

/// All populations of one generation run.
#[derive(Debug, Clone)]
pub struct Entities {
    pub files: FilePopulation,
    pub modules: Vec<Module>,
    pub authors: Vec<Author>,
    pub issues: Vec<IssueSpec>,
}
