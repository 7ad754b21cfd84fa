// ABOUTME: Advisor instructions and quick-action sample questions.
// ABOUTME: Compiles defaults from src/prompts/*.md, supports a file-based override.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Compiled-in default instruction layers.
const DEFAULT_ADVISOR: &str = include_str!("prompts/advisor.md");
const DEFAULT_RESOURCES: &str = include_str!("prompts/resources.md");

/// Fixed questions offered as quick actions in the UI.
pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "How do I balance coursework and a part-time job?",
    "What should I look for when choosing a dorm?",
    "How can I get involved in campus clubs?",
    "Where can I find mental health support on campus?",
];

/// Reads a file if it exists, returning None otherwise.
pub fn read_if_exists(path: &Path) -> Option<String> {
    if path.exists() {
        fs::read_to_string(path).ok()
    } else {
        None
    }
}

/// The domain instructions given to the model, built from an advisor layer and
/// a campus-resources layer. `~/.unibot/advisor.md` replaces the whole text.
#[derive(Debug, Clone)]
pub struct AdvisorPrompt {
    pub advisor: String,
    pub resources: String,
}

impl AdvisorPrompt {
    pub fn new() -> Self {
        Self {
            advisor: DEFAULT_ADVISOR.trim().to_string(),
            resources: DEFAULT_RESOURCES.trim().to_string(),
        }
    }

    /// Replace both layers with the contents of `~/.unibot/advisor.md`, if present.
    pub fn load_override(&mut self) -> &mut Self {
        self.apply_override(&advisor_override_path())
    }

    pub fn apply_override(&mut self, path: &Path) -> &mut Self {
        if let Some(content) = read_if_exists(path).filter(|c| !c.trim().is_empty()) {
            self.advisor = content.trim().to_string();
            self.resources = String::new();
        }
        self
    }

    /// Joins the non-empty layers with a blank line.
    pub fn build(&self) -> String {
        [self.advisor.as_str(), self.resources.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for AdvisorPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of the advisor override file.
pub fn advisor_override_path() -> PathBuf {
    Config::home_dir().join("advisor.md")
}
