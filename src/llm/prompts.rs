//! Named prompt templates loaded from JSON

use crate::error::{Result, ResumeAnalyzerError};
use log::{debug, info};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const RESUME_ANALYSIS: &str = "resume_analysis";
pub const COMBINE_RESULTS: &str = "combine_results";

const DEFAULT_PROMPTS: &str = include_str!("../../prompts/default_prompts.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    #[serde(default)]
    pub description: String,
    pub template: String,
}

/// Key -> template mapping. Placeholders are written `{name}`; `{{` and
/// `}}` render as literal braces.
#[derive(Debug, Clone)]
pub struct PromptStore {
    prompts: BTreeMap<String, PromptTemplate>,
    placeholder: Regex,
}

impl PromptStore {
    pub fn from_json(json: &str) -> Result<Self> {
        let prompts: BTreeMap<String, PromptTemplate> = serde_json::from_str(json)?;
        Ok(Self::from_map(prompts))
    }

    pub fn from_map(prompts: BTreeMap<String, PromptTemplate>) -> Self {
        let placeholder = Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .expect("Invalid placeholder regex");
        Self { prompts, placeholder }
    }

    /// The templates shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_PROMPTS)
    }

    /// Built-in templates, overlaid with the entries of `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut store = Self::builtin()?;
        if let Some(path) = path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ResumeAnalyzerError::Configuration(format!(
                    "Failed to read prompts file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let overrides: BTreeMap<String, PromptTemplate> = serde_json::from_str(&content)?;
            info!("Loaded {} prompt(s) from {}", overrides.len(), path.display());
            store.prompts.extend(overrides);
        }
        Ok(store)
    }

    pub fn get(&self, key: &str) -> Result<&PromptTemplate> {
        self.prompts
            .get(key)
            .ok_or_else(|| ResumeAnalyzerError::PromptNotFound(key.to_string()))
    }

    /// Render the template stored under `key` with the given values.
    pub fn get_prompt(&self, key: &str, vars: &[(&str, &str)]) -> Result<String> {
        let template = self.get(key)?;
        debug!("Rendering prompt '{}'", key);
        self.render(&template.template, vars)
    }

    pub fn render(&self, template: &str, vars: &[(&str, &str)]) -> Result<String> {
        let mut missing: Option<String> = None;

        let rendered = self.placeholder.replace_all(template, |caps: &Captures| {
            match caps.get(1) {
                Some(name) => match vars.iter().find(|(k, _)| *k == name.as_str()) {
                    Some((_, value)) => value.to_string(),
                    None => {
                        missing.get_or_insert_with(|| name.as_str().to_string());
                        String::new()
                    }
                },
                None if &caps[0] == "{{" => "{".to_string(),
                None => "}".to_string(),
            }
        });

        match missing {
            Some(name) => Err(ResumeAnalyzerError::PromptRender(format!(
                "no value supplied for placeholder '{{{}}}'",
                name
            ))),
            None => Ok(rendered.into_owned()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PromptTemplate)> {
        self.prompts.iter().map(|(k, v)| (k.as_str(), v))
    }
}
