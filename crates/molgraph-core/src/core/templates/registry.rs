use crate::core::io::molfile::{Molfile, MolfileError};
use crate::core::models::mol::Mol;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

const BUILTIN_TEMPLATES: &str = include_str!("../../../data/superatoms.toml");

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct TemplateEntry {
    molfile: String,
    #[serde(default)]
    aliases: Vec<String>,
}

/// A named abbreviation and the graph it expands to.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub mol: Mol,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
    aliases: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Parses a registry from TOML text; `source` names the text in error messages.
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, TemplateLoadError> {
        let entries: BTreeMap<String, TemplateEntry> =
            toml::from_str(content).map_err(|e| TemplateLoadError::Toml {
                path: source.to_string(),
                source: e,
            })?;

        let codec = Molfile::new();
        let mut registry = Self::default();
        for (name, entry) in entries {
            let mol = codec
                .decode(&entry.molfile)
                .map_err(|e| TemplateLoadError::Molfile {
                    name: name.clone(),
                    source: e,
                })?;
            if !mol
                .atoms_iter()
                .any(|(_, a)| a.connecting_attach_points() > 0)
            {
                return Err(TemplateLoadError::MissingAttachPoint { name });
            }
            registry.insert(Template {
                name,
                mol,
                aliases: entry.aliases,
            });
        }
        debug!(source, templates = registry.len(), "loaded template registry");
        Ok(registry)
    }

    /// The built-in dictionary, parsed on first use.
    pub fn builtin() -> Result<&'static Self, TemplateLoadError> {
        static BUILTIN: OnceLock<TemplateRegistry> = OnceLock::new();
        if let Some(registry) = BUILTIN.get() {
            return Ok(registry);
        }
        let registry = Self::from_toml_str(BUILTIN_TEMPLATES, "<builtin>")?;
        Ok(BUILTIN.get_or_init(|| registry))
    }

    /// Adds a template, replacing any template of the same name.
    pub fn insert(&mut self, template: Template) {
        for alias in &template.aliases {
            self.aliases.insert(alias.clone(), template.name.clone());
        }
        self.templates.insert(template.name.clone(), template);
    }

    /// Adds every template of `other`, overriding same-named entries.
    pub fn extend(&mut self, other: &TemplateRegistry) {
        for template in other.templates.values() {
            self.insert(template.clone());
        }
    }

    /// Finds a template by name, then by alias.
    pub fn lookup(&self, name: &str) -> Option<&Template> {
        self.templates.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|canonical| self.templates.get(canonical))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid molfile for template '{name}': {source}")]
    Molfile { name: String, source: MolfileError },
    #[error("Template '{name}' has no attachment point")]
    MissingAttachPoint { name: String },
}
