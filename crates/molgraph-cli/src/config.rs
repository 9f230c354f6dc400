use crate::cli::{InspectArgs, ReportFormat, SearchArgs};
use crate::error::{CliError, Result};
use molgraph::core::templates::registry::TemplateRegistry;
use molgraph::engine::config::{self as core_config, MatchConfigBuilder};
use molgraph::workflows::inspect::InspectConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialMatchMode {
    Substructure,
    Fullstructure,
}

impl From<PartialMatchMode> for core_config::MatchMode {
    fn from(p: PartialMatchMode) -> Self {
        match p {
            PartialMatchMode::Substructure => core_config::MatchMode::Substructure,
            PartialMatchMode::Fullstructure => core_config::MatchMode::Fullstructure,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialReportFormat {
    Text,
    Toml,
}

impl From<PartialReportFormat> for ReportFormat {
    fn from(p: PartialReportFormat) -> Self {
        match p {
            PartialReportFormat::Text => ReportFormat::Text,
            PartialReportFormat::Toml => ReportFormat::Toml,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialTemplatesConfig {
    /// Extra superatom dictionary layered over the built-in one.
    path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    mode: Option<PartialMatchMode>,
    #[serde(rename = "match-stereo-bonds")]
    match_stereo_bonds: Option<bool>,
    #[serde(rename = "honor-query-features")]
    honor_query_features: Option<bool>,
    #[serde(rename = "max-steps")]
    max_steps: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInspectConfig {
    #[serde(rename = "expand-superatoms")]
    expand_superatoms: Option<bool>,
    format: Option<PartialReportFormat>,
}

/// Settings read from a configuration file, before command-line overrides.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCliConfig {
    templates: Option<PartialTemplatesConfig>,
    search: Option<PartialSearchConfig>,
    inspect: Option<PartialInspectConfig>,
    /// Directory of the file, against which relative paths are resolved.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl PartialCliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn templates_path(&self) -> Option<PathBuf> {
        let path = self.templates.as_ref()?.path.as_ref()?;
        Some(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.clone(),
        })
    }

    /// The built-in superatom dictionary, extended by the configured file if any.
    pub fn template_registry(&self) -> Result<TemplateRegistry> {
        let mut registry = TemplateRegistry::builtin()?.clone();
        if let Some(path) = self.templates_path() {
            info!("Loading superatom templates from {:?}", path);
            registry.extend(&TemplateRegistry::load(&path)?);
        }
        Ok(registry)
    }

    pub fn merge_search(&self, args: &SearchArgs) -> Result<core_config::MatchConfig> {
        let file = self.search.as_ref();

        let mode: core_config::MatchMode = if args.full {
            core_config::MatchMode::Fullstructure
        } else {
            file.and_then(|s| s.mode)
                .map(Into::into)
                .unwrap_or_default()
        };
        let stereo = args.stereo || file.and_then(|s| s.match_stereo_bonds).unwrap_or(false);
        let query_features = !args.ignore_query_features
            && file.and_then(|s| s.honor_query_features).unwrap_or(true);

        let mut builder = MatchConfigBuilder::new()
            .mode(mode)
            .match_stereo_bonds(stereo)
            .honor_query_features(query_features);
        if let Some(steps) = args.max_steps.or(file.and_then(|s| s.max_steps)) {
            builder = builder.max_steps(steps);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_inspect(&self, args: &InspectArgs) -> (InspectConfig, ReportFormat) {
        let file = self.inspect.as_ref();
        let expand_superatoms =
            !args.no_expand && file.and_then(|i| i.expand_superatoms).unwrap_or(true);
        let format = args
            .format
            .or(file.and_then(|i| i.format).map(Into::into))
            .unwrap_or(ReportFormat::Text);
        (InspectConfig { expand_superatoms }, format)
    }
}
