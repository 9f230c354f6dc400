use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Whether the query must cover part of the target or all of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    #[default]
    Substructure,
    Fullstructure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub mode: MatchMode,
    /// Require wedge, hash, wiggly and either bonds to agree in kind and direction.
    pub match_stereo_bonds: bool,
    /// Apply substitution-count, unsaturation, ring-bond-count and hydrogen-count
    /// queries carried by query atoms.
    pub honor_query_features: bool,
    /// Maximum number of candidate assignments before the search is aborted.
    pub max_steps: Option<u64>,
}

impl MatchConfig {
    pub fn substructure() -> Self {
        Self {
            mode: MatchMode::Substructure,
            match_stereo_bonds: false,
            honor_query_features: true,
            max_steps: None,
        }
    }

    pub fn fullstructure() -> Self {
        Self {
            mode: MatchMode::Fullstructure,
            ..Self::substructure()
        }
    }

    pub fn is_fullstructure(&self) -> bool {
        self.mode == MatchMode::Fullstructure
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::substructure()
    }
}

#[derive(Default)]
pub struct MatchConfigBuilder {
    mode: Option<MatchMode>,
    match_stereo_bonds: Option<bool>,
    honor_query_features: Option<bool>,
    max_steps: Option<u64>,
}

impl MatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn fullstructure(mut self, full: bool) -> Self {
        self.mode = Some(if full {
            MatchMode::Fullstructure
        } else {
            MatchMode::Substructure
        });
        self
    }
    pub fn match_stereo_bonds(mut self, enabled: bool) -> Self {
        self.match_stereo_bonds = Some(enabled);
        self
    }
    pub fn honor_query_features(mut self, enabled: bool) -> Self {
        self.honor_query_features = Some(enabled);
        self
    }
    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn build(self) -> Result<MatchConfig, ConfigError> {
        let mode = self.mode.ok_or(ConfigError::MissingParameter("mode"))?;
        if self.max_steps == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_steps",
                reason: "must be at least 1".into(),
            });
        }
        Ok(MatchConfig {
            mode,
            match_stereo_bonds: self.match_stereo_bonds.unwrap_or(false),
            honor_query_features: self.honor_query_features.unwrap_or(true),
            max_steps: self.max_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_mode() {
        assert_eq!(
            MatchConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("mode"))
        );
    }

    #[test]
    fn builder_applies_defaults_and_overrides() {
        let config = MatchConfigBuilder::new()
            .fullstructure(true)
            .match_stereo_bonds(true)
            .max_steps(500)
            .build()
            .unwrap();
        assert!(config.is_fullstructure());
        assert!(config.match_stereo_bonds);
        assert!(config.honor_query_features);
        assert_eq!(config.max_steps, Some(500));
    }

    #[test]
    fn zero_step_budget_is_rejected() {
        let result = MatchConfigBuilder::new()
            .mode(MatchMode::Substructure)
            .max_steps(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "max_steps", .. })
        ));
    }

    #[test]
    fn presets_differ_only_in_mode() {
        let sub = MatchConfig::substructure();
        let full = MatchConfig::fullstructure();
        assert_eq!(sub.mode, MatchMode::Substructure);
        assert_eq!(MatchConfig { mode: MatchMode::Substructure, ..full }, sub);
        assert_eq!(MatchConfig::default(), sub);
    }
}
