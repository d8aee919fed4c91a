use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec};
use crate::ReactorCSTR::cstr_error::CSTRError;
use crate::ReactorCSTR::reactor_config::ReactorConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_LIBRARY: &str = include_str!("reaction_library.json");

/// Everything needed to set up one industrial process: reactions, fresh feed,
/// target product, catalyst label and the usual operating temperature window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionBundle {
    #[serde(default)]
    pub description: String,
    pub reactions: Vec<ReactionSpec>,
    pub feed_composition: ConcentrationState,
    #[serde(default)]
    pub target_product: Option<String>,
    #[serde(default)]
    pub catalyst: Option<String>,
    /// K
    pub temperature_range: (f64, f64),
}

impl ReactionBundle {
    /// Reactor with this bundle's feed, target and catalyst
    pub fn to_reactor_config(&self, volume: f64, flow_rate: f64, recycle_ratio: f64) -> ReactorConfig {
        ReactorConfig {
            volume,
            flow_rate,
            recycle_ratio,
            feed_composition: self.feed_composition.clone(),
            target_product: self.target_product.clone(),
            catalyst: self.catalyst.clone(),
        }
    }
}

/// Keyed table of reaction bundles. Plain data: nothing here takes part in solving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionLibrary {
    pub bundles: BTreeMap<String, ReactionBundle>,
}

impl ReactionLibrary {
    /// Catalogue shipped with the crate
    pub fn builtin() -> Result<Self, CSTRError> {
        Self::from_json_str(BUILTIN_LIBRARY)
    }

    /// Catalogue with the JSON shape `{"name": {bundle}, ...}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CSTRError> {
        let content = fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&content)?;
        info!(
            "loaded {} reaction bundle(s) from '{}'",
            library.len(),
            path.as_ref().display()
        );
        Ok(library)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CSTRError> {
        let bundles: BTreeMap<String, ReactionBundle> = serde_json::from_str(content)?;
        if bundles.is_empty() {
            warn!("reaction library is empty");
        }
        // bundles are kept even if broken; validation happens again before solving
        for (name, bundle) in bundles.iter() {
            if let Err(e) = bundle.to_reactor_config(1.0, 1.0, 0.0).validate(&bundle.reactions) {
                warn!("library entry '{}' is invalid: {}", name, e);
            }
        }
        Ok(Self { bundles })
    }

    pub fn names(&self) -> Vec<&str> {
        self.bundles.keys().map(|s| s.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&ReactionBundle, CSTRError> {
        self.bundles
            .get(name)
            .ok_or_else(|| CSTRError::ReactionNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_library_parses() {
        let library = ReactionLibrary::builtin().unwrap();
        assert_eq!(library.len(), 21);
        let haber = library.get("Ammonia Synthesis (Haber Process)").unwrap();
        assert_eq!(haber.target_product.as_deref(), Some("NH3"));
        assert_eq!(haber.temperature_range, (600.0, 800.0));
        assert!(haber.reactions[0].reversible);
        assert_eq!(haber.reactions[0].coefficient("H2"), -3.0);
    }

    #[test]
    fn test_builtin_entries_are_valid_reactors() {
        let library = ReactionLibrary::builtin().unwrap();
        for (name, bundle) in library.bundles.iter() {
            let config = bundle.to_reactor_config(1.0, 0.01, 0.0);
            assert!(config.validate(&bundle.reactions).is_ok(), "entry {}", name);
        }
    }

    #[test]
    fn test_unknown_entry() {
        let library = ReactionLibrary::builtin().unwrap();
        match library.get("Cold Fusion") {
            Err(CSTRError::ReactionNotFound(name)) => assert_eq!(name, "Cold Fusion"),
            other => panic!("expected ReactionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_library_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Isomerisation": {{
                    "description": "A -> B",
                    "reactions": [{{
                        "name": "A to B",
                        "stoichiometry": {{"A": -1, "B": 1}},
                        "frequency_factor": 1e10,
                        "activation_energy": 80000,
                        "reaction_order": {{"A": 1}}
                    }}],
                    "feed_composition": {{"A": 1.0}},
                    "target_product": "B",
                    "temperature_range": [300, 500]
                }}
            }}"#
        )
        .unwrap();
        let library = ReactionLibrary::from_file(file.path()).unwrap();
        assert_eq!(library.names(), vec!["Isomerisation"]);
        let bundle = library.get("Isomerisation").unwrap();
        assert!(!bundle.reactions[0].reversible);
        assert_eq!(bundle.catalyst, None);
        let config = bundle.to_reactor_config(1.0, 0.01, 0.2);
        assert_eq!(config.recycle_ratio, 0.2);
        assert_eq!(config.feed("A"), 1.0);
    }

    #[test]
    fn test_library_from_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(ReactionLibrary::from_file(file.path()), Err(CSTRError::Json(_))));
        assert!(matches!(
            ReactionLibrary::from_file("definitely/not/here.json"),
            Err(CSTRError::Io(_))
        ));
    }
}
