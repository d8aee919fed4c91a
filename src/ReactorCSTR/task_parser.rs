//! JSON task files
//!
//! A task names a catalogue entry (`reaction`) or carries its own reaction list
//! (`reactions` + `feed_composition`), and adds the reactor geometry and what to
//! do with it:
//!
//! ```json
//! {
//!   "reaction": "Water Gas Shift Reaction",
//!   "volume": 1.0,
//!   "flow_rate": 0.01,
//!   "recycle_ratio": 0.2,
//!   "optimize": true,
//!   "output": "wgs_result.json"
//! }
//! ```
//! Optional keys: `library` (path of a user catalogue, the built-in one is used
//! otherwise), `feed_composition`, `target_product` and `catalyst` (override the
//! catalogue entry), `temperature` (default: middle of the bounds),
//! `temperature_bounds` (default: catalogue temperature range, else 300..1000 K).
use super::cstr_error::CSTRError;
use super::reactor_config::ReactorConfig;
use super::simulation::{DEFAULT_TEMPERATURE_BOUNDS, SimulationResult, SimulationSettings, run_simulation};
use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec};
use crate::Library::reaction_library::ReactionLibrary;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTask {
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub reactions: Option<Vec<ReactionSpec>>,
    pub volume: f64,
    pub flow_rate: f64,
    #[serde(default)]
    pub recycle_ratio: f64,
    #[serde(default)]
    pub feed_composition: Option<ConcentrationState>,
    #[serde(default)]
    pub target_product: Option<String>,
    #[serde(default)]
    pub catalyst: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default)]
    pub temperature_bounds: Option<(f64, f64)>,
    #[serde(default)]
    pub output: Option<String>,
}

/// Task resolved against the catalogue, ready for [`run_simulation`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTask {
    pub config: ReactorConfig,
    pub reactions: Vec<ReactionSpec>,
    pub settings: SimulationSettings,
}

impl SimulationTask {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CSTRError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CSTRError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Resolves the reaction set. `library` overrides both the task's own
    /// `library` path and the built-in catalogue.
    pub fn prepare(&self, library: Option<&ReactionLibrary>) -> Result<PreparedTask, CSTRError> {
        let (reactions, mut config, catalogue_range) = match (&self.reaction, &self.reactions) {
            (Some(_), Some(_)) => {
                return Err(CSTRError::Task(
                    "give either 'reaction' or 'reactions', not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(CSTRError::Task(
                    "no 'reaction' name and no 'reactions' list".to_string(),
                ));
            }
            (Some(name), None) => {
                let loaded;
                let library = match library {
                    Some(library) => library,
                    None => {
                        loaded = match &self.library {
                            Some(path) => ReactionLibrary::from_file(path)?,
                            None => ReactionLibrary::builtin()?,
                        };
                        &loaded
                    }
                };
                let bundle = library.get(name)?;
                let config = bundle.to_reactor_config(self.volume, self.flow_rate, self.recycle_ratio);
                (bundle.reactions.clone(), config, Some(bundle.temperature_range))
            }
            (None, Some(reactions)) => {
                let feed = self.feed_composition.clone().ok_or_else(|| {
                    CSTRError::Task("inline 'reactions' need a 'feed_composition'".to_string())
                })?;
                let mut config = ReactorConfig::new(self.volume, self.flow_rate, feed);
                config.recycle_ratio = self.recycle_ratio;
                (reactions.clone(), config, None)
            }
        };

        if let Some(feed) = &self.feed_composition {
            config.feed_composition = feed.clone();
        }
        if self.target_product.is_some() {
            config.target_product = self.target_product.clone();
        }
        if self.catalyst.is_some() {
            config.catalyst = self.catalyst.clone();
        }

        let bounds = self
            .temperature_bounds
            .or(catalogue_range)
            .unwrap_or(DEFAULT_TEMPERATURE_BOUNDS);
        let settings = SimulationSettings {
            temperature: self.temperature.unwrap_or(0.5 * (bounds.0 + bounds.1)),
            optimize: self.optimize,
            temperature_bounds: bounds,
        };
        config.validate(&reactions)?;
        Ok(PreparedTask {
            config,
            reactions,
            settings,
        })
    }
}

/// Reads, resolves and runs a task file; writes the result JSON when the task
/// names an `output` path.
pub fn run_task_file<P: AsRef<Path>>(path: P) -> Result<(PreparedTask, SimulationResult), CSTRError> {
    let task = SimulationTask::from_file(path.as_ref())?;
    info!("task '{}' loaded", path.as_ref().display());
    let prepared = task.prepare(None)?;
    let result = run_simulation(&prepared.config, &prepared.reactions, &prepared.settings)?;
    if let Some(output) = &task.output {
        fs::write(output, result.to_json()?)?;
        info!("result written to '{}'", output);
    }
    Ok((prepared, result))
}

/// Writes a filled-in task for the water gas shift entry of the built-in
/// catalogue; edit it and feed it to [`run_task_file`].
pub fn create_template<P: AsRef<Path>>(path: P) -> Result<(), CSTRError> {
    let template = SimulationTask {
        library: None,
        reaction: Some("Water Gas Shift Reaction".to_string()),
        reactions: None,
        volume: 1.0,
        flow_rate: 0.01,
        recycle_ratio: 0.0,
        feed_composition: None,
        target_product: None,
        catalyst: None,
        temperature: Some(650.0),
        optimize: false,
        temperature_bounds: Some((600.0, 750.0)),
        output: Some("cstr_result.json".to_string()),
    };
    fs::write(path.as_ref(), serde_json::to_string_pretty(&template)?)?;
    info!("task template written to '{}'", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    const INLINE_REACTIONS: &str = r#"[{
        "name": "A to B",
        "stoichiometry": {"A": -1, "B": 1},
        "frequency_factor": 1e10,
        "activation_energy": 80000,
        "reaction_order": {"A": 1}
    }]"#;

    #[test]
    fn test_catalogue_task_defaults() {
        let task = SimulationTask::from_json_str(
            r#"{"reaction": "Water Gas Shift Reaction", "volume": 1.0, "flow_rate": 0.01}"#,
        )
        .unwrap();
        let prepared = task.prepare(None).unwrap();
        assert_eq!(prepared.config.target_product.as_deref(), Some("H2"));
        assert_eq!(prepared.config.feed("CO"), 25.0);
        assert_eq!(prepared.config.recycle_ratio, 0.0);
        assert_eq!(prepared.settings.temperature_bounds, (600.0, 750.0));
        assert_eq!(prepared.settings.temperature, 675.0);
        assert!(!prepared.settings.optimize);
        assert_eq!(prepared.reactions.len(), 1);
    }

    #[test]
    fn test_catalogue_task_overrides() {
        let task = SimulationTask::from_json_str(
            r#"{
                "reaction": "Water Gas Shift Reaction",
                "volume": 2.0,
                "flow_rate": 0.1,
                "recycle_ratio": 0.3,
                "feed_composition": {"CO": 10.0, "H2O": 30.0},
                "target_product": "CO2",
                "catalyst": "Cu/ZnO",
                "temperature": 620.0,
                "temperature_bounds": [550, 800],
                "optimize": true
            }"#,
        )
        .unwrap();
        let prepared = task.prepare(None).unwrap();
        assert_eq!(prepared.config.feed("H2O"), 30.0);
        assert_eq!(prepared.config.target_product.as_deref(), Some("CO2"));
        assert_eq!(prepared.config.catalyst.as_deref(), Some("Cu/ZnO"));
        assert_eq!(prepared.config.recycle_ratio, 0.3);
        assert_eq!(prepared.settings, SimulationSettings::optimized(620.0, (550.0, 800.0)));
    }

    #[test]
    fn test_inline_task() {
        let json = format!(
            r#"{{"reactions": {}, "feed_composition": {{"A": 1.0}}, "volume": 1.0, "flow_rate": 0.01,
                "target_product": "B", "temperature": 330.0}}"#,
            INLINE_REACTIONS
        );
        let prepared = SimulationTask::from_json_str(&json).unwrap().prepare(None).unwrap();
        assert_eq!(prepared.settings.temperature_bounds, DEFAULT_TEMPERATURE_BOUNDS);
        assert_eq!(prepared.settings.temperature, 330.0);
        assert_eq!(prepared.config.target_product.as_deref(), Some("B"));
        assert_eq!(prepared.config.residence_time(), 100.0);
    }

    #[test]
    fn test_malformed_tasks() {
        let no_feed = format!(r#"{{"reactions": {}, "volume": 1.0, "flow_rate": 0.01}}"#, INLINE_REACTIONS);
        let both = format!(
            r#"{{"reaction": "Methanol Synthesis", "reactions": {}, "volume": 1.0, "flow_rate": 0.01}}"#,
            INLINE_REACTIONS
        );
        let neither = r#"{"volume": 1.0, "flow_rate": 0.01}"#;
        for json in [no_feed.as_str(), both.as_str(), neither] {
            let task = SimulationTask::from_json_str(json).unwrap();
            assert!(matches!(task.prepare(None), Err(CSTRError::Task(_))), "{}", json);
        }

        let unknown = SimulationTask::from_json_str(r#"{"reaction": "Cold Fusion", "volume": 1.0, "flow_rate": 0.01}"#)
            .unwrap();
        assert!(matches!(unknown.prepare(None), Err(CSTRError::ReactionNotFound(_))));

        let bad_volume =
            SimulationTask::from_json_str(r#"{"reaction": "Methanol Synthesis", "volume": -1.0, "flow_rate": 0.01}"#)
                .unwrap();
        assert!(matches!(bad_volume.prepare(None), Err(CSTRError::InvalidParameter { .. })));

        assert!(matches!(
            SimulationTask::from_json_str(r#"{"reaction": "Methanol Synthesis"}"#),
            Err(CSTRError::Json(_))
        ));
    }

    #[test]
    fn test_task_with_user_library() {
        let mut library_file = NamedTempFile::new().unwrap();
        write!(
            library_file,
            r#"{{"Isomerisation": {{"reactions": {}, "feed_composition": {{"A": 2.0}},
                "target_product": "B", "temperature_range": [320, 420]}}}}"#,
            INLINE_REACTIONS
        )
        .unwrap();
        let task = SimulationTask {
            library: Some(library_file.path().display().to_string()),
            reaction: Some("Isomerisation".to_string()),
            reactions: None,
            volume: 1.0,
            flow_rate: 0.01,
            recycle_ratio: 0.0,
            feed_composition: None,
            target_product: None,
            catalyst: None,
            temperature: None,
            optimize: false,
            temperature_bounds: None,
            output: None,
        };
        let prepared = task.prepare(None).unwrap();
        assert_eq!(prepared.config.feed("A"), 2.0);
        assert_eq!(prepared.settings.temperature, 370.0);

        // an explicit library wins over the task's own path
        let builtin = ReactionLibrary::builtin().unwrap();
        assert!(matches!(task.prepare(Some(&builtin)), Err(CSTRError::ReactionNotFound(_))));
    }

    #[test]
    fn test_template_is_a_valid_task() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cstr_task.json");
        create_template(&path).unwrap();
        let task = SimulationTask::from_file(&path).unwrap();
        assert_eq!(task.output.as_deref(), Some("cstr_result.json"));
        let prepared = task.prepare(None).unwrap();
        assert_eq!(prepared.settings.temperature, 650.0);
        assert_eq!(prepared.config.target_product.as_deref(), Some("H2"));
    }

    #[test]
    fn test_run_task_file_writes_result() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("result.json");
        let task_path = dir.path().join("task.json");
        let json = format!(
            r#"{{"reactions": {}, "feed_composition": {{"A": 1.0}}, "volume": 1.0, "flow_rate": 0.01,
                "target_product": "B", "temperature": 330.0, "output": {}}}"#,
            INLINE_REACTIONS,
            serde_json::to_string(&output.display().to_string()).unwrap()
        );
        fs::write(&task_path, json).unwrap();

        let (prepared, result) = run_task_file(&task_path).unwrap();
        assert_eq!(prepared.settings.temperature, 330.0);
        assert_eq!(result.temperature, 330.0);
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let written_yield = written["yield"].as_f64().unwrap();
        assert!((written_yield - result.yield_value).abs() < 1e-12);
        assert!(written["concentrations"]["B"].is_number());
    }
}
