use super::cstr_error::CSTRError;
use super::mass_balance::{ElementalBalance, elemental_balance, mass_balance_error};
use super::optimizer::TemperatureOptimizer;
use super::performance::{ReactionRateEntry, conversion, reaction_rates, target_yield};
use super::reactor_config::{ReactorConfig, validate_temperature, validate_temperature_bounds};
use super::steady_state::{ConvergenceStatus, SteadyStateSolver};
use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TEMPERATURE_BOUNDS: (f64, f64) = (300.0, 1000.0);

/// What to do with a reactor: solve at `temperature`, or search
/// `temperature_bounds` for the best yield when `optimize` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// K
    pub temperature: f64,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default = "default_bounds")]
    pub temperature_bounds: (f64, f64),
}

fn default_bounds() -> (f64, f64) {
    DEFAULT_TEMPERATURE_BOUNDS
}

impl SimulationSettings {
    pub fn at_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            optimize: false,
            temperature_bounds: DEFAULT_TEMPERATURE_BOUNDS,
        }
    }

    pub fn optimized(temperature: f64, bounds: (f64, f64)) -> Self {
        Self {
            temperature,
            optimize: true,
            temperature_bounds: bounds,
        }
    }
}

/// Record handed to front ends after one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// K
    pub temperature: f64,
    pub concentrations: ConcentrationState,
    /// outlet scaled by the recycle ratio
    pub recycle_stream: ConcentrationState,
    #[serde(rename = "yield")]
    pub yield_value: f64,
    pub reaction_rates: Vec<ReactionRateEntry>,
    pub conversions: BTreeMap<String, f64>,
    /// s
    pub residence_time: f64,
    pub catalyst: Option<String>,
    pub mass_balance_error: f64,
    pub elemental_balance: ElementalBalance,
    pub convergence: ConvergenceStatus,
}

impl SimulationResult {
    pub fn to_json(&self) -> Result<String, CSTRError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn converged(&self) -> bool {
        self.convergence.is_converged()
    }
}

/// Full run: validate, then either solve at `settings.temperature` or, with
/// `settings.optimize`, take the optimiser's steady state over
/// `settings.temperature_bounds`. The final state is reduced to a
/// [`SimulationResult`].
pub fn run_simulation(
    config: &ReactorConfig,
    reactions: &[ReactionSpec],
    settings: &SimulationSettings,
) -> Result<SimulationResult, CSTRError> {
    config.validate(reactions)?;
    validate_temperature(settings.temperature)?;
    if settings.optimize {
        config.require_target_product()?;
        validate_temperature_bounds(settings.temperature_bounds)?;
    }
    info!(
        "CSTR run: V = {} m³, F = {} m³/s, recycle = {}, {} reaction(s)",
        config.volume,
        config.flow_rate,
        config.recycle_ratio,
        reactions.len()
    );

    let final_state = if settings.optimize {
        TemperatureOptimizer::new(config, reactions, settings.temperature_bounds)
            .run()
            .steady_state
    } else {
        SteadyStateSolver::new(config, reactions).solve(settings.temperature)
    };

    let temperature = final_state.temperature;
    let concentrations = final_state.concentrations;
    let recycle_stream = concentrations
        .iter()
        .map(|(species, c)| (species.clone(), c * config.recycle_ratio))
        .collect();
    let result = SimulationResult {
        temperature,
        yield_value: target_yield(config, reactions, &concentrations),
        reaction_rates: reaction_rates(reactions, &concentrations, temperature),
        conversions: conversion(&config.feed_composition, &concentrations),
        residence_time: config.residence_time(),
        catalyst: config.catalyst.clone(),
        mass_balance_error: mass_balance_error(&config.feed_composition, &concentrations),
        elemental_balance: elemental_balance(&config.feed_composition, &concentrations),
        convergence: final_state.convergence,
        recycle_stream,
        concentrations,
    };
    info!(
        "CSTR run finished: T = {:.2} K, yield = {:.4}",
        result.temperature, result.yield_value
    );
    Ok(result)
}
