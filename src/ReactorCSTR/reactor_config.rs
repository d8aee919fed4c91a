use super::cstr_error::CSTRError;
use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec, species_universe};
use serde::{Deserialize, Serialize};

/// Geometry, flow and feed of the reactor. Residence time is derived
/// from volume and flow rate, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorConfig {
    /// m³
    pub volume: f64,
    /// m³/s
    pub flow_rate: f64,
    /// fraction of the outlet routed back to the inlet, [0, 1)
    #[serde(default)]
    pub recycle_ratio: f64,
    /// mol/m³
    pub feed_composition: ConcentrationState,
    #[serde(default)]
    pub target_product: Option<String>,
    #[serde(default)]
    pub catalyst: Option<String>,
}

impl ReactorConfig {
    pub fn new(volume: f64, flow_rate: f64, feed_composition: ConcentrationState) -> Self {
        Self {
            volume,
            flow_rate,
            recycle_ratio: 0.0,
            feed_composition,
            target_product: None,
            catalyst: None,
        }
    }

    pub fn with_recycle(mut self, recycle_ratio: f64) -> Self {
        self.recycle_ratio = recycle_ratio;
        self
    }

    pub fn with_target_product(mut self, product: &str) -> Self {
        self.target_product = Some(product.to_string());
        self
    }

    pub fn with_catalyst(mut self, catalyst: &str) -> Self {
        self.catalyst = Some(catalyst.to_string());
        self
    }

    /// τ = V/F, s
    pub fn residence_time(&self) -> f64 {
        self.volume / self.flow_rate
    }

    /// Feed concentration of a species, zero when the feed does not contain it
    pub fn feed(&self, species: &str) -> f64 {
        self.feed_composition.get(species).copied().unwrap_or(0.0)
    }

    /// Checks the reactor together with its reaction set. Must pass before
    /// the solver is called: the solver itself does not report bad input.
    pub fn validate(&self, reactions: &[ReactionSpec]) -> Result<(), CSTRError> {
        if !(self.volume.is_finite() && self.volume > 0.0) {
            return Err(CSTRError::invalid("volume", "must be a positive number"));
        }
        if !(self.flow_rate.is_finite() && self.flow_rate > 0.0) {
            return Err(CSTRError::invalid("flow_rate", "must be a positive number"));
        }
        if !(self.recycle_ratio >= 0.0 && self.recycle_ratio < 1.0) {
            return Err(CSTRError::invalid("recycle_ratio", "must lie in [0, 1)"));
        }
        for (species, c) in self.feed_composition.iter() {
            if !(c.is_finite() && *c >= 0.0) {
                return Err(CSTRError::invalid(
                    &format!("feed_composition.{}", species),
                    "concentration must be finite and non-negative",
                ));
            }
        }
        if reactions.is_empty() {
            return Err(CSTRError::EmptyReactionList);
        }
        for reaction in reactions {
            validate_reaction(reaction)?;
        }
        if let Some(target) = &self.target_product {
            if !species_universe(reactions).contains(target) {
                return Err(CSTRError::UnknownTargetProduct(target.clone()));
            }
        }
        Ok(())
    }

    /// The optimiser maximises the target yield, so it cannot run without one
    pub fn require_target_product(&self) -> Result<&str, CSTRError> {
        self.target_product.as_deref().ok_or(CSTRError::MissingTargetProduct)
    }
}

fn validate_reaction(reaction: &ReactionSpec) -> Result<(), CSTRError> {
    let field = |name: &str| format!("reaction '{}'.{}", reaction.name, name);
    if reaction.stoichiometry.is_empty() {
        return Err(CSTRError::invalid(&field("stoichiometry"), "is empty"));
    }
    if reaction.stoichiometry.values().any(|nu| !nu.is_finite()) {
        return Err(CSTRError::invalid(&field("stoichiometry"), "coefficients must be finite"));
    }
    if !(reaction.frequency_factor.is_finite() && reaction.frequency_factor > 0.0) {
        return Err(CSTRError::invalid(&field("frequency_factor"), "must be a positive number"));
    }
    if !reaction.activation_energy.is_finite() {
        return Err(CSTRError::invalid(&field("activation_energy"), "must be finite"));
    }
    if reaction
        .reaction_order
        .values()
        .any(|n| !(n.is_finite() && *n >= 0.0))
    {
        return Err(CSTRError::invalid(&field("reaction_order"), "orders must be finite and non-negative"));
    }
    if reaction.reversible {
        match reaction.equilibrium_constant {
            None => return Err(CSTRError::MissingEquilibriumConstant(reaction.name.clone())),
            Some(k) if !(k.is_finite() && k > 0.0) => {
                return Err(CSTRError::invalid(&field("equilibrium_constant"), "must be a positive number"));
            }
            _ => {}
        }
        if !(reaction.reference_temperature.is_finite() && reaction.reference_temperature > 0.0) {
            return Err(CSTRError::invalid(&field("reference_temperature"), "must be a positive number"));
        }
    }
    Ok(())
}

/// Lower bound must be positive and strictly below the upper one.
pub fn validate_temperature_bounds(bounds: (f64, f64)) -> Result<(), CSTRError> {
    let (lower, upper) = bounds;
    if lower.is_finite() && upper.is_finite() && lower > 0.0 && lower < upper {
        Ok(())
    } else {
        Err(CSTRError::InvalidTemperatureBounds { lower, upper })
    }
}

pub fn validate_temperature(temperature: f64) -> Result<(), CSTRError> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(())
    } else {
        Err(CSTRError::InvalidTemperature(temperature))
    }
}
