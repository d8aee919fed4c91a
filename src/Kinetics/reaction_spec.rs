use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Species name -> concentration, mol/m³.
/// Sorted map so that every sweep over species is reproducible.
pub type ConcentrationState = BTreeMap<String, f64>;

fn default_reference_temperature() -> f64 {
    298.15
}

/// Immutable definition of one reaction: stoichiometry plus Arrhenius and
/// equilibrium data. Field names follow the JSON keys of the reaction catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSpec {
    #[serde(default)]
    pub name: String,
    /// signed coefficients: negative = consumed, positive = produced
    pub stoichiometry: BTreeMap<String, f64>,
    /// pre-exponential factor A
    pub frequency_factor: f64,
    /// Ea, J/mol
    pub activation_energy: f64,
    /// exponents of the power-law rate expression
    pub reaction_order: BTreeMap<String, f64>,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub equilibrium_constant: Option<f64>,
    /// ΔH, J/mol; enables van't Hoff correction of K_eq
    #[serde(default)]
    pub heat_of_reaction: Option<f64>,
    #[serde(default = "default_reference_temperature")]
    pub reference_temperature: f64,
}

impl ReactionSpec {
    /// Irreversible reaction with the given stoichiometry and orders.
    pub fn new(
        name: &str,
        stoichiometry: &[(&str, f64)],
        frequency_factor: f64,
        activation_energy: f64,
        reaction_order: &[(&str, f64)],
    ) -> Self {
        Self {
            name: name.to_string(),
            stoichiometry: stoichiometry
                .iter()
                .map(|(s, nu)| (s.to_string(), *nu))
                .collect(),
            frequency_factor,
            activation_energy,
            reaction_order: reaction_order
                .iter()
                .map(|(s, n)| (s.to_string(), *n))
                .collect(),
            reversible: false,
            equilibrium_constant: None,
            heat_of_reaction: None,
            reference_temperature: default_reference_temperature(),
        }
    }

    /// Turns the reaction into a reversible one with equilibrium constant `k_eq`
    pub fn with_equilibrium(mut self, k_eq: f64) -> Self {
        self.reversible = true;
        self.equilibrium_constant = Some(k_eq);
        self
    }

    pub fn with_heat_of_reaction(mut self, dh: f64, reference_temperature: f64) -> Self {
        self.heat_of_reaction = Some(dh);
        self.reference_temperature = reference_temperature;
        self
    }

    pub fn reactants(&self) -> impl Iterator<Item = (&String, f64)> {
        self.stoichiometry
            .iter()
            .filter(|(_, nu)| **nu < 0.0)
            .map(|(s, nu)| (s, *nu))
    }

    pub fn products(&self) -> impl Iterator<Item = (&String, f64)> {
        self.stoichiometry
            .iter()
            .filter(|(_, nu)| **nu > 0.0)
            .map(|(s, nu)| (s, *nu))
    }

    pub fn coefficient(&self, species: &str) -> f64 {
        self.stoichiometry.get(species).copied().unwrap_or(0.0)
    }
}

/// Union of all stoichiometry keys of the reactions, sorted.
pub fn species_universe(reactions: &[ReactionSpec]) -> BTreeSet<String> {
    reactions
        .iter()
        .flat_map(|r| r.stoichiometry.keys().cloned())
        .collect()
}

/// Sum of all concentrations of a state
pub fn total_concentration(state: &ConcentrationState) -> f64 {
    state.values().sum()
}
