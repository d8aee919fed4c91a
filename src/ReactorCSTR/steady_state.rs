//! Steady state of the CSTR mass balance
//!
//! ```text
//! 0 = F·(c_in,i − c_i) + V·Σ_j ν_ij·r_j   =>   c_i = c_in,i + τ·Σ_j ν_ij·r_j
//! ```
//! Without recycle `c_in` is the fresh feed and one explicit step is taken with
//! rates evaluated at feed composition. With recycle the inlet is the blend
//! `c_in = (1−ρ)·c_feed + ρ·c` and the balance is iterated as a fixed point.
//! Every step clips rates so no reactant can be consumed faster than it is
//! available within one residence time, floors concentrations at zero, and runs
//! the total-mole safeguard.
//!
//! Only species named in the stoichiometry are solved for. Feed-only species
//! (inerts) do not appear in the outlet, but without recycle they still count in
//! the inlet total the safeguard compares against.
use super::mass_balance::{enforce_total, enforce_total_moles};
use super::reactor_config::ReactorConfig;
use crate::Kinetics::rate_law::reaction_rate;
use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec, species_universe, total_concentration};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Iteration budget of the recycle fixed point
pub const MAX_RECYCLE_ITERATIONS: usize = 20;
/// Convergence threshold on max |c_new − c_old|, mol/m³
pub const RECYCLE_TOLERANCE: f64 = 1e-6;

/// Ordered list of species the solver works with: the union of the
/// stoichiometry keys of the reaction set.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesBasis {
    names: Vec<String>,
}

impl SpeciesBasis {
    pub fn new(reactions: &[ReactionSpec]) -> Self {
        Self {
            names: species_universe(reactions).into_iter().collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, species: &str) -> Option<usize> {
        self.names.binary_search_by(|s| s.as_str().cmp(species)).ok()
    }

    /// Missing species are zero
    pub fn vector_from(&self, state: &ConcentrationState) -> DVector<f64> {
        DVector::from_iterator(
            self.names.len(),
            self.names
                .iter()
                .map(|s| state.get(s).copied().unwrap_or(0.0)),
        )
    }

    pub fn state_from(&self, vector: &DVector<f64>) -> ConcentrationState {
        self.names
            .iter()
            .cloned()
            .zip(vector.iter().copied())
            .collect()
    }
}

/// Matrix of stoichiometric coefficients, one row per reaction, one column per species
pub fn stoichiometric_matrix(basis: &SpeciesBasis, reactions: &[ReactionSpec]) -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(reactions.len(), basis.len());
    for (i, reaction) in reactions.iter().enumerate() {
        for (species, nu) in reaction.stoichiometry.iter() {
            if let Some(j) = basis.index_of(species) {
                matrix[(i, j)] = *nu;
            }
        }
    }
    matrix
}

/// How the returned state was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// no recycle: explicit single step
    SinglePass,
    Converged { iterations: usize },
    /// budget exhausted; the state is the last estimate
    IterationLimit { iterations: usize, last_change: f64 },
}

impl ConvergenceStatus {
    pub fn is_converged(&self) -> bool {
        !matches!(self, ConvergenceStatus::IterationLimit { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SteadyState {
    pub temperature: f64,
    pub concentrations: ConcentrationState,
    pub convergence: ConvergenceStatus,
}

/// Steady-state solver bound to one reactor and one reaction set.
/// Holds only derived, immutable data, so `solve` is a pure function of the
/// temperature and one instance can serve a whole temperature sweep.
pub struct SteadyStateSolver<'a> {
    config: &'a ReactorConfig,
    reactions: &'a [ReactionSpec],
    basis: SpeciesBasis,
    stoichiometry: DMatrix<f64>,
    feed: DVector<f64>,
    /// every feed species, inerts included
    feed_total: f64,
    tau: f64,
}

impl<'a> SteadyStateSolver<'a> {
    pub fn new(config: &'a ReactorConfig, reactions: &'a [ReactionSpec]) -> Self {
        let basis = SpeciesBasis::new(reactions);
        let stoichiometry = stoichiometric_matrix(&basis, reactions);
        let feed = basis.vector_from(&config.feed_composition);
        Self {
            config,
            reactions,
            basis,
            stoichiometry,
            feed,
            feed_total: total_concentration(&config.feed_composition),
            tau: config.residence_time(),
        }
    }

    pub fn basis(&self) -> &SpeciesBasis {
        &self.basis
    }

    pub fn config(&self) -> &ReactorConfig {
        self.config
    }

    pub fn reactions(&self) -> &[ReactionSpec] {
        self.reactions
    }

    /// Rates of all reactions at `state`, each scaled down so that no reactant
    /// is consumed beyond c/(|ν|·τ).
    pub fn limited_rates(&self, state: &DVector<f64>, temperature: f64) -> DVector<f64> {
        let named = self.basis.state_from(state);
        let mut rates = DVector::zeros(self.reactions.len());
        for (i, reaction) in self.reactions.iter().enumerate() {
            let rate = reaction_rate(&named, temperature, reaction);
            let mut limiting_factor: f64 = 1.0;
            for (j, nu) in self.stoichiometry.row(i).iter().enumerate() {
                if *nu >= 0.0 {
                    continue;
                }
                let max_rate = state[j] / (nu.abs() * self.tau);
                if rate > max_rate {
                    limiting_factor = limiting_factor.min(max_rate / rate);
                }
            }
            rates[i] = rate * limiting_factor;
        }
        rates
    }

    /// Net generation per species, Sᵀ·r
    pub fn net_generation(&self, state: &DVector<f64>, temperature: f64) -> DVector<f64> {
        self.stoichiometry.transpose() * self.limited_rates(state, temperature)
    }

    /// c_out = max(0, c_in + τ·Sᵀ·r(rate_basis)), before the safeguard
    fn balance_step(&self, inlet: &DVector<f64>, rate_basis: &DVector<f64>, temperature: f64) -> DVector<f64> {
        let net = self.net_generation(rate_basis, temperature);
        (inlet + net * self.tau).map(|c| c.max(0.0))
    }

    pub fn solve(&self, temperature: f64) -> SteadyState {
        let r = self.config.recycle_ratio;
        if r <= 0.0 {
            let mut outlet = self.balance_step(&self.feed, &self.feed, temperature);
            if enforce_total(self.feed_total, &mut outlet) {
                debug!("total moles rescaled at T = {} K", temperature);
            }
            return SteadyState {
                temperature,
                concentrations: self.basis.state_from(&outlet),
                convergence: ConvergenceStatus::SinglePass,
            };
        }

        let mut current = self.feed.clone();
        let mut last_change = f64::INFINITY;
        for iteration in 1..=MAX_RECYCLE_ITERATIONS {
            let inlet = &self.feed * (1.0 - r) + &current * r;
            let mut new = self.balance_step(&inlet, &current, temperature);
            if enforce_total_moles(&inlet, &mut new) {
                debug!("total moles rescaled at T = {} K", temperature);
            }
            let change = (&new - &current).amax();
            debug!(
                "recycle iteration {} at T = {} K: max change {:e}",
                iteration, temperature, change
            );
            if change < RECYCLE_TOLERANCE {
                return SteadyState {
                    temperature,
                    concentrations: self.basis.state_from(&new),
                    convergence: ConvergenceStatus::Converged { iterations: iteration },
                };
            }
            current = new;
            last_change = change;
        }
        warn!(
            "recycle loop did not converge in {} iterations at T = {} K (last change {:e})",
            MAX_RECYCLE_ITERATIONS, temperature, last_change
        );
        SteadyState {
            temperature,
            concentrations: self.basis.state_from(&current),
            convergence: ConvergenceStatus::IterationLimit {
                iterations: MAX_RECYCLE_ITERATIONS,
                last_change,
            },
        }
    }
}

/// Outlet composition at `temperature`. Pure: no state survives between calls.
pub fn solve_steady_state(config: &ReactorConfig, reactions: &[ReactionSpec], temperature: f64) -> SteadyState {
    SteadyStateSolver::new(config, reactions).solve(temperature)
}
