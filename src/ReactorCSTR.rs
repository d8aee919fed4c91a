//! # Continuous Stirred-Tank Reactor (CSTR) Module
//!
//! Steady-state model of an isothermal, perfectly mixed reactor with an optional
//! recycle loop, and a search for the operating temperature that maximises the
//! yield of a target product.
//!
//! ## Mathematical Model
//!
//! ### Nomenclature
//!
//! | Symbol | Description | Units |
//! |--------|-------------|-------|
//! | `V` | Reactor volume | m³ |
//! | `F` | Volumetric flow rate | m³/s |
//! | `τ` | Residence time, `V/F` | s |
//! | `ρ` | Recycle ratio, fraction of the outlet returned to the inlet | - |
//! | `c_i` | Outlet concentration of species `i` | mol/m³ |
//! | `c_feed,i` | Fresh feed concentration | mol/m³ |
//! | `ν_ij` | Stoichiometric coefficient of species `i` in reaction `j` | - |
//! | `r_j` | Rate of reaction `j` | mol/(m³·s) |
//!
//! ### Governing Equations
//!
//! ```text
//! c_in,i = (1 − ρ)·c_feed,i + ρ·c_i
//! c_i    = c_in,i + τ·Σ_j ν_ij·r_j(c, T)
//! ```
//! Without recycle a single explicit step with rates at feed composition is
//! taken; with recycle the second equation is iterated as a fixed point
//! (at most 20 iterations, tolerance 1e-6 mol/m³ on the largest change).
//!
//! ### Model Assumptions
//!
//! - isothermal, no energy balance
//! - no pressure drop, no phase equilibria
//! - rates are clipped so that no reactant is consumed beyond its availability
//!   within one residence time
//! - total outlet concentration may not exceed the inlet total by more than 1 %
//!
//! ## Module Layout
//!
//! - [`reactor_config`] reactor geometry, feed, validation
//! - [`steady_state`] fixed point solver of the balance
//! - [`mass_balance`] total-mole safeguard and balance report
//! - [`performance`] conversion, yield, reaction rates at the solution
//! - [`optimizer`] coarse scan / local refine / fine rescan temperature search
//! - [`simulation`] one complete run reduced to a serializable result
//! - [`task_parser`] JSON task files
//! - [`cstr_output`] tables for the terminal
//!
//! ## Example
//! ```
//! use KiCSTR::Kinetics::reaction_spec::ReactionSpec;
//! use KiCSTR::ReactorCSTR::reactor_config::ReactorConfig;
//! use KiCSTR::ReactorCSTR::simulation::{SimulationSettings, run_simulation};
//! use std::collections::BTreeMap;
//!
//! let reactions = vec![ReactionSpec::new("A to B", &[("A", -1.0), ("B", 1.0)], 1e10, 80000.0, &[("A", 1.0)])];
//! let feed = BTreeMap::from([("A".to_string(), 1.0)]);
//! let config = ReactorConfig::new(1.0, 0.01, feed).with_target_product("B");
//! let result = run_simulation(&config, &reactions, &SimulationSettings::at_temperature(350.0)).unwrap();
//! assert!(result.yield_value >= 0.0 && result.yield_value <= 1.0);
//! ```
pub mod cstr_error;
pub mod cstr_output;
pub mod mass_balance;
pub mod optimizer;
pub mod performance;
pub mod reactor_config;
pub mod simulation;
pub mod steady_state;
pub mod task_parser;
