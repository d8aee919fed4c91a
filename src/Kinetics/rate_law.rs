//! Power-law rate expression with Arrhenius rate constant and an optional
//! equilibrium correction for reversible reactions.
//!
//! ```text
//! k    = A·exp(-Ea/(R·T))
//! r    = k·Π c_i^n_i
//! r   *= 1 - Q/K_eq(T)                      (reversible only)
//! K_eq(T) = K_eq·exp((ΔH/R)(1/T_ref - 1/T)) (van't Hoff, when ΔH is given)
//! ```
//!
//! Optimisation sweeps push the expression into regions where the exponentials
//! overflow and fractional powers of zero misbehave, so every intermediate
//! quantity is bounded by one of the policy constants below. The values are part
//! of the model: changing them changes every result.
use super::reaction_spec::{ConcentrationState, ReactionSpec};

/// Universal gas constant, J/(mol·K)
pub const R: f64 = 8.314;
/// Bound on |exponent| passed to `exp` (Arrhenius and van't Hoff terms)
pub const EXPONENT_LIMIT: f64 = 700.0;
/// Upper bound of the rate constant k in the model's unit system
pub const MAX_RATE_CONSTANT: f64 = 1e12;
/// Floor applied to a concentration before it is raised to its reaction order
pub const CONCENTRATION_FLOOR: f64 = 1e-10;
/// Floor of the effective equilibrium constant
pub const MIN_EQUILIBRIUM_CONSTANT: f64 = 1e-10;
/// Ceiling of any reaction rate, mol/(m³·s)
pub const MAX_REACTION_RATE: f64 = 100.0;

fn clamp_exponent(x: f64) -> f64 {
    x.max(-EXPONENT_LIMIT).min(EXPONENT_LIMIT)
}

/// Arrhenius rate constant bounded by [`MAX_RATE_CONSTANT`]. Zero for T <= 0.
pub fn rate_constant(reaction: &ReactionSpec, temperature: f64) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    let exponent = clamp_exponent(-reaction.activation_energy / (R * temperature));
    let k = reaction.frequency_factor * exponent.exp();
    k.min(MAX_RATE_CONSTANT)
}

/// Equilibrium constant at `temperature`, van't Hoff corrected when the reaction
/// carries a heat of reaction, floored at [`MIN_EQUILIBRIUM_CONSTANT`].
pub fn equilibrium_constant(reaction: &ReactionSpec, temperature: f64) -> f64 {
    let mut k_eq = reaction.equilibrium_constant.unwrap_or(MIN_EQUILIBRIUM_CONSTANT);
    if let Some(dh) = reaction.heat_of_reaction {
        let t_ref = reaction.reference_temperature;
        let vant_hoff = clamp_exponent((dh / R) * (1.0 / t_ref - 1.0 / temperature));
        k_eq *= vant_hoff.exp();
    }
    k_eq.max(MIN_EQUILIBRIUM_CONSTANT)
}

/// Reaction quotient: products over reactants, each raised to |ν|.
/// Species with zero (or absent) concentration are left out.
pub fn reaction_quotient(conc: &ConcentrationState, reaction: &ReactionSpec) -> f64 {
    let mut q = 1.0;
    for (species, nu) in reaction.stoichiometry.iter() {
        let c = conc.get(species).copied().unwrap_or(0.0);
        if c <= 0.0 {
            continue;
        }
        if *nu > 0.0 {
            q *= c.powf(nu.abs());
        } else if *nu < 0.0 {
            q /= c.powf(nu.abs());
        }
    }
    q
}

/// Volumetric rate of `reaction`, mol/(m³·s).
///
/// Irreversible reactions never return a negative rate. A reversible reaction
/// past equilibrium (Q > K_eq) returns a negative value, i.e. net backward
/// direction. The result never exceeds [`MAX_REACTION_RATE`].
pub fn reaction_rate(conc: &ConcentrationState, temperature: f64, reaction: &ReactionSpec) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    let mut rate = rate_constant(reaction, temperature);
    for (species, order) in reaction.reaction_order.iter() {
        if let Some(c) = conc.get(species) {
            rate *= c.max(CONCENTRATION_FLOOR).powf(*order);
        }
    }

    if reaction.reversible {
        let k_eq = equilibrium_constant(reaction, temperature);
        let q = reaction_quotient(conc, reaction);
        let driving_force = 1.0 - q / k_eq;
        // overflow or 0/0 in Q: keep the forward rate
        if q.is_finite() && driving_force.is_finite() {
            rate *= driving_force;
        }
    } else if rate < 0.0 {
        rate = 0.0;
    }
    if rate.is_nan() {
        return 0.0;
    }
    rate.min(MAX_REACTION_RATE)
}
