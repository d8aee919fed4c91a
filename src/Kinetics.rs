/// Definition of a reaction as it comes from the reaction catalogue: signed
/// stoichiometric coefficients, Arrhenius parameters, power-law reaction orders,
/// and equilibrium data for reversible reactions.
///
/// # Examples
/// ```
/// use KiCSTR::Kinetics::reaction_spec::ReactionSpec;
/// let reaction = ReactionSpec::new("A to B", &[("A", -1.0), ("B", 1.0)], 1e10, 80000.0, &[("A", 1.0)]);
/// assert_eq!(reaction.coefficient("A"), -1.0);
/// ```
pub mod reaction_spec;
/// Instantaneous volumetric reaction rate with the numerical safeguards used by
/// the steady-state solver (exponent clamp, rate constant cap, concentration floor,
/// rate ceiling).
///
/// # Examples
/// ```
/// use KiCSTR::Kinetics::reaction_spec::ReactionSpec;
/// use KiCSTR::Kinetics::rate_law::reaction_rate;
/// use std::collections::BTreeMap;
/// let reaction = ReactionSpec::new("A to B", &[("A", -1.0), ("B", 1.0)], 1e10, 80000.0, &[("A", 1.0)]);
/// let conc: BTreeMap<String, f64> = [("A".to_string(), 1.0)].into_iter().collect();
/// let r = reaction_rate(&conc, 350.0, &reaction);
/// assert!(r > 0.0 && r <= 100.0);
/// ```
pub mod rate_law;
mod rate_law_tests;
