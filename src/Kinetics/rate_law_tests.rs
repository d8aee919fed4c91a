#[cfg(test)]
mod tests {
    use crate::Kinetics::rate_law::*;
    use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec, species_universe};
    use approx::assert_relative_eq;

    fn a_to_b() -> ReactionSpec {
        ReactionSpec::new(
            "A to B",
            &[("A", -1.0), ("B", 1.0)],
            1e10,
            80000.0,
            &[("A", 1.0)],
        )
    }

    fn state(pairs: &[(&str, f64)]) -> ConcentrationState {
        pairs.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn test_arrhenius_first_order() {
        let reaction = a_to_b();
        let conc = state(&[("A", 1.0), ("B", 0.0)]);
        let rate = reaction_rate(&conc, 350.0, &reaction);
        let expected = 1e10 * f64::exp(-80000.0 / (R * 350.0));
        assert_relative_eq!(rate, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_non_positive_temperature_gives_zero_rate() {
        let reaction = a_to_b();
        let conc = state(&[("A", 1.0)]);
        assert_eq!(reaction_rate(&conc, 0.0, &reaction), 0.0);
        assert_eq!(reaction_rate(&conc, -10.0, &reaction), 0.0);
        assert_eq!(rate_constant(&reaction, 0.0), 0.0);
    }

    #[test]
    fn test_rate_constant_is_capped() {
        let mut reaction = a_to_b();
        reaction.frequency_factor = 1e20;
        reaction.activation_energy = 0.0;
        assert_eq!(rate_constant(&reaction, 500.0), MAX_RATE_CONSTANT);
    }

    #[test]
    fn test_exponent_clamp_prevents_overflow() {
        // -Ea/RT = +1e6/(R·1) would overflow without the clamp
        let mut reaction = a_to_b();
        reaction.activation_energy = -1e6;
        reaction.frequency_factor = 1e-300;
        let k = rate_constant(&reaction, 1.0);
        assert!(k.is_finite());
        assert_relative_eq!(k, 1e-300 * f64::exp(700.0), max_relative = 1e-12);
    }

    #[test]
    fn test_rate_ceiling() {
        let mut reaction = a_to_b();
        reaction.activation_energy = 1000.0;
        let conc = state(&[("A", 1000.0)]);
        assert_eq!(reaction_rate(&conc, 800.0, &reaction), MAX_REACTION_RATE);
    }

    #[test]
    fn test_concentration_floor_for_fractional_order() {
        let reaction = ReactionSpec::new(
            "half order",
            &[("A", -1.0), ("B", 1.0)],
            1e3,
            0.0,
            &[("A", 0.5)],
        );
        let zero = state(&[("A", 0.0)]);
        let negative = state(&[("A", -5.0)]);
        let expected = 1e3 * CONCENTRATION_FLOOR.powf(0.5);
        assert_relative_eq!(reaction_rate(&zero, 400.0, &reaction), expected, max_relative = 1e-12);
        assert_relative_eq!(reaction_rate(&negative, 400.0, &reaction), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_species_absent_from_state_is_ignored_in_rate() {
        let reaction = ReactionSpec::new(
            "catalysed",
            &[("A", -1.0), ("B", 1.0)],
            10.0,
            0.0,
            &[("A", 1.0), ("Cat", 2.0)],
        );
        let conc = state(&[("A", 2.0)]);
        assert_relative_eq!(reaction_rate(&conc, 300.0, &reaction), 20.0);
    }

    #[test]
    fn test_reversible_rate_driving_force() {
        let reaction = ReactionSpec::new(
            "A = B",
            &[("A", -1.0), ("B", 1.0)],
            10.0,
            0.0,
            &[("A", 1.0)],
        )
        .with_equilibrium(4.0);
        // Q = 2/1 = 2, factor = 1 - 2/4 = 0.5
        let conc = state(&[("A", 1.0), ("B", 2.0)]);
        assert_relative_eq!(reaction_rate(&conc, 300.0, &reaction), 10.0 * 0.5);
        // at equilibrium the net rate vanishes
        let eq = state(&[("A", 1.0), ("B", 4.0)]);
        assert_relative_eq!(reaction_rate(&eq, 300.0, &reaction), 0.0, epsilon = 1e-12);
        // past equilibrium the reversible rate runs backwards
        let past = state(&[("A", 1.0), ("B", 8.0)]);
        assert!(reaction_rate(&past, 300.0, &reaction) < 0.0);
    }

    #[test]
    fn test_reaction_quotient_skips_empty_species() {
        let reaction = ReactionSpec::new(
            "2A = B + C",
            &[("A", -2.0), ("B", 1.0), ("C", 1.0)],
            1.0,
            0.0,
            &[("A", 2.0)],
        );
        let conc = state(&[("A", 2.0), ("B", 3.0), ("C", 0.0)]);
        assert_relative_eq!(reaction_quotient(&conc, &reaction), 3.0 / 4.0);
    }

    #[test]
    fn test_vant_hoff_correction() {
        let reaction = ReactionSpec::new("exo", &[("A", -1.0), ("B", 1.0)], 1.0, 0.0, &[("A", 1.0)])
            .with_equilibrium(100.0)
            .with_heat_of_reaction(-50000.0, 298.15);
        let t = 400.0;
        let expected = 100.0 * f64::exp((-50000.0 / R) * (1.0 / 298.15 - 1.0 / t));
        assert_relative_eq!(equilibrium_constant(&reaction, t), expected, max_relative = 1e-12);
        // exothermic: K_eq falls with temperature
        assert!(equilibrium_constant(&reaction, 500.0) < equilibrium_constant(&reaction, 400.0));
    }

    #[test]
    fn test_equilibrium_constant_floor() {
        let reaction = ReactionSpec::new("tiny", &[("A", -1.0), ("B", 1.0)], 1.0, 0.0, &[("A", 1.0)])
            .with_equilibrium(0.0);
        assert_eq!(equilibrium_constant(&reaction, 300.0), MIN_EQUILIBRIUM_CONSTANT);
    }

    #[test]
    fn test_irreversible_rate_bounds_over_sweep() {
        let reaction = ReactionSpec::new(
            "mixed order",
            &[("A", -1.0), ("B", -0.5), ("C", 1.0)],
            3.5e12,
            140000.0,
            &[("A", 0.6), ("B", 0.4)],
        );
        for t in [1.0, 50.0, 300.0, 600.0, 1200.0, 5000.0, 1e6] {
            for c in [0.0, 1e-12, 0.5, 10.0, 1e4] {
                let conc = state(&[("A", c), ("B", c), ("C", c)]);
                let rate = reaction_rate(&conc, t, &reaction);
                assert!(rate >= 0.0 && rate <= MAX_REACTION_RATE, "rate {} at T={}", rate, t);
            }
        }
    }

    #[test]
    fn test_reversible_rate_never_exceeds_ceiling() {
        let reaction = ReactionSpec::new(
            "N2 + 3H2 = 2NH3",
            &[("N2", -1.0), ("H2", -3.0), ("NH3", 2.0)],
            8.85e9,
            88000.0,
            &[("N2", 1.0), ("H2", 0.5)],
        )
        .with_equilibrium(6.3e-2);
        for t in [300.0, 600.0, 800.0, 2000.0] {
            let conc = state(&[("N2", 100.0), ("H2", 300.0), ("NH3", 0.0)]);
            let rate = reaction_rate(&conc, t, &reaction);
            assert!(rate.is_finite());
            assert!(rate <= MAX_REACTION_RATE);
        }
    }

    #[test]
    fn test_species_universe_is_union_of_stoichiometry_keys() {
        let r1 = a_to_b();
        let r2 = ReactionSpec::new("B to C", &[("B", -1.0), ("C", 1.0)], 1.0, 0.0, &[("B", 1.0)]);
        let universe: Vec<String> = species_universe(&[r1, r2]).into_iter().collect();
        assert_eq!(universe, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_reaction_spec_from_catalogue_json() {
        let json = r#"{
            "name": "SO2 oxidation",
            "stoichiometry": {"SO2": -2, "O2": -1, "SO3": 2},
            "frequency_factor": 1.2e11,
            "activation_energy": 113000,
            "reaction_order": {"SO2": 1, "O2": 1},
            "reversible": true,
            "equilibrium_constant": 3.6e4,
            "heat_of_reaction": -98000
        }"#;
        let reaction: ReactionSpec = serde_json::from_str(json).unwrap();
        assert!(reaction.reversible);
        assert_eq!(reaction.coefficient("SO2"), -2.0);
        assert_eq!(reaction.reference_temperature, 298.15);
        assert_eq!(reaction.heat_of_reaction, Some(-98000.0));
        assert_eq!(reaction.reactants().count(), 2);
        assert_eq!(reaction.products().count(), 1);
    }
}
