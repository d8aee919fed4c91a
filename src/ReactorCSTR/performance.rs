use super::reactor_config::ReactorConfig;
use crate::Kinetics::rate_law::reaction_rate;
use crate::Kinetics::reaction_spec::{ConcentrationState, ReactionSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fractional conversion (c_feed − c_out)/c_feed of every outlet species fed
/// with a positive concentration, reported in [0, 1]. Feed-only species are not
/// in the outlet and get no entry.
pub fn conversion(feed: &ConcentrationState, outlet: &ConcentrationState) -> BTreeMap<String, f64> {
    outlet
        .iter()
        .filter_map(|(species, c_out)| {
            let c_in = *feed.get(species)?;
            if c_in <= 0.0 {
                return None;
            }
            let x = (c_in - c_out) / c_in;
            Some((species.clone(), x.max(0.0).min(1.0)))
        })
        .collect()
}

/// Yield of `target` in [0, 1].
///
/// The first reaction producing `target` defines the limiting reactant: among
/// its reactants present in the feed, the one giving the smallest theoretical
/// amount of product c_feed·ν_target/|ν_reactant|.
/// yield = conversion(limiting) · selectivity, with
/// selectivity = c_target / (consumed · ν_target/|ν_limiting|).
pub fn product_yield(
    config: &ReactorConfig,
    reactions: &[ReactionSpec],
    outlet: &ConcentrationState,
    target: &str,
) -> f64 {
    let Some(reaction) = reactions.iter().find(|r| r.coefficient(target) > 0.0) else {
        return 0.0;
    };
    let target_stoich = reaction.coefficient(target);

    let mut limiting: Option<(&String, f64)> = None;
    let mut max_theoretical_product = f64::INFINITY;
    for (species, nu) in reaction.reactants() {
        let Some(c_feed) = config.feed_composition.get(species) else {
            continue;
        };
        let theoretical = c_feed * target_stoich / nu.abs();
        if theoretical < max_theoretical_product {
            max_theoretical_product = theoretical;
            limiting = Some((species, nu));
        }
    }
    let Some((limiting_reactant, limiting_stoich)) = limiting else {
        return 0.0;
    };

    let feed_conc = config.feed(limiting_reactant);
    if feed_conc <= 0.0 {
        return 0.0;
    }
    let exit_conc = outlet.get(limiting_reactant).copied().unwrap_or(0.0);
    let conversion = if config.recycle_ratio > 0.0 {
        // only the net fresh-feed throughput counts
        let net_feed = feed_conc * (1.0 - config.recycle_ratio);
        let net_exit = exit_conc * (1.0 - config.recycle_ratio);
        (net_feed - net_exit) / net_feed
    } else {
        (feed_conc - exit_conc) / feed_conc
    };

    let actual_product = outlet.get(target).copied().unwrap_or(0.0);
    let reactant_consumed = feed_conc * conversion;
    let selectivity = if reactant_consumed > 0.0 {
        actual_product / (reactant_consumed * target_stoich / limiting_stoich.abs())
    } else {
        0.0
    };
    // NaN collapses to 0
    (conversion * selectivity).max(0.0).min(1.0)
}

/// Yield of the configured target product; zero when none is set
pub fn target_yield(config: &ReactorConfig, reactions: &[ReactionSpec], outlet: &ConcentrationState) -> f64 {
    match &config.target_product {
        Some(target) => product_yield(config, reactions, outlet, target),
        None => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRateEntry {
    /// 1-based position in the reaction list
    pub index: usize,
    pub name: String,
    /// mol/(m³·s)
    pub rate: f64,
}

impl ReactionRateEntry {
    pub fn label(&self) -> String {
        format!("Reaction {}: {}", self.index, self.name)
    }
}

/// Rate of every reaction at the converged state, in reaction-list order
pub fn reaction_rates(
    reactions: &[ReactionSpec],
    state: &ConcentrationState,
    temperature: f64,
) -> Vec<ReactionRateEntry> {
    reactions
        .iter()
        .enumerate()
        .map(|(i, reaction)| ReactionRateEntry {
            index: i + 1,
            name: reaction.name.clone(),
            rate: reaction_rate(state, temperature, reaction),
        })
        .collect()
}
