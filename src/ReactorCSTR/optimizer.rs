//! Search for the operating temperature that maximises the yield of the target
//! product.
//!
//! The search is a small state machine:
//!
//! | stage         | work                                                        | next                         |
//! |---------------|-------------------------------------------------------------|------------------------------|
//! | `CoarseScan`  | yield at 10 evenly spaced temperatures over the bounds      | `LocalRefine`                |
//! | `LocalRefine` | bounded quasi-Newton from the best coarse point             | `FineRescan` if gain ≤ 1 %, else `Done` |
//! | `FineRescan`  | 20-point grid in ±50 K around the coarse best, then a tighter bounded quasi-Newton from the best point | `Done` |
//!
//! The yield landscape is usually unimodal, but the rate clamps of the kinetics
//! produce flat plateaus where a gradient method stalls; the rescan is the
//! escalation for that case.
use super::cstr_error::CSTRError;
use super::performance::target_yield;
use super::reactor_config::{ReactorConfig, validate_temperature_bounds};
use super::steady_state::{SteadyState, SteadyStateSolver};
use crate::Kinetics::reaction_spec::ReactionSpec;
use log::{debug, info};
use std::cell::Cell;

pub const COARSE_POINTS: usize = 10;
pub const FINE_POINTS: usize = 20;
/// half width of the fine rescan window, K
pub const FINE_WINDOW: f64 = 50.0;
/// refined yield must beat the coarse best by more than this factor
pub const IMPROVEMENT_FACTOR: f64 = 1.01;

/// Stopping rules of the bounded local minimiser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearchOptions {
    /// relative reduction of f below which the search stops
    pub ftol: f64,
    /// projected gradient norm below which the search stops
    pub gtol: f64,
    pub max_iter: usize,
    /// budget of objective evaluations, gradient probes included
    pub max_fun: usize,
    /// finite-difference step
    pub eps: f64,
}

impl LocalSearchOptions {
    pub const REFINE: LocalSearchOptions = LocalSearchOptions {
        ftol: 1e-8,
        gtol: 1e-6,
        max_iter: 100,
        max_fun: 200,
        eps: 0.1,
    };
    pub const FINE: LocalSearchOptions = LocalSearchOptions {
        ftol: 1e-10,
        gtol: 1e-8,
        max_iter: 200,
        max_fun: 400,
        eps: 0.01,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalMinimum {
    pub x: f64,
    pub f: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

struct CountedObjective<F: FnMut(f64) -> f64> {
    f: F,
    evaluations: usize,
}

impl<F: FnMut(f64) -> f64> CountedObjective<F> {
    fn eval(&mut self, x: f64) -> f64 {
        self.evaluations += 1;
        (self.f)(x)
    }

    /// one-sided difference, stepping inwards at the upper bound
    fn gradient(&mut self, x: f64, fx: f64, bounds: (f64, f64), eps: f64) -> f64 {
        let h = if x + eps <= bounds.1 { eps } else { -eps };
        let x_probe = (x + h).max(bounds.0).min(bounds.1);
        if x_probe == x {
            return 0.0;
        }
        (self.eval(x_probe) - fx) / (x_probe - x)
    }
}

/// Minimises a scalar function on `[bounds.0, bounds.1]` starting from `x0`.
///
/// One-dimensional projected quasi-Newton method: finite-difference gradient,
/// inverse curvature from the secant of successive gradients (BFGS in 1-D),
/// Armijo backtracking along the projected step. The first trial step has unit
/// length. Never leaves the bounds.
pub fn minimize_bounded<F: FnMut(f64) -> f64>(
    f: F,
    x0: f64,
    bounds: (f64, f64),
    options: LocalSearchOptions,
) -> LocalMinimum {
    let (lower, upper) = bounds;
    let mut objective = CountedObjective { f, evaluations: 0 };
    let mut x = x0.max(lower).min(upper);
    let mut fx = objective.eval(x);
    let mut g = objective.gradient(x, fx, bounds, options.eps);
    let mut inverse_curvature = if g != 0.0 { 1.0 / g.abs() } else { 1.0 };
    let mut iterations = 0;

    while iterations < options.max_iter && objective.evaluations < options.max_fun {
        let projected_gradient = if (x <= lower && g > 0.0) || (x >= upper && g < 0.0) {
            0.0
        } else {
            g
        };
        if !projected_gradient.is_finite() || projected_gradient.abs() <= options.gtol {
            break;
        }
        iterations += 1;

        let direction = -inverse_curvature * g;
        let mut step = 1.0;
        let mut accepted = None;
        while objective.evaluations < options.max_fun && step > 1e-10 {
            let x_trial = (x + step * direction).max(lower).min(upper);
            if x_trial == x {
                break;
            }
            let f_trial = objective.eval(x_trial);
            if f_trial <= fx + 1e-4 * g * (x_trial - x) {
                accepted = Some((x_trial, f_trial));
                break;
            }
            step *= 0.5;
        }
        let Some((x_new, f_new)) = accepted else {
            break;
        };

        let reduction = (fx - f_new) / fx.abs().max(f_new.abs()).max(1.0);
        if reduction <= options.ftol {
            x = x_new;
            fx = f_new;
            break;
        }
        let g_new = objective.gradient(x_new, f_new, bounds, options.eps);
        let s = x_new - x;
        let y = g_new - g;
        if s * y > f64::EPSILON * s.abs() * y.abs().max(1.0) {
            inverse_curvature = s / y;
        } else {
            // no positive curvature: widen the next trial step
            inverse_curvature *= 2.0;
        }
        x = x_new;
        fx = f_new;
        g = g_new;
    }

    LocalMinimum {
        x,
        f: fx,
        iterations,
        evaluations: objective.evaluations,
    }
}

/// `n` evenly spaced points from `a` to `b`, both ends included
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => (0..n)
            .map(|i| a + (b - a) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerStage {
    CoarseScan,
    LocalRefine,
    FineRescan,
    Done,
}

/// Escalation rule of `LocalRefine`: rescan when the refined yield is not
/// more than 1 % above the coarse best.
pub fn needs_fine_rescan(coarse_best_yield: f64, refined_yield: f64) -> bool {
    refined_yield <= coarse_best_yield * IMPROVEMENT_FACTOR
}

/// Window of the fine rescan: ±50 K around `center`, clipped to `bounds`
pub fn fine_window(center: f64, bounds: (f64, f64)) -> (f64, f64) {
    (
        bounds.0.max(center - FINE_WINDOW),
        bounds.1.min(center + FINE_WINDOW),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub temperature: f64,
    pub yield_value: f64,
    /// steady state re-solved at `temperature`
    pub steady_state: SteadyState,
    pub coarse_best: (f64, f64),
    /// stages in the order they ran
    pub stages: Vec<OptimizerStage>,
    pub evaluations: usize,
}

pub struct TemperatureOptimizer<'a> {
    solver: SteadyStateSolver<'a>,
    bounds: (f64, f64),
    evaluations: Cell<usize>,
}

impl<'a> TemperatureOptimizer<'a> {
    pub fn new(config: &'a ReactorConfig, reactions: &'a [ReactionSpec], bounds: (f64, f64)) -> Self {
        Self {
            solver: SteadyStateSolver::new(config, reactions),
            bounds,
            evaluations: Cell::new(0),
        }
    }

    /// Yield of the target product at steady state at `temperature`
    pub fn yield_at(&self, temperature: f64) -> f64 {
        self.evaluations.set(self.evaluations.get() + 1);
        let state = self.solver.solve(temperature);
        target_yield(self.solver.config(), self.solver.reactions(), &state.concentrations)
    }

    /// best (temperature, yield) of a grid; the first point wins ties
    fn scan(&self, points: &[f64], mut best: (f64, f64)) -> (f64, f64) {
        for &t in points {
            let y = self.yield_at(t);
            if y > best.1 {
                best = (t, y);
            }
        }
        best
    }

    fn refine(&self, start: f64, bounds: (f64, f64), options: LocalSearchOptions) -> (f64, f64) {
        let m = minimize_bounded(|t| -self.yield_at(t), start, bounds, options);
        (m.x, -m.f)
    }

    pub fn run(&self) -> OptimizationOutcome {
        let bounds = self.bounds;
        info!("temperature optimisation over [{}, {}] K", bounds.0, bounds.1);
        let mut stage = OptimizerStage::CoarseScan;
        let mut stages = Vec::new();
        let mut coarse_best = (bounds.0, -1.0);
        let mut optimum = (bounds.0, -1.0);

        loop {
            stages.push(stage);
            stage = match stage {
                OptimizerStage::CoarseScan => {
                    coarse_best = self.scan(&linspace(bounds.0, bounds.1, COARSE_POINTS), coarse_best);
                    debug!("coarse scan best: T = {} K, yield = {}", coarse_best.0, coarse_best.1);
                    OptimizerStage::LocalRefine
                }
                OptimizerStage::LocalRefine => {
                    optimum = self.refine(coarse_best.0, bounds, LocalSearchOptions::REFINE);
                    debug!("local refinement: T = {} K, yield = {}", optimum.0, optimum.1);
                    if needs_fine_rescan(coarse_best.1, optimum.1) {
                        OptimizerStage::FineRescan
                    } else {
                        OptimizerStage::Done
                    }
                }
                OptimizerStage::FineRescan => {
                    let window = fine_window(coarse_best.0, bounds);
                    optimum = self.scan(&linspace(window.0, window.1, FINE_POINTS), optimum);
                    let second = self.refine(optimum.0, window, LocalSearchOptions::FINE);
                    debug!(
                        "fine rescan in [{}, {}] K: grid best T = {} K, refined T = {} K",
                        window.0, window.1, optimum.0, second.0
                    );
                    if second.1 > optimum.1 {
                        optimum = second;
                    }
                    OptimizerStage::Done
                }
                OptimizerStage::Done => break,
            };
        }

        let temperature = optimum.0;
        let steady_state = self.solver.solve(temperature);
        let yield_value = target_yield(
            self.solver.config(),
            self.solver.reactions(),
            &steady_state.concentrations,
        );
        info!(
            "optimal temperature {:.2} K, yield {:.4} ({} evaluations)",
            temperature,
            yield_value,
            self.evaluations.get()
        );
        OptimizationOutcome {
            temperature,
            yield_value,
            steady_state,
            coarse_best,
            stages,
            evaluations: self.evaluations.get(),
        }
    }
}

/// Validates the input and returns the yield-maximising temperature with the
/// steady state at that temperature.
pub fn optimize_temperature(
    config: &ReactorConfig,
    reactions: &[ReactionSpec],
    bounds: (f64, f64),
) -> Result<OptimizationOutcome, CSTRError> {
    config.validate(reactions)?;
    config.require_target_product()?;
    validate_temperature_bounds(bounds)?;
    Ok(TemperatureOptimizer::new(config, reactions, bounds).run())
}
