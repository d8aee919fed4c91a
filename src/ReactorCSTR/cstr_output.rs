use super::reactor_config::ReactorConfig;
use super::simulation::SimulationResult;
use super::steady_state::ConvergenceStatus;
use prettytable::{Table, row};

fn convergence_label(status: &ConvergenceStatus) -> String {
    match status {
        ConvergenceStatus::SinglePass => "single pass (no recycle)".to_string(),
        ConvergenceStatus::Converged { iterations } => format!("converged in {} iterations", iterations),
        ConvergenceStatus::IterationLimit { iterations, last_change } => format!(
            "NOT converged after {} iterations (last change {:.3e})",
            iterations, last_change
        ),
    }
}

/// Operating point summary
pub fn operating_point_table(result: &SimulationResult, config: &ReactorConfig) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Parameter", "Value"]);
    table.add_row(row!["Temperature, K", format!("{:.2}", result.temperature)]);
    table.add_row(row!["Product yield, %", format!("{:.2}", result.yield_value * 100.0)]);
    table.add_row(row![
        "Catalyst",
        result.catalyst.clone().unwrap_or_else(|| "None".to_string())
    ]);
    table.add_row(row!["Exit flow rate, m³/s", format!("{:.4}", config.flow_rate)]);
    table.add_row(row!["Residence time, s", format!("{:.2}", result.residence_time)]);
    table.add_row(row!["Recycle ratio", format!("{:.3}", config.recycle_ratio)]);
    table.add_row(row!["Steady state", convergence_label(&result.convergence)]);
    table
}

/// Outlet, recycle and fresh feed concentrations side by side
pub fn concentrations_table(result: &SimulationResult, config: &ReactorConfig) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Species", "Outlet, mol/m³", "Recycle, mol/m³", "Fresh feed, mol/m³"]);
    for (species, c) in result.concentrations.iter() {
        let name = if config.target_product.as_deref() == Some(species.as_str()) {
            format!("{} (TARGET PRODUCT)", species)
        } else {
            species.clone()
        };
        let recycle = result.recycle_stream.get(species).copied().unwrap_or(0.0);
        table.add_row(row![
            name,
            format!("{:.4}", c),
            format!("{:.4}", recycle),
            format!("{:.4}", config.feed(species))
        ]);
    }
    table
}

pub fn reaction_rates_table(result: &SimulationResult) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Reaction", "Rate, mol/(m³·s)"]);
    for entry in result.reaction_rates.iter() {
        table.add_row(row![entry.label(), format!("{:.6}", entry.rate)]);
    }
    table
}

pub fn conversions_table(result: &SimulationResult) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Species", "Conversion, %"]);
    for (species, x) in result.conversions.iter() {
        table.add_row(row![species, format!("{:.2}", x * 100.0)]);
    }
    table
}

pub fn mass_balance_table(result: &SimulationResult) -> Table {
    let eb = &result.elemental_balance;
    let mut table = Table::new();
    table.add_row(row!["Mass balance", "Value"]);
    table.add_row(row!["Mass balance error, %", format!("{:.4}", result.mass_balance_error * 100.0)]);
    table.add_row(row!["Total input concentration, mol/m³", format!("{:.4}", eb.total_input_conc)]);
    table.add_row(row!["Total output concentration, mol/m³", format!("{:.4}", eb.total_output_conc)]);
    table.add_row(row!["Difference, %", format!("{:.4}", eb.difference_percent)]);
    table
}

/// Prints the simulation report to stdout
pub fn pretty_print_results(result: &SimulationResult, config: &ReactorConfig) {
    println!("\n===== CSTR SIMULATION RESULTS =====");
    operating_point_table(result, config).printstd();
    println!("\nSteady state concentrations:");
    concentrations_table(result, config).printstd();
    println!("\nReaction rates:");
    reaction_rates_table(result).printstd();
    println!("\nReactant conversions:");
    conversions_table(result).printstd();
    println!();
    mass_balance_table(result).printstd();
    println!("==================================");
}
