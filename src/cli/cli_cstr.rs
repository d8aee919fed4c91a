use crate::Library::reaction_library::{ReactionBundle, ReactionLibrary};
use crate::ReactorCSTR::cstr_output::pretty_print_results;
use crate::ReactorCSTR::simulation::{SimulationSettings, run_simulation};
use crate::ReactorCSTR::task_parser::{create_template, run_task_file};
use prettytable::{Table, row};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

const TEMPLATE_FILE: &str = "cstr_task.json";

pub fn cstr_menu() {
    loop {
        println!("\n=== CSTR Simulation ===");
        println!("\x1b[33m1. Simulate a library process\x1b[0m");
        println!("\x1b[33m2. Solve from task file\x1b[0m");
        println!("\x1b[33m3. Auto-discover task files\x1b[0m");
        println!("\x1b[33m4. Generate task template\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        prompt("\x1b[36mEnter your choice: \x1b[0m");

        let choice = get_user_input();
        match choice.trim() {
            "1" => simulate_library_entry(),
            "2" => solve_from_file(),
            "3" => auto_solve_tasks(),
            "4" => match create_template(TEMPLATE_FILE) {
                Ok(()) => println!("Template written to {}", TEMPLATE_FILE),
                Err(e) => println!("Error writing template: {}", e),
            },
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

pub fn library_menu() {
    match ReactionLibrary::builtin() {
        Ok(library) => {
            library_table(&library).printstd();
            println!("\nPress Enter to return to menu...");
            let _ = get_user_input();
        }
        Err(e) => println!("Error loading reaction library: {}", e),
    }
}

fn library_table(library: &ReactionLibrary) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Process", "Target product", "Catalyst", "T range, K"]);
    for (i, (name, bundle)) in library.bundles.iter().enumerate() {
        table.add_row(row![
            i + 1,
            name,
            bundle.target_product.clone().unwrap_or_else(|| "-".to_string()),
            bundle.catalyst.clone().unwrap_or_else(|| "-".to_string()),
            format!("{} - {}", bundle.temperature_range.0, bundle.temperature_range.1)
        ]);
    }
    table
}

fn select_bundle<'a>(library: &'a ReactionLibrary) -> Option<(&'a String, &'a ReactionBundle)> {
    library_table(library).printstd();
    prompt("Process number or name: ");
    let answer = get_user_input();
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| library.bundles.iter().nth(i));
    }
    library.bundles.get_key_value(answer)
}

fn simulate_library_entry() {
    let library = match ReactionLibrary::builtin() {
        Ok(library) => library,
        Err(e) => {
            println!("Error loading reaction library: {}", e);
            return;
        }
    };
    let Some((name, bundle)) = select_bundle(&library) else {
        println!("No such process in the library.");
        return;
    };
    println!("\n{}\n{}", name, bundle.description);

    let volume = prompt_f64("Reactor volume, m³", 1.0);
    let flow_rate = prompt_f64("Flow rate, m³/s", 0.01);
    let recycle_ratio = prompt_f64("Recycle ratio", 0.0);
    let config = bundle.to_reactor_config(volume, flow_rate, recycle_ratio);
    let (t_min, t_max) = bundle.temperature_range;
    prompt("\x1b[36mOptimize temperature? (y/n): \x1b[0m");
    let settings = if is_yes(&get_user_input()) {
        let lower = prompt_f64("Lower temperature bound, K", t_min);
        let upper = prompt_f64("Upper temperature bound, K", t_max);
        SimulationSettings::optimized(0.5 * (lower + upper), (lower, upper))
    } else {
        SimulationSettings::at_temperature(prompt_f64("Temperature, K", 0.5 * (t_min + t_max)))
    };

    match run_simulation(&config, &bundle.reactions, &settings) {
        Ok(result) => {
            pretty_print_results(&result, &config);
            prompt("\x1b[36mSave result to file (empty to skip): \x1b[0m");
            let path = get_user_input();
            let path = path.trim();
            if !path.is_empty() {
                match result.to_json().map(|json| fs::write(path, json)) {
                    Ok(Ok(())) => println!("Result saved to {}", path),
                    Ok(Err(e)) => println!("Error saving result: {}", e),
                    Err(e) => println!("Error saving result: {}", e),
                }
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn solve_from_file() {
    prompt("\x1b[36mEnter file path: \x1b[0m");
    let file_path = get_user_input();
    let path = PathBuf::from(file_path.trim());

    if path.exists() {
        solve_task_dialog(path);
    } else {
        println!("File not found: {}", file_path.trim());
    }
}

/// Runs every `task*.json` of the current directory
fn auto_solve_tasks() {
    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("Failed to get current directory: {}", e);
            return;
        }
    };
    println!("Searching for task files in: {:?}", current_dir);

    let mut found_files = false;
    if let Ok(entries) = fs::read_dir(&current_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_task = path
                .file_name()
                .map(|f| f.to_string_lossy())
                .is_some_and(|f| f.starts_with("task") && f.ends_with(".json"));
            if is_task && path.is_file() {
                println!("Found task file: {:?}", path);
                solve_task_dialog(path);
                found_files = true;
            }
        }
    }

    if !found_files {
        println!("No task*.json files found in current directory.");
    }
}

pub fn solve_task_dialog(path: PathBuf) {
    prompt("\x1b[36mStart calculation? (y/n): \x1b[0m");
    if !is_yes(&get_user_input()) {
        println!("Calculation cancelled. Returning to menu.");
        return;
    }
    match run_task_file(&path) {
        Ok((prepared, result)) => pretty_print_results(&result, &prepared.config),
        Err(e) => println!("Error in task {:?}: {}", path, e),
    }
}

fn prompt_f64(label: &str, default: f64) -> f64 {
    loop {
        prompt(&format!("\x1b[36m{} [{}]: \x1b[0m", label, default));
        let answer = get_user_input();
        let answer = answer.trim();
        if answer.is_empty() {
            return default;
        }
        match answer.parse::<f64>() {
            Ok(value) => return value,
            Err(_) => println!("Not a number: {}", answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

pub(crate) fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

/// End of input reads as "0" so every menu can be left
pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => "0".to_string(),
        Ok(_) => input,
    }
}
