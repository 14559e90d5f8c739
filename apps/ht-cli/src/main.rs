use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ht_app::{
    AppError, AppResult, ControllerGains, Scenario, compare, evaluate, load_scenario, report,
    scenario_to_yaml, search_with_config,
};

#[derive(Parser)]
#[command(name = "ht-cli")]
#[command(about = "HydroTune CLI - PID tuning for an irrigation controller", long_about = None)]
struct Cli {
    /// Scenario YAML file (defaults to the reference setup)
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunOverrides {
    /// Target humidity (%)
    #[arg(long)]
    setpoint: Option<f64>,
    /// Run length in seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate and score one gain triple
    Simulate {
        #[arg(long, default_value_t = 3.0)]
        kp: f64,
        #[arg(long, default_value_t = 0.5)]
        ki: f64,
        #[arg(long, default_value_t = 1.0)]
        kd: f64,
        /// Also print the trajectory as CSV
        #[arg(long)]
        series: bool,
        #[command(flatten)]
        run: RunOverrides,
    },
    /// Search for gains minimizing the score
    Optimize {
        /// Initial Kp (overrides the scenario)
        #[arg(long)]
        kp: Option<f64>,
        /// Initial Ki (overrides the scenario)
        #[arg(long)]
        ki: Option<f64>,
        /// Initial Kd (overrides the scenario)
        #[arg(long)]
        kd: Option<f64>,
        #[arg(long)]
        max_iterations: Option<usize>,
        #[command(flatten)]
        run: RunOverrides,
    },
    /// Compare the scenario's gain presets
    Compare {
        #[command(flatten)]
        run: RunOverrides,
    },
    /// Print the default scenario as YAML
    Scenario,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = match &cli.scenario {
        Some(path) => load_scenario(path)?,
        None => Scenario::default(),
    };

    match cli.command {
        Commands::Simulate {
            kp,
            ki,
            kd,
            series,
            run,
        } => cmd_simulate(
            apply_overrides(scenario, &run),
            ControllerGains::new(kp, ki, kd),
            series,
            cli.json,
        ),
        Commands::Optimize {
            kp,
            ki,
            kd,
            max_iterations,
            run,
        } => {
            let mut scenario = apply_overrides(scenario, &run);
            let guess = &mut scenario.search.initial_guess;
            guess.kp = kp.unwrap_or(guess.kp);
            guess.ki = ki.unwrap_or(guess.ki);
            guess.kd = kd.unwrap_or(guess.kd);
            if let Some(n) = max_iterations {
                scenario.search.minimizer.max_iterations = n;
            }
            cmd_optimize(&scenario, cli.json)
        }
        Commands::Compare { run } => cmd_compare(&apply_overrides(scenario, &run), cli.json),
        Commands::Scenario => cmd_scenario(cli.scenario.as_deref()),
    }
}

fn apply_overrides(mut scenario: Scenario, run: &RunOverrides) -> Scenario {
    if let Some(v) = run.setpoint {
        scenario.run.setpoint = v;
    }
    if let Some(v) = run.duration {
        scenario.run.duration = v;
    }
    if let Some(v) = run.dt {
        scenario.run.dt = v;
    }
    scenario
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("Failed to render JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn cmd_simulate(scenario: Scenario, gains: ControllerGains, series: bool, json: bool) -> AppResult<()> {
    let eval = evaluate(gains, &scenario.run)?;

    if json {
        if series {
            return print_json(&eval);
        }
        return print_json(&serde_json::json!({
            "gains": eval.gains,
            "metrics": eval.metrics,
        }));
    }

    print!("{}", report::format_evaluation(&eval));
    if series {
        println!();
        print!("{}", report::series_csv(&eval.trajectory));
    }
    Ok(())
}

fn cmd_optimize(scenario: &Scenario, json: bool) -> AppResult<()> {
    if !json {
        println!("Searching for optimal gains...");
    }
    let guess = scenario.search.initial_guess;
    tracing::info!(kp = guess.kp, ki = guess.ki, kd = guess.kd, "optimize requested");
    let result = search_with_config(&scenario.search, &scenario.run)?;
    let eval = evaluate(result.gains, &scenario.run)?;
    tracing::info!(
        score = eval.metrics.score,
        converged = result.converged,
        "optimum simulated"
    );

    if json {
        return print_json(&serde_json::json!({
            "search": result,
            "metrics": eval.metrics,
        }));
    }

    print!("{}", report::format_search(&result));
    if !result.converged {
        println!("  (search stopped before converging)");
    }
    println!();
    print!("{}", report::format_evaluation(&eval));
    Ok(())
}

fn cmd_compare(scenario: &Scenario, json: bool) -> AppResult<()> {
    tracing::info!(presets = scenario.presets.len(), "comparing presets");
    let comparison = compare(&scenario.presets, &scenario.run)?;
    if let Some(best) = comparison.best_entry() {
        tracing::info!(label = %best.preset.label, score = best.score(), "best preset");
    }

    if json {
        return print_json(&comparison);
    }

    print!("{}", report::format_comparison(&comparison));
    Ok(())
}

fn cmd_scenario(source: Option<&Path>) -> AppResult<()> {
    let scenario = match source {
        Some(path) => load_scenario(path)?,
        None => Scenario::default(),
    };
    print!("{}", scenario_to_yaml(&scenario)?);
    Ok(())
}
