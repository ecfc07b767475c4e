//! Simulator entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridchain_sim::chain::{Ledger, Payload, SystemClock, TamperOutcome};
use gridchain_sim::config::ScenarioConfig;
use gridchain_sim::io::export::export_csv;
use gridchain_sim::sim::engine::Engine;
use gridchain_sim::sim::types::{BatteryState, BatteryStatus, GridConfig, SimConfig};
use gridchain_sim::weather::IrradianceSeries;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    ticks_override: Option<usize>,
    irradiance_path: Option<String>,
    tamper_index: Option<u64>,
    chain_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_help() {
    eprintln!("gridchain-sim — Microgrid simulator with a tamper-evident record chain");
    eprintln!();
    eprintln!("Usage: gridchain-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, high_desert, apartment)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --ticks <n>              Override number of timesteps");
    eprintln!("  --irradiance <path>      Load hourly irradiance series from TOML");
    eprintln!("  --tamper <index>         Rewrite the record at <index> after the run");
    eprintln!("  --chain-out <path>       Export the record chain to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        ticks_override: None,
        irradiance_path: None,
        tamper_index: None,
        chain_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ticks requires a count argument");
                    process::exit(1);
                }
                if let Ok(t) = args[i].parse::<usize>() {
                    cli.ticks_override = Some(t);
                } else {
                    eprintln!("error: --ticks value \"{}\" is not a valid count", args[i]);
                    process::exit(1);
                }
            }
            "--irradiance" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --irradiance requires a path argument");
                    process::exit(1);
                }
                cli.irradiance_path = Some(args[i].clone());
            }
            "--tamper" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --tamper requires an index argument");
                    process::exit(1);
                }
                if let Ok(idx) = args[i].parse::<u64>() {
                    cli.tamper_index = Some(idx);
                } else {
                    eprintln!("error: --tamper value \"{}\" is not a valid index", args[i]);
                    process::exit(1);
                }
            }
            "--chain-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --chain-out requires a path argument");
                    process::exit(1);
                }
                cli.chain_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load irradiance series if requested
    let irradiance = match cli.irradiance_path {
        Some(ref path) => match IrradianceSeries::from_toml_file(Path::new(path)) {
            Ok(series) => Some(series),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => None,
    };

    // Build and run
    let sim = &scenario.simulation;
    let mut sim_config = SimConfig::new(sim.step_hours, sim.ticks, sim.seed);
    sim_config.start_hour = sim.start_hour;

    let site = &scenario.site;
    let grid = GridConfig {
        latitude: site.latitude,
        longitude: site.longitude,
        panel_area_m2: site.panel_area_m2,
        panel_efficiency: site.panel_efficiency,
        panel_tilt_deg: site.panel_tilt_deg,
        battery_capacity_kwh: site.battery_capacity_kwh,
    };
    let battery = BatteryState::new(site.initial_soc_pct, BatteryStatus::Idle);

    let mut engine = Engine::new(
        sim_config,
        grid,
        battery,
        Ledger::new(),
        Box::new(SystemClock),
    );
    engine.set_irradiance(irradiance);

    if let Err(e) = engine.run() {
        eprintln!("error: simulation failed: {e}");
        process::exit(1);
    }

    // Rewrite one record in place if requested, so the audit has something to catch
    if let Some(index) = cli.tamper_index {
        let fake = Payload::Raw(serde_json::json!({
            "solar_kw": 500.0,
            "load_kw": 0.0,
            "battery": { "soc": 100.0, "status": "IDLE" },
            "grid_kw": 500.0,
        }));
        match engine.ledger_mut().tamper(index, fake) {
            Ok(TamperOutcome::Tampered(record)) => {
                eprintln!("tampered record {index}: {record}");
            }
            Ok(TamperOutcome::Unchanged) => {
                eprintln!("tamper at index {index} left the payload unchanged");
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    // Print the chain
    for record in engine.ledger().records() {
        println!("{record}");
    }

    // Print the audit verdict
    let verdict = engine.audit();
    match (verdict.error_index, verdict.reason) {
        (Some(index), Some(reason)) => {
            println!("\naudit: violation at record {index}: {reason}");
        }
        _ => println!("\naudit: chain intact ({} records)", engine.ledger().len()),
    }
    if !verdict.valid && cli.tamper_index.is_none() {
        process::exit(2);
    }

    // Export CSV if requested
    if let Some(ref path) = cli.chain_out {
        if let Err(e) = export_csv(engine.ledger().records(), Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Chain written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(gridchain_sim::api::AppState::new(
            scenario,
            engine.ledger().snapshot_chain(),
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(gridchain_sim::api::serve(state, addr));
    }
}
