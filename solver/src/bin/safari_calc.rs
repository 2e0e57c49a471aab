//! safari-calc: exact capture probability of a scripted Safari Zone plan.
//!
//! Defaults to Chansey (catch rate 30, flee rate 125) and the 43-turn
//! reference plan. Human-readable result on stdout, or a JSON report with
//! `--json`. Logs go to stderr (`RUST_LOG`).

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;

use safari::constants::SAFARI_BALLS;
use safari::{
    ActionScript, EncounterConfig, FleeTiming, Outcome, Prob128, Prob64, Probability, Solver,
    SolveError, Species,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Backend {
    F64,
    Fixed128,
}

struct Args {
    config: EncounterConfig,
    script: ActionScript,
    pad_balls: bool,
    backend: Backend,
    parallel_depth: Option<usize>,
    trace: Option<PathBuf>,
    json: bool,
}

#[derive(Serialize)]
struct Report<P> {
    species_catch_rate: u8,
    species_flee_rate: u8,
    script: String,
    backend: &'static str,
    flee_timing: FleeTiming,
    ball_limit: Option<u32>,
    capture_probability: P,
    outcome: Outcome<P>,
    explored: u64,
    elapsed_secs: f64,
}

fn print_usage() {
    eprintln!("Usage: safari-calc [OPTIONS]");
    eprintln!();
    eprintln!("  --species NAME         Preset rates (chansey)");
    eprintln!("  --catch-rate N         Species catch rate (1-255)");
    eprintln!("  --flee-rate N          Species Safari flee rate (1-255)");
    eprintln!("  --script LETTERS       Plan: T=bait R=rock L=ball (default: reference plan)");
    eprintln!("  --balls N              End the encounter after N balls");
    eprintln!("  --safari-balls         Same as --balls {}", SAFARI_BALLS);
    eprintln!("  --pad-balls            Keep throwing balls after the plan, up to the ball limit");
    eprintln!("  --flee-timing WHEN     after|before the throw (default: after)");
    eprintln!("  --backend NAME         f64|fixed128 (default: f64)");
    eprintln!("  --parallel-depth N     Fan out over threads below turn N (default: half the plan)");
    eprintln!("  --sequential           Single-threaded enumeration");
    eprintln!("  --trace PATH           Write one line per visited node (implies --sequential)");
    eprintln!("  --json                 JSON report on stdout");
    eprintln!();
    eprintln!("Environment: SAFARI_THREADS, SAFARI_TRACE_FILE, RUST_LOG");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(raw) = value else {
        fail(format!("{} needs a value", flag));
    };
    raw.parse()
        .unwrap_or_else(|_| fail(format!("invalid value for {}: {}", flag, raw)))
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: EncounterConfig::default(),
        script: ActionScript::reference_plan(),
        pad_balls: false,
        backend: Backend::F64,
        parallel_depth: None,
        trace: safari::env_config::trace_file(),
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--species" => {
                i += 1;
                let name: String = parse_value(flag, args.get(i));
                let species = Species::by_name(&name).unwrap_or_else(|e| fail(e));
                parsed.config.catch_rate = species.catch_rate;
                parsed.config.flee_rate = species.flee_rate;
            }
            "--catch-rate" => {
                i += 1;
                parsed.config.catch_rate = parse_value(flag, args.get(i));
            }
            "--flee-rate" => {
                i += 1;
                parsed.config.flee_rate = parse_value(flag, args.get(i));
            }
            "--script" => {
                i += 1;
                let raw: String = parse_value(flag, args.get(i));
                parsed.script = raw.parse().unwrap_or_else(|e| fail(e));
            }
            "--balls" => {
                i += 1;
                parsed.config.ball_limit = Some(parse_value(flag, args.get(i)));
            }
            "--safari-balls" => parsed.config = parsed.config.with_safari_balls(),
            "--pad-balls" => parsed.pad_balls = true,
            "--flee-timing" => {
                i += 1;
                let raw: String = parse_value(flag, args.get(i));
                parsed.config.flee_timing = raw.parse().unwrap_or_else(|e| fail(e));
            }
            "--backend" => {
                i += 1;
                let raw: String = parse_value(flag, args.get(i));
                parsed.backend = match raw.as_str() {
                    name if name == Prob64::NAME => Backend::F64,
                    name if name == Prob128::NAME => Backend::Fixed128,
                    other => fail(format!("unknown backend '{}' (expected f64|fixed128)", other)),
                };
            }
            "--parallel-depth" => {
                i += 1;
                parsed.parallel_depth = Some(parse_value(flag, args.get(i)));
            }
            "--sequential" => parsed.parallel_depth = Some(0),
            "--trace" => {
                i += 1;
                parsed.trace = Some(parse_value::<String>(flag, args.get(i)).into());
            }
            "--json" => parsed.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn run<P: Probability>(args: &Args, script: &ActionScript) -> Result<(), SolveError> {
    let mut solver = Solver::<P>::new(&args.config, script)?;
    if let Some(depth) = args.parallel_depth {
        solver = solver.with_parallel_depth(depth);
    }

    let solution = match &args.trace {
        Some(path) => {
            let mut sink = BufWriter::new(File::create(path)?);
            let solution = solver.solve_traced(&mut sink)?;
            tracing::info!(path = %path.display(), lines = solution.explored, "wrote trace");
            solution
        }
        None => solver.solve(),
    };

    if args.json {
        let report = Report {
            species_catch_rate: args.config.catch_rate,
            species_flee_rate: args.config.flee_rate,
            script: script.to_string(),
            backend: P::NAME,
            flee_timing: args.config.flee_timing,
            ball_limit: args.config.ball_limit,
            capture_probability: solution.capture_probability(),
            outcome: solution.outcome,
            explored: solution.explored,
            elapsed_secs: solution.elapsed_secs,
        };
        let json = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| fail(format!("JSON serialization failed: {}", e)));
        println!("{}", json);
    } else {
        println!("Catch probability = {}", solution.capture_probability());
        println!(
            "Fled = {}  Unresolved = {}",
            solution.outcome.fled, solution.outcome.unresolved
        );
        println!("Possibilities explored: {}", solution.explored);
        println!("Elapsed: {:.3}s", solution.elapsed_secs);
    }
    Ok(())
}

fn main() {
    safari::env_config::init_tracing();
    let args = parse_args();

    let script = if args.pad_balls {
        let Some(limit) = args.config.ball_limit else {
            fail("--pad-balls needs --balls or --safari-balls");
        };
        args.script
            .clone()
            .pad_with_balls(limit as usize)
            .unwrap_or_else(|e| fail(e))
    } else {
        args.script.clone()
    };

    let _threads = safari::env_config::init_rayon_threads();

    let result = match args.backend {
        Backend::F64 => run::<Prob64>(&args, &script),
        Backend::Fixed128 => run::<Prob128>(&args, &script),
    };
    if let Err(e) = result {
        fail(e);
    }
}
