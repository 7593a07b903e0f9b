//! refinery-cli: split calculator and run tracker for refinery operations.
//!
//! Usage:
//!   refinery-cli spice      --sand 25000 --players 4 [--processors 1]
//!   refinery-cli fibers     --mass 900 [--titanium 400] --players 3 [--chem 1] [--landsraad]
//!   refinery-cli plastanium --mass 900 --titanium 400 --players 3 [--chem 1] [--large 1] [--landsraad]
//!   refinery-cli run create     --kind spice --players "Ana, Bo"
//!   refinery-cli run add-player --id 3f9c01ab --player Cy
//!   refinery-cli run add        --id 3f9c01ab --resource spice --amount 25000
//!   refinery-cli run view       --id 3f9c01ab
//!   refinery-cli run list
//!   refinery-cli run delete     --id 3f9c01ab
//!   refinery-cli run calculate  --id 3f9c01ab [--processors 1] [--chem 1] [--large 1] [--landsraad]
//!   refinery-cli serve
//!
//! Common flags:
//!   --data-dir ./data   ratio table (refinery.json); built-in ratios if absent
//!   --runs runs.json    flat-file run store (default)
//!   --db runs.db        SQLite run store instead of the flat file
//!   --user NAME         caller identity (default: $USER)

use anyhow::{bail, Context, Result};
use refinery_core::{
    auth::StaticIdentity,
    calculator::{CalcParams, Calculator},
    command::RunCommand,
    config::{RefineryConfig, CONFIG_FILE},
    manager::RunManager,
    store::{JsonFileStore, RunRepository, SqliteStore},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// One line of the `serve` loop. `user` overrides `--user` for that line.
#[derive(serde::Deserialize)]
struct Request {
    #[serde(default)]
    user:    Option<String>,
    command: RunCommand,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;

    match args.get(1).map(String::as_str) {
        Some("spice") => {
            let sand: f64 = require_arg(&args, "--sand")?;
            let players: u32 = require_arg(&args, "--players")?;
            let params = calc_params(&args);
            let report = Calculator::new(&config).spice(sand, players, &params)?;
            println!("{report}");
        }
        Some("fibers") => {
            let mass: f64 = require_arg(&args, "--mass")?;
            let titanium = parse_arg(&args, "--titanium", 0.0f64);
            let players: u32 = require_arg(&args, "--players")?;
            let params = calc_params(&args);
            let report = Calculator::new(&config).stravidium(mass, titanium, players, &params)?;
            println!("{report}");
        }
        Some("plastanium") => {
            let mass: f64 = require_arg(&args, "--mass")?;
            let titanium: f64 = require_arg(&args, "--titanium")?;
            let players: u32 = require_arg(&args, "--players")?;
            let params = calc_params(&args);
            let report = Calculator::new(&config).plastanium(mass, titanium, players, &params)?;
            println!("{report}");
        }
        Some("run") => {
            let command = parse_run_command(&args)?;
            let identity = identity(&args, &config);
            let mut manager = RunManager::open(open_store(&args)?, config)?;
            let outcome = manager.execute(command, &identity)?;
            println!("{outcome}");
        }
        Some("serve") => {
            let identity = identity(&args, &config);
            let mut manager = RunManager::open(open_store(&args)?, config)?;
            serve_loop(&mut manager, &identity)?;
        }
        _ => {
            eprintln!("usage: refinery-cli <spice|fibers|plastanium|run|serve> [flags]");
            eprintln!("       see the crate docs for the flag list");
            bail!("missing or unknown mode");
        }
    }

    Ok(())
}

/// JSON-lines loop: one `Request` per stdin line, one reply per stdout line.
fn serve_loop(manager: &mut RunManager, default_identity: &StaticIdentity) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let identity = match request.user {
            Some(user) => default_identity.as_user(user),
            None => default_identity.clone(),
        };
        let reply = match manager.execute(request.command, &identity) {
            Ok(outcome) => serde_json::json!({
                "ok": outcome,
                "text": outcome.to_string(),
            }),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn parse_run_command(args: &[String]) -> Result<RunCommand> {
    let action = args.get(2).map(String::as_str).unwrap_or_default();
    let command = match action {
        "create" => RunCommand::Create {
            kind:    require_str(args, "--kind")?.parse()?,
            players: require_str(args, "--players")?
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        },
        "add-player" => RunCommand::AddPlayer {
            run_id: require_str(args, "--id")?,
            player: require_str(args, "--player")?,
        },
        "add" => RunCommand::AddAmount {
            run_id:   require_str(args, "--id")?,
            resource: require_str(args, "--resource")?.parse()?,
            amount:   require_arg(args, "--amount")?,
        },
        "view" => RunCommand::View { run_id: require_str(args, "--id")? },
        "list" => RunCommand::List,
        "delete" => RunCommand::Delete { run_id: require_str(args, "--id")? },
        "calculate" => RunCommand::Calculate {
            run_id: require_str(args, "--id")?,
            params: calc_params(args),
        },
        other => bail!(
            "unknown run action '{other}' (expected create|add-player|add|view|list|delete|calculate)"
        ),
    };
    Ok(command)
}

fn calc_params(args: &[String]) -> CalcParams {
    CalcParams {
        spice_refineries: parse_arg(args, "--processors", 1u32),
        chem_refineries:  parse_arg(args, "--chem", 1u32),
        large_refineries: parse_arg(args, "--large", 1u32),
        landsraad:        args.iter().any(|a| a == "--landsraad"),
    }
}

fn load_config(args: &[String]) -> Result<RefineryConfig> {
    let data_dir = find_arg(args, "--data-dir").unwrap_or("./data");
    if Path::new(data_dir).join(CONFIG_FILE).exists() {
        RefineryConfig::load(data_dir)
    } else {
        log::info!("No {CONFIG_FILE} in {data_dir}; using built-in ratios");
        Ok(RefineryConfig::standard())
    }
}

fn open_store(args: &[String]) -> Result<Box<dyn RunRepository>> {
    if let Some(db) = find_arg(args, "--db") {
        let store = SqliteStore::open(db).with_context(|| format!("opening {db}"))?;
        store.migrate()?;
        return Ok(Box::new(store));
    }
    let path = find_arg(args, "--runs").unwrap_or("runs.json");
    Ok(Box::new(JsonFileStore::new(path)))
}

fn identity(args: &[String], config: &RefineryConfig) -> StaticIdentity {
    let user = find_arg(args, "--user")
        .map(str::to_string)
        .or_else(|| env::var("USER").ok())
        .unwrap_or_else(|| "local".to_string());
    StaticIdentity::new(user, config.admins.iter().cloned())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn require_str(args: &[String], flag: &str) -> Result<String> {
    find_arg(args, flag)
        .map(str::to_string)
        .with_context(|| format!("missing required flag {flag}"))
}

fn require_arg<T>(args: &[String], flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require_str(args, flag)?;
    raw.parse()
        .map_err(|e| anyhow::anyhow!("{flag} expects a number, got '{raw}': {e}"))
}
