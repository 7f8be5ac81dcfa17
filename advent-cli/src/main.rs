use advent_core::time::{parse_iso_date, parse_timezone, today_in};
use advent_core::{
    parse_hp_pairs, simulate, Cycle, CycleStore, MemberDamage, PlanRequest, PlanningKernel,
    ScoreSource, SystemClock,
};
use advent_ingest::{parse_availability_csv, parse_roster_csv, RosterDir, RosterFile};
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod render;
mod state;

use config::Config;
use state::FileCycleStore;

#[derive(Parser, Debug)]
#[command(name = "advent", version, about = "Advent Expedition boss assignment planner")]
struct Cli {
    /// Debug-level logs
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log format: pretty or json (default from config)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Window and target options shared by `plan` and `cycle open`.
#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// First day of the event (YYYY-MM-DD, default: today in the configured timezone)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the event, inclusive (default: start + window_days - 1)
    #[arg(long)]
    end: Option<String>,

    /// Day number by which every boss should be cleared
    #[arg(long)]
    target_day: Option<u32>,

    /// CSV of member_id,available_from
    #[arg(long)]
    availability: Option<PathBuf>,

    /// Starting HP for a resumed cycle, e.g. --hp teo=12000000 (repeatable)
    #[arg(long = "hp")]
    hp: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a plan from a roster CSV without saving it
    Plan {
        /// Roster CSV (member_id,name,teo,yeonhee,kyle,karma)
        #[arg(long)]
        roster: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage per-guild event cycles
    Cycle {
        #[command(subcommand)]
        command: CycleCommand,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CycleCommand {
    /// Open a new cycle (a guild may have only one open cycle)
    Open {
        #[arg(long)]
        guild: String,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Re-run the plan for the guild's open cycle against current scores
    Regenerate {
        #[arg(long)]
        guild: String,

        /// Roster CSV (default: <roster_dir>/<guild>.csv from config)
        #[arg(long)]
        roster: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Show the guild's open cycle and its latest plan
    Show {
        #[arg(long)]
        guild: String,

        #[arg(long)]
        json: bool,
    },

    /// Mark the guild's open cycle completed
    Complete {
        #[arg(long)]
        guild: String,
    },

    /// List every stored cycle
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

/// Where regeneration reads scores from.
enum Scores {
    File(RosterFile),
    Dir(RosterDir),
    Unconfigured,
}

impl Scores {
    fn from_args(cfg: &Config, roster: Option<PathBuf>) -> Self {
        match (roster, &cfg.planning.roster_dir) {
            (Some(p), _) => Scores::File(RosterFile::new(p)),
            (None, Some(dir)) => Scores::Dir(RosterDir::new(dir)),
            (None, None) => Scores::Unconfigured,
        }
    }
}

impl ScoreSource for Scores {
    fn member_damage(&self, guild: &str) -> Result<Vec<MemberDamage>> {
        match self {
            Scores::File(f) => f.member_damage(guild),
            Scores::Dir(d) => d.member_damage(guild),
            Scores::Unconfigured => {
                bail!("no roster given: pass --roster <csv> or set planning.roster_dir in config")
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| cfg.logging.format.clone());
    setup_tracing(&format, cli.verbose)?;

    match cli.command {
        Command::Plan { roster, window, json } => plan_once(&cfg, roster, window, json)?,

        Command::Cycle { command } => match command {
            CycleCommand::Open { guild, window } => open_cycle(&cfg, guild, window)?,
            CycleCommand::Regenerate { guild, roster, json } => {
                regenerate(&cfg, &guild, roster, json)?
            }
            CycleCommand::Show { guild, json } => {
                let store = FileCycleStore::in_home()?;
                let cycle = require_open(&store, &guild)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&cycle)?);
                } else {
                    print!("{}", render::render_cycle(&cycle));
                }
            }
            CycleCommand::Complete { guild } => {
                let mut store = FileCycleStore::in_home()?;
                let cycle = require_open(&store, &guild)?;
                let done = kernel(&cfg, Scores::from_args(&cfg, None))?
                    .complete_cycle(&mut store, &cycle.id)?;
                println!("Completed {}", done.id);
            }
            CycleCommand::List => {
                let store = FileCycleStore::in_home()?;
                for c in store.all()? {
                    let estimate = c
                        .plan
                        .as_ref()
                        .map(|p| format!("est. day {}", p.estimated_days))
                        .unwrap_or_else(|| "no plan".to_string());
                    println!(
                        "{}  {:?}  {} .. {}  target {}  {}",
                        c.id, c.status, c.start_date, c.end_date, c.target_day, estimate
                    );
                }
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("advent=debug,advent_core=debug,advent_ingest=debug")
    } else {
        tracing_subscriber::EnvFilter::new("advent=info,advent_core=info,advent_ingest=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        other => bail!("unknown log format '{other}' (expected pretty or json)"),
    }

    Ok(())
}

fn local_today(cfg: &Config) -> Result<NaiveDate> {
    let tz = parse_timezone(&cfg.planning.timezone)?;
    Ok(today_in(tz, Utc::now()))
}

fn kernel(cfg: &Config, scores: Scores) -> Result<PlanningKernel<Scores, SystemClock>> {
    let tz = parse_timezone(&cfg.planning.timezone)?;
    Ok(PlanningKernel::new(scores, SystemClock, tz).with_max_window_days(cfg.planning.max_window_days))
}

fn require_open(store: &FileCycleStore, guild: &str) -> Result<Cycle> {
    store
        .open_cycle_for(guild)?
        .with_context(|| format!("guild '{guild}' has no open cycle (run: advent cycle open --guild {guild})"))
}

/// Resolve window arguments against config defaults.
struct ResolvedWindow {
    start: NaiveDate,
    end: NaiveDate,
    target_day: u32,
    availability: BTreeMap<String, NaiveDate>,
    starting_hp: BTreeMap<advent_core::Boss, i64>,
}

fn resolve_window(cfg: &Config, w: WindowArgs) -> Result<ResolvedWindow> {
    let start = match &w.start {
        Some(s) => parse_iso_date(s)?,
        None => local_today(cfg)?,
    };
    let end = match &w.end {
        Some(s) => parse_iso_date(s)?,
        None => start + Duration::days(i64::from(cfg.planning.window_days.max(1)) - 1),
    };
    let availability = match &w.availability {
        Some(p) => parse_availability_csv(p)?,
        None => BTreeMap::new(),
    };
    Ok(ResolvedWindow {
        start,
        end,
        target_day: w.target_day.unwrap_or(cfg.planning.target_day),
        availability,
        starting_hp: parse_hp_pairs(&w.hp)?,
    })
}

fn plan_once(cfg: &Config, roster: PathBuf, window: WindowArgs, json: bool) -> Result<()> {
    let members = parse_roster_csv(&roster)?;
    let w = resolve_window(cfg, window)?;

    let req = PlanRequest {
        roster: members,
        start_date: Some(w.start),
        end_date: Some(w.end),
        target_day: Some(w.target_day),
        availability: w.availability,
        starting_hp: w.starting_hp,
    };
    let today = local_today(cfg)?;
    req.validate(today, Some(cfg.planning.max_window_days))?;

    let plan = simulate(&req, today, Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render::render_plan(&plan));
    }
    Ok(())
}

fn open_cycle(cfg: &Config, guild: String, window: WindowArgs) -> Result<()> {
    let w = resolve_window(cfg, window)?;
    let mut cycle = Cycle::new(guild, w.start, Utc::now())
        .with_end_date(w.end)
        .with_target_day(w.target_day);
    cycle.availability = w.availability;
    cycle.starting_hp = w.starting_hp;

    let mut store = FileCycleStore::in_home()?;
    let cycle = kernel(cfg, Scores::from_args(cfg, None))?.open_cycle(&mut store, cycle)?;
    println!(
        "Opened {} ({} .. {}, target day {})",
        cycle.id, cycle.start_date, cycle.end_date, cycle.target_day
    );
    Ok(())
}

fn regenerate(cfg: &Config, guild: &str, roster: Option<PathBuf>, json: bool) -> Result<()> {
    let scores = Scores::from_args(cfg, roster);
    let mut store = FileCycleStore::in_home()?;
    let cycle = require_open(&store, guild)?;
    let plan = kernel(cfg, scores)?.regenerate(&mut store, &cycle.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render::render_plan(&plan));
    }
    Ok(())
}
