use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "combine drill scoring and ranking")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Rank an event's players by composite score
    Rank(RankArgs),
    /// Rank players on a single drill
    DrillRank(DrillRankArgs),
    /// Per-drill statistics for an event
    Stats(StatsArgs),
    /// List built-in sport templates and their weight presets
    Templates {
        /// Show the drills of one template (id or sport name)
        template: Option<String>,
    },
    /// Validate a custom drill definition, optionally against an event
    ValidateDrill(ValidateDrillArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RankArgs {
    /// Event snapshot (JSON)
    pub snapshot: PathBuf,
    /// Rank a single age group; `all` ranks everyone together
    #[arg(short, long)]
    pub age_group: Option<String>,
    /// Weight preset of the event's template
    #[arg(short, long)]
    pub preset: Option<String>,
    /// Override one drill's weight, e.g. `--weight 40m_dash=0.5` (repeatable)
    #[arg(short = 'w', long = "weight", value_name = "KEY=WEIGHT", value_parser = parse_weight_override)]
    pub weights: Vec<(String, f64)>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Also write the export rows to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_weight_override(raw: &str) -> Result<(String, f64), String> {
    let (key, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=WEIGHT, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing drill key in '{}'", raw));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("weight for '{}' is not a number", key))?;
    Ok((key.to_string(), weight))
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DrillRankArgs {
    /// Event snapshot (JSON)
    pub snapshot: PathBuf,
    /// Drill key
    #[arg(short, long)]
    pub drill: String,
    /// Show only this player's rank within their age group
    #[arg(long)]
    pub player: Option<String>,
    /// Restrict the leaderboard to one age group
    #[arg(short, long)]
    pub age_group: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct StatsArgs {
    /// Event snapshot (JSON)
    pub snapshot: PathBuf,
    /// Number of top performers per drill
    #[arg(short, long)]
    pub top: Option<usize>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValidateDrillArgs {
    #[arg(long)]
    pub label: String,
    #[arg(long)]
    pub unit: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub lower_is_better: bool,
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,
    #[arg(long)]
    pub description: Option<String>,
    /// Confirm range warnings
    #[arg(long)]
    pub acknowledge: bool,
    /// Check against this event's drills and Live Entry state
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Recorded as the drill's creator
    #[arg(long, default_value = "cli")]
    pub created_by: String,
}
