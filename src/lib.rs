pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod report;
pub mod schema;
pub mod scoring;
pub mod services;

use anyhow::{anyhow, bail, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::cli::{Command, DrillRankArgs, RankArgs, StatsArgs, ValidateDrillArgs};
use crate::config::{find_template, get_templates, AppConfig};
use crate::domain::{Direction, EventDrillSchema, Population};
use crate::errors::DrillError;
use crate::lifecycle::{CustomDrillRequest, DrillLifecycleGuard, DrillValidator};
use crate::scoring::RankingScope;
use crate::services::{calculate_event_stats, load_snapshot, write_json, RankingService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_rank(args: &RankArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let snapshot = load_snapshot(&args.snapshot)?;
    let service = RankingService::new(config)?;

    let scope = RankingScope::parse(args.age_group.as_deref());
    let results = service.rank(&snapshot, args.preset.as_deref(), &args.weights, &scope)?;
    let rows = service.export_rows(&results);

    if let Some(path) = &args.output {
        write_json(path, &rows)?;
    }
    if args.json {
        report::print_json(&rows)
    } else {
        report::print_rankings(&rows);
        Ok(())
    }
}

pub fn handle_drill_rank(args: &DrillRankArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let service = RankingService::new(AppConfig::from_env())?;

    if let Some(player_id) = &args.player {
        let standing = service.drill_standing(&snapshot, &args.drill, player_id)?;
        return if args.json {
            report::print_json(&standing)
        } else {
            report::print_standing(&standing);
            Ok(())
        };
    }

    let population = args
        .age_group
        .as_deref()
        .map(Population::parse)
        .unwrap_or(Population::All);
    let entries = service.leaderboard(&snapshot, &args.drill, &population)?;
    if args.json {
        report::print_json(&entries)
    } else {
        report::print_leaderboard(&args.drill, &entries);
        Ok(())
    }
}

pub fn handle_stats(args: &StatsArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let snapshot = load_snapshot(&args.snapshot)?;
    let validator = DrillValidator::new(config.validation.clone())?;
    let schema = snapshot.schema(&validator);

    let top = args.top.unwrap_or(config.scoring.top_performers);
    let stats = calculate_event_stats(&snapshot.event_id, &schema.active_drills(), &snapshot.players, top);
    if args.json {
        report::print_json(&stats)
    } else {
        report::print_stats(&stats);
        Ok(())
    }
}

pub fn handle_templates(template: Option<&str>) -> Result<()> {
    match template {
        Some(id) => {
            let Some(found) = find_template(id) else {
                bail!("Unknown template: {}", id);
            };
            report::print_template(&found);
        }
        None => report::print_templates(&get_templates()),
    }
    Ok(())
}

pub fn handle_validate_drill(args: &ValidateDrillArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let guard = DrillLifecycleGuard::new(config.validation)?;

    let mut schema = match &args.snapshot {
        Some(path) => load_snapshot(path)?.schema(guard.validator()),
        None => EventDrillSchema::new("adhoc", vec![]),
    };
    let request = CustomDrillRequest {
        label: args.label.clone(),
        unit: args.unit.clone(),
        category: args.category.clone(),
        direction: Direction::from_lower_is_better(args.lower_is_better),
        min: args.min,
        max: args.max,
        description: args.description.clone(),
    };

    let drill = guard
        .create_drill(&mut schema, &request, &args.created_by, args.acknowledge)
        .map_err(|err| match err {
            DrillError::UnacknowledgedWarnings(_) => anyhow!("{}; rerun with --acknowledge to accept", err),
            other => anyhow!(other),
        })?;
    info!("Drill {} is valid for event {}", drill.key, schema.event_id);
    report::print_drill(&drill)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
