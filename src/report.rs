use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::SportTemplate;
use crate::domain::DrillDefinition;
use crate::scoring::DrillRankEntry;
use crate::services::{DrillStanding, EventStats, ExportRow};

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn print_rankings(rows: &[ExportRow]) {
    if rows.is_empty() {
        println!("{}", "No ranked players".yellow());
        return;
    }

    let mut current_group: Option<&str> = None;
    for row in rows {
        if current_group != Some(row.age_group.as_str()) {
            println!();
            println!("{}", format!("Age group {}", row.age_group).bold());
            println!("{:>4}  {:<20} {:>8}", "Rank", "Player", "Score");
            current_group = Some(row.age_group.as_str());
        }
        let rank = format!("{:>4}", row.rank);
        let rank = if row.rank <= 3 { rank.green().bold() } else { rank.normal() };
        println!("{}  {:<20} {:>8}", rank, row.player_id, row.composite_score);
    }
}

pub fn print_leaderboard(drill: &str, entries: &[DrillRankEntry]) {
    println!("{}", format!("Leaderboard: {}", drill).bold());
    if entries.is_empty() {
        println!("{}", "No recorded values".yellow());
        return;
    }
    println!("{:>4}  {:<20} {:<10} {:>10}", "Rank", "Player", "Group", "Value");
    for entry in entries {
        println!(
            "{:>4}  {:<20} {:<10} {:>10}",
            entry.rank, entry.player_id, entry.age_group, entry.value
        );
    }
}

pub fn print_standing(standing: &DrillStanding) {
    match (standing.rank, standing.value) {
        (Some(rank), Some(value)) => println!(
            "{} is #{} on {} with {}",
            standing.player_id.bold(),
            rank.to_string().green().bold(),
            standing.drill_key,
            value
        ),
        _ => println!(
            "{} has no recorded value for {}",
            standing.player_id.bold(),
            standing.drill_key.yellow()
        ),
    }
}

pub fn print_stats(stats: &EventStats) {
    println!(
        "{} ({} participants)",
        format!("Event {}", stats.event_id).bold(),
        stats.participant_count
    );
    for drill in &stats.drills {
        println!();
        println!("{} [{}]", drill.label.bold(), drill.unit);
        match (drill.min, drill.max, drill.mean) {
            (Some(min), Some(max), Some(mean)) => {
                println!("  min {:.2}  max {:.2}  mean {:.2}", min, max, mean)
            }
            _ => println!("  {}", "no recorded values".yellow()),
        }
        println!("  recorded {}  missing {}", drill.count, drill.missing);
        for entry in &drill.top_performers {
            println!("  {}. {} ({})", entry.rank, entry.player_id, entry.value);
        }
    }
}

pub fn print_templates(templates: &[SportTemplate]) {
    for template in templates {
        println!(
            "{:<12} {} - {}",
            template.id.bold(),
            template.name,
            template.description
        );
        let presets: Vec<&str> = template.presets.iter().map(|p| p.id).collect();
        println!("             presets: {}", presets.join(", "));
    }
}

pub fn print_template(template: &SportTemplate) {
    println!("{} ({})", template.name.bold(), template.id);
    println!("{:<18} {:<24} {:<6} {:<18} {:>7}", "Key", "Label", "Unit", "Direction", "Weight");
    for drill in &template.drills {
        println!(
            "{:<18} {:<24} {:<6} {:<18} {:>7.3}",
            drill.key,
            drill.label,
            drill.unit.as_str(),
            drill.direction.as_str(),
            drill.default_weight
        );
    }
    for preset in &template.presets {
        println!();
        println!("{} - {}", preset.name.bold(), preset.description);
        for (key, weight) in &preset.weights {
            println!("  {:<18} {:.3}", key, weight);
        }
    }
}

pub fn print_drill(drill: &DrillDefinition) -> Result<()> {
    println!("{} {}", "Valid drill:".green().bold(), drill.key);
    print_json(drill)
}
