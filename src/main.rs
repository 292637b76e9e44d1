use anyhow::Result;

use combine_scoring::cli::Command;
use combine_scoring::{
    handle_completions, handle_drill_rank, handle_rank, handle_stats, handle_templates,
    handle_validate_drill, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Rank(args) => handle_rank(args),
        Command::DrillRank(args) => handle_drill_rank(args),
        Command::Stats(args) => handle_stats(args),
        Command::Templates { template } => handle_templates(template.as_deref()),
        Command::ValidateDrill(args) => handle_validate_drill(args),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
