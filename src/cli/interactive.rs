//! Terminal implementation of the interaction collaborator.

use crate::core::interaction::{Interaction, ManualResolution, Resolution};
use crate::core::matcher::similarity;
use crate::models::matching::Match;
use crate::models::media::{Episode, EpisodeId};
use crate::models::plan::{ActionType, Operation, OperationStatus};
use crate::Result;
use colored::Colorize;
use dialoguer::console::Term;
use dialoguer::{Confirm, Select};
use std::collections::HashSet;

/// Prompts on stderr so stdout stays clean for reports.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

/// Remaining episodes ranked for one file: best score first, then catalog order.
fn rank_candidates<'a>(
    file: &Match,
    remaining: &'a [Episode],
    used: &HashSet<EpisodeId>,
) -> Vec<(&'a Episode, f64)> {
    let mut ranked: Vec<(&Episode, f64)> = remaining
        .iter()
        .filter(|e| !used.contains(&e.id()))
        .map(|e| (e, similarity(&file.file.tokens, &e.title_tokens())))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

impl Interaction for TerminalInteraction {
    fn resolve(&mut self, unmatched: &[Match], remaining: &[Episode]) -> Result<ManualResolution> {
        let term = Term::stderr();
        let mut answers = ManualResolution::new();
        let mut used: HashSet<EpisodeId> = HashSet::new();

        eprintln!();
        eprintln!(
            "{}",
            format!("{} file(s) need a decision", unmatched.len()).bold().yellow()
        );

        for (i, m) in unmatched.iter().enumerate() {
            let ranked = rank_candidates(m, remaining, &used);
            if ranked.is_empty() {
                eprintln!("  {} {} (no episodes left)", "skip".dimmed(), m.file.filename);
                answers.insert(m.file.path.clone(), Resolution::Skip);
                continue;
            }

            let mut items = vec!["Skip this file".to_string()];
            items.extend(
                ranked
                    .iter()
                    .map(|(e, score)| format!("{} ({:.0}%)", e, score * 100.0)),
            );
            items.push("Cancel".to_string());

            let default = m
                .suggestion
                .and_then(|id| ranked.iter().position(|(e, _)| e.id() == id))
                .map(|p| p + 1)
                .unwrap_or(0);

            eprintln!();
            let choice = Select::new()
                .with_prompt(format!(
                    "[{}/{}] {}",
                    i + 1,
                    unmatched.len(),
                    m.file.filename
                ))
                .items(&items)
                .default(default)
                .max_length(15)
                .interact_on_opt(&term)?;

            match choice {
                None => return Err(crate::Error::Cancelled),
                Some(0) => {
                    answers.insert(m.file.path.clone(), Resolution::Skip);
                }
                Some(idx) if idx == items.len() - 1 => return Err(crate::Error::Cancelled),
                Some(idx) => {
                    let episode = ranked[idx - 1].0;
                    used.insert(episode.id());
                    answers.insert(m.file.path.clone(), Resolution::Assign(episode.id()));
                }
            }
        }

        Ok(answers)
    }

    fn review(&mut self, operations: &[Operation]) {
        println!();
        println!("{}", "[Planned Operations]".bold().green());
        for op in operations {
            let source = op
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match op.status {
                OperationStatus::Pending => {
                    let verb = match op.action {
                        ActionType::Rename => "rename".cyan(),
                        ActionType::Move => "move  ".blue(),
                    };
                    println!("  {} {}", verb, source);
                    println!("         -> {}", op.destination.display());
                }
                _ => println!(
                    "  {} {} ({})",
                    format!("{:?}", op.status).to_lowercase().yellow(),
                    source,
                    op.reason.as_deref().unwrap_or("")
                ),
            }
        }
        println!();
    }

    fn confirm(&mut self, operations: &[Operation]) -> Result<bool> {
        let pending = operations.iter().filter(|o| o.is_pending()).count();
        let answer = Confirm::new()
            .with_prompt(format!("Apply {} operation(s)?", pending))
            .default(false)
            .interact_on(&Term::stderr())?;
        Ok(answer)
    }
}
