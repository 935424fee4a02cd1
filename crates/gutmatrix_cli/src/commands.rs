use crate::cli::{Cli, Commands, ProblemAction};
use anyhow::{bail, Context, Result};
use gutmatrix_core::db::open_db;
use gutmatrix_core::{
    core_version, default_log_level, init_logging, problem_id_for_name, ProblemId, ProblemRegistry,
    ReportBuilder, ReportEntry, Role, SqliteProblemRepository, SqliteVoteRepository, VoteStore,
};
use log::info;

pub fn init_logging_from_cli(cli: &Cli) -> Result<()> {
    let Some(log_dir) = cli.log_dir.as_ref() else {
        return Ok(());
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().as_str().to_string());
    let log_dir = log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    init_logging(&level, log_dir)?;
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let role = if cli.admin { Role::Admin } else { Role::Participant };
    info!(
        "event=cli_command module=cli status=start admin={} core_version={}",
        cli.admin,
        core_version()
    );

    match cli.command {
        Commands::Problem { action } => {
            let registry = ProblemRegistry::new(SqliteProblemRepository::try_new(&conn)?);
            match action {
                ProblemAction::Add { name, description } => {
                    let id = registry.create_or_update(role, &name, description.as_deref())?;
                    println!("{id}");
                }
                ProblemAction::List => {
                    for problem in registry.list()? {
                        println!(
                            "{}  {}  {}",
                            problem.id,
                            problem.name,
                            problem.description.unwrap_or_default()
                        );
                    }
                }
                ProblemAction::Remove { problem } => {
                    if !registry.remove(role, resolve_problem(&problem))? {
                        bail!("no problem matches `{problem}`");
                    }
                }
            }
        }
        Commands::Vote {
            problem,
            participant,
            gravity,
            urgency,
            trend,
        } => {
            let votes = VoteStore::new(SqliteVoteRepository::try_new(&conn)?);
            let vote = votes.upsert_vote(
                resolve_problem(&problem),
                &participant,
                gravity,
                urgency,
                trend,
            )?;
            println!(
                "recorded G={} U={} T={} (product {})",
                vote.score.gravity(),
                vote.score.urgency(),
                vote.score.trend(),
                vote.score.product()
            );
        }
        Commands::MyVotes { participant } => {
            let votes = VoteStore::new(SqliteVoteRepository::try_new(&conn)?);
            for entry in votes.participant_ballot(&participant)? {
                let current = entry
                    .vote
                    .map(|vote| {
                        format!(
                            "G={} U={} T={}",
                            vote.score.gravity(),
                            vote.score.urgency(),
                            vote.score.trend()
                        )
                    })
                    .unwrap_or_else(|| "not voted".to_string());
                println!("{}  {}  {}", entry.problem.id, entry.problem.name, current);
            }
        }
        Commands::Report { json } => {
            let reports = ReportBuilder::new(SqliteVoteRepository::try_new(&conn)?);
            let entries = reports.build_report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_report(&entries);
            }
        }
        Commands::Stats => {
            let reports = ReportBuilder::new(SqliteVoteRepository::try_new(&conn)?);
            let stats = reports.workspace_stats()?;
            println!(
                "problems={} votes={} participants={}",
                stats.problems, stats.votes, stats.participants
            );
        }
        Commands::Export => {
            let reports = ReportBuilder::new(SqliteVoteRepository::try_new(&conn)?);
            for row in reports.export_rows()? {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Commands::Reset => {
            let registry = ProblemRegistry::new(SqliteProblemRepository::try_new(&conn)?);
            let summary = registry.reset(role)?;
            println!(
                "removed {} problems and {} votes",
                summary.problems_removed, summary.votes_removed
            );
        }
    }

    Ok(())
}

/// Accepts either a problem id or a problem name.
fn resolve_problem(value: &str) -> ProblemId {
    value
        .trim()
        .parse::<ProblemId>()
        .unwrap_or_else(|_| problem_id_for_name(value))
}

fn print_report(entries: &[ReportEntry]) {
    if entries.is_empty() {
        println!("no votes recorded yet");
        return;
    }

    println!(
        "{:<4} {:<32} {:>5} {:>6} {:>6} {:>6} {:>8}  {:<8} consensus(g/u/t)",
        "#", "problem", "votes", "G", "U", "T", "GUT", "priority"
    );
    for (rank, entry) in entries.iter().enumerate() {
        let shown = entry.aggregate.rounded();
        println!(
            "{:<4} {:<32} {:>5} {:>6.2} {:>6.2} {:>6.2} {:>8.2}  {:<8} {}/{}/{}",
            rank + 1,
            entry.problem.name,
            shown.count,
            shown.gravity.mean,
            shown.urgency.mean,
            shown.trend.mean,
            shown.gut_score,
            entry.priority.label(),
            entry.consensus.gravity,
            entry.consensus.urgency,
            entry.consensus.trend
        );
    }
}
