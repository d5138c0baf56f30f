//! Odd-one-out CLI
//!
//! Explore a category taxonomy and solve odd-one-out puzzles against it:
//! - closure queries (`ancestors`, `descendants`, `classify`)
//! - the lowest-common-ancestor search (`lca`)
//! - single puzzles (`solve`) and whole datasets (`evaluate`)
//!
//! Results go to stdout (`--json` for machine-readable output); logs go to
//! stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use oddoneout_solver::{
    solve_puzzle, solve_puzzles, ProgressEvent, ProgressLogger, Puzzle, PuzzleDataset,
    SilentLogger, TaxonomySimilarity, TracingLogger,
};
use oddoneout_taxonomy::{classify, lowest_common_ancestor, specificity, LabelSet, Taxonomy};
use serde_json::json;
use tracing::Level;

mod backend;

use backend::BackendArgs;

#[derive(Parser)]
#[command(name = "oddoneout")]
#[command(author, version, about = "Odd-one-out puzzles over a category taxonomy")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Every category above a label, up to the root
    Ancestors { label: String },

    /// Every instance below a label
    Descendants {
        label: String,
        /// Print at most this many labels (the count is always exact)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Instance, category or unknown, with specificity
    Classify {
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Smallest category covering the members but not the odd label
    Lca {
        /// The label the category must exclude
        #[arg(long)]
        odd: String,
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// Solve one puzzle: which of the five labels is the odd one out?
    Solve {
        /// Label believed to be odd (tried like every other)
        #[arg(long)]
        odd: String,
        /// The four group members
        #[arg(num_args = 4, required = true)]
        members: Vec<String>,
        /// Ground-truth category, reported alongside the answer
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Solve every puzzle in a file and report accuracy
    Evaluate {
        /// Puzzle file: category, odd, member1..member4 per line
        puzzles: PathBuf,
        /// Only the first N puzzles
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut taxonomy = cli.backend.open()?;
    match cli.command {
        Commands::Ancestors { label } => cmd_ancestors(&mut taxonomy, &label, cli.json),
        Commands::Descendants { label, limit } => {
            cmd_descendants(&mut taxonomy, &label, limit, cli.json)
        }
        Commands::Classify { labels } => cmd_classify(&mut taxonomy, &labels, cli.json),
        Commands::Lca { odd, members } => cmd_lca(&mut taxonomy, &members, &odd, cli.json),
        Commands::Solve {
            odd,
            members,
            category,
        } => cmd_solve(taxonomy, &odd, &members, &category, cli.json),
        Commands::Evaluate { puzzles, limit } => cmd_evaluate(taxonomy, &puzzles, limit, cli.json),
    }
}

fn print_labels(labels: &LabelSet, limit: Option<usize>) {
    for label in labels.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("  {label}");
    }
    if let Some(limit) = limit {
        if labels.len() > limit {
            println!("  {}", format!("... {} more", labels.len() - limit).dimmed());
        }
    }
}

fn cmd_ancestors(taxonomy: &mut Box<dyn Taxonomy>, label: &str, as_json: bool) -> Result<()> {
    let ancestors = taxonomy.try_ancestor_categories(label)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({
            "label": label,
            "ancestors": ancestors,
        }))?);
        return Ok(());
    }
    println!(
        "{} {} ({} categories)",
        "Ancestors of".green().bold(),
        label.bold(),
        ancestors.len()
    );
    print_labels(&ancestors, None);
    Ok(())
}

fn cmd_descendants(
    taxonomy: &mut Box<dyn Taxonomy>,
    label: &str,
    limit: Option<usize>,
    as_json: bool,
) -> Result<()> {
    let descendants = taxonomy.try_descendant_instances(label)?;
    if as_json {
        let shown: Vec<&String> = descendants.iter().take(limit.unwrap_or(usize::MAX)).collect();
        println!("{}", serde_json::to_string_pretty(&json!({
            "label": label,
            "count": descendants.len(),
            "descendants": shown,
        }))?);
        return Ok(());
    }
    println!(
        "{} {} ({} instances)",
        "Descendants of".green().bold(),
        label.bold(),
        descendants.len()
    );
    print_labels(&descendants, limit);
    Ok(())
}

fn cmd_classify(taxonomy: &mut Box<dyn Taxonomy>, labels: &[String], as_json: bool) -> Result<()> {
    let mut rows = Vec::with_capacity(labels.len());
    for label in labels {
        let kind = classify(taxonomy, label);
        let size = specificity(taxonomy, label);
        rows.push(json!({ "label": label, "kind": kind, "specificity": size }));
        if !as_json {
            let kind = serde_json::to_value(kind)?;
            let kind = kind.as_str().unwrap_or_default().to_string();
            println!("{:<40} {:<10} {}", label.bold(), kind.cyan(), size);
        }
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

fn cmd_lca(
    taxonomy: &mut Box<dyn Taxonomy>,
    members: &[String],
    odd: &str,
    as_json: bool,
) -> Result<()> {
    let ancestor = lowest_common_ancestor(taxonomy, members, odd);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&ancestor)?);
        return Ok(());
    }
    let fallback = ancestor.category == taxonomy.root();
    println!(
        "{} {} (size {})",
        "LCA:".green().bold(),
        ancestor.category.bold(),
        ancestor.size
    );
    if fallback {
        println!("  {}", "no common category excludes the odd label; fell back to root".yellow());
    }
    Ok(())
}

fn cmd_solve(
    taxonomy: Box<dyn Taxonomy>,
    odd: &str,
    members: &[String],
    category: &str,
    as_json: bool,
) -> Result<()> {
    let members: [&str; 4] = [&members[0], &members[1], &members[2], &members[3]];
    let puzzle = Puzzle::new(odd, members, category);
    let mut similarity = TaxonomySimilarity::new(taxonomy);
    let solution = solve_puzzle(&puzzle, &mut similarity);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }
    let verdict = if solution.predicted_odd == puzzle.true_odd {
        "matches".green()
    } else {
        "differs from".red()
    };
    println!(
        "{} {} (category {}, score {:.6})",
        "Odd one out:".green().bold(),
        solution.predicted_odd.bold(),
        solution.category,
        solution.score
    );
    println!("  {verdict} the expected answer {}", puzzle.true_odd);
    Ok(())
}

/// Prints a line per puzzle as it is solved.
struct ConsoleLogger;

impl ProgressLogger for ConsoleLogger {
    fn puzzle_solved(&mut self, event: &ProgressEvent<'_>) {
        let mark = if event.correct { "ok".green() } else { "miss".red() };
        println!(
            "[{:>3}/{}] {:<4} {} (expected {}, via {})",
            event.index + 1,
            event.total,
            mark,
            event.solution.predicted_odd.bold(),
            event.puzzle.true_odd,
            event.solution.category
        );
    }
}

fn cmd_evaluate(
    taxonomy: Box<dyn Taxonomy>,
    path: &std::path::Path,
    limit: Option<usize>,
    as_json: bool,
) -> Result<()> {
    let dataset = oddoneout_ingest::read_puzzles(path)?;
    let dataset: PuzzleDataset = match limit {
        Some(n) => dataset.iter().take(n).cloned().collect(),
        None => dataset,
    };
    let mut similarity = TaxonomySimilarity::new(taxonomy);

    let report = if as_json {
        solve_puzzles(&dataset, &mut similarity, &mut SilentLogger)
    } else if tracing::enabled!(Level::INFO) {
        solve_puzzles(&dataset, &mut similarity, &mut TracingLogger)
    } else {
        solve_puzzles(&dataset, &mut similarity, &mut ConsoleLogger)
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({
            "report": report,
            "accuracy": report.accuracy(),
            "cache": similarity.taxonomy().cache_stats(),
        }))?);
        return Ok(());
    }
    println!(
        "{} {} correct, {} incorrect, {} total ({:.1}%)",
        "Evaluated:".green().bold(),
        report.num_correct,
        report.num_incorrect,
        report.num_total,
        100.0 * report.accuracy()
    );
    if !report.is_consistent() {
        println!("  {}", "counts do not add up to the dataset size".yellow());
    }
    Ok(())
}
