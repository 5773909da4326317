use clap::{Parser, Subcommand};
use std::process;

use fraudscan::pipeline;
use fraudscan::shared::config;
use fraudscan::shared::output;
use fraudscan::shared::profiles::Profile;
use fraudscan::shared::results::SemanticVerdict;

#[derive(Parser)]
#[command(
    name = "fraudscan",
    about = "Fraud-risk scoring for SMS, chat messages, and call transcripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single message (argument, --file, or stdin)
    Analyze {
        /// Message text to analyze (reads stdin when omitted)
        message: Option<String>,

        /// Read the message from a file instead
        #[arg(long)]
        file: Option<String>,

        /// Recipient profile: student, elderly, business_owner, general
        #[arg(long)]
        profile: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show URL reasons and applied profile multipliers
        #[arg(short = 'v', long)]
        verbose: bool,

        /// Scam probability from an external semantic classifier (0.0-1.0)
        #[arg(long)]
        ai_probability: Option<f64>,

        /// Confidence reported alongside the probability (0.0-1.0)
        #[arg(long)]
        ai_confidence: Option<f64>,

        /// Label reported by the external classifier
        #[arg(long, default_value = "SCAM")]
        ai_label: String,
    },
    /// Score every line of a file in parallel
    Batch {
        /// File with one message per line
        #[arg(long)]
        file: String,

        /// Recipient profile applied to every message
        #[arg(long)]
        profile: Option<String>,

        /// Number of concurrent scoring threads
        #[arg(long, default_value_t = 4)]
        jobs: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show all messages (including Low and Medium)
        #[arg(short = 'a', long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze {
            message,
            file,
            profile,
            json,
            verbose,
            ai_probability,
            ai_confidence,
            ai_label,
        } => cmd_analyze(
            message,
            file,
            profile,
            json,
            verbose,
            ai_probability,
            ai_confidence,
            &ai_label,
        ),
        Commands::Batch {
            file,
            profile,
            jobs,
            json,
            all,
        } => cmd_batch(&file, profile, jobs, json, all),
    };

    process::exit(exit_code);
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    message: Option<String>,
    file: Option<String>,
    profile: Option<String>,
    json: bool,
    verbose: bool,
    ai_probability: Option<f64>,
    ai_confidence: Option<f64>,
    ai_label: &str,
) -> i32 {
    let raw = match read_message(message, file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let text = match pipeline::sanitize(&raw) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let verdict = match resolve_verdict(ai_probability, ai_confidence, ai_label) {
        Ok(verdict) => verdict,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let cfg = config::load_config();
    let profile = profile
        .as_deref()
        .map(Profile::parse)
        .unwrap_or_else(|| cfg.profile());

    let analysis = pipeline::analyze(&text, profile, &verdict);
    if json {
        output::print_json(&analysis);
    } else {
        output::print_text(&analysis, verbose);
    }

    if analysis.fusion.risk_level >= cfg.alert_level() {
        1
    } else {
        0
    }
}

fn read_message(message: Option<String>, file: Option<String>) -> Result<String, String> {
    if let Some(text) = message {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path).map_err(|e| format!("reading {path}: {e}"));
    }
    std::io::read_to_string(std::io::stdin()).map_err(|e| format!("reading stdin: {e}"))
}

/// Both flags present builds an active verdict, both absent runs without
/// the external classifier. One without the other is an error rather
/// than a silent fallback.
fn resolve_verdict(
    probability: Option<f64>,
    confidence: Option<f64>,
    label: &str,
) -> Result<SemanticVerdict, String> {
    match (probability, confidence) {
        (None, None) => Ok(SemanticVerdict::disabled()),
        (Some(p), Some(c)) => {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("--ai-probability out of range: {p}"));
            }
            if !(0.0..=1.0).contains(&c) {
                return Err(format!("--ai-confidence out of range: {c}"));
            }
            Ok(SemanticVerdict::new(p, c, label))
        }
        _ => Err("--ai-probability and --ai-confidence must be given together".to_string()),
    }
}

fn cmd_batch(file: &str, profile: Option<String>, jobs: usize, json: bool, all: bool) -> i32 {
    use colored::Colorize;
    use fraudscan::shared::fusion::RiskLevel;
    use fraudscan::shared::results::Analysis;
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {file}: {e}");
            return 1;
        }
    };

    let messages: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if messages.is_empty() {
        eprintln!("No messages in {file}.");
        return 0;
    }

    let cfg = config::load_config();
    let profile = profile
        .as_deref()
        .map(Profile::parse)
        .unwrap_or_else(|| cfg.profile());
    let verdict = SemanticVerdict::disabled();

    let total = messages.len();
    eprintln!(
        "{}",
        format!("Scoring {} messages (profile: {profile})...", total).bold()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("Failed to build thread pool");

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("##-"),
    );

    let risk_counts: [AtomicU64; 4] = std::array::from_fn(|_| AtomicU64::new(0));
    let error_count = AtomicU64::new(0);
    let flagged = std::sync::Mutex::new(Vec::<Analysis>::new());

    pool.install(|| {
        messages.par_iter().for_each(|line| {
            match pipeline::sanitize(line) {
                Ok(text) => {
                    let analysis = pipeline::analyze(&text, profile, &verdict);
                    let idx = match analysis.fusion.risk_level {
                        RiskLevel::Low => 0,
                        RiskLevel::Medium => 1,
                        RiskLevel::High => 2,
                        RiskLevel::Critical => 3,
                    };
                    risk_counts[idx].fetch_add(1, Ordering::Relaxed);

                    if all || analysis.fusion.risk_level >= RiskLevel::Medium {
                        flagged.lock().unwrap().push(analysis);
                    }
                }
                Err(_) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                }
            }

            pb.inc(1);
        });
    });

    pb.finish_and_clear();

    let mut flagged = flagged.into_inner().unwrap();
    flagged.sort_by(|a, b| a.fusion.final_score.cmp(&b.fusion.final_score));
    let errors = error_count.load(Ordering::Relaxed) as usize;
    let scored = total - errors;

    if json {
        let json_str = serde_json::to_string_pretty(&flagged).expect("Failed to serialize");
        println!("{json_str}");
    } else {
        println!();
        println!("{}", "=== fraudscan batch results ===".bold());
        println!("  Scored: {} messages ({} rejected)", scored, errors);
        println!(
            "  LOW: {}  MEDIUM: {}  HIGH: {}  CRITICAL: {}",
            risk_counts[0].load(Ordering::Relaxed),
            risk_counts[1].load(Ordering::Relaxed),
            risk_counts[2].load(Ordering::Relaxed),
            risk_counts[3].load(Ordering::Relaxed),
        );

        if !flagged.is_empty() {
            println!();
            println!(
                "{}",
                format!(
                    "=== {} {} ===",
                    flagged.len(),
                    if all { "messages" } else { "flagged messages (MEDIUM+)" }
                )
                .bold()
            );
            for analysis in &flagged {
                println!();
                println!("  {}", truncate_preview(&analysis.message));
                output::print_text(analysis, false);
            }
        } else {
            println!();
            println!("{}", "All messages look clean.".green());
        }
    }

    let has_high = risk_counts[2].load(Ordering::Relaxed) > 0
        || risk_counts[3].load(Ordering::Relaxed) > 0;
    if has_high { 1 } else { 0 }
}

/// First 80 characters of the message for the batch listing.
fn truncate_preview(message: &str) -> String {
    if message.chars().count() <= 80 {
        message.to_string()
    } else {
        let cut: String = message.chars().take(77).collect();
        format!("{cut}...")
    }
}
