use std::io::Read;

use clap::Parser;
use red_flag_filter::{
    analyze_message, AnalysisResult, InboundMessage, SenderContext, Triage, TriageStats,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "red-flag-filter",
    about = "Flag manipulation, scams and threats in direct messages",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Treat every non-empty line as a separate message
    #[arg(long)]
    per_line: bool,

    /// Messages recently received from the sender
    #[arg(long, value_name = "N")]
    frequency: Option<u32>,

    /// Age of the sender's account in days
    #[arg(long, value_name = "DAYS")]
    account_age_days: Option<u32>,

    /// Single-line JSON output
    #[arg(long, conflicts_with = "text")]
    compact: bool,

    /// Human-readable report instead of JSON
    #[arg(long)]
    text: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn sender_context(&self) -> Option<SenderContext> {
        if self.frequency.is_none() && self.account_age_days.is_none() {
            return None;
        }
        Some(SenderContext {
            message_frequency: self.frequency,
            account_age_days: self.account_age_days,
        })
    }

    fn emit(&self, result: &AnalysisResult) -> Result<(), serde_json::Error> {
        if self.text {
            println!("{result}");
        } else {
            println!("{}", self.to_json(result)?);
        }
        Ok(())
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
    }
}

#[derive(Serialize)]
struct BatchSummary {
    #[serde(flatten)]
    stats: TriageStats,
    flagged: usize,
    unique_ids: usize,
}

fn read_inputs(files: &[String]) -> std::io::Result<Vec<(String, String)>> {
    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(vec![("stdin".to_string(), input)]);
    }
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|text| (path.clone(), text))
                .map_err(|e| std::io::Error::new(e.kind(), format!("{path}: {e}")))
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("red_flag_filter={default_level}"))),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = cli.sender_context();
    let inputs = read_inputs(&cli.files)?;

    if !cli.per_line {
        for (_, text) in &inputs {
            let result = analyze_message(text, ctx.as_ref());
            cli.emit(&result)?;
        }
        return Ok(());
    }

    let mut triage = Triage::default();
    let mut flagged = 0;
    for (source, text) in &inputs {
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut msg = InboundMessage::new(
                format!("{source}:{}", idx + 1),
                source.as_str(),
                line,
            );
            if let Some(ctx) = ctx {
                msg = msg.with_context(ctx);
            }
            if let Some(outcome) = triage.process(&msg) {
                if outcome.analysis.is_flagged() {
                    flagged += 1;
                }
                cli.emit(&outcome.analysis)?;
            }
        }
    }
    let summary = BatchSummary {
        stats: triage.stats(),
        flagged,
        unique_ids: triage.seen().len(),
    };
    eprintln!("{}", cli.to_json(&summary)?);

    Ok(())
}
