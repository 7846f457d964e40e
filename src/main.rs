//! PII Redaction CLI.
//!
//! Reads text from a file or stdin, runs the pattern and entity passes, and
//! writes the redacted text. Logs go to stderr so stdout stays clean.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pii_redactor::records::{parse_records, redact_records, write_records};
use pii_redactor::{
    EngineConfig, PatternMatcher, RecognizerConfig, RedactionEngine, RedactorError,
    SubstitutionMode,
};

/// PII Redaction Tool
///
/// Redacts account numbers, SSNs, SWIFT/IBAN codes and emails with regex
/// rules, then names, places, organizations and amounts with an entity model.
#[derive(Parser)]
#[command(name = "pii-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact a text document
    Redact {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        engine: EngineArgs,

        /// Print the result as JSON with the redaction count
        #[arg(long)]
        json: bool,
    },

    /// Print every span the two passes acted on, as JSON
    Detect {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Redact crawled page records (JSON Lines with url, title, body)
    Records {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        engine: EngineArgs,

        /// Worker threads (defaults to available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List the ordered pattern rules
    Rules {
        /// Engine configuration file (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (defaults to stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct EngineArgs {
    /// Engine configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gazetteer file to use as the entity model
    #[arg(long, value_name = "FILE", conflicts_with = "endpoint")]
    gazetteer: Option<PathBuf>,

    /// Entity recognition service base URL
    #[arg(long, value_name = "URL", requires = "model")]
    endpoint: Option<String>,

    /// Model name on the recognition service
    #[arg(long, value_name = "ID", requires = "endpoint")]
    model: Option<String>,

    /// How entity spans are written back
    #[arg(long, value_enum)]
    mode: Option<SubstitutionMode>,

    /// Skip the entity pass and apply pattern rules only
    #[arg(long, conflicts_with_all = ["gazetteer", "endpoint"])]
    patterns_only: bool,
}

impl EngineArgs {
    fn config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(path) = &self.gazetteer {
            config.recognizer = Some(RecognizerConfig::gazetteer(path.display().to_string()));
        }
        if let (Some(endpoint), Some(model)) = (&self.endpoint, &self.model) {
            config.recognizer = Some(RecognizerConfig::remote(endpoint, model));
        }
        if let Some(mode) = self.mode {
            config.substitution = mode;
        }

        Ok(config)
    }

    fn engine(&self) -> Result<RedactionEngine> {
        let config = self.config()?;
        if config.recognizer.is_none() {
            return Err(RedactorError::RecognitionUnavailable {
                model: "<none>".to_string(),
                reason: "no recognizer configured; pass --gazetteer, --endpoint/--model, \
                         a config with [recognizer], or --patterns-only"
                    .to_string(),
            }
            .into());
        }
        let engine = config.engine().context("Invalid engine configuration")?;
        engine.warm_up().context("Entity recognition unavailable")?;
        Ok(engine)
    }

    fn matcher(&self) -> Result<PatternMatcher> {
        let rules = self
            .config()?
            .compile_rules()
            .context("Invalid rule configuration")?;
        Ok(PatternMatcher::new(rules))
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&Path>, contents: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn redact(io_args: &IoArgs, engine_args: &EngineArgs, json: bool) -> Result<()> {
    let text = read_input(io_args.input.as_deref())?;

    let (redacted_text, redaction_count) = if engine_args.patterns_only {
        warn!("Entity pass skipped; output is pattern-redacted only");
        let pass = engine_args.matcher()?.apply(&text);
        (pass.text, pass.count)
    } else {
        let result = engine_args.engine()?.redact(&text).context("Redaction failed")?;
        (result.redacted_text, result.redaction_count)
    };

    info!(redactions = redaction_count, "Redaction complete");

    let rendered = if json {
        let mut out = serde_json::to_string_pretty(&serde_json::json!({
            "redacted_text": redacted_text,
            "redaction_count": redaction_count,
            "complete": !engine_args.patterns_only,
        }))?;
        out.push('\n');
        out
    } else {
        redacted_text
    };

    write_output(io_args.output.as_deref(), rendered.as_bytes())
}

fn detect(io_args: &IoArgs, engine_args: &EngineArgs) -> Result<()> {
    let text = read_input(io_args.input.as_deref())?;
    let detection = engine_args.engine()?.detect(&text).context("Detection failed")?;

    let mut out = serde_json::to_string_pretty(&detection)?;
    out.push('\n');
    write_output(io_args.output.as_deref(), out.as_bytes())
}

fn records(io_args: &IoArgs, engine_args: &EngineArgs, jobs: Option<usize>) -> Result<()> {
    if engine_args.patterns_only {
        anyhow::bail!("--patterns-only is not supported for records; they must be fully redacted");
    }

    let input = read_input(io_args.input.as_deref())?;
    let parsed = parse_records(&input)?;
    let jobs = jobs
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);

    let engine = engine_args.engine()?;
    let redacted = redact_records(&engine, &parsed, jobs).context("Record redaction failed")?;

    let mut out = Vec::new();
    write_records(&redacted, &mut out)?;
    write_output(io_args.output.as_deref(), &out)
}

fn rules(config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut out = String::new();
    for (idx, rule) in config.compile_rules()?.iter().enumerate() {
        out.push_str(&format!(
            "{}. {:<8} {:<24} {}\n",
            idx + 1,
            rule.category().name(),
            rule.replacement_token(),
            rule.pattern().as_str()
        ));
    }
    write_output(None, out.as_bytes())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Redact { io, engine, json } => redact(io, engine, *json),
        Commands::Detect { io, engine } => detect(io, engine),
        Commands::Records { io, engine, jobs } => records(io, engine, *jobs),
        Commands::Rules { config } => rules(config.as_deref()),
    }
}
