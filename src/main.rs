// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use lexparity::app_config::{self, Config};
use lexparity::corpus::{find_untranslated, write_report, CleanCache, CorpusLayout, CorpusRunner, DigitFilter};
use lexparity::file_utils::FileManager;
use lexparity::parity::ParityChecker;
use lexparity::PairOutcome;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every translated entry of the corpus (default command)
    Check(CheckArgs),

    /// Check a single source/target pair
    Pair(PairArgs),

    /// List source entries that have no translation yet
    Untranslated(UntranslatedArgs),

    /// Generate shell completions for lexparity
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Default)]
struct CheckArgs {
    /// Last digit(s) of the BDB number to include (0-9), all when omitted
    #[arg(value_name = "DIGIT", value_parser = clap::value_parser!(u8).range(0..=9))]
    digits: Vec<u8>,

    /// Directory of source entries
    #[arg(long)]
    source_dir: Option<String>,

    /// Directory of translated entries
    #[arg(long)]
    target_dir: Option<String>,

    /// Directory of plain-text translations to look for in the targets
    #[arg(long)]
    text_dir: Option<String>,

    /// JSON lines report path
    #[arg(short, long)]
    report: Option<String>,

    /// Clean cache file
    #[arg(long)]
    cache: Option<String>,

    /// Ignore the clean cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Parser, Debug)]
struct PairArgs {
    /// Source (English) entry
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Target (French) entry
    #[arg(value_name = "TARGET")]
    target: PathBuf,

    /// Plain-text translation whose lines must appear in the target
    #[arg(long, value_name = "TEXT")]
    text: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct UntranslatedArgs {
    /// Last digit(s) of the BDB number to include (0-9), all when omitted
    #[arg(value_name = "DIGIT", value_parser = clap::value_parser!(u8).range(0..=9))]
    digits: Vec<u8>,

    /// Maximum number of entries to list
    #[arg(short = 'n', long, default_value_t = 20)]
    limit: usize,

    /// Only print totals, no entry list
    #[arg(long)]
    count: bool,
}

/// lexparity - structural parity checker for the translated BDB lexicon
///
/// Compares each French entry with its English source and reports
/// structural drift, altered Hebrew and suspicious length changes.
#[derive(Parser, Debug)]
#[command(name = "lexparity")]
#[command(version)]
#[command(about = "Structural parity checker for a translated lexicon")]
#[command(long_about = "lexparity checks translated lexicon entries against their source for structural parity.

EXAMPLES:
    lexparity                                   # Check the whole corpus using default config
    lexparity check 1 5                         # Check entries whose number ends in 1 or 5
    lexparity check --no-cache -r out.jsonl     # Re-check everything, custom report path
    lexparity pair Entries/BDB17.html Entries.fr/BDB17.html
    lexparity check --text-dir Entries_txt_fr   # Also look for the plain-text translation
    lexparity untranslated 3 -n 5               # Show 5 untranslated entries ending in 3
    lexparity untranslated --count              # Just totals
    lexparity completions bash > lexparity.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

EXIT STATUS:
    1 when any pair is flagged or unprocessable, or any entry is untranslated")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @returns: log filter for a configured level
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() -> Result<ExitCode> {
    // Initialize the logger at trace and narrow it once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let failed = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lexparity", &mut std::io::stdout());
            false
        }
        Some(Commands::Check(args)) => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_check(&config, args)?
        }
        Some(Commands::Pair(args)) => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_pair(&config, args)?
        }
        Some(Commands::Untranslated(args)) => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_untranslated(&config, args)?
        }
        None => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_check(&config, CheckArgs::default())?
        }
    };

    log::logger().flush();
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Load the configuration, writing a default one when the file is missing
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        FileManager::write_to_file(config_path, &config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Update log level in config if specified via command line
    match cli_log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn run_check(config: &Config, args: CheckArgs) -> Result<bool> {
    let mut corpus = config.corpus.clone();
    if let Some(source_dir) = args.source_dir {
        corpus.source_dir = source_dir;
    }
    if let Some(target_dir) = args.target_dir {
        corpus.target_dir = target_dir;
    }
    if args.text_dir.is_some() {
        corpus.text_dir = args.text_dir;
    }
    if let Some(report) = args.report {
        corpus.report_path = report;
    }
    if args.cache.is_some() {
        corpus.cache_path = args.cache;
    }

    let layout = CorpusLayout::from_config(&corpus);
    let filter = DigitFilter::from_digits(args.digits)?;
    let checker = ParityChecker::with_config(&config.parity)?;

    let cache = match &corpus.cache_path {
        Some(path) if !args.no_cache => CleanCache::load(path, &config.parity.fingerprint())?,
        _ => CleanCache::disabled(),
    };

    info!(
        "Checking {:?} against {:?} (digits: {})",
        layout.source_dir,
        layout.target_dir,
        filter.label()
    );

    let mut runner = CorpusRunner::new(checker)
        .with_cache(cache)
        .with_progress(!args.no_progress);
    let run = runner.run(&layout, &filter)?;

    write_report(&corpus.report_path, &run.outcomes)
        .context(format!("Failed to write report: {}", corpus.report_path))?;

    for outcome in &run.outcomes {
        if let PairOutcome::Checked(report) = outcome {
            if !report.is_clean() {
                warn!("{}: {} discrepancies", report.entry, report.discrepancies.len());
            }
        }
    }
    for line in run.summary.lines() {
        info!("{}", line);
    }
    info!("Report written to {}", corpus.report_path);

    Ok(run.summary.has_failures())
}

fn run_pair(config: &Config, args: PairArgs) -> Result<bool> {
    let checker = ParityChecker::with_config(&config.parity)?;
    let entry = FileManager::file_stem(&args.source)
        .ok_or_else(|| anyhow!("Source path has no file name: {:?}", args.source))?;

    let source = FileManager::read_to_string(&args.source)?;
    let target = FileManager::read_to_string(&args.target)?;
    let text = args.text.as_ref().map(FileManager::read_to_string).transpose()?;

    let outcome = PairOutcome::from_result(
        &entry,
        checker.check_pair_with_text(&entry, &source, &target, text.as_deref()),
    );

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize pair outcome")?;
        println!("{}", json);
    } else {
        match &outcome {
            PairOutcome::Checked(report) if report.is_clean() => println!("{}: clean", entry),
            PairOutcome::Checked(report) => {
                for line in report.describe() {
                    println!("{}", line);
                }
            }
            PairOutcome::Unprocessable { side, reason, .. } => {
                println!("{}: unprocessable ({}): {}", entry, side, reason);
            }
        }
    }

    Ok(!outcome.is_clean())
}

fn run_untranslated(config: &Config, args: UntranslatedArgs) -> Result<bool> {
    let layout = CorpusLayout::from_config(&config.corpus);
    let filter = DigitFilter::from_digits(args.digits)?;
    let report = find_untranslated(&layout, &filter)?;

    println!(
        "{} (ending in {}): {}/{} translated, {} remaining",
        config.corpus.target_dir,
        filter.label(),
        report.translated(),
        report.total,
        report.missing.len()
    );
    if let Some(text_dir) = &config.corpus.text_dir {
        println!(
            "{} of the remaining are awaiting their text in {}",
            report.awaiting_text(),
            text_dir
        );
    }

    if !args.count {
        let shown = report.missing.len().min(args.limit);
        for pair in report.missing.iter().take(shown) {
            let size = std::fs::metadata(&pair.source).map(|m| m.len()).unwrap_or(0);
            let note = if pair.awaits_text() { "  (awaiting text)" } else { "" };
            println!("  {:>12}  ({:>6} bytes)  {}{}", pair.entry, size, pair.source.display(), note);
        }
        if report.missing.len() > shown {
            println!("  ... and {} more", report.missing.len() - shown);
        }
    }

    Ok(!report.missing.is_empty())
}
