//! pdfproc CLI - configurable PDF processing tool

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfproc::config::LoggingConfig;
use pdfproc::{
    ConfigOverrides, Device, Error, ImageMode, LogLevel, OutputFormat, ProcessingOutcome,
    Processor, Settings,
};

#[derive(Parser)]
#[command(name = "pdfproc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Process PDF files into JSON, Markdown, HTML, text and a summary report",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, global = true, env = "PDFPROC_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Disable OCR
    #[arg(long)]
    no_ocr: bool,

    /// Disable table structure extraction
    #[arg(long)]
    no_tables: bool,

    /// Faster processing: no picture images, classification or enrichment
    #[arg(long)]
    simple: bool,

    /// OCR language (repeatable)
    #[arg(long = "ocr-lang", value_name = "LANG")]
    ocr_lang: Vec<String>,

    /// Output format to write (repeatable; default: all)
    #[arg(short, long = "format", value_enum, value_name = "FMT")]
    format: Vec<FormatArg>,

    /// How pictures appear in Markdown and HTML
    #[arg(long, value_enum, value_name = "MODE")]
    image_mode: Option<ImageModeArg>,

    /// Engine worker threads
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Processing device
    #[arg(long, value_enum, value_name = "DEV")]
    device: Option<DeviceArg>,

    /// JSON indentation (0 = compact)
    #[arg(long, value_name = "N")]
    json_indent: Option<usize>,

    /// Escape non-ASCII characters in JSON
    #[arg(long)]
    ensure_ascii: bool,

    /// Password for encrypted PDFs
    #[arg(long, env = "PDFPROC_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log level
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,

    /// Do not write the log file
    #[arg(long)]
    no_log_file: bool,

    /// Only print errors and warnings
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings as TOML
    Config,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Processing record as JSON
    Json,
    /// Markdown
    #[value(alias = "md")]
    Markdown,
    /// Standalone HTML page
    Html,
    /// Plain text
    #[value(alias = "txt")]
    Text,
    /// Summary report
    #[value(alias = "summary")]
    Report,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Report => OutputFormat::Report,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ImageModeArg {
    /// `<!-- image -->` marker
    Placeholder,
    /// Base64 data URI
    Embedded,
    /// Separate image files
    Referenced,
}

impl From<ImageModeArg> for ImageMode {
    fn from(mode: ImageModeArg) -> Self {
        match mode {
            ImageModeArg::Placeholder => ImageMode::Placeholder,
            ImageModeArg::Embedded => ImageMode::Embedded,
            ImageModeArg::Referenced => ImageMode::Referenced,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DeviceArg {
    /// Let the engine choose
    Auto,
    /// CPU only
    Cpu,
    /// CUDA GPU
    Cuda,
}

impl From<DeviceArg> for Device {
    fn from(device: DeviceArg) -> Self {
        match device {
            DeviceArg::Auto => Device::Auto,
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Cuda => Device::Cuda,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let log_level = match (self.log_level, self.quiet) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LogLevel::Warn),
            (None, false) => None,
        };

        ConfigOverrides {
            enable_ocr: self.no_ocr.then_some(false),
            enable_tables: self.no_tables.then_some(false),
            simple: self.simple,
            ocr_languages: (!self.ocr_lang.is_empty()).then(|| self.ocr_lang.clone()),
            output_directory: self.output_dir.clone(),
            formats: (!self.format.is_empty())
                .then(|| self.format.iter().map(|&f| f.into()).collect()),
            image_mode: self.image_mode.map(Into::into),
            num_threads: self.threads,
            device: self.device.map(Into::into),
            json_indent: self.json_indent,
            json_ensure_ascii: self.ensure_ascii.then_some(true),
            log_level,
            save_logs: self.no_log_file.then_some(false),
        }
    }

    fn settings(&self) -> Result<Settings, Error> {
        let mut settings = Settings::load(self.config.as_deref())?;
        settings.apply(&self.overrides())?;
        settings.validate()?;
        Ok(settings)
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Config) => cmd_config(&cli),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match cli.input.as_deref() {
            Some(input) => cmd_process(&cli, input),
            None => {
                println!("{}", "Usage: pdfproc [OPTIONS] <FILE>".yellow());
                println!("       pdfproc --help for more information");
                Err(Error::InvalidOption("no input file given".into()))
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &Error) -> i32 {
    if err.is_input_error() {
        2
    } else {
        1
    }
}

fn cmd_process(cli: &Cli, input: &Path) -> Result<(), Error> {
    let settings = cli.settings()?;
    let logging = settings.logging.clone();

    let mut processor = Processor::new(settings)?;
    if let Some(password) = &cli.password {
        processor = processor.with_password(password.as_str());
    }
    // Nothing, not even the log file, is created for a rejected input.
    processor.validate_input(input)?;
    init_logging(&logging)?;

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Processing {}...", input.display()));

    let outcome = processor.process(input);
    pb.finish_and_clear();

    let outcome = outcome.map_err(|e| {
        log::error!("Failed to process {}: {}", input.display(), e);
        e
    })?;
    if !cli.quiet {
        print_summary(input, &outcome);
    }
    Ok(())
}

fn print_summary(input: &Path, outcome: &ProcessingOutcome) {
    let record = &outcome.record;

    println!("\n{}", "Processing complete".green().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), record.metadata.num_pages);
    println!("{}: {:.2}s", "Time".bold(), outcome.elapsed.as_secs_f64());
    println!("{}: {}", "Tables".bold(), record.statistics.num_tables);
    println!("{}: {}", "Images".bold(), record.statistics.num_pictures);
    println!("{}: {}", "Output".bold(), outcome.files.directory.display());

    if !outcome.warnings.is_empty() {
        println!("{}: {}", "Warnings".yellow().bold(), outcome.warnings.len());
    }

    println!("\n{}", "Generated files:".green().bold());
    let files = &outcome.files.files;
    for (i, (_, path)) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() && outcome.files.artifacts.is_empty() {
            "└─"
        } else {
            "├─"
        };
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }
    if !outcome.files.artifacts.is_empty() {
        println!(
            "  {} {} image files",
            "└─".dimmed(),
            outcome.files.artifacts.len()
        );
    }
}

fn cmd_config(cli: &Cli) -> Result<(), Error> {
    let settings = cli.settings()?;
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfproc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF processing tool");
    println!();
    println!("Outputs: JSON, Markdown, HTML, text, summary report");
    println!("License: MIT");
}

/// Console logger, optionally copying every line to the log file.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), Error> {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            buf.timestamp_seconds(),
            record.level(),
            record.args()
        )
    });

    if config.save_logs {
        if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
    }

    // A logger may already be installed when embedded; keep it.
    let _ = builder.try_init();
    Ok(())
}

struct TeeWriter {
    file: fs::File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
