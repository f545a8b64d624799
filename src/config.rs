//! Processing configuration: defaults, TOML settings file and CLI overrides.
//!
//! Settings are resolved in three layers: built-in defaults, an optional
//! TOML file, then [`ConfigOverrides`] (usually from the command line).
//! [`Settings::validate`] runs last and rejects invalid values and flag
//! combinations.
//!
//! ```
//! use pdfproc::config::{ConfigOverrides, Settings};
//!
//! let mut settings = Settings::from_toml_str("[processing]\nnum_threads = 2\n")?;
//! settings.apply(&ConfigOverrides::new().without_ocr())?;
//! settings.validate()?;
//!
//! assert!(!settings.processing.enable_ocr);
//! assert_eq!(settings.processing.num_threads, 2);
//! # Ok::<(), pdfproc::Error>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// File looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pdfproc.toml";

/// Complete processor settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Engine-facing processing options
    pub processing: ProcessingConfig,
    /// Output formats and serialization
    pub output: OutputConfig,
    /// Input file handling
    pub file: FileConfig,
    /// Logging setup (consumed by the CLI)
    pub logging: LoggingConfig,
}

/// Options that end up in the engine's [`PipelineOptions`](crate::pipeline::PipelineOptions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Run OCR on pages without a text layer
    pub enable_ocr: bool,
    /// OCR language codes
    pub ocr_languages: Vec<String>,
    /// Recover table structure
    pub enable_tables: bool,
    /// Match predicted table cells back to text cells
    pub table_cell_matching: bool,
    /// Render page images
    pub generate_page_images: bool,
    /// Extract individual picture images
    pub generate_picture_images: bool,
    /// Classify pictures (photo, graphic, icon)
    pub enable_picture_classification: bool,
    /// Resolution scale for generated page images
    pub image_resolution_scale: f32,
    /// Detect code blocks
    pub enable_code_enrichment: bool,
    /// Detect formulas
    pub enable_formula_enrichment: bool,
    /// Worker threads for the engine
    pub num_threads: usize,
    /// Processing device
    pub device: Device,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_ocr: true,
            ocr_languages: vec!["en".to_string()],
            enable_tables: true,
            table_cell_matching: true,
            generate_page_images: true,
            generate_picture_images: true,
            enable_picture_classification: true,
            image_resolution_scale: 2.0,
            enable_code_enrichment: false,
            enable_formula_enrichment: false,
            num_threads: 4,
            device: Device::Auto,
        }
    }
}

/// Output formats and serialization options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the output files
    pub output_directory: PathBuf,
    /// Write `{name}.json`
    pub save_json: bool,
    /// Write `{name}.md`
    pub save_markdown: bool,
    /// Write `{name}.html`
    pub save_html: bool,
    /// Write `{name}.txt`
    pub save_text: bool,
    /// Write `{name}_report.txt`
    pub save_summary: bool,
    /// How pictures appear in Markdown and HTML
    pub image_mode: ImageMode,
    /// JSON indentation width (0 = compact)
    pub json_indent: usize,
    /// Escape all non-ASCII characters in JSON
    pub json_ensure_ascii: bool,
    /// Include wall-clock timing in the JSON record
    pub include_timing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("output"),
            save_json: true,
            save_markdown: true,
            save_html: true,
            save_text: true,
            save_summary: true,
            image_mode: ImageMode::Placeholder,
            json_indent: 2,
            json_ensure_ascii: false,
            include_timing: false,
        }
    }
}

impl OutputConfig {
    /// Formats enabled by the `save_*` switches, in writing order.
    pub fn formats(&self) -> Vec<OutputFormat> {
        let switches = [
            (self.save_json, OutputFormat::Json),
            (self.save_markdown, OutputFormat::Markdown),
            (self.save_html, OutputFormat::Html),
            (self.save_text, OutputFormat::Text),
            (self.save_summary, OutputFormat::Report),
        ];
        switches
            .into_iter()
            .filter_map(|(on, format)| on.then_some(format))
            .collect()
    }

    /// Enable exactly the given formats.
    pub fn set_formats(&mut self, formats: &[OutputFormat]) {
        self.save_json = formats.contains(&OutputFormat::Json);
        self.save_markdown = formats.contains(&OutputFormat::Markdown);
        self.save_html = formats.contains(&OutputFormat::Html);
        self.save_text = formats.contains(&OutputFormat::Text);
        self.save_summary = formats.contains(&OutputFormat::Report);
    }
}

/// Input file handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Accepted extensions (with leading dot)
    pub supported_extensions: Vec<String>,
    /// Maximum input size in megabytes
    pub max_file_size_mb: f64,
    /// Copy the source file into the output directory
    pub create_backup: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            supported_extensions: vec![".pdf".to_string()],
            max_file_size_mb: 100.0,
            create_backup: false,
        }
    }
}

impl FileConfig {
    /// Whether `path` carries one of the supported extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = format!(".{}", ext.to_lowercase());
        self.supported_extensions.iter().any(|e| *e == ext)
    }
}

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level
    pub level: LogLevel,
    /// Also write log lines to `log_file`
    pub save_logs: bool,
    /// Log file path
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            save_logs: true,
            log_file: PathBuf::from("processing.log"),
        }
    }
}

/// Processing device requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Let the engine choose
    #[default]
    Auto,
    /// Force CPU
    Cpu,
    /// CUDA GPU
    Cuda,
}

/// How pictures are referenced from Markdown and HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// `<!-- image -->` marker
    #[default]
    Placeholder,
    /// Base64 data URI
    Embedded,
    /// Relative path to an extracted image file
    Referenced,
}

/// Log level names accepted in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Lifecycle messages
    #[default]
    Info,
    /// Per-page detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// The matching `log` filter.
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

macro_rules! impl_name_enum {
    ($ty:ty, $($variant:path => $name:literal),+ $(,)?) => {
        impl $ty {
            /// Lowercase name as used in settings files.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(Error::InvalidOption(format!(
                        "unknown {} '{}'",
                        stringify!($ty).to_lowercase(),
                        other
                    ))),
                }
            }
        }
    };
}

impl_name_enum!(Device, Device::Auto => "auto", Device::Cpu => "cpu", Device::Cuda => "cuda");
impl_name_enum!(
    ImageMode,
    ImageMode::Placeholder => "placeholder",
    ImageMode::Embedded => "embedded",
    ImageMode::Referenced => "referenced",
);
impl_name_enum!(
    LogLevel,
    LogLevel::Error => "error",
    LogLevel::Warn => "warn",
    LogLevel::Info => "info",
    LogLevel::Debug => "debug",
    LogLevel::Trace => "trace",
);

/// Overrides applied on top of file/default settings.
///
/// Every field is optional; `None` keeps the underlying value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Enable or disable OCR
    pub enable_ocr: Option<bool>,
    /// Enable or disable table extraction
    pub enable_tables: Option<bool>,
    /// Switch off the expensive enrichment stages
    pub simple: bool,
    /// Replace the OCR language list
    pub ocr_languages: Option<Vec<String>>,
    /// Output directory
    pub output_directory: Option<PathBuf>,
    /// Write exactly these formats
    pub formats: Option<Vec<OutputFormat>>,
    /// Picture rendering mode
    pub image_mode: Option<ImageMode>,
    /// Engine threads
    pub num_threads: Option<usize>,
    /// Processing device
    pub device: Option<Device>,
    /// JSON indentation
    pub json_indent: Option<usize>,
    /// JSON ASCII escaping
    pub json_ensure_ascii: Option<bool>,
    /// Log level
    pub log_level: Option<LogLevel>,
    /// Write the log file
    pub save_logs: Option<bool>,
}

impl ConfigOverrides {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable OCR.
    pub fn without_ocr(mut self) -> Self {
        self.enable_ocr = Some(false);
        self
    }

    /// Disable table extraction.
    pub fn without_tables(mut self) -> Self {
        self.enable_tables = Some(false);
        self
    }

    /// Use the simple (faster) profile.
    pub fn simple(mut self) -> Self {
        self.simple = true;
        self
    }

    /// Set the output directory.
    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    /// Write exactly the given formats.
    pub fn with_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// Set the picture rendering mode.
    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = Some(mode);
        self
    }

    /// Set OCR languages.
    pub fn with_ocr_languages(mut self, languages: Vec<String>) -> Self {
        self.ocr_languages = Some(languages);
        self
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text)
            .map_err(|e: toml::de::Error| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the settings file.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                log::debug!("Loading settings from {}", path.display());
                Self::from_file(path)
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    log::debug!("Loading settings from {}", DEFAULT_CONFIG_FILE);
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Serialize the settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides in place.
    ///
    /// Contradictory overrides (OCR languages together with disabled OCR)
    /// are rejected before anything changes.
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        let ocr_enabled = overrides.enable_ocr.unwrap_or(self.processing.enable_ocr);
        if !ocr_enabled && overrides.ocr_languages.is_some() {
            return Err(Error::InvalidOption(
                "OCR languages given while OCR is disabled".into(),
            ));
        }

        let processing = &mut self.processing;
        if let Some(ocr) = overrides.enable_ocr {
            processing.enable_ocr = ocr;
        }
        if let Some(tables) = overrides.enable_tables {
            processing.enable_tables = tables;
        }
        if overrides.simple {
            processing.enable_picture_classification = false;
            processing.enable_code_enrichment = false;
            processing.enable_formula_enrichment = false;
            processing.generate_picture_images = false;
        }
        if let Some(ref languages) = overrides.ocr_languages {
            processing.ocr_languages = languages.clone();
        }
        if let Some(threads) = overrides.num_threads {
            processing.num_threads = threads;
        }
        if let Some(device) = overrides.device {
            processing.device = device;
        }

        let output = &mut self.output;
        if let Some(ref dir) = overrides.output_directory {
            output.output_directory = dir.clone();
        }
        if let Some(ref formats) = overrides.formats {
            output.set_formats(formats);
        }
        if let Some(mode) = overrides.image_mode {
            output.image_mode = mode;
        }
        if let Some(indent) = overrides.json_indent {
            output.json_indent = indent;
        }
        if let Some(ascii) = overrides.json_ensure_ascii {
            output.json_ensure_ascii = ascii;
        }

        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(save) = overrides.save_logs {
            self.logging.save_logs = save;
        }

        Ok(())
    }

    /// Check values and option combinations, normalizing extensions.
    pub fn validate(&mut self) -> Result<()> {
        let p = &self.processing;
        if p.num_threads == 0 {
            return Err(Error::InvalidOption("num_threads must be at least 1".into()));
        }
        if !(p.image_resolution_scale > 0.0 && p.image_resolution_scale <= 10.0) {
            return Err(Error::InvalidOption(format!(
                "image_resolution_scale must be in (0, 10], got {}",
                p.image_resolution_scale
            )));
        }
        if p.enable_ocr && p.ocr_languages.iter().all(|l| l.trim().is_empty()) {
            return Err(Error::InvalidOption(
                "OCR is enabled but no OCR language is configured".into(),
            ));
        }
        if !p.generate_picture_images && self.output.image_mode != ImageMode::Placeholder {
            return Err(Error::InvalidOption(format!(
                "image_mode '{}' needs picture images, which are disabled",
                self.output.image_mode
            )));
        }

        if self.output.json_indent > 16 {
            return Err(Error::InvalidOption(format!(
                "json_indent must be at most 16, got {}",
                self.output.json_indent
            )));
        }
        if self.output.formats().is_empty() {
            return Err(Error::InvalidOption("no output format selected".into()));
        }

        let file = &mut self.file;
        if !(file.max_file_size_mb > 0.0) {
            return Err(Error::InvalidOption(
                "max_file_size_mb must be positive".into(),
            ));
        }
        file.supported_extensions = file
            .supported_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .collect();
        if file.supported_extensions.is_empty() {
            return Err(Error::InvalidOption(
                "supported_extensions must not be empty".into(),
            ));
        }

        Ok(())
    }
}
