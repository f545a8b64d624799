//! Writing the rendered formats to the output directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OutputConfig;
use crate::error::{Error, Result};
use crate::export::{
    to_html, to_json, to_markdown, to_report, to_text, ImageArtifact, ImageRefs, JsonOptions,
};
use crate::record::{ProcessingRecord, Timing};

/// An output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Processing record as JSON
    Json,
    /// Markdown
    Markdown,
    /// Standalone HTML page
    Html,
    /// Plain text
    Text,
    /// Summary report
    Report,
}

impl OutputFormat {
    /// All formats in writing order.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Json,
        OutputFormat::Markdown,
        OutputFormat::Html,
        OutputFormat::Text,
        OutputFormat::Report,
    ];

    /// Lowercase name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
            OutputFormat::Report => "report",
        }
    }

    /// Output file name for a document named `stem`.
    pub fn file_name(&self, stem: &str) -> String {
        match self {
            OutputFormat::Json => format!("{}.json", stem),
            OutputFormat::Markdown => format!("{}.md", stem),
            OutputFormat::Html => format!("{}.html", stem),
            OutputFormat::Text => format!("{}.txt", stem),
            OutputFormat::Report => format!("{}_report.txt", stem),
        }
    }

    /// Short label for log and console messages.
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Markdown => "Markdown",
            OutputFormat::Html => "HTML",
            OutputFormat::Text => "Text",
            OutputFormat::Report => "Report",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            "report" | "summary" => Ok(OutputFormat::Report),
            other => Err(Error::InvalidOption(format!("unknown output format '{}'", other))),
        }
    }
}

/// Files produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    /// Output directory
    pub directory: PathBuf,
    /// One entry per written format, in writing order
    pub files: Vec<(OutputFormat, PathBuf)>,
    /// Image files written in referenced mode
    pub artifacts: Vec<PathBuf>,
    /// Backup copy of the source, when enabled
    pub backup: Option<PathBuf>,
}

impl OutputFiles {
    /// Path written for `format`, if any.
    pub fn path(&self, format: OutputFormat) -> Option<&Path> {
        self.files
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, p)| p.as_path())
    }
}

/// Every enabled format rendered in memory.
#[derive(Debug, Clone)]
pub struct RenderedOutputs {
    /// Document name used for file names
    pub name: String,
    /// Rendered text per format
    pub documents: Vec<(OutputFormat, String)>,
    /// Image files for referenced mode
    pub artifacts: Vec<ImageArtifact>,
}

/// Renders and writes the configured formats.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    config: OutputConfig,
    create_backup: bool,
}

impl OutputWriter {
    /// Create a writer for the given output configuration.
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            config: config.clone(),
            create_backup: false,
        }
    }

    /// Also copy the source file into the output directory.
    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.create_backup = enabled;
        self
    }

    /// Output directory.
    pub fn directory(&self) -> &Path {
        &self.config.output_directory
    }

    /// Render every enabled format without touching the filesystem.
    pub fn render(&self, record: &ProcessingRecord, timing: Option<&Timing>) -> Result<RenderedOutputs> {
        let doc = &record.document_content;
        let formats = self.config.formats();

        let needs_images = formats
            .iter()
            .any(|f| matches!(f, OutputFormat::Markdown | OutputFormat::Html));
        let (images, artifacts) = if needs_images {
            ImageRefs::resolve(doc, self.config.image_mode)
        } else {
            (ImageRefs::placeholders(), Vec::new())
        };

        let mut documents = Vec::with_capacity(formats.len());
        for format in formats {
            let content = match format {
                OutputFormat::Json => to_json(record, JsonOptions::from(&self.config))?,
                OutputFormat::Markdown => to_markdown(doc, &images),
                OutputFormat::Html => to_html(doc, &images),
                OutputFormat::Text => to_text(doc),
                OutputFormat::Report => to_report(record, timing),
            };
            documents.push((format, content));
        }

        Ok(RenderedOutputs {
            name: doc.name.clone(),
            documents,
            artifacts,
        })
    }

    /// Render all formats, then create the directory and write the files.
    ///
    /// Nothing is created when rendering fails.
    pub fn write(
        &self,
        record: &ProcessingRecord,
        source: &Path,
        timing: Option<&Timing>,
    ) -> Result<OutputFiles> {
        let rendered = self.render(record, timing)?;
        self.write_rendered(&rendered, source)
    }

    /// Write already rendered outputs.
    pub fn write_rendered(&self, rendered: &RenderedOutputs, source: &Path) -> Result<OutputFiles> {
        let directory = self.config.output_directory.clone();
        fs::create_dir_all(&directory)?;

        let mut output = OutputFiles {
            directory: directory.clone(),
            ..OutputFiles::default()
        };

        for (format, content) in &rendered.documents {
            let path = directory.join(format.file_name(&rendered.name));
            fs::write(&path, content)?;
            log::info!("Saved {}: {}", format.label(), path.display());
            output.files.push((*format, path));
        }

        for artifact in &rendered.artifacts {
            let path = artifact
                .relative_path
                .split('/')
                .fold(directory.clone(), |p, part| p.join(part));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &artifact.data)?;
            output.artifacts.push(path);
        }
        if !output.artifacts.is_empty() {
            log::info!("Saved {} image files", output.artifacts.len());
        }

        if self.create_backup {
            let file_name = source
                .file_name()
                .ok_or_else(|| Error::InvalidOption(format!("no file name in {}", source.display())))?;
            let mut backup_name = file_name.to_os_string();
            backup_name.push(".bak");
            let backup = directory.join(backup_name);
            fs::copy(source, &backup)?;
            log::info!("Saved backup: {}", backup.display());
            output.backup = Some(backup);
        }

        Ok(output)
    }
}
