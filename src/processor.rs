//! Orchestration: validate the input, run the engine, write the outputs.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::detect;
use crate::engine::{ConversionEngine, ConversionStatus, PdfEngine};
use crate::error::{Error, Result};
use crate::output::{OutputFiles, OutputWriter};
use crate::pipeline::PipelineOptions;
use crate::record::{ProcessingRecord, Timing};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    /// The record written as JSON
    pub record: ProcessingRecord,
    /// Files written
    pub files: OutputFiles,
    /// Wall-clock time from engine call to last file written
    pub elapsed: Duration,
    /// Engine warnings (unsupported options and the like)
    pub warnings: Vec<String>,
}

/// Processes one PDF at a time with a fixed configuration.
///
/// # Example
///
/// ```no_run
/// use pdfproc::config::{ConfigOverrides, Settings};
/// use pdfproc::processor::Processor;
///
/// fn main() -> pdfproc::Result<()> {
///     let mut settings = Settings::default();
///     settings.apply(&ConfigOverrides::new().without_ocr())?;
///
///     let processor = Processor::new(settings)?;
///     let outcome = processor.process("document.pdf")?;
///     println!("{} pages", outcome.record.metadata.num_pages);
///     Ok(())
/// }
/// ```
pub struct Processor {
    settings: Settings,
    engine: Arc<dyn ConversionEngine>,
    password: Option<String>,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("settings", &self.settings)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl Processor {
    /// Create a processor using the default [`PdfEngine`].
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_engine(settings, Arc::new(PdfEngine::new()))
    }

    /// Create a processor with a custom engine.
    pub fn with_engine(mut settings: Settings, engine: Arc<dyn ConversionEngine>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            engine,
            password: None,
        })
    }

    /// Password handed to the engine for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Effective settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Name of the engine in use.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Options passed to the engine on every call.
    pub fn pipeline_options(&self) -> PipelineOptions {
        let options = PipelineOptions::from_config(&self.settings.processing);
        match &self.password {
            Some(password) => options.with_password(password.clone()),
            None => options,
        }
    }

    /// Check that `path` is an acceptable input and return its size.
    ///
    /// Touches nothing but the input file.
    pub fn validate_input(&self, path: &Path) -> Result<u64> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let file = &self.settings.file;
        if !file.accepts(path) {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| path.display().to_string());
            return Err(Error::UnsupportedExtension(ext));
        }

        let size_mb = meta.len() as f64 / BYTES_PER_MB;
        if size_mb > file.max_file_size_mb {
            return Err(Error::FileTooLarge {
                size_mb,
                limit_mb: file.max_file_size_mb,
            });
        }

        let header = detect::sniff_path(path)?;
        log::debug!("{}: {}", path.display(), header);

        Ok(meta.len())
    }

    /// Process a single document and write every configured format.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<ProcessingOutcome> {
        let path = path.as_ref();
        let size_bytes = self.validate_input(path)?;

        log::info!("Processing: {}", path.display());
        let options = self.pipeline_options();
        log::debug!(
            "Engine {} with OCR={}, tables={}, threads={}",
            self.engine.name(),
            options.do_ocr,
            options.do_table_structure,
            options.accelerator.num_threads
        );

        let start = Instant::now();
        let result = self.engine.convert(path, &options)?;

        for warning in &result.warnings {
            log::warn!("{}", warning);
        }
        if result.status != ConversionStatus::Success {
            for error in &result.errors {
                log::error!("{}", error);
            }
            return Err(Error::ConversionFailed {
                status: result.status,
                errors: result.errors,
            });
        }
        log::info!(
            "Converted {} pages in {:.2}s",
            result.document.num_pages(),
            start.elapsed().as_secs_f64()
        );

        let timing = Timing::finished_now(start.elapsed());
        let recorded_timing = self.settings.output.include_timing.then_some(&timing);
        let record = ProcessingRecord::new(
            path,
            size_bytes,
            self.engine.name(),
            &self.settings.processing,
            result.document,
            recorded_timing,
        );

        let writer = OutputWriter::new(&self.settings.output)
            .with_backup(self.settings.file.create_backup);
        let files = writer.write(&record, path, Some(&timing))?;

        let elapsed = start.elapsed();
        log::info!("Processing completed in {:.2}s", elapsed.as_secs_f64());

        Ok(ProcessingOutcome {
            record,
            files,
            elapsed,
            warnings: result.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;

    fn settings(dir: &Path) -> Settings {
        Settings {
            output: OutputConfig {
                output_directory: dir.join("out"),
                ..OutputConfig::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn test_new_validates_settings() {
        let mut bad = Settings::default();
        bad.processing.num_threads = 0;
        assert!(matches!(Processor::new(bad), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_validate_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let processor = Processor::new(settings(dir.path())).unwrap();

        let missing = dir.path().join("missing.pdf");
        assert!(matches!(processor.validate_input(&missing), Err(Error::NotFound(_))));

        assert!(matches!(processor.validate_input(dir.path()), Err(Error::NotAFile(_))));

        let docx = dir.path().join("notes.docx");
        fs::write(&docx, b"PK").unwrap();
        assert!(matches!(
            processor.validate_input(&docx),
            Err(Error::UnsupportedExtension(ext)) if ext == ".docx"
        ));

        let fake = dir.path().join("fake.pdf");
        fs::write(&fake, b"not a pdf at all").unwrap();
        assert!(matches!(processor.validate_input(&fake), Err(Error::NotPdf(_))));

        let real = dir.path().join("real.pdf");
        fs::write(&real, b"%PDF-1.7\n%%EOF\n").unwrap();
        assert_eq!(processor.validate_input(&real).unwrap(), 15);

        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = settings(dir.path());
        s.file.max_file_size_mb = 0.000_01;
        let processor = Processor::new(s).unwrap();

        let pdf = dir.path().join("big.pdf");
        fs::write(&pdf, vec![b' '; 64]).unwrap();
        assert!(matches!(processor.validate_input(&pdf), Err(Error::FileTooLarge { .. })));
    }

    #[test]
    fn test_pipeline_options_carry_password() {
        let processor = Processor::new(Settings::default())
            .unwrap()
            .with_password("pw");
        assert_eq!(processor.pipeline_options().password.as_deref(), Some("pw"));
        assert_eq!(processor.engine_name(), "lopdf");
    }
}
