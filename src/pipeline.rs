//! Options handed to the conversion engine.

use serde::{Deserialize, Serialize};

use crate::config::{Device, ProcessingConfig};

/// Engine-facing options built from [`ProcessingConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Run OCR on pages without a text layer
    pub do_ocr: bool,

    /// OCR languages (empty when OCR is off)
    pub ocr_languages: Vec<String>,

    /// Recover table structure
    pub do_table_structure: bool,

    /// Match table cells to text cells (only with table structure)
    pub table_cell_matching: bool,

    /// Render page images
    pub generate_page_images: bool,

    /// Page image scale (only with page images)
    pub images_scale: Option<f32>,

    /// Attach picture image data
    pub generate_picture_images: bool,

    /// Classify pictures
    pub do_picture_classification: bool,

    /// Detect code blocks
    pub do_code_enrichment: bool,

    /// Detect formulas
    pub do_formula_enrichment: bool,

    /// Threads and device
    pub accelerator: AcceleratorOptions,

    /// Password for encrypted documents
    #[serde(skip)]
    pub password: Option<String>,
}

/// Compute resources available to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratorOptions {
    /// Worker threads
    pub num_threads: usize,
    /// Processing device
    pub device: Device,
}

impl Default for AcceleratorOptions {
    fn default() -> Self {
        Self {
            num_threads: 4,
            device: Device::Auto,
        }
    }
}

impl PipelineOptions {
    /// Create options from the default processing configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a processing configuration onto engine options.
    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self {
            do_ocr: config.enable_ocr,
            ocr_languages: if config.enable_ocr {
                config.ocr_languages.clone()
            } else {
                Vec::new()
            },
            do_table_structure: config.enable_tables,
            table_cell_matching: config.enable_tables && config.table_cell_matching,
            generate_page_images: config.generate_page_images,
            images_scale: config
                .generate_page_images
                .then_some(config.image_resolution_scale),
            generate_picture_images: config.generate_picture_images,
            do_picture_classification: config.enable_picture_classification,
            do_code_enrichment: config.enable_code_enrichment,
            do_formula_enrichment: config.enable_formula_enrichment,
            accelerator: AcceleratorOptions {
                num_threads: config.num_threads.max(1),
                device: config.device,
            },
            password: None,
        }
    }

    /// Enable or disable OCR.
    pub fn with_ocr(mut self, enabled: bool) -> Self {
        self.do_ocr = enabled;
        if !enabled {
            self.ocr_languages.clear();
        }
        self
    }

    /// Enable or disable table structure recovery.
    pub fn with_table_structure(mut self, enabled: bool) -> Self {
        self.do_table_structure = enabled;
        if !enabled {
            self.table_cell_matching = false;
        }
        self
    }

    /// Enable or disable picture image data.
    pub fn with_picture_images(mut self, enabled: bool) -> Self {
        self.generate_picture_images = enabled;
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.accelerator.num_threads = num_threads.max(1);
        self
    }

    /// Set password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&ProcessingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let options = PipelineOptions::default();
        assert!(options.do_ocr);
        assert_eq!(options.ocr_languages, vec!["en"]);
        assert!(options.do_table_structure);
        assert!(options.table_cell_matching);
        assert_eq!(options.images_scale, Some(2.0));
        assert!(options.do_picture_classification);
        assert!(!options.do_code_enrichment);
        assert_eq!(options.accelerator.num_threads, 4);
    }

    #[test]
    fn test_disabled_features_clear_dependents() {
        let config = ProcessingConfig {
            enable_ocr: false,
            enable_tables: false,
            generate_page_images: false,
            ..ProcessingConfig::default()
        };
        let options = PipelineOptions::from_config(&config);

        assert!(!options.do_ocr);
        assert!(options.ocr_languages.is_empty());
        assert!(!options.do_table_structure);
        assert!(!options.table_cell_matching);
        assert_eq!(options.images_scale, None);
    }

    #[test]
    fn test_builder() {
        let options = PipelineOptions::new()
            .with_ocr(false)
            .with_table_structure(false)
            .with_threads(0)
            .with_password("secret");

        assert!(!options.do_ocr);
        assert!(!options.table_cell_matching);
        assert_eq!(options.accelerator.num_threads, 1);
        assert_eq!(options.password.as_deref(), Some("secret"));
    }
}
