//! Configuration types for deck generation.
//!
//! All behaviour is controlled through [`DeckConfig`], built via its
//! [`DeckConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across call sites, serialise them for logging, and diff
//! two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A constructor with a dozen positional fields is unreadable and breaks on
//! every new field. The builder lets callers set only what they care about
//! and rely on well-documented defaults for the rest.

use crate::error::VocabCardsError;
use crate::layout::grid::Grid;
use crate::output::DeckMetadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A4 page width in millimetres.
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 page height in millimetres.
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Configuration for one deck-generation run.
///
/// Built via [`DeckConfig::builder()`] or [`DeckConfig::default()`].
///
/// # Example
/// ```rust
/// use vocab2cards::DeckConfig;
///
/// let config = DeckConfig::builder()
///     .rows(4)
///     .columns(3)
///     .build()
///     .unwrap();
/// assert_eq!(config.grid().capacity(), 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Card rows per page. Default: 4.
    pub rows: usize,

    /// Card columns per page. Default: 3.
    ///
    /// 3×4 puts twelve cards on an A4 sheet at roughly business-card size,
    /// which survives being cut out with scissors. Larger grids work but the
    /// shrink-to-fit floor kicks in sooner on long example sentences.
    pub columns: usize,

    /// Page width in millimetres. Default: A4 (210.0).
    pub page_width_mm: f32,

    /// Page height in millimetres. Default: A4 (297.0).
    pub page_height_mm: f32,

    /// Strip reserved at the bottom of each page, in millimetres.
    /// Default: 14.1 (≈ 40 pt).
    ///
    /// The grid is laid out edge-to-edge with zero margins; this strip is
    /// the only part of the page the cards never touch, leaving room for a
    /// printer's non-printable zone.
    pub bottom_strip_mm: f32,

    /// Path to a TrueType font used for all card text.
    ///
    /// Required in practice for CJK translations — the built-in Helvetica
    /// fallback covers Latin text only. `None` means built-in fonts.
    pub font_path: Option<PathBuf>,

    /// Smallest font size (points) the shrink-to-fit pass may choose before
    /// clipping. Default: 5.0.
    pub min_font_size: f32,

    /// Document-level metadata stamped into the output.
    pub metadata: DeckMetadata,

    /// Delay between two parse-status polls. Default: 5 s.
    pub poll_interval: Duration,

    /// Maximum number of parse-status polls before the document is
    /// abandoned. Default: 99 (≈ 8 minutes at the default interval).
    pub poll_attempts: u32,

    /// Per-request timeout for API calls in seconds. Default: 60.
    ///
    /// The inference call can legitimately take tens of seconds on a dense
    /// scan; the lease/status calls never should.
    pub api_timeout_secs: u64,

    /// Timeout for the raw-byte upload in seconds. Default: 600.
    pub upload_timeout_secs: u64,

    /// Override for the extraction instruction sent to the model.
    /// `None` uses the built-in default from [`crate::prompts`].
    pub instruction: Option<String>,

    /// Base URL of the document-ingestion service.
    pub data_endpoint: String,

    /// Base URL of the inference (application completion) service.
    pub completion_endpoint: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 3,
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            bottom_strip_mm: 14.1,
            font_path: None,
            min_font_size: 5.0,
            metadata: DeckMetadata::default(),
            poll_interval: Duration::from_secs(5),
            poll_attempts: 99,
            api_timeout_secs: 60,
            upload_timeout_secs: 600,
            instruction: None,
            data_endpoint: "https://bailian.cn-beijing.aliyuncs.com".to_string(),
            completion_endpoint: "https://dashscope.aliyuncs.com".to_string(),
        }
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }

    /// Derive the per-page grid geometry from the page dimensions.
    ///
    /// Margins are zero, so the cells split the full printable width; the
    /// bottom strip is subtracted from the usable height before the split.
    pub fn grid(&self) -> Grid {
        let usable_height = self.page_height_mm - self.bottom_strip_mm;
        Grid {
            rows: self.rows,
            columns: self.columns,
            cell_width_mm: self.page_width_mm / self.columns as f32,
            cell_height_mm: usable_height / self.rows as f32,
        }
    }
}

/// Builder for [`DeckConfig`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn rows(mut self, rows: usize) -> Self {
        self.config.rows = rows;
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.config.columns = columns;
        self
    }

    pub fn page_size_mm(mut self, width: f32, height: f32) -> Self {
        self.config.page_width_mm = width;
        self.config.page_height_mm = height;
        self
    }

    pub fn bottom_strip_mm(mut self, mm: f32) -> Self {
        self.config.bottom_strip_mm = mm.max(0.0);
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn min_font_size(mut self, size: f32) -> Self {
        self.config.min_font_size = size.max(1.0);
        self
    }

    pub fn metadata(mut self, metadata: DeckMetadata) -> Self {
        self.config.metadata = metadata;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn poll_attempts(mut self, attempts: u32) -> Self {
        self.config.poll_attempts = attempts;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn upload_timeout_secs(mut self, secs: u64) -> Self {
        self.config.upload_timeout_secs = secs;
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = Some(instruction.into());
        self
    }

    pub fn data_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.data_endpoint = url.into();
        self
    }

    pub fn completion_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.completion_endpoint = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A zero-row or zero-column grid is a configuration error, not a
    /// runtime condition — it fails here, before any work starts.
    pub fn build(self) -> Result<DeckConfig, VocabCardsError> {
        let c = &self.config;
        if c.rows == 0 || c.columns == 0 {
            return Err(VocabCardsError::InvalidConfig(format!(
                "Grid must be at least 1×1, got {}×{}",
                c.rows, c.columns
            )));
        }
        if c.page_width_mm <= 0.0 || c.page_height_mm <= 0.0 {
            return Err(VocabCardsError::InvalidConfig(format!(
                "Page dimensions must be positive, got {}×{} mm",
                c.page_width_mm, c.page_height_mm
            )));
        }
        if c.bottom_strip_mm >= c.page_height_mm {
            return Err(VocabCardsError::InvalidConfig(format!(
                "Bottom strip ({} mm) swallows the whole page height ({} mm)",
                c.bottom_strip_mm, c.page_height_mm
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_3x4_on_a4() {
        let config = DeckConfig::default();
        let grid = config.grid();
        assert_eq!(grid.capacity(), 12);
        assert!((grid.cell_width_mm - 70.0).abs() < 0.01);
        assert!((grid.cell_height_mm - (297.0 - 14.1) / 4.0).abs() < 0.01);
    }

    #[test]
    fn zero_rows_fails_fast() {
        let err = DeckConfig::builder().rows(0).build().unwrap_err();
        assert!(matches!(err, VocabCardsError::InvalidConfig(_)));
    }

    #[test]
    fn zero_columns_fails_fast() {
        assert!(DeckConfig::builder().columns(0).build().is_err());
    }

    #[test]
    fn oversized_bottom_strip_fails() {
        assert!(DeckConfig::builder()
            .page_size_mm(100.0, 100.0)
            .bottom_strip_mm(100.0)
            .build()
            .is_err());
    }
}
