use serde::{Deserialize, Serialize};
use study_registry::BlockMeta;

use super::config_usize;

/// Largest bin count a histogram is built with.
pub const MAX_BINS: usize = 1024;

/// Canvas size and bin count of a histogram figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of equal-width bins.
    pub bins: usize,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 160,
            bins: 16,
        }
    }
}

impl FigureConfig {
    /// Reads `width`, `height` and `bins` from a block configuration.
    ///
    /// Sizes outside `u32` fall back to the defaults; `bins` is clamped to
    /// `1..=MAX_BINS`.
    pub fn from_block(block: &BlockMeta) -> Self {
        let defaults = Self::default();
        Self {
            width: config_u32(block, "width").unwrap_or(defaults.width),
            height: config_u32(block, "height").unwrap_or(defaults.height),
            bins: config_usize(block, "bins")
                .unwrap_or(defaults.bins)
                .clamp(1, MAX_BINS),
        }
    }
}

fn config_u32(block: &BlockMeta, key: &str) -> Option<u32> {
    block
        .config()
        .get(key)
        .and_then(|value| value.as_u64())
        .and_then(|value| u32::try_from(value).ok())
}

/// Equal-width binning of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Sample count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins finite `values` into `bins` buckets (at most [`MAX_BINS`]); the
    /// maximum lands in the last.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let bins = bins.clamp(1, MAX_BINS);
        if finite.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                counts: vec![0; bins],
            };
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = (max - min).max(1e-9);
        let mut counts = vec![0usize; bins];
        for value in &finite {
            let idx = ((value - min) / span * bins as f64).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }
        Self { min, max, counts }
    }

    /// Total number of binned samples.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Renders the histogram as a standalone SVG document.
    pub fn render_svg(&self, config: &FigureConfig, title: &str) -> String {
        let width = config.width as f64;
        let height = config.height as f64;
        let mut parts = vec![format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}'>",
            config.width, config.height
        )];
        parts.push(format!("<title>{}</title>", escape(title)));
        let peak = self.counts.iter().copied().max().unwrap_or(0);
        if peak > 0 {
            let bar_width = width / self.counts.len() as f64;
            for (idx, count) in self.counts.iter().enumerate() {
                let bar_height = *count as f64 / peak as f64 * height;
                parts.push(format!(
                    "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='#3b82f6' />",
                    bar_width * idx as f64,
                    height - bar_height,
                    bar_width.max(1.0),
                    bar_height
                ));
            }
        }
        parts.push("</svg>".into());
        parts.join("")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
