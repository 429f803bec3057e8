//! Mono Layout - lines measured by glyph advances
//!
//! Splits text on `\n`, sums each line's scaled advances, and sizes the
//! canvas to the widest line plus padding. Every line gets the same height,
//! taken from the font's vertical metrics, whatever it contains.

use textshot_core::{
    error::{LayoutError, Result},
    traits::{FontRef, LayoutEngine},
    types::{LaidOutLine, TextLayout},
    LayoutParams,
};

/// Left-to-right, one-glyph-per-character layout
pub struct MonoLayout;

impl MonoLayout {
    pub fn new() -> Self {
        Self
    }

    /// Pixel width of one line, rounded up
    pub fn measure_line(line: &str, font: &dyn FontRef, scale: f32) -> u32 {
        let advance: f32 = line
            .chars()
            .map(|ch| {
                // Use .notdef (0) if not found
                let glyph_id = font.glyph_id(ch).unwrap_or(0);
                font.advance_width(glyph_id)
            })
            .sum();

        (advance * scale).ceil().max(0.0) as u32
    }
}

impl Default for MonoLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine for MonoLayout {
    fn name(&self) -> &'static str {
        "mono"
    }

    fn layout(&self, text: &str, font: &dyn FontRef, params: &LayoutParams) -> Result<TextLayout> {
        let pixel_size = params.pixel_size();
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(LayoutError::InvalidParams(format!(
                "font size {}pt at {} dpi",
                params.point_size, params.dpi
            ))
            .into());
        }

        let metrics = font.metrics().ok_or(LayoutError::MissingMetrics)?;
        if metrics.units_per_em == 0 {
            return Err(LayoutError::MissingMetrics.into());
        }
        let scale = pixel_size / metrics.units_per_em as f32;

        let lines: Vec<LaidOutLine> = text
            .split('\n')
            .map(|line| LaidOutLine {
                text: line.to_string(),
                width: Self::measure_line(line, font, scale),
            })
            .collect();
        let max_line_width = lines.iter().map(|line| line.width).max().unwrap_or(0);

        // Ascent + descent + gap; descent is negative in the font tables
        let extent = metrics.ascent as f32 - metrics.descent as f32 + metrics.line_gap as f32;
        let line_height = (extent * scale).ceil().max(1.0) as u32;
        let ascent = (metrics.ascent as f32 * scale).ceil().max(0.0) as u32;

        // Saturates so oversized text fails in the renderer, not here
        let line_count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        let width = max_line_width.saturating_add(params.padding.saturating_mul(2));
        let height = line_height
            .saturating_mul(line_count)
            .saturating_add(params.padding.saturating_mul(2));

        log::debug!(
            "MonoLayout: {} lines, widest {}px, line height {}px, canvas {}x{}",
            lines.len(),
            max_line_width,
            line_height,
            width,
            height
        );

        Ok(TextLayout {
            lines,
            pixel_size,
            padding: params.padding,
            max_line_width,
            line_height,
            ascent,
            width,
            height,
        })
    }
}
