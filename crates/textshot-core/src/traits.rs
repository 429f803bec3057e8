//! The contracts that bind every stage together
//!
//! - [`FontRef`] - Your window into font data and metrics
//! - [`LayoutEngine`] - Where text becomes measured lines
//! - [`Renderer`] - Where lines become pixels
//! - [`Exporter`] - Where pixels become file bytes

use crate::{
    error::Result,
    types::{BitmapData, FontMetrics, GlyphId, TextLayout},
    LayoutParams, RenderParams,
};

/// Your key to font data and metrics
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         1229.0
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't contain this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How wide this glyph stands in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// Ascent, descent and line gap in font units
    fn metrics(&self) -> Option<FontMetrics> {
        None
    }
}

/// Measures text and sizes the canvas
pub trait LayoutEngine: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Split text into lines, measure them, and compute canvas dimensions
    fn layout(&self, text: &str, font: &dyn FontRef, params: &LayoutParams)
        -> Result<TextLayout>;
}

/// Where laid-out text becomes visible
pub trait Renderer: Send + Sync {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Paint the layout onto a freshly allocated canvas
    fn render(
        &self,
        layout: &TextLayout,
        font: &dyn FontRef,
        params: &RenderParams,
    ) -> Result<BitmapData>;
}

/// Turns pixels into file bytes
pub trait Exporter: Send + Sync {
    /// Your format's name
    fn name(&self) -> &'static str;

    /// Encode the bitmap
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// MIME type used when the file is uploaded
    fn mime_type(&self) -> &'static str;
}
