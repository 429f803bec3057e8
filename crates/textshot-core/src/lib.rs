//! Textshot Core: the stages between piped text and a PNG file
//!
//! Text enters on stdin, leaves as an image. This crate holds the types
//! and contracts that every stage agrees on.
//!
//! ## The Pipeline
//!
//! 1. **Input** - stdin is read and sanitized to printable ASCII
//! 2. **Font** - a monospace font is provisioned from a local cache
//! 3. **Layout** - lines are measured and the canvas is sized
//! 4. **Rendering** - glyphs become pixels on an opaque canvas
//! 5. **Export** - the canvas is encoded as PNG and written to disk
//! 6. **Upload** - optionally, the file is pushed to an object store
//!
//! Stages 3 to 5 are chained by [`Pipeline`]:
//!
//! ```rust,no_run
//! use textshot_core::{LayoutParams, Pipeline, RenderParams};
//! use std::sync::Arc;
//!
//! # use textshot_core::traits::*;
//! # use textshot_core::types::*;
//! # struct MyLayout;
//! # impl LayoutEngine for MyLayout {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn layout(&self, _: &str, _: &dyn FontRef, _: &LayoutParams)
//! #         -> textshot_core::Result<TextLayout> { unimplemented!() }
//! # }
//! # struct MyRenderer;
//! # impl Renderer for MyRenderer {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn render(&self, _: &TextLayout, _: &dyn FontRef, _: &RenderParams)
//! #         -> textshot_core::Result<BitmapData> { unimplemented!() }
//! # }
//! # struct MyExporter;
//! # impl Exporter for MyExporter {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn export(&self, _: &BitmapData) -> textshot_core::Result<Vec<u8>> { unimplemented!() }
//! #     fn extension(&self) -> &'static str { "png" }
//! #     fn mime_type(&self) -> &'static str { "image/png" }
//! # }
//! # fn load_font() -> Arc<dyn FontRef> { unimplemented!() }
//!
//! let pipeline = Pipeline::builder()
//!     .layout(Arc::new(MyLayout))
//!     .renderer(Arc::new(MyRenderer))
//!     .exporter(Arc::new(MyExporter))
//!     .build()?;
//!
//! let font = load_font();
//! let rendered = pipeline.process(
//!     "Hello\nWorld",
//!     font.as_ref(),
//!     &LayoutParams::default(),
//!     &RenderParams::default(),
//! )?;
//! # Ok::<(), textshot_core::TextshotError>(())
//! ```

use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod pipeline;
pub mod traits;

pub use error::{Result, TextshotError};
pub use pipeline::{Pipeline, PipelineBuilder, Rendered};
pub use traits::{Exporter, FontRef, LayoutEngine, Renderer};

use error::ColorError;

/// The data structures passed between stages
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Vertical font metrics in font units
    ///
    /// `descent` follows the font tables' sign convention and is
    /// negative for fonts whose descenders sit below the baseline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontMetrics {
        pub units_per_em: u16,
        pub ascent: i16,
        pub descent: i16,
        pub line_gap: i16,
    }

    /// One line of input with its measured pixel width
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LaidOutLine {
        pub text: String,
        pub width: u32,
    }

    /// Everything the rasterizer needs to know about where text goes
    ///
    /// `width` and `height` are the final canvas size, padding included.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TextLayout {
        pub lines: Vec<LaidOutLine>,
        pub pixel_size: f32,
        pub padding: u32,
        pub max_line_width: u32,
        pub line_height: u32,
        pub ascent: u32,
        pub width: u32,
        pub height: u32,
    }

    impl TextLayout {
        /// Baseline of line `index`, measured from the top of the canvas
        pub fn baseline(&self, index: usize) -> u32 {
            self.padding + self.ascent + self.line_height * index as u32
        }
    }

    /// Straight-alpha RGBA8 pixels, row-major
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        /// RGBA value at `(x, y)`, or `None` outside the bitmap
        pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let idx = (y as usize * self.width as usize + x as usize) * 4;
            let px = self.data.get(idx..idx + 4)?;
            Some([px[0], px[1], px[2], px[3]])
        }
    }
}

/// How big text is and how much room surrounds it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Font size in points
    pub point_size: f32,
    /// Resolution used to turn points into pixels
    pub dpi: f32,
    /// Blank border on every side, in pixels
    pub padding: u32,
}

impl LayoutParams {
    /// Font size in pixels at the configured resolution
    pub fn pixel_size(&self) -> f32 {
        self.point_size * self.dpi / 72.0
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            point_size: 24.0,
            dpi: 72.0,
            padding: 10,
        }
    }
}

/// Colors used to paint the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    pub foreground: Color,
    pub background: Color,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            foreground: Color::white(),
            background: Color::rgb(0x18, 0x14, 0x14),
        }
    }
}

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parses `RRGGBB`, with or without one leading `#`
    pub fn from_hex(s: &str) -> std::result::Result<Self, ColorError> {
        let hex_digits = s.strip_prefix('#').unwrap_or(s);
        if hex_digits.len() != 6 {
            return Err(ColorError::InvalidLength(hex_digits.len()));
        }

        let mut rgb = [0u8; 3];
        hex::decode_to_slice(hex_digits, &mut rgb)
            .map_err(|_| ColorError::InvalidHex(hex_digits.to_string()))?;

        Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_colors() {
        let params = RenderParams::default();
        assert_eq!(params.foreground, "FFFFFF".parse().unwrap());
        assert_eq!(params.background, "181414".parse().unwrap());
    }

    #[test]
    fn test_parse_color_is_opaque() {
        let color = Color::from_hex("#1a2B3c").unwrap();
        assert_eq!(color, Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.a, 255);
    }

    #[test]
    fn test_parse_color_rejects_bad_length() {
        assert_eq!(Color::from_hex("FFF"), Err(ColorError::InvalidLength(3)));
        assert_eq!(Color::from_hex("#FFFFFFFF"), Err(ColorError::InvalidLength(8)));
        assert_eq!(Color::from_hex(""), Err(ColorError::InvalidLength(0)));
        // Only one '#' is stripped
        assert_eq!(Color::from_hex("##FFFFFF"), Err(ColorError::InvalidLength(7)));
    }

    #[test]
    fn test_parse_color_rejects_non_hex() {
        assert!(matches!(Color::from_hex("GGGGGG"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Color::from_hex("+1FFFF"), Err(ColorError::InvalidHex(_))));
        // Six bytes, but not six hex digits
        assert!(matches!(Color::from_hex("ééé"), Err(ColorError::InvalidHex(_))));
    }

    #[test]
    fn test_display_round_trips() {
        let color = Color::rgb(0x18, 0x14, 0x14);
        assert_eq!(color.to_string(), "#181414");
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_pixel_size_at_default_dpi() {
        let params = LayoutParams::default();
        assert_eq!(params.pixel_size(), 24.0);

        let retina = LayoutParams {
            dpi: 144.0,
            ..LayoutParams::default()
        };
        assert_eq!(retina.pixel_size(), 48.0);
    }

    #[test]
    fn test_baseline_advances_by_line_height() {
        let layout = types::TextLayout {
            lines: Vec::new(),
            pixel_size: 24.0,
            padding: 10,
            max_line_width: 0,
            line_height: 28,
            ascent: 22,
            width: 20,
            height: 48,
        };
        assert_eq!(layout.baseline(0), 32);
        assert_eq!(layout.baseline(2), 88);
    }

    #[test]
    fn test_pixel_index_does_not_wrap_on_tall_bitmaps() {
        // 65536 * 16384 * 4 bytes is past u32::MAX
        let bitmap = types::BitmapData {
            width: 1 << 16,
            height: 1 << 15,
            data: Vec::new(),
        };
        assert_eq!(bitmap.pixel(0, 1 << 14), None);
        assert_eq!(bitmap.pixel(0, 1 << 15), None);
    }

    // Property: a leading '#' never changes the parsed color
    proptest! {
        #[test]
        fn prop_hash_prefix_is_ignored(s in "[0-9a-fA-F]{6}") {
            prop_assert_eq!(Color::from_hex(&s), Color::from_hex(&format!("#{s}")));
        }
    }

    // Property: anything that is not exactly six characters fails
    proptest! {
        #[test]
        fn prop_wrong_length_fails(s in "[0-9a-fA-F]{0,12}") {
            prop_assume!(s.len() != 6);
            prop_assert_eq!(Color::from_hex(&s), Err(ColorError::InvalidLength(s.len())));
        }
    }
}
