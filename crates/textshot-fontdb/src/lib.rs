//! Where the font comes from: provisioning and loading for textshot
//!
//! The font stage of the pipeline. Makes sure a monospace font sits in the
//! local cache (downloading it once if it does not), then parses it into a
//! [`Font`] the layout and rendering stages share read-only.
//!
//! Fonts store their raw data and create a `read_fonts::FontRef` on demand
//! for table lookups, so a `Font` owns no borrowed state.

mod provision;

pub use provision::{
    FontFetcher, FontProvisioner, FontSource, UreqFetcher, DEFAULT_FONT_FILE, DEFAULT_FONT_URL,
    MAX_FONT_SIZE,
};

use std::fs;
use std::path::Path;

use read_fonts::{types::GlyphId, FontRef as ReadFontRef, TableProvider};

use textshot_core::{
    error::{FontLoadError, Result},
    traits::FontRef as TextshotFontRef,
    types::FontMetrics,
};

/// A font that's been brought into memory, ready to measure and draw text
pub struct Font {
    data: Vec<u8>,
    units_per_em: u16,
}

impl Font {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| FontLoadError::CacheRead {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_data(data)
    }

    /// Turns raw font bytes into something we can work with
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        // Validate the font data by attempting to parse it
        let font_ref = ReadFontRef::new(&data).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .map_err(|_| FontLoadError::InvalidData)?;
        if units_per_em == 0 {
            return Err(FontLoadError::InvalidData.into());
        }

        Ok(Font { data, units_per_em })
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::new(&self.data).ok()
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    /// Horizontal advance of a glyph in font units
    pub fn advance_width(&self, glyph_id: u32) -> f32 {
        self.font_ref()
            .and_then(|font| font.hmtx().ok()?.advance(GlyphId::new(glyph_id)))
            .map(f32::from)
            .unwrap_or(0.0)
    }

    /// Vertical metrics, preferring OS/2 typographic values over hhea
    pub fn metrics(&self) -> Option<FontMetrics> {
        let font = self.font_ref()?;

        let (ascent, descent, line_gap) = font
            .os2()
            .ok()
            .map(|os2| {
                (
                    os2.s_typo_ascender(),
                    os2.s_typo_descender(),
                    os2.s_typo_line_gap(),
                )
            })
            .or_else(|| {
                font.hhea().ok().map(|hhea| {
                    (
                        hhea.ascender().to_i16(),
                        hhea.descender().to_i16(),
                        hhea.line_gap().to_i16(),
                    )
                })
            })?;

        Some(FontMetrics {
            units_per_em: self.units_per_em,
            ascent,
            descent,
            line_gap,
        })
    }

    /// Counts how many glyphs this font contains
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

impl TextshotFontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: u32) -> f32 {
        self.advance_width(glyph_id)
    }

    fn metrics(&self) -> Option<FontMetrics> {
        self.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textshot_core::TextshotError;

    #[test]
    fn test_font_from_garbage_fails() {
        let result = Font::from_data(vec![0; 100]);
        assert!(matches!(
            result,
            Err(TextshotError::FontLoad(FontLoadError::InvalidData))
        ));
    }

    #[test]
    fn test_font_from_html_fails() {
        // What a misconfigured download URL usually returns
        let page = b"<!DOCTYPE html><html><body>Not Found</body></html>".to_vec();
        assert!(Font::from_data(page).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Font::from_file("/nonexistent/textshot/font.ttf")
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/textshot/font.ttf"));
    }
}
