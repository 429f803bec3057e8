//! Zeno Renderer - pure Rust rasterization for piped text
//!
//! Glyph outlines come from `skrifa`, `kurbo` gives their exact bounds, and
//! `zeno` turns them into 256-level coverage masks. Masks are blended onto
//! an opaque canvas in the foreground color, one line at a time, starting
//! at the left padding.
//!
//! The draw cursor uses the same line height the layout used to size the
//! canvas: line `n` sits on baseline `padding + ascent + n * line_height`.

use std::collections::HashMap;

use kurbo::Shape;
use skrifa::{outline::OutlineGlyphCollection, MetadataProvider};
use textshot_core::{
    error::{RenderError, Result},
    traits::{FontRef, Renderer},
    types::{BitmapData, TextLayout},
    Color, RenderParams,
};

/// Largest canvas side PNG can describe (2^31 - 1)
///
/// The canvas itself is only limited by what can be allocated.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Pure Rust renderer for monospace text
#[derive(Debug, Default, Clone, Copy)]
pub struct ZenoRenderer;

impl ZenoRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Turns a single glyph outline into a coverage mask
    ///
    /// We build a zeno path (to rasterize) and a kurbo path (for bounds)
    /// from the same outline, rasterize at the origin, then flip the rows
    /// because font coordinates are y-up and bitmaps are y-down.
    fn render_glyph(
        &self,
        outlines: &OutlineGlyphCollection<'_>,
        glyph_id: u32,
        pixel_size: f32,
    ) -> Result<GlyphBitmap> {
        use zeno::Mask;

        let glyph = outlines
            .get(skrifa::GlyphId::new(glyph_id))
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let mut builder = ZenoPathBuilder::new();
        let size = skrifa::instance::Size::new(pixel_size);
        let settings = skrifa::outline::DrawSettings::unhinted(
            size,
            skrifa::instance::LocationRef::default(),
        );
        glyph
            .draw(settings, &mut builder)
            .map_err(|_| RenderError::OutlineExtractionFailed(glyph_id))?;

        let (commands, kurbo_path) = builder.finish();
        if commands.is_empty() {
            // Spaces and other blank glyphs
            return Ok(GlyphBitmap::empty());
        }

        let bbox = kurbo_path.bounding_box();
        let min_x = bbox.x0.floor() as f32;
        let min_y = bbox.y0.floor() as f32;
        let max_x = bbox.x1.ceil() as f32;
        let max_y = bbox.y1.ceil() as f32;
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return Ok(GlyphBitmap::empty());
        }

        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        if width == 0 || height == 0 {
            return Ok(GlyphBitmap::empty());
        }

        let mut mask = vec![0u8; (width * height) as usize];
        Mask::new(&commands)
            .size(width, height)
            .offset((-min_x, -min_y))
            .render_into(&mut mask, None);

        // Font coordinates are y-up, bitmaps are y-down
        for y in 0..(height / 2) {
            let top_row = y as usize * width as usize;
            let bottom_row = (height - 1 - y) as usize * width as usize;
            for x in 0..width as usize {
                mask.swap(top_row + x, bottom_row + x);
            }
        }

        Ok(GlyphBitmap {
            width,
            height,
            mask,
            bearing_x: min_x as i32,
            bearing_y: max_y as i32, // Distance from baseline to top edge
        })
    }
}

impl Renderer for ZenoRenderer {
    fn name(&self) -> &'static str {
        "zeno"
    }

    fn render(
        &self,
        layout: &TextLayout,
        font: &dyn FontRef,
        params: &RenderParams,
    ) -> Result<BitmapData> {
        let (width, height) = (layout.width, layout.height);
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        let mut canvas = Canvas::new(width, height, params.background)?;

        let needs_glyphs = layout.lines.iter().any(|line| !line.text.is_empty());
        if !needs_glyphs {
            return Ok(canvas.into_bitmap());
        }

        let font_ref = skrifa::FontRef::new(font.data()).map_err(|_| RenderError::InvalidFont)?;
        let outlines = font_ref.outline_glyphs();
        let scale = layout.pixel_size / font.units_per_em() as f32;

        // Rendered once per glyph id, reused for every repeat
        let mut glyph_cache: HashMap<u32, GlyphBitmap> = HashMap::new();
        let mut drawn = 0usize;

        for (index, line) in layout.lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }

            let baseline = layout.baseline(index) as i32;
            let mut pen_x = layout.padding as f32;

            for ch in line.text.chars() {
                let glyph_id = font.glyph_id(ch).unwrap_or(0);

                if !glyph_cache.contains_key(&glyph_id) {
                    let bitmap = self.render_glyph(&outlines, glyph_id, layout.pixel_size)?;
                    glyph_cache.insert(glyph_id, bitmap);
                }
                if let Some(bitmap) = glyph_cache.get(&glyph_id) {
                    if bitmap.width > 0 {
                        let x = pen_x.round() as i32 + bitmap.bearing_x;
                        let y = baseline - bitmap.bearing_y;
                        canvas.blend_mask(bitmap, x, y, params.foreground);
                        drawn += 1;
                    }
                }

                pen_x += font.advance_width(glyph_id) * scale;
            }
        }

        log::debug!(
            "Zeno: drew {} glyphs ({} distinct) onto {}x{}",
            drawn,
            glyph_cache.len(),
            width,
            height
        );

        Ok(canvas.into_bitmap())
    }
}

/// Opaque RGBA canvas
struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocates the canvas filled with `background`
    ///
    /// Fails instead of aborting when the buffer can't be reserved.
    fn new(width: u32, height: u32, background: Color) -> std::result::Result<Self, RenderError> {
        let too_large = || RenderError::CanvasTooLarge { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.extend(background.to_rgba().into_iter().cycle().take(len));

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Blend a coverage mask in `color` with its top-left corner at `(x, y)`
    fn blend_mask(&mut self, glyph: &GlyphBitmap, x: i32, y: i32, color: Color) {
        let src = [color.r as u32, color.g as u32, color.b as u32];

        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let px = x + gx as i32;
                let py = y + gy as i32;

                // Check bounds
                if px < 0 || py < 0 || px >= self.width as i32 || py >= self.height as i32 {
                    continue;
                }

                let coverage = glyph.mask[gy as usize * glyph.width as usize + gx as usize] as u32;
                if coverage == 0 {
                    continue;
                }

                let idx = (py as usize * self.width as usize + px as usize) * 4;
                let inv = 255 - coverage;
                for (channel, &s) in src.iter().enumerate() {
                    let dst = self.data[idx + channel] as u32;
                    self.data[idx + channel] = ((s * coverage + dst * inv + 127) / 255) as u8;
                }
                self.data[idx + 3] = 255;
            }
        }
    }

    fn into_bitmap(self) -> BitmapData {
        BitmapData {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

/// A rasterized glyph with its placement relative to the pen
struct GlyphBitmap {
    width: u32,     // Width of the mask in pixels
    height: u32,    // Height of the mask in pixels
    mask: Vec<u8>,  // Coverage, row-major, top row first
    bearing_x: i32, // Horizontal offset from origin to left edge
    bearing_y: i32, // Vertical offset from baseline to top edge
}

impl GlyphBitmap {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            mask: Vec::new(),
            bearing_x: 0,
            bearing_y: 0,
        }
    }
}

/// Dual-output path builder
///
/// Creates zeno commands for the rasterizer and a kurbo path for exact
/// bounding boxes from one pass over the outline.
struct ZenoPathBuilder {
    commands: Vec<zeno::Command>,
    kurbo_path: kurbo::BezPath,
}

impl ZenoPathBuilder {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            kurbo_path: kurbo::BezPath::new(),
        }
    }

    fn finish(self) -> (Vec<zeno::Command>, kurbo::BezPath) {
        (self.commands, self.kurbo_path)
    }
}

impl skrifa::outline::OutlinePen for ZenoPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(zeno::Command::MoveTo([x, y].into()));
        self.kurbo_path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(zeno::Command::LineTo([x, y].into()));
        self.kurbo_path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.commands
            .push(zeno::Command::QuadTo([cx, cy].into(), [x, y].into()));
        self.kurbo_path
            .quad_to((cx as f64, cy as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(zeno::Command::CurveTo(
            [cx0, cy0].into(),
            [cx1, cy1].into(),
            [x, y].into(),
        ));
        self.kurbo_path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.commands.push(zeno::Command::Close);
        self.kurbo_path.close_path();
    }
}
