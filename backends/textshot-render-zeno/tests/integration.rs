//! Renders real text with a real font and inspects the pixels

use std::path::PathBuf;

use textshot_core::{
    error::RenderError,
    traits::{LayoutEngine, Renderer},
    types::{BitmapData, TextLayout},
    Color, LayoutParams, RenderParams, TextshotError,
};
use textshot_fontdb::Font;
use textshot_layout::MonoLayout;
use textshot_render_zeno::{ZenoRenderer, MAX_DIMENSION};

fn load_font() -> Font {
    let path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fonts/DejaVuSansMono.ttf");
    Font::from_file(path).expect("fixture font loads")
}

fn render(text: &str, params: &RenderParams) -> (TextLayout, BitmapData) {
    let font = load_font();
    let layout = MonoLayout::new()
        .layout(text, &font, &LayoutParams::default())
        .unwrap();
    let bitmap = ZenoRenderer::new().render(&layout, &font, params).unwrap();
    (layout, bitmap)
}

/// Pixels that differ from the background, as (x, y)
fn ink(bitmap: &BitmapData, background: Color) -> Vec<(u32, u32)> {
    let bg = background.to_rgba();
    let mut found = Vec::new();
    for y in 0..bitmap.height {
        for x in 0..bitmap.width {
            if bitmap.pixel(x, y) != Some(bg) {
                found.push((x, y));
            }
        }
    }
    found
}

#[test]
fn test_bitmap_matches_layout_dimensions() {
    let (layout, bitmap) = render("Hello\nWorld", &RenderParams::default());

    assert_eq!(bitmap.width, layout.width);
    assert_eq!(bitmap.height, layout.height);
    assert_eq!(bitmap.data.len(), (layout.width * layout.height * 4) as usize);
    assert_eq!(layout.height, 2 * layout.line_height + 20);
}

#[test]
fn test_every_pixel_is_opaque() {
    let (_, bitmap) = render("opaque ~ text", &RenderParams::default());
    assert!(bitmap.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn test_padding_stays_background() {
    let params = RenderParams::default();
    let (layout, bitmap) = render("MMMM\nWWWW", &params);
    let bg = params.background.to_rgba();

    for x in 0..layout.width {
        for y in 0..layout.padding / 2 {
            assert_eq!(bitmap.pixel(x, y), Some(bg));
            assert_eq!(bitmap.pixel(x, layout.height - 1 - y), Some(bg));
        }
    }
    for y in 0..layout.height {
        for x in 0..layout.padding / 2 {
            assert_eq!(bitmap.pixel(x, y), Some(bg));
            assert_eq!(bitmap.pixel(layout.width - 1 - x, y), Some(bg));
        }
    }
}

#[test]
fn test_text_is_painted_in_foreground() {
    let params = RenderParams {
        foreground: Color::rgb(0xFF, 0x00, 0x00),
        background: Color::rgb(0x00, 0x00, 0xFF),
    };
    let (_, bitmap) = render("H", &params);

    let pixels: Vec<[u8; 4]> = bitmap
        .data
        .chunks_exact(4)
        .map(|px| [px[0], px[1], px[2], px[3]])
        .collect();
    // Stems are wider than a pixel, so some pixels are (nearly) fully covered
    assert!(pixels.iter().any(|px| px[0] >= 0xF0 && px[2] <= 0x0F));
    // Anti-aliased edges are a mix of the two colors, never anything else
    assert!(pixels.iter().all(|px| px[1] == 0 && u16::from(px[0]) + u16::from(px[2]) >= 254));
}

#[test]
fn test_each_line_draws_in_its_own_band() {
    let params = RenderParams::default();
    let (layout, bitmap) = render("_\n\n_", &params);
    let ink = ink(&bitmap, params.background);
    assert!(!ink.is_empty());

    let band = |y: u32| (y.saturating_sub(layout.padding)) / layout.line_height;
    let bands: Vec<u32> = ink.iter().map(|&(_, y)| band(y)).collect();

    assert!(bands.contains(&0));
    assert!(!bands.contains(&1), "the empty middle line stays blank");
    assert!(bands.contains(&2));
}

#[test]
fn test_ink_starts_at_left_padding() {
    let params = RenderParams::default();
    let (layout, bitmap) = render("|", &params);
    let ink = ink(&bitmap, params.background);

    let min_x = ink.iter().map(|&(x, _)| x).min().unwrap();
    let max_x = ink.iter().map(|&(x, _)| x).max().unwrap();
    assert!(min_x >= layout.padding);
    assert!(max_x < layout.padding + layout.max_line_width + 1);
}

#[test]
fn test_glyphs_sit_on_the_baseline() {
    let params = RenderParams::default();
    let (layout, bitmap) = render("H", &params);
    let ink = ink(&bitmap, params.background);

    // 'H' has no descender: its bottom edge rests on the baseline
    let bottom = ink.iter().map(|&(_, y)| y).max().unwrap();
    let baseline = layout.baseline(0);
    assert!(bottom + 1 >= baseline && bottom <= baseline, "bottom {bottom}, baseline {baseline}");
}

#[test]
fn test_blank_input_renders_plain_canvas() {
    let params = RenderParams::default();
    for text in ["", "   ", "\n\n"] {
        let (layout, bitmap) = render(text, &params);
        assert_eq!(bitmap.width, layout.width);
        assert!(ink(&bitmap, params.background).is_empty(), "{text:?} drew something");
    }
}

#[test]
fn test_zero_sized_layout_is_rejected() {
    let font = load_font();
    let layout = TextLayout {
        lines: Vec::new(),
        pixel_size: 24.0,
        padding: 0,
        max_line_width: 0,
        line_height: 28,
        ascent: 20,
        width: 0,
        height: 28,
    };

    let result = ZenoRenderer::new().render(&layout, &font, &RenderParams::default());
    assert!(matches!(
        result,
        Err(TextshotError::RenderingFailed(RenderError::InvalidDimensions { width: 0, .. }))
    ));
}

#[test]
fn test_renderer_name() {
    assert_eq!(ZenoRenderer::default().name(), "zeno");
}

#[test]
fn test_side_longer_than_png_allows_is_rejected() {
    let font = load_font();
    let layout = TextLayout {
        lines: Vec::new(),
        pixel_size: 24.0,
        padding: 0,
        max_line_width: 0,
        line_height: 28,
        ascent: 20,
        width: MAX_DIMENSION + 1,
        height: 1,
    };

    let result = ZenoRenderer::new().render(&layout, &font, &RenderParams::default());
    assert!(matches!(
        result,
        Err(TextshotError::RenderingFailed(RenderError::InvalidDimensions { height: 1, .. }))
    ));
}

#[test]
fn test_canvas_taller_than_u16_renders() {
    let text = vec!["log line"; 2500].join("\n");
    let (layout, bitmap) = render(&text, &RenderParams::default());

    assert!(layout.height > 65535);
    assert_eq!((bitmap.width, bitmap.height), (layout.width, layout.height));
    assert_eq!(bitmap.data.len(), layout.width as usize * layout.height as usize * 4);
    // The last line still gets ink
    let mut last_band = layout.baseline(2499) - layout.ascent..layout.baseline(2499);
    assert!(last_band.any(|y| (0..bitmap.width).any(|x| bitmap.pixel(x, y) != Some([0x18, 0x14, 0x14, 255]))));
}
