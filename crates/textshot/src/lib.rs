//! textshot - piped text in, PNG out
//!
//! Each stage lives in its own crate; this one wires them together:
//! 1. Input reading and sanitizing ([`input`])
//! 2. Font provisioning ([`fontdb`])
//! 3. Line layout ([`layout`])
//! 4. Rasterization ([`render_zeno`])
//! 5. PNG export and output naming ([`export`])
//! 6. Optional object storage upload (`upload`, behind the `upload` feature)
//!
//! # Example
//!
//! ```no_run
//! use textshot::prelude::*;
//!
//! let font = FontProvisioner::new(FontSource::default()).provision()?;
//! let shot = textshot::render_to_file(
//!     "Hello\nWorld",
//!     &font,
//!     &LayoutParams::default(),
//!     &RenderParams::default(),
//!     &OutputTarget::default(),
//!     &mut OsRngNames::default(),
//! )?;
//! println!("{}", shot.path.display());
//! # Ok::<(), TextshotError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `upload` (default): S3 upload support via `textshot-upload`

use std::path::PathBuf;
use std::sync::Arc;

pub use textshot_core::{error, traits, types, Color, LayoutParams, Pipeline, RenderParams};

pub use textshot_export as export;
pub use textshot_fontdb as fontdb;
pub use textshot_input as input;
pub use textshot_layout as layout;
pub use textshot_render_zeno as render_zeno;

#[cfg(feature = "upload")]
pub use textshot_upload as upload;

use textshot_core::error::Result;
use textshot_core::traits::FontRef;
use textshot_export::{write_png, NameSource, OutputTarget, PngExporter};
use textshot_fontdb::{FontFetcher, FontProvisioner};
use textshot_layout::MonoLayout;
use textshot_render_zeno::ZenoRenderer;

/// Common imports for typical usage
pub mod prelude {
    pub use textshot_core::{
        error::{Result, TextshotError},
        traits::{Exporter, FontRef, LayoutEngine, Renderer},
        Color, LayoutParams, Pipeline, RenderParams,
    };
    pub use textshot_export::{NameSource, OsRngNames, OutputTarget};
    pub use textshot_fontdb::{Font, FontProvisioner, FontSource};

    #[cfg(feature = "upload")]
    pub use textshot_upload::{ObjectStore, S3Store, UploadConfig};
}

/// Mono layout, zeno rasterizer, PNG encoder
pub fn default_pipeline() -> Result<Pipeline> {
    Pipeline::builder()
        .layout(Arc::new(MonoLayout::new()))
        .renderer(Arc::new(ZenoRenderer::new()))
        .exporter(Arc::new(PngExporter::new()))
        .build()
}

/// A file written by [`render_to_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub line_count: usize,
}

/// Lays out, rasterizes and encodes `text`, then writes the PNG
///
/// `text` is drawn as given; run it through [`input::sanitize`] first when
/// it comes from outside.
pub fn render_to_file(
    text: &str,
    font: &dyn FontRef,
    layout_params: &LayoutParams,
    render_params: &RenderParams,
    target: &OutputTarget,
    names: &mut dyn NameSource,
) -> Result<Shot> {
    let pipeline = default_pipeline()?;
    let rendered = pipeline.process(text, font, layout_params, render_params)?;

    let path = target.resolve(names, pipeline.extension());
    write_png(&path, &rendered.encoded)?;

    Ok(Shot {
        path,
        width: rendered.layout.width,
        height: rendered.layout.height,
        line_count: rendered.layout.lines.len(),
    })
}

/// Everything one run needs besides the font and the upload destination
#[derive(Debug, Clone, Default)]
pub struct Job {
    /// Raw input, sanitized before layout
    pub text: String,
    pub layout: LayoutParams,
    pub colors: RenderParams,
    pub output: OutputTarget,
}

/// What a run left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub shot: Shot,
    /// Object key, when the file was uploaded
    pub uploaded_as: Option<String>,
}

/// Sanitize, provision the font, render, write, and optionally upload
///
/// Upload configuration is resolved by the caller before this runs, so a
/// missing variable fails without rendering anything.
pub fn run<F: FontFetcher>(
    job: &Job,
    fonts: &FontProvisioner<F>,
    names: &mut dyn NameSource,
    #[cfg(feature = "upload")] store: Option<&dyn textshot_upload::ObjectStore>,
) -> Result<Outcome> {
    let text = input::sanitize(&job.text);
    let font = fonts.provision()?;

    let shot = render_to_file(&text, &font, &job.layout, &job.colors, &job.output, names)?;
    log::debug!(
        "Wrote {} lines as {}x{} to {}",
        shot.line_count,
        shot.width,
        shot.height,
        shot.path.display()
    );

    #[cfg(feature = "upload")]
    let uploaded_as = match store {
        Some(store) => {
            use textshot_core::traits::Exporter as _;
            let content_type = PngExporter::new().mime_type();
            Some(textshot_upload::upload_file(store, &shot.path, content_type)?)
        },
        None => None,
    };
    #[cfg(not(feature = "upload"))]
    let uploaded_as = None;

    Ok(Outcome { shot, uploaded_as })
}
