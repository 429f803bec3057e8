//! The engine that drives text through layout, rendering and export

// this_file: crates/textshot-core/src/pipeline.rs

use crate::{
    error::{Result, TextshotError},
    traits::{Exporter, FontRef, LayoutEngine, Renderer},
    types::{BitmapData, TextLayout},
    LayoutParams, RenderParams,
};
use std::sync::Arc;

/// Pipeline for text rendering: Layout → Render → Export
///
/// ```ignore
/// use textshot_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .layout(Arc::new(MonoLayout::new()))
///     .renderer(Arc::new(ZenoRenderer::new()))
///     .exporter(Arc::new(PngExporter::new()))
///     .build()?;
///
/// let rendered = pipeline.process("Hello", &font, &layout_params, &render_params)?;
/// ```
pub struct Pipeline {
    layout: Arc<dyn LayoutEngine>,
    renderer: Arc<dyn Renderer>,
    exporter: Arc<dyn Exporter>,
}

/// What a pipeline run produces
#[derive(Debug, Clone)]
pub struct Rendered {
    pub layout: TextLayout,
    pub bitmap: BitmapData,
    pub encoded: Vec<u8>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Send text through every stage and keep each stage's output
    pub fn process(
        &self,
        text: &str,
        font: &dyn FontRef,
        layout_params: &LayoutParams,
        render_params: &RenderParams,
    ) -> Result<Rendered> {
        log::debug!("Laying out text with {}", self.layout.name());
        let layout = self.layout.layout(text, font, layout_params)?;

        log::debug!(
            "Rendering {} lines onto {}x{} with {}",
            layout.lines.len(),
            layout.width,
            layout.height,
            self.renderer.name()
        );
        let bitmap = self.renderer.render(&layout, font, render_params)?;

        log::debug!("Encoding with {}", self.exporter.name());
        let encoded = self.exporter.export(&bitmap)?;

        Ok(Rendered {
            layout,
            bitmap,
            encoded,
        })
    }

    /// File extension of the configured exporter
    pub fn extension(&self) -> &'static str {
        self.exporter.extension()
    }

    /// MIME type of the configured exporter
    pub fn mime_type(&self) -> &'static str {
        self.exporter.mime_type()
    }
}

/// Build pipelines piece by piece
pub struct PipelineBuilder {
    layout: Option<Arc<dyn LayoutEngine>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl PipelineBuilder {
    /// Start with a clean slate
    pub fn new() -> Self {
        Self {
            layout: None,
            renderer: None,
            exporter: None,
        }
    }

    /// Choose who measures the text
    pub fn layout(mut self, layout: Arc<dyn LayoutEngine>) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Choose who turns lines into pixels
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Choose who encodes the pixels
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Finish up, failing if any stage is missing
    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            layout: self
                .layout
                .ok_or_else(|| TextshotError::ConfigError("No layout engine configured".into()))?,
            renderer: self
                .renderer
                .ok_or_else(|| TextshotError::ConfigError("No renderer configured".into()))?,
            exporter: self
                .exporter
                .ok_or_else(|| TextshotError::ConfigError("No exporter configured".into()))?,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
