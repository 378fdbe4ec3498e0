// Collaborator traits for image introspection and rendering
use crate::domain::dpi::ImageDimensions;
use crate::domain::error::AnnotateResult;
use crate::domain::render_instructions::RenderInstructions;
use async_trait::async_trait;
use std::path::Path;

pub use crate::domain::legend::SwatchCatalog;

#[async_trait]
pub trait ImageInspector: Send + Sync {
    /// Pixel width and height of the first frame of `image`
    async fn dimensions(&self, image: &Path) -> AnnotateResult<ImageDimensions>;
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Run one instruction list, producing `instructions.output`
    async fn render(&self, instructions: &RenderInstructions) -> AnnotateResult<()>;
}
