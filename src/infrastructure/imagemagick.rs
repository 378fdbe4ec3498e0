// ImageMagick command-line adapters for introspection and rendering
use crate::application::imaging_ports::{ImageInspector, Renderer};
use crate::domain::dpi::ImageDimensions;
use crate::domain::error::{AnnotateError, AnnotateResult};
use crate::domain::render_instructions::RenderInstructions;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct ImageMagick {
    identify: String,
    convert: String,
}

impl ImageMagick {
    pub fn new(identify: String, convert: String) -> Self {
        Self { identify, convert }
    }
}

/// Parse the `%w %h` output of `identify -format`.
pub fn parse_dimensions(output: &str) -> Option<ImageDimensions> {
    let mut parts = output.split_whitespace();
    let width = parts.next()?.parse::<f64>().ok()?;
    let height = parts.next()?.parse::<f64>().ok()?;
    Some(ImageDimensions::new(width, height))
}

#[async_trait]
impl ImageInspector for ImageMagick {
    async fn dimensions(&self, image: &Path) -> AnnotateResult<ImageDimensions> {
        let name = image.display().to_string();

        // [0] keeps multi-frame images down to one line of output
        let output = Command::new(&self.identify)
            .arg("-format")
            .arg("%w %h")
            .arg(format!("{}[0]", name))
            .output()
            .await
            .map_err(|e| AnnotateError::image_introspection(&name, format!("failed to start {}: {}", self.identify, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnnotateError::image_introspection(
                &name,
                format!("{} exited with {}: {}", self.identify, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_dimensions(&stdout).ok_or_else(|| {
            AnnotateError::image_introspection(&name, format!("unexpected identify output {:?}", stdout.trim()))
        })
    }
}

#[async_trait]
impl Renderer for ImageMagick {
    async fn render(&self, instructions: &RenderInstructions) -> AnnotateResult<()> {
        let output = Command::new(&self.convert)
            .args(&instructions.args)
            .output()
            .await
            .map_err(|e| AnnotateError::render_execution(format!("failed to start {}: {}", self.convert, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            tracing::debug!("{} stdout: {}", self.convert, stdout.trim());
        }

        if !output.status.success() {
            return Err(AnnotateError::render_execution(format!(
                "{} exited with {}: {}",
                self.convert,
                output.status,
                stderr.trim()
            )));
        }

        if !stderr.trim().is_empty() {
            tracing::warn!("{} stderr: {}", self.convert, stderr.trim());
        }

        Ok(())
    }
}
