// Imaging service - One task per uploaded file, gathered behind a join barrier
use crate::application::imaging_ports::{ImageInspector, Renderer, SwatchCatalog};
use crate::domain::error::{AnnotateError, AnnotateResult};
use crate::domain::params::{AnnotationParams, LegendParams, ResizeParams};
use crate::domain::render_instructions::{
    RenderInstructions, build_axis_overlay_instructions, build_legend_instructions,
    build_resize_instructions,
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;

#[derive(Debug, Clone)]
pub enum ImagingJob {
    Annotate(AnnotationParams),
    Legend(LegendParams),
    Resize(ResizeParams),
}

impl ImagingJob {
    pub fn name(&self) -> &'static str {
        match self {
            ImagingJob::Annotate(_) => "annotate",
            ImagingJob::Legend(_) => "legend",
            ImagingJob::Resize(_) => "resize",
        }
    }

    /// File name of the rendered result for an upload called `file_name`
    pub fn output_name(&self, file_name: &str) -> String {
        match self {
            ImagingJob::Annotate(_) => format!("annotated-{}", file_name),
            ImagingJob::Legend(_) => format!("legend-{}", file_name),
            ImagingJob::Resize(params) => {
                let (stem, ext) = split_extension(file_name);
                format!("{}_{}%{}", stem, params.percentage, ext)
            }
        }
    }
}

/// Split off the last extension, unless the only dot starts the name.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.find('.') {
        Some(first) if first > 0 => match file_name.rfind('.') {
            Some(last) => (&file_name[..last], &file_name[last..]),
            None => (file_name, ""),
        },
        _ => (file_name, ""),
    }
}

/// On-disk name for the `index`th file of a batch: its position plus the
/// extension of `file_name` when that is plain alphanumerics. Client names
/// never reach the renderer, which expands `%` sequences in paths.
pub fn scratch_name(index: usize, file_name: &str) -> String {
    let (_, ext) = split_extension(file_name);
    let plain = ext.len() > 1 && ext.len() <= 16 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric());
    if plain {
        format!("{:04}{}", index, ext)
    } else {
        format!("{:04}", index)
    }
}

/// Aborts the per-file tasks if the batch is dropped before they finish
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// An upload already written into the session directory
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub source: String,
    pub content_type: Option<String>,
    pub output_name: String,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Results in upload order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<ProcessedFile>,
    pub failed: Vec<FileFailure>,
}

#[derive(Clone)]
pub struct ImagingService {
    inspector: Arc<dyn ImageInspector>,
    renderer: Arc<dyn Renderer>,
    swatches: Arc<dyn SwatchCatalog>,
}

impl ImagingService {
    pub fn new(
        inspector: Arc<dyn ImageInspector>,
        renderer: Arc<dyn Renderer>,
        swatches: Arc<dyn SwatchCatalog>,
    ) -> Self {
        Self {
            inspector,
            renderer,
            swatches,
        }
    }

    /// Render every file into `output_dir`, which must not hold the inputs.
    pub async fn process_batch(
        &self,
        output_dir: &Path,
        files: Vec<StagedFile>,
        job: ImagingJob,
    ) -> BatchOutcome {
        let start_time = Instant::now();
        let total = files.len();

        // Spawn one task per file; a failure in one never reaches the others
        let mut names = Vec::with_capacity(total);
        let mut handles = Vec::with_capacity(total);
        for (index, file) in files.into_iter().enumerate() {
            names.push(file.name.clone());

            let service = self.clone();
            let job = job.clone();
            let output_path = output_dir.join(scratch_name(index, &job.output_name(&file.name)));

            handles.push(tokio::spawn(async move {
                service.process_file(file, output_path, &job).await
            }));
        }
        let _abort_guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

        let mut outcome = BatchOutcome::default();
        for (name, joined) in names.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(processed)) => outcome.succeeded.push(processed),
                Ok(Err(e)) => {
                    tracing::warn!("{} failed for {}: {}", job.name(), name, e);
                    outcome.failed.push(FileFailure {
                        file: name,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("{} task for {} did not complete: {}", job.name(), name, e);
                    outcome.failed.push(FileFailure {
                        file: name,
                        message: "processing was interrupted".to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "{} batch done: {} of {} files in {} ms",
            job.name(),
            outcome.succeeded.len(),
            total,
            start_time.elapsed().as_millis()
        );

        outcome
    }

    async fn process_file(
        &self,
        file: StagedFile,
        output_path: PathBuf,
        job: &ImagingJob,
    ) -> AnnotateResult<ProcessedFile> {
        let output_name = job.output_name(&file.name);

        let instructions = self.build_instructions(&file, job, &output_path).await?;
        tracing::debug!("render instructions for {}: {:?}", file.name, instructions.args);

        self.renderer.render(&instructions).await?;

        // A clean exit is not proof that anything was written
        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            return Err(AnnotateError::render_execution(format!(
                "no output was written for {}",
                file.name
            )));
        }

        Ok(ProcessedFile {
            source: file.name,
            content_type: file.content_type,
            output_name,
            output_path,
        })
    }

    async fn build_instructions(
        &self,
        file: &StagedFile,
        job: &ImagingJob,
        output_path: &Path,
    ) -> AnnotateResult<RenderInstructions> {
        match job {
            ImagingJob::Annotate(params) => {
                let dimensions = self.inspector.dimensions(&file.path).await?;
                build_axis_overlay_instructions(dimensions, params, &file.path, output_path)
            }
            ImagingJob::Legend(params) => {
                let dimensions = self.inspector.dimensions(&file.path).await?;
                build_legend_instructions(
                    dimensions,
                    params,
                    self.swatches.as_ref(),
                    &file.path,
                    output_path,
                )
            }
            ImagingJob::Resize(params) => {
                Ok(build_resize_instructions(params, &file.path, output_path))
            }
        }
    }
}
