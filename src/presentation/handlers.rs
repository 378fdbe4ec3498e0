// HTTP request handlers
use crate::application::imaging_service::{BatchOutcome, ImagingJob, StagedFile, scratch_name};
use crate::domain::params::{AnnotationParams, FormFields, LegendParams, ResizeParams};
use crate::infrastructure::archive::{ARCHIVE_NAME, write_archive};
use crate::infrastructure::http_response::{attachment_response, failure_response};
use crate::infrastructure::session::SessionDir;
use crate::presentation::app_state::AppState;
use crate::presentation::upload_form::{UploadedFile, read_upload_form};
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{Response, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Draw the axis overlay onto every uploaded image
pub async fn annotate(State(state): State<Arc<AppState>>, multipart: Multipart) -> impl IntoResponse {
    run_upload_job(&state, multipart, |fields| {
        ImagingJob::Annotate(AnnotationParams::from_fields(fields))
    })
    .await
}

/// Append a labelled colour scale to every uploaded image
pub async fn legend(State(state): State<Arc<AppState>>, multipart: Multipart) -> impl IntoResponse {
    run_upload_job(&state, multipart, |fields| {
        ImagingJob::Legend(LegendParams::from_fields(fields))
    })
    .await
}

/// Rescale every uploaded image by a percentage
pub async fn resize(State(state): State<Arc<AppState>>, multipart: Multipart) -> impl IntoResponse {
    run_upload_job(&state, multipart, |fields| {
        ImagingJob::Resize(ResizeParams::from_fields(fields))
    })
    .await
}

async fn run_upload_job<F>(state: &AppState, multipart: Multipart, build_job: F) -> Response<Body>
where
    F: FnOnce(&FormFields) -> ImagingJob,
{
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Rejected upload: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    if form.files.is_empty() {
        return (StatusCode::BAD_REQUEST, "no files uploaded").into_response();
    }

    let job = build_job(&form.fields);
    tracing::debug!("{} job for {} files: {:?}", job.name(), form.files.len(), job);

    let session = match SessionDir::create(&state.work_dir).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Error creating session directory: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // The response is already in memory. If this future is dropped first,
    // dropping the session removes it instead.
    let response = process_in_session(state, &session, form.files, job).await;
    session.remove().await;

    match response {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn process_in_session(
    state: &AppState,
    session: &SessionDir,
    files: Vec<UploadedFile>,
    job: ImagingJob,
) -> Result<Response<Body>, StatusCode> {
    let mut staged = Vec::with_capacity(files.len());
    for (index, file) in files.into_iter().enumerate() {
        let path = session.stage(&scratch_name(index, &file.name), &file.bytes).await.map_err(|e| {
            tracing::error!("Error staging {}: {}", file.name, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        staged.push(StagedFile {
            name: file.name,
            content_type: file.content_type,
            path,
        });
    }

    let outcome = state
        .imaging_service
        .process_batch(session.output_dir(), staged, job)
        .await;

    package_outcome(session, outcome).await
}

/// One result goes back as-is, several as a zip, none as a 422
async fn package_outcome(
    session: &SessionDir,
    outcome: BatchOutcome,
) -> Result<Response<Body>, StatusCode> {
    match outcome.succeeded.as_slice() {
        [] => failure_response(&outcome.failed),
        [single] => {
            tracing::debug!("Returning {} rendered from {}", single.output_name, single.source);
            let body = tokio::fs::read(&single.output_path).await.map_err(|e| {
                tracing::error!("Error reading {}: {}", single.output_path.display(), e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            let content_type = single.content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE);
            attachment_response(body, content_type, &single.output_name, &outcome.failed)
        }
        many => {
            let entries = many
                .iter()
                .map(|f| (f.output_name.clone(), f.output_path.clone()))
                .collect();
            let archive_path = write_archive(session.path(), entries).await.map_err(|e| {
                tracing::error!("Error packaging results: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            let body = tokio::fs::read(&archive_path).await.map_err(|e| {
                tracing::error!("Error reading {}: {}", archive_path.display(), e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            attachment_response(body, "application/zip", ARCHIVE_NAME, &outcome.failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::imaging_ports::{ImageInspector, Renderer, SwatchCatalog};
    use crate::application::imaging_service::ImagingService;
    use crate::domain::dpi::ImageDimensions;
    use crate::domain::error::{AnnotateError, AnnotateResult};
    use crate::domain::render_instructions::RenderInstructions;
    use crate::infrastructure::http_response::FAILED_FILES_HEADER;
    use crate::presentation::upload_form::test_support::multipart;
    use async_trait::async_trait;
    use axum::http::header;
    use std::io::{Cursor, Read};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// Uploads whose content is `broken` are not images
    struct FixedInspector;

    #[async_trait]
    impl ImageInspector for FixedInspector {
        async fn dimensions(&self, image: &Path) -> AnnotateResult<ImageDimensions> {
            if tokio::fs::read(image).await? == b"broken" {
                return Err(AnnotateError::image_introspection(image.display().to_string(), "not an image"));
            }
            Ok(ImageDimensions::new(1408.0, 1000.0))
        }
    }

    /// Writes the argument list so the handler has something to send back
    struct WritingRenderer;

    #[async_trait]
    impl Renderer for WritingRenderer {
        async fn render(&self, instructions: &RenderInstructions) -> AnnotateResult<()> {
            tokio::fs::write(&instructions.output, instructions.args.join(" ")).await?;
            Ok(())
        }
    }

    /// Wraps the input's contents; `B` takes a little longer than the rest
    struct CopyingRenderer;

    #[async_trait]
    impl Renderer for CopyingRenderer {
        async fn render(&self, instructions: &RenderInstructions) -> AnnotateResult<()> {
            let input = tokio::fs::read_to_string(&instructions.args[0]).await?;
            if input == "B" {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            tokio::fs::write(&instructions.output, format!("rendered({})", input)).await?;
            Ok(())
        }
    }

    struct StalledRenderer;

    #[async_trait]
    impl Renderer for StalledRenderer {
        async fn render(&self, _instructions: &RenderInstructions) -> AnnotateResult<()> {
            std::future::pending().await
        }
    }

    struct NoSwatches;

    impl SwatchCatalog for NoSwatches {
        fn lookup(&self, _color: &str) -> Option<PathBuf> {
            None
        }
    }

    fn state_with(work_dir: &Path, renderer: Arc<dyn Renderer>) -> Arc<AppState> {
        Arc::new(AppState {
            imaging_service: ImagingService::new(Arc::new(FixedInspector), renderer, Arc::new(NoSwatches)),
            work_dir: work_dir.to_path_buf(),
        })
    }

    fn state(work_dir: &Path) -> Arc<AppState> {
        state_with(work_dir, Arc::new(WritingRenderer))
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_single_file_is_returned_directly() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(
            &[("zinterval", "10"), ("xyinterval", "2"), ("xyintervalcount", "2")],
            &[("a.png", "pixels")],
        )
        .await;

        let response = annotate(State(state(work_dir.path())), upload).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("filename=\"annotated-a.png\"")
        );

        let body = body_text(response).await;
        assert!(body.contains("-annotate +1204+422 10"));
        assert!(is_empty_dir(work_dir.path()));
    }

    #[tokio::test]
    async fn test_several_files_are_zipped_and_failures_listed() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[], &[("a.png", "1"), ("broken.png", "broken"), ("b.png", "3")]).await;

        let response = annotate(State(state(work_dir.path())), upload).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(response.headers()[FAILED_FILES_HEADER], "broken.png");
        assert!(is_empty_dir(work_dir.path()));
    }

    #[tokio::test]
    async fn test_all_failed_is_unprocessable() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[("legendcolor", "mauve")], &[("a.png", "1")]).await;

        let response = legend(State(state(work_dir.path())), upload).await.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_text(response).await, "a.png: unknown legend color: mauve\n");
    }

    #[tokio::test]
    async fn test_no_files_is_bad_request() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[("resizepercentage", "50")], &[]).await;

        let response = resize(State(state(work_dir.path())), upload).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resize_names_output_after_percentage() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[("resizepercentage", "50")], &[("photo.jpg", "1")]).await;

        let response = resize(State(state(work_dir.path())), upload).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("filename=\"photo_50%.jpg\""));
    }

    #[tokio::test]
    async fn test_output_named_like_a_sibling_upload_keeps_both_inputs() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[], &[("a.png", "A"), ("annotated-a.png", "B")]).await;

        let response = annotate(State(state_with(work_dir.path(), Arc::new(CopyingRenderer))), upload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = |name: &str| {
            let mut contents = String::new();
            archive.by_name(name).unwrap().read_to_string(&mut contents).unwrap();
            contents
        };
        assert_eq!(entry("annotated-a.png"), "rendered(A)");
        assert_eq!(entry("annotated-annotated-a.png"), "rendered(B)");
    }

    #[tokio::test]
    async fn test_cancelled_request_leaves_no_session_behind() {
        let work_dir = tempfile::tempdir().unwrap();
        let upload = multipart(&[], &[("a.png", "A"), ("b.png", "B")]).await;
        let state = state_with(work_dir.path(), Arc::new(StalledRenderer));

        let result = tokio::time::timeout(Duration::from_millis(200), annotate(State(state), upload)).await;

        assert!(result.is_err());
        assert!(is_empty_dir(work_dir.path()));
    }
}
