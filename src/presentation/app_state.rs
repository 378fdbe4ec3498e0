// Application state for HTTP handlers
use crate::application::imaging_service::ImagingService;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppState {
    pub imaging_service: ImagingService,
    /// Parent directory for per-request sessions
    pub work_dir: PathBuf,
}
