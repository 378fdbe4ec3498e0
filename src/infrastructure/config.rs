use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub imagemagick: ImageMagickSettings,
    pub storage: StorageSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageMagickSettings {
    pub identify: String,
    pub convert: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Parent of the per-request session directories
    pub work_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    /// Holds `skaala_<color>.png` gradient swatches
    pub swatch_dir: PathBuf,
    pub frontend_dir: PathBuf,
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    service_config_from(
        config::File::with_name("config/service").required(false),
        std::env::var("PORT").ok(),
    )
}

fn service_config_from<S>(file: S, port: Option<String>) -> anyhow::Result<ServiceConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let mut builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000_i64)?
        .set_default("server.max_upload_bytes", 64_i64 * 1024 * 1024)?
        .set_default("imagemagick.identify", "identify")?
        .set_default("imagemagick.convert", "convert")?
        .set_default("storage.work_dir", std::env::temp_dir().to_string_lossy().into_owned())?
        .set_default("assets.swatch_dir", "assets/swatches")?
        .set_default("assets.frontend_dir", "frontend")?
        .add_source(file)
        .add_source(config::Environment::with_prefix("SCALE_ANNOTATOR").separator("__"));

    // Plain PORT wins, as on most hosting platforms
    if let Some(port) = port {
        builder = builder.set_override("server.port", port)?;
    }

    Ok(builder.build()?.try_deserialize()?)
}
