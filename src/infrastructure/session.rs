// Per-request scratch directory for uploads and rendered results
use rand::Rng;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

const INPUT_DIR: &str = "in";
const OUTPUT_DIR: &str = "out";

/// Removed from disk when dropped, so a cancelled request leaves nothing behind.
#[derive(Debug)]
pub struct SessionDir {
    dir: TempDir,
    inputs: PathBuf,
    outputs: PathBuf,
}

/// Reduce a client-supplied file name to a bare name inside the session.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

fn random_session_id() -> String {
    let bytes: [u8; 20] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl SessionDir {
    pub async fn create(work_dir: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(work_dir).await?;

        let dir = tempfile::Builder::new()
            .prefix(&random_session_id())
            .rand_bytes(0)
            .tempdir_in(work_dir)?;

        // Uploads and results never share a directory
        let inputs = dir.path().join(INPUT_DIR);
        let outputs = dir.path().join(OUTPUT_DIR);
        tokio::fs::create_dir(&inputs).await?;
        tokio::fs::create_dir(&outputs).await?;
        tracing::debug!("created session directory {}", dir.path().display());

        Ok(Self { dir, inputs, outputs })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where rendered results are written
    pub fn output_dir(&self) -> &Path {
        &self.outputs
    }

    /// Write an upload into the session's input directory under `disk_name`,
    /// which must be unique within the request.
    pub async fn stage(&self, disk_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.inputs.join(disk_name);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(path)
    }

    pub async fn remove(self) {
        let path = self.dir.path().to_path_buf();
        match tokio::task::spawn_blocking(move || self.dir.close()).await {
            Ok(Ok(())) => tracing::debug!("removed session directory {}", path.display()),
            Ok(Err(e)) => tracing::warn!("could not remove session directory {}: {}", path.display(), e),
            Err(e) => tracing::warn!("cleanup of {} did not complete: {}", path.display(), e),
        }
    }
}
