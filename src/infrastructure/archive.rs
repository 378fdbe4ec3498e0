// Zip packaging for multi-file results
use anyhow::Context;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "results.zip";

/// Zip `entries` (archive name, file on disk) into `<dir>/results.zip`.
pub async fn write_archive(dir: &Path, entries: Vec<(String, PathBuf)>) -> anyhow::Result<PathBuf> {
    let archive_path = dir.join(ARCHIVE_NAME);
    let target = archive_path.clone();

    tokio::task::spawn_blocking(move || write_zip(&target, &entries))
        .await
        .context("zip task panicked")??;

    Ok(archive_path)
}

fn write_zip(archive_path: &Path, entries: &[(String, PathBuf)]) -> anyhow::Result<()> {
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in entries {
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        std::io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_write_archive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("annotated-a.png"), b"first").unwrap();
        std::fs::write(dir.path().join("annotated-b.png"), b"second").unwrap();

        let entries = vec![
            ("annotated-a.png".to_string(), dir.path().join("annotated-a.png")),
            ("annotated-b.png".to_string(), dir.path().join("annotated-b.png")),
        ];
        let archive_path = write_archive(dir.path(), entries).await.unwrap();
        assert_eq!(archive_path, dir.path().join(ARCHIVE_NAME));

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive.by_name("annotated-b.png").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "second");
    }

    #[tokio::test]
    async fn test_missing_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![("gone.png".to_string(), dir.path().join("gone.png"))];
        assert!(write_archive(dir.path(), entries).await.is_err());
    }
}
