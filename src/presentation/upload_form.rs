// Multipart form extraction for the upload endpoints
use crate::domain::params::FormFields;
use crate::infrastructure::session::sanitize_file_name;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use bytes::Bytes;
use thiserror::Error;

pub const FILES_FIELD: &str = "files[]";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub fields: FormFields,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("invalid file name {0:?}")]
    InvalidFileName(String),

    #[error("file {0} was uploaded more than once")]
    DuplicateFileName(String),
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name != FILES_FIELD {
            let value = field.text().await?;
            form.fields.insert(field_name, value);
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        // An untouched file input still submits an empty, nameless part
        if raw_name.is_empty() && bytes.is_empty() {
            continue;
        }

        let name = sanitize_file_name(&raw_name).ok_or(UploadError::InvalidFileName(raw_name))?;
        if form.files.iter().any(|f| f.name == name) {
            return Err(UploadError::DuplicateFileName(name));
        }

        form.files.push(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}


#[cfg(test)]
mod tests {
    use super::test_support::multipart;
    use super::*;

    #[tokio::test]
    async fn test_reads_fields_and_files() {
        let form = read_upload_form(
            multipart(
                &[("zinterval", "2.50"), ("zunit", "m")],
                &[("a.png", "first"), ("../b.png", "second")],
            )
            .await,
        )
        .await
        .unwrap();

        assert_eq!(form.fields["zinterval"], "2.50");
        assert_eq!(form.fields["zunit"], "m");

        assert_eq!(form.files.len(), 2);
        assert_eq!(form.files[0].name, "a.png");
        assert_eq!(form.files[0].content_type.as_deref(), Some("image/png"));
        assert_eq!(form.files[1].name, "b.png");
        assert_eq!(&form.files[1].bytes[..], b"second");
    }

    #[tokio::test]
    async fn test_skips_empty_file_input() {
        let form = read_upload_form(multipart(&[], &[("", "")]).await).await.unwrap();
        assert!(form.files.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_duplicates() {
        let result = read_upload_form(multipart(&[], &[("a.png", "1"), ("dir/a.png", "2")]).await).await;
        assert!(matches!(result, Err(UploadError::DuplicateFileName(name)) if name == "a.png"));
    }
}
