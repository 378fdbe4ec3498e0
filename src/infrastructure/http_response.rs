// HTTP response utilities for rendered downloads
use crate::application::imaging_service::FileFailure;
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};

/// Lists uploads that could not be processed when others succeeded
pub const FAILED_FILES_HEADER: &str = "x-failed-files";

/// `attachment` disposition with an ASCII fallback and an RFC 5987 name
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

fn failed_files_value(failures: &[FileFailure]) -> Option<HeaderValue> {
    if failures.is_empty() {
        return None;
    }

    let names: Vec<String> = failures
        .iter()
        .map(|f| urlencoding::encode(&f.file).into_owned())
        .collect();
    HeaderValue::from_str(&names.join(",")).ok()
}

/// Serve a rendered file (or archive) as a download
pub fn attachment_response(
    body: Vec<u8>,
    content_type: &str,
    file_name: &str,
    failures: &[FileFailure],
) -> Result<Response<Body>, StatusCode> {
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition(file_name))
        .header(header::CONTENT_LENGTH, body.len());

    if let Some(failed) = failed_files_value(failures) {
        response_builder = response_builder.header(FAILED_FILES_HEADER, failed);
    }

    response_builder.body(Body::from(body)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Every upload failed: say which and why
pub fn failure_response(failures: &[FileFailure]) -> Result<Response<Body>, StatusCode> {
    let body: String = failures
        .iter()
        .map(|f| format!("{}: {}\n", f.file, f.message))
        .collect();

    Response::builder()
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(file: &str) -> FileFailure {
        FileFailure {
            file: file.to_string(),
            message: "renderer failed: boom".to_string(),
        }
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("annotated-a.png"),
            "attachment; filename=\"annotated-a.png\"; filename*=UTF-8''annotated-a.png"
        );
        assert_eq!(
            content_disposition("kartta ä.png"),
            "attachment; filename=\"kartta _.png\"; filename*=UTF-8''kartta%20%C3%A4.png"
        );
    }

    #[test]
    fn test_attachment_response_headers() {
        let response = attachment_response(b"zip".to_vec(), "application/zip", "results.zip", &[failure("b c.png")]).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert_eq!(headers[header::CONTENT_LENGTH], "3");
        assert_eq!(headers[FAILED_FILES_HEADER], "b%20c.png");
    }

    #[test]
    fn test_bad_content_type_falls_back() {
        let response = attachment_response(Vec::new(), "image/png\n", "a.png", &[]).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
        assert!(response.headers().get(FAILED_FILES_HEADER).is_none());
    }

    #[test]
    fn test_failure_response() {
        let response = failure_response(&[failure("a.png")]).unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
