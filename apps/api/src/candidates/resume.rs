//! Resume PDF intake: text extraction and object storage.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Multipart field carrying the PDF.
pub const RESUME_FIELD: &str = "resume";

pub struct UploadedResume {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Pulls the `resume` field out of a multipart body. Other fields are ignored.
pub async fn read_resume_field(mut multipart: Multipart) -> Result<UploadedResume, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        if !looks_like_pdf(content_type.as_deref(), file_name.as_deref()) {
            return Err(AppError::Validation("Only PDF resumes are supported".to_string()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded resume is empty".to_string()));
        }
        return Ok(UploadedResume { file_name, data });
    }
    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}

fn looks_like_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type.is_some_and(|t| t.eq_ignore_ascii_case("application/pdf"));
    let by_name = file_name.is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));
    by_type || by_name
}

/// Extracts plain text from a PDF. Parsing is CPU-bound, so it runs on the blocking pool.
pub async fn extract_text(data: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pdf extraction: {e}")))?
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

/// Collapses the runs of blank lines and trailing spaces pdf extraction leaves behind.
pub fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn resume_key(candidate_id: Uuid) -> String {
    format!("resumes/{candidate_id}/{}.pdf", Uuid::new_v4())
}

/// Stores the original PDF and returns its object key.
pub async fn store_resume(
    s3: &S3Client,
    bucket: &str,
    candidate_id: Uuid,
    data: Bytes,
) -> Result<String, AppError> {
    let key = resume_key(candidate_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(key)
}

/// The object a fresh upload makes obsolete, if any.
pub fn superseded_key<'a>(previous: Option<&'a str>, current: &str) -> Option<&'a str> {
    previous.filter(|key| !key.is_empty() && *key != current)
}

/// Removes a stored PDF. Failures only leave an orphaned object behind, so they
/// are logged rather than returned.
pub async fn delete_resume(s3: &S3Client, bucket: &str, key: &str) {
    match s3.delete_object().bucket(bucket).key(key).send().await {
        Ok(_) => info!("Deleted resume s3://{bucket}/{key}"),
        Err(e) => warn!("Failed to delete resume s3://{bucket}/{key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection() {
        assert!(looks_like_pdf(Some("application/pdf"), None));
        assert!(looks_like_pdf(Some("application/octet-stream"), Some("CV.PDF")));
        assert!(!looks_like_pdf(Some("image/png"), Some("cv.png")));
        assert!(!looks_like_pdf(None, None));
    }

    #[test]
    fn test_normalize_whitespace_collapses_blank_runs() {
        let raw = "\n\nJane Doe   \n\n\n\nEngineer\nRust\n\n";
        assert_eq!(normalize_whitespace(raw), "Jane Doe\n\nEngineer\nRust");
    }

    #[test]
    fn test_resume_key_is_scoped_to_candidate() {
        let id = Uuid::new_v4();
        let key = resume_key(id);
        assert!(key.starts_with(&format!("resumes/{id}/")));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_superseded_key() {
        let new_key = "resumes/a/new.pdf";
        assert_eq!(
            superseded_key(Some("resumes/a/old.pdf"), new_key),
            Some("resumes/a/old.pdf")
        );
        assert_eq!(superseded_key(Some(new_key), new_key), None);
        assert_eq!(superseded_key(Some(""), new_key), None);
        assert_eq!(superseded_key(None, new_key), None);
    }
}
