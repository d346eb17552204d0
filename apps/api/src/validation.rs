//! Request input bounds. Lengths are counted in characters after trimming.

use std::path::Path;

use crate::documents::extract::{ExtractError, FileKind};
use crate::errors::AppError;

const JOB_DESCRIPTION_MIN_CHARS: usize = 50;
const JOB_DESCRIPTION_MAX_CHARS: usize = 20_000;
const RESUME_TEXT_MIN_CHARS: usize = 100;
const RESUME_TEXT_MAX_CHARS: usize = 30_000;

pub fn validate_text_input(
    text: &str,
    min_chars: usize,
    max_chars: usize,
    field_name: &str,
) -> Result<(), AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field_name} is required")));
    }

    let chars = trimmed.chars().count();
    if chars < min_chars {
        return Err(AppError::Validation(format!(
            "{field_name} must be at least {min_chars} characters"
        )));
    }
    if chars > max_chars {
        return Err(AppError::Validation(format!(
            "{field_name} must not exceed {max_chars} characters"
        )));
    }

    Ok(())
}

pub fn validate_job_description(text: &str) -> Result<(), AppError> {
    validate_text_input(
        text,
        JOB_DESCRIPTION_MIN_CHARS,
        JOB_DESCRIPTION_MAX_CHARS,
        "Job description",
    )
}

pub fn validate_resume_text(text: &str) -> Result<(), AppError> {
    validate_text_input(
        text,
        RESUME_TEXT_MIN_CHARS,
        RESUME_TEXT_MAX_CHARS,
        "Resume text",
    )
}

/// Checks the uploaded file name against the configured extensions and
/// resolves the extraction format.
pub fn validate_upload_name(file_name: &str, allowed: &[String]) -> Result<FileKind, AppError> {
    // Browsers may send a full client-side path; only the final component matters.
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base_name.is_empty() {
        return Err(AppError::Validation("No file provided".to_string()));
    }

    let extension = Path::new(base_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    if !allowed.iter().any(|a| *a == extension) {
        return Err(AppError::Validation(format!(
            "File type .{extension} not allowed. Allowed types: {}",
            allowed.join(", ")
        )));
    }

    FileKind::from_extension(&extension)
        .ok_or_else(|| AppError::Extraction(ExtractError::UnsupportedFormat(extension)))
}

pub fn validate_upload_size(size: usize, max_size: usize) -> Result<(), AppError> {
    if size > max_size {
        let max_mb = max_size as f64 / (1024.0 * 1024.0);
        return Err(AppError::Validation(format!(
            "File too large. Maximum size: {max_mb:.1}MB"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()]
    }

    fn validation_message(result: Result<impl std::fmt::Debug, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_job_description_bounds() {
        assert_eq!(
            validation_message(validate_job_description("   ")),
            "Job description is required"
        );
        assert_eq!(
            validation_message(validate_job_description("Too short")),
            "Job description must be at least 50 characters"
        );
        assert!(validate_job_description(&"a".repeat(50)).is_ok());
        assert_eq!(
            validation_message(validate_job_description(&"a".repeat(20_001))),
            "Job description must not exceed 20000 characters"
        );
    }

    #[test]
    fn test_resume_text_bounds_count_trimmed_characters() {
        let padded = format!("   {}   ", "é".repeat(99));
        assert_eq!(
            validation_message(validate_resume_text(&padded)),
            "Resume text must be at least 100 characters"
        );
        assert!(validate_resume_text(&"é".repeat(100)).is_ok());
        assert!(validate_resume_text(&"x".repeat(30_000)).is_ok());
        assert!(validate_resume_text(&"x".repeat(30_001)).is_err());
    }

    #[test]
    fn test_upload_name_resolves_kind_case_insensitively() {
        assert_eq!(validate_upload_name("cv.PDF", &allowed()).unwrap(), FileKind::Pdf);
        assert_eq!(
            validate_upload_name("C:\\Users\\me\\resume.docx", &allowed()).unwrap(),
            FileKind::Docx
        );
        assert_eq!(validate_upload_name("notes.txt", &allowed()).unwrap(), FileKind::Txt);
    }

    #[test]
    fn test_upload_name_rejections() {
        assert_eq!(
            validation_message(validate_upload_name("", &allowed())),
            "No file provided"
        );
        assert_eq!(
            validation_message(validate_upload_name("payload.exe", &allowed())),
            "File type .exe not allowed. Allowed types: pdf, docx, txt"
        );
        assert!(validate_upload_name("no_extension", &allowed()).is_err());
    }

    #[test]
    fn test_allowed_but_unreadable_extension_is_unsupported_format() {
        let allowed = vec!["doc".to_string()];
        assert!(matches!(
            validate_upload_name("old.doc", &allowed),
            Err(AppError::Extraction(ExtractError::UnsupportedFormat(ext))) if ext == "doc"
        ));
    }

    #[test]
    fn test_upload_size() {
        assert!(validate_upload_size(5 * 1024 * 1024, 5 * 1024 * 1024).is_ok());
        assert_eq!(
            validation_message(validate_upload_size(5 * 1024 * 1024 + 1, 5 * 1024 * 1024)),
            "File too large. Maximum size: 5.0MB"
        );
    }
}
