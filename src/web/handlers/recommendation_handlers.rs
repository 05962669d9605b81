// src/web/handlers/recommendation_handlers.rs
//! CV upload handlers for the recommendation and profile endpoints.

use rocket::form::Form;
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use std::future::Future;
use tracing::Instrument;

use crate::advisor::CareerAdvisor;
use crate::error::AdvisorError;
use crate::types::{CourseRecommendation, EducationRecommendation, JobRecommendation, ProfileInfo};
use crate::web::types::{CvUploadForm, StandardErrorResponse};
use crate::{app_log, app_span};

pub type ApiError = Custom<Json<StandardErrorResponse>>;

/// Whether a failed listing fetch relays the upstream status to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    Relay,
    Mask,
}

pub async fn recommend_education_handler(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<EducationRecommendation>, ApiError> {
    run_pipeline("education", upload, UpstreamStatus::Mask, |document| {
        advisor.recommend_education(document)
    })
    .await
}

pub async fn recommend_jobs_handler(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<JobRecommendation>, ApiError> {
    run_pipeline("jobs", upload, UpstreamStatus::Relay, |document| {
        advisor.recommend_jobs(document)
    })
    .await
}

pub async fn recommend_courses_handler(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<CourseRecommendation>, ApiError> {
    run_pipeline("courses", upload, UpstreamStatus::Mask, |document| {
        advisor.recommend_courses(document)
    })
    .await
}

pub async fn extract_profile_handler(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<ProfileInfo>, ApiError> {
    run_pipeline("profile", upload, UpstreamStatus::Mask, |document| {
        advisor.extract_profile(document)
    })
    .await
}

async fn run_pipeline<T, F, Fut>(
    flow: &'static str,
    mut upload: Form<CvUploadForm<'_>>,
    upstream: UpstreamStatus,
    pipeline: F,
) -> Result<Json<T>, ApiError>
where
    F: FnOnce(Vec<u8>) -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = app_span!("cv_request", flow = flow, request_id = %request_id);

    async {
        app_log!(info, "Received CV for {} recommendation", flow);
        let document = match read_upload(&mut upload, &request_id).await {
            Ok(document) => document,
            Err(rejection) => return Err(rejection),
        };

        match pipeline(document).await {
            Ok(response) => {
                app_log!(info, "Completed {} request", flow);
                Ok(Json(response))
            }
            Err(e) => {
                app_log!(error, "{} request failed: {}", flow, e);
                Err(error_response(&e, upstream, Some(request_id.clone())))
            }
        }
    }
    .instrument(span)
    .await
}

/// Persist the upload to a scratch file, read it back and remove it.
async fn read_upload(
    upload: &mut Form<CvUploadForm<'_>>,
    request_id: &str,
) -> Result<Vec<u8>, ApiError> {
    let content_type = upload.file.content_type();
    let accepted = content_type.map_or(true, |ct| ct.is_pdf() || *ct == ContentType::Binary);
    if !accepted {
        let received = content_type
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(Custom(
            Status::BadRequest,
            Json(StandardErrorResponse::new(
                format!("Only PDF documents are supported. Received: {}", received),
                "INVALID_FORMAT".to_string(),
                vec!["Upload your CV as a PDF file (.pdf)".to_string()],
                Some(request_id.to_string()),
            )),
        ));
    }

    let temp_path = std::env::temp_dir().join(format!("cv_upload_{}", uuid::Uuid::new_v4()));

    if let Err(e) = upload.file.persist_to(&temp_path).await {
        app_log!(error, "Failed to save uploaded file: {}", e);
        return Err(upload_failure(request_id));
    }

    let read = tokio::fs::read(&temp_path).await;
    let _ = tokio::fs::remove_file(&temp_path).await;

    read.map_err(|e| {
        app_log!(error, "Failed to read uploaded file: {}", e);
        upload_failure(request_id)
    })
}

fn upload_failure(request_id: &str) -> ApiError {
    Custom(
        Status::InternalServerError,
        Json(StandardErrorResponse::new(
            "Failed to process uploaded file".to_string(),
            "FILE_SAVE_ERROR".to_string(),
            vec!["Try uploading the file again".to_string()],
            Some(request_id.to_string()),
        )),
    )
}

pub fn error_status(err: &AdvisorError, upstream: UpstreamStatus) -> Status {
    match err {
        AdvisorError::MappingNotFound(_) => Status::NotFound,
        AdvisorError::Fetch { status, .. } if upstream == UpstreamStatus::Relay => status
            .and_then(Status::from_code)
            .unwrap_or(Status::BadGateway),
        _ => Status::InternalServerError,
    }
}

pub fn error_response(
    err: &AdvisorError,
    upstream: UpstreamStatus,
    request_id: Option<String>,
) -> ApiError {
    let (error_code, suggestions): (&str, &[&str]) = match err {
        AdvisorError::Extraction(_) => (
            "EXTRACTION_ERROR",
            &["Ensure the CV has selectable text", "Check the file is not corrupted"],
        ),
        AdvisorError::Classification(_) => (
            "CLASSIFICATION_ERROR",
            &["Try again in a few moments"],
        ),
        AdvisorError::MappingNotFound(_) => (
            "THEME_NOT_MAPPED",
            &["Upload a CV with more detail about your field"],
        ),
        AdvisorError::Fetch { .. } => (
            "LISTING_FETCH_ERROR",
            &["The listing site may be unavailable, try again later"],
        ),
        AdvisorError::Config(_) => (
            "SERVICE_CONFIG_ERROR",
            &["Contact system administrator"],
        ),
        AdvisorError::InvalidReply(_) => (
            "INVALID_MODEL_REPLY",
            &["Try again in a few moments"],
        ),
    };

    Custom(
        error_status(err, upstream),
        Json(StandardErrorResponse::new(
            err.to_string(),
            error_code.to_string(),
            suggestions.iter().map(|s| s.to_string()).collect(),
            request_id,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LlmError;

    #[test]
    fn test_unmapped_theme_is_not_found() {
        let err = AdvisorError::MappingNotFound("Marine biology".to_string());
        assert_eq!(error_status(&err, UpstreamStatus::Mask), Status::NotFound);
    }

    #[test]
    fn test_job_listing_status_is_relayed() {
        let err = AdvisorError::fetch("https://www.bayt.com/x", Some(403), "HTTP error");
        assert_eq!(error_status(&err, UpstreamStatus::Relay), Status::Forbidden);
        assert_eq!(error_status(&err, UpstreamStatus::Mask), Status::InternalServerError);

        let network = AdvisorError::fetch("https://www.bayt.com/x", None, "connection reset");
        assert_eq!(error_status(&network, UpstreamStatus::Relay), Status::BadGateway);
    }

    #[test]
    fn test_server_errors() {
        let classification = AdvisorError::Classification(LlmError::Communication("timeout".into()));
        assert_eq!(
            error_status(&classification, UpstreamStatus::Relay),
            Status::InternalServerError
        );

        let Custom(status, Json(body)) = error_response(
            &AdvisorError::Config("missing key".into()),
            UpstreamStatus::Mask,
            None,
        );
        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body.error_code, "SERVICE_CONFIG_ERROR");
        assert!(!body.success);
    }
}
