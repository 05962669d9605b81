// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};

use crate::advisor::CareerAdvisor;
use crate::app_log;
use crate::core::AdvisorConfig;
use crate::types::{CourseRecommendation, EducationRecommendation, JobRecommendation, ProfileInfo};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/recommend-education", data = "<upload>")]
pub async fn recommend_education(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<EducationRecommendation>, ApiError> {
    handlers::recommend_education_handler(upload, advisor).await
}

#[post("/recommend-jobs", data = "<upload>")]
pub async fn recommend_jobs(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<JobRecommendation>, ApiError> {
    handlers::recommend_jobs_handler(upload, advisor).await
}

#[post("/recommend-courses", data = "<upload>")]
pub async fn recommend_courses(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<CourseRecommendation>, ApiError> {
    handlers::recommend_courses_handler(upload, advisor).await
}

#[post("/extract-profile", data = "<upload>")]
pub async fn extract_profile(
    upload: Form<CvUploadForm<'_>>,
    advisor: &State<CareerAdvisor>,
) -> Result<Json<ProfileInfo>, ApiError> {
    handlers::extract_profile_handler(upload, advisor).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Send the CV as multipart form data in a field named 'file'".to_string()],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path".to_string()],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Uploaded file is too large".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Compress your CV file".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Missing or unreadable upload".to_string(),
        "INVALID_UPLOAD".to_string(),
        vec!["Attach the CV in a form field named 'file'".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the server around an already-built advisor.
pub fn build_rocket(advisor: CareerAdvisor) -> Rocket<Build> {
    let server = advisor.config().server.clone();
    let limits = Limits::default()
        .limit("file", server.upload_limit_mib.mebibytes())
        .limit("data-form", (server.upload_limit_mib + 1).mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", server.address))
        .merge(("port", server.port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(advisor)
        .register(
            "/",
            catchers![bad_request, not_found, payload_too_large, unprocessable, internal_error],
        )
        .mount(
            "/",
            routes![
                recommend_education,
                recommend_jobs,
                recommend_courses,
                extract_profile,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: AdvisorConfig) -> Result<()> {
    let address = format!("{}:{}", config.server.address, config.server.port);
    let advisor = CareerAdvisor::from_config(config)?;

    app_log!(info, "Starting career advisor API on http://{}", address);

    let _rocket = build_rocket(advisor)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;
    Ok(())
}
