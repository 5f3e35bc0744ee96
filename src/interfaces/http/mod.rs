use crate::application::{AlmSubmissionUseCase, BatchRequest, GenerationOrchestrator, ProgressSender};
use crate::domain::alm::{AlmPlatform, AlmSettings};
use crate::domain::batch::{BatchFileStatus, BatchReport};
use crate::domain::document::UploadedFile;
use crate::domain::error::{AppError, Result};
use crate::domain::generation_config::GenerationConfig;
use crate::domain::model_config::ModelConfig;
use crate::domain::test_case::TestCase;
use crate::infrastructure::config::AppConfig;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{info, warn};

pub struct HttpState {
    orchestrator: GenerationOrchestrator,
    alm: AlmSubmissionUseCase,
    config: AppConfig,
    suite: RwLock<Vec<TestCase>>,
    progress: ProgressSender,
    batch_lock: Mutex<()>,
}

impl HttpState {
    pub fn new(
        orchestrator: GenerationOrchestrator,
        alm: AlmSubmissionUseCase,
        config: AppConfig,
    ) -> Self {
        let (progress, _) = watch::channel(Vec::new());
        Self {
            orchestrator,
            alm,
            config,
            suite: RwLock::new(Vec::new()),
            progress,
            batch_lock: Mutex::new(()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub content_base64: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub files: Vec<FilePayload>,
    #[serde(default)]
    pub generation_config: Option<GenerationConfig>,
    #[serde(default)]
    pub model_config: ModelConfig,
}

impl GenerateRequest {
    fn into_batch_request(self, defaults: &GenerationConfig) -> Result<BatchRequest> {
        let files = self
            .files
            .into_iter()
            .map(|file| {
                let bytes = STANDARD.decode(file.content_base64.trim()).map_err(|e| {
                    AppError::Validation(format!("File '{}' is not valid base64: {}", file.name, e))
                })?;
                Ok(UploadedFile::new(file.name, file.mime_type, bytes))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchRequest {
            requirement: self.requirement,
            files,
            generation: self.generation_config.unwrap_or_else(|| defaults.clone()),
            model: self.model_config,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub test_cases: Vec<TestCase>,
    pub statuses: Vec<BatchFileStatus>,
    pub report: BatchReport,
}

#[derive(Deserialize)]
pub struct AlmSubmitRequest {
    pub platform: AlmPlatform,
    #[serde(default)]
    pub credentials: Option<AlmSettings>,
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::Validation(_) => HttpResponse::BadRequest().body(err.to_string()),
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[post("/generate")]
async fn generate(data: web::Data<HttpState>, req: web::Json<GenerateRequest>) -> impl Responder {
    let request = match req.into_inner().into_batch_request(&data.config.generation) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    let Ok(_running) = data.batch_lock.try_lock() else {
        return HttpResponse::Conflict().body("A generation batch is already running.");
    };

    info!(
        files = request.files.len(),
        provider = ?request.model.provider,
        "Starting generation batch"
    );

    match data.orchestrator.run(request, Some(&data.progress)).await {
        Ok(outcome) => {
            let report = outcome.report();
            *data.suite.write().await = outcome.test_cases.clone();
            HttpResponse::Ok().json(GenerateResponse {
                test_cases: outcome.test_cases,
                statuses: outcome.statuses,
                report,
            })
        }
        Err(e) => {
            warn!(error = %e, "Generation batch rejected");
            error_response(&e)
        }
    }
}

#[get("/batch/status")]
async fn batch_status(data: web::Data<HttpState>) -> impl Responder {
    let statuses = data.progress.borrow().clone();
    HttpResponse::Ok().json(statuses)
}

#[get("/test-cases")]
async fn list_test_cases(data: web::Data<HttpState>) -> impl Responder {
    let suite = data.suite.read().await;
    HttpResponse::Ok().json(&*suite)
}

#[post("/test-cases/{id}/alm")]
async fn submit_to_alm(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<AlmSubmitRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let AlmSubmitRequest {
        platform,
        credentials,
    } = req.into_inner();
    let settings = credentials.unwrap_or_else(|| data.config.alm.clone());

    match data
        .alm
        .submit_tracked(&data.suite, &id, platform, &settings)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}

/// Routes under `/api`, with JSON bodies capped at `max_body_bytes`.
pub fn configure(max_body_bytes: usize) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(
            web::scope("/api")
                .app_data(web::JsonConfig::default().limit(max_body_bytes))
                .service(health)
                .service(generate)
                .service(batch_status)
                .service(list_test_cases)
                .service(submit_to_alm),
        );
    }
}

pub fn start_server(state: HttpState) -> std::io::Result<Server> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;
    let routes = configure(state.config.server.max_body_bytes());
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes.clone())
    })
    .bind((host.as_str(), port))?
    .run();

    info!(%host, port, "HTTP API listening");
    Ok(server)
}
