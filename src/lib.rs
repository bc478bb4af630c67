use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod contracts;
pub mod schedule;
pub mod state;
pub mod storage;

pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::contracts::handlers::list_appointments,
            crate::contracts::handlers::create_contracts,
            crate::contracts::handlers::hub_link,
        ),
        components(
            schemas(
                schedule::record::AppointmentView,
                contracts::models::BatchResult,
                contracts::models::MergedFile,
                storage::StoredFile,
                contracts::handlers::CreateContractsRequest,
                contracts::handlers::HubConfig,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Contract Service", description = "Transportation contract generation endpoints.")
        )
    )]
    struct ApiDoc;

    let config = config::AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let individual_dir = storage::area_dir(&config.storage_root, storage::StorageArea::Individual);
    let merged_dir = storage::area_dir(&config.storage_root, storage::StorageArea::Merged);

    let app_state = match AppState::from_config(config) {
        Ok(state) => web::Data::new(state),
        Err(err) => {
            log::error!("Failed to initialize application state. Please check STORAGE_ROOT and CONTRACT_TEMPLATE_PATH. Error: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/appointments")
                            .route(web::get().to(contracts::handlers::list_appointments)),
                    )
                    .service(
                        web::resource("/contracts")
                            .route(web::post().to(contracts::handlers::create_contracts)),
                    )
                    .service(
                        web::resource("/hub").route(web::get().to(contracts::handlers::hub_link)),
                    ),
            )
            .service(actix_files::Files::new("/files/individual", individual_dir.clone()))
            .service(actix_files::Files::new("/files/merged", merged_dir.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
