//! HTTP surface: thin handlers that parse the selection, call the core,
//! and serialize results.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schedule::{AppointmentView, DateSelection, ScheduleError};
use crate::state::AppState;
use crate::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Service",
    get,
    path = "/appointments",
    params(
        ("date" = Option<String>, Query, description = "Target day (e.g. 2025-03-04 or 3/4/2025); omitted means today or tomorrow")
    ),
    responses(
        (status = 200, description = "Qualifying appointments for the selection", body = [AppointmentView]),
        (status = 400, description = "Unparseable date", body = ErrorResponse),
        (status = 404, description = "Schedule source not found", body = ErrorResponse)
    )
)]
pub async fn list_appointments(
    query: web::Query<AppointmentsQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let selection = match parse_selection(query.date.as_deref()) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    match data.service.list_appointments(selection).await {
        Ok(records) => {
            let views: Vec<AppointmentView> = records.iter().map(AppointmentView::from).collect();
            HttpResponse::Ok().json(views)
        }
        Err(err @ ScheduleError::SourceNotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string()))
        }
        Err(err) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContractsRequest {
    /// Target day; omitted or null means today or tomorrow.
    pub date: Option<String>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Service",
    post,
    path = "/contracts",
    request_body = CreateContractsRequest,
    responses(
        (status = 200, description = "Structured batch outcome; `ok` reports success", body = crate::contracts::models::BatchResult),
        (status = 400, description = "Unparseable date", body = ErrorResponse)
    )
)]
pub async fn create_contracts(
    request: web::Json<CreateContractsRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let selection = match parse_selection(request.date.as_deref()) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let result = data.service.create_contracts(selection).await;
    HttpResponse::Ok().json(result)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HubConfig {
    pub main_hub_link: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Service",
    get,
    path = "/hub",
    responses(
        (status = 200, description = "Configured hub link, empty when unset", body = HubConfig)
    )
)]
pub async fn hub_link(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HubConfig {
        main_hub_link: data.config.main_hub_link.clone(),
    })
}

fn parse_selection(raw: Option<&str>) -> Result<DateSelection, HttpResponse> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DateSelection::Upcoming),
        Some(s) => DateSelection::parse(s).ok_or_else(|| {
            HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request(&format!("unparseable date: {s}")))
        }),
    }
}
