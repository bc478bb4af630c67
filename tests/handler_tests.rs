//! HTTP round-trips through the actix handlers.

use actix_web::{test, web, App};
use chrono::FixedOffset;
use tempfile::TempDir;

use transport_helper_server::config::AppConfig;
use transport_helper_server::contracts::handlers;
use transport_helper_server::state::AppState;

fn write_schedule(dir: &TempDir, rows: &[&str]) -> String {
    let path = dir.path().join("schedule.csv");
    let header = "Date,Appointment Status,Transportation Needed,First Name,Last Name,Address,City,State,Zip Code,Phone Number,Email,Pet Name,Species,Breed One,Breed Two,Age,Sex,Color,Appointment Type";
    let mut contents = String::from(header);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

fn test_state(dir: &TempDir, schedule_csv_path: String) -> AppState {
    let template_path = dir.path().join("contract.typ");
    std::fs::write(&template_path, "#let who = \"{{Name}}\"").unwrap();

    let config = AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        merge_api_url: "http://127.0.0.1:1/merge".to_string(),
        main_hub_link: "https://hub.example/home".to_string(),
        schedule_csv_path,
        contract_template_path: template_path.display().to_string(),
        storage_root: dir.path().join("files").display().to_string(),
        canonical_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
    };
    AppState::from_config(config).unwrap()
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data(web::Data::new($state)).service(
                web::scope("/api")
                    .service(
                        web::resource("/appointments")
                            .route(web::get().to(handlers::list_appointments)),
                    )
                    .service(
                        web::resource("/contracts")
                            .route(web::post().to(handlers::create_contracts)),
                    )
                    .service(web::resource("/hub").route(web::get().to(handlers::hub_link))),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_appointments_returns_views() {
    let dir = TempDir::new().unwrap();
    let csv = write_schedule(
        &dir,
        &[
            "03/04/2025,Scheduled,yes,Ada,Lovelace,12 Main St,Springfield,NY,10001,555-0100,ada@example.com,Rex,Dog,Beagle,,4,M,Brown,Surgery",
            "03/04/2025,Cancelled,yes,Grace,Hopper,1 Elm St,Arlington,VA,22201,555-0101,grace@example.com,Tom,Cat,,,2,F,Gray,Checkup",
        ],
    );
    let app = test_app!(test_state(&dir, csv));

    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-03-04")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let views = body.as_array().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["name"], "Ada Lovelace");
    assert_eq!(views[0]["petName"], "Rex");
    assert_eq!(views[0]["date"], "March 4, 2025");
    assert!(views[0].get("rawDate").is_none());
}

#[actix_web::test]
async fn test_list_appointments_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let csv = write_schedule(&dir, &[]);
    let app = test_app!(test_state(&dir, csv));

    let req = test::TestRequest::get()
        .uri("/api/appointments?date=someday")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_appointments_missing_source_is_404() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv").display().to_string();
    let app = test_app!(test_state(&dir, missing));

    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-03-04")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_contracts_with_no_matches_reports_structured_failure() {
    let dir = TempDir::new().unwrap();
    let csv = write_schedule(
        &dir,
        &[
            "03/04/2025,Scheduled,no,Ada,Lovelace,12 Main St,Springfield,NY,10001,555-0100,ada@example.com,Rex,Dog,Beagle,,4,M,Brown,Surgery",
        ],
    );
    let app = test_app!(test_state(&dir, csv));

    let req = test::TestRequest::post()
        .uri("/api/contracts")
        .set_json(serde_json::json!({ "date": "2025-03-04" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("No transport appointments"));
    assert_eq!(body["individuals"].as_array().unwrap().len(), 0);
    assert!(body["merged"].is_null());
}

#[actix_web::test]
async fn test_create_contracts_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let csv = write_schedule(&dir, &[]);
    let app = test_app!(test_state(&dir, csv));

    let req = test::TestRequest::post()
        .uri("/api/contracts")
        .set_json(serde_json::json!({ "date": "whenever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_hub_link_returns_configured_value() {
    let dir = TempDir::new().unwrap();
    let csv = write_schedule(&dir, &[]);
    let app = test_app!(test_state(&dir, csv));

    let req = test::TestRequest::get().uri("/api/hub").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mainHubLink"], "https://hub.example/home");
}
