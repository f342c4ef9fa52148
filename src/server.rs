/// HTTP server with WebSocket support for the interactive dashboard
use actix_web::{middleware, web, App, Error, HttpRequest, HttpResponse, HttpServer};
use actix_web_actors::ws;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::dashboard::DashboardPage;
use crate::html::render_page;
use crate::view::StatusFilter;
use crate::websocket::{AppState, DashboardWebSocket};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    status: Option<String>,
}

impl StatusQuery {
    fn status(&self) -> Result<StatusFilter, String> {
        match &self.status {
            Some(s) => s.parse(),
            None => Ok(StatusFilter::default()),
        }
    }
}

/// Render off the async workers; loading may read the CSV from disk.
async fn render_blocking(state: web::Data<AppState>, status: StatusFilter) -> Result<DashboardPage, Error> {
    Ok(web::block(move || state.render(status)).await?)
}

/// WebSocket endpoint handler
async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let resp = ws::start(DashboardWebSocket::new(state), &req, stream)?;
    Ok(resp)
}

/// Dashboard page
async fn index(query: web::Query<StatusQuery>, state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let status = match query.status() {
        Ok(status) => status,
        Err(message) => return Ok(HttpResponse::BadRequest().body(message)),
    };

    let page = render_blocking(state, status).await?;
    let html = render_page(&page, status).map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Dashboard JSON for the requested status
async fn api_dashboard(query: web::Query<StatusQuery>, state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let status = match query.status() {
        Ok(status) => status,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": message })));
        }
    };

    let page = render_blocking(state, status).await?;
    if page.is_ready() {
        Ok(HttpResponse::Ok().json(page))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(page))
    }
}

/// Drop the cached table so the next request re-reads the data file
async fn api_reload(state: web::Data<AppState>) -> HttpResponse {
    let invalidated = state.reload();
    HttpResponse::Ok().json(serde_json::json!({ "invalidated": invalidated }))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Salesboard server is running",
        "data_loaded": state.cache.contains(&state.data_path),
    }))
}

/// Register every dashboard route on an actix `ServiceConfig`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/dashboard", web::get().to(api_dashboard))
        .route("/api/reload", web::post().to(api_reload))
        .route("/ws", web::get().to(ws_index))
        .route("/health", web::get().to(health_check));
}

/// Start the HTTP server with WebSocket support
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(config.data_path.clone()));

    println!("🛒 Salesboard Server");
    println!("====================================");
    println!("📊 Dashboard: http://{}:{}/", config.host, config.port);
    println!("📡 WebSocket: ws://{}:{}/ws", config.host, config.port);
    println!("🏥 Health check: http://{}:{}/health", config.host, config.port);
    println!("📁 Data file: {}", config.data_path.display());
    println!("====================================");
    println!();

    // Warm the cache without delaying startup; failures resurface per request
    let warm = state.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = warm.cache.load(&warm.data_path) {
            log::warn!("Initial load failed: {}", e);
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Enable logger
            .wrap(middleware::Logger::default())
            // CORS for development
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
