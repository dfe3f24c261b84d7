use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use common::Config;

use crate::analyzer::{Analysis, NewsAnalyzer};
use crate::report::{build_report, ReportView};

/// Application state stored inside Rocket managed state.
///
/// The analyzer is constructed once at process start and injected here; it
/// is shared read-only for the process lifetime.
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    pub analyzer: Arc<NewsAnalyzer>,
    /// Last submission and its analysis. An identical resubmission (e.g. a
    /// page re-render) is served from here without re-invoking any model.
    last: Mutex<Option<CachedAnalysis>>,
}

struct CachedAnalysis {
    headline: String,
    content: Option<String>,
    analysis: Analysis,
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    models: ModelIds,
}

#[derive(Serialize)]
struct ModelIds {
    category: String,
    fake: String,
    clickbait: String,
    ner: String,
}

/// Request body for an analysis submission.
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub headline: String,
    pub content: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: Status, message: impl Into<String>) -> Custom<Json<ErrorBody>> {
    Custom(status, Json(ErrorBody { error: message.into() }))
}

/// Redirect root to static index.html
#[get("/")]
async fn index_redirect() -> Redirect {
    Redirect::to("/static/index.html")
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Status endpoint returning simple JSON with uptime and the configured
/// model identifiers.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let now = Utc::now();
    let uptime = (now - state.started_at).num_seconds();
    let models = &state.config.models;

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        models: ModelIds {
            category: models.category.id.clone(),
            fake: models.fake.id.clone(),
            clickbait: models.clickbait.id.clone(),
            ner: models.ner.id.clone(),
        },
    })
}

/// Run the four models over one submission and return the rendered view.
///
/// An empty headline is rejected before any model is invoked. Empty content
/// proceeds with a degraded-input warning. A failure in any sub-analysis
/// fails the whole request; there is no partial-result mode.
#[post("/api/v1/analyze", data = "<body>")]
async fn analyze(
    state: &State<AppState>,
    body: Json<AnalyzeRequest>,
) -> Result<Json<ReportView>, Custom<Json<ErrorBody>>> {
    if body.headline.trim().is_empty() {
        return Err(error_response(
            Status::BadRequest,
            "Please provide a headline.",
        ));
    }
    // Trimming is only for the emptiness decisions; the models and the
    // rendered views see the text exactly as submitted. Whitespace-only
    // content is treated as absent throughout.
    let headline = body.headline.as_str();
    let content = body
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty());

    // The cache lock is held only around lookup and store, never across
    // inference, so concurrent submissions do not serialize behind it.
    let cached = {
        let last = state.last.lock().await;
        match &*last {
            Some(entry) if entry.headline == headline && entry.content.as_deref() == content => {
                Some(entry.analysis.clone())
            }
            _ => None,
        }
    };

    let analysis = match cached {
        Some(analysis) => {
            tracing::debug!(headline, "serving analysis from last-result cache");
            analysis
        }
        None => {
            let analysis = state
                .analyzer
                .analyze(headline, content)
                .await
                .map_err(|e| {
                    tracing::error!("analysis failed: {:#}", e);
                    error_response(Status::BadGateway, "Analysis failed.")
                })?;
            let mut last = state.last.lock().await;
            *last = Some(CachedAnalysis {
                headline: headline.to_string(),
                content: content.map(str::to_string),
                analysis: analysis.clone(),
            });
            analysis
        }
    };

    let view = build_report(headline, content, &analysis).map_err(|e| {
        tracing::error!("rendering failed: {}", e);
        error_response(Status::InternalServerError, "Rendering failed.")
    })?;
    Ok(Json(view))
}

/// Build the Rocket instance with managed state and mounted routes.
/// Split out from [`launch_rocket`] so tests can drive it with a local
/// client.
pub fn build_rocket(analyzer: Arc<NewsAnalyzer>, config: Arc<Config>) -> rocket::Rocket<rocket::Build> {
    let state = AppState {
        started_at: Utc::now(),
        config: config.clone(),
        analyzer,
        last: Mutex::new(None),
    };

    // Apply [server] bind/port from the application config if present.
    let mut fig = rocket::Config::figment();
    if let Some(ref server) = config.server {
        if let Some(ref bind) = server.bind {
            fig = fig.merge(("address", bind.clone()));
        }
        if let Some(port) = server.port {
            fig = fig.merge(("port", port));
        }
    }

    let rocket = rocket::custom(fig)
        .manage(state)
        .mount("/", routes![index_redirect, health, status, analyze]);

    // Static asset path depends on whether we run from the workspace root
    // or the crate directory.
    let static_dir = ["newsprobe/static", "static"]
        .into_iter()
        .find(|dir| std::path::Path::new(dir).is_dir());
    match static_dir {
        Some(dir) => rocket.mount("/static", FileServer::from(dir)),
        None => {
            tracing::warn!("static asset directory not found; UI not mounted");
            rocket
        }
    }
}

/// Build and launch a Rocket server.
///
/// The analyzer and configuration are provided by the caller; this function
/// blocks until the Rocket server shuts down and returns an error if Rocket
/// fails to start.
pub async fn launch_rocket(analyzer: Arc<NewsAnalyzer>, config: Arc<Config>) -> Result<()> {
    tracing::info!("Starting Rocket HTTP server");
    build_rocket(analyzer, config)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
