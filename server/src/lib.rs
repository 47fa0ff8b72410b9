use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use talkindex_core::{
    ChannelFacet, Criteria, Engine, IndexedVideo, LoadOptions, SortKey, SpeakerFacet, TagFacet,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub admin_token: Option<String>,
}

/// Load the snapshot at startup and wire up the routes. `ADMIN_TOKEN` guards
/// the reload endpoint; `CORS_ALLOW_ORIGIN` (comma-separated) restricts
/// origins, defaulting to any.
pub fn build_app(snapshot_dir: String) -> Result<Router> {
    let engine = Engine::new(LoadOptions::from_snapshot(&snapshot_dir))?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState {
        engine: Arc::new(engine),
        admin_token,
    };

    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/videos", get(videos_handler))
        .route("/tags", get(tags_handler))
        .route("/speakers", get(speakers_handler))
        .route("/channels", get(channels_handler))
        .route("/reload", post(reload_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<IndexedVideo>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let sort = parse_sort(params.sort.as_deref())?;
    let results = state.engine.index().search_text(&params.q, sort);
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

/// Structured query. Multi-valued axes take comma-separated lists; the
/// criteria's own priority chain decides which predicate applies.
#[derive(Deserialize)]
pub struct VideosParams {
    pub q: Option<String>,
    pub channel: Option<String>,
    pub speaker: Option<String>,
    pub id: Option<String>,
    pub exclude: Option<String>,
    pub sort: Option<String>,
}

pub async fn videos_handler(
    State(state): State<AppState>,
    Query(params): Query<VideosParams>,
) -> Result<Json<Vec<IndexedVideo>>, (StatusCode, String)> {
    let sort = parse_sort(params.sort.as_deref())?;

    let mut criteria = Criteria::new();
    if let Some(q) = &params.q {
        criteria = criteria.limit_fts(q);
    }
    if let Some(titles) = csv(params.channel.as_deref()) {
        criteria = criteria.limit_channels(titles);
    }
    if let Some(handles) = csv(params.speaker.as_deref()) {
        criteria = criteria.limit_speakers(handles);
    }
    if let Some(ids) = csv(params.id.as_deref()) {
        criteria = criteria.limit_ids(ids);
    }
    if let Some(ids) = csv(params.exclude.as_deref()) {
        criteria = criteria.exclude_ids(ids);
    }

    Ok(Json(state.engine.index().search(&criteria, sort)))
}

pub async fn tags_handler(State(state): State<AppState>) -> Json<Vec<TagFacet>> {
    Json(state.engine.index().list_tags())
}

pub async fn speakers_handler(State(state): State<AppState>) -> Json<Vec<SpeakerFacet>> {
    Json(state.engine.index().list_speakers())
}

pub async fn channels_handler(State(state): State<AppState>) -> Json<Vec<ChannelFacet>> {
    Json(state.engine.index().list_channels())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadRequest {
    pub data_dir: String,
    #[serde(default)]
    pub serialized: bool,
}

/// Rebuild from the named source and swap the index in. On failure the
/// previous index keeps serving and the error text comes back as a 400.
pub async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ReloadRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let options = if req.serialized {
        LoadOptions::from_snapshot(&req.data_dir)
    } else {
        LoadOptions::from_dir(&req.data_dir)
    };
    state
        .engine
        .reload(options)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(serde_json::json!({
        "num_docs": state.engine.index().len()
    })))
}

fn parse_sort(sort: Option<&str>) -> Result<SortKey, (StatusCode, String)> {
    match sort {
        None => Ok(SortKey::default()),
        Some(s) => s
            .parse::<SortKey>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string())),
    }
}

fn csv(raw: Option<&str>) -> Option<Vec<String>> {
    let list: Vec<String> = raw?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers
        .get("X-ADMIN-TOKEN")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
