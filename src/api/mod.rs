use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::db::models::JoinOutcome;
use crate::db::Database;
use crate::league::{self, MatchRecord, User};
use crate::standings::{compute_standings, validate_match};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

type ApiError = (StatusCode, String);

fn internal(e: anyhow::Error) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Body of every mutating endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl ApiResponse {
    fn ok(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            user: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: Some(message.into()),
            user: None,
        }
    }

    fn with_user(user: User) -> Self {
        ApiResponse {
            success: true,
            message: None,
            user: Some(user),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeagueQuery {
    pub league: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinLeagueRequest {
    pub league: String,
    pub user: User,
}

/// A submitted score: the match plus the league it was played in
#[derive(Debug, Deserialize)]
pub struct AddScoreRequest {
    pub league: String,
    #[serde(flatten)]
    pub record: MatchRecord,
}

/// Build the Axum router for the league API.
pub fn router(state: AppState, permissive_cors: bool) -> Router {
    let router = Router::new()
        .route("/api/leagues", get(leagues_handler))
        .route("/api/league-members", get(league_members_handler))
        .route("/api/league-scores", get(league_scores_handler))
        .route("/api/add-score", post(add_score_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/login", post(login_handler))
        .route("/api/all-users", get(all_users_handler))
        .route("/api/join-league", post(join_league_handler))
        .route("/api/user-leagues", get(user_leagues_handler))
        .layer(TraceLayer::new_for_http());
    let router = if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(Arc::new(state))
}

/// GET /api/leagues
async fn leagues_handler() -> impl IntoResponse {
    Json(league::catalog())
}

/// GET /api/league-members?league=...
///
/// Ranked leaderboard rows for the league roster, recomputed from every stored match.
async fn league_members_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LeagueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let roster = state.db.league_roster(&q.league).map_err(internal)?;
    let matches = state.db.list_league_matches(&q.league).map_err(internal)?;
    let standings = compute_standings(&roster, &matches)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    debug!(
        "Standings for {}: {} members, {} matches",
        q.league,
        roster.len(),
        matches.len()
    );
    Ok(Json(standings.leaderboard()))
}

/// GET /api/league-scores?league=...
async fn league_scores_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LeagueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .list_league_matches(&q.league)
        .map(Json)
        .map_err(internal)
}

/// POST /api/add-score
async fn add_score_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddScoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.league.trim().is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failed("Missing league name")),
        ));
    }
    if let Err(e) = validate_match(&req.record) {
        return Ok((StatusCode::BAD_REQUEST, Json(ApiResponse::failed(e.to_string()))));
    }
    if let Some(sport) = league::sport_of(&req.league) {
        if sport != req.record.sport {
            warn!(
                "{} score submitted to {} league '{}'",
                req.record.sport.as_str(),
                sport.as_str(),
                req.league
            );
        }
    }

    let id = state
        .db
        .insert_match(&req.league, &req.record)
        .map_err(internal)?;
    info!(
        "Score {} saved for {}: {} vs {}",
        id, req.league, req.record.player1, req.record.player2
    );
    Ok((StatusCode::OK, Json(ApiResponse::ok("Score saved"))))
}

/// POST /api/signup
async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(user): Json<User>,
) -> Result<impl IntoResponse, ApiError> {
    if user.phone.trim().is_empty()
        || user.first_name.trim().is_empty()
        || user.last_name.trim().is_empty()
    {
        return Ok(Json(ApiResponse::failed("All fields are required")));
    }
    if !state.db.insert_user(&user).map_err(internal)? {
        return Ok(Json(ApiResponse::failed("User already exists")));
    }
    info!("New user signed up: {}", user.display_name());
    Ok(Json(ApiResponse::with_user(user)))
}

/// POST /api/login
async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = match state.db.find_user(&req.phone).map_err(internal)? {
        Some(user) => ApiResponse::with_user(user),
        None => ApiResponse::failed("User not found"),
    };
    Ok(Json(response))
}

/// GET /api/all-users
async fn all_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.list_users().map(Json).map_err(internal)
}

/// POST /api/join-league
async fn join_league_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinLeagueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.league.trim().is_empty() || req.user.phone.trim().is_empty() {
        return Ok(Json(ApiResponse::failed("Missing league or user info")));
    }
    let outcome = state
        .db
        .join_league(&req.league, &req.user)
        .map_err(internal)?;
    let message = match outcome {
        JoinOutcome::Added => {
            info!("{} joined {}", req.user.display_name(), req.league);
            "User added to league"
        }
        JoinOutcome::Updated => "User already in league, info updated",
    };
    Ok(Json(ApiResponse::ok(message)))
}

/// GET /api/user-leagues?phone=...
async fn user_leagues_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PhoneQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .list_user_leagues(&q.phone)
        .map(Json)
        .map_err(internal)
}
