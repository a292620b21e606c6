// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use brew_roster_api::{
    ApiError, AssignShopAdminRequest, AssignShopAdminResponse, AssignWorkerRequest,
    CellEditRequest, CellEditResponse, CreateFirstAdminRequest, CreateFirstAdminResponse,
    CreateShopRequest, FireWorkerRequest, GridRequest, GridResponse, ListShiftRequestsResponse,
    ListShopsResponse, ListWorkersResponse, LoginRequest, LoginResponse, OfferShiftRequest,
    RegisterVacationRequest, RegisterWorkerRequest, RosterSettings, SelfRegisterRequest,
    ShiftRequestInfo, ShopInfo, UpdateShopRequest, WhoAmIResponse, WorkerInfo, apply_cell_edit,
    approve_shift_request, assign_shop_admin, assign_worker_to_shop, build_grid,
    cancel_shift_request, create_first_admin, create_shop, delete_shop, fire_worker,
    get_shop_by_slug, get_worker, list_my_shift_requests, list_shift_requests, list_shops,
    list_unassigned_workers, list_workers, login, logout, offer_shift, register_vacation,
    register_worker, reject_shift_request, self_register, take_shift, update_shop, whoami,
};
use brew_roster_domain::{CellParser, parse_timezone};
use brew_roster_persistence::{ContactCipher, Persistence, PersistenceError};
use chrono_tz::Tz;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionActor;

/// Brew Roster Server - HTTP server for coffee-shop shift scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "BREW_ROSTER_DATABASE", conflicts_with = "mysql_url")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL, used instead of `SQLite` when set.
    #[arg(long, env = "BREW_ROSTER_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone that decides which calendar day "today" is.
    #[arg(long, env = "BREW_ROSTER_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// 64 hex characters used to encrypt worker contact details.
    #[arg(long, env = "BREW_ROSTER_CONTACT_KEY", hide_env_values = true)]
    contact_key: Option<String>,

    /// A cell value meaning "day off". Repeat to add several; replaces the defaults.
    #[arg(long = "off-word", value_name = "WORD")]
    off_words: Vec<String>,
}

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("storage initialization failed: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers.
///
/// Storage sits behind one async mutex; every request runs its handler
/// against the connection while holding it.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Business timezone and cell parser.
    settings: Arc<RosterSettings>,
}

impl AppState {
    fn new(persistence: Persistence, settings: RosterSettings) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            settings: Arc::new(settings),
        }
    }
}

/// Query parameters for the grid endpoint.
#[derive(Debug, Deserialize)]
struct GridQuery {
    /// Calendar year.
    year: i32,
    /// Month number, 1-12.
    month: u8,
}

/// Query parameters for listing a shop's requests.
#[derive(Debug, Deserialize)]
struct RequestStatusQuery {
    /// Lowercase status filter.
    status: Option<String>,
}

/// Cell edit body; the shop comes from the path.
#[derive(Debug, Deserialize, Serialize)]
struct CellEditBody {
    worker_id: i64,
    date: String,
    value: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidOperation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ParseError { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ========================================================================
// Authentication
// ========================================================================

/// Handler for POST `/auth/bootstrap`.
///
/// Creates the first super admin on an empty system.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstAdminRequest>,
) -> Result<Json<CreateFirstAdminResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling bootstrap request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateFirstAdminResponse =
        create_first_admin(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, token): SessionActor,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    info!(identity_id = actor.identity_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/me`.
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionActor(actor, _): SessionActor) -> Json<WhoAmIResponse> {
    Json(whoami(&actor))
}

/// Handler for POST `/auth/register`.
///
/// Self-service signup; the new worker has no home shop yet.
async fn handle_self_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SelfRegisterRequest>,
) -> Result<(StatusCode, Json<WorkerInfo>), HttpError> {
    info!(login_name = %req.login_name, "Handling self-registration");

    let mut persistence = app_state.persistence.lock().await;
    let worker: WorkerInfo = self_register(
        &mut persistence,
        &app_state.settings,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(worker)))
}

// ========================================================================
// Shops
// ========================================================================

async fn handle_list_shops(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, _): SessionActor,
) -> Result<Json<ListShopsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_shops(&mut persistence)?))
}

async fn handle_create_shop(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<ShopInfo>), HttpError> {
    info!(
        identity_id = actor.identity_id,
        name = %req.name,
        short_code = %req.short_code,
        "Handling create_shop request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let shop: ShopInfo = create_shop(&mut persistence, &app_state.settings, &actor, &req)?;
    Ok((StatusCode::CREATED, Json(shop)))
}

async fn handle_get_shop_by_slug(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, _): SessionActor,
    Path(slug): Path<String>,
) -> Result<Json<ShopInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_shop_by_slug(&mut persistence, &slug)?))
}

async fn handle_update_shop(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
    Json(req): Json<UpdateShopRequest>,
) -> Result<Json<ShopInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_shop(
        &mut persistence,
        &app_state.settings,
        &actor,
        shop_id,
        &req,
    )?))
}

async fn handle_delete_shop(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_shop(&mut persistence, &actor, shop_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ========================================================================
// Grid & cell edits
// ========================================================================

/// Handler for GET `/shops/{shop_id}/grid?year=&month=`.
async fn handle_get_grid(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
    Query(query): Query<GridQuery>,
) -> Result<Json<GridResponse>, HttpError> {
    let request: GridRequest = GridRequest {
        shop_id,
        year: query.year,
        month: query.month,
    };

    let mut persistence = app_state.persistence.lock().await;
    let grid: GridResponse = build_grid(
        &mut persistence,
        &app_state.settings,
        &actor,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(grid))
}

/// Handler for POST `/shops/{shop_id}/cells`.
async fn handle_cell_edit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
    Json(body): Json<CellEditBody>,
) -> Result<Json<CellEditResponse>, HttpError> {
    let request: CellEditRequest = CellEditRequest {
        worker_id: body.worker_id,
        shop_id,
        date: body.date,
        value: body.value,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CellEditResponse =
        apply_cell_edit(&mut persistence, &app_state.settings, &actor, &request)?;
    Ok(Json(response))
}

// ========================================================================
// Workers & shop admins
// ========================================================================

async fn handle_list_workers(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
) -> Result<Json<ListWorkersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListWorkersResponse = list_workers(
        &mut persistence,
        &app_state.settings,
        &actor,
        shop_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

async fn handle_list_unassigned_workers(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<ListWorkersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListWorkersResponse = list_unassigned_workers(
        &mut persistence,
        &app_state.settings,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

async fn handle_register_worker(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<RegisterWorkerRequest>,
) -> Result<(StatusCode, Json<WorkerInfo>), HttpError> {
    info!(
        identity_id = actor.identity_id,
        shop_id = req.shop_id,
        login_name = %req.login_name,
        "Handling register_worker request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let worker: WorkerInfo = register_worker(
        &mut persistence,
        &app_state.settings,
        &actor,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(worker)))
}

async fn handle_get_worker(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(worker_id): Path<i64>,
) -> Result<Json<WorkerInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let worker: WorkerInfo = get_worker(
        &mut persistence,
        &app_state.settings,
        &actor,
        worker_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(worker))
}

async fn handle_assign_worker(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(worker_id): Path<i64>,
    Json(req): Json<AssignWorkerRequest>,
) -> Result<Json<WorkerInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(assign_worker_to_shop(
        &mut persistence,
        &actor,
        worker_id,
        &req,
    )?))
}

async fn handle_register_vacation(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(worker_id): Path<i64>,
    Json(req): Json<RegisterVacationRequest>,
) -> Result<Json<WorkerInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(register_vacation(
        &mut persistence,
        &actor,
        worker_id,
        &req,
    )?))
}

async fn handle_fire_worker(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(worker_id): Path<i64>,
    Json(req): Json<FireWorkerRequest>,
) -> Result<Json<WorkerInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fire_worker(&mut persistence, &actor, worker_id, &req)?))
}

async fn handle_assign_shop_admin(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<AssignShopAdminRequest>,
) -> Result<Json<AssignShopAdminResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(assign_shop_admin(&mut persistence, &actor, &req)?))
}

// ========================================================================
// Shift exchange
// ========================================================================

async fn handle_list_shop_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(shop_id): Path<i64>,
    Query(query): Query<RequestStatusQuery>,
) -> Result<Json<ListShiftRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListShiftRequestsResponse = list_shift_requests(
        &mut persistence,
        &actor,
        shop_id,
        query.status.as_deref(),
    )?;
    Ok(Json(response))
}

async fn handle_list_my_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<ListShiftRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_my_shift_requests(&mut persistence, &actor)?))
}

async fn handle_offer_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Json(req): Json<OfferShiftRequest>,
) -> Result<(StatusCode, Json<ShiftRequestInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let offered: ShiftRequestInfo =
        offer_shift(&mut persistence, &actor, &req, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(offered)))
}

async fn handle_take_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<ShiftRequestInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(take_shift(
        &mut persistence,
        &actor,
        request_id,
        OffsetDateTime::now_utc(),
    )?))
}

async fn handle_approve_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<ShiftRequestInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(approve_shift_request(
        &mut persistence,
        &actor,
        request_id,
        OffsetDateTime::now_utc(),
    )?))
}

async fn handle_reject_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<ShiftRequestInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(reject_shift_request(
        &mut persistence,
        &actor,
        request_id,
        OffsetDateTime::now_utc(),
    )?))
}

async fn handle_cancel_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<ShiftRequestInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cancel_shift_request(
        &mut persistence,
        &actor,
        request_id,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/auth/register", post(handle_self_register))
        .route("/shops", get(handle_list_shops).post(handle_create_shop))
        .route("/shops/by-slug/{slug}", get(handle_get_shop_by_slug))
        .route(
            "/shops/{shop_id}",
            put(handle_update_shop).delete(handle_delete_shop),
        )
        .route("/shops/{shop_id}/grid", get(handle_get_grid))
        .route("/shops/{shop_id}/cells", post(handle_cell_edit))
        .route("/shops/{shop_id}/workers", get(handle_list_workers))
        .route("/shops/{shop_id}/requests", get(handle_list_shop_requests))
        .route("/shop_admins", post(handle_assign_shop_admin))
        .route("/workers", post(handle_register_worker))
        .route("/workers/unassigned", get(handle_list_unassigned_workers))
        .route("/workers/{worker_id}", get(handle_get_worker))
        .route("/workers/{worker_id}/assign", post(handle_assign_worker))
        .route("/workers/{worker_id}/vacation", post(handle_register_vacation))
        .route("/workers/{worker_id}/fire", post(handle_fire_worker))
        .route("/requests", post(handle_offer_shift))
        .route("/requests/mine", get(handle_list_my_requests))
        .route("/requests/{request_id}/take", post(handle_take_shift))
        .route("/requests/{request_id}/approve", post(handle_approve_request))
        .route("/requests/{request_id}/reject", post(handle_reject_request))
        .route("/requests/{request_id}/cancel", post(handle_cancel_request))
        .with_state(app_state)
}

/// Opens the configured store and applies the contact key.
fn open_persistence(args: &Args) -> Result<Persistence, StartupError> {
    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let cipher: ContactCipher = if let Some(key) = &args.contact_key {
        ContactCipher::from_hex(key)?
    } else {
        warn!(
            "No contact key configured; using an ephemeral key. \
             Stored contact details will be unreadable after a restart."
        );
        ContactCipher::ephemeral()?
    };

    Ok(persistence.with_contact_cipher(cipher))
}

fn build_settings(args: &Args) -> Result<RosterSettings, StartupError> {
    let timezone: Tz =
        parse_timezone(&args.timezone).map_err(|e| StartupError::Config(e.to_string()))?;

    let settings: RosterSettings = if args.off_words.is_empty() {
        RosterSettings::new(timezone, CellParser::DEFAULT_OFF_WORDS)
    } else {
        RosterSettings::new(timezone, &args.off_words)
    };

    info!(
        timezone = %timezone,
        off_words = ?settings.cell_parser.off_words(),
        "Roster settings loaded"
    );
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Brew Roster Server");

    let settings: RosterSettings = build_settings(&args)?;
    let mut persistence: Persistence = open_persistence(&args)?;

    let purged: usize = persistence.delete_expired_sessions(OffsetDateTime::now_utc())?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let app: Router = build_router(AppState::new(persistence, settings));

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
