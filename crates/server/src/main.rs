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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shiftcall::EngineConfig;
use shiftcall_api::{
    ApiError, AssignmentInfo, AttendanceRequest, BulkCreateAssignmentsRequest,
    BulkCreateAssignmentsResponse, CheckOutResponse, CreateAssignmentRequest,
    CreateAssignmentResponse, GetPoolResponse, LifecycleManager, ListAssignmentsResponse,
    ListWorkedHoursResponse, LogNotifier, PoolInfo, RegisterPoolRequest, RegisterShiftRequest,
    RegisterShiftResponse, RegisterTaskRequest, RegisterTaskResponse, RemoveAssignmentResponse,
    ReservationInfo, ReserveRequest, UpdateAssignmentRequest,
};
use shiftcall_domain::PoolKind;
use shiftcall_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Shiftcall Server - HTTP server for volunteer shift assignment and attendance
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Maximum committed hours per volunteer per calendar day
    #[arg(long, env = "DAILY_HOURS_LIMIT", default_value_t = 12.0)]
    daily_hours_limit: f64,

    /// IANA timezone whose calendar days the hour limit applies to
    #[arg(long, env = "SHIFTCALL_TIMEZONE", default_value = "UTC")]
    timezone: String,
}

/// Source of the current instant.
type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex; every request holds it for
/// the duration of its store work.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Runs assignment commands with the configured rules.
    manager: LifecycleManager,
    /// Clock stamping check-ins, check-outs and reservations.
    clock: Clock,
}

impl AppState {
    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// `ok` when the store answers.
    status: String,
    /// Daily hour limit in effect.
    daily_hours_limit: f64,
    /// Timezone in effect.
    timezone: String,
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
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::LifecycleConflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
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

/// Handler for GET `/health` endpoint.
///
/// Reports the configuration in effect after checking that the store answers.
async fn handle_health(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HealthResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let check = persistence.verify_foreign_key_enforcement();
    drop(persistence);

    if let Err(err) = check {
        warn!(error = %err, "Health check failed");
        return Err(HttpError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: format!("Store unavailable: {err}"),
        });
    }

    let config: &EngineConfig = app_state.manager.config();
    Ok(Json(HealthResponse {
        status: String::from("ok"),
        daily_hours_limit: config.daily_hours_limit.hours(),
        timezone: config.timezone.name().to_string(),
    }))
}

// ============================================================================
// Reference data
// ============================================================================

/// Handler for POST `/shifts` endpoint.
async fn handle_register_shift(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterShiftRequest>,
) -> Result<Json<RegisterShiftResponse>, HttpError> {
    info!(
        organization_id = req.organization_id,
        event_id = req.event_id,
        "Handling register_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::register_shift(&mut persistence, &req)?;
    drop(persistence);

    info!(shift_id = response.shift_id, "Registered shift");
    Ok(Json(response))
}

/// Handler for POST `/tasks` endpoint.
async fn handle_register_task(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterTaskRequest>,
) -> Result<Json<RegisterTaskResponse>, HttpError> {
    info!(shift_id = req.shift_id, "Handling register_task request");

    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::register_task(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/shifts/{shift_id}/assignments` endpoint.
async fn handle_list_shift_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(shift_id): Path<i64>,
) -> Result<Json<ListAssignmentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::list_assignments_for_shift(&mut persistence, shift_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Assignments
// ============================================================================

/// Handler for POST `/assignments` endpoint.
///
/// Assigns one volunteer to a shift.
async fn handle_create_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<Json<CreateAssignmentResponse>, HttpError> {
    info!(
        shift_id = req.shift_id,
        volunteer_id = req.volunteer_id,
        task_id = req.task_id,
        "Handling create_assignment request"
    );

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let pending = app_state
        .manager
        .create_assignment_pending(&mut persistence, &req, now)?;
    drop(persistence);
    let response = app_state.manager.deliver(pending);

    info!(
        assignment_id = response.assignment.assignment_id,
        "Created assignment"
    );
    Ok(Json(response))
}

/// Handler for POST `/assignments/bulk` endpoint.
///
/// Always succeeds at the HTTP level; refusals are reported per volunteer.
async fn handle_bulk_create_assignments(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkCreateAssignmentsRequest>,
) -> Json<BulkCreateAssignmentsResponse> {
    info!(
        shift_id = req.shift_id,
        count = req.volunteer_ids.len(),
        "Handling bulk_create_assignments request"
    );

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let pending = app_state
        .manager
        .bulk_create_assignments_pending(&mut persistence, &req, now);
    drop(persistence);
    let response = app_state.manager.deliver(pending);

    Json(response)
}

/// Handler for GET `/assignments/{assignment_id}` endpoint.
async fn handle_get_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::get_assignment(&mut persistence, assignment_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/assignments/{assignment_id}` endpoint.
///
/// Applies a staff correction.
async fn handle_update_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    info!(assignment_id, "Handling update_assignment request");

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = app_state
        .manager
        .update_assignment(&mut persistence, assignment_id, req, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/assignments/{assignment_id}` endpoint.
async fn handle_remove_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<RemoveAssignmentResponse>, HttpError> {
    info!(assignment_id, "Handling remove_assignment request");

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = app_state
        .manager
        .remove_assignment(&mut persistence, assignment_id, now)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Attendance
// ============================================================================

/// Handler for POST `/attendance/check_in` endpoint.
async fn handle_check_in(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    info!(
        shift_id = req.shift_id,
        volunteer_id = req.volunteer_id,
        "Handling check_in request"
    );

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = app_state.manager.check_in(&mut persistence, req, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/attendance/check_out` endpoint.
///
/// Completes the assignment and logs the worked hours in one transaction.
async fn handle_check_out(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<CheckOutResponse>, HttpError> {
    info!(
        shift_id = req.shift_id,
        volunteer_id = req.volunteer_id,
        "Handling check_out request"
    );

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = app_state.manager.check_out(&mut persistence, req, now)?;
    drop(persistence);

    info!(
        assignment_id = response.assignment.assignment_id,
        hours = response.hours_record.hours,
        "Checked out"
    );
    Ok(Json(response))
}

/// Handler for GET `/volunteers/{volunteer_id}/hours` endpoint.
async fn handle_list_worked_hours(
    AxumState(app_state): AxumState<AppState>,
    Path(volunteer_id): Path<i64>,
) -> Result<Json<ListWorkedHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::list_worked_hours(&mut persistence, volunteer_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Capacity pools
// ============================================================================

/// Handler for POST `/pools` endpoint.
async fn handle_register_pool(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterPoolRequest>,
) -> Result<Json<PoolInfo>, HttpError> {
    info!(
        kind = %req.kind,
        resource_id = req.resource_id,
        total = req.total,
        "Handling register_pool request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::register_pool(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/pools/{kind}/{resource_id}` endpoint.
async fn handle_get_pool(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, resource_id)): Path<(PoolKind, i64)>,
) -> Result<Json<GetPoolResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::get_pool(&mut persistence, kind, resource_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reservations` endpoint.
async fn handle_reserve(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReserveRequest>,
) -> Result<Json<ReservationInfo>, HttpError> {
    info!(
        kind = %req.kind,
        resource_id = req.resource_id,
        holder_id = req.holder_id,
        quantity = req.quantity,
        "Handling reserve request"
    );

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::reserve(&mut persistence, &req, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reservations/{reservation_id}/release` endpoint.
async fn handle_release(
    AxumState(app_state): AxumState<AppState>,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationInfo>, HttpError> {
    info!(reservation_id, "Handling release request");

    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response = shiftcall_api::release(&mut persistence, reservation_id, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/shifts", post(handle_register_shift))
        .route(
            "/shifts/{shift_id}/assignments",
            get(handle_list_shift_assignments),
        )
        .route("/tasks", post(handle_register_task))
        .route("/assignments", post(handle_create_assignment))
        .route("/assignments/bulk", post(handle_bulk_create_assignments))
        .route(
            "/assignments/{assignment_id}",
            get(handle_get_assignment)
                .patch(handle_update_assignment)
                .delete(handle_remove_assignment),
        )
        .route("/attendance/check_in", post(handle_check_in))
        .route("/attendance/check_out", post(handle_check_out))
        .route(
            "/volunteers/{volunteer_id}/hours",
            get(handle_list_worked_hours),
        )
        .route("/pools", post(handle_register_pool))
        .route("/pools/{kind}/{resource_id}", get(handle_get_pool))
        .route("/reservations", post(handle_reserve))
        .route(
            "/reservations/{reservation_id}/release",
            post(handle_release),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shiftcall Server");

    let config: EngineConfig = EngineConfig::from_settings(args.daily_hours_limit, &args.timezone)?;
    info!(
        daily_hours_limit = config.daily_hours_limit.hours(),
        timezone = config.timezone.name(),
        "Engine configured"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        manager: LifecycleManager::new(config, Arc::new(LogNotifier)),
        clock: Arc::new(Utc::now),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use shiftcall_api::{Notification, Notifier, NotifyError};
    use tower::ServiceExt;

    const ORGANIZATION_ID: i64 = 12;

    /// Test clock that handlers read through `AppState::clock`.
    #[derive(Clone)]
    struct TestClock(Arc<std::sync::Mutex<DateTime<Utc>>>);

    impl TestClock {
        fn set(&self, now: DateTime<Utc>) {
            *self.0.lock().unwrap() = now;
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 9, hour, minute, 0).unwrap()
    }

    /// Records whether the store was locked while each notification went out.
    struct LockObservingNotifier {
        persistence: Arc<Mutex<Persistence>>,
        store_was_free: std::sync::Mutex<Vec<bool>>,
    }

    impl Notifier for LockObservingNotifier {
        fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
            let free: bool = self.persistence.try_lock().is_ok();
            self.store_was_free.lock().unwrap().push(free);
            Ok(())
        }
    }

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app() -> (Router, TestClock) {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        create_test_app_with(Arc::new(Mutex::new(persistence)), Arc::new(LogNotifier))
    }

    fn create_test_app_with(
        persistence: Arc<Mutex<Persistence>>,
        notifier: Arc<dyn Notifier>,
    ) -> (Router, TestClock) {
        let clock: TestClock = TestClock(Arc::new(std::sync::Mutex::new(at(8, 0))));
        let reader: TestClock = clock.clone();
        let app_state: AppState = AppState {
            persistence,
            manager: LifecycleManager::new(EngineConfig::default(), notifier),
            clock: Arc::new(move || *reader.0.lock().unwrap()),
        };
        (build_router(app_state), clock)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status: StatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_shift(app: &Router, start: u32, end: u32) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/shifts",
            Some(json!({
                "organization_id": ORGANIZATION_ID,
                "starts_at": at(start, 0),
                "ends_at": at(end, 0),
                "capacity": 4,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["shift_id"].as_i64().unwrap()
    }

    async fn assign(app: &Router, shift_id: i64, volunteer_id: i64) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/assignments",
            Some(json!({ "shift_id": shift_id, "volunteer_id": volunteer_id })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let (app, _clock) = create_test_app();

        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, HttpStatusCode::OK);
        let health: HealthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(health.status, "ok");
        assert!((health.daily_hours_limit - 12.0).abs() < f64::EPSILON);
        assert_eq!(health.timezone, "UTC");
    }

    #[tokio::test]
    async fn test_attendance_flow_logs_worked_hours() {
        let (app, clock) = create_test_app();
        let shift_id = register_shift(&app, 9, 17).await;

        let (status, body) = assign(&app, shift_id, 300).await;
        assert_eq!(status, HttpStatusCode::OK);
        let created: CreateAssignmentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(created.assignment.state, "assigned");

        clock.set(at(9, 0));
        let attendance = json!({ "shift_id": shift_id, "volunteer_id": 300 });
        let (status, body) =
            send(&app, "POST", "/attendance/check_in", Some(attendance.clone())).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["state"], "in-progress");

        clock.set(at(13, 30));
        let (status, body) = send(&app, "POST", "/attendance/check_out", Some(attendance)).await;
        assert_eq!(status, HttpStatusCode::OK);
        let checked_out: CheckOutResponse = serde_json::from_value(body).unwrap();
        assert_eq!(checked_out.assignment.state, "completed");
        assert!((checked_out.hours_record.hours - 4.5).abs() < f64::EPSILON);
        assert_eq!(checked_out.hours_record.status, "pending");

        let (status, body) = send(&app, "GET", "/volunteers/300/hours", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let hours: ListWorkedHoursResponse = serde_json::from_value(body).unwrap();
        assert_eq!(hours.records.len(), 1);
        assert_eq!(hours.records[0].shift_id, shift_id);
    }

    #[tokio::test]
    async fn test_notifications_go_out_after_the_store_is_released() {
        let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(
            Persistence::new_in_memory().expect("Failed to create in-memory persistence"),
        ));
        let notifier = Arc::new(LockObservingNotifier {
            persistence: Arc::clone(&persistence),
            store_was_free: std::sync::Mutex::new(Vec::new()),
        });
        let (app, _clock) = create_test_app_with(persistence, notifier.clone());
        let shift_id = register_shift(&app, 9, 12).await;

        let (status, _) = assign(&app, shift_id, 310).await;
        assert_eq!(status, HttpStatusCode::OK);
        let (status, _) = send(
            &app,
            "POST",
            "/assignments/bulk",
            Some(json!({ "shift_id": shift_id, "volunteer_ids": [311, 312] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        assert_eq!(*notifier.store_was_free.lock().unwrap(), vec![true, true, true]);
    }

    #[tokio::test]
    async fn test_overlapping_assignment_is_unprocessable() {
        let (app, _clock) = create_test_app();
        let morning = register_shift(&app, 9, 13).await;
        let midday = register_shift(&app, 12, 14).await;

        let (status, _) = assign(&app, morning, 301).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = assign(&app, midday, 301).await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_value(body).unwrap();
        assert!(error.error);
    }

    #[tokio::test]
    async fn test_assignment_to_unknown_shift_is_not_found() {
        let (app, _clock) = create_test_app();

        let (status, _) = assign(&app, 999, 302).await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_second_check_in_conflicts() {
        let (app, clock) = create_test_app();
        let shift_id = register_shift(&app, 9, 12).await;
        assign(&app, shift_id, 303).await;
        let attendance = json!({ "shift_id": shift_id, "volunteer_id": 303 });

        clock.set(at(9, 0));
        let (status, _) =
            send(&app, "POST", "/attendance/check_in", Some(attendance.clone())).await;
        assert_eq!(status, HttpStatusCode::OK);

        clock.set(at(9, 5));
        let (status, _) = send(&app, "POST", "/attendance/check_in", Some(attendance)).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bulk_create_reports_each_volunteer() {
        let (app, _clock) = create_test_app();
        let shift_id = register_shift(&app, 9, 12).await;
        assign(&app, shift_id, 305).await;

        let (status, body) = send(
            &app,
            "POST",
            "/assignments/bulk",
            Some(json!({ "shift_id": shift_id, "volunteer_ids": [304, 305, 306] })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        let bulk: BulkCreateAssignmentsResponse = serde_json::from_value(body).unwrap();
        let created: Vec<i64> = bulk.created.iter().map(|a| a.volunteer_id).collect();
        assert_eq!(created, vec![304, 306]);
        assert_eq!(bulk.errors.len(), 1);
        assert_eq!(bulk.errors[0].volunteer_id, 305);

        let uri = format!("/shifts/{shift_id}/assignments");
        let (_, body) = send(&app, "GET", &uri, None).await;
        let listed: ListAssignmentsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.assignments.len(), 3);
    }

    #[tokio::test]
    async fn test_pool_exhaustion_and_release() {
        let (app, _clock) = create_test_app();
        let (status, _) = send(
            &app,
            "POST",
            "/pools",
            Some(json!({ "kind": "opportunity_acceptance", "resource_id": 8, "total": 2 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let reserve = |holder_id: i64, quantity: u32| {
            json!({
                "kind": "opportunity_acceptance",
                "resource_id": 8,
                "holder_id": holder_id,
                "quantity": quantity,
            })
        };

        let (status, body) = send(&app, "POST", "/reservations", Some(reserve(51, 2))).await;
        assert_eq!(status, HttpStatusCode::OK);
        let reservation: ReservationInfo = serde_json::from_value(body).unwrap();

        let (status, _) = send(&app, "POST", "/reservations", Some(reserve(52, 1))).await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(&app, "GET", "/pools/opportunity_acceptance/8", None).await;
        let pool: GetPoolResponse = serde_json::from_value(body).unwrap();
        assert_eq!(pool.pool.available, 0);
        assert_eq!(pool.active_reservations.len(), 1);

        let uri = format!("/reservations/{}/release", reservation.reservation_id);
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);

        let (_, body) = send(&app, "GET", "/pools/opportunity_acceptance/8", None).await;
        let pool: GetPoolResponse = serde_json::from_value(body).unwrap();
        assert_eq!(pool.pool.available, 2);
        assert!(pool.active_reservations.is_empty());
    }

    #[tokio::test]
    async fn test_remove_assignment_deletes_it() {
        let (app, _clock) = create_test_app();
        let shift_id = register_shift(&app, 9, 12).await;
        let (_, body) = assign(&app, shift_id, 307).await;
        let created: CreateAssignmentResponse = serde_json::from_value(body).unwrap();
        let uri = format!("/assignments/{}", created.assignment.assignment_id);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_update_is_bad_request() {
        let (app, _clock) = create_test_app();
        let shift_id = register_shift(&app, 9, 12).await;
        let (_, body) = assign(&app, shift_id, 308).await;
        let created: CreateAssignmentResponse = serde_json::from_value(body).unwrap();
        let uri = format!("/assignments/{}", created.assignment.assignment_id);

        let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }
}
