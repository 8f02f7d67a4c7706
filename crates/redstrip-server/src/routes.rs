/*!
 * HTTP routing and request handlers.
 *
 * Each device-backed handler follows the same discipline: resolve the
 * addressed resource structurally, refresh the device exactly once through
 * the gateway, then build the document (or dispatch the action) from that
 * single snapshot. Static resources never touch the gateway and stay
 * available while the device is unreachable.
 */
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::debug;

use redstrip_device::DeviceGateway;

use crate::actions;
use crate::documents;
use crate::error::ApiError;
use crate::resource::{parse_outlet_index, resolve_chassis, OutletAction};

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// The one serialized gateway to the physical device
    pub gateway: Arc<DeviceGateway>,
}

/// Build the Redfish resource-tree router
pub fn router(gateway: Arc<DeviceGateway>) -> Router {
    Router::new()
        .route("/redfish", get(get_redfish_version))
        .route("/redfish/v1/", get(get_service_root))
        .route("/redfish/v1/$metadata", get(get_metadata))
        .route("/redfish/v1/Chassis", get(get_chassis_collection))
        .route("/redfish/v1/Chassis/:chassis_id", get(get_chassis))
        .route(
            "/redfish/v1/Chassis/:chassis_id/Outlets",
            get(get_outlet_collection),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/Outlets/:index",
            get(get_outlet),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/Outlets/:index/Actions/:action",
            post(post_outlet_action),
        )
        .route("/redfish/v1/Chassis/:chassis_id/Power", get(get_power))
        .route(
            "/redfish/v1/Chassis/:chassis_id/PowerSubsystem",
            get(get_power_subsystem),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/PowerSubsystem/PowerSupplies",
            get(get_power_supplies),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/PowerSubsystem/PowerSupplies/0",
            get(get_power_supply),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/PowerSubsystem/OutletGroups",
            get(get_outlet_groups),
        )
        .route(
            "/redfish/v1/Chassis/:chassis_id/PowerSubsystem/OutletGroups/All",
            get(get_outlet_group),
        )
        .route("/redfish/v1/Systems", get(get_systems))
        .route("/redfish/v1/Managers", get(get_managers))
        .route("/redfish/v1/Managers/BMC", get(get_manager))
        .route("/redfish/v1/SessionService", get(get_session_service))
        .route("/redfish/v1/SessionService/Sessions", get(get_sessions))
        .fallback(fallback)
        .with_state(AppState { gateway })
}

async fn get_redfish_version() -> Json<Value> {
    Json(documents::redfish_version())
}

async fn get_service_root() -> Json<Value> {
    Json(documents::service_root())
}

async fn get_metadata() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        documents::METADATA_XML,
    )
}

async fn get_chassis_collection() -> Json<Value> {
    Json(documents::chassis_collection())
}

async fn get_chassis(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let snapshot = state.gateway.refresh().await?;
    Ok(Json(documents::chassis(&snapshot)))
}

async fn get_outlet_collection(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let snapshot = state.gateway.refresh().await?;
    Ok(Json(documents::outlet_collection(&snapshot)))
}

async fn get_outlet(
    State(state): State<AppState>,
    Path((chassis_id, index)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let index = parse_outlet_index(&index)?;
    let snapshot = state.gateway.refresh().await?;
    let outlet = snapshot.outlet(index)?;
    Ok(Json(documents::outlet(outlet)))
}

async fn post_outlet_action(
    State(state): State<AppState>,
    Path((chassis_id, index, action)): Path<(String, String, String)>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let index = parse_outlet_index(&index)?;
    let action =
        OutletAction::from_name(&action).ok_or_else(|| ApiError::not_found("Action not found"))?;
    let body = body.as_ref().map(|Json(v)| v);
    let ack = actions::dispatch(&state.gateway, index, action, body).await?;
    Ok(Json(ack))
}

async fn get_power(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let snapshot = state.gateway.refresh().await?;
    Ok(Json(documents::power(&snapshot)))
}

async fn get_power_subsystem(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    state.gateway.refresh().await?;
    Ok(Json(documents::power_subsystem()))
}

async fn get_power_supplies(Path(chassis_id): Path<String>) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    Ok(Json(documents::power_supplies_collection()))
}

async fn get_power_supply(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let snapshot = state.gateway.refresh().await?;
    Ok(Json(documents::power_supply(&snapshot)))
}

async fn get_outlet_groups(Path(chassis_id): Path<String>) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    Ok(Json(documents::outlet_groups_collection()))
}

async fn get_outlet_group(
    State(state): State<AppState>,
    Path(chassis_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    resolve_chassis(&chassis_id)?;
    let snapshot = state.gateway.refresh().await?;
    Ok(Json(documents::outlet_group(&snapshot)))
}

async fn get_systems() -> Json<Value> {
    Json(documents::systems_collection())
}

async fn get_managers() -> Json<Value> {
    Json(documents::managers_collection())
}

async fn get_manager() -> Json<Value> {
    Json(documents::manager())
}

async fn get_session_service() -> Json<Value> {
    Json(documents::session_service())
}

async fn get_sessions() -> Json<Value> {
    Json(documents::sessions_collection())
}

async fn fallback(uri: axum::http::Uri) -> ApiError {
    debug!("No resource at {}", uri.path());
    ApiError::not_found("Resource not found")
}
