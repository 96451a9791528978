use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::model::{
    Device, DeviceUpdate, HistoryEntry, NewDevice, NewStaffMember, NewWard, StaffMember, Ward,
};
use crate::server::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// ========== Devices ==========

pub async fn list_devices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Device>>, HandlerError> {
    let store = state.store.lock().await;
    let devices = store
        .list_devices()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(devices))
}

pub async fn add_device(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewDevice>,
) -> Result<Json<Device>, HandlerError> {
    let device = Device::from_payload(payload);

    let store = state.store.lock().await;
    store
        .insert_device(&device)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(device))
}

pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<DeviceUpdate>,
) -> Result<Json<SuccessResponse>, HandlerError> {
    let mut store = state.store.lock().await;
    store
        .update_device(&id, &payload)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HandlerError> {
    let store = state.store.lock().await;
    store
        .delete_device(&id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn device_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, HandlerError> {
    let store = state.store.lock().await;
    let history = store
        .device_history(&id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(history))
}

// ========== Staff ==========

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StaffMember>>, HandlerError> {
    let store = state.store.lock().await;
    let staff = store
        .list_staff()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(staff))
}

pub async fn add_staff(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewStaffMember>,
) -> Result<Json<StaffMember>, HandlerError> {
    let member = StaffMember::from_payload(payload);

    let store = state.store.lock().await;
    store
        .insert_staff(&member)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(member))
}

pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HandlerError> {
    let store = state.store.lock().await;
    store
        .delete_staff(&id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(SuccessResponse { success: true }))
}

// ========== Wards ==========

pub async fn list_wards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Ward>>, HandlerError> {
    let store = state.store.lock().await;
    let wards = store
        .list_wards()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(wards))
}

pub async fn add_ward(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWard>,
) -> Result<Json<Ward>, HandlerError> {
    let ward = Ward::from_payload(payload);

    let store = state.store.lock().await;
    store
        .insert_ward(&ward)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(ward))
}

pub async fn delete_ward(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HandlerError> {
    let store = state.store.lock().await;
    store
        .delete_ward(&id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;
    Ok(Json(SuccessResponse { success: true }))
}
