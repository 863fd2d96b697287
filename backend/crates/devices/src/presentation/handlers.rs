//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;
use uuid::Uuid;

use accounts::{AuthSubject, ProvisionUserUseCase, UserRepository};

use crate::application::{GetDeviceUseCase, ListDevicesUseCase, UpdateDeviceStatusUseCase};
use crate::domain::repository::DeviceRepository;
use crate::error::DeviceResult;
use crate::presentation::dto::{
    DeviceResponse, ListQuery, ListResponse, UpdateStatusRequest, UpdateStatusResponse,
};

/// Shared state for device handlers
#[derive(Clone)]
pub struct DevicesAppState<D, U>
where
    D: DeviceRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub devices: Arc<D>,
    pub users: Arc<U>,
}

/// GET /api/devices
pub async fn list_devices<D, U>(
    State(state): State<DevicesAppState<D, U>>,
    auth: AuthSubject,
    Query(query): Query<ListQuery>,
) -> DeviceResult<Json<ListResponse>>
where
    D: DeviceRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let page = ListDevicesUseCase::new(state.devices.clone())
        .execute(*user.user_id.as_uuid(), query.page, query.limit)
        .await?;

    Ok(Json(ListResponse::from(page)))
}

/// GET /api/devices/{device_id}
pub async fn get_device<D, U>(
    State(state): State<DevicesAppState<D, U>>,
    auth: AuthSubject,
    Path(device_id): Path<Uuid>,
) -> DeviceResult<Json<DeviceResponse>>
where
    D: DeviceRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let device = GetDeviceUseCase::new(state.devices.clone())
        .execute(*user.user_id.as_uuid(), device_id)
        .await?;

    Ok(Json(DeviceResponse::from(device)))
}

/// PUT /api/devices/{device_id}/status
pub async fn update_status<D, U>(
    State(state): State<DevicesAppState<D, U>>,
    auth: AuthSubject,
    Path(device_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> DeviceResult<Json<UpdateStatusResponse>>
where
    D: DeviceRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let updated = UpdateDeviceStatusUseCase::new(state.devices.clone())
        .execute(*user.user_id.as_uuid(), device_id, &req.status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        message: "Status updated".to_string(),
        asic: DeviceResponse::from(updated),
    }))
}
