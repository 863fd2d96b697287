//! Devices Router

use axum::{
    Router,
    routing::{get, put},
};
use sqlx::PgPool;
use std::sync::Arc;

use accounts::{PgAccountRepository, UserRepository};

use crate::domain::repository::DeviceRepository;
use crate::infra::postgres::PgDeviceRepository;
use crate::presentation::handlers::{self, DevicesAppState};

/// Create the devices router with PostgreSQL repositories
pub fn devices_router(pool: PgPool) -> Router {
    devices_router_generic(
        PgDeviceRepository::new(pool.clone()),
        PgAccountRepository::new(pool),
    )
}

/// Create a generic devices router for any repository implementations
pub fn devices_router_generic<D, U>(devices: D, users: U) -> Router
where
    D: DeviceRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let state = DevicesAppState {
        devices: Arc::new(devices),
        users: Arc::new(users),
    };

    Router::new()
        .route("/", get(handlers::list_devices::<D, U>))
        .route("/{device_id}", get(handlers::get_device::<D, U>))
        .route("/{device_id}/status", put(handlers::update_status::<D, U>))
        .with_state(state)
}
