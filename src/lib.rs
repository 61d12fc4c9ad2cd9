// Library exports for the binary, integration tests and external use

pub mod api;
pub mod app_data;
pub mod cli;
pub mod config;
pub mod coordinators;
pub mod errors;
pub mod providers;
pub mod stores;
pub mod types;

#[cfg(test)]
pub mod test {
    pub mod utils;
}

use std::sync::Arc;

use poem::endpoint::BoxEndpoint;
use poem::middleware::{NormalizePath, TrailingSlash};
use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

use crate::api::{AdminApi, AuthApi, HealthApi};
use crate::app_data::AppData;
use crate::coordinators::{AdminCoordinator, LoginCoordinator, UserCoordinator};

/// Compose the HTTP application
///
/// API under `/api`, Swagger UI under `/swagger`. `public_url` is the
/// externally reachable base URL advertised in the OpenAPI document.
/// Trailing and repeated slashes are normalised, so `/api/auth/login/` and
/// `/api/auth/login` reach the same endpoint.
pub fn build_app(app_data: Arc<AppData>, public_url: &str) -> BoxEndpoint<'static> {
    let login_coordinator = Arc::new(LoginCoordinator::new(app_data.clone()));
    let user_coordinator = Arc::new(UserCoordinator::new(app_data.clone()));
    let admin_coordinator = Arc::new(AdminCoordinator::new(app_data));

    let auth_api = AuthApi::new(login_coordinator.clone(), user_coordinator);
    let admin_api = AdminApi::new(login_coordinator, admin_coordinator);

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, admin_api),
        "MediXScan API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", public_url.trim_end_matches('/')));

    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(NormalizePath::new(TrailingSlash::Trim))
        .boxed()
}
