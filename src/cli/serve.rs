use std::sync::Arc;

use poem::{Server, listener::TcpListener};

use crate::app_data::AppData;
use crate::config::BootstrapSettings;

/// Run the HTTP server until it is stopped
pub async fn run_server(app_data: Arc<AppData>, settings: &BootstrapSettings) -> Result<(), std::io::Error> {
    let app = crate::build_app(app_data, settings.public_url());

    tracing::info!("Starting server on http://{}", settings.bind_address());
    tracing::info!("Swagger UI available at {}/swagger", settings.public_url());
    tracing::info!("API endpoints available at {}/api", settings.public_url());

    Server::new(TcpListener::bind(settings.bind_address()))
        .run(app)
        .await
}
