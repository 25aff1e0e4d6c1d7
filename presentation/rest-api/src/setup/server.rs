use poem::{EndpointExt, Route, Server as PoemServer, listener::TcpListener, middleware::Tracing};
use poem_openapi::OpenApiService;

use crate::{config::app_config::AppConfig, setup::dependency_injection::DependencyContainer};

pub struct Server;

impl Server {
    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.listen;
        let public_url = config.public_url;
        let api_service = OpenApiService::new(
            (
                container.health_api,
                container.order_api,
                container.product_api,
            ),
            "Storefront Orders API",
            env!("CARGO_PKG_VERSION"),
        )
        .server(public_url.as_str());
        let ui = api_service.swagger_ui();
        let spec = api_service.spec_endpoint();
        let app = Route::new()
            .nest("/", api_service)
            .nest("/docs", ui)
            .nest("/openapi.json", spec)
            .with(config.cors)
            .data(config.firebase)
            .with(Tracing);
        tracing::info!("Server listening on {addr}");
        tracing::info!("Swagger UI at {public_url}/docs");
        tracing::info!("OpenAPI JSON at {public_url}/openapi.json");
        PoemServer::new(TcpListener::bind(addr)).run(app).await?;
        Ok(())
    }
}
