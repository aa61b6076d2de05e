use actix_web::{middleware::Logger, web, App, HttpServer};
use lease_lock_service::config::{BackendType, Config};
use lease_lock_service::{handlers, worker, LockClient};
use log::info;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    info!("Starting lease-lock-service with config: {:?}", config);

    let client = match config.backend_type {
        BackendType::Memory => {
            info!("Using memory backend");
            LockClient::memory()
        }
        BackendType::Redis => {
            info!("Using Redis backend");
            let redis_url = config.redis_url.as_ref().expect("Redis URL not configured");
            LockClient::redis(
                redis_url,
                config.redis_username.clone(),
                config.redis_password.clone(),
                config.redis_db,
            )
            .await
            .expect("Failed to connect to Redis")
        }
        BackendType::Postgres => {
            info!("Using Postgres backend");
            let database_url = config
                .database_url
                .as_ref()
                .expect("Database URL not configured");
            LockClient::postgres(database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to Postgres")
        }
    };

    // Redis expires keys itself; the other backends need the sweeper.
    if config.backend_type != BackendType::Redis {
        worker::spawn_expiry_sweeper(
            client.backend(),
            Duration::from_secs(config.sweep_interval_secs),
        );
    }
    worker::spawn_usage_sampler(
        client.backend(),
        Duration::from_secs(config.sample_interval_secs),
    );

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Server starting on http://{}", bind_addr);
    info!("Swagger UI available at http://{}/swagger-ui/", bind_addr);

    HttpServer::new(move || {
        let openapi = handlers::ApiDoc::openapi();

        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(client.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .route(
                "/api/lock/try-acquire",
                web::post().to(handlers::try_acquire_lock),
            )
            .route("/api/lock/acquire", web::post().to(handlers::acquire_lock))
            .route("/api/lock/release", web::post().to(handlers::release_lock))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
