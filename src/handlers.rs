use crate::client::LockClient;
use crate::error::LockError;
use crate::models::{
    AcquireOutcome, AcquireRequest, ApiResponse, ReleaseRequest, TryAcquireRequest,
};
use actix_web::{web, HttpResponse};
use log::{error, info};
use tokio::time::Duration;
use utoipa::OpenApi;

pub const CODE_ALREADY_HELD: i32 = 1001;
pub const CODE_WAIT_TIMEOUT: i32 = 1002;
pub const CODE_BACKEND_FAILURE: i32 = 1003;

#[derive(OpenApi)]
#[openapi(
    paths(
        try_acquire_lock,
        acquire_lock,
        release_lock
    ),
    components(
        schemas(
            TryAcquireRequest,
            AcquireRequest,
            ReleaseRequest,
            AcquireOutcome,
            ApiResponse<AcquireOutcome>,
            ApiResponse<serde_json::Value>,
        )
    ),
    tags(
        (name = "lock", description = "Lease-based distributed lock API")
    ),
    info(
        title = "lease-lock-service API",
        version = "0.1.0",
        description = "Named, lease-based locks for independent processes",
    )
)]
pub struct ApiDoc;

/// Probe for a lease without waiting.
#[utoipa::path(
    post,
    path = "/api/lock/try-acquire",
    tag = "lock",
    request_body = TryAcquireRequest,
    responses(
        (status = 200, description = "Lease taken", body = ApiResponse<AcquireOutcome>),
        (status = 200, description = "Lease still held elsewhere", body = ApiResponse<AcquireOutcome>)
    )
)]
pub async fn try_acquire_lock(
    client: web::Data<LockClient>,
    req: web::Json<TryAcquireRequest>,
) -> HttpResponse {
    info!(
        "[ACQUIRE] Probing lease - key: {}, lease_seconds: {}",
        req.key, req.lease_seconds
    );

    match client.try_acquire(&req.key, req.lease_seconds).await {
        Ok(true) => {
            info!("[ACQUIRE SUCCESS] Lease taken - key: {}", req.key);
            HttpResponse::Ok().json(ApiResponse::success(AcquireOutcome { acquired: true }))
        }
        Ok(false) => {
            info!("[ACQUIRE FAILED] Lease still held - key: {}", req.key);
            HttpResponse::Ok().json(ApiResponse::<AcquireOutcome>::error(
                CODE_ALREADY_HELD,
                format!("Lock {} already held", req.key),
            ))
        }
        Err(e) => {
            error!("Failed to probe lease for {}: {}", req.key, e);
            HttpResponse::Ok().json(ApiResponse::<AcquireOutcome>::error(
                CODE_BACKEND_FAILURE,
                format!("Failed to acquire lock: {}", e),
            ))
        }
    }
}

/// Wait for a lease, retrying with backoff until the budget runs out.
#[utoipa::path(
    post,
    path = "/api/lock/acquire",
    tag = "lock",
    request_body = AcquireRequest,
    responses(
        (status = 200, description = "Lease taken", body = ApiResponse<AcquireOutcome>),
        (status = 200, description = "Wait budget exceeded", body = ApiResponse<AcquireOutcome>)
    )
)]
pub async fn acquire_lock(
    client: web::Data<LockClient>,
    req: web::Json<AcquireRequest>,
) -> HttpResponse {
    info!(
        "[ACQUIRE] Waiting for lease - key: {}, lease_seconds: {}, max_wait_ms: {}",
        req.key, req.lease_seconds, req.max_wait_ms
    );

    let max_wait = Duration::from_millis(req.max_wait_ms);
    match client
        .acquire_blocking(&req.key, max_wait, req.lease_seconds)
        .await
    {
        Ok(()) => {
            info!("[ACQUIRE SUCCESS] Lease taken - key: {}", req.key);
            HttpResponse::Ok().json(ApiResponse::success(AcquireOutcome { acquired: true }))
        }
        Err(LockError::MaxAttemptsExceeded) => {
            info!(
                "[ACQUIRE TIMEOUT] Wait budget exceeded - key: {}, max_wait_ms: {}",
                req.key, req.max_wait_ms
            );
            HttpResponse::Ok().json(ApiResponse::<AcquireOutcome>::error(
                CODE_WAIT_TIMEOUT,
                format!("Timed out waiting for lock {}", req.key),
            ))
        }
        Err(LockError::Backend(e)) => {
            error!("Failed to acquire lease for {}: {}", req.key, e);
            HttpResponse::Ok().json(ApiResponse::<AcquireOutcome>::error(
                CODE_BACKEND_FAILURE,
                format!("Failed to acquire lock: {}", e),
            ))
        }
    }
}

/// Release a lease. Releasing an absent key succeeds.
#[utoipa::path(
    post,
    path = "/api/lock/release",
    tag = "lock",
    request_body = ReleaseRequest,
    responses(
        (status = 200, description = "Lease released", body = ApiResponse<serde_json::Value>),
        (status = 200, description = "Backend failure", body = ApiResponse<serde_json::Value>)
    )
)]
pub async fn release_lock(
    client: web::Data<LockClient>,
    req: web::Json<ReleaseRequest>,
) -> HttpResponse {
    info!("[RELEASE] Releasing lease - key: {}", req.key);

    match client.release_once(&req.key).await {
        Ok(()) => {
            info!("[RELEASE SUCCESS] Lease released - key: {}", req.key);
            HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
                "released": true
            })))
        }
        Err(e) => {
            error!("Failed to release lease for {}: {}", req.key, e);
            HttpResponse::Ok().json(ApiResponse::<serde_json::Value>::error(
                CODE_BACKEND_FAILURE,
                format!("Failed to release lock: {}", e),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/lock/try-acquire", web::post().to(try_acquire_lock))
            .route("/api/lock/acquire", web::post().to(acquire_lock))
            .route("/api/lock/release", web::post().to(release_lock));
    }

    macro_rules! post {
        ($app:expr, $path:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri($path)
                .set_json($body)
                .to_request();
            let resp: Value = test::call_and_read_body_json(&$app, req).await;
            resp
        }};
    }

    #[actix_rt::test]
    async fn try_acquire_reports_contention() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LockClient::memory()))
                .configure(routes),
        )
        .await;

        let body = json!({"key": "job", "lease_seconds": 30});
        let first = post!(app, "/api/lock/try-acquire", &body);
        assert_eq!(first["success"], true);
        assert_eq!(first["data"]["acquired"], true);

        let second = post!(app, "/api/lock/try-acquire", &body);
        assert_eq!(second["success"], false);
        assert_eq!(second["code"], CODE_ALREADY_HELD);
    }

    #[actix_rt::test]
    async fn release_makes_key_acquirable_again() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LockClient::memory()))
                .configure(routes),
        )
        .await;

        let body = json!({"key": "job", "lease_seconds": 30});
        post!(app, "/api/lock/try-acquire", &body);

        let released = post!(app, "/api/lock/release", &json!({"key": "job"}));
        assert_eq!(released["success"], true);

        let reacquired = post!(app, "/api/lock/try-acquire", &body);
        assert_eq!(reacquired["success"], true);
    }

    #[actix_rt::test]
    async fn blocking_acquire_times_out_on_held_key() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LockClient::memory()))
                .configure(routes),
        )
        .await;

        post!(app, "/api/lock/try-acquire", &json!({"key": "job", "lease_seconds": 30}));

        let timed_out = post!(
            app,
            "/api/lock/acquire",
            &json!({"key": "job", "lease_seconds": 30, "max_wait_ms": 150})
        );
        assert_eq!(timed_out["success"], false);
        assert_eq!(timed_out["code"], CODE_WAIT_TIMEOUT);
    }

    #[actix_rt::test]
    async fn releasing_absent_key_succeeds() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LockClient::memory()))
                .configure(routes),
        )
        .await;

        let released = post!(app, "/api/lock/release", &json!({"key": "never-held"}));
        assert_eq!(released["success"], true);
    }
}
