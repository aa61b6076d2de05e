use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Probe for a lease without waiting.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TryAcquireRequest {
    #[schema(example = "maintenance:prune")]
    pub key: String,
    #[schema(example = 60)]
    pub lease_seconds: u64,
}

/// Wait for a lease with a bounded retry budget.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AcquireRequest {
    #[schema(example = "maintenance:prune")]
    pub key: String,
    #[schema(example = 60)]
    pub lease_seconds: u64,
    /// Zero waits forever.
    #[serde(default)]
    #[schema(example = 5000)]
    pub max_wait_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReleaseRequest {
    #[schema(example = "maintenance:prune")]
    pub key: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AcquireOutcome {
    pub acquired: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
            success: true,
        }
    }

    pub fn error(code: i32, message: String) -> Self {
        Self {
            code,
            message,
            data: None,
            success: false,
        }
    }
}
