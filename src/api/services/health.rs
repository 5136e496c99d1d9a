use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use serde::Serialize;
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::helpers::json_response;

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

pub struct HealthService;

impl HealthService {
    // 活跃性检查，进程能响应即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        json_response(
            StatusCode::OK,
            &HealthStatus {
                status: "ok",
                backend: None,
            },
        )
    }

    /// 就绪检查：数据库可达
    pub async fn readiness_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
        let backend = Some(storage.get_backend_config().storage_type);

        match tokio::time::timeout(Duration::from_secs(5), storage.get_db().ping()).await {
            Ok(Ok(())) => json_response(
                StatusCode::OK,
                &HealthStatus {
                    status: "ok",
                    backend,
                },
            ),
            Ok(Err(e)) => {
                error!("Storage readiness check failed: {}", e);
                json_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &HealthStatus {
                        status: "unavailable",
                        backend,
                    },
                )
            }
            Err(_) => {
                error!("Storage readiness check timeout");
                json_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &HealthStatus {
                        status: "timeout",
                        backend,
                    },
                )
            }
        }
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
}
