//! Health check service for verifying the storage backend

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::repositories::PrivilegeRepository;

/// Upper bound on a single storage probe
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy service result
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: None,
        }
    }

    /// Create an unhealthy service result
    pub fn unhealthy(name: &'static str, error: impl Into<String>, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: Some(error.into()),
        }
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if all services are healthy)
    pub status: ServiceStatus,
    /// Individual service health results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all health checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    /// Create a new health check response from individual service results
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services.iter().all(|s| s.status == ServiceStatus::Healthy) {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Check if overall health is good
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service for the privilege store
#[derive(Clone)]
pub struct HealthService {
    repository: Arc<dyn PrivilegeRepository>,
}

impl HealthService {
    pub fn new(repository: Arc<dyn PrivilegeRepository>) -> Self {
        Self { repository }
    }

    /// Ping the storage backend
    pub async fn check_storage(&self) -> ServiceHealth {
        let start = Instant::now();

        match tokio::time::timeout(CHECK_TIMEOUT, self.repository.ping()).await {
            Ok(Ok(())) => ServiceHealth::healthy("storage", start.elapsed()),
            Ok(Err(e)) => ServiceHealth::unhealthy(
                "storage",
                format!("Ping failed: {}", e),
                start.elapsed(),
            ),
            Err(_) => ServiceHealth::unhealthy("storage", "Ping timed out", start.elapsed()),
        }
    }

    /// Run every check and aggregate the results
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();
        let storage = self.check_storage().await;

        let response = HealthCheckResponse::new(vec![storage], start.elapsed());
        if !response.is_healthy() {
            tracing::warn!(services = ?response.services, "Health check failed");
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryPrivilegeRepository;

    #[test]
    fn test_response_unhealthy_if_any_service_unhealthy() {
        let response = HealthCheckResponse::new(
            vec![
                ServiceHealth::healthy("a", Duration::from_millis(1)),
                ServiceHealth::unhealthy("b", "down", Duration::from_millis(2)),
            ],
            Duration::from_millis(3),
        );
        assert!(!response.is_healthy());
        assert_eq!(response.total_time_ms, 3);
    }

    #[test]
    fn test_service_health_serialization() {
        let health = ServiceHealth::healthy("storage", Duration::from_millis(7));
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["response_time_ms"], 7);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_is_healthy() {
        let service = HealthService::new(Arc::new(MemoryPrivilegeRepository::new()));
        let response = service.check_all().await;
        assert!(response.is_healthy());
        assert_eq!(response.services[0].name, "storage");
    }
}
