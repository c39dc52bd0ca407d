//! OpenAPI documentation configuration.

use crate::controllers::{HealthResponse, ReadinessResponse};
use cachedeck_core::ErrorResponse;
use utoipa::OpenApi;

/// OpenAPI documentation for the CacheDeck API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CacheDeck API",
        version = "0.1.0",
        description = "Inspect, populate and invalidate named cache regions",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Cache endpoints
        crate::controllers::cache_controller::list_caches,
        crate::controllers::cache_controller::lookup_cache,
        crate::controllers::cache_controller::delete_cache,
        crate::controllers::cache_controller::get_entry,
        crate::controllers::cache_controller::put_entry,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "cache", description = "Cache inspection and mutation endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
