use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityRequirement, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::OpenApiInfoConfig;

/// Header-borne credentials every PlatformX API call must carry:
/// (scheme name, header, description).
pub const API_KEY_SCHEMES: [(&str, &str, &str); 4] = [
    ("AppKey", "x-app-key", "Application Key must appear in header"),
    ("AppEnvironment", "x-app-env", "Application Environment must appear in header"),
    ("ApiKey", "x-api-key", "Api Key must appear in header"),
    ("ApiSecret", "x-api-secret", "Api Secret must appear in header"),
];

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler,
    ),
    components(
        schemas(
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ReadinessResponse,
            crate::api::handlers::health::ComponentHealth,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        for (name, header, description) in API_KEY_SCHEMES {
            components.add_security_scheme(
                name,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    header,
                    description,
                ))),
            );
        }

        // One requirement naming all four schemes: every header is required together.
        let mut requirement = SecurityRequirement::default();
        for (name, _, _) in API_KEY_SCHEMES {
            requirement = requirement.add(name, Vec::<String>::new());
        }
        openapi.security = Some(vec![requirement]);
    }
}

/// Generated document with title, version and description taken from configuration.
pub fn openapi_document(info: &OpenApiInfoConfig) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.title = info.title.clone();
    openapi.info.version = info.version.clone();
    openapi.info.description = info.description.clone();
    openapi
}

pub fn docs_router<S>(info: &OpenApiInfoConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi_document(info)).into()
}
