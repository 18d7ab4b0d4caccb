use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::Problem;
use crate::message::{ChatRequest, ChatResponse};

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// OpenAPI description of the public surface.
#[derive(OpenApi)]
#[openapi(
    paths(super::chat::chat_handler),
    components(schemas(ChatRequest, ChatResponse, Problem))
)]
pub struct ApiDoc;

/// Swagger UI plus the document it renders.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_chat_error_statuses() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let responses = &doc["paths"]["/chat"]["post"]["responses"];
        for status in ["200", "400", "500", "502"] {
            assert!(responses.get(status).is_some(), "missing {status}");
        }
        assert!(
            responses["400"]["content"]
                .get("application/problem+json")
                .is_some()
        );
    }

    #[test]
    fn schemas_follow_wire_types() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert!(schemas["ChatRequest"]["properties"].get("message").is_some());
        assert!(schemas["ChatResponse"]["properties"].get("response").is_some());
        assert!(schemas["Problem"]["properties"].get("traceId").is_some());
        assert!(schemas["Problem"]["properties"].get("type").is_some());
    }
}
