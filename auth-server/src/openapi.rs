use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTHN_TAG: &str = "Authentication API";
pub(crate) const AUTHZ_TAG: &str = "Authorization API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTHN_TAG, description = "Sign-in and token lifecycle endpoints"),
        (name = AUTHZ_TAG, description = "Authorization check endpoints"),
    ),
    info(
        title = "Auth Service API",
        description = "Scoped-token issuance and authorization microservice",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;
