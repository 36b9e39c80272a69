use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Face Match Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::game_page,
        crate::routes::game::check_answer,
        crate::routes::game::skip_question,
        crate::routes::game::score_page,
        crate::routes::game::logout,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CheckForm,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Face match quiz pages"),
    )
)]
pub struct ApiDoc;
