use crate::handlers;
use crate::models::Summary;
use utoipa::OpenApi;

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_summaries, handlers::get_account_summary),
    components(schemas(Summary)),
    info(
        title = "Beeline Summary API",
        description = "Balance and usage summaries for carrier accounts"
    )
)]
pub struct ApiDoc;
