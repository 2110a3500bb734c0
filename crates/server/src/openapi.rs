use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema, serde::Serialize)]
pub struct CoordinatesDoc { pub latitude: f64, pub longitude: f64 }

/// `type` is one of `plothole`, `dense_traffic`.
#[derive(ToSchema, serde::Serialize)]
pub struct MarkerDoc {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    #[schema(example = "plothole")]
    pub kind: String,
    pub geometry: CoordinatesDoc,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub error: String, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::markers::list,
        crate::markers::get,
        crate::markers::add,
        crate::markers::update,
        crate::markers::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CoordinatesDoc,
            MarkerDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "markers")
    )
)]
pub struct ApiDoc;

/// Prefix the marker paths are declared with in the `#[utoipa::path]` attributes.
const DOC_API_PREFIX: &str = "/api";

/// OpenAPI document with the marker paths moved under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if api_prefix != DOC_API_PREFIX {
        let paths = std::mem::take(&mut doc.paths.paths);
        doc.paths.paths = paths
            .into_iter()
            .map(|(path, item)| match path.strip_prefix(DOC_API_PREFIX) {
                Some(rest) if rest.starts_with('/') => (format!("{api_prefix}{rest}"), item),
                _ => (path, item),
            })
            .collect();
    }
    doc
}
