use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a user record.
#[derive(ToSchema)]
pub struct UserDoc {
    pub id: u64,
    pub name: String,
    #[schema(rename = "lineStatus")]
    pub line_status: String,
}

/// Create/update body. Both fields are required on create.
#[derive(ToSchema)]
pub struct UserInputDoc {
    pub name: Option<String>,
    #[schema(rename = "lineStatus")]
    pub line_status: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list_or_get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::toggle,
        crate::routes::users::delete,
    ),
    components(schemas(HealthResponse, UserDoc, UserInputDoc)),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_user_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/users"));
        assert!(doc.paths.paths.contains_key("/users/toggle"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn user_schema_uses_wire_field_names() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"lineStatus\""));
        assert!(!json.contains("line_status"));
    }
}
