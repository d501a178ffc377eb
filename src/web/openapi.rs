//! OpenAPI document for the web API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{CreateFolderRequest, EmptyTrashResponse, ImageKitUpload, NodeResponse, UploadRequest};
use super::handlers;

/// OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(title = "Droply API", description = "Personal file storage"),
    paths(
        handlers::file::delete_file,
        handlers::file::upload_file,
        handlers::file::create_folder,
        handlers::file::list_files,
        handlers::file::toggle_star,
        handlers::file::toggle_trash,
        handlers::trash::empty_trash,
    ),
    components(schemas(
        NodeResponse,
        EmptyTrashResponse,
        UploadRequest,
        ImageKitUpload,
        CreateFolderRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "files", description = "Files and folders"),
        (name = "trash", description = "Trash")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
