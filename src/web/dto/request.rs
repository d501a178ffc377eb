//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};
use crate::file::UploadedObject;

/// Upload registration request.
///
/// The client uploads the bytes straight to ImageKit and then posts the
/// provider's response here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// ImageKit upload response.
    #[serde(default)]
    pub imagekit: Option<ImageKitUpload>,
    /// Owner the client believes it is uploading for.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Folder to place the file in (top level when absent).
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Fields of an ImageKit upload response.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageKitUpload {
    /// ImageKit file id.
    #[serde(default)]
    pub file_id: Option<String>,
    /// File name.
    #[serde(default)]
    pub name: Option<String>,
    /// File path inside the ImageKit library.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<i64>,
    /// File type.
    #[serde(default)]
    pub file_type: Option<String>,
    /// Public URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl ImageKitUpload {
    /// Convert into the service's upload record. `None` when the URL is missing.
    pub fn into_uploaded(self) -> Option<UploadedObject> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(UploadedObject {
            remote_id: self.file_id,
            name: self.name,
            path: self.file_path,
            size: self.size,
            file_type: self.file_type,
            url,
            thumbnail_url: self.thumbnail_url,
        })
    }
}

/// Folder creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(
        length(min = 1, max = 255, message = "Must be between 1 and 255 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub name: String,
    /// Parent folder (top level when absent).
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Listing query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Folder to list (top level when absent).
    #[serde(default)]
    pub parent_id: Option<String>,
}
