//! Image Upload Endpoint

use js_sys::Uint8Array;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use wasm_bindgen_futures::JsFuture;

use super::{HttpCatalogApi, ImageUpload};
use crate::error::{AppError, AppResult};
use crate::models::UploadedImageResponse;

impl HttpCatalogApi {
    pub async fn post_image(&self, upload: ImageUpload) -> AppResult<String> {
        let label = format!("POST /images ({})", upload.file_name);
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)
            .map_err(AppError::from)?;
        let form = Form::new().part("file", part);

        let response: UploadedImageResponse =
            self.send_json(&label, self.request(Method::POST, "images").multipart(form)).await?;
        response
            .into_url()
            .ok_or_else(|| AppError::Decode("upload response carries no url".to_string()))
    }
}

/// Read a browser file into memory for upload
pub async fn read_file(file: &web_sys::File) -> AppResult<ImageUpload> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::Network(format!("could not read {}: {:?}", file.name(), e)))?;
    Ok(ImageUpload {
        file_name: file.name(),
        mime: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
