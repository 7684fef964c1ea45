//! Strapi Media Upload
//!
//! `POST /upload` takes one multipart `files` part per file and answers with
//! the stored file records (not wrapped in `data`).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::client::StrapiClient;
use crate::domain::{DomainError, DomainResult, Media};
use crate::repository::traits::{MediaRepository, MediaUpload};

fn multipart_form(files: Vec<MediaUpload>) -> DomainResult<Form> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| DomainError::InvalidInput(format!("mime type {}: {}", file.mime, e)))?;
        form = form.part("files", part);
    }
    Ok(form)
}

#[async_trait]
impl MediaRepository for StrapiClient {
    async fn upload(&self, files: Vec<MediaUpload>) -> DomainResult<Vec<Media>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let count = files.len();
        let form = multipart_form(files)?;
        let uploaded: Vec<Media> = self
            .send(self.request(Method::POST, "upload").multipart(form))
            .await?;
        log::info!("[api] uploaded {} of {} files", uploaded.len(), count);
        Ok(uploaded)
    }
}
