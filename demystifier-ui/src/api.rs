use async_trait::async_trait;
use demystifier_types::{
    FollowUpRequest, FollowUpResponse, SimplifyResponse, SimplifyTextRequest, FIELD_FILE,
    FIELD_USER_ROLE_GOAL,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::config::{api_config, ApiConfig};
use crate::error::{decode_response, ClientError};
use crate::session::SelectedFile;

/// The simplification service as the controller sees it
#[async_trait(?Send)]
pub trait SimplifyApi {
    async fn simplify_text(
        &self,
        request: &SimplifyTextRequest,
    ) -> Result<SimplifyResponse, ClientError>;

    async fn simplify_file(
        &self,
        user_role_goal: &str,
        file: &SelectedFile,
    ) -> Result<SimplifyResponse, ClientError>;

    async fn follow_up(&self, request: &FollowUpRequest) -> Result<FollowUpResponse, ClientError>;
}

/// Browser `fetch` client
#[derive(Debug, Clone)]
pub struct HttpSimplifyApi {
    config: ApiConfig,
}

impl HttpSimplifyApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn from_build_env() -> Self {
        Self::new(api_config().clone())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl SimplifyApi for HttpSimplifyApi {
    async fn simplify_text(
        &self,
        request: &SimplifyTextRequest,
    ) -> Result<SimplifyResponse, ClientError> {
        let url = self.config.simplify_text_url();

        let response = Request::post(&url)
            .json(request)
            .map_err(|e| ClientError::Network(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Request failed: {e}")))?;

        read_json(response).await
    }

    async fn simplify_file(
        &self,
        user_role_goal: &str,
        file: &SelectedFile,
    ) -> Result<SimplifyResponse, ClientError> {
        let url = self.config.simplify_file_url();
        let form = build_upload_form(user_role_goal, file)?;

        // The browser sets the multipart boundary header itself
        let response = Request::post(&url)
            .body(form)
            .map_err(|e| ClientError::Network(format!("Failed to build upload: {e}")))?
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Request failed: {e}")))?;

        read_json(response).await
    }

    async fn follow_up(&self, request: &FollowUpRequest) -> Result<FollowUpResponse, ClientError> {
        let url = self.config.follow_up_url();

        let response = Request::post(&url)
            .json(request)
            .map_err(|e| ClientError::Network(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Request failed: {e}")))?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Failed to read response: {e}")))?;
    decode_response(status, &body)
}

/// Multipart body for the simplify-by-file endpoint
pub fn build_upload_form(user_role_goal: &str, file: &SelectedFile) -> Result<FormData, ClientError> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_str(FIELD_USER_ROLE_GOAL, user_role_goal)
        .map_err(js_error)?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(&file.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    form.append_with_blob_and_filename(FIELD_FILE, &blob, &file.name)
        .map_err(js_error)?;
    Ok(form)
}

fn js_error(value: JsValue) -> ClientError {
    let message = value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"));
    ClientError::Network(format!("Failed to prepare upload: {message}"))
}
