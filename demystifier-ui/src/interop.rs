use demystifier_types::guess_mime;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use crate::session::SelectedFile;

/// DOM id of the document file picker
pub const FILE_INPUT_ID: &str = "document-file-input";

fn file_input(input_id: &str) -> Result<HtmlInputElement, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .ok_or_else(|| format!("file input #{input_id} unavailable"))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| format!("#{input_id} is not an input element"))
}

/// Read the first file chosen in the picker, if any
pub async fn read_selected_file(input_id: &str) -> Result<Option<SelectedFile>, String> {
    let input = file_input(input_id)?;
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let name = file.name();
    let mime = match file.type_() {
        mime if mime.is_empty() => guess_mime(&name).to_string(),
        mime => mime,
    };

    Ok(Some(SelectedFile { name, mime, bytes }))
}

/// Forget the picker's selection so the same file can be chosen again
pub fn reset_file_input(input_id: &str) {
    match file_input(input_id) {
        Ok(input) => input.set_value(""),
        Err(e) => dioxus_logger::tracing::warn!("Failed to reset file input: {}", e),
    }
}
