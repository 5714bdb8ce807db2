//! 文件选择框读取

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use wellness_hub::DegreeUpload;

/// `<input type="file">` 当前选中的第一个文件
pub fn selected_file(input: &web_sys::HtmlInputElement) -> Option<web_sys::File> {
    input.files()?.get(0)
}

/// 把浏览器文件完整读入内存
pub async fn read_upload(file: &web_sys::File) -> Result<DegreeUpload, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read {}: {:?}", file.name(), e))?;
    Ok(DegreeUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
