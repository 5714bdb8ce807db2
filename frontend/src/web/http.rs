//! fetch 客户端
//!
//! 基于 `gloo-net` 实现核心库的 `HttpClient`。任何 HTTP 状态码都原样返回，
//! 只有 fetch 本身失败才是错误。

use gloo_net::http::{Method, RequestBuilder};
use wasm_bindgen::JsValue;
use wellness_hub::request::{FormPart, MultipartForm, RequestBody};
use wellness_hub::{ApiError, HttpClient, HttpRequest, HttpResponse};
use wellness_shared::HttpMethod;

#[derive(Clone, Copy, Debug, Default)]
pub struct GlooHttpClient;

fn js_error(context: &str, err: JsValue) -> ApiError {
    ApiError::transport(format!("{}: {:?}", context, err))
}

/// 转为浏览器 FormData，Content-Type 与 boundary 由浏览器生成
fn to_form_data(form: &MultipartForm) -> Result<web_sys::FormData, ApiError> {
    let data = web_sys::FormData::new().map_err(|e| js_error("FormData", e))?;
    for part in &form.parts {
        match part {
            FormPart::Text { name, value } => data
                .append_with_str(name, value)
                .map_err(|e| js_error("FormData.append", e))?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let chunks = js_sys::Array::new();
                chunks.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&chunks, &options)
                    .map_err(|e| js_error("Blob", e))?;
                data.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(|e| js_error("FormData.append", e))?;
            }
        }
    }
    Ok(data)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GlooHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&req.url).method(method);
        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        let request = match req.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(body) => builder.body(body),
            RequestBody::Multipart(form) => builder.body(to_form_data(&form)?),
        }
        .map_err(|e| ApiError::transport(format!("Build Request Error: {}", e)))?;

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Fetch Error: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Fetch Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
