//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`]。JSON 请求体以字符串发送，
//! multipart 请求体转换为 `FormData`，边界由浏览器生成。

use nestmatch::TransportError;
use nestmatch::request::{FormPart, HttpClient, HttpRequest, HttpResponse, RequestBody};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn js_error(context: &str, e: JsValue) -> TransportError {
    TransportError::new(format!("{}: {:?}", context, e))
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Headers::new().map_err(|e| js_error("创建 Headers 失败", e))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(text)) => opts.set_body(&JsValue::from_str(text)),
            Some(RequestBody::Multipart(parts)) => opts.set_body(&form_data(parts)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_error("请求构建失败", e))?;

        let window =
            web_sys::window().ok_or_else(|| TransportError::new("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("Response 类型转换失败", e))?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| js_error("响应解析失败", e))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| js_error("响应解析失败", e))?;

        let body = text
            .as_string()
            .ok_or_else(|| TransportError::new("响应体无法转换为字符串"))?;

        Ok(HttpResponse { status, body })
    }
}

/// 把 multipart 字段转换为 `FormData`
fn form_data(parts: &[FormPart]) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(|e| js_error("创建 FormData 失败", e))?;

    for part in parts {
        match part {
            FormPart::Text { name, value } => form
                .append_with_str(name, value)
                .map_err(|e| js_error("添加表单字段失败", e))?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let blob = blob_from_bytes(bytes, content_type)
                    .map_err(|e| js_error("创建 Blob 失败", e))?;
                form.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(|e| js_error("添加文件字段失败", e))?
            }
        }
    }

    Ok(form)
}

/// 从字节构建带 MIME 类型的 Blob
pub fn blob_from_bytes(bytes: &[u8], content_type: &str) -> Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let sequence = js_sys::Array::of1(&array);
    let opts = BlobPropertyBag::new();
    opts.set_type(content_type);
    Blob::new_with_u8_array_sequence_and_options(&sequence, &opts)
}
