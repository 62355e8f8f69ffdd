//! 本地图片处理
//!
//! 用 canvas 把图片缩放到限定宽高内并重新编码为 JPEG data URL，也用于读取图片尺寸。

use nestmatch::UploadError;
use nestmatch::upload::{ImageFile, LocalImageEncoder, ResizeOptions, fit_within};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url};

use super::http::blob_from_bytes;

fn unreadable(context: &str, e: JsValue) -> UploadError {
    UploadError::Unreadable(format!("{}: {:?}", context, e))
}

/// 对象 URL，离开作用域时释放
struct ObjectUrl(String);

impl ObjectUrl {
    fn new(file: &ImageFile) -> Result<Self, UploadError> {
        let blob = blob_from_bytes(&file.bytes, &file.content_type)
            .map_err(|e| unreadable("创建 Blob 失败", e))?;
        Url::create_object_url_with_blob(&blob)
            .map(Self)
            .map_err(|e| unreadable("创建对象 URL 失败", e))
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
    }
}

/// 解码图片，返回时图片已可绘制
async fn load_image(url: &ObjectUrl) -> Result<HtmlImageElement, UploadError> {
    let image = HtmlImageElement::new().map_err(|e| unreadable("创建 Image 失败", e))?;
    image.set_src(&url.0);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| unreadable("图片解码失败", e))?;
    Ok(image)
}

/// 基于 canvas 的本地编码器
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasEncoder;

#[async_trait::async_trait(?Send)]
impl LocalImageEncoder for CanvasEncoder {
    async fn encode(
        &self,
        file: &ImageFile,
        options: ResizeOptions,
    ) -> Result<String, UploadError> {
        let url = ObjectUrl::new(file)?;
        let image = load_image(&url).await?;
        draw(&image, options)
    }

    async fn dimensions(&self, file: &ImageFile) -> Result<(u32, u32), UploadError> {
        let url = ObjectUrl::new(file)?;
        let image = load_image(&url).await?;
        Ok((image.natural_width(), image.natural_height()))
    }

    fn data_url(&self, file: &ImageFile) -> Result<String, UploadError> {
        let window = web_sys::window()
            .ok_or_else(|| UploadError::Unreadable("无法获取 window 对象".to_string()))?;
        // btoa 接受每个字符一个字节的字符串
        let binary: String = file.bytes.iter().map(|&b| b as char).collect();
        let encoded = window
            .btoa(&binary)
            .map_err(|e| unreadable("Base64 编码失败", e))?;
        Ok(format!("data:{};base64,{}", file.content_type, encoded))
    }
}

fn draw(image: &HtmlImageElement, options: ResizeOptions) -> Result<String, UploadError> {
    let (width, height) = fit_within(
        image.natural_width(),
        image.natural_height(),
        options.max_width,
        options.max_height,
    );

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| UploadError::Unreadable("无法获取 document 对象".to_string()))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| unreadable("创建 canvas 失败", e))?
        .dyn_into()
        .map_err(|e| unreadable("canvas 类型转换失败", e.into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| unreadable("获取 2d 上下文失败", e))?
        .ok_or_else(|| UploadError::Unreadable("浏览器不支持 2d canvas".to_string()))?
        .dyn_into()
        .map_err(|e| unreadable("上下文类型转换失败", e.into()))?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|e| unreadable("绘制图片失败", e))?;

    canvas
        .to_data_url_with_type_and_encoder_options(
            "image/jpeg",
            &JsValue::from_f64(options.quality),
        )
        .map_err(|e| unreadable("导出 JPEG 失败", e))
}

/// 读取 `<input type="file">` 中选中的文件
pub async fn read_file(file: &web_sys::File) -> Result<ImageFile, UploadError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| unreadable("读取文件失败", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageFile::new(file.name(), file.type_(), bytes))
}
