//! 图片上传与本地处理
//!
//! 上传降级链：按配置依次尝试各上传预设 -> 不带预设上传一次 -> （可选）本地缩放压缩为 data URL。
//! 单个预设失败只记录日志并继续，整条链耗尽才报错。
//!
//! 本地处理（缩放、缩略图、尺寸读取）委托给注入的 `LocalImageEncoder`，浏览器中由 canvas 实现。

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;

use crate::config::ImageHostConfig;
use crate::error::UploadError;
use crate::request::{FormPart, HttpClient, HttpRequest};

/// 上传文件大小上限 (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
/// 默认缩略图边长
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 150;
const THUMBNAIL_QUALITY: f64 = 0.7;

const FIELD_FILE: &str = "file";
const FIELD_PRESET: &str = "upload_preset";
const FIELD_SECURE_URL: &str = "secure_url";

// 1×1 PNG，用于预设自检
const SELF_TEST_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// 用户选择的图片文件
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    /// MIME 类型，如 `image/png`
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 本地处理只要求文件非空且是图片
fn check_image(file: &ImageFile) -> Result<(), UploadError> {
    if file.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if !file.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// 上传前的本地校验，不消耗任何远程配额
pub fn validate(file: &ImageFile) -> Result<(), UploadError> {
    check_image(file)?;
    if file.size() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: file.size(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// 缩放与重新编码参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG 质量 (0.1 ~ 1.0)
    pub quality: f64,
}

impl ResizeOptions {
    /// 远程上传全部失败后的本地降级
    pub const LOCAL_FALLBACK: Self = Self {
        max_width: 800,
        max_height: 800,
        quality: 0.8,
    };

    /// 正方形缩略图
    pub const fn thumbnail(size: u32) -> Self {
        Self {
            max_width: size,
            max_height: size,
            quality: THUMBNAIL_QUALITY,
        }
    }
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 800,
            quality: 0.8,
        }
    }
}

/// 等比缩放，使宽不超过 `max_width`、高不超过 `max_height`，不放大
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let (w, h) = (width as u64, height as u64);
    let (mw, mh) = (max_width as u64, max_height as u64);
    // mw / w <= mh / h 时宽度是约束边
    if mw * h <= mh * w {
        (max_width, ((h * mw) / w).max(1) as u32)
    } else {
        (((w * mh) / h).max(1) as u32, max_height)
    }
}

/// 文件大小的可读形式，如 `1.5 KB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// 图片元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub size_formatted: String,
}

impl ImageInfo {
    pub fn new(file: &ImageFile, width: u32, height: u32) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
            width,
            height,
            size_formatted: format_file_size(file.size()),
        }
    }
}

/// 一次远程上传尝试的记录
#[derive(Debug, Clone, PartialEq)]
pub struct UploadAttempt {
    /// None 表示不带预设的尝试
    pub preset: Option<String>,
    /// 成功时为 secure URL，失败时为原因
    pub outcome: Result<String, String>,
}

/// 预设自检结果，每个候选项一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct PresetReport {
    pub attempts: Vec<UploadAttempt>,
}

impl PresetReport {
    /// 第一个可用的候选项
    pub fn working(&self) -> Option<&UploadAttempt> {
        self.attempts.iter().find(|a| a.outcome.is_ok())
    }

    pub fn is_healthy(&self) -> bool {
        self.working().is_some()
    }
}

/// 本地图片编码器（浏览器中由 canvas 实现）
#[async_trait::async_trait(?Send)]
pub trait LocalImageEncoder: Send + Sync {
    /// 缩放到 `options` 的宽高上限以内并重新编码为 JPEG，返回 data URL
    async fn encode(
        &self,
        file: &ImageFile,
        options: ResizeOptions,
    ) -> Result<String, UploadError>;

    /// 解码图片并返回原始宽高
    async fn dimensions(&self, file: &ImageFile) -> Result<(u32, u32), UploadError>;

    /// 原样转为 data URL，不重新编码
    fn data_url(&self, file: &ImageFile) -> Result<String, UploadError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// 远程全部失败时是否退回本地 data URL
    pub local_fallback: bool,
}

impl UploadOptions {
    pub fn with_local_fallback() -> Self {
        Self {
            local_fallback: true,
        }
    }
}

#[derive(Clone)]
pub struct ImageUploader {
    upload_url: String,
    presets: Vec<String>,
    client: Arc<dyn HttpClient>,
    encoder: Option<Arc<dyn LocalImageEncoder>>,
}

impl ImageUploader {
    pub fn new(config: &ImageHostConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            upload_url: config.upload_url.clone(),
            presets: config.presets.clone(),
            client,
            encoder: None,
        }
    }

    pub fn with_local_encoder(mut self, encoder: Arc<dyn LocalImageEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    fn local_encoder(&self) -> Result<&dyn LocalImageEncoder, UploadError> {
        self.encoder.as_deref().ok_or(UploadError::NoLocalEncoder)
    }

    // 所有预设，最后是账户默认（不带预设）
    fn candidates(&self) -> impl Iterator<Item = Option<&str>> {
        self.presets
            .iter()
            .map(|p| Some(p.as_str()))
            .chain(std::iter::once(None))
    }

    // =========================================================
    // 远程上传
    // =========================================================

    /// 上传单张图片，返回可长期使用的 URL
    pub async fn upload(
        &self,
        file: &ImageFile,
        options: UploadOptions,
    ) -> Result<String, UploadError> {
        validate(file)?;
        log_info!("[Upload] Starting upload for {}", file.name);

        let mut attempts = Vec::with_capacity(self.presets.len() + 1);

        for preset in self.candidates() {
            let attempt = self.attempt(file, preset).await;
            match &attempt.outcome {
                Ok(url) => {
                    log_info!(
                        "[Upload] Upload successful with preset {}",
                        preset.unwrap_or("<account default>")
                    );
                    return Ok(url.clone());
                }
                Err(reason) => {
                    log_warn!(
                        "[Upload] Preset {} failed: {}",
                        preset.unwrap_or("<account default>"),
                        reason
                    );
                }
            }
            attempts.push(attempt);
        }

        if options.local_fallback {
            if let Some(encoder) = &self.encoder {
                log_warn!("[Upload] All remote options failed, encoding {} locally", file.name);
                return encoder.encode(file, ResizeOptions::LOCAL_FALLBACK).await;
            }
            log_warn!("[Upload] Local fallback requested but no encoder is configured");
        }

        log_error!("[Upload] All upload options failed for {}", file.name);
        Err(UploadError::Exhausted { attempts })
    }

    /// 并发上传多张图片，任何一张失败则整批失败
    pub async fn upload_many(
        &self,
        files: &[ImageFile],
        options: UploadOptions,
    ) -> Result<Vec<String>, UploadError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        for file in files {
            validate(file)?;
        }

        log_info!("[Upload] Uploading {} images...", files.len());
        try_join_all(files.iter().map(|file| self.upload(file, options))).await
    }

    /// 用一张 1×1 测试图依次尝试每个预设和账户默认，报告每一项的结果
    pub async fn check_presets(&self) -> PresetReport {
        let test_image = ImageFile::new("test.png", "image/png", SELF_TEST_PNG.to_vec());
        log_info!("[Upload] Checking {} upload presets", self.presets.len());

        let mut attempts = Vec::with_capacity(self.presets.len() + 1);
        for preset in self.candidates() {
            let attempt = self.attempt(&test_image, preset).await;
            let label = preset.unwrap_or("<account default>");
            match &attempt.outcome {
                Ok(_) => log_info!("[Upload] Preset {} works", label),
                Err(reason) => log_warn!("[Upload] Preset {} failed: {}", label, reason),
            }
            attempts.push(attempt);
        }

        let report = PresetReport { attempts };
        if !report.is_healthy() {
            log_error!("[Upload] No upload preset accepted the test image");
        }
        report
    }

    async fn attempt(&self, file: &ImageFile, preset: Option<&str>) -> UploadAttempt {
        let mut parts = vec![FormPart::File {
            name: FIELD_FILE.to_string(),
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        }];
        if let Some(preset) = preset {
            parts.push(FormPart::Text {
                name: FIELD_PRESET.to_string(),
                value: preset.to_string(),
            });
        }

        let request = HttpRequest::post(&self.upload_url).with_multipart(parts);
        let outcome = match self.client.send(request).await {
            Ok(response) if !response.ok() => {
                Err(format!("HTTP {}: {}", response.status, response.body))
            }
            Ok(response) => match response.json::<Value>() {
                Ok(body) => secure_url(&body),
                Err(e) => Err(format!("unreadable response: {}", e)),
            },
            Err(e) => Err(e.to_string()),
        };

        UploadAttempt {
            preset: preset.map(str::to_string),
            outcome,
        }
    }

    // =========================================================
    // 本地处理
    // =========================================================

    /// 缩放并重新编码为 JPEG data URL
    pub async fn resize(
        &self,
        file: &ImageFile,
        options: ResizeOptions,
    ) -> Result<String, UploadError> {
        check_image(file)?;
        self.local_encoder()?.encode(file, options).await
    }

    /// 边长为 `size` 的缩略图，质量 0.7
    pub async fn thumbnail(&self, file: &ImageFile, size: u32) -> Result<String, UploadError> {
        self.resize(file, ResizeOptions::thumbnail(size)).await
    }

    /// 批量转为 data URL；`resize` 为真时按默认 1200×800 缩放
    pub async fn process_many(
        &self,
        files: &[ImageFile],
        resize: bool,
    ) -> Result<Vec<String>, UploadError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        for file in files {
            check_image(file)?;
        }
        let encoder = self.local_encoder()?;

        log_info!("[Upload] Processing {} images...", files.len());
        let results = try_join_all(files.iter().map(|file| async move {
            if resize {
                encoder.encode(file, ResizeOptions::default()).await
            } else {
                encoder.data_url(file)
            }
        }))
        .await?;
        log_info!("[Upload] Successfully processed {} images", results.len());
        Ok(results)
    }

    /// 读取图片尺寸与文件信息
    pub async fn image_info(&self, file: &ImageFile) -> Result<ImageInfo, UploadError> {
        check_image(file)?;
        let (width, height) = self.local_encoder()?.dimensions(file).await?;
        Ok(ImageInfo::new(file, width, height))
    }
}

/// 成功的响应必须带 `secure_url` 且不带 `error`
fn secure_url(body: &Value) -> Result<String, String> {
    match body.get("error") {
        None | Some(Value::Null) => {}
        Some(error) => {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(message);
        }
    }
    body.get(FIELD_SECURE_URL)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "response has no secure_url".to_string())
}
