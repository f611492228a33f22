//! # 解码与编码边界模块
//!
//! ## 设计思路
//!
//! 将“字节 → 位图”和“画布 → PNG 字节”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做签名与尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 体积上限 + 文件签名（magic bytes）校验
//! 2. 读取 header 尺寸，按像素与内存上限快速拒绝
//! 3. 完整解码并统一转换为 RGBA8
//! 4. 编码阶段固定输出 RGBA8 PNG（无损，保留 alpha）

use image::codecs::png::{self, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use std::io::Cursor;

use super::source::Bitmap;
use super::{PngCompression, PrepConfig, PrepError};

/// 将上传的原始字节解码为 RGBA 位图。
pub fn decode(bytes: &[u8], config: &PrepConfig) -> Result<Bitmap, PrepError> {
    validate_file_size(bytes, config)?;
    validate_image_signature(bytes)?;

    let (header_width, header_height) = inspect_dimensions(bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PrepError::Decode(format!("图片解码失败：{}", e)))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    validate_pixel_limits(config, width, height)?;

    log::debug!(
        "图片解码成功 - 输入 {}KB 尺寸: {}x{}",
        bytes.len() / 1024,
        width,
        height
    );

    Bitmap::from_image(rgba)
}

/// 将 RGBA 画布编码为 PNG 字节。
pub fn encode_png(image: &RgbaImage, compression: PngCompression) -> Result<Vec<u8>, PrepError> {
    let (width, height) = image.dimensions();
    let mut buffer = Vec::new();

    PngEncoder::new_with_quality(
        &mut buffer,
        compression.to_compression_type(),
        png::FilterType::Adaptive,
    )
    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
    .map_err(|e| PrepError::Encode(format!("PNG 编码失败（{}x{}）：{}", width, height, e)))?;

    Ok(buffer)
}

fn validate_file_size(bytes: &[u8], config: &PrepConfig) -> Result<(), PrepError> {
    if bytes.len() as u64 > config.max_file_size {
        return Err(PrepError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), PrepError> {
    if bytes.is_empty() {
        return Err(PrepError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| PrepError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(PrepError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 仅通过图片头信息读取宽高。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), PrepError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PrepError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| PrepError::Decode(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &PrepConfig, width: u32, height: u32) -> Result<(), PrepError> {
    let pixels = u64::from(width) * u64::from(height);

    if pixels == 0 {
        return Err(PrepError::InvalidInput(format!(
            "图片尺寸无效：{}x{}",
            width, height
        )));
    }

    if pixels > config.max_decoded_pixels {
        return Err(PrepError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &PrepConfig,
    width: u32,
    height: u32,
) -> Result<(), PrepError> {
    let estimated = (u64::from(width) * u64::from(height))
        .checked_mul(4)
        .ok_or_else(|| PrepError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(PrepError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}
