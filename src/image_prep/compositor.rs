//! # 画布合成模块
//!
//! ## 设计思路
//!
//! 输入为位图 + 几何结果 + 背景参数，输出为新画布；源位图始终只读。
//! 处理链路固定为：
//! 1. 画布像素上限检查（分配前）
//! 2. 背景填充（不透明纯色 / 全透明）
//! 3. 按需缩放源图（仅 Favicon 路径，`content_*` 与源图尺寸不同时）
//! 4. 按偏移绘制（source-over），超出画布的像素直接丢弃
//! 5. 编码为 PNG
//!
//! ## 实现思路
//!
//! - 缩放优先使用 `fast_image_resize`，失败时回退 `image::imageops::resize`。
//! - 裁剪是纯矩形拷贝，只做越界收敛，不做任何重采样。

use fast_image_resize as fr;
use image::{ImageBuffer, Rgba, RgbaImage, imageops};
use std::borrow::Cow;

use super::codec::encode_png;
use super::fit::FitResult;
use super::source::{BackgroundMode, Bitmap, CropRect, RenderOptions};
use super::{PrepConfig, PrepError, ResampleFilter};

/// 合成并编码为 PNG 字节。
pub fn render(
    bitmap: &Bitmap,
    fit: &FitResult,
    options: &RenderOptions,
    config: &PrepConfig,
) -> Result<Vec<u8>, PrepError> {
    let canvas = compose(bitmap, fit, options, config)?;
    encode_png(&canvas, config.png_compression)
}

/// 合成画布（不编码）。
pub fn compose(
    bitmap: &Bitmap,
    fit: &FitResult,
    options: &RenderOptions,
    config: &PrepConfig,
) -> Result<RgbaImage, PrepError> {
    validate_canvas_limits(fit, config)?;

    let mut canvas = RgbaImage::from_pixel(
        fit.canvas_width,
        fit.canvas_height,
        background_pixel(options.background),
    );

    let (source_width, source_height) = bitmap.dimensions();
    let content: Cow<'_, RgbaImage> = if fit.is_scaled(source_width, source_height) {
        Cow::Owned(scale_to(
            bitmap.as_image(),
            fit.content_width,
            fit.content_height,
            config.resize_filter,
        )?)
    } else {
        Cow::Borrowed(bitmap.as_image())
    };

    imageops::overlay(&mut canvas, &*content, fit.offset_x, fit.offset_y);

    // 整数混合会把 alpha 向下取整，不透明背景下结果必须全部为 255
    if let BackgroundMode::Opaque(_) = options.background {
        for pixel in canvas.pixels_mut() {
            pixel.0[3] = 255;
        }
    }

    Ok(canvas)
}

/// 提取子位图。
///
/// 起点必须位于位图内；宽高超出部分收敛到位图边界。
pub fn crop(bitmap: &Bitmap, rect: CropRect) -> Result<Bitmap, PrepError> {
    let (width, height) = bitmap.dimensions();

    if rect.x >= width || rect.y >= height {
        return Err(PrepError::InvalidInput(format!(
            "裁剪起点 ({}, {}) 超出位图范围 {}x{}",
            rect.x, rect.y, width, height
        )));
    }

    let actual_width = rect.width.min(width - rect.x);
    let actual_height = rect.height.min(height - rect.y);

    if actual_width == 0 || actual_height == 0 {
        return Err(PrepError::InvalidInput("裁剪区域宽高为 0".to_string()));
    }

    let cropped =
        imageops::crop_imm(bitmap.as_image(), rect.x, rect.y, actual_width, actual_height)
            .to_image();

    Bitmap::from_image(cropped)
}

fn background_pixel(mode: BackgroundMode) -> Rgba<u8> {
    match mode {
        BackgroundMode::Opaque(color) => Rgba([color.r, color.g, color.b, 255]),
        BackgroundMode::Transparent => Rgba([0, 0, 0, 0]),
    }
}

fn validate_canvas_limits(fit: &FitResult, config: &PrepConfig) -> Result<(), PrepError> {
    if fit.canvas_width == 0 || fit.canvas_height == 0 {
        return Err(PrepError::InvalidInput(format!(
            "画布尺寸无效：{}x{}",
            fit.canvas_width, fit.canvas_height
        )));
    }

    let pixels = u64::from(fit.canvas_width) * u64::from(fit.canvas_height);
    if pixels > config.max_canvas_pixels {
        return Err(PrepError::ResourceLimit(format!(
            "画布像素过大：{}x{}（限制：{} 像素）",
            fit.canvas_width, fit.canvas_height, config.max_canvas_pixels
        )));
    }

    Ok(())
}

/// 等比缩放由调用方保证，这里只负责缩放到指定尺寸。
fn scale_to(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, PrepError> {
    log::debug!(
        "🧩 缩放源图：{}x{} -> {}x{}（filter={:?}）",
        image.width(),
        image.height(),
        target_width,
        target_height,
        filter
    );

    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize：{}", err);
            Ok(imageops::resize(
                image,
                target_width,
                target_height,
                filter.to_image_filter(),
            ))
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, PrepError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| PrepError::Encode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(filter.to_fast_algorithm());

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PrepError::Encode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| PrepError::Encode("fast_image_resize 输出缓冲长度异常".to_string()))
}
