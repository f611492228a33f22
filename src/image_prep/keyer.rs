//! # 取色抠图模块
//!
//! 逐像素计算与目标颜色的 RGB 欧氏距离，距离严格小于容差的像素 alpha 置 0，其余保持不变。
//!
//! 不使用任何邻域信息：前景内部与背景同色的孤立像素也会被抠掉。
//! 这是朴素取色法的已知局限，调用方可通过降低容差缓解。

use super::source::{Bitmap, KeyingSpec};

/// 按取色参数抠除背景，返回同尺寸位图（仅 alpha 通道可能变化）。
///
/// # 示例
/// ```rust
/// use brand_image_prep::image_prep::{Bitmap, KeyingSpec, Rgb, key_out};
///
/// let bitmap = Bitmap::from_rgba(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 255])?;
/// let keyed = key_out(bitmap, &KeyingSpec::new(Rgb::WHITE, 10.0)?);
/// assert_eq!(keyed.pixels()[3], 0);
/// assert_eq!(keyed.pixels()[7], 255);
/// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
/// ```
pub fn key_out(mut bitmap: Bitmap, spec: &KeyingSpec) -> Bitmap {
    let target = spec.target();
    let tolerance = spec.tolerance();
    let mut keyed = 0usize;

    for pixel in bitmap.image_mut().pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let distance_sq = channel_delta_sq(r, target.r)
            + channel_delta_sq(g, target.g)
            + channel_delta_sq(b, target.b);

        if f64::from(distance_sq).sqrt() < tolerance {
            pixel.0[3] = 0;
            keyed += 1;
        }
    }

    log::debug!(
        "取色抠图完成 - 目标色 ({}, {}, {}) 容差 {} 抠除 {}/{} 像素",
        target.r,
        target.g,
        target.b,
        tolerance,
        keyed,
        u64::from(bitmap.width()) * u64::from(bitmap.height())
    );

    bitmap
}

fn channel_delta_sq(a: u8, b: u8) -> u32 {
    let delta = u32::from(a.abs_diff(b));
    delta * delta
}
