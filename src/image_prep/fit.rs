//! # 比例适配模块（纯几何）
//!
//! 给定源图尺寸、目标宽高比与最小尺寸，计算最终画布尺寸与居中偏移。
//!
//! # 设计思路
//!
//! - 纯函数化：输入相同必得相同输出，不读取任何配置或状态，便于穷举与属性测试。
//! - 全程使用整数运算：画布宽高与比例严格满足 `canvas_width * den == canvas_height * num`，
//!   而不是“浮点误差范围内相等”。
//! - 先算“仅满足比例的最小包围盒”，再抬升到最小尺寸，最后按比例单位对齐，
//!   每一步只会放大画布，因此源图永远不会被裁切。
//!
//! # 实现步骤
//! 1. 比较源图与目标比例，固定较“宽”的那一维，向上取整推导另一维
//! 2. 依次修正宽度、高度下限
//! 3. 以约分后的比例为单位向上对齐（`units * num` × `units * den`）
//! 4. 计算向下取整的居中偏移

use serde::{Deserialize, Serialize};

use super::PrepError;

/// 目标宽高比（宽:高）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    numerator: u32,
    denominator: u32,
}

impl AspectRatio {
    /// 创建比例，任一项为 0 视为非法。
    ///
    /// # 示例
    /// ```rust
    /// use brand_image_prep::image_prep::AspectRatio;
    ///
    /// let ratio = AspectRatio::new(10, 4)?;
    /// assert_eq!(ratio.reduced(), AspectRatio::new(5, 2)?);
    /// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
    /// ```
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, PrepError> {
        if numerator == 0 || denominator == 0 {
            return Err(PrepError::InvalidInput(format!(
                "宽高比无效：{}:{}（两项都必须大于 0）",
                numerator, denominator
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// 常量比例，仅用于内置变体表的 `const` 项，非法取值在编译期报错。
    pub(crate) const fn fixed(numerator: u32, denominator: u32) -> Self {
        assert!(numerator > 0 && denominator > 0);
        Self {
            numerator,
            denominator,
        }
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// 约分后的最简比例。
    pub fn reduced(&self) -> Self {
        let divisor = gcd(self.numerator, self.denominator);
        Self {
            numerator: self.numerator / divisor,
            denominator: self.denominator / divisor,
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// 几何计算结果。
///
/// `content_*` 为实际绘制到画布上的源图尺寸：仅补边时等于源图尺寸，
/// Favicon 缩放时为缩放后的尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
    pub content_width: u32,
    pub content_height: u32,
}

impl FitResult {
    /// 源图是否需要缩放后再绘制。
    pub fn is_scaled(&self, source_width: u32, source_height: u32) -> bool {
        self.content_width != source_width || self.content_height != source_height
    }
}

/// 计算满足精确比例与最小尺寸、且能完整容纳源图的画布。
///
/// # 参数
/// * `source_width` / `source_height` - 源图尺寸，必须大于 0
/// * `ratio` - 目标宽高比
/// * `min_width` / `min_height` - 最小尺寸，0 表示不限制
///
/// # 后置条件
/// - `canvas_width * ratio.den == canvas_height * ratio.num`（约分后比例）
/// - `canvas_width >= max(min_width, source_width)`
/// - `canvas_height >= max(min_height, source_height)`
/// - `offset_x >= 0 && offset_y >= 0`
///
/// # 示例
/// ```rust
/// use brand_image_prep::image_prep::{AspectRatio, fit};
///
/// let result = fit(800, 200, AspectRatio::new(5, 2)?, 400, 160)?;
/// assert_eq!((result.canvas_width, result.canvas_height), (800, 320));
/// assert_eq!((result.offset_x, result.offset_y), (0, 60));
/// # Ok::<(), brand_image_prep::image_prep::PrepError>(())
/// ```
pub fn fit(
    source_width: u32,
    source_height: u32,
    ratio: AspectRatio,
    min_width: u32,
    min_height: u32,
) -> Result<FitResult, PrepError> {
    if source_width == 0 || source_height == 0 {
        return Err(PrepError::InvalidInput(format!(
            "源图尺寸无效：{}x{}",
            source_width, source_height
        )));
    }

    let ratio = ratio.reduced();
    let num = u64::from(ratio.numerator);
    let den = u64::from(ratio.denominator);
    let sw = u64::from(source_width);
    let sh = u64::from(source_height);
    let min_w = u64::from(min_width);
    let min_h = u64::from(min_height);

    // 步骤 1：仅满足比例的最小包围盒
    let (mut cw, mut ch) = if sw * den > sh * num {
        (sw, (sw * den).div_ceil(num))
    } else {
        ((sh * num).div_ceil(den), sh)
    };

    // 步骤 2：最小尺寸。两次修正都只放大画布，因此先修宽再修高后两者仍同时成立
    if cw < min_w {
        cw = min_w;
        ch = (cw * den).div_ceil(num);
    }
    if ch < min_h {
        ch = min_h;
        cw = (ch * num).div_ceil(den);
    }
    if cw < min_w || ch < min_h {
        return Err(PrepError::InvalidInput(format!(
            "最小尺寸修正后仍不满足下限：{}x{}（下限 {}x{}）",
            cw, ch, min_w, min_h
        )));
    }

    // 步骤 3：按比例单位对齐，消除向上取整带来的比例漂移
    let units = ch.div_ceil(den).max(cw.div_ceil(num));
    let cw = units
        .checked_mul(num)
        .and_then(|value| u32::try_from(value).ok());
    let ch = units
        .checked_mul(den)
        .and_then(|value| u32::try_from(value).ok());
    let (Some(canvas_width), Some(canvas_height)) = (cw, ch) else {
        return Err(PrepError::InvalidInput(format!(
            "画布尺寸溢出：{} 个 {}:{} 单位",
            units, num, den
        )));
    };

    // 步骤 4：居中偏移
    if canvas_width < source_width || canvas_height < source_height {
        return Err(PrepError::InvalidInput(format!(
            "画布 {}x{} 小于源图 {}x{}，拒绝裁切",
            canvas_width, canvas_height, source_width, source_height
        )));
    }

    Ok(FitResult {
        canvas_width,
        canvas_height,
        offset_x: i64::from((canvas_width - source_width) / 2),
        offset_y: i64::from((canvas_height - source_height) / 2),
        content_width: source_width,
        content_height: source_height,
    })
}

/// 固定正方形画布内等比缩放并居中（Favicon 几何）。
///
/// 统一缩放系数为 `min(size / source_width, size / source_height)`，小图同样会被放大。
/// 缩放后的宽高四舍五入，并收敛到 `[1, size]`。
pub fn fit_scaled(
    source_width: u32,
    source_height: u32,
    canvas_size: u32,
) -> Result<FitResult, PrepError> {
    if source_width == 0 || source_height == 0 {
        return Err(PrepError::InvalidInput(format!(
            "源图尺寸无效：{}x{}",
            source_width, source_height
        )));
    }
    if canvas_size == 0 {
        return Err(PrepError::InvalidInput("画布边长必须大于 0".to_string()));
    }

    let size = f64::from(canvas_size);
    let scale = (size / f64::from(source_width)).min(size / f64::from(source_height));

    let content_width = scale_side(source_width, scale, canvas_size);
    let content_height = scale_side(source_height, scale, canvas_size);

    Ok(FitResult {
        canvas_width: canvas_size,
        canvas_height: canvas_size,
        offset_x: i64::from((canvas_size - content_width) / 2),
        offset_y: i64::from((canvas_size - content_height) / 2),
        content_width,
        content_height,
    })
}

fn scale_side(side: u32, scale: f64, limit: u32) -> u32 {
    ((f64::from(side) * scale).round() as u32).clamp(1, limit)
}
