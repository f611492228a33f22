//! # 图片预处理模块（image_prep）
//!
//! ## 设计思路
//!
//! 该模块将“解码 → 裁剪 → 抠图 → 比例适配 → 画布合成 → PNG 编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线（`ImagePrep`）
//! - `variant`：四个固定变体的比例/尺寸/背景策略表
//! - `fit`：纯几何的比例适配算法
//! - `compositor`：背景填充、居中绘制、缩放、裁剪
//! - `keyer`：按颜色距离抠除背景
//! - `codec`：解码/编码边界与资源上限校验
//! - `config/error/source`：配置、错误、数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 上传字节
//!    ↓
//! handler.rs（ImagePrep::prepare，阶段耗时日志）
//!    ├─ codec.rs（签名 + 尺寸上限 + 解码为 RGBA）
//!    ├─ compositor.rs::crop（可选）
//!    ├─ keyer.rs（可选取色抠图）
//!    └─ 每个变体：variant.rs → fit.rs → compositor.rs → codec.rs::encode_png
//!    ↓
//! ProcessedImage（PNG 字节 + FitResult）
//! ```
//!
//! ## 分层职责建议
//!
//! - 新增/调整变体尺寸优先改 `variant.rs`
//! - 限制与画质策略优先改 `config.rs`
//! - 比例算法只改 `fit.rs`，并同步 `tests/fit_properties.rs`

mod codec;
mod compositor;
mod config;
mod error;
mod fit;
mod handler;
mod keyer;
mod source;
mod variant;

pub use codec::{decode, encode_png};
pub use compositor::{compose, crop, render};
pub use config::{PngCompression, PrepConfig, QualityProfile, ResampleFilter};
pub use error::PrepError;
pub use fit::{AspectRatio, FitResult, fit, fit_scaled};
pub use handler::ImagePrep;
pub use keyer::key_out;
pub use source::{
    BackgroundMode, Bitmap, CropRect, KeyingSpec, LogoOptions, LogoVariants, OutputFormat,
    PrepOutput, PrepRequest, PrepTarget, ProcessedImage, RenderOptions, Rgb,
};
pub use variant::{BackgroundPolicy, Sizing, VariantKind};
