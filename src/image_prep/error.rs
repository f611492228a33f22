//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片预处理链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 所有操作都是确定性的，任何错误都不应重试：相同输入必然得到相同错误。

/// 图片预处理统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// 尺寸为 0、比例非法、裁剪区域越界等调用方输入问题。
    #[error("输入无效：{0}")]
    InvalidInput(String),

    /// 字节内容不是可识别的图片。
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    /// 文件体积、像素数或画布尺寸超出配置上限。
    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl From<PrepError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: PrepError) -> Self {
        error.to_string()
    }
}
