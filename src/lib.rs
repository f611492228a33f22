//! # Logo / 证件照图片预处理 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            调用方（上传 / 预览 / 下载界面）              │
//! │   上传字节 ──────────────┐        ┌──── PNG / Data URL   │
//! └──────────────────────────┼────────┼──────────────────────┘
//!                            ↓        ↑
//! ┌──────────────────────────┼────────┼──────────────────────┐
//! │  image_prep::ImagePrep（编排，全有或全无）               │
//! │    ├─ codec       解码·编码·资源上限                     │
//! │    ├─ keyer       取色抠图                               │
//! │    ├─ variant     横版 / 方形 / Favicon / 证件照         │
//! │    ├─ fit         精确比例 + 最小尺寸 + 居中偏移         │
//! │    └─ compositor  填充·绘制·缩放·裁剪                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! 所有操作都是同步、无共享状态的纯内存变换，可在多线程中独立运行。

pub mod image_prep;
