//! 核心错误定义
//!
//! 只覆盖写入方向（插入图元、修改图层配置）的失败。
//! 定位查询本身没有错误：找不到就是 `None`。

use crate::layer::LayerId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Layer {layer} out of range (layer count {count})")]
    LayerOutOfRange { layer: LayerId, count: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}
