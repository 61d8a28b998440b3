//! 光圈（D码）描述符
//!
//! 闪光图元只保存D码编号，真实外形由描述符给出。描述符只用于绘制和
//! 信息显示，命中测试不依赖它。解析失败时回退到零尺寸的默认描述符。

use crate::math::Vector2;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// 第一个可用D码（D01-D09 保留给绘图操作）
pub const FIRST_DCODE: u32 = 10;

/// 最后一个可用D码
pub const LAST_DCODE: u32 = 999;

/// D码是否在可用范围内
pub fn is_valid_dcode(code: u32) -> bool {
    (FIRST_DCODE..=LAST_DCODE).contains(&code)
}

/// 光圈外形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApertureShape {
    #[default]
    Circle,
    Rect,
    Oval,
    Polygon,
    Macro,
}

impl ApertureShape {
    pub fn name(&self) -> &'static str {
        match self {
            ApertureShape::Circle => "Round",
            ApertureShape::Rect => "Rect",
            ApertureShape::Oval => "Oval",
            ApertureShape::Polygon => "Poly",
            ApertureShape::Macro => "Macro",
        }
    }
}

/// 光圈描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApertureDescriptor {
    pub code: u32,
    #[serde(default)]
    pub shape: ApertureShape,
    pub size: Vector2,
    /// 多边形光圈的边数
    #[serde(default)]
    pub vertex_count: Option<u32>,
    /// 宏光圈名称
    #[serde(default)]
    pub macro_name: Option<String>,
}

impl ApertureDescriptor {
    pub fn new(code: u32, shape: ApertureShape, size: Vector2) -> Self {
        Self {
            code,
            shape,
            size,
            vertex_count: None,
            macro_name: None,
        }
    }

    /// 是否为解析失败时的占位描述符
    pub fn is_placeholder(&self) -> bool {
        self.code == 0
    }
}

impl Default for ApertureDescriptor {
    fn default() -> Self {
        Self::new(0, ApertureShape::Circle, Vector2::zeros())
    }
}

/// D码解析接口
pub trait ApertureResolver {
    fn resolve(&self, code: u32) -> Option<&ApertureDescriptor>;
}

/// 解析D码，缺失或越界时返回默认描述符
pub fn resolve_or_default(
    resolver: &dyn ApertureResolver,
    code: Option<u32>,
) -> Cow<'_, ApertureDescriptor> {
    code.filter(|c| is_valid_dcode(*c))
        .and_then(|c| resolver.resolve(c))
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(ApertureDescriptor::default()))
}

/// 单个图层的D码表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApertureTable {
    descriptors: HashMap<u32, ApertureDescriptor>,
}

impl ApertureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入描述符，返回被替换的旧描述符
    pub fn insert(&mut self, descriptor: ApertureDescriptor) -> Option<ApertureDescriptor> {
        self.descriptors.insert(descriptor.code, descriptor)
    }

    pub fn get(&self, code: u32) -> Option<&ApertureDescriptor> {
        self.descriptors.get(&code)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}

impl ApertureResolver for ApertureTable {
    fn resolve(&self, code: u32) -> Option<&ApertureDescriptor> {
        self.get(code)
    }
}
