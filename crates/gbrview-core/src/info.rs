//! 信息面板条目
//!
//! 定位成功后展示图元的类型、图层和D码。

use crate::aperture::{
    is_valid_dcode, resolve_or_default, ApertureDescriptor, ApertureResolver, ApertureShape,
};
use crate::layer::LayeredItemStore;
use crate::primitive::Primitive;
use serde::Serialize;

/// D码缺失时的占位文本
pub const MISSING_DCODE_LABEL: &str = "--";

/// 信息面板的一个键值条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MsgPanelItem {
    pub label: &'static str,
    pub value: String,
}

impl MsgPanelItem {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// 光圈描述文本，例如 `Rect 30 x 15`、`Poly 6 40 x 40`、`Macro THERMAL 50 x 50`
fn aperture_label(descriptor: &ApertureDescriptor) -> String {
    let mut label = descriptor.shape.name().to_string();
    match descriptor.shape {
        ApertureShape::Polygon => {
            if let Some(count) = descriptor.vertex_count {
                label.push_str(&format!(" {}", count));
            }
        }
        ApertureShape::Macro => {
            if let Some(name) = &descriptor.macro_name {
                label.push_str(&format!(" {}", name));
            }
        }
        _ => {}
    }
    format!("{} {} x {}", label, descriptor.size.x, descriptor.size.y)
}

/// 生成图元的信息面板条目
///
/// D码通过 `resolver` 解析；解析失败时显示占位文本，不输出光圈条目。
pub fn msg_panel_info(
    primitive: &Primitive,
    store: &LayeredItemStore,
    resolver: &dyn ApertureResolver,
) -> Vec<MsgPanelItem> {
    let descriptor = resolve_or_default(resolver, primitive.aperture);

    let dcode = match primitive.aperture {
        Some(code) if is_valid_dcode(code) && !descriptor.is_placeholder() => format!("D{}", code),
        _ => MISSING_DCODE_LABEL.to_string(),
    };

    let mut items = vec![
        MsgPanelItem::new("Type", primitive.shape_name()),
        MsgPanelItem::new("Layer", store.layer_name(primitive.layer())),
        MsgPanelItem::new("D Code", dcode),
    ];

    if primitive.is_flashed() && !descriptor.is_placeholder() {
        items.push(MsgPanelItem::new("Aperture", aperture_label(&descriptor)));
    }

    items
}
