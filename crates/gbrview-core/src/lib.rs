//! GbrView 核心几何引擎
//!
//! 提供光绘图元、命中测试、包围盒和分层定位功能。
//!
//! # 架构设计
//!
//! - `Primitive`: 单个可绘制、可选中的图元（线段、圆弧、圆、闪光焊盘、多边形）
//! - `HitTester`: 点/矩形与图元的命中判断
//! - `LayeredItemStore`: 按图层组织的有序图元存储，带可见性配置
//! - `LocateService`: 当前图层优先、再按图层升序的定位搜索
//!
//! # 示例
//!
//! ```rust
//! use gbrview_core::prelude::*;
//!
//! let mut store = LayeredItemStore::default();
//! store
//!     .insert(Primitive::segment(0, Point2::new(0, 0), Point2::new(100, 0), 10))
//!     .unwrap();
//!
//! let service = LocateService::from_config(&LocateConfig::default());
//! let hit = service.locate(&store, &LocateQuery::at(Point2::new(50, 3)));
//! assert_eq!(hit.map(|h| h.primitive.shape_name()), Some("Line"));
//! ```

pub mod aperture;
pub mod error;
pub mod grid;
pub mod info;
pub mod layer;
pub mod locate;
pub mod math;
pub mod primitive;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::aperture::{
        resolve_or_default, ApertureDescriptor, ApertureResolver, ApertureShape, ApertureTable,
    };
    pub use crate::error::CoreError;
    pub use crate::grid::{GridConfig, GridPolicy, SnapGrid};
    pub use crate::hit_test::{HitTestConfig, HitTester};
    pub use crate::info::{msg_panel_info, MsgPanelItem};
    pub use crate::layer::{LayerConfig, LayerId, LayeredItemStore};
    pub use crate::locate::{LocateConfig, LocateHit, LocateQuery, LocateService};
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::primitive::{Primitive, Shape, ShapeKind, SpotShape, Transform};
}
