//! 网格策略
//!
//! 定位查询在"光标吸附网格"模式下先把查询点量化到最近的网格点。

use crate::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 网格吸附接口
pub trait GridPolicy {
    fn snap_to_nearest_grid(&self, point: Point2) -> Point2;
}

impl<F> GridPolicy for F
where
    F: Fn(Point2) -> Point2,
{
    fn snap_to_nearest_grid(&self, point: Point2) -> Point2 {
        self(point)
    }
}

/// 网格配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// 网格间距（x/y 可不同），非正值表示该方向不吸附
    pub spacing: Vector2,
    /// 网格原点
    pub origin: Point2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: Vector2::new(100, 100),
            origin: Point2::origin(),
        }
    }
}

/// 规则矩形网格
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapGrid {
    config: GridConfig,
}

impl SnapGrid {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

/// 按间距四舍五入（远离零方向取整）
fn snap_axis(value: i64, origin: i64, spacing: i64) -> i64 {
    if spacing <= 0 {
        return value;
    }
    let steps = ((value - origin) as f64 / spacing as f64).round() as i64;
    origin + steps * spacing
}

impl GridPolicy for SnapGrid {
    fn snap_to_nearest_grid(&self, point: Point2) -> Point2 {
        let GridConfig { spacing, origin } = self.config;
        Point2::new(
            snap_axis(point.x, origin.x, spacing.x),
            snap_axis(point.y, origin.y, spacing.y),
        )
    }
}
