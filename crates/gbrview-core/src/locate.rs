//! 定位服务
//!
//! 把一个查询点解析为用户最可能想选中的图元：
//! 1. 先在当前图层（可见且已加载时）中按存储顺序查找，第一个命中即返回
//! 2. 否则按图层编号升序扫描所有可见图层，第一个命中即返回
//!
//! 结果只取"第一个"命中，不比较远近；相同输入总是得到相同结果。

use crate::grid::{GridConfig, GridPolicy, SnapGrid};
use crate::hit_test::{HitTestConfig, HitTester};
use crate::layer::{LayerId, LayeredItemStore};
use crate::math::{BoundingBox2, Point2};
use crate::primitive::Primitive;
use serde::{Deserialize, Serialize};

/// 定位配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateConfig {
    pub grid: GridConfig,
    pub hit_test: HitTestConfig,
    /// 默认当前图层
    pub active_layer: LayerId,
}

/// 定位查询
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateQuery {
    pub point: Point2,
    /// 先吸附到最近的网格点
    #[serde(default)]
    pub snap_to_grid: bool,
    /// 覆盖服务的当前图层
    #[serde(default)]
    pub active_layer: Option<LayerId>,
}

impl LocateQuery {
    pub fn at(point: Point2) -> Self {
        Self {
            point,
            snap_to_grid: false,
            active_layer: None,
        }
    }

    pub fn on_grid(mut self) -> Self {
        self.snap_to_grid = true;
        self
    }

    pub fn on_layer(mut self, layer: LayerId) -> Self {
        self.active_layer = Some(layer);
        self
    }
}

/// 定位结果：指向存储内图元的只读引用，在下一次修改存储前有效
#[derive(Debug, Clone, Copy)]
pub struct LocateHit<'a> {
    pub layer: LayerId,
    /// 图层内索引
    pub index: usize,
    pub primitive: &'a Primitive,
}

impl PartialEq for LocateHit<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer
            && self.index == other.index
            && std::ptr::eq(self.primitive, other.primitive)
    }
}

impl Eq for LocateHit<'_> {}

/// 定位服务
#[derive(Debug, Clone)]
pub struct LocateService<G = SnapGrid> {
    grid: G,
    hit_tester: HitTester,
    active_layer: LayerId,
}

impl LocateService<SnapGrid> {
    pub fn from_config(config: &LocateConfig) -> Self {
        Self::new(SnapGrid::new(config.grid), config.hit_test)
            .with_active_layer(config.active_layer)
    }
}

impl Default for LocateService<SnapGrid> {
    fn default() -> Self {
        Self::from_config(&LocateConfig::default())
    }
}

impl<G: GridPolicy> LocateService<G> {
    pub fn new(grid: G, hit_test: HitTestConfig) -> Self {
        Self {
            grid,
            hit_tester: HitTester::new(hit_test),
            active_layer: 0,
        }
    }

    pub fn with_active_layer(mut self, layer: LayerId) -> Self {
        self.active_layer = layer;
        self
    }

    pub fn active_layer(&self) -> LayerId {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, layer: LayerId) {
        self.active_layer = layer;
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    /// 定位查询点下的图元
    pub fn locate<'s>(
        &self,
        store: &'s LayeredItemStore,
        query: &LocateQuery,
    ) -> Option<LocateHit<'s>> {
        let point = if query.snap_to_grid {
            self.grid.snap_to_nearest_grid(query.point)
        } else {
            query.point
        };
        let active = query.active_layer.unwrap_or(self.active_layer);

        // 未使用的图层也可能被选为当前图层
        if store.is_present(active) && store.is_visible(active) {
            if let Some(hit) = self.scan_layer(store, active, point) {
                tracing::debug!(
                    "Located {} #{} on active layer {} at ({}, {})",
                    hit.primitive.shape_name(),
                    hit.index,
                    active,
                    point.x,
                    point.y
                );
                return Some(hit);
            }
        }

        let hit = (0..store.layer_count())
            .filter(|&layer| store.is_present(layer) && store.is_visible(layer))
            .find_map(|layer| self.scan_layer(store, layer, point));

        match &hit {
            Some(hit) => tracing::debug!(
                "Located {} #{} on layer {} at ({}, {})",
                hit.primitive.shape_name(),
                hit.index,
                hit.layer,
                point.x,
                point.y
            ),
            None => tracing::debug!("Nothing located at ({}, {})", point.x, point.y),
        }

        hit
    }

    /// 框选：所有可见图层中被矩形选中的图元（图层升序、图层内存储顺序）
    pub fn items_in_rect<'s>(
        &self,
        store: &'s LayeredItemStore,
        rect: &BoundingBox2,
    ) -> Vec<LocateHit<'s>> {
        (0..store.layer_count())
            .filter(|&layer| store.is_visible(layer))
            .flat_map(move |layer| {
                store
                    .items_on(layer)
                    .enumerate()
                    .filter(move |(_, item)| self.hit_tester.hit_test_rect(item, rect))
                    .map(move |(index, primitive)| LocateHit {
                        layer,
                        index,
                        primitive,
                    })
            })
            .collect()
    }

    fn scan_layer<'s>(
        &self,
        store: &'s LayeredItemStore,
        layer: LayerId,
        point: Point2,
    ) -> Option<LocateHit<'s>> {
        tracing::trace!("Scanning layer {}", layer);
        store
            .items_on(layer)
            .enumerate()
            .find(|(_, item)| self.hit_tester.hit_test_point(item, point))
            .map(|(index, primitive)| LocateHit {
                layer,
                index,
                primitive,
            })
    }
}
