//! 演示场景
//!
//! JSON 描述的图层、图元、D码表和定位查询。只用于演示，不是光绘文件解析器。

use anyhow::{Context, Result};
use gbrview_core::prelude::*;
use serde::Deserialize;
use std::path::Path;

fn default_layer_count() -> usize {
    gbrview_core::layer::DEFAULT_LAYER_COUNT
}

/// 场景文件内容
#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub config: LocateConfig,
    #[serde(default = "default_layer_count")]
    pub layer_count: usize,
    #[serde(default)]
    pub image_negative: bool,
    #[serde(default)]
    pub layers: Vec<SceneLayer>,
    #[serde(default)]
    pub queries: Vec<LocateQuery>,
}

/// 场景中的一个图层
#[derive(Debug, Deserialize)]
pub struct SceneLayer {
    pub index: LayerId,
    #[serde(flatten)]
    pub config: LayerConfig,
    #[serde(default)]
    pub apertures: Vec<ApertureDescriptor>,
    #[serde(default)]
    pub items: Vec<Primitive>,
}

impl Scene {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        let scene = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene {}", path.display()))?;
        Ok(scene)
    }

    /// 内置演示场景
    pub fn demo() -> Self {
        let pad = Vector2::new(60, 60);
        let top = SceneLayer {
            index: 0,
            config: LayerConfig {
                name: "F.Cu".to_string(),
                ..LayerConfig::default()
            },
            apertures: vec![ApertureDescriptor::new(10, ApertureShape::Circle, pad)],
            items: vec![
                Primitive::segment(0, Point2::new(0, 0), Point2::new(1000, 0), 20),
                Primitive::flash(0, SpotShape::Circle, Point2::new(1000, 0), pad).with_aperture(10),
                Primitive::arc(
                    0,
                    Point2::new(1500, 0),
                    Point2::new(1000, 500),
                    Point2::new(1000, 0),
                    20,
                ),
            ],
        };
        let bottom = SceneLayer {
            index: 1,
            config: LayerConfig {
                name: "B.Cu".to_string(),
                ..LayerConfig::default()
            },
            apertures: Vec::new(),
            items: vec![Primitive::polygon(
                1,
                vec![
                    Point2::new(200, -200),
                    Point2::new(800, -200),
                    Point2::new(800, 200),
                    Point2::new(200, 200),
                ],
            )],
        };

        Self {
            config: LocateConfig::default(),
            layer_count: default_layer_count(),
            image_negative: false,
            layers: vec![top, bottom],
            queries: vec![
                LocateQuery::at(Point2::new(500, 8)),
                LocateQuery::at(Point2::new(500, 150)),
                LocateQuery::at(Point2::new(1020, 20)),
                LocateQuery::at(Point2::new(1353, 353)),
                LocateQuery::at(Point2::new(5000, 5000)),
            ],
        }
    }

    /// 构建图元存储，图元的图层以所在场景图层为准
    pub fn build_store(&self) -> Result<LayeredItemStore> {
        let mut store = LayeredItemStore::new(self.layer_count);
        store.set_image_negative(self.image_negative);

        for layer in &self.layers {
            *store
                .config_mut(layer.index)
                .with_context(|| format!("Invalid layer in scene: {}", layer.index))? =
                layer.config.clone();

            let apertures = store.apertures_mut(layer.index)?;
            for descriptor in &layer.apertures {
                apertures.insert(descriptor.clone());
            }

            for item in &layer.items {
                let mut item = item.clone();
                item.layer = layer.index;
                store.insert(item)?;
            }
        }

        tracing::info!(
            "Built store with {} items on {} layers",
            store.item_count(),
            self.layers.len()
        );
        Ok(store)
    }
}
