//! 分层图元存储
//!
//! 每个图层一个有序图元序列（插入顺序 = 绘制顺序 = 搜索顺序），
//! 加上独立的图层配置（名称、可见性、负片）。
//! 图层的图元序列在第一次插入时才创建；未使用的图层等同于空的不可见图层。
//!
//! 写操作需要 `&mut self`，因此一次定位调用期间不会观察到半更新的图层。

use crate::aperture::ApertureTable;
use crate::error::CoreError;
use crate::math::BoundingBox2;
use crate::primitive::{Primitive, Transform};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 图层编号
pub type LayerId = usize;

/// 默认图层容量
pub const DEFAULT_LAYER_COUNT: usize = 32;

/// 图层配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// 图层名称（为空时显示 "Layer N"）
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// 图层负片
    #[serde(default)]
    pub negative: bool,
}

fn default_visible() -> bool {
    true
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            visible: true,
            negative: false,
        }
    }
}

/// 一个图层已加载的内容
#[derive(Debug, Clone, Default)]
struct LayerImage {
    items: Vec<Primitive>,
    apertures: ApertureTable,
}

/// 分层图元存储
#[derive(Debug, Clone)]
pub struct LayeredItemStore {
    configs: Vec<LayerConfig>,
    images: Vec<Option<LayerImage>>,
    /// 整幅图像负片
    image_negative: bool,
}

impl LayeredItemStore {
    /// 创建指定图层容量的存储
    pub fn new(layer_count: usize) -> Self {
        Self {
            configs: vec![LayerConfig::default(); layer_count],
            images: vec![None; layer_count],
            image_negative: false,
        }
    }

    /// 图层容量（"所有图层"扫描的上界）
    pub fn layer_count(&self) -> usize {
        self.configs.len()
    }

    fn check_layer(&self, layer: LayerId) -> Result<(), CoreError> {
        if layer < self.layer_count() {
            Ok(())
        } else {
            Err(CoreError::LayerOutOfRange {
                layer,
                count: self.layer_count(),
            })
        }
    }

    fn image(&self, layer: LayerId) -> Option<&LayerImage> {
        self.images.get(layer).and_then(Option::as_ref)
    }

    fn image_mut(&mut self, layer: LayerId) -> Result<&mut LayerImage, CoreError> {
        self.check_layer(layer)?;
        Ok(self.images[layer].get_or_insert_with(LayerImage::default))
    }

    /// 图层是否已有内容（曾经插入过图元或D码）
    pub fn is_present(&self, layer: LayerId) -> bool {
        self.image(layer).is_some()
    }

    /// 图层是否可见（越界视为不可见）
    pub fn is_visible(&self, layer: LayerId) -> bool {
        self.configs.get(layer).is_some_and(|c| c.visible)
    }

    pub fn set_visible(&mut self, layer: LayerId, visible: bool) -> Result<(), CoreError> {
        self.config_mut(layer)?.visible = visible;
        Ok(())
    }

    pub fn config(&self, layer: LayerId) -> Option<&LayerConfig> {
        self.configs.get(layer)
    }

    pub fn config_mut(&mut self, layer: LayerId) -> Result<&mut LayerConfig, CoreError> {
        self.check_layer(layer)?;
        Ok(&mut self.configs[layer])
    }

    /// 图层显示名称
    pub fn layer_name(&self, layer: LayerId) -> Cow<'_, str> {
        match self.configs.get(layer) {
            Some(config) if !config.name.is_empty() => Cow::Borrowed(config.name.as_str()),
            _ => Cow::Owned(format!("Layer {}", layer + 1)),
        }
    }

    pub fn image_negative(&self) -> bool {
        self.image_negative
    }

    pub fn set_image_negative(&mut self, negative: bool) {
        self.image_negative = negative;
    }

    /// 图元是否以背景色绘制（图元、图层、图像三个负片标志的异或）
    pub fn draws_erased(&self, primitive: &Primitive) -> bool {
        let layer_negative = self
            .configs
            .get(primitive.layer)
            .is_some_and(|c| c.negative);
        primitive.negative_draw ^ layer_negative ^ self.image_negative
    }

    /// 插入图元到其所属图层末尾，返回图层内索引
    pub fn insert(&mut self, primitive: Primitive) -> Result<usize, CoreError> {
        primitive.validate()?;
        let image = self.image_mut(primitive.layer)?;
        image.items.push(primitive);
        Ok(image.items.len() - 1)
    }

    /// 图层内的图元（按插入顺序；未使用的图层为空序列）
    pub fn items_on(&self, layer: LayerId) -> impl Iterator<Item = &Primitive> + Clone + '_ {
        self.image(layer)
            .map(|image| image.items.as_slice())
            .unwrap_or_default()
            .iter()
    }

    pub fn get(&self, layer: LayerId, index: usize) -> Option<&Primitive> {
        self.image(layer).and_then(|image| image.items.get(index))
    }

    /// 变换单个图元
    pub fn transform_item(&mut self, layer: LayerId, index: usize, transform: &Transform) -> bool {
        match self
            .images
            .get_mut(layer)
            .and_then(Option::as_mut)
            .and_then(|image| image.items.get_mut(index))
        {
            Some(item) => {
                item.apply(transform);
                true
            }
            None => false,
        }
    }

    /// 变换整个图层，返回变换的图元数
    pub fn transform_layer(&mut self, layer: LayerId, transform: &Transform) -> usize {
        let Some(image) = self.images.get_mut(layer).and_then(Option::as_mut) else {
            return 0;
        };
        image.items.iter_mut().for_each(|item| item.apply(transform));
        tracing::debug!(
            "Applied {:?} to {} items on layer {}",
            transform,
            image.items.len(),
            layer
        );
        image.items.len()
    }

    /// 图层的D码表
    pub fn apertures(&self, layer: LayerId) -> Option<&ApertureTable> {
        self.image(layer).map(|image| &image.apertures)
    }

    pub fn apertures_mut(&mut self, layer: LayerId) -> Result<&mut ApertureTable, CoreError> {
        Ok(&mut self.image_mut(layer)?.apertures)
    }

    pub fn item_count(&self) -> usize {
        self.images.iter().flatten().map(|image| image.items.len()).sum()
    }

    /// 图层内所有图元包围盒的并集
    pub fn layer_bounding_box(&self, layer: LayerId) -> Option<BoundingBox2> {
        self.items_on(layer)
            .map(Primitive::bounding_box)
            .reduce(|acc, bbox| acc.union(&bbox))
    }

    /// 卸载单个图层（重新加载文件时使用），保留图层配置
    pub fn clear_layer(&mut self, layer: LayerId) {
        if let Some(slot) = self.images.get_mut(layer) {
            if slot.take().is_some() {
                tracing::info!("Cleared layer {}", layer);
            }
        }
    }

    /// 卸载所有图层，保留图层配置
    pub fn clear(&mut self) {
        let count = self.item_count();
        self.images.iter_mut().for_each(|slot| *slot = None);
        tracing::info!("Cleared {} items from {} layers", count, self.layer_count());
    }
}

impl Default for LayeredItemStore {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aperture::{ApertureDescriptor, ApertureShape};
    use crate::math::{Point2, Vector2};
    use crate::primitive::SpotShape;

    fn seg(layer: LayerId, x: i64) -> Primitive {
        Primitive::segment(layer, Point2::new(x, 0), Point2::new(x + 10, 0), 2)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut store = LayeredItemStore::default();
        assert_eq!(store.insert(seg(3, 0)).unwrap(), 0);
        assert_eq!(store.insert(seg(3, 100)).unwrap(), 1);
        assert_eq!(store.insert(seg(3, 50)).unwrap(), 2);

        let xs: Vec<i64> = store.items_on(3).map(|p| p.start.x).collect();
        assert_eq!(xs, vec![0, 100, 50]);
        assert_eq!(store.get(3, 1).map(|p| p.start.x), Some(100));
        assert_eq!(store.item_count(), 3);
    }

    #[test]
    fn test_items_on_is_restartable() {
        let mut store = LayeredItemStore::default();
        store.insert(seg(0, 0)).unwrap();
        store.insert(seg(0, 20)).unwrap();

        let iter = store.items_on(0);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_unused_layer_is_empty() {
        let store = LayeredItemStore::default();
        assert!(!store.is_present(5));
        assert_eq!(store.items_on(5).count(), 0);
        assert_eq!(store.items_on(500).count(), 0);
        assert!(store.layer_bounding_box(5).is_none());
    }

    #[test]
    fn test_out_of_range_layer_rejected() {
        let mut store = LayeredItemStore::new(4);
        assert_eq!(
            store.insert(seg(4, 0)),
            Err(CoreError::LayerOutOfRange { layer: 4, count: 4 })
        );
        assert!(store.set_visible(9, false).is_err());
        assert!(!store.is_visible(9));
    }

    #[test]
    fn test_visibility() {
        let mut store = LayeredItemStore::default();
        assert!(store.is_visible(0));
        store.set_visible(0, false).unwrap();
        assert!(!store.is_visible(0));
    }

    #[test]
    fn test_layer_name() {
        let mut store = LayeredItemStore::default();
        assert_eq!(store.layer_name(0), "Layer 1");
        store.config_mut(0).unwrap().name = "F.Cu".to_string();
        assert_eq!(store.layer_name(0), "F.Cu");
    }

    #[test]
    fn test_draws_erased() {
        let mut store = LayeredItemStore::default();
        let plain = seg(1, 0);
        let erased = seg(1, 0).with_negative_draw(true);
        assert!(!store.draws_erased(&plain));
        assert!(store.draws_erased(&erased));

        store.config_mut(1).unwrap().negative = true;
        assert!(store.draws_erased(&plain));
        assert!(!store.draws_erased(&erased));

        store.set_image_negative(true);
        assert!(!store.draws_erased(&plain));
    }

    #[test]
    fn test_clear_keeps_config() {
        let mut store = LayeredItemStore::default();
        store.insert(seg(2, 0)).unwrap();
        store
            .apertures_mut(2)
            .unwrap()
            .insert(ApertureDescriptor::new(10, ApertureShape::Oval, Vector2::new(4, 2)));
        store.set_visible(2, false).unwrap();

        store.clear_layer(2);
        assert!(!store.is_present(2));
        assert!(store.apertures(2).is_none());
        assert!(!store.is_visible(2));

        store.insert(seg(2, 0)).unwrap();
        store.insert(seg(7, 0)).unwrap();
        store.clear();
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_transform_layer() {
        let mut store = LayeredItemStore::default();
        store.insert(seg(1, 0)).unwrap();
        store.insert(seg(1, 30)).unwrap();

        let moved = store.transform_layer(1, &Transform::Move(Vector2::new(0, 5)));
        assert_eq!(moved, 2);
        assert!(store.items_on(1).all(|p| p.start.y == 5 && p.layer == 1));

        assert!(store.transform_item(
            1,
            0,
            &Transform::Rotate { center: Point2::origin(), clockwise: false }
        ));
        assert_eq!(store.get(1, 0).map(|p| p.start), Some(Point2::new(-5, 0)));
        assert!(!store.transform_item(1, 9, &Transform::Move(Vector2::new(1, 1))));
        assert_eq!(store.transform_layer(6, &Transform::Move(Vector2::new(1, 1))), 0);
    }

    #[test]
    fn test_layer_bounding_box() {
        let mut store = LayeredItemStore::default();
        store
            .insert(Primitive::flash(0, SpotShape::Circle, Point2::new(0, 0), Vector2::new(10, 10)))
            .unwrap();
        store
            .insert(Primitive::flash(
                0,
                SpotShape::Circle,
                Point2::new(100, 50),
                Vector2::new(10, 10),
            ))
            .unwrap();

        let bbox = store.layer_bounding_box(0).unwrap();
        assert_eq!(bbox.min, Point2::new(-5, -5));
        assert_eq!(bbox.max, Point2::new(106, 56));
    }
}
