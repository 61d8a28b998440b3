//! 数学基础类型
//!
//! 绘图单位为整数（与光绘文件坐标一致），距离计算统一在 `f64` 中完成。

use serde::{Deserialize, Serialize};

/// 二维整数点
pub type Point2 = nalgebra::Point2<i64>;

/// 二维整数向量（位移、尺寸）
pub type Vector2 = nalgebra::Vector2<i64>;

/// 转换为浮点向量
#[inline]
pub fn to_f64(v: Vector2) -> nalgebra::Vector2<f64> {
    nalgebra::Vector2::new(v.x as f64, v.y as f64)
}

/// 两点间距离的平方
#[inline]
pub fn distance_squared(a: Point2, b: Point2) -> f64 {
    to_f64(b - a).norm_squared()
}

/// 点到线段 `[a, b]` 距离的平方
///
/// 投影参数被钳制到线段范围内；零长度线段退化为点到 `a` 的距离。
pub fn segment_distance_squared(point: Point2, a: Point2, b: Point2) -> f64 {
    let v = to_f64(b - a);
    let w = to_f64(point - a);

    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return w.norm_squared();
    }

    let c2 = v.dot(&v);
    if c2 <= c1 {
        return to_f64(point - b).norm_squared();
    }

    let t = c1 / c2;
    (w - v * t).norm_squared()
}

/// 轴对齐包围盒（闭区间，`min`/`max` 均包含在内）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 由任意两个对角点创建（自动规范化）
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 以 `origin` 为左下角、`size` 为范围创建
    pub fn from_origin_size(origin: Point2, size: Vector2) -> Self {
        Self::new(origin, origin + size)
    }

    /// 空包围盒（不包含任何点）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(i64::MAX, i64::MAX),
            max: Point2::new(i64::MIN, i64::MIN),
        }
    }

    /// 由点集创建；点集为空时返回 `None`
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        (!bbox.is_empty()).then_some(bbox)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    /// 点是否在包围盒内（含边界）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 两个包围盒是否相交（含边界接触）
    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并另一个包围盒
    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox2 {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// 向四周扩张 `dx`/`dy`
    pub fn inflate(&self, dx: i64, dy: i64) -> BoundingBox2 {
        BoundingBox2 {
            min: Point2::new(self.min.x - dx, self.min.y - dy),
            max: Point2::new(self.max.x + dx, self.max.y + dy),
        }
    }

    pub fn translate(&self, offset: Vector2) -> BoundingBox2 {
        BoundingBox2 {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}
