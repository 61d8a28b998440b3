//! 光绘图元定义
//!
//! 支持的图元：
//! - 线段 (Segment)
//! - 圆弧 (Arc)
//! - 圆 (Circle)
//! - 闪光焊盘 (SpotCircle / SpotRect / SpotOval / SpotPolygon / SpotMacro)
//! - 多边形区域 (Polygon)

use crate::error::CoreError;
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::layer::LayerId;
use serde::{Deserialize, Serialize};

/// 图元类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Segment,
    Arc,
    Circle,
    SpotCircle,
    SpotRect,
    SpotOval,
    SpotPolygon,
    SpotMacro,
    Polygon,
}

impl ShapeKind {
    /// 获取类型名称（信息面板显示用）
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Segment => "Line",
            ShapeKind::Arc => "Arc",
            ShapeKind::Circle => "Circle",
            ShapeKind::SpotCircle => "spot_circle",
            ShapeKind::SpotRect => "spot_rect",
            ShapeKind::SpotOval => "spot_oval",
            ShapeKind::SpotPolygon => "spot_poly",
            ShapeKind::SpotMacro => "apt_macro",
            ShapeKind::Polygon => "polygon",
        }
    }

    /// 是否为闪光图元
    pub fn is_flashed(&self) -> bool {
        matches!(
            self,
            ShapeKind::SpotCircle
                | ShapeKind::SpotRect
                | ShapeKind::SpotOval
                | ShapeKind::SpotPolygon
                | ShapeKind::SpotMacro
        )
    }
}

/// 闪光焊盘的外形（多边形焊盘单独携带角点，见 [`Shape::SpotPolygon`]）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpotShape {
    Circle,
    Rect,
    Oval,
    Macro,
}

/// 图元几何
///
/// 形状相关的数据只存在于对应的变体中：圆弧圆心只属于 `Arc`，
/// 角点序列只属于 `SpotPolygon` 和 `Polygon`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Segment,
    /// 从起点逆时针扫到终点；起点与终点重合时为整圆
    Arc { center: Point2 },
    /// 圆心为起点，半径为起点到终点的距离
    Circle,
    Spot(SpotShape),
    SpotPolygon { corners: Vec<Point2> },
    Polygon { corners: Vec<Point2> },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Segment => ShapeKind::Segment,
            Shape::Arc { .. } => ShapeKind::Arc,
            Shape::Circle => ShapeKind::Circle,
            Shape::Spot(SpotShape::Circle) => ShapeKind::SpotCircle,
            Shape::Spot(SpotShape::Rect) => ShapeKind::SpotRect,
            Shape::Spot(SpotShape::Oval) => ShapeKind::SpotOval,
            Shape::Spot(SpotShape::Macro) => ShapeKind::SpotMacro,
            Shape::SpotPolygon { .. } => ShapeKind::SpotPolygon,
            Shape::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// 多边形角点（非多边形图元返回空切片）
    pub fn corners(&self) -> &[Point2] {
        match self {
            Shape::SpotPolygon { corners } | Shape::Polygon { corners } => corners,
            _ => &[],
        }
    }
}

/// 图元变换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    Move(Vector2),
    MirrorHorizontal(Point2),
    MirrorVertical(Point2),
    /// 绕中心旋转 90 度
    Rotate { center: Point2, clockwise: bool },
}

/// 光绘图元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub start: Point2,
    pub end: Point2,
    /// 线宽（线类图元只使用 x）或闪光焊盘的外形尺寸
    pub size: Vector2,
    pub layer: LayerId,
    /// D码引用（光圈描述符由外部解析）
    #[serde(default)]
    pub aperture: Option<u32>,
    /// 以背景色绘制（擦除），不影响命中测试
    #[serde(default)]
    pub negative_draw: bool,
}

impl Primitive {
    fn with_shape(shape: Shape, layer: LayerId, start: Point2, end: Point2, size: Vector2) -> Self {
        Self {
            shape,
            start,
            end,
            size,
            layer,
            aperture: None,
            negative_draw: false,
        }
    }

    /// 创建线段
    pub fn segment(layer: LayerId, start: Point2, end: Point2, width: i64) -> Self {
        Self::with_shape(Shape::Segment, layer, start, end, Vector2::new(width, width))
    }

    /// 创建圆弧
    pub fn arc(layer: LayerId, start: Point2, end: Point2, center: Point2, width: i64) -> Self {
        Self::with_shape(
            Shape::Arc { center },
            layer,
            start,
            end,
            Vector2::new(width, width),
        )
    }

    /// 创建圆（`edge` 为圆周上的任意一点）
    pub fn circle(layer: LayerId, center: Point2, edge: Point2, width: i64) -> Self {
        Self::with_shape(Shape::Circle, layer, center, edge, Vector2::new(width, width))
    }

    /// 创建闪光焊盘
    pub fn flash(layer: LayerId, spot: SpotShape, position: Point2, size: Vector2) -> Self {
        Self::with_shape(Shape::Spot(spot), layer, position, position, size)
    }

    /// 创建多边形闪光焊盘
    pub fn spot_polygon(
        layer: LayerId,
        position: Point2,
        size: Vector2,
        corners: Vec<Point2>,
    ) -> Self {
        Self::with_shape(Shape::SpotPolygon { corners }, layer, position, position, size)
    }

    /// 创建多边形区域（起点、终点取第一个角点）
    pub fn polygon(layer: LayerId, corners: Vec<Point2>) -> Self {
        let anchor = corners.first().copied().unwrap_or_else(Point2::origin);
        Self::with_shape(
            Shape::Polygon { corners },
            layer,
            anchor,
            anchor,
            Vector2::zeros(),
        )
    }

    /// 设置D码
    pub fn with_aperture(mut self, code: u32) -> Self {
        self.aperture = Some(code);
        self
    }

    /// 设置擦除绘制
    pub fn with_negative_draw(mut self, negative: bool) -> Self {
        self.negative_draw = negative;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn is_flashed(&self) -> bool {
        self.kind().is_flashed()
    }

    /// 类型名称（信息面板显示用）
    pub fn shape_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn corners(&self) -> &[Point2] {
        self.shape.corners()
    }

    /// 圆弧圆心（仅圆弧有效）
    pub fn arc_center(&self) -> Option<Point2> {
        match self.shape {
            Shape::Arc { center } => Some(center),
            _ => None,
        }
    }

    /// 检查几何数据是否合法
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.size.x < 0 || self.size.y < 0 {
            return Err(CoreError::InvalidGeometry(format!(
                "negative size ({}, {}) on {}",
                self.size.x,
                self.size.y,
                self.shape_name()
            )));
        }
        Ok(())
    }

    /// 获取包围盒
    ///
    /// 非多边形图元以起点为中心、按尺寸的一半扩张，再加 1 个单位，
    /// 保证零尺寸图元仍可被拾取。这是粗略剔除用的近似值，
    /// 对圆弧、圆和线段终点并不精确。
    pub fn bounding_box(&self) -> BoundingBox2 {
        if let Some(bbox) = BoundingBox2::from_points(self.corners().iter().copied()) {
            return BoundingBox2 {
                min: bbox.min,
                max: Point2::new(
                    bbox.max.x.max(bbox.min.x + 1),
                    bbox.max.y.max(bbox.min.y + 1),
                ),
            };
        }

        let half_x = self.size.x / 2;
        let half_y = self.size.y / 2;
        BoundingBox2::from_origin_size(self.start, Vector2::new(1, 1)).inflate(half_x, half_y)
    }

    /// 对所有定义点应用同一个变换
    fn map_points(&mut self, f: impl Fn(Point2) -> Point2) {
        self.start = f(self.start);
        self.end = f(self.end);
        match &mut self.shape {
            Shape::Arc { center } => *center = f(*center),
            Shape::SpotPolygon { corners } | Shape::Polygon { corners } => {
                for corner in corners.iter_mut() {
                    *corner = f(*corner);
                }
            }
            _ => {}
        }
    }

    /// 镜像会翻转圆弧的绕行方向，交换端点以保持逆时针约定
    fn restore_arc_direction(&mut self) {
        if matches!(self.shape, Shape::Arc { .. }) {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    /// 平移
    pub fn move_by(&mut self, offset: Vector2) {
        self.map_points(|p| p + offset);
    }

    /// 以过 `center` 的竖直线为轴水平镜像（x 取反）
    pub fn mirror_horizontal(&mut self, center: Point2) {
        self.map_points(|p| Point2::new(2 * center.x - p.x, p.y));
        self.restore_arc_direction();
    }

    /// 以过 `center` 的水平线为轴垂直镜像（y 取反）
    pub fn mirror_vertical(&mut self, center: Point2) {
        self.map_points(|p| Point2::new(p.x, 2 * center.y - p.y));
        self.restore_arc_direction();
    }

    /// 应用变换
    pub fn apply(&mut self, transform: &Transform) {
        match *transform {
            Transform::Move(offset) => self.move_by(offset),
            Transform::MirrorHorizontal(center) => self.mirror_horizontal(center),
            Transform::MirrorVertical(center) => self.mirror_vertical(center),
            Transform::Rotate { center, clockwise } => self.rotate(center, clockwise),
        }
    }

    /// 绕 `center` 旋转 90 度
    ///
    /// 坐标系 y 轴向上。闪光焊盘的外形尺寸随之交换 x/y。
    pub fn rotate(&mut self, center: Point2, clockwise: bool) {
        self.map_points(|p| {
            let d = p - center;
            if clockwise {
                Point2::new(center.x + d.y, center.y - d.x)
            } else {
                Point2::new(center.x - d.y, center.y + d.x)
            }
        });
        if self.is_flashed() {
            self.size = Vector2::new(self.size.y, self.size.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_polygon() -> Primitive {
        Primitive::polygon(
            2,
            vec![Point2::new(0, 0), Point2::new(40, 0), Point2::new(40, 30)],
        )
    }

    #[test]
    fn test_shape_names() {
        let seg = Primitive::segment(0, Point2::new(0, 0), Point2::new(10, 0), 2);
        assert_eq!(seg.shape_name(), "Line");
        assert!(!seg.is_flashed());

        let spot = Primitive::flash(0, SpotShape::Macro, Point2::new(0, 0), Vector2::new(5, 5));
        assert_eq!(spot.shape_name(), "apt_macro");
        assert!(spot.is_flashed());

        assert_eq!(sample_polygon().kind(), ShapeKind::Polygon);
        assert_eq!(ShapeKind::SpotPolygon.name(), "spot_poly");
    }

    #[test]
    fn test_zero_size_bbox_is_pickable() {
        let spot = Primitive::flash(0, SpotShape::Circle, Point2::new(5, 5), Vector2::zeros());
        let bbox = spot.bounding_box();
        assert_eq!(bbox.width(), 1);
        assert_eq!(bbox.height(), 1);
        assert!(bbox.contains(&Point2::new(5, 5)));
    }

    #[test]
    fn test_flat_polygon_bbox_has_unit_extent() {
        // 所有角点共线（同一 y），高度补足 1 个单位
        let flat = Primitive::polygon(
            0,
            vec![Point2::new(0, 7), Point2::new(20, 7), Point2::new(50, 7)],
        );
        let bbox = flat.bounding_box();
        assert_eq!(bbox.min, Point2::new(0, 7));
        assert_eq!(bbox.max, Point2::new(50, 8));

        // 同一 x
        let upright = Primitive::polygon(
            0,
            vec![Point2::new(-3, 0), Point2::new(-3, 10), Point2::new(-3, 4)],
        );
        let bbox = upright.bounding_box();
        assert_eq!((bbox.width(), bbox.height()), (1, 10));
    }

    #[test]
    fn test_bbox_follows_move() {
        let mut seg = Primitive::segment(0, Point2::new(-3, 8), Point2::new(90, 8), 12);
        let before = seg.bounding_box();
        let offset = Vector2::new(17, -250);
        seg.move_by(offset);
        assert_eq!(seg.bounding_box(), before.translate(offset));

        let mut poly = sample_polygon();
        let before = poly.bounding_box();
        poly.move_by(offset);
        assert_eq!(poly.bounding_box(), before.translate(offset));
        assert_eq!(before, BoundingBox2::new(Point2::new(0, 0), Point2::new(40, 30)));
    }

    #[test]
    fn test_move_transforms_every_point() {
        let mut arc = Primitive::arc(
            1,
            Point2::new(10, 0),
            Point2::new(0, 10),
            Point2::new(0, 0),
            2,
        );
        arc.move_by(Vector2::new(5, 5));
        assert_eq!(arc.start, Point2::new(15, 5));
        assert_eq!(arc.end, Point2::new(5, 15));
        assert_eq!(arc.arc_center(), Some(Point2::new(5, 5)));

        let mut poly = sample_polygon();
        poly.move_by(Vector2::new(1, 2));
        assert_eq!(poly.corners()[2], Point2::new(41, 32));
    }

    #[test]
    fn test_rotate_round_trip() {
        let center = Point2::new(13, -7);
        let original = Primitive::spot_polygon(
            3,
            Point2::new(100, 20),
            Vector2::new(30, 10),
            vec![Point2::new(90, 15), Point2::new(110, 15), Point2::new(100, 25)],
        );

        let mut p = original.clone();
        p.rotate(center, true);
        assert_ne!(p, original);
        assert_eq!(p.size, Vector2::new(10, 30));
        p.rotate(center, false);
        assert_eq!(p, original);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut seg = Primitive::segment(0, Point2::new(10, 0), Point2::new(20, 0), 2);
        seg.rotate(Point2::origin(), false);
        assert_eq!(seg.start, Point2::new(0, 10));
        assert_eq!(seg.end, Point2::new(0, 20));
    }

    #[test]
    fn test_mirror_keeps_arc_direction() {
        let mut arc = Primitive::arc(
            0,
            Point2::new(10, 0),
            Point2::new(0, 10),
            Point2::new(0, 0),
            2,
        );
        arc.mirror_horizontal(Point2::origin());
        // 第一象限的逆时针圆弧镜像到第二象限，端点交换
        assert_eq!(arc.start, Point2::new(0, 10));
        assert_eq!(arc.end, Point2::new(-10, 0));

        arc.mirror_horizontal(Point2::origin());
        assert_eq!(arc.start, Point2::new(10, 0));
        assert_eq!(arc.end, Point2::new(0, 10));
    }

    #[test]
    fn test_mirror_vertical() {
        let mut poly = sample_polygon();
        poly.mirror_vertical(Point2::new(0, 5));
        assert_eq!(poly.corners()[2], Point2::new(40, -20));
        assert_eq!(poly.start, Point2::new(0, 10));
    }

    #[test]
    fn test_validate_rejects_negative_size() {
        let mut spot = Primitive::flash(0, SpotShape::Rect, Point2::origin(), Vector2::new(4, 4));
        assert!(spot.validate().is_ok());
        spot.size.y = -1;
        assert!(matches!(spot.validate(), Err(CoreError::InvalidGeometry(_))));
    }

    #[test]
    fn test_serde_roundtrip_keeps_shape() {
        let arc = Primitive::arc(1, Point2::new(1, 0), Point2::new(0, 1), Point2::origin(), 3)
            .with_aperture(11);
        let json = serde_json::to_string(&arc).unwrap();
        let back: Primitive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arc);
    }
}
