//! Points, sizes and element bounds

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The rendered box of a component's root element, in client coordinates.
///
/// This is what `getBoundingClientRect()` reports in a browser, or the
/// rectangle a native host assigned to the component. It can differ from the
/// component's intrinsic size when the element is scaled by CSS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds at the origin with the given size.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a client-space point into the intrinsic coordinate space of the
    /// element.
    ///
    /// Subtracts the rendered origin, then rescales each axis by
    /// `intrinsic / rendered`. A collapsed axis (zero or non-finite rendered
    /// extent) is left unscaled.
    pub fn to_local(&self, client: Point, intrinsic: Size) -> Point {
        Point::new(
            (client.x - self.x) * axis_scale(intrinsic.width, self.width),
            (client.y - self.y) * axis_scale(intrinsic.height, self.height),
        )
    }
}

fn axis_scale(intrinsic: f32, rendered: f32) -> f32 {
    if rendered > 0.0 && rendered.is_finite() {
        intrinsic / rendered
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_local_subtracts_origin() {
        let bounds = Bounds::new(100.0, 50.0, 300.0, 28.0);
        let local = bounds.to_local(Point::new(250.0, 64.0), Size::new(300.0, 28.0));
        assert!((local.x - 150.0).abs() < 0.001);
        assert!((local.y - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_to_local_compensates_css_scale() {
        // Rendered at half size: a click halfway across is still x = 150.
        let bounds = Bounds::new(0.0, 0.0, 150.0, 14.0);
        let local = bounds.to_local(Point::new(75.0, 7.0), Size::new(300.0, 28.0));
        assert!((local.x - 150.0).abs() < 0.001);
        assert!((local.y - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_to_local_collapsed_axis() {
        let bounds = Bounds::new(10.0, 10.0, 0.0, 20.0);
        let local = bounds.to_local(Point::new(15.0, 20.0), Size::new(300.0, 20.0));
        assert!((local.x - 5.0).abs() < 0.001);
        assert!(local.is_finite());
    }

    #[test]
    fn test_contains_edges() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(10.0, 10.0)));
        assert!(!bounds.contains(Point::new(10.1, 5.0)));
    }
}
