/// A point on the reference (x) / test (y) plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Point {
    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A simple polygon given by its vertices in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub(crate) fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.vertices
            .iter()
            .copied()
            .zip(self.vertices.iter().copied().cycle().skip(1))
    }

    /// Whether `p` lies strictly inside; points on an edge are outside.
    pub(crate) fn contains(&self, p: Point) -> bool {
        if self.vertices.len() < 3 || self.edges().any(|(a, b)| on_segment(p, a, b)) {
            return false;
        }
        // even-odd ray casting towards +x
        self.edges()
            .filter(|(a, b)| (a.y > p.y) != (b.y > p.y))
            .filter(|(a, b)| p.x < a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y))
            .count()
            % 2
            == 1
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    const EPS: f64 = 1e-12;
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let scale = 1.0_f64.max((b.x - a.x).abs() + (b.y - a.y).abs());
    if cross.abs() > EPS * scale {
        return false;
    }
    (a.x.min(b.x) - EPS..=a.x.max(b.x) + EPS).contains(&p.x)
        && (a.y.min(b.y) - EPS..=a.y.max(b.y) + EPS).contains(&p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ])
    }

    #[test]
    fn test_interior_and_exterior() {
        let square = square();
        assert!(square.contains(Point::new(1.0, 1.0)));
        assert!(!square.contains(Point::new(3.0, 1.0)));
        assert!(!square.contains(Point::new(-0.5, 1.0)));
    }

    #[test]
    fn test_boundary_is_outside() {
        let square = square();
        assert!(!square.contains(Point::new(0.0, 1.0)));
        assert!(!square.contains(Point::new(1.0, 2.0)));
        assert!(!square.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // an L shape
        let shape = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ]);
        assert!(shape.contains(Point::new(0.5, 2.5)));
        assert!(shape.contains(Point::new(2.5, 0.5)));
        assert!(!shape.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(!line.contains(Point::new(0.5, 0.5)));
    }
}
