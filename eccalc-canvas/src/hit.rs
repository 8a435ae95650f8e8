//! Pointer position to curve point.
use crate::curve::RealCurve;
use crate::mapper::{Projection, ScreenPoint};
use crate::point::{FieldPoint, RealPoint};

/// Index of the point whose projection is nearest to `click`, if it lies
/// within `threshold` pixels. The identity is never eligible; on equal
/// distances the earlier point wins.
pub fn nearest_point(
    click: ScreenPoint,
    points: &[FieldPoint],
    projection: &Projection,
    threshold: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in points.iter().enumerate() {
        let domain = match point.to_domain() {
            Some(domain) => domain,
            None => continue,
        };
        let distance = projection.to_screen(&domain).distance_squared(&click);
        match best {
            Some((_, nearest)) if distance >= nearest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.filter(|(_, distance)| *distance <= threshold * threshold)
        .map(|(index, _)| index)
}

/// The curve point at the clicked x, on whichever branch is drawn closer to
/// the click. Nothing is picked when the click is left or right of the plot,
/// when the curve is not real at that x, or when both branches fall outside
/// the plot.
pub fn pick_on_curve(
    click: ScreenPoint,
    curve: &RealCurve,
    projection: &Projection,
) -> Option<RealPoint> {
    let plot = projection.plot();
    if !plot.contains_x(click.x) {
        return None;
    }
    let x = projection.to_domain(click).x;
    let (top, bottom) = curve.branches(x)?;
    let top = RealPoint::new(x, top);
    let bottom = RealPoint::new(x, bottom);

    let top_y = projection.to_screen(&top).y;
    let bottom_y = projection.to_screen(&bottom).y;
    if !plot.contains_y(top_y) && !plot.contains_y(bottom_y) {
        return None;
    }
    if (top_y - click.y).abs() < (bottom_y - click.y).abs() {
        Some(top)
    } else {
        Some(bottom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mapper::{CanvasBox, Window};

    fn field_projection() -> Projection {
        Projection::for_canvas(Window::field(97), CanvasBox::new(600.0, 500.0), 50.0).unwrap()
    }

    fn real_projection() -> Projection {
        Projection::for_canvas(
            Window::symmetric(10.0, 10.0).unwrap(),
            CanvasBox::new(600.0, 600.0),
            50.0,
        )
        .unwrap()
    }

    #[test]
    fn nearest_within_threshold() {
        let projection = field_projection();
        let points = [FieldPoint::Infinity, FieldPoint::new(3, 6), FieldPoint::new(50, 50)];
        let target = projection.to_screen(&RealPoint::new(3.0, 6.0));
        let click = ScreenPoint::new(target.x + 3.0, target.y - 4.0);
        assert_eq!(nearest_point(click, &points, &projection, 10.0), Some(1));
        let far = ScreenPoint::new(target.x + 200.0, target.y);
        assert_eq!(nearest_point(far, &points, &projection, 10.0), None);
    }

    #[test]
    fn infinity_is_never_hit() {
        let projection = field_projection();
        let points = [FieldPoint::Infinity];
        for (x, y) in [(0.0, 0.0), (50.0, 450.0), (300.0, 250.0)] {
            assert_eq!(nearest_point(ScreenPoint::new(x, y), &points, &projection, 1e9), None);
        }
        assert_eq!(nearest_point(ScreenPoint::new(0.0, 0.0), &[], &projection, 10.0), None);
    }

    #[test]
    fn ties_go_to_the_first_point() {
        let projection = field_projection();
        let points = [FieldPoint::new(10, 10), FieldPoint::new(12, 10), FieldPoint::new(10, 10)];
        let left = projection.to_screen(&RealPoint::new(10.0, 10.0));
        let right = projection.to_screen(&RealPoint::new(12.0, 10.0));
        let middle = ScreenPoint::new((left.x + right.x) / 2.0, left.y);
        for _ in 0..3 {
            assert_eq!(nearest_point(middle, &points, &projection, 50.0), Some(0));
        }
        assert_eq!(nearest_point(left, &points, &projection, 50.0), Some(0));
    }

    #[test]
    fn picks_the_closer_branch() {
        let projection = real_projection();
        let curve = RealCurve::new(-1.0, 1.0);
        let upper = projection.to_screen(&RealPoint::new(2.0, 1.0));
        let picked = pick_on_curve(upper, &curve, &projection).unwrap();
        assert!((picked.x - 2.0).abs() < 1e-9);
        assert!((picked.y - 2.6458).abs() < 1e-4);

        let lower = projection.to_screen(&RealPoint::new(2.0, -5.0));
        let picked = pick_on_curve(lower, &curve, &projection).unwrap();
        assert!((picked.y + 2.6458).abs() < 1e-4);
    }

    #[test]
    fn no_pick_where_curve_is_not_real() {
        let projection = real_projection();
        let curve = RealCurve::new(-1.0, 1.0);
        let click = projection.to_screen(&RealPoint::new(-3.0, 0.0));
        assert_eq!(pick_on_curve(click, &curve, &projection), None);
    }

    #[test]
    fn no_pick_outside_the_plot() {
        let projection = real_projection();
        let curve = RealCurve::new(-1.0, 1.0);
        assert_eq!(pick_on_curve(ScreenPoint::new(20.0, 300.0), &curve, &projection), None);
        // at x = 9 both branches are at about +-27, far above and below the window
        let click = projection.to_screen(&RealPoint::new(9.0, 0.0));
        assert_eq!(pick_on_curve(click, &curve, &projection), None);
    }
}
