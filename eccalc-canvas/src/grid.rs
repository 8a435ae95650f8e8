//! Border, gridlines, tick labels and axis titles.
use crate::mapper::ScreenPoint;
use crate::point::RealPoint;
use crate::render::Painter;
use crate::surface::{Stroke, Surface, TextAlign, TextBaseline, TextStyle};
use std::f64::consts::FRAC_PI_2;

const TICK_FONT: &str = "10px monospace";
const TITLE_FONT: &str = "11px Arial";
const MAX_TICKS: usize = 512;

/// The `{1, 2, 5} x 10^n` value closest to `raw`.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Integer tick spacing of a finite-field axis running from 0 to `max_value`.
pub fn field_step(max_value: u64, desired_ticks: u32) -> u64 {
    let desired = u64::from(desired_ticks.max(1));
    (max_value / desired + u64::from(max_value % desired != 0)).max(1)
}

/// Multiples of `step` inside `[min, max]`, at most a few hundred of them.
pub fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) || min > max {
        return Vec::new();
    }
    let first = (min / step).ceil();
    let slack = step * 1e-9;
    (0..MAX_TICKS)
        .map(|i| (first + i as f64) * step)
        .take_while(|v| *v <= max + slack)
        .collect()
}

/// Two decimals for ordinary magnitudes, one-digit exponential otherwise.
pub fn format_number(n: f64) -> String {
    let magnitude = n.abs();
    if magnitude >= 1e4 || (magnitude > 0.0 && magnitude < 1e-3) {
        let formatted = format!("{:.1e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(e) if e < 0 => format!("{}e-{}", mantissa, -e),
                Ok(e) => format!("{}e+{}", mantissa, e),
                Err(_) => formatted,
            },
            None => formatted,
        };
    }
    let rounded = (n * 100.0).round() / 100.0;
    // no "-0"
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        rounded.to_string()
    }
}

impl<S: Surface> Painter<'_, S> {
    fn draw_border(&mut self) {
        let plot = *self.projection.plot();
        let stroke = Stroke::solid(self.palette.border, 2.0);
        let corners = [
            ScreenPoint::new(plot.left(), plot.top()),
            ScreenPoint::new(plot.right(), plot.top()),
            ScreenPoint::new(plot.right(), plot.bottom()),
            ScreenPoint::new(plot.left(), plot.bottom()),
        ];
        for i in 0..corners.len() {
            self.surface
                .draw_line(corners[i], corners[(i + 1) % corners.len()], &stroke);
        }
    }

    fn draw_vertical_tick(&mut self, x: f64, label: &str) {
        let plot = *self.projection.plot();
        let px = self.projection.to_screen(&RealPoint::new(x, 0.0)).x;
        self.surface.draw_line(
            ScreenPoint::new(px, plot.top()),
            ScreenPoint::new(px, plot.bottom()),
            &Stroke::solid(self.palette.grid, 1.0),
        );
        let style = TextStyle::new(TICK_FONT, self.palette.tick_label)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        self.surface
            .fill_text(label, ScreenPoint::new(px, plot.bottom() + 6.0), &style);
    }

    fn draw_horizontal_tick(&mut self, y: f64, label: &str) {
        let plot = *self.projection.plot();
        let py = self.projection.to_screen(&RealPoint::new(0.0, y)).y;
        self.surface.draw_line(
            ScreenPoint::new(plot.left(), py),
            ScreenPoint::new(plot.right(), py),
            &Stroke::solid(self.palette.grid, 1.0),
        );
        let style = TextStyle::new(TICK_FONT, self.palette.tick_label)
            .align(TextAlign::Right)
            .baseline(TextBaseline::Middle);
        self.surface
            .fill_text(label, ScreenPoint::new(plot.left() - 6.0, py), &style);
    }

    fn draw_axis_titles(&mut self) {
        let plot = *self.projection.plot();
        let style = TextStyle::new(TITLE_FONT, self.palette.title)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        self.surface
            .fill_text("x", ScreenPoint::new(plot.right(), plot.bottom() + 20.0), &style);
        self.surface.fill_text(
            "y",
            ScreenPoint::new(plot.left() - 20.0, plot.top()),
            &style.rotated(-FRAC_PI_2),
        );
    }

    /// Grid of a `[0, p - 1]` canvas with integer ticks on both axes.
    pub fn draw_field_grid(&mut self) {
        self.draw_border();
        let max_value = self.projection.window().x_max().max(1.0) as u64;
        let step = field_step(max_value, self.layout.desired_ticks);
        let mut tick = Some(0u64);
        while let Some(t) = tick.filter(|t| *t <= max_value) {
            let label = t.to_string();
            self.draw_vertical_tick(t as f64, &label);
            self.draw_horizontal_tick(t as f64, &label);
            tick = t.checked_add(step);
        }
        self.draw_axis_titles();
    }

    /// Grid of a real canvas, with the zero axes when they are in view.
    pub fn draw_real_grid(&mut self) {
        self.draw_border();
        let window = *self.projection.window();
        let plot = *self.projection.plot();
        let desired = f64::from(self.layout.desired_ticks.max(1));

        let x_step = nice_step(window.x_span() / desired);
        for x in tick_values(window.x_min(), window.x_max(), x_step) {
            self.draw_vertical_tick(x, &format_number(x));
        }
        let y_step = nice_step(window.y_span() / desired);
        for y in tick_values(window.y_min(), window.y_max(), y_step) {
            self.draw_horizontal_tick(y, &format_number(y));
        }

        let axis = Stroke::solid(self.palette.axis, 1.5);
        let origin = self.projection.to_screen(&RealPoint::new(0.0, 0.0));
        if window.y_min() < 0.0 && window.y_max() > 0.0 {
            self.surface.draw_line(
                ScreenPoint::new(plot.left(), origin.y),
                ScreenPoint::new(plot.right(), origin.y),
                &axis,
            );
        }
        if window.x_min() < 0.0 && window.x_max() > 0.0 {
            self.surface.draw_line(
                ScreenPoint::new(origin.x, plot.top()),
                ScreenPoint::new(origin.x, plot.bottom()),
                &axis,
            );
        }
        self.draw_axis_titles();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Layout;
    use crate::mapper::{CanvasBox, Window};
    use crate::recording::RecordingSurface;
    use crate::theme::Palette;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(2.5), 2.0);
        assert_eq!(nice_step(1.2), 1.0);
        assert_eq!(nice_step(0.37), 0.5);
        assert_eq!(nice_step(7.6), 10.0);
        assert!((nice_step(0.0013) - 0.001).abs() < 1e-15);
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(f64::NAN), 1.0);
    }

    #[test]
    fn field_steps() {
        assert_eq!(field_step(96, 8), 12);
        assert_eq!(field_step(100, 8), 13);
        assert_eq!(field_step(1, 8), 1);
        assert_eq!(field_step(16, 0), 16);
        assert_eq!(field_step(u64::MAX, 8), u64::MAX / 8 + 1);
        assert_eq!(field_step(u64::MAX, 1), u64::MAX);
    }

    #[test]
    fn field_grid_near_u64_max() {
        let mut surface = RecordingSurface::new();
        Painter::begin(
            &mut surface,
            CanvasBox::new(600.0, 600.0),
            Window::field(18_446_744_073_709_551_557),
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap()
        .draw_field_grid();
        let texts = surface.texts();
        // 0 and seven more steps before the next one overflows
        assert_eq!(texts.len(), 8 * 2 + 2);
        assert!(texts.contains(&"0"));
    }

    #[test]
    fn ticks_cover_window() {
        let ticks = tick_values(-10.0, 10.0, 2.0);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], -10.0);
        assert_eq!(ticks[10], 10.0);
        assert_eq!(tick_values(0.5, 0.9, 1.0), Vec::<f64>::new());
        assert!(tick_values(0.0, 1.0, 0.0).is_empty());
        assert!(tick_values(0.0, 1e9, 1.0).len() <= MAX_TICKS);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.456), "2.46");
        assert_eq!(format_number(-0.4), "-0.4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(12345.0), "1.2e+4");
        assert_eq!(format_number(0.0005), "5.0e-4");
        assert_eq!(format_number(-25000.0), "-2.5e+4");
    }

    #[test]
    fn field_grid_labels() {
        let mut surface = RecordingSurface::new();
        let mut painter = Painter::begin(
            &mut surface,
            CanvasBox::new(600.0, 600.0),
            Window::field(97),
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap();
        painter.draw_field_grid();
        let texts = surface.texts();
        // 0, 12, .., 96 on both axes plus the two titles
        assert_eq!(texts.len(), 9 * 2 + 2);
        assert!(texts.contains(&"96"));
        assert!(texts.contains(&"y"));
    }

    #[test]
    fn real_grid_draws_zero_axes_only_in_view() {
        let axis = Palette::LIGHT.axis;
        let mut surface = RecordingSurface::new();
        Painter::begin(
            &mut surface,
            CanvasBox::new(500.0, 500.0),
            Window::symmetric(10.0, 10.0).unwrap(),
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap()
        .draw_real_grid();
        assert_eq!(surface.lines(axis).len(), 2);

        let mut surface = RecordingSurface::new();
        Painter::begin(
            &mut surface,
            CanvasBox::new(500.0, 500.0),
            Window::new(1.0, 5.0, -2.0, 2.0).unwrap(),
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap()
        .draw_real_grid();
        assert_eq!(surface.lines(axis).len(), 1);
    }
}
