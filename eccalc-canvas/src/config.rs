use crate::animation::PhaseDurations;
use crate::RenderError;
use serde::Deserialize;

/// Every tunable of the renderer. Deserializes from a partial object, missing
/// keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub layout: Layout,
    pub viewport: ViewportConfig,
    pub timing: Timing,
    pub curve_samples: usize,
    pub hit_threshold_px: f64,
    pub pan_click_threshold_px: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub padding: f64,
    pub desired_ticks: u32,
    pub point_radius: f64,
    pub marker_radius: f64,
    pub result_radius: f64,
    pub real_point_radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Half extent of the symmetric window used when no range is supplied.
    pub half_range: f64,
    pub min_span: f64,
    pub max_span: f64,
    pub zoom_in: f64,
    pub zoom_out: f64,
}

/// Durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    pub curve_reveal: f64,
    pub point_reveal_per_point: f64,
    pub point_reveal_max: f64,
    pub field_addition: f64,
    pub field_multiple_interval: f64,
    pub real_multiple_interval: f64,
    pub real_addition: PhaseDurations,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            viewport: ViewportConfig::default(),
            timing: Timing::default(),
            curve_samples: 800,
            hit_threshold_px: 10.0,
            pan_click_threshold_px: 3.0,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            padding: 50.0,
            desired_ticks: 8,
            point_radius: 4.0,
            marker_radius: 6.0,
            result_radius: 7.0,
            real_point_radius: 5.0,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            half_range: 10.0,
            min_span: 1e-3,
            max_span: 1e6,
            zoom_in: 0.85,
            zoom_out: 1.15,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            curve_reveal: 1800.0,
            point_reveal_per_point: 50.0,
            point_reveal_max: 3000.0,
            field_addition: 2500.0,
            field_multiple_interval: 600.0,
            real_multiple_interval: 400.0,
            real_addition: PhaseDurations::default(),
        }
    }
}

impl Timing {
    /// Reveal time for `count` enumerated points.
    pub fn point_reveal(&self, count: usize) -> f64 {
        (self.point_reveal_per_point * count as f64).min(self.point_reveal_max)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.layout.padding.is_finite() && self.layout.padding >= 0.0) {
            return Err(RenderError::InvalidConfig("padding must be a non-negative number"));
        }
        if self.layout.desired_ticks == 0 {
            return Err(RenderError::InvalidConfig("desiredTicks must be at least 1"));
        }
        let v = &self.viewport;
        if !(positive(v.min_span) && positive(v.max_span) && v.min_span <= v.max_span) {
            return Err(RenderError::InvalidConfig(
                "span limits must satisfy 0 < minSpan <= maxSpan",
            ));
        }
        if !positive(v.half_range) {
            return Err(RenderError::InvalidConfig("halfRange must be positive"));
        }
        if !(positive(v.zoom_in) && v.zoom_in < 1.0 && positive(v.zoom_out) && v.zoom_out > 1.0) {
            return Err(RenderError::InvalidConfig("zoom factors must straddle 1"));
        }
        let t = &self.timing;
        let intervals = [
            t.curve_reveal,
            t.point_reveal_per_point,
            t.point_reveal_max,
            t.field_addition,
            t.field_multiple_interval,
            t.real_multiple_interval,
        ];
        if !intervals.iter().all(|d| positive(*d)) || !t.real_addition.is_valid() {
            return Err(RenderError::InvalidConfig("durations must be positive"));
        }
        if self.curve_samples < 2 {
            return Err(RenderError::InvalidConfig("curveSamples must be at least 2"));
        }
        if !(self.hit_threshold_px.is_finite() && self.hit_threshold_px >= 0.0)
            || !(self.pan_click_threshold_px.is_finite() && self.pan_click_threshold_px >= 0.0)
        {
            return Err(RenderError::InvalidConfig("pixel thresholds must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.point_reveal(10), 500.0);
        assert_eq!(config.timing.point_reveal(1000), 3000.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r#"{
                "layout": {"padding": 30},
                "timing": {"realAddition": {"hold": 0}},
                "curveSamples": 100
            }"#,
        )
        .unwrap();
        assert_eq!(config.layout.padding, 30.0);
        assert_eq!(config.layout.desired_ticks, 8);
        assert_eq!(config.curve_samples, 100);
        assert_eq!(config.timing.real_addition.hold, 0.0);
        assert_eq!(config.timing.real_addition.line, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_limits() {
        let mut config = RenderConfig::default();
        config.viewport.min_span = 10.0;
        config.viewport.max_span = 1.0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let mut config = RenderConfig::default();
        config.viewport.zoom_in = 1.2;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.timing.field_addition = 0.0;
        assert!(config.validate().is_err());
    }
}
