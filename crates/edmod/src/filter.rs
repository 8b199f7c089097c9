use std::collections::BTreeSet;
use std::f64::consts::PI;

use modkit_common::{CommonError, Units};
use serde::Serialize;

use crate::error::{EditError, Result};

/// Volume and surface area of one object, as reported by the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectMetrics {
    /// 1-based object index
    pub index: usize,
    pub volume: f64,
    pub area: f64,
}

impl ObjectMetrics {
    pub fn sphericity(&self) -> f64 {
        sphericity(self.volume, self.area)
    }

    /// Metrics converted with a length factor (volume by its cube, area by
    /// its square)
    pub fn scaled(&self, length_factor: f64) -> Self {
        Self {
            index: self.index,
            volume: self.volume * length_factor.powi(3),
            area: self.area * length_factor.powi(2),
        }
    }
}

/// Surface area of the volume-equivalent sphere divided by the actual
/// surface area; 1 for a perfect sphere, 0 when the area is zero.
pub fn sphericity(volume: f64, area: f64) -> f64 {
    if area == 0.0 {
        return 0.0;
    }
    PI.cbrt() * (6.0 * volume).powf(2.0 / 3.0) / area
}

/// Read the per-object metrics table.
///
/// Rows start after the `#-` separator line; every row with exactly eight
/// columns describes the next object, with the volume in the fourth column
/// and the surface area in the fifth.
pub fn parse_metrics(output: &str) -> Result<Vec<ObjectMetrics>> {
    let mut metrics = Vec::new();

    let rows = output
        .lines()
        .enumerate()
        .skip_while(|(_, line)| !line.starts_with("#-"))
        .skip(1);

    for (number, line) in rows {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() != 8 {
            continue;
        }
        let invalid = || EditError::Metrics {
            line: number + 1,
            text: line.to_string(),
        };
        let volume = columns[3].parse().map_err(|_| invalid())?;
        let area = columns[4].parse().map_err(|_| invalid())?;
        metrics.push(ObjectMetrics {
            index: metrics.len() + 1,
            volume,
            area,
        });
    }

    Ok(metrics)
}

/// Optional lower and upper limit on one measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bound {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Bound {
    pub fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Self { low, high }
    }

    pub fn is_set(&self) -> bool {
        self.low.is_some() || self.high.is_some()
    }

    /// True when the value falls below `low` or above `high`
    pub fn rejects(&self, value: f64) -> bool {
        self.low.is_some_and(|low| value < low) || self.high.is_some_and(|high| value > high)
    }
}

/// Thresholds on volume, surface area and sphericity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometricBounds {
    pub volume: Bound,
    pub area: Bound,
    pub sphericity: Bound,
    /// Units the volume and area thresholds are given in; the model header
    /// units when unset
    pub units: Option<Units>,
}

impl GeometricBounds {
    pub fn is_active(&self) -> bool {
        self.volume.is_set() || self.area.is_set() || self.sphericity.is_set()
    }
}

/// Geometric bounds resolved against the units of a particular model
#[derive(Debug, Clone)]
pub struct GeometricFilter {
    bounds: GeometricBounds,
    length_factor: f64,
}

impl GeometricFilter {
    pub fn new(bounds: &GeometricBounds, model_units: Units) -> std::result::Result<Self, CommonError> {
        let threshold_units = bounds.units.unwrap_or(model_units);
        let length_factor = model_units.length_factor_to(threshold_units)?;
        Ok(Self {
            bounds: bounds.clone(),
            length_factor,
        })
    }

    pub fn length_factor(&self) -> f64 {
        self.length_factor
    }

    /// An object is excluded when any configured bound rejects it
    pub fn excludes(&self, metrics: &ObjectMetrics) -> bool {
        let m = metrics.scaled(self.length_factor);
        self.bounds.volume.rejects(m.volume)
            || self.bounds.area.rejects(m.area)
            || (self.bounds.sphericity.is_set() && self.bounds.sphericity.rejects(m.sphericity()))
    }

    pub fn exclusion_set(&self, metrics: &[ObjectMetrics]) -> BTreeSet<usize> {
        metrics
            .iter()
            .filter(|m| self.excludes(m))
            .map(|m| m.index)
            .collect()
    }
}
