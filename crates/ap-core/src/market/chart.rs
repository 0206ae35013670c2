//! Geometry of the price chart: projects a price series into a fixed
//! drawing frame and answers hover lookups.

use serde::Serialize;

use super::ChartDataPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 200.0,
            padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub frame: ChartFrame,
    pub points: Vec<PlotPoint>,
    pub min_price: f64,
    pub max_price: f64,
}

fn ratio(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        0.5
    } else {
        (value - min) / span
    }
}

impl ChartGeometry {
    /// `None` for an empty series. X grows with time, Y is inverted so the
    /// highest price sits at the top padding.
    pub fn project(series: &[ChartDataPoint], frame: ChartFrame) -> Option<Self> {
        let first = series.first()?;
        let (mut min_t, mut max_t) = (first.timestamp_ms(), first.timestamp_ms());
        let (mut min_p, mut max_p) = (first.price(), first.price());
        for point in series {
            min_t = min_t.min(point.timestamp_ms());
            max_t = max_t.max(point.timestamp_ms());
            min_p = min_p.min(point.price());
            max_p = max_p.max(point.price());
        }

        let plot_w = frame.width - 2.0 * frame.padding;
        let plot_h = frame.height - 2.0 * frame.padding;
        let points = series
            .iter()
            .map(|point| PlotPoint {
                x: frame.padding
                    + ratio(point.timestamp_ms() as f64, min_t as f64, max_t as f64) * plot_w,
                y: frame.height
                    - frame.padding
                    - ratio(point.price(), min_p, max_p) * plot_h,
                timestamp_ms: point.timestamp_ms(),
                price: point.price(),
            })
            .collect();

        Some(Self {
            frame,
            points,
            min_price: min_p,
            max_price: max_p,
        })
    }

    /// Point whose x is closest to `x`.
    pub fn nearest(&self, x: f64) -> Option<&PlotPoint> {
        self.points.iter().min_by(|a, b| {
            (a.x - x)
                .abs()
                .partial_cmp(&(b.x - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// SVG path data (`M x y L x y ...`).
    pub fn path(&self) -> String {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let cmd = if i == 0 { 'M' } else { 'L' };
                format!("{cmd}{:.2},{:.2}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the series ended at or above where it started.
    pub fn is_rising(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.price >= first.price,
            _ => true,
        }
    }
}
