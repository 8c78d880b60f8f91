//! Pure SVG geometry for the chart adapter.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Plot area inside the SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plot {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Plot {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// X of the `index`-th of `count` evenly spaced points; a single point sits in the middle.
    pub fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.left + self.width / 2.0;
        }
        self.left + self.width * index as f64 / (count - 1) as f64
    }

    /// Left edge and width of the `index`-th of `count` equal bands.
    pub fn band(&self, index: usize, count: usize) -> (f64, f64) {
        let w = self.width / count.max(1) as f64;
        (self.left + w * index as f64, w)
    }

    /// Y for a `0.0..=1.0` position, 0 at the bottom.
    pub fn y_at(&self, ratio: f64) -> f64 {
        self.bottom() - self.height * ratio.clamp(0.0, 1.0)
    }
}

/// `M x y L x y ...` through `points`.
pub fn line_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{}{:.1} {:.1}", cmd, x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Point on a circle; angle in radians clockwise from 12 o'clock.
pub fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

/// Pie wedge between two angles. A full turn is drawn as two half arcs.
pub fn slice_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
    let sweep = (end - start).clamp(0.0, TAU);
    if sweep >= TAU - 1e-9 {
        let (x0, y0) = polar(cx, cy, r, 0.0);
        let (x1, y1) = polar(cx, cy, r, PI);
        return format!(
            "M{:.1} {:.1} A{r:.1} {r:.1} 0 1 1 {:.1} {:.1} A{r:.1} {r:.1} 0 1 1 {:.1} {:.1} Z",
            x0, y0, x1, y1, x0, y0
        );
    }
    let (x0, y0) = polar(cx, cy, r, start);
    let (x1, y1) = polar(cx, cy, r, start + sweep);
    let large = if sweep > PI { 1 } else { 0 };
    format!(
        "M{:.1} {:.1} L{:.1} {:.1} A{r:.1} {r:.1} 0 {} 1 {:.1} {:.1} Z",
        cx, cy, x0, y0, large, x1, y1
    )
}

/// Half-circle gauge arc from the left end, covering `fraction` of the dial.
pub fn gauge_arc_path(cx: f64, cy: f64, r: f64, fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let start = -FRAC_PI_2;
    let (x0, y0) = polar(cx, cy, r, start);
    let (x1, y1) = polar(cx, cy, r, start + PI * fraction);
    format!(
        "M{:.1} {:.1} A{r:.1} {r:.1} 0 0 1 {:.1} {:.1}",
        x0, y0, x1, y1
    )
}

/// At most `max_ticks` indices spread over `0..count`, always including the ends.
pub fn tick_indices(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 || max_ticks == 0 {
        return Vec::new();
    }
    if count <= max_ticks {
        return (0..count).collect();
    }
    if max_ticks == 1 {
        return vec![0];
    }
    let step = (count - 1) as f64 / (max_ticks - 1) as f64;
    let mut ticks: Vec<usize> = (0..max_ticks)
        .map(|i| (i as f64 * step).round() as usize)
        .collect();
    ticks.dedup();
    ticks
}

/// Fill between a light and a dark blue for a `0.0..=1.0` intensity.
pub fn heat_color(ratio: f64) -> String {
    const LOW: (f64, f64, f64) = (232.0, 241.0, 251.0);
    const HIGH: (f64, f64, f64) = (31.0, 78.0, 140.0);
    let t = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        mix(LOW.0, HIGH.0),
        mix(LOW.1, HIGH.1),
        mix(LOW.2, HIGH.2)
    )
}
