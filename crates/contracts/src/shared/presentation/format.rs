//! Number formatting shared by every KPI renderer.

/// Compact display of a KPI value with an optional unit suffix.
///
/// ```
/// use contracts::shared::presentation::format_value;
/// assert_eq!(format_value(1234.5, None), "1.2k");
/// assert_eq!(format_value(4.321, Some("%")), "4.32%");
/// assert_eq!(format_value(42.9, Some(" min")), "43 min");
/// ```
pub fn format_value(v: f64, unit: Option<&str>) -> String {
    let unit = unit.unwrap_or_default();
    if !v.is_finite() {
        return format!("{:.2}{}", 0.0, unit);
    }

    let abs = v.abs();
    if abs >= 1000.0 {
        format!("{:.1}k{}", v / 1000.0, unit)
    } else if abs < 10.0 {
        format!("{:.2}{}", v, unit)
    } else {
        format!("{:.0}{}", v, unit)
    }
}

/// Map a fraction (`0..=1`) or a percentage (`0..=100`) onto `0..=100`.
///
/// Magnitudes up to 1 are read as fractions. A genuine `1` (meaning 1%)
/// therefore reads as 100%; the heuristic is kept as-is for compatibility.
pub fn normalize_percent(v: Option<f64>) -> f64 {
    let Some(v) = v else { return 0.0 };
    if v.is_nan() {
        return 0.0;
    }

    let pct = if v.abs() <= 1.0 { v * 100.0 } else { v };
    pct.clamp(0.0, 100.0)
}

/// Signed percentage change from `previous` to `current`; `None` when `previous` is zero.
pub fn delta_percent(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}
