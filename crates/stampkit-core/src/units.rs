//! Unit conversion utilities
//!
//! Layout works in millimetres; previews work in pixels at a fixed dpi;
//! motion scripts print millimetres with three decimals.

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Default preview resolution in dots per inch
pub const DEFAULT_PREVIEW_DPI: f64 = 300.0;

/// Pixels per millimetre at the given resolution
pub fn pixels_per_mm(dpi: f64) -> f64 {
    dpi / MM_PER_INCH
}

/// Convert millimetres to pixels at the given scale
pub fn mm_to_px(value_mm: f64, pixels_per_mm: f64) -> f32 {
    (value_mm * pixels_per_mm) as f32
}

/// Format a length for a motion script line
///
/// Always three decimals, and never `-0.000`.
pub fn format_mm(value_mm: f64) -> String {
    let formatted = format!("{:.3}", value_mm);
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_mm() {
        let ppm = pixels_per_mm(DEFAULT_PREVIEW_DPI);
        assert!((ppm - 11.811).abs() < 0.001);
        assert!((pixels_per_mm(25.4) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mm_to_px() {
        assert_eq!(mm_to_px(10.0, 10.0), 100.0);
    }

    #[test]
    fn test_format_mm() {
        assert_eq!(format_mm(12.3456), "12.346");
        assert_eq!(format_mm(60.0), "60.000");
        assert_eq!(format_mm(-0.0001), "0.000");
        assert_eq!(format_mm(-1.5), "-1.500");
    }
}
