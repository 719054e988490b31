//! Client-side resize preview and size formatting.
//!
//! The size estimate is a heuristic: file size is assumed to scale with
//! pixel area, so it goes with the square of the scale factor. Compression
//! makes the real result vary.

use crate::error::Result;
use std::path::Path;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable byte count, base 1024, trailing zeros dropped.
///
/// `format_bytes(1536.0, 2)` → `"1.5 KB"`.
pub fn format_bytes(bytes: f64, decimals: usize) -> String {
    if bytes == 0.0 {
        return "0 Bytes".to_string();
    }
    let k: f64 = 1024.0;
    let exp = (bytes.ln() / k.ln()).floor().clamp(0.0, (UNITS.len() - 1) as f64) as i32;
    let scaled = bytes / k.powi(exp);
    let rounded: f64 = format!("{:.*}", decimals, scaled)
        .parse()
        .unwrap_or(scaled);
    format!("{} {}", rounded, UNITS[exp as usize])
}

/// Original image facts needed for a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageInfo {
    /// Read dimensions from the image header and size from file metadata.
    pub fn probe(path: &Path) -> Result<Self> {
        let (width, height) = image::image_dimensions(path)?;
        let size_bytes = std::fs::metadata(path)?.len();
        log::debug!(
            "[ESTIMATE] {}: {}x{}, {} bytes",
            path.display(),
            width,
            height,
            size_bytes
        );
        Ok(Self {
            width,
            height,
            size_bytes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEstimate {
    pub original: ImageInfo,
    pub scale_percent: u32,
    pub new_width: u32,
    pub new_height: u32,
    pub estimated_bytes: f64,
}

/// Scale dimensions by `scale_percent` and estimate the resulting size.
pub fn estimate(original: ImageInfo, scale_percent: u32) -> ResizeEstimate {
    let factor = scale_percent as f64 / 100.0;
    ResizeEstimate {
        original,
        scale_percent,
        new_width: (original.width as f64 * factor).round() as u32,
        new_height: (original.height as f64 * factor).round() as u32,
        estimated_bytes: original.size_bytes as f64 * factor.powi(2),
    }
}

/// Preview text shown under the resize slider.
///
/// Without known dimensions (no image probed, or a zero-sized one) the
/// placeholder is shown instead.
pub fn preview_text(estimate: Option<&ResizeEstimate>) -> String {
    match estimate {
        Some(e) if e.original.width > 0 && e.original.height > 0 => format!(
            "DIMS: {}x{} -> {}x{}\nSIZE: {} -> ~{}",
            e.original.width,
            e.original.height,
            e.new_width,
            e.new_height,
            format_bytes(e.original.size_bytes as f64, 2),
            format_bytes(e.estimated_bytes, 2)
        ),
        _ => "ORIGINAL: - | NEW: -".to_string(),
    }
}

/// Map the PDF quality slider (0-100) to its label and the server's
/// compression level. The server's levels name compression strength, so a
/// low-quality setting sends `high`.
pub fn pdf_quality(slider: u32) -> (&'static str, &'static str) {
    if slider < 33 {
        ("LOW (MAX COMPRESSION)", "high")
    } else if slider > 66 {
        ("HIGH (BEST QUALITY)", "low")
    } else {
        ("MEDIUM", "medium")
    }
}
