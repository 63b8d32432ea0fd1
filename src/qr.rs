use crate::error::QrError;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use std::str::FromStr;

const FALLBACK_SCALE: f64 = 4.0;
pub const MAX_IMAGE_SIZE: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionLevel {
    Low,
    Medium,
    Quartile,
    High,
}

impl CorrectionLevel {
    fn ec_level(self) -> EcLevel {
        match self {
            CorrectionLevel::Low => EcLevel::L,
            CorrectionLevel::Medium => EcLevel::M,
            CorrectionLevel::Quartile => EcLevel::Q,
            CorrectionLevel::High => EcLevel::H,
        }
    }
}

impl FromStr for CorrectionLevel {
    type Err = QrError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "L" | "LOW" => Ok(CorrectionLevel::Low),
            "M" | "MEDIUM" => Ok(CorrectionLevel::Medium),
            "Q" | "QUARTILE" => Ok(CorrectionLevel::Quartile),
            "H" | "HIGH" => Ok(CorrectionLevel::High),
            _ => Err(QrError::InvalidLevel(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QrOptions {
    pub width: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub dark: String,
    pub light: String,
    pub level: CorrectionLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin: 2,
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
            level: CorrectionLevel::Medium,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QrImage {
    pub png: Vec<u8>,
    pub size: u32,
    pub modules: usize,
}

impl QrImage {
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

pub fn encode_png(text: &str, options: &QrOptions) -> Result<QrImage, QrError> {
    let dark = parse_color(&options.dark)?;
    let light = parse_color(&options.light)?;

    let code = QrCode::with_error_correction_level(text.as_bytes(), options.level.ec_level())
        .map_err(|err| QrError::Capacity {
            len: text.len(),
            reason: err.to_string(),
        })?;
    let modules = code.width();
    let colors = code.to_colors();

    let span = modules as f64 + 2.0 * options.margin as f64;
    let (scale, requested) = if options.width as f64 >= span {
        (options.width as f64 / span, options.width as f64)
    } else {
        (FALLBACK_SCALE, span * FALLBACK_SCALE)
    };
    if requested > MAX_IMAGE_SIZE as f64 {
        return Err(QrError::InvalidSize {
            requested: requested as u64,
            max: MAX_IMAGE_SIZE,
        });
    }
    let size = requested as u32;
    let offset = options.margin as f64 * scale;
    let limit = offset + modules as f64 * scale;

    let image = RgbaImage::from_fn(size, size, |x, y| {
        let (px, py) = (x as f64, y as f64);
        if px < offset || py < offset || px >= limit || py >= limit {
            return light;
        }
        let col = (((px - offset) / scale).floor() as usize).min(modules - 1);
        let row = (((py - offset) / scale).floor() as usize).min(modules - 1);
        match colors[row * modules + col] {
            Color::Dark => dark,
            Color::Light => light,
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png)?;
    log::debug!(
        "encoded {} byte payload into {}x{} module QR, {}px",
        text.len(),
        modules,
        modules,
        size
    );

    Ok(QrImage {
        png: cursor.into_inner(),
        size,
        modules,
    })
}

pub fn parse_color(value: &str) -> Result<Rgba<u8>, QrError> {
    let invalid = || QrError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(image: &QrImage) -> RgbaImage {
        image::load_from_memory_with_format(&image.png, ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn default_options_render_300px_square() {
        let image = encode_png("TXN1714550400000ABC123", &QrOptions::default()).unwrap();
        assert_eq!(image.size, 300);

        let decoded = decode(&image);
        assert_eq!(decoded.dimensions(), (300, 300));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*decoded.get_pixel(299, 299), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let options = QrOptions::default();
        let image = encode_png("hello", &options).unwrap();
        let decoded = decode(&image);

        let span = image.modules as f64 + 2.0 * options.margin as f64;
        let scale = options.width as f64 / span;
        let inside = (options.margin as f64 * scale + scale / 2.0) as u32;
        assert_eq!(*decoded.get_pixel(inside, inside), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn custom_colors_are_applied() {
        let options = QrOptions {
            dark: "#112233".to_string(),
            light: "#FFEEDDCC".to_string(),
            ..QrOptions::default()
        };
        let decoded = decode(&encode_png("warna", &options).unwrap());
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([0xFF, 0xEE, 0xDD, 0xCC]));
    }

    #[test]
    fn narrow_width_falls_back_to_fixed_scale() {
        let options = QrOptions {
            width: 10,
            ..QrOptions::default()
        };
        let image = encode_png("kecil", &options).unwrap();
        assert_eq!(image.size, (image.modules as u32 + 4) * 4);
    }

    #[test]
    fn oversized_payload_reports_capacity_error() {
        let text = "X".repeat(4000);
        let err = encode_png(&text, &QrOptions::default()).unwrap_err();
        assert!(matches!(err, QrError::Capacity { len: 4000, .. }));
    }

    #[test]
    fn higher_correction_lowers_capacity() {
        let text = "x".repeat(1500);
        assert!(encode_png(&text, &QrOptions::default()).is_ok());
        let strict = QrOptions {
            level: CorrectionLevel::High,
            ..QrOptions::default()
        };
        assert!(encode_png(&text, &strict).is_err());
    }

    #[test]
    fn oversized_raster_is_rejected() {
        let wide = QrOptions {
            width: 100_000,
            ..QrOptions::default()
        };
        assert!(matches!(
            encode_png("hello", &wide).unwrap_err(),
            QrError::InvalidSize { requested: 100_000, .. }
        ));

        let huge_margin = QrOptions {
            margin: u32::MAX / 2,
            ..QrOptions::default()
        };
        assert!(matches!(
            encode_png("hello", &huge_margin).unwrap_err(),
            QrError::InvalidSize { .. }
        ));

        let large = QrOptions {
            width: 1000,
            ..QrOptions::default()
        };
        assert_eq!(encode_png("hello", &large).unwrap().size, 1000);
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let image = encode_png("uri", &QrOptions::default()).unwrap();
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn bad_colors_and_levels_are_rejected() {
        assert!(parse_color("000000").is_err());
        assert!(parse_color("#00000").is_err());
        assert!(parse_color("#GG0000").is_err());
        assert!("Z".parse::<CorrectionLevel>().is_err());
        assert_eq!("m".parse::<CorrectionLevel>().unwrap(), CorrectionLevel::Medium);
    }
}
