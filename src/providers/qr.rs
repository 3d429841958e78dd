//! QR ticket rendering.

use crate::providers::QrGenerator;
use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;

/// Renders QR codes as SVG wrapped in a base64 data URL, suitable for an
/// `<img src=...>` in the ticket view.
#[derive(Clone, Debug, Default)]
pub struct SvgQrGenerator;

impl SvgQrGenerator {
    /// Create a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl QrGenerator for SvgQrGenerator {
    fn data_url(&self, payload: &str) -> anyhow::Result<String> {
        let code = QrCode::new(payload.as_bytes()).context("QR encoding failed")?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .build();
        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(image)
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn produces_an_svg_data_url() {
        let url = SvgQrGenerator::new()
            .data_url(r#"{"userId":"u","eventId":"e","at":0}"#)
            .unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));
        assert!(url.len() > 100);
    }
}
