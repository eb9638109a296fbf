use log::warn;
use palette::Srgb;

/// Straight (non-premultiplied) RGBA colour, the common denominator of our renderers.
pub type Rgba8 = [u8; 4];

const FALLBACK: Rgba8 = [0, 0, 0, 255];

/// Resolves an SVG/CSS colour name ("red", "steelblue") or a hex code ("#1e90ff").
/// Unknown colours fall back to opaque black.
pub fn parse_color(name: &str) -> Rgba8 {
    let trimmed = name.trim();
    let rgb: Option<Srgb<u8>> = palette::named::from_str(&trimmed.to_ascii_lowercase())
        .or_else(|| trimmed.parse::<Srgb<u8>>().ok());
    match rgb {
        Some(rgb) => [rgb.red, rgb.green, rgb.blue, 255],
        None => {
            warn!("Color '{}' not recognized, using black.", name);
            FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("red"), [255, 0, 0, 255]);
        assert_eq!(parse_color(" Blue "), [0, 0, 255, 255]);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#1e90ff"), [0x1e, 0x90, 0xff, 255]);
    }

    #[test]
    fn unknown_falls_back_to_black() {
        assert_eq!(parse_color("not-a-colour"), FALLBACK);
    }
}
