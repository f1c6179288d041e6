//! Colour parsing for config strings: `#rrggbb` / `#rgb` hex or a CSS colour name.

use bevy::color::palettes::css;
use bevy::prelude::*;

/// CSS names accepted in config files. Kept to the names the scene actually uses
/// plus a few neutrals.
pub const NAMED_COLORS: [(&str, Srgba); 12] = [
    ("red", css::RED),
    ("blue", css::BLUE),
    ("green", css::GREEN),
    ("orange", css::ORANGE),
    ("hotpink", css::HOT_PINK),
    ("aquamarine", css::AQUAMARINE),
    ("white", css::WHITE),
    ("black", css::BLACK),
    ("yellow", css::YELLOW),
    ("purple", css::PURPLE),
    ("silver", css::SILVER),
    ("gray", css::GRAY),
];

pub fn parse_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.starts_with('#') {
        return Srgba::hex(trimmed)
            .map(Color::from)
            .map_err(|e| format!("invalid hex colour {trimmed:?}: {e}"));
    }
    let lower = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| Color::from(*c))
        .ok_or_else(|| format!("unknown colour name {trimmed:?}"))
}

/// Like [`parse_color`] but logs and falls back to white; used on the spawn paths
/// where config has already been validated.
pub fn color_or_white(value: &str) -> Color {
    parse_color(value).unwrap_or_else(|e| {
        warn!(target: "config", "{e}; using white");
        Color::WHITE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        let bg = parse_color("#151520").expect("hex");
        let s = bg.to_srgba();
        assert!((s.red - 0x15 as f32 / 255.0).abs() < 1e-4);
        assert!((s.blue - 0x20 as f32 / 255.0).abs() < 1e-4);
        assert_eq!(parse_color("HotPink").unwrap(), Color::from(css::HOT_PINK));
        assert_eq!(parse_color(" aquamarine ").unwrap(), Color::from(css::AQUAMARINE));
    }

    #[test]
    fn rejects_unknown() {
        assert!(parse_color("chartreuse-ish").is_err());
        assert!(parse_color("#12").is_err());
        assert_eq!(color_or_white("nope"), Color::WHITE);
    }

    #[test]
    fn names_are_unique() {
        for (i, (a, _)) in NAMED_COLORS.iter().enumerate() {
            for (b, _) in NAMED_COLORS.iter().skip(i + 1) {
                assert_ne!(a, b, "duplicate colour name {a}");
            }
        }
    }
}
