//! The fixed 16-color legacy palette and color argument parsing.

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, uppercase.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Legacy code → (canonical name, color). Order matches the code digits.
const PALETTE: [(char, &str, Rgb); 16] = [
    ('0', "black", Rgb::new(0, 0, 0)),
    ('1', "dark_blue", Rgb::new(0, 0, 170)),
    ('2', "dark_green", Rgb::new(0, 170, 0)),
    ('3', "dark_aqua", Rgb::new(0, 170, 170)),
    ('4', "dark_red", Rgb::new(170, 0, 0)),
    ('5', "dark_purple", Rgb::new(170, 0, 170)),
    ('6', "gold", Rgb::new(255, 170, 0)),
    ('7', "gray", Rgb::new(170, 170, 170)),
    ('8', "dark_gray", Rgb::new(85, 85, 85)),
    ('9', "blue", Rgb::new(85, 85, 255)),
    ('a', "green", Rgb::new(85, 255, 85)),
    ('b', "aqua", Rgb::new(85, 255, 255)),
    ('c', "red", Rgb::new(255, 85, 85)),
    ('d', "light_purple", Rgb::new(255, 85, 255)),
    ('e', "yellow", Rgb::new(255, 255, 85)),
    ('f', "white", Rgb::new(255, 255, 255)),
];

/// Legacy style code → canonical tag name.
const STYLES: [(char, &str); 6] = [
    ('k', "obfuscated"),
    ('l', "b"),
    ('m', "strikethrough"),
    ('n', "u"),
    ('o', "i"),
    ('r', "reset"),
];

/// Canonical color name for a legacy color code (case-insensitive).
pub fn color_name_for_code(code: char) -> Option<&'static str> {
    let code = code.to_ascii_lowercase();
    PALETTE.iter().find(|(c, _, _)| *c == code).map(|(_, name, _)| *name)
}

/// Canonical tag for a legacy style code (case-insensitive).
pub fn style_tag_for_code(code: char) -> Option<&'static str> {
    let code = code.to_ascii_lowercase();
    STYLES.iter().find(|(c, _)| *c == code).map(|(_, tag)| *tag)
}

/// True for any of the 22 single-character legacy codes.
pub fn is_legacy_code(code: char) -> bool {
    color_name_for_code(code).is_some() || style_tag_for_code(code).is_some()
}

/// Look up a palette color by canonical name (`red`, `dark_blue`, ...).
pub fn named_color(name: &str) -> Option<Rgb> {
    let name = name.to_ascii_lowercase();
    PALETTE.iter().find(|(_, n, _)| *n == name).map(|(_, _, rgb)| *rgb)
}

/// Parse `#RRGGBB`, `RRGGBB` or the short `#RGB` form.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let clean = hex.trim().trim_start_matches('#');
    if !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match clean.len() {
        6 => Some(Rgb::new(channel(&clean[0..2])?, channel(&clean[2..4])?, channel(&clean[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&clean[i..i + 1].repeat(2));
            Some(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// A color given by name or hex (`red`, `#FF0000`, `FF0000`).
pub fn parse_color_arg(arg: &str) -> Option<Rgb> {
    named_color(arg).or_else(|| parse_hex_color(arg))
}
