//! Span and paragraph styles understood by the rich-text model.

/// 24-bit RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextColor(u32);

impl TextColor {
    pub const RED: Self = Self::from_rgb(0xFF, 0x00, 0x00);
    pub const BLUE: Self = Self::from_rgb(0x00, 0x00, 0xFF);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, red, green, blue] = self.0.to_be_bytes();
        (red, green, blue)
    }

    /// Uppercase `#RRGGBB` form used in serialized markup.
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0)
    }

    /// Parses a CSS color value: `#RGB`, `#RRGGBB`, `rgb(..)` or `rgba(..)`.
    ///
    /// Alpha is ignored.
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lowered = value.to_ascii_lowercase();
        let args = lowered
            .strip_prefix("rgba(")
            .or_else(|| lowered.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let mut channels = args.split(',').map(|part| part.trim().parse::<f32>());
        let red = channel(channels.next()?.ok()?);
        let green = channel(channels.next()?.ok()?);
        let blue = channel(channels.next()?.ok()?);
        Some(Self::from_rgb(red, green, blue))
    }
}

fn parse_hex(hex: &str) -> Option<TextColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(TextColor),
        3 => {
            let expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
            u32::from_str_radix(&expanded, 16).ok().map(TextColor)
        }
        _ => None,
    }
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Entry offered by the color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorChoice {
    pub name: &'static str,
    pub color: TextColor,
}

/// Colors offered by the color picker, in display order.
pub const COLOR_PALETTE: [ColorChoice; 2] = [
    ColorChoice {
        name: "red",
        color: TextColor::RED,
    },
    ColorChoice {
        name: "blue",
        color: TextColor::BLUE,
    },
];

/// Character-level formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Option<TextColor>,
}

/// Boolean span attribute flipped by a toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanToggle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl SpanStyle {
    /// Returns a copy with one attribute flipped.
    pub fn toggled(mut self, toggle: SpanToggle) -> Self {
        match toggle {
            SpanToggle::Bold => self.bold = !self.bold,
            SpanToggle::Italic => self.italic = !self.italic,
            SpanToggle::Underline => self.underline = !self.underline,
            SpanToggle::Strikethrough => self.strikethrough = !self.strikethrough,
        }
        self
    }

    /// Returns whether the given attribute is active.
    pub fn is_active(&self, toggle: SpanToggle) -> bool {
        match toggle {
            SpanToggle::Bold => self.bold,
            SpanToggle::Italic => self.italic,
            SpanToggle::Underline => self.underline,
            SpanToggle::Strikethrough => self.strikethrough,
        }
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn parse_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }
}

/// List membership of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Paragraph-level formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParagraphStyle {
    pub align: TextAlign,
    pub list: Option<ListKind>,
}

#[cfg(test)]
mod tests {
    use super::{SpanStyle, SpanToggle, TextAlign, TextColor};

    #[test]
    fn parse_css_accepts_hex_and_rgb_forms() {
        assert_eq!(TextColor::parse_css("#ff0000"), Some(TextColor::RED));
        assert_eq!(TextColor::parse_css("#00F"), Some(TextColor::BLUE));
        assert_eq!(
            TextColor::parse_css("rgba(255, 0, 0, 1.0)"),
            Some(TextColor::RED)
        );
        assert_eq!(
            TextColor::parse_css("RGB(12, 34, 56)"),
            Some(TextColor::from_rgb(12, 34, 56))
        );
        assert_eq!(TextColor::parse_css("#12345"), None);
        assert_eq!(TextColor::parse_css("tomato"), None);
    }

    #[test]
    fn hex_output_is_uppercase_six_digits() {
        assert_eq!(TextColor::BLUE.to_hex(), "#0000FF");
        assert_eq!(TextColor::from_rgb(1, 2, 3).rgb(), (1, 2, 3));
    }

    #[test]
    fn toggled_flips_only_the_requested_attribute() {
        let style = SpanStyle::default().toggled(SpanToggle::Bold);
        assert!(style.bold);
        assert!(!style.italic);
        assert!(!style.toggled(SpanToggle::Bold).is_active(SpanToggle::Bold));
    }

    #[test]
    fn align_parses_logical_values() {
        assert_eq!(TextAlign::parse_css(" END "), Some(TextAlign::Right));
        assert_eq!(TextAlign::parse_css("justify"), None);
    }
}
