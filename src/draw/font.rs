//! Font descriptor for text annotations.

/// Font configuration for text rendering.
///
/// Describes which font to use, including family name, weight, and style.
/// The size is not part of the descriptor: text annotations derive it from
/// their stroke width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "normal".to_string(),
            style: "normal".to_string(),
        }
    }
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Converts this font descriptor to a size-less Pango description string.
    ///
    /// Format: "Family Style Weight"
    /// Example: "Sans Bold" or "Monospace Italic"
    pub fn to_pango_string(&self) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.style.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.style));
        }

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.join(" ")
    }

    /// Builds a Pango font description with an absolute pixel size.
    pub fn to_pango(&self, size_px: f64) -> pango::FontDescription {
        let mut desc = pango::FontDescription::from_string(&self.to_pango_string());
        desc.set_absolute_size(size_px * pango::SCALE as f64);
        desc
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pango_string_default_is_plain_family() {
        assert_eq!(FontDescriptor::default().to_pango_string(), "Sans");
    }

    #[test]
    fn pango_string_includes_style_and_weight() {
        let font = FontDescriptor::new(
            "JetBrains Mono".to_string(),
            "bold".to_string(),
            "italic".to_string(),
        );
        assert_eq!(font.to_pango_string(), "JetBrains Mono Italic Bold");
    }

    #[test]
    fn pango_description_uses_absolute_pixel_size() {
        let desc = FontDescriptor::default().to_pango(20.0);
        assert!(desc.is_size_absolute());
        assert_eq!(desc.size(), 20 * pango::SCALE);
    }
}
