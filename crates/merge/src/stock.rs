use quillwort_metrics::{FitPolicy, HAlign, VAlign};

use crate::{GlyphMap, GlyphSet};

/// The stock developer icon sets, in merge order.
///
/// Sources are paths relative to a Nerd Fonts font-patcher glyph directory.
pub fn stock_icon_sets() -> Vec<GlyphSet> {
    let powerline = |set: GlyphSet| {
        set.with_fit_target(FitPolicy::MaxHeight).with_align(HAlign::None, VAlign::MaxTop)
    };

    vec![
        // Seti-UI + custom
        GlyphSet::new("original-source.otf", vec![GlyphMap::new(0xE4FA, 0xE5B7, 0xE5FA)]),
        GlyphSet::new("devicons/devicons.ttf", vec![GlyphMap::new(0xE600, 0xE7EF, 0xE700)]),
        GlyphSet::new("font-awesome/FontAwesome.otf", vec![GlyphMap::new(0xED00, 0xF2FF, 0xED00)]),
        GlyphSet::new("font-awesome-extension.ttf", vec![GlyphMap::new(0xE000, 0xE0A9, 0xE200)]),
        GlyphSet::new(
            "materialdesign/MaterialDesignIconsDesktop.ttf",
            vec![GlyphMap::new(0xF0001, 0xF1AF0, 0xF0001)],
        ),
        GlyphSet::new(
            "weather-icons/weathericons-regular-webfont.ttf",
            vec![GlyphMap::new(0xF000, 0xF0EB, 0xE300)],
        )
        .with_fit_target(FitPolicy::Fixed(2210.0)),
        GlyphSet::new(
            "octicons/octicons.ttf",
            vec![
                GlyphMap::new(0xF000, 0xF305, 0xF400),
                GlyphMap::identity(0x2665),
                GlyphMap::identity(0x26A1),
            ],
        ),
        powerline(GlyphSet::new(
            "powerline-symbols/PowerlineSymbols.otf",
            vec![GlyphMap::new(0xE0A0, 0xE0A2, 0xE0A0), GlyphMap::new(0xE0B0, 0xE0B3, 0xE0B0)],
        )),
        powerline(GlyphSet::new(
            "powerline-extra/PowerlineExtraSymbols.otf",
            vec![
                GlyphMap::identity(0xE0A3),
                GlyphMap::new(0xE0B4, 0xE0C8, 0xE0B4),
                GlyphMap::identity(0xE0CA),
                GlyphMap::new(0xE0CC, 0xE0D7, 0xE0CC),
            ],
        )),
        // IEC power symbols
        GlyphSet::new(
            "Unicode_IEC_symbol_font.otf",
            vec![GlyphMap::new(0x23FB, 0x23FE, 0x23FB), GlyphMap::identity(0x2B58)],
        ),
        GlyphSet::new("font-logos.ttf", vec![GlyphMap::new(0xF300, 0xF381, 0xF300)]),
        GlyphSet::new("pomicons/Pomicons.otf", vec![GlyphMap::new(0xE000, 0xE00A, 0xE000)]),
        GlyphSet::new("codicons/codicon.ttf", vec![GlyphMap::new(0xEA60, 0xEC1E, 0xEA60)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_all;

    #[test]
    fn test_stock_sets_are_valid() {
        let sets = stock_icon_sets();
        assert_eq!(sets.len(), 13);
        validate_all(&sets).unwrap();
    }

    #[test]
    fn test_powerline_policy() {
        let sets = stock_icon_sets();
        let powerline = sets.iter().find(|s| s.source.contains("PowerlineSymbols")).unwrap();
        assert_eq!(powerline.fit_target, FitPolicy::MaxHeight);
        assert_eq!(powerline.halign, HAlign::None);
        assert_eq!(powerline.valign, VAlign::MaxTop);
    }
}
