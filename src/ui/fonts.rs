use std::{fs, path::Path};

use egui::{Context, FontData, FontDefinitions, FontFamily};
use log::info;

use crate::errors::error_types::ErrorTypes;

const BUNDLED_FONT: &str = "dejavu-sans";
const CUSTOM_FONT: &str = "custom";

/// DejaVu Sans, which covers the Arabic block missing from the default egui fonts.
static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Font definitions with the bundled font first in every family.
pub fn bundled_fonts() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(BUNDLED_FONT.to_owned(), FontData::from_static(DEJAVU_SANS));
    prepend(&mut fonts, BUNDLED_FONT);
    fonts
}

/// Installs the bundled font, and the font at `path` in front of it when given.
pub fn install_fonts(egui_ctx: &Context, path: Option<&Path>) -> Result<(), ErrorTypes> {
    let mut fonts = bundled_fonts();
    let result = match path {
        Some(path) => add_font_file(&mut fonts, path),
        None => Ok(()),
    };
    egui_ctx.set_fonts(fonts);
    result
}

fn add_font_file(fonts: &mut FontDefinitions, path: &Path) -> Result<(), ErrorTypes> {
    let bytes = fs::read(path).map_err(|e| {
        ErrorTypes::new(
            603,
            format!("Failed to read font {}: {}", path.display(), e),
        )
    })?;
    fonts
        .font_data
        .insert(CUSTOM_FONT.to_owned(), FontData::from_owned(bytes));
    prepend(fonts, CUSTOM_FONT);
    info!("Installed font {}", path.display());
    Ok(())
}

fn prepend(fonts: &mut FontDefinitions, name: &str) {
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, name.to_owned());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bundled_font_comes_first() {
        let fonts = bundled_fonts();
        assert!(fonts.font_data.contains_key(BUNDLED_FONT));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            assert_eq!(fonts.families[&family][0], BUNDLED_FONT);
        }
    }

    #[test]
    fn test_missing_override_keeps_bundled_font() {
        let ctx = Context::default();
        let result = install_fonts(&ctx, Some(Path::new("no-such-font.ttf")));
        assert_eq!(result.unwrap_err().code(), 603);

        let mut fonts = bundled_fonts();
        assert!(add_font_file(&mut fonts, Path::new("no-such-font.ttf")).is_err());
        assert_eq!(fonts.families[&FontFamily::Proportional][0], BUNDLED_FONT);
    }

    #[test]
    fn test_override_goes_before_bundled_font() {
        let path = std::env::temp_dir().join(format!("{}-override.ttf", std::process::id()));
        fs::write(&path, DEJAVU_SANS).unwrap();

        let mut fonts = bundled_fonts();
        add_font_file(&mut fonts, &path).unwrap();
        let family = &fonts.families[&FontFamily::Proportional];
        assert_eq!(family[0], CUSTOM_FONT);
        assert_eq!(family[1], BUNDLED_FONT);
        let _ = fs::remove_file(path);
    }
}
