//! Saving annotated images to disk.

use crate::config::ExportConfig;
use crate::draw::{RasterSurface, SurfaceError};
use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while exporting an image.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] SurfaceError),

    #[error("invalid filename template '{0}'")]
    InvalidTemplate(String),
}

/// Returns true when every chrono specifier in `template` is recognized.
pub fn is_valid_template(template: &str) -> bool {
    !StrftimeItems::new(template).any(|item| matches!(item, Item::Error))
}

/// Generate a PNG filename based on the template and current time.
///
/// The template supports chrono format specifiers.
pub fn generate_filename(template: &str) -> Result<String, ExportError> {
    let now = Local::now();
    let mut filename = String::new();
    write!(filename, "{}.png", now.format(template))
        .map_err(|_| ExportError::InvalidTemplate(template.to_string()))?;
    Ok(filename)
}

/// Ensure the save directory exists, creating it if necessary.
///
/// Returns the canonicalized path when it can be resolved.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Encodes `surface` as PNG and writes it to `path`.
///
/// The file is readable and writable by its owner only.
pub fn write_png_file(surface: &RasterSurface, path: &Path) -> Result<(), ExportError> {
    let mut encoded = Vec::new();
    surface.write_png(&mut encoded)?;

    log::info!(
        "Saving image to: {} ({} bytes)",
        path.display(),
        encoded.len()
    );
    fs::write(path, &encoded)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Saves `surface` into the configured directory under a timestamped name.
///
/// Returns the path written.
pub fn save_png(surface: &RasterSurface, config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&expand_tilde(&config.save_directory))?;
    let file_path = directory.join(generate_filename(&config.filename_template)?);

    write_png_file(surface, &file_path)?;
    log::info!("Image saved successfully: {}", file_path.display());

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BaseImage, BLUE};

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("test_%Y%m%d").unwrap();
        assert!(filename.starts_with("test_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "test_YYYYMMDD.png".len());
    }

    #[test]
    fn unknown_specifier_is_an_error() {
        assert!(!is_valid_template("shot_%Q"));
        assert!(is_valid_template("shot_%Y-%m-%d"));
        assert!(matches!(
            generate_filename("shot_%Q"),
            Err(ExportError::InvalidTemplate(template)) if template == "shot_%Q"
        ));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn save_png_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("shots");
        let config = ExportConfig {
            save_directory: target.to_string_lossy().into_owned(),
            filename_template: "shot_%H%M%S".to_string(),
        };

        let mut surface = RasterSurface::new(12, 7).unwrap();
        surface
            .draw_base_image(&BaseImage::solid(12, 7, BLUE).unwrap())
            .unwrap();

        let path = save_png(&surface, &config).unwrap();
        assert!(path.starts_with(target.canonicalize().unwrap()));

        let decoded = BaseImage::from_png(&mut fs::File::open(&path).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
