//! Font loading for the plan renderer.
//!
//! `genpdf` embeds TrueType fonts, so a regular/bold/italic/bold-italic family must be found on
//! disk. The bundled Roboto family is searched first (see [`bundled_font_candidates`]); when it
//! is missing, well-known system families are tried in order.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Overrides the directory searched for the bundled family.
pub const FONTS_DIR_ENV: &str = "CONTRACTS_PLAN_FONTS_DIR";

/// Overrides the directories searched for system fallback families.
pub const SYSTEM_FONTS_DIR_ENV: &str = "CONTRACTS_PLAN_SYSTEM_FONTS_DIR";

const BUNDLED_FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

struct FamilyFiles {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

impl FamilyFiles {
    fn all(&self) -> [&'static str; 4] {
        [self.regular, self.bold, self.italic, self.bold_italic]
    }
}

const SYSTEM_FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    FamilyFiles {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
];

const UNIX_SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

/// Directory holding the bundled fonts inside the crate sources.
pub fn bundled_fonts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// Directories searched for the bundled family, in priority order.
pub fn bundled_font_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    candidates.push(bundled_fonts_dir());
    candidates.dedup();
    candidates
}

fn missing_files(directory: &Path, files: &[&str]) -> Vec<String> {
    files
        .iter()
        .filter(|name| !directory.join(name).is_file())
        .map(|name| name.to_string())
        .collect()
}

fn resolve_bundled_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in bundled_font_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_files(&candidate, BUNDLED_FONT_FILES);
        if missing.is_empty() {
            debug!("Using bundled fonts from {}", candidate.display());
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate bundled font directory. Checked: {}. See assets/fonts/README.md or set {}.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn load_bundled_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_bundled_directory()?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn system_font_dirs() -> Vec<PathBuf> {
    if let Some(path) = env_path(SYSTEM_FONTS_DIR_ENV) {
        return vec![path];
    }

    let mut dirs: Vec<PathBuf> = UNIX_SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect();
    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            dirs.push(root.join("Fonts"));
        }
    }
    dirs
}

fn load_font_file(directory: &Path, file: &str, family: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load {} font at {}: {}",
                family,
                path.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn find_system_family() -> Option<(&'static FamilyFiles, PathBuf)> {
    let dirs = system_font_dirs();
    SYSTEM_FAMILIES.iter().find_map(|family| {
        dirs.iter()
            .find(|dir| missing_files(dir, &family.all()).is_empty())
            .map(|dir| (family, dir.clone()))
    })
}

fn system_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let (family, directory) = find_system_family().ok_or_else(|| {
        Error::new(
            format!(
                "No system fallback family found (tried {})",
                SYSTEM_FAMILIES
                    .iter()
                    .map(|family| family.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
        )
    })?;

    debug!("Loading fallback family '{}' from {}", family.name, directory.display());
    Ok(FontFamily {
        regular: load_font_file(&directory, family.regular, family.name)?,
        bold: load_font_file(&directory, family.bold, family.name)?,
        italic: load_font_file(&directory, family.italic, family.name)?,
        bold_italic: load_font_file(&directory, family.bold_italic, family.name)?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the bundled Roboto family, or the first available system family when the bundled
/// files are missing.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family() {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match system_fallback_font_family() {
            Ok(fallback) => {
                warn!("Bundled fonts unavailable ({}); using a system font family.", err);
                Ok(fallback)
            }
            Err(fallback_err) => Err(Error::new(
                format!(
                    "Bundled fonts unavailable ({}) and system fallback failed: {}",
                    err, fallback_err
                ),
                io::Error::new(io::ErrorKind::NotFound, "no usable font family"),
            )),
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether a font family can be resolved without loading it.
pub fn fonts_available() -> bool {
    resolve_bundled_directory().is_ok() || find_system_family().is_some()
}
