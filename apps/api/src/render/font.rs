//! Font resource for the PDF renderer.
//!
//! The renderer never measures or encodes text itself; it asks a [`Typeface`]
//! for glyph ids and advances. [`TrueTypeFont`] is the production face, loaded
//! once at startup from a TrueType file (Noto Sans, DejaVu Sans, ...). All
//! metrics are expressed in PDF glyph space (1/1000 em).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font file not found at '{path}'. Set LETTER_FONT_PATH to a TrueType font such as NotoSans-Regular.ttf or DejaVuSans.ttf")]
    Missing { path: PathBuf },

    #[error("font file '{path}' could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file '{path}' is not a usable TrueType font: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Glyph id and horizontal advance (1/1000 em) for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    pub advance: u16,
}

/// Face-wide metrics needed by the PDF font descriptor, in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    /// `[x_min, y_min, x_max, y_max]`
    pub bbox: [i32; 4],
}

/// An embeddable font. Implementations must be deterministic: the same
/// character always maps to the same glyph.
pub trait Typeface: Send + Sync {
    /// Name used for `/BaseFont` and `/FontName`.
    fn postscript_name(&self) -> &str;

    /// Glyph for `c`; characters the face cannot draw map to glyph 0.
    fn glyph(&self, c: char) -> Glyph;

    fn metrics(&self) -> FaceMetrics;

    /// Raw font program embedded as `/FontFile2`.
    fn program(&self) -> &[u8];
}

/// A TrueType font read from disk, with its Unicode cmap resolved up front.
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
    glyphs: HashMap<char, Glyph>,
    notdef: Glyph,
    metrics: FaceMetrics,
}

impl TrueTypeFont {
    /// Loads and parses the font at `path`.
    ///
    /// A missing file is reported as [`FontError::Missing`] so startup can
    /// print an actionable message instead of a bare I/O error.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        if !path.is_file() {
            return Err(FontError::Missing {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path).map_err(|source| FontError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let name = postscript_name_from_path(path);
        let font = Self::from_bytes(name, data).map_err(|reason| FontError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            font = %font.name,
            glyphs = font.glyphs.len(),
            "Loaded letter font from {}",
            path.display()
        );
        Ok(font)
    }

    /// Parses an in-memory TrueType font. Errors carry the parser's reason.
    pub fn from_bytes(name: String, data: Vec<u8>) -> Result<Self, String> {
        let (glyphs, notdef, metrics) = {
            let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;
            let units_per_em = i32::from(face.units_per_em().max(1));
            let scale = |v: i32| v * 1000 / units_per_em;

            let mut glyphs = HashMap::new();
            if let Some(cmap) = face.tables().cmap {
                for subtable in cmap.subtables {
                    if !subtable.is_unicode() {
                        continue;
                    }
                    subtable.codepoints(|codepoint| {
                        let Some(c) = char::from_u32(codepoint) else {
                            return;
                        };
                        if glyphs.contains_key(&c) {
                            return;
                        }
                        if let Some(gid) = subtable.glyph_index(codepoint) {
                            let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                            glyphs.insert(
                                c,
                                Glyph {
                                    id: gid.0,
                                    advance: scale(i32::from(advance)) as u16,
                                },
                            );
                        }
                    });
                }
            }

            if glyphs.is_empty() {
                return Err("font has no Unicode character map".to_string());
            }

            let notdef_advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(0))
                .unwrap_or(0);
            let notdef = Glyph {
                id: 0,
                advance: scale(i32::from(notdef_advance)) as u16,
            };

            let bbox = face.global_bounding_box();
            let metrics = FaceMetrics {
                ascent: scale(i32::from(face.ascender())),
                descent: scale(i32::from(face.descender())),
                cap_height: scale(i32::from(
                    face.capital_height().unwrap_or(face.ascender()),
                )),
                bbox: [
                    scale(i32::from(bbox.x_min)),
                    scale(i32::from(bbox.y_min)),
                    scale(i32::from(bbox.x_max)),
                    scale(i32::from(bbox.y_max)),
                ],
            };

            (glyphs, notdef, metrics)
        };

        Ok(Self {
            name,
            data,
            glyphs,
            notdef,
            metrics,
        })
    }
}

impl Typeface for TrueTypeFont {
    fn postscript_name(&self) -> &str {
        &self.name
    }

    fn glyph(&self, c: char) -> Glyph {
        self.glyphs.get(&c).copied().unwrap_or(self.notdef)
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn program(&self) -> &[u8] {
        &self.data
    }
}

/// PDF names may not contain spaces or delimiters; keep the file stem's
/// alphanumerics and dashes.
fn postscript_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        "LetterFont".to_string()
    } else {
        name
    }
}


#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_font_is_reported_with_path() {
        let err = TrueTypeFont::load(Path::new("/definitely/not/here/NotoSans-Regular.ttf"))
            .err()
            .unwrap();
        assert!(matches!(err, FontError::Missing { .. }));
        let message = err.to_string();
        assert!(message.contains("/definitely/not/here/NotoSans-Regular.ttf"));
        assert!(message.contains("LETTER_FONT_PATH"));
    }

    #[test]
    fn test_directory_is_not_a_font() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrueTypeFont::load(dir.path()).err().unwrap();
        assert!(matches!(err, FontError::Missing { .. }));
    }

    #[test]
    fn test_garbage_file_is_invalid_font() {
        let mut file = tempfile::Builder::new().suffix(".ttf").tempfile().unwrap();
        file.write_all(b"this is not a font").unwrap();
        let err = TrueTypeFont::load(file.path()).err().unwrap();
        assert!(matches!(err, FontError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn test_postscript_name_from_path_sanitizes() {
        assert_eq!(
            postscript_name_from_path(Path::new("/fonts/NotoSans-Regular.ttf")),
            "NotoSans-Regular"
        );
        assert_eq!(
            postscript_name_from_path(Path::new("My Font (v2).ttf")),
            "MyFontv2"
        );
        assert_eq!(postscript_name_from_path(Path::new("///")), "LetterFont");
    }

    /// Exercised only where DejaVu is installed (most Debian/Ubuntu images).
    #[test]
    fn test_system_dejavu_covers_typographic_punctuation() {
        let path = Path::new("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
        if !path.is_file() {
            return;
        }
        let font = TrueTypeFont::load(path).unwrap();
        for c in ['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2013}', '\u{2014}'] {
            assert_ne!(font.glyph(c).id, 0, "missing glyph for {c:?}");
        }
        assert!(font.glyph('A').advance > 0);
        assert_eq!(font.program().len(), std::fs::metadata(path).unwrap().len() as usize);
    }
}
