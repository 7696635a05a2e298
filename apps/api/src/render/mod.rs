// Letter rendering: canvas layout, then PDF serialization with an embedded Unicode font.
// Rendering is CPU-bound; async callers run it inside tokio::task::spawn_blocking.

pub mod font;
pub mod layout;
pub mod pdf;

use std::sync::Arc;

use thiserror::Error;

pub use font::{FontError, TrueTypeFont, Typeface};
pub use layout::{default_page_geometry, layout_document, PageGeometry};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF serialization failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders letter text to PDF bytes with an injected typeface.
///
/// Stateless between calls: nothing is cached, and the same input always
/// produces the same bytes.
#[derive(Clone)]
pub struct DocumentRenderer {
    typeface: Arc<dyn Typeface>,
    geometry: PageGeometry,
}

impl DocumentRenderer {
    pub fn new(typeface: Arc<dyn Typeface>) -> Self {
        Self::with_geometry(typeface, default_page_geometry())
    }

    /// Loads the TrueType font at `path` and builds a renderer on it.
    /// Startup treats any [`FontError`] as fatal; there is no fallback face.
    pub fn from_font_file(path: &std::path::Path) -> Result<Self, FontError> {
        let font = TrueTypeFont::load(path)?;
        Ok(Self::new(Arc::new(font)))
    }

    pub fn with_geometry(typeface: Arc<dyn Typeface>, geometry: PageGeometry) -> Self {
        Self { typeface, geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lays out `body` (optionally under a name line) and returns the PDF bytes.
    pub fn render(&self, body: &str, header_name: Option<&str>) -> Result<Vec<u8>, RenderError> {
        let layout = layout_document(body, header_name, &self.geometry);
        tracing::debug!(
            pages = layout.pages.len(),
            lines = layout.lines().count(),
            "Letter laid out"
        );
        pdf::write_pdf(&layout, self.typeface.as_ref(), &self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font::test_support::FixedWidthFace;

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(Arc::new(FixedWidthFace))
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = renderer();
        let body = "Dear Hiring Manager,\n\nI am writing to apply.\n\nSincerely,";
        let first = r.render(body, Some("Jordan Smith")).unwrap();
        let second = r.render(body, Some("Jordan Smith")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_changes_output() {
        let r = renderer();
        let with = r.render("Body", Some("Jordan Smith")).unwrap();
        let without = r.render("Body", None).unwrap();
        assert_ne!(with, without);
    }

    #[test]
    fn test_empty_body_still_renders_one_page() {
        let bytes = renderer().render("", None).unwrap();
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);
    }

    #[test]
    fn test_missing_font_file_fails_with_path() {
        let path = std::path::Path::new("/no/such/dir/NotoSans-Regular.ttf");
        let err = DocumentRenderer::from_font_file(path).err().unwrap();
        assert!(matches!(err, FontError::Missing { .. }));
        assert!(err.to_string().contains("/no/such/dir/NotoSans-Regular.ttf"));
    }

    #[test]
    fn test_real_font_render_when_available() {
        let path = std::path::Path::new("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
        if !path.is_file() {
            return;
        }
        let font = TrueTypeFont::load(path).unwrap();
        let r = DocumentRenderer::new(Arc::new(font));
        let body = "\u{201C}Impact\u{201D} \u{2014} shipped on time.";
        let bytes = r.render(body, Some("Jordan Smith")).unwrap();
        assert_eq!(bytes, r.render(body, Some("Jordan Smith")).unwrap());
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);
    }
}
