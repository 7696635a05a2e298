//! Canvas layout — turns letter text into positioned lines on A4 pages.
//!
//! Pure and font-independent: wrapping counts characters, not glyph widths,
//! and follows the usual greedy `textwrap` rules.
//! The PDF writer consumes the resulting [`LaidOutDocument`] as-is.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

const PT_PER_MM: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Page and typography parameters for a letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    /// Distance from the bottom edge at which a page break is forced.
    pub break_margin_mm: f32,
    /// Horizontal padding inside each line cell.
    pub cell_padding_mm: f32,
    pub body_size_pt: f32,
    pub body_line_mm: f32,
    pub header_size_pt: f32,
    pub header_line_mm: f32,
    /// Vertical gap between the name line and the body.
    pub header_gap_mm: f32,
    /// Greedy wrap width, in characters.
    pub wrap_width: usize,
}

/// A4 portrait, 10 mm margins, 15 mm break margin, 11pt body on 6 mm lines,
/// 14pt name line on a 10 mm line, wrapped at 90 characters.
pub fn default_page_geometry() -> PageGeometry {
    PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_left_mm: 10.0,
        margin_top_mm: 10.0,
        break_margin_mm: 15.0,
        cell_padding_mm: 1.0,
        body_size_pt: 11.0,
        body_line_mm: 6.0,
        header_size_pt: 14.0,
        header_line_mm: 10.0,
        header_gap_mm: 5.0,
        wrap_width: 90,
    }
}

impl PageGeometry {
    pub fn width_pt(&self) -> f32 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f32 {
        mm_to_pt(self.height_mm)
    }

    /// Lowest y (from the top) a line cell may reach before a break.
    fn break_trigger_mm(&self) -> f32 {
        self.height_mm - self.break_margin_mm
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Laid-out document
// ────────────────────────────────────────────────────────────────────────────

/// One line of text placed on a page, in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    pub font_size_pt: f32,
    pub x_pt: f32,
    pub baseline_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutDocument {
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    /// All lines in reading order, across pages.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

const TAB_STOP: usize = 8;

/// ASCII whitespace is a break opportunity; other spaces (NBSP, ...) are not.
fn is_break_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Expands tabs to 8-column stops and turns every other break space into ' '.
fn normalize_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0usize;
    for c in line.chars() {
        if c == '\t' {
            let fill = TAB_STOP - column % TAB_STOP;
            out.extend(std::iter::repeat(' ').take(fill));
            column += fill;
        } else {
            out.push(if is_break_space(c) { ' ' } else { c });
            column += 1;
        }
    }
    out
}

fn is_space_chunk(chunk: &str) -> bool {
    chunk.starts_with(' ')
}

/// Splits into alternating runs of spaces and non-spaces, keeping every byte.
fn chunks(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let space = c == ' ';
        if in_space.is_some_and(|prev| prev != space) {
            out.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Greedy fixed-width word wrap.
///
/// Whitespace inside a segment is kept as written, so indentation and
/// aligned columns survive. Whitespace is dropped only where a line is
/// broken and at the end of each segment. Leading whitespace of the first
/// segment stays unless the whole line is blank. A word longer than `width`
/// is kept whole on its own line. Blank input yields a single empty line so
/// the caller still advances the cursor.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let text = normalize_spaces(line);
    let mut pending = chunks(&text);
    pending.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !pending.is_empty() {
        // Whitespace at a break point never starts the next segment.
        if !lines.is_empty() && pending.last().is_some_and(|c| is_space_chunk(c)) {
            pending.pop();
        }

        let mut segment: Vec<&str> = Vec::new();
        let mut segment_len = 0usize;
        while let Some(&chunk) = pending.last() {
            let chunk_len = chunk.chars().count();
            if segment_len + chunk_len > width {
                break;
            }
            segment.push(chunk);
            segment_len += chunk_len;
            pending.pop();
        }

        // Nothing fit: the next chunk is wider than the line and goes alone.
        if segment.is_empty() {
            if let Some(chunk) = pending.pop() {
                segment.push(chunk);
            }
        }

        if segment.last().is_some_and(|c| is_space_chunk(c)) {
            segment.pop();
        }
        if !segment.is_empty() {
            lines.push(segment.concat());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// In-progress paginated document with a top-down cursor.
pub struct Canvas<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<Page>,
    cursor_mm: f32,
}

impl<'g> Canvas<'g> {
    /// Starts on page one with the cursor at the top margin.
    pub fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            cursor_mm: geometry.margin_top_mm,
        }
    }

    /// Emits one line cell of `height_mm`, breaking the page first if the cell
    /// would cross the break margin.
    pub fn line(&mut self, text: &str, font_size_pt: f32, height_mm: f32) {
        if self.cursor_mm + height_mm > self.geometry.break_trigger_mm() {
            self.pages.push(Page::default());
            self.cursor_mm = self.geometry.margin_top_mm;
        }

        // Baseline sits mid-cell, nudged down by 0.3 of the font size.
        let font_size_mm = font_size_pt / PT_PER_MM;
        let baseline_from_top_mm = self.cursor_mm + height_mm / 2.0 + 0.3 * font_size_mm;

        let placed = PlacedLine {
            text: text.to_string(),
            font_size_pt,
            x_pt: mm_to_pt(self.geometry.margin_left_mm + self.geometry.cell_padding_mm),
            baseline_pt: self.geometry.height_pt() - mm_to_pt(baseline_from_top_mm),
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(placed);
        }
        self.cursor_mm += height_mm;
    }

    /// Advances the cursor without drawing. Never breaks the page.
    pub fn gap(&mut self, height_mm: f32) {
        self.cursor_mm += height_mm;
    }

    pub fn finish(self) -> LaidOutDocument {
        LaidOutDocument { pages: self.pages }
    }
}

/// Lays out an optional name line followed by the wrapped body.
pub fn layout_document(
    body: &str,
    header_name: Option<&str>,
    geometry: &PageGeometry,
) -> LaidOutDocument {
    let mut canvas = Canvas::new(geometry);

    if let Some(name) = header_name.map(str::trim).filter(|n| !n.is_empty()) {
        canvas.line(name, geometry.header_size_pt, geometry.header_line_mm);
        canvas.gap(geometry.header_gap_mm);
    }

    for raw_line in body.split('\n') {
        let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        for segment in wrap_line(raw_line, geometry.wrap_width) {
            canvas.line(&segment, geometry.body_size_pt, geometry.body_line_mm);
        }
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(doc: &LaidOutDocument) -> Vec<&str> {
        doc.lines().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_wrap_short_line_is_unchanged() {
        assert_eq!(wrap_line("Dear Hiring Manager,", 90), vec!["Dear Hiring Manager,"]);
    }

    #[test]
    fn test_wrap_blank_line_yields_one_empty_segment() {
        assert_eq!(wrap_line("", 90), vec![""]);
        assert_eq!(wrap_line("   \t ", 90), vec![""]);
    }

    #[test]
    fn test_wrap_breaks_at_whitespace_within_width() {
        let line = "word ".repeat(40);
        let wrapped = wrap_line(&line, 90);
        assert!(wrapped.len() > 1);
        for segment in &wrapped {
            assert!(segment.chars().count() <= 90, "segment too long: {segment}");
            assert!(!segment.starts_with(' ') && !segment.ends_with(' '));
        }
        assert_eq!(wrapped.join(" "), line.trim_end());
    }

    #[test]
    fn test_wrap_keeps_indentation_and_interior_spacing() {
        assert_eq!(
            wrap_line("    - Led team   of  five", 90),
            vec!["    - Led team   of  five"]
        );
        let doc = layout_document("    - Led team   of  five", None, &default_page_geometry());
        assert_eq!(texts(&doc), vec!["    - Led team   of  five"]);
    }

    #[test]
    fn test_wrap_drops_whitespace_only_at_break_points() {
        let line = format!("  {}   {}   tail", "a".repeat(60), "b".repeat(40));
        assert_eq!(
            wrap_line(&line, 90),
            vec![format!("  {}", "a".repeat(60)), format!("{}   tail", "b".repeat(40))]
        );
        assert_eq!(wrap_line("ends with spaces    ", 90), vec!["ends with spaces"]);
    }

    #[test]
    fn test_wrap_expands_tabs_and_keeps_non_breaking_space() {
        assert_eq!(wrap_line("\tItem", 90), vec!["        Item"]);
        assert_eq!(wrap_line("ab\tc", 90), vec!["ab      c"]);
        assert_eq!(wrap_line("10\u{a0}000", 90), vec!["10\u{a0}000"]);
    }

    #[test]
    fn test_wrap_exact_width_fits_on_one_line() {
        let line = format!("{} {}", "a".repeat(44), "b".repeat(45)); // 90 chars
        assert_eq!(wrap_line(&line, 90), vec![line.clone()]);
    }

    #[test]
    fn test_wrap_does_not_split_long_token() {
        let token = "x".repeat(200);
        assert_eq!(wrap_line(&token, 90), vec![token.clone()]);
    }

    #[test]
    fn test_wrap_long_token_between_words_gets_own_line() {
        let token = "y".repeat(120);
        let line = format!("see {token} here");
        assert_eq!(wrap_line(&line, 90), vec!["see".to_string(), token, "here".to_string()]);
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        // 87 two-byte characters + " ab" is 90 characters but 177 bytes.
        let accented = "é".repeat(87);
        let line = format!("{accented} ab");
        assert_eq!(wrap_line(&line, 90), vec![line.clone()]);

        let over = format!("{accented} abc");
        assert_eq!(wrap_line(&over, 90), vec![accented, "abc".to_string()]);
    }

    #[test]
    fn test_blank_body_line_is_preserved() {
        let geometry = default_page_geometry();
        let doc = layout_document("Line one\n\nLine three", None, &geometry);
        assert_eq!(texts(&doc), vec!["Line one", "", "Line three"]);

        let lines: Vec<&PlacedLine> = doc.lines().collect();
        let step = mm_to_pt(geometry.body_line_mm);
        assert!((lines[0].baseline_pt - lines[1].baseline_pt - step).abs() < 1e-3);
        assert!((lines[1].baseline_pt - lines[2].baseline_pt - step).abs() < 1e-3);
    }

    #[test]
    fn test_crlf_line_endings_are_tolerated() {
        let doc = layout_document("One\r\n\r\nTwo", None, &default_page_geometry());
        assert_eq!(texts(&doc), vec!["One", "", "Two"]);
    }

    #[test]
    fn test_header_is_first_and_larger() {
        let geometry = default_page_geometry();
        let doc = layout_document("Body text", Some("Jordan Smith"), &geometry);
        let lines: Vec<&PlacedLine> = doc.lines().collect();
        assert_eq!(lines[0].text, "Jordan Smith");
        assert!(lines[0].font_size_pt > lines[1].font_size_pt);
        // 10mm header cell plus a 5mm gap sit between the two cells' tops.
        assert!(lines[0].baseline_pt > lines[1].baseline_pt);
    }

    #[test]
    fn test_blank_header_is_skipped() {
        let geometry = default_page_geometry();
        for header in [None, Some(""), Some("   ")] {
            let doc = layout_document("Body", header, &geometry);
            assert_eq!(texts(&doc), vec!["Body"]);
            assert_eq!(doc.pages[0].lines[0].font_size_pt, geometry.body_size_pt);
        }
    }

    #[test]
    fn test_long_body_breaks_onto_new_pages() {
        let geometry = default_page_geometry();
        // (297 - 15 - 10) / 6 = 45.33 → 45 body lines fit on a page.
        let body = vec!["line"; 100].join("\n");
        let doc = layout_document(&body, None, &geometry);
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.pages[0].lines.len(), 45);
        assert_eq!(doc.pages[1].lines.len(), 45);
        assert_eq!(doc.pages[2].lines.len(), 10);

        let top_first = doc.pages[0].lines[0].baseline_pt;
        let top_second = doc.pages[1].lines[0].baseline_pt;
        assert!((top_first - top_second).abs() < 1e-3);
        for page in &doc.pages {
            for line in &page.lines {
                assert!(line.baseline_pt > mm_to_pt(geometry.break_margin_mm));
            }
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let geometry = default_page_geometry();
        let body = "Paragraph one is here.\n\nParagraph two follows.";
        assert_eq!(
            layout_document(body, Some("A. Name"), &geometry),
            layout_document(body, Some("A. Name"), &geometry)
        );
    }
}
