//! PDF serialization of a laid-out letter.
//!
//! Text is drawn with a single embedded Type0 font (Identity-H, 2-byte glyph
//! ids) so any character the typeface covers renders, not just Latin-1. A
//! ToUnicode CMap keeps the text extractable. The output carries no dates and
//! no document id, so identical input yields identical bytes.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::render::font::Typeface;
use crate::render::layout::{LaidOutDocument, PageGeometry, PlacedLine};
use crate::render::RenderError;

const FONT_RESOURCE: &str = "F1";
const PRODUCER: &str = "coverletter-api";
/// Max entries per `beginbfchar` block.
const BFCHAR_CHUNK: usize = 100;

/// A glyph referenced by the document, with the character it was drawn for.
#[derive(Debug, Clone, Copy)]
struct UsedGlyph {
    advance: u16,
    source: char,
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Encodes `text` as big-endian glyph ids, recording every glyph used.
fn encode_text(text: &str, face: &dyn Typeface, used: &mut BTreeMap<u16, UsedGlyph>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let glyph = face.glyph(c);
        used.entry(glyph.id).or_insert(UsedGlyph {
            advance: glyph.advance,
            source: c,
        });
        bytes.extend_from_slice(&glyph.id.to_be_bytes());
    }
    bytes
}

fn line_operations(line: &PlacedLine, encoded: Vec<u8>) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![FONT_RESOURCE.into(), real(line.font_size_pt)],
        ),
        Operation::new("Td", vec![real(line.x_pt), real(line.baseline_pt)]),
        Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Hexadecimal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Serializes `layout` to PDF bytes using `face` for glyph encoding.
pub fn write_pdf(
    layout: &LaidOutDocument,
    face: &dyn Typeface,
    geometry: &PageGeometry,
) -> Result<Vec<u8>, RenderError> {
    let mut used: BTreeMap<u16, UsedGlyph> = BTreeMap::new();

    // Blank lines only move the cursor; there is nothing to draw for them.
    let page_contents: Vec<Content> = layout
        .pages
        .iter()
        .map(|page| {
            let operations = page
                .lines
                .iter()
                .filter(|line| !line.text.is_empty())
                .flat_map(|line| {
                    let encoded = encode_text(&line.text, face, &mut used);
                    line_operations(line, encoded)
                })
                .collect();
            Content { operations }
        })
        .collect();

    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();
    let font_id = embed_font(&mut pdf, face, &used)?;
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_RESOURCE => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_contents.len());
    for content in page_contents {
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), real(geometry.width_pt()), real(geometry.height_pt())],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Adds the Type0 font, its CIDFont, descriptor, program and ToUnicode map.
fn embed_font(
    pdf: &mut Document,
    face: &dyn Typeface,
    used: &BTreeMap<u16, UsedGlyph>,
) -> Result<ObjectId, RenderError> {
    let name = face.postscript_name();
    let metrics = face.metrics();

    let mut descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => name,
        "Flags" => 32,
        "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(i64::from(*v))).collect::<Vec<_>>(),
        "ItalicAngle" => 0,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => 80,
    };
    let program = face.program();
    if !program.is_empty() {
        // Length1 is the uncompressed size; Flate output is deterministic.
        let mut file = Stream::new(
            dictionary! { "Length1" => program.len() as i64 },
            program.to_vec(),
        );
        file.compress()?;
        let file_id = pdf.add_object(file);
        descriptor.set("FontFile2", file_id);
    }
    let descriptor_id = pdf.add_object(descriptor);

    let mut widths: Vec<Object> = Vec::with_capacity(used.len() * 2);
    for (gid, glyph) in used {
        widths.push(Object::Integer(i64::from(*gid)));
        widths.push(Object::Array(vec![Object::Integer(i64::from(glyph.advance))]));
    }

    let cid_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => name,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = pdf.add_object(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(used).into_bytes(),
    ));

    Ok(pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => name,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![cid_font_id.into()],
        "ToUnicode" => to_unicode_id,
    }))
}

/// Builds the glyph id → Unicode CMap. Glyph 0 (.notdef) is never mapped.
fn to_unicode_cmap(used: &BTreeMap<u16, UsedGlyph>) -> String {
    let entries: Vec<String> = used
        .iter()
        .filter(|(gid, _)| **gid != 0)
        .map(|(gid, glyph)| {
            let mut units = [0u16; 2];
            let utf16: String = glyph
                .source
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            format!("<{gid:04X}> <{utf16}>")
        })
        .collect();

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for entry in chunk {
            cmap.push_str(entry);
            cmap.push('\n');
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
