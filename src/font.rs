use crate::{
    measure::{FontFamily, FontStyle, FontWeight, TextMeasure},
    refs::{ObjectReferences, RefType},
    DocError, Pt,
};
use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;
use std::path::Path;

/// The base-14 fonts every PDF reader provides. Using them needs no font files; widths
/// come from built-in approximate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    TimesRoman,
    TimesBold,
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    fn base_font(&self) -> &'static [u8] {
        match self {
            StandardFont::TimesRoman => b"Times-Roman",
            StandardFont::TimesBold => b"Times-Bold",
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    fn ascent_em(&self) -> f32 {
        match self {
            StandardFont::TimesRoman | StandardFont::TimesBold => 0.683,
            StandardFont::Helvetica | StandardFont::HelveticaBold => 0.718,
        }
    }

    /// Advance widths for WinAnsi bytes 32..=255, as written into the font dictionary
    fn widths(&self) -> Vec<f32> {
        (32u8..=255u8)
            .map(|byte| self.char_width(winansi_to_char(byte).unwrap_or('?')))
            .collect()
    }

    /// Approximate advance width at 1000 units/em
    fn char_width(&self, ch: char) -> f32 {
        let base = match self {
            StandardFont::TimesRoman | StandardFont::TimesBold => times_width(ch),
            StandardFont::Helvetica | StandardFont::HelveticaBold => helvetica_width(ch),
        };
        match self {
            StandardFont::TimesBold => base * 1.06,
            StandardFont::HelveticaBold => base * 1.08,
            _ => base,
        }
    }
}

fn times_width(ch: char) -> f32 {
    match ch {
        ' ' => 250.0,
        '.' | ',' | ':' | ';' | '\'' => 250.0,
        '!'..='/' => 333.0,
        '0'..='9' => 500.0,
        'I' => 333.0,
        'J' => 389.0,
        'M' => 889.0,
        'W' => 944.0,
        'A'..='Z' => 667.0,
        'f' | 'r' | 't' => 333.0,
        'i' | 'j' | 'l' => 278.0,
        'm' => 778.0,
        'w' => 722.0,
        'a' | 'c' | 'e' | 's' | 'z' => 444.0,
        'a'..='z' => 500.0,
        c if c.is_uppercase() => 667.0,
        c if c.is_alphabetic() => 480.0,
        _ => 500.0,
    }
}

fn helvetica_width(ch: char) -> f32 {
    match ch {
        ' ' => 278.0,
        '!'..='/' => 333.0,
        '0'..='9' => 556.0,
        ':'..='@' => 333.0,
        'I' | 'J' => 278.0,
        'M' => 833.0,
        'A'..='Z' => 667.0,
        '['..='`' => 333.0,
        'f' | 'i' | 'j' | 'l' | 't' => 278.0,
        'm' | 'w' => 833.0,
        'a'..='z' => 556.0,
        c if c.is_uppercase() => 667.0,
        _ => 556.0,
    }
}

/// WinAnsi (Windows-1252) bytes outside Latin-1 that the encoder handles
const WINANSI_EXTRAS: [(char, u8); 12] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{2122}', 0x99),
];

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0020..=0x007E => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8),
        _ => WINANSI_EXTRAS
            .iter()
            .find(|&&(ch, _)| ch == c)
            .map(|&(_, byte)| byte),
    }
}

/// The char a WinAnsi byte draws, if the encoder ever produces that byte
fn winansi_to_char(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | 0xA0..=0xFF => Some(byte as char),
        _ => WINANSI_EXTRAS
            .iter()
            .find(|&&(_, b)| b == byte)
            .map(|&(ch, _)| ch),
    }
}

/// A font usable in the exported PDF. Embedded fonts are TTF or OTF fonts written into
/// the document in their entirety, so large fonts may dramatically increase the size of
/// the output. Standard fonts are only referenced by name.
///
/// Fonts are referred to by their `Id` within the document's font arena.
pub enum Font {
    Embedded(OwnedFace),
    Standard(StandardFont),
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, DocError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font::Embedded(face))
    }

    pub fn standard(font: StandardFont) -> Font {
        Font::Standard(font)
    }

    /// Full name of the font, falling back to the family name
    pub fn name(&self) -> String {
        match self {
            Font::Standard(font) => String::from_utf8_lossy(font.base_font()).into_owned(),
            Font::Embedded(face) => {
                let find = |id: u16| {
                    face.as_face_ref()
                        .names()
                        .into_iter()
                        .find(|name| name.name_id == id && name.is_unicode())
                        .and_then(|name| name.to_string())
                };
                find(owned_ttf_parser::name_id::FULL_NAME)
                    .or_else(|| find(owned_ttf_parser::name_id::FAMILY))
                    .unwrap_or_else(|| "Embedded".to_string())
            }
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        match self {
            Font::Standard(font) => size * font.ascent_em(),
            Font::Embedded(face) => {
                let scaling: Pt = size / face.as_face_ref().units_per_em() as f32;
                scaling * face.as_face_ref().ascender() as f32
            }
        }
    }

    /// How much to vertically offset a second row of text below a first row of text
    pub fn line_height(&self, size: Pt) -> Pt {
        match self {
            Font::Standard(_) => size * 1.2,
            Font::Embedded(face) => {
                let face = face.as_face_ref();
                let scaling: Pt = size / face.units_per_em() as f32;
                let leading: Pt = scaling * face.line_gap() as f32;
                let ascent: Pt = scaling * face.ascender() as f32;
                let descent: Pt = scaling * face.descender() as f32;
                leading + ascent - descent
            }
        }
    }

    /// Width of `text` on one line. [None] when a character can't be drawn with
    /// this font at all (not even as a replacement glyph).
    pub fn width_of_text(&self, text: &str, size: Pt) -> Option<Pt> {
        match self {
            Font::Standard(font) => Some(
                text.chars()
                    .map(|ch| {
                        let ch = if char_to_winansi(ch).is_some() { ch } else { '?' };
                        size * (font.char_width(ch) / 1000.0)
                    })
                    .sum(),
            ),
            Font::Embedded(face) => {
                let scaling = size / face.as_face_ref().units_per_em() as f32;
                let mut width = Pt(0.0);
                for ch in text.chars() {
                    let gid = self.glyph_id_or_replacement(ch)?;
                    width += scaling
                        * face
                            .as_face_ref()
                            .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                            .unwrap_or_default() as f32;
                }
                Some(width)
            }
        }
    }

    /// Encode text the way this font's content-stream strings expect it: 2-byte glyph
    /// ids for embedded fonts, WinAnsi bytes for standard ones
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Standard(_) => text
                .chars()
                .map(|ch| char_to_winansi(ch).unwrap_or(b'?'))
                .collect(),
            Font::Embedded(_) => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = self.glyph_id_or_replacement(ch).unwrap_or(0);
                    out.extend_from_slice(&gid.to_be_bytes());
                }
                out
            }
        }
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        match self {
            Font::Standard(_) => char_to_winansi(ch).map(u16::from),
            Font::Embedded(face) => face.as_face_ref().glyph_index(ch).map(|i| i.0),
        }
    }

    fn glyph_id_or_replacement(&self, ch: char) -> Option<u16> {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));

        match self {
            Font::Standard(font) => {
                // the advances layout measured with
                writer
                    .type1_font(font_id)
                    .base_font(Name(font.base_font()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"))
                    .first_char(32)
                    .last_char(255)
                    .widths(font.widths());
            }
            Font::Embedded(face) => {
                let cid_font_id = write_cid(face, refs, font_index, writer);
                let to_unicode_id = write_to_unicode(face, refs, font_index, writer);

                let mut font = writer.type0_font(font_id);
                font.base_font(Name(format!("F{font_index}").as_bytes()));
                font.encoding_predefined(Name(b"Identity-H"));
                font.descendant_font(cid_font_id);
                font.to_unicode(to_unicode_id);
            }
        }
    }
}

fn write_cid(face: &OwnedFace, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
    let font_descriptor_id = write_descriptor(face, refs, font_index, writer);

    let id = refs.gen(RefType::CidFont(font_index));

    let mut cid_font = writer.cid_font(id);
    cid_font.subtype(pdf_writer::types::CidFontType::Type2);
    cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(font_descriptor_id);

    let sizing = glyphs_sizing(face, &glyph_ids(face));
    let scaling = 1000.0 / face.as_face_ref().units_per_em() as f32;

    // the most popular width becomes the default
    let mut widths_counts: HashMap<u16, usize> = HashMap::new();
    for &(_, (width, _)) in sizing.values() {
        *widths_counts.entry(width).or_insert(0) += 1;
    }
    let most_common_width = widths_counts
        .iter()
        .max_by_key(|(_, &count)| count)
        .map(|(&width, _)| width as f32 * scaling)
        .unwrap_or(1000.0);

    let mut id_widths: Vec<(u16, f32)> = sizing
        .iter()
        .map(|(&cid, &(_, (width, _)))| (cid, width as f32 * scaling))
        .collect();
    id_widths.sort_by_key(|(id, _)| *id);

    let mut widths = cid_font.widths();
    widths.consecutive(0, [1000.0]);
    let mut blocks = id_widths.into_iter();
    if let Some((first_cid, first_width)) = blocks.next() {
        let mut start_cid = first_cid;
        let mut current_widths: Vec<f32> = vec![first_width];
        for (cid, width) in blocks {
            if (cid - start_cid) as usize > current_widths.len() {
                widths.consecutive(start_cid, current_widths.clone());
                start_cid = cid;
                current_widths.clear();
            }
            current_widths.push(width);
        }
        widths.consecutive(start_cid, current_widths);
    }
    widths.finish();

    cid_font.default_width(most_common_width);
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

    id
}

fn write_descriptor(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let font_data_stream_id = refs.gen(RefType::FontData(font_index));
    writer
        .stream(font_data_stream_id, face.as_slice())
        .pair(Name(b"Length1"), face.as_slice().len() as i32);

    let sizing = glyphs_sizing(face, &glyph_ids(face));
    let max_width = sizing.values().map(|&(_, (w, _))| w).max().unwrap_or_default();
    let max_height = sizing.values().map(|&(_, (_, h))| h).max().unwrap_or_default();
    let sum_width: usize = sizing.values().map(|&(_, (w, _))| w as usize).sum();
    let avg_width = sum_width as f32 / sizing.len().max(1) as f32;

    let id = refs.gen(RefType::FontDescriptor(font_index));
    let face_ref = face.as_face_ref();
    let scaling = 1000.0 / face_ref.units_per_em() as f32;

    let mut descriptor = writer.font_descriptor(id);
    descriptor.name(Name(format!("F{font_index}").as_bytes()));
    descriptor.weight(face_ref.weight().to_number());

    let mut flags: FontFlags = FontFlags::empty();
    if face_ref.is_monospaced() {
        flags.set(FontFlags::FIXED_PITCH, true);
    }
    if face_ref.is_italic() {
        flags.set(FontFlags::ITALIC, true);
    }
    descriptor.flags(flags);

    descriptor.bbox(pdf_writer::Rect {
        x1: 0.0,
        y1: 0.0,
        x2: max_width as f32 * scaling,
        y2: max_height as f32 * scaling,
    });
    descriptor.italic_angle(face_ref.italic_angle());
    descriptor.ascent(face_ref.ascender() as f32 * scaling);
    descriptor.descent(face_ref.descender() as f32 * scaling);
    descriptor.leading(face_ref.line_gap() as f32 * scaling);
    descriptor.cap_height(
        face_ref
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(1000.0),
    );
    descriptor.x_height(
        face_ref
            .x_height()
            .unwrap_or_else(|| face_ref.capital_height().unwrap_or_default()) as f32
            * scaling,
    );
    descriptor.stem_v(80.0);
    descriptor.avg_width(avg_width * scaling);
    descriptor.max_width(max_width as f32 * scaling);
    descriptor.missing_width(max_width as f32 * scaling);
    descriptor.font_file2(font_data_stream_id);

    id
}

fn glyph_ids(face: &OwnedFace) -> HashMap<u16, char> {
    let mut map: HashMap<u16, char> = HashMap::new();
    let Some(cmap) = face.as_face_ref().tables().cmap else {
        return map;
    };

    for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
        subtable.codepoints(|codepoint: u32| {
            if let Ok(ch) = char::try_from(codepoint) {
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            }
        });
    }

    map
}

fn glyphs_sizing(face: &OwnedFace, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
    let face = face.as_face_ref();
    let mut ids_augmented: HashMap<u16, (char, (u16, i16))> = HashMap::new();
    for (&id, &ch) in ids.iter() {
        if let Some(gid) = face.glyph_index(ch) {
            if let Some(h_advance) = face.glyph_hor_advance(gid) {
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                ids_augmented.insert(id, (ch, (h_advance, height)));
            }
        }
    }
    ids_augmented
}

fn write_to_unicode(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::ToUnicode(font_index));

    let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
    .replace("\r\n", "\n");

    let mut ids: Vec<(u16, char)> = glyph_ids(face).into_iter().collect();
    ids.sort_by_key(|&(id, _)| id);

    // bfchar blocks hold at most 100 entries sharing a high byte
    let mut cmap_blocks: Vec<Vec<(u16, char)>> = Vec::new();
    let mut current_block: Vec<(u16, char)> = Vec::new();
    let mut high_byte: u8 = 0;
    for &(id, ch) in ids.iter() {
        if (id >> 8) as u8 != high_byte || current_block.len() >= 100 {
            if !current_block.is_empty() {
                cmap_blocks.push(std::mem::take(&mut current_block));
            }
            high_byte = (id >> 8) as u8;
        }
        current_block.push((id, ch));
    }
    if !current_block.is_empty() {
        cmap_blocks.push(current_block);
    }

    for block in cmap_blocks.into_iter() {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (id, ch) in block.into_iter() {
            let ch: u32 = ch.into();
            map.push_str(&format!("<{id:04x}> <{ch:04x}>\n"));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
        map.as_bytes(),
        miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
    );
    let mut stream = writer.stream(id, compressed.as_slice());
    stream.filter(pdf_writer::Filter::FlateDecode);
    stream.finish();

    id
}

/// Raw font files for the four faces a document uses
pub struct FontFiles {
    pub serif: Vec<u8>,
    pub serif_bold: Vec<u8>,
    pub sans: Vec<u8>,
    pub sans_bold: Vec<u8>,
}

impl FontFiles {
    /// Read `serif.ttf`, `serif-bold.ttf`, `sans.ttf` and `sans-bold.ttf` from a directory
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<FontFiles, DocError> {
        let dir = dir.as_ref();
        let read = |name: &str| std::fs::read(dir.join(name));
        Ok(FontFiles {
            serif: read("serif.ttf")?,
            serif_bold: read("serif-bold.ttf")?,
            sans: read("sans.ttf")?,
            sans_bold: read("sans-bold.ttf")?,
        })
    }
}

/// Which document font renders each family/weight combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSet {
    pub serif: Id<Font>,
    pub serif_bold: Id<Font>,
    pub sans: Id<Font>,
    pub sans_bold: Id<Font>,
}

impl FontSet {
    /// Register the standard Times/Helvetica fonts
    pub fn standard(fonts: &mut Arena<Font>) -> FontSet {
        FontSet {
            serif: fonts.alloc(Font::standard(StandardFont::TimesRoman)),
            serif_bold: fonts.alloc(Font::standard(StandardFont::TimesBold)),
            sans: fonts.alloc(Font::standard(StandardFont::Helvetica)),
            sans_bold: fonts.alloc(Font::standard(StandardFont::HelveticaBold)),
        }
    }

    /// Parse and register embedded fonts
    pub fn embedded(fonts: &mut Arena<Font>, files: FontFiles) -> Result<FontSet, DocError> {
        Ok(FontSet {
            serif: fonts.alloc(Font::load(files.serif)?),
            serif_bold: fonts.alloc(Font::load(files.serif_bold)?),
            sans: fonts.alloc(Font::load(files.sans)?),
            sans_bold: fonts.alloc(Font::load(files.sans_bold)?),
        })
    }

    pub fn id(&self, style: &FontStyle) -> Id<Font> {
        match (style.family, style.weight) {
            (FontFamily::Serif, FontWeight::Regular) => self.serif,
            (FontFamily::Serif, FontWeight::Bold) => self.serif_bold,
            (FontFamily::Sans, FontWeight::Regular) => self.sans,
            (FontFamily::Sans, FontWeight::Bold) => self.sans_bold,
        }
    }
}

/// Measures text with the actual fonts the PDF will be drawn with
pub struct FontMeasure<'a> {
    pub fonts: &'a Arena<Font>,
    pub set: &'a FontSet,
}

impl<'a> FontMeasure<'a> {
    pub fn new(fonts: &'a Arena<Font>, set: &'a FontSet) -> Self {
        FontMeasure { fonts, set }
    }

    fn font(&self, style: &FontStyle) -> Option<&'a Font> {
        self.fonts.get(self.set.id(style))
    }

    pub fn ascent(&self, style: &FontStyle) -> Pt {
        self.font(style)
            .map(|font| font.ascent(style.size))
            .unwrap_or(style.size * 0.8)
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn text_width(&self, text: &str, style: &FontStyle) -> Result<Pt, DocError> {
        let font = self
            .font(style)
            .ok_or_else(|| DocError::MeasurementFailure("font is not registered".to_string()))?;
        font.width_of_text(text, style.size).ok_or_else(|| {
            DocError::MeasurementFailure(format!("{} cannot draw {text:?}", font.name()))
        })
    }

    fn line_height(&self, style: &FontStyle) -> Pt {
        self.font(style)
            .map(|font| font.line_height(style.size))
            .unwrap_or(style.size * 1.2)
    }
}
