use super::refs::{ObjectReferences, RefType};
use crate::layout::TextMeasure;
use crate::units::Pt;
use crate::LabelError;
use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::{BTreeMap, HashMap};

/// A parsed TrueType / OpenType font. Fonts are embedded whole, but only the
/// glyphs that were actually drawn get widths and a unicode mapping.
pub struct Font {
    pub face: OwnedFace,
}

/// Glyph id => the character it was drawn for
pub(crate) type UsedGlyphs = BTreeMap<u16, char>;

impl Font {
    /// Load a font from raw bytes, returning an error if it can't be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LabelError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn scaling(&self, size: Pt) -> f64 {
        size.0 / self.face().units_per_em() as f64
    }

    /// Glyph used to draw `ch`, falling back to the replacement character, `?`, then `.notdef`
    pub fn glyph_for(&self, ch: char) -> u16 {
        let face = self.face();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .map(|g| g.0)
            .unwrap_or(0)
    }

    fn advance(&self, glyph: u16) -> u16 {
        self.face().glyph_hor_advance(GlyphId(glyph)).unwrap_or_default()
    }

    /// Advance width of `text` at `size`
    pub fn width_of(&self, text: &str, size: Pt) -> Pt {
        let units: u64 = text
            .chars()
            .map(|ch| self.advance(self.glyph_for(ch)) as u64)
            .sum();
        Pt(units as f64 * self.scaling(size))
    }

    /// Glyph ids for `text`, recording each in `used`
    pub(crate) fn encode(&self, text: &str, used: &mut UsedGlyphs) -> Vec<u16> {
        text.chars()
            .map(|ch| {
                let glyph = self.glyph_for(ch);
                used.entry(glyph).or_insert(ch);
                glyph
            })
            .collect()
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        used: &UsedGlyphs,
        writer: &mut Pdf,
    ) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let scaling = 1000.0 / self.face().units_per_em() as f32;
        let id_widths: Vec<(u16, f32)> = used
            .keys()
            .map(|&gid| (gid, self.advance(gid) as f32 * scaling))
            .collect();

        // the most popular width becomes the default
        let mut widths_counts: HashMap<u32, usize> = HashMap::new();
        for (_, width) in id_widths.iter() {
            *widths_counts.entry(width.to_bits()).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&bits, _)| f32::from_bits(bits))
            .unwrap_or(1000.0);

        // runs of consecutive glyph ids share one entry
        let mut widths = cid_font.widths();
        let mut run: Option<(u16, Vec<f32>)> = None;
        for (gid, width) in id_widths {
            if let Some((start, run_widths)) = &mut run {
                if *start as usize + run_widths.len() == gid as usize {
                    run_widths.push(width);
                    continue;
                }
            }
            if let Some((start, run_widths)) = run.replace((gid, vec![width])) {
                widths.consecutive(start, run_widths);
            }
        }
        if let Some((start, run_widths)) = run {
            widths.consecutive(start, run_widths);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        let data = self.face.as_slice();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            data,
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(pdf_writer::Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        id
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.replace(' ', "").as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(font_data_stream_id);
        descriptor.finish();

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        used: &UsedGlyphs,
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

        // bfchar blocks hold at most 100 entries
        let used: Vec<(u16, char)> = used.iter().map(|(&g, &c)| (g, c)).collect();
        for block in used.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                map.push_str(&format!("<{gid:04x}> <{hex}>\n"));
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

        id
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        id: Id<Font>,
        used: &UsedGlyphs,
        writer: &mut Pdf,
    ) -> Ref {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, used, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, used, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);

        font_id
    }
}

/// The fonts a renderer can draw with, registered under family names.
///
/// Family lookups ignore case. Families that aren't registered use the default
/// font, which is the first font added unless [FontBook::set_default] says otherwise.
#[derive(Default)]
pub struct FontBook {
    pub(crate) fonts: Arena<Font>,
    families: HashMap<String, Id<Font>>,
    default: Option<Id<Font>>,
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook::default()
    }

    /// Register `font` under `family`, replacing any font already registered there
    pub fn add<S: AsRef<str>>(&mut self, family: S, font: Font) -> Id<Font> {
        let id = self.fonts.alloc(font);
        self.families.insert(family.as_ref().to_lowercase(), id);
        self.default.get_or_insert(id);
        id
    }

    /// Parse `bytes` and register the font under `family`
    pub fn load<S: AsRef<str>>(&mut self, family: S, bytes: Vec<u8>) -> Result<Id<Font>, LabelError> {
        Ok(self.add(family, Font::load(bytes)?))
    }

    /// Make an already registered family the fallback for unknown families
    pub fn set_default<S: AsRef<str>>(&mut self, family: S) -> Result<(), LabelError> {
        let family = family.as_ref();
        let id = self
            .families
            .get(&family.to_lowercase())
            .copied()
            .ok_or_else(|| LabelError::MissingFont(family.to_string()))?;
        self.default = Some(id);
        Ok(())
    }

    /// The font used for `family`
    pub fn resolve(&self, family: &str) -> Option<Id<Font>> {
        self.families
            .get(&family.to_lowercase())
            .copied()
            .or(self.default)
    }

    pub fn get(&self, id: Id<Font>) -> Option<&Font> {
        self.fonts.get(id)
    }

    /// The font used for `family`, or [LabelError::MissingFont] when there's none
    pub fn require(&self, family: &str) -> Result<(Id<Font>, &Font), LabelError> {
        self.resolve(family)
            .and_then(|id| self.fonts.get(id).map(|font| (id, font)))
            .ok_or_else(|| LabelError::MissingFont(family.to_string()))
    }
}

/// Measures with the glyph advances of the resolved font. Text in a family with
/// no font at all measures zero wide; drawing it fails with [LabelError::MissingFont].
impl TextMeasure for FontBook {
    fn measure(&self, text: &str, font: &str, size: Pt) -> Pt {
        self.resolve(font)
            .and_then(|id| self.fonts.get(id))
            .map(|f| f.width_of(text, size))
            .unwrap_or(Pt::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dejavu() -> Font {
        Font::load(include_bytes!("../../assets/DejaVuSans.ttf").to_vec()).unwrap()
    }

    #[test]
    fn reads_names_and_measures() {
        let font = dejavu();
        assert_eq!(font.family().as_deref(), Some("DejaVu Sans"));
        let one = font.width_of("W", Pt(10.0));
        let two = font.width_of("WW", Pt(10.0));
        assert!(one > Pt::ZERO);
        assert!(two.approx_eq(one * 2.0, 1e-9));
        assert!(font.width_of("W", Pt(20.0)).approx_eq(one * 2.0, 1e-9));
    }

    #[test]
    fn unknown_families_use_the_default() {
        let mut book = FontBook::new();
        assert_eq!(book.measure("abc", "Helvetica", Pt(10.0)), Pt::ZERO);
        assert!(matches!(
            book.require("Helvetica"),
            Err(LabelError::MissingFont(_))
        ));

        let id = book.add("DejaVu Sans", dejavu());
        assert_eq!(book.resolve("dejavu sans"), Some(id));
        assert_eq!(book.resolve("Helvetica"), Some(id));
        assert!(book.measure("abc", "Helvetica", Pt(10.0)) > Pt::ZERO);
        assert!(book.set_default("Courier").is_err());
    }

    #[test]
    fn records_each_drawn_glyph_once() {
        let font = dejavu();
        let mut used = UsedGlyphs::new();
        let glyphs = font.encode("aba", &mut used);
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0], glyphs[2]);
        assert_eq!(used.len(), 2);
        assert_eq!(used.get(&glyphs[1]), Some(&'b'));
    }
}
