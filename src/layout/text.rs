use crate::config::Alignment;
use crate::units::Pt;

/// Distance between consecutive baselines, as a multiple of the font size
pub const LINE_SPACING: f64 = 1.2;

/// Measures the advance width of a string set in a font family at a size.
///
/// Implemented for any `Fn(&str, &str, Pt) -> Pt` so tests and callers can
/// supply simple metrics; the PDF renderer's [`FontBook`](crate::pdf::FontBook)
/// measures with real glyph advances.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &str, size: Pt) -> Pt;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &str, Pt) -> Pt,
{
    fn measure(&self, text: &str, font: &str, size: Pt) -> Pt {
        self(text, font, size)
    }
}

/// Distance between the baselines of two wrapped lines
pub fn line_height(size: Pt) -> Pt {
    size * LINE_SPACING
}

/// Greedy line builder shared by every wrapping tier
struct Lines<'m, M: ?Sized> {
    measure: &'m M,
    font: &'m str,
    size: Pt,
    max_width: Pt,
    lines: Vec<String>,
    current: String,
}

impl<M: TextMeasure + ?Sized> Lines<'_, M> {
    fn fits(&self, text: &str) -> bool {
        self.measure.measure(text, self.font, self.size) <= self.max_width
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    /// Continue the current line with `piece`, or start a new line with it
    fn pack(&mut self, piece: &str) {
        if self.current.is_empty() {
            self.current.push_str(piece);
            return;
        }
        let candidate = format!("{} {piece}", self.current);
        if self.fits(&candidate) {
            self.current = candidate;
        } else {
            self.flush();
            self.current.push_str(piece);
        }
    }
}

/// Split `s` into runs of at most `len` characters
fn chunks(s: &str, len: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars.chunks(len).map(|c| c.iter().collect()).collect()
}

/// The pieces an over-wide word is broken into: hyphen parts (hyphen kept on all
/// but the last), each further cut into `max_word_length` character chunks
fn split_word(word: &str, max_word_length: Option<usize>) -> Vec<String> {
    let mut parts: Vec<String> = word.split_inclusive('-').map(str::to_string).collect();
    if let Some(max) = max_word_length.filter(|&m| m > 0) {
        parts = parts
            .into_iter()
            .flat_map(|part| {
                if part.chars().count() > max {
                    chunks(&part, max)
                } else {
                    vec![part]
                }
            })
            .collect();
    }
    parts
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Whole words are packed greedily first. A word too wide for a line of its own
/// is broken after its hyphens, and with `max_word_length` set any piece longer
/// than that many characters is cut into fixed-size chunks; the pieces are then
/// packed greedily like words, space separated. A piece that still can't be made
/// to fit is emitted as its own over-wide line.
///
/// Empty or whitespace-only input yields a single line holding the input as is.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    font: &str,
    size: Pt,
    max_width: Pt,
    max_word_length: Option<usize>,
    measure: &M,
) -> Vec<String> {
    let mut lines = Lines {
        measure,
        font,
        size,
        max_width,
        lines: Vec::new(),
        current: String::new(),
    };

    for word in text.split_whitespace() {
        let candidate = if lines.current.is_empty() {
            word.to_string()
        } else {
            format!("{} {word}", lines.current)
        };
        if lines.fits(&candidate) {
            lines.current = candidate;
            continue;
        }

        lines.flush();
        if lines.fits(word) {
            lines.current.push_str(word);
            continue;
        }

        for piece in split_word(word, max_word_length) {
            lines.pack(&piece);
        }
    }
    lines.flush();

    if lines.lines.is_empty() {
        vec![text.to_string()]
    } else {
        lines.lines
    }
}

/// A wrapped block and the font size it was wrapped at
#[derive(Debug, Clone, PartialEq)]
pub struct FittedBlock {
    pub size: Pt,
    pub lines: Vec<String>,
}

impl FittedBlock {
    /// Height of the block from the top of the first line to the bottom of the last
    pub fn height(&self) -> Pt {
        line_height(self.size) * self.lines.len() as f64
    }
}

/// Find the largest font size, stepping down one point at a time from `max_size`
/// to `min_size`, at which the wrapped text is no taller than `max_height`.
/// When no size fits, the text is wrapped at `min_size` regardless.
#[allow(clippy::too_many_arguments)]
pub fn fit_font_size<M: TextMeasure + ?Sized>(
    text: &str,
    font: &str,
    box_width: Pt,
    max_height: Pt,
    max_size: Pt,
    min_size: Pt,
    max_word_length: Option<usize>,
    measure: &M,
) -> FittedBlock {
    let steps = (max_size.0 - min_size.0).max(0.0).floor() as usize;
    for step in 0..=steps {
        let size = max_size - Pt(step as f64);
        let block = FittedBlock {
            size,
            lines: wrap_text(text, font, size, box_width, max_word_length, measure),
        };
        if block.height() <= max_height {
            return block;
        }
    }

    FittedBlock {
        size: min_size,
        lines: wrap_text(text, font, min_size, box_width, max_word_length, measure),
    }
}

/// Where a line starts when aligned within `available_width` starting at `x`
pub fn aligned_x<M: TextMeasure + ?Sized>(
    line: &str,
    font: &str,
    size: Pt,
    x: Pt,
    available_width: Pt,
    alignment: Alignment,
    measure: &M,
) -> Pt {
    match alignment {
        Alignment::Left => x,
        Alignment::Centre => x + (available_width - measure.measure(line, font, size)) / 2.0,
        Alignment::Right => x + available_width - measure.measure(line, font, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is half the font size wide
    fn half_em(text: &str, _font: &str, size: Pt) -> Pt {
        Pt(text.chars().count() as f64 * size.0 * 0.5)
    }

    // 10 chars at size 2
    const TEN: Pt = Pt(10.0);

    #[test]
    fn packs_whole_words_greedily() {
        let lines = wrap_text("ab cd ef ghi", "F", Pt(2.0), TEN, None, &half_em);
        assert_eq!(lines, vec!["ab cd ef", "ghi"]);
    }

    #[test]
    fn a_word_that_fits_alone_moves_down_whole() {
        let lines = wrap_text("abcdef ghi-jkl", "F", Pt(2.0), TEN, None, &half_em);
        assert_eq!(lines, vec!["abcdef", "ghi-jkl"]);
    }

    #[test]
    fn over_wide_words_break_after_hyphens() {
        let lines = wrap_text("ABCDE-FGHIJ-KL", "F", Pt(2.0), Pt(9.0), None, &half_em);
        assert_eq!(lines, vec!["ABCDE-", "FGHIJ- KL"]);

        let lines = wrap_text("AB-CD-EFGHIJKLM", "F", Pt(2.0), TEN, None, &half_em);
        assert_eq!(lines, vec!["AB- CD-", "EFGHIJKLM"]);
    }

    #[test]
    fn max_word_length_cuts_long_pieces() {
        let lines = wrap_text("ABCDEFGHIJKL", "F", Pt(2.0), Pt(4.0), Some(4), &half_em);
        assert_eq!(lines, vec!["ABCD", "EFGH", "IJKL"]);

        // chunks sharing a line stay apart, so no run exceeds the limit
        let lines = wrap_text("ABCDEFGHIJKL", "F", Pt(2.0), TEN, Some(4), &half_em);
        assert_eq!(lines, vec!["ABCD EFGH", "IJKL"]);

        // hyphen parts are shortened before they are packed
        let lines = wrap_text("AB-CDEFGHI", "F", Pt(2.0), Pt(5.0), Some(3), &half_em);
        assert_eq!(lines, vec!["AB-", "CDE", "FGH I"]);
    }

    #[test]
    fn chunks_count_characters_not_bytes() {
        let lines = wrap_text("ÄÖÜäöüß", "F", Pt(2.0), Pt(3.0), Some(3), &half_em);
        assert_eq!(lines, vec!["ÄÖÜ", "äöü", "ß"]);
    }

    #[test]
    fn indivisible_tokens_overflow_on_their_own_line() {
        let lines = wrap_text("a ABCDEFGHIJKLMN b", "F", Pt(2.0), TEN, None, &half_em);
        assert_eq!(lines, vec!["a", "ABCDEFGHIJKLMN", "b"]);
    }

    #[test]
    fn empty_input_is_a_single_line() {
        assert_eq!(wrap_text("", "F", Pt(2.0), TEN, None, &half_em), vec![""]);
        assert_eq!(wrap_text("  ", "F", Pt(2.0), TEN, None, &half_em), vec!["  "]);
    }

    #[test]
    fn fit_picks_the_largest_size_that_fits() {
        // too tall on two lines at 8, 7 and 6pt; one 40pt line at 5pt
        let fitted = fit_font_size(
            "abcdefg hijklmno",
            "F",
            Pt(40.0),
            Pt(10.0),
            Pt(8.0),
            Pt(5.0),
            None,
            &half_em,
        );
        assert_eq!(fitted.size, Pt(5.0));
        assert_eq!(fitted.lines, vec!["abcdefg hijklmno"]);
        assert!(fitted.height() <= Pt(10.0));
    }

    #[test]
    fn fit_falls_back_to_the_minimum() {
        let fitted = fit_font_size(
            "aaaa bbbb cccc dddd",
            "F",
            Pt(10.0),
            Pt(1.0),
            Pt(8.0),
            Pt(5.0),
            None,
            &half_em,
        );
        assert_eq!(fitted.size, Pt(5.0));
        assert_eq!(fitted.lines.len(), 4);
    }

    #[test]
    fn fit_stops_at_the_first_size_that_fits() {
        // one line of 4 chars at size s is 2s wide and 1.2s tall
        let fitted = fit_font_size("abcd", "F", Pt(100.0), Pt(8.5), Pt(8.0), Pt(5.0), None, &half_em);
        assert_eq!(fitted.size, Pt(7.0));
        assert_eq!(fitted.lines, vec!["abcd"]);
    }

    #[test]
    fn alignment_within_available_width() {
        let x = |alignment| aligned_x("abcd", "F", Pt(2.0), Pt(10.0), Pt(20.0), alignment, &half_em);
        assert_eq!(x(Alignment::Left), Pt(10.0));
        assert_eq!(x(Alignment::Centre), Pt(18.0));
        assert_eq!(x(Alignment::Right), Pt(26.0));
    }
}
