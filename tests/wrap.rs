use label_sheet::layout::{fit_font_size, wrap_text};
use label_sheet::Pt;

fn half_em(text: &str, _font: &str, size: Pt) -> Pt {
    Pt(text.chars().count() as f64 * size.0 * 0.5)
}

#[test]
fn wrapped_lines_stay_within_the_width() {
    let text = lipsum::lipsum(120);
    let width = Pt(100.0);
    let lines = wrap_text(&text, "Helvetica", Pt(10.0), width, None, &half_em);

    assert!(lines.len() > 1);
    for line in &lines {
        assert!(half_em(line, "Helvetica", Pt(10.0)) <= width, "{line:?} is too wide");
    }
    let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
    let words: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(rejoined, words);
}

#[test]
fn only_unbreakable_pieces_overflow() {
    let text = format!("{} SUPERCALIFRAGILISTIC end", lipsum::lipsum_words(6));
    let width = Pt(60.0);
    let lines = wrap_text(&text, "Helvetica", Pt(10.0), width, None, &half_em);

    for line in &lines {
        if half_em(line, "Helvetica", Pt(10.0)) > width {
            assert_eq!(line, "SUPERCALIFRAGILISTIC");
        }
    }
    assert!(lines.iter().any(|l| l == "SUPERCALIFRAGILISTIC"));

    let chunked = wrap_text("SUPERCALIFRAGILISTIC", "Helvetica", Pt(10.0), width, Some(7), &half_em);
    assert_eq!(chunked, vec!["SUPERCA", "LIFRAGI", "LISTIC"]);
}

#[test]
fn long_text_shrinks_until_it_fits() {
    let text = "lorem ipsum dolor sit amet consectetur adipiscing elit";
    let block = fit_font_size(text, "Helvetica", Pt(120.0), Pt(30.0), Pt(12.0), Pt(4.0), None, &half_em);
    assert_eq!(block.size, Pt(8.0));
    assert_eq!(
        block.lines,
        vec!["lorem ipsum dolor sit amet", "consectetur adipiscing elit"]
    );
    assert!(block.height() <= Pt(30.0));

    let cramped = fit_font_size(text, "Helvetica", Pt(120.0), Pt(4.0), Pt(12.0), Pt(4.0), None, &half_em);
    assert_eq!(cramped.size, Pt(4.0));
    assert_eq!(cramped.lines, vec![text]);
}
