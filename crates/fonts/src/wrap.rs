use folio_traits::FontMetrics;

/// Breaks `text` into lines no wider than `max_width` points.
///
/// Explicit newlines always start a new line. Lines break at the last space
/// that fits; a word wider than the whole line is broken between characters.
/// Every line holds at least one character, so a tiny `max_width` cannot loop.
/// Widths include pair kerning, so a line fits exactly when
/// [`FontMetrics::text_width`] says it does.
pub fn split_lines(metrics: &dyn FontMetrics, text: &str, size: f32, max_width: f32) -> Vec<String> {
    let scale = size / 1000.0;
    let advance = |prev: Option<char>, ch: char| {
        let kern = prev.map_or(0.0, |p| metrics.kerning(p, ch));
        (metrics.glyph_width(ch) + kern) * scale
    };
    let run_width = |chars: &[char]| {
        chars
            .iter()
            .enumerate()
            .map(|(i, ch)| advance(i.checked_sub(1).map(|p| chars[p]), *ch))
            .sum::<f32>()
    };
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.trim_end_matches('\r').chars().collect();
        let mut start = 0;
        let mut last_space: Option<usize> = None;
        let mut width = 0.0;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            if ch == ' ' {
                last_space = Some(i);
            }
            width += advance(if i > start { Some(chars[i - 1]) } else { None }, ch);

            if width > max_width && i > start {
                match last_space {
                    Some(space) => {
                        lines.push(collect_line(&chars[start..space]));
                        start = space + 1;
                    }
                    None => {
                        lines.push(collect_line(&chars[start..i]));
                        start = i;
                    }
                }
                last_space = None;
                width = run_width(&chars[start..=i]);
            }
            i += 1;
        }
        lines.push(collect_line(&chars[start.min(chars.len())..]));
    }
    lines
}

fn collect_line(chars: &[char]) -> String {
    let line: String = chars.iter().collect();
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StandardFont, StandardMetrics, TrueTypeMetrics};

    fn courier() -> StandardMetrics {
        // 600 units at 10pt is 6pt per character.
        StandardMetrics::new(StandardFont::Courier)
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(split_lines(&courier(), "hello", 10.0, 100.0), vec!["hello"]);
        assert_eq!(split_lines(&courier(), "", 10.0, 100.0), vec![""]);
    }

    #[test]
    fn breaks_at_last_space() {
        // 36pt holds six characters.
        let lines = split_lines(&courier(), "aaa bbb ccc", 10.0, 36.0);
        assert_eq!(lines, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn long_words_break_between_characters() {
        let lines = split_lines(&courier(), "abcdefghij", 10.0, 24.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn honours_explicit_newlines() {
        let lines = split_lines(&courier(), "one\r\ntwo\n\nthree", 10.0, 500.0);
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn kerned_text_that_fits_stays_on_one_line() {
        let bytes = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf"));
        let font = TrueTypeMetrics::from_bytes(bytes.to_vec()).unwrap();
        let text = "AVAVAVAVAV To To To Ty Ty Ty Wa Wa";
        let kerned = font.text_width(text, 12.0);
        let unkerned: f32 = text.chars().map(|ch| font.glyph_width(ch) * 12.0 / 1000.0).sum();
        assert!(kerned < unkerned - 1.0, "kerning should tighten the line");

        let width = (kerned + unkerned) / 2.0;
        assert_eq!(split_lines(&font, text, 12.0, width), vec![text]);
        assert_eq!(split_lines(&font, text, 12.0, kerned - 1.0).len(), 2);
    }

    #[test]
    fn zero_width_still_progresses() {
        let lines = split_lines(&courier(), "abc", 10.0, 0.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
