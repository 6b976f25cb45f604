//! Approximate monospace display width.
//!
//! This is a heuristic, not the East Asian Width table: above U+0100, any
//! character in one of the "Other" general categories (`Lo`, `No`, `Po`,
//! `So`, `Cn`) counts two columns.

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::escape::{is_high_surrogate, is_low_surrogate};

/// Display width of `text` in monospace columns.
pub fn display_width(text: &str) -> usize {
    let units: Vec<u16> = text.encode_utf16().collect();
    utf16_display_width(&units)
}

/// Display width over UTF-16 code units.
///
/// A surrogate pair counts 2, a lone surrogate 1, a wide character above
/// U+0100 counts 2 and everything else 1.
pub fn utf16_display_width(units: &[u16]) -> usize {
    let mut width = 0;
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if is_high_surrogate(unit) && units.get(i + 1).is_some_and(|u| is_low_surrogate(*u)) {
            width += 2;
            i += 2;
            continue;
        }
        width += match char::from_u32(u32::from(unit)) {
            None => 1,
            Some(c) if is_wide(c) => 2,
            Some(_) => 1,
        };
        i += 1;
    }
    width
}

fn is_wide(c: char) -> bool {
    if u32::from(c) <= 256 {
        return false;
    }
    matches!(
        get_general_category(c),
        GeneralCategory::OtherLetter
            | GeneralCategory::OtherNumber
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::OtherSymbol
            | GeneralCategory::Unassigned
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii() {
        assert_eq!(display_width("abc"), 3);
    }

    #[test]
    fn wide_characters() {
        assert_eq!(display_width("中文"), 4);
        assert_eq!(display_width("かな"), 4);
    }

    #[test]
    fn other_categories_are_wide() {
        // Po, So, No
        assert_eq!(display_width("…"), 2);
        assert_eq!(display_width("™"), 2);
        assert_eq!(display_width("①"), 2);
        // unassigned
        assert_eq!(display_width("\u{0378}"), 2);
    }

    #[test]
    fn combining_and_cased_marks_are_narrow() {
        // Devanagari vowel sign AA is Mc
        assert_eq!(display_width("\u{093E}"), 1);
        assert_eq!(display_width("\u{0301}"), 1);
        assert_eq!(display_width("Ā"), 1);
    }

    #[test]
    fn surrogate_pair() {
        assert_eq!(display_width("\u{1F600}"), 2);
    }

    #[test]
    fn lone_surrogate() {
        assert_eq!(utf16_display_width(&[0xD800, 0x0041]), 2);
    }

    #[test]
    fn latin1_is_narrow() {
        assert_eq!(display_width("héllo"), 5);
        assert_eq!(display_width("Ωμ"), 2);
    }

    #[test]
    fn empty() {
        assert_eq!(display_width(""), 0);
    }

    proptest! {
        #[test]
        fn ascii_width_is_length(text in "[ -~]{0,64}") {
            prop_assert_eq!(display_width(&text), text.len());
        }

        #[test]
        fn width_is_between_chars_and_double(text in "\\PC{0,32}") {
            let w = display_width(&text);
            prop_assert!(w <= text.chars().count() * 2);
            prop_assert!(w >= text.chars().count());
        }
    }
}
