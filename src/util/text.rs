use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// CJK characters and most emoji take two columns, combining marks take none.
///
/// ```
/// use brackets_tv::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` columns, appending "..." when
/// text was cut.
///
/// Returns `Cow::Borrowed` when the string already fits. For widths of three
/// columns or fewer there is no room for a character plus the ellipsis, so as
/// many characters as fit are returned without one.
///
/// ```
/// use brackets_tv::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("你好世界", 7), "你好...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut used = 0;
        for (idx, c) in s.char_indices() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > max_width {
                break;
            }
            used += w;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    // Single pass: remember where the text would be cut to leave room for the
    // ellipsis, and stop as soon as the full string is known not to fit.
    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut used = 0;
    let mut cut_point = None;

    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if cut_point.is_none() && used + w > target_width {
            cut_point = Some(idx);
        }
        if used + w > max_width {
            let cut = cut_point.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS));
        }
        used += w;
    }

    Cow::Borrowed(s)
}

/// True for bytes that must not reach the terminal (tab, LF, CR excepted).
#[inline]
fn is_unsafe_byte(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
}

/// SEC-001: Strip terminal control characters and ANSI escape sequences.
///
/// Video titles, channel names and descriptions come from the catalog
/// service verbatim; anything the terminal would interpret is removed before
/// rendering.
///
/// Strips:
/// - ASCII control chars except tab, newline and carriage return
/// - CSI sequences: `\x1b[` ... final byte 0x40-0x7E
/// - OSC sequences: `\x1b]` ... BEL or ST (`\x1b\\`)
/// - Bare ESC
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_unsafe_byte(b)) {
        return Cow::Borrowed(s);
    }

    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < len {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < len {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_unsafe_byte(b) {
            i += 1;
        } else {
            let start = i;
            i += 1;
            while i < len && !is_unsafe_byte(bytes[i]) {
                i += 1;
            }
            // Only ASCII control bytes end a run, and those never occur
            // inside a multi-byte sequence, so the slice is valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_truncation() {
        // target = 8 - 3 = 5 columns of text
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
    }

    #[test]
    fn test_cjk_truncation() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好", 10), "你好");
        // target 2: only one wide char fits
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
    }

    #[test]
    fn test_emoji_truncation() {
        // "Hello 🎉 World" is 14 columns
        assert_eq!(truncate_to_width("Hello 🎉 World", 12), "Hello 🎉 ...");
        assert_eq!(truncate_to_width("Hello 🎉 World", 11), "Hello 🎉...");
    }

    #[test]
    fn test_edge_case_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("你好", 1), "");
        assert_eq!(truncate_to_width("你好", 2), "你");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("Hi", 3), "Hi");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_exact_fit_is_borrowed() {
        let result = truncate_to_width("12345", 5);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "12345");
    }

    #[test]
    fn test_truncated_result_fits() {
        let title = "System Design Interview: 设计一个分布式缓存 (Part 2)";
        for width in 0..60 {
            let out = truncate_to_width(title, width);
            assert!(display_width(&out) <= width, "width {} gave {:?}", width, out);
        }
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Consistent Hashing Explained\nwith examples\t(2024)";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_control_chars_removes_controls() {
        let input = "he\x00ll\x07o\x08 w\x0bor\x0cld\x01!\x7f";
        assert_eq!(strip_control_chars(input), "hello world!");
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
        assert_eq!(strip_control_chars("\x1b]0;title\x07after"), "after");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\after"), "after");
        assert_eq!(strip_control_chars("bare\x1besc"), "bareesc");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        assert_eq!(
            strip_control_chars("日本語 \x1b[31m赤い\x1b[0m テキスト"),
            "日本語 赤い テキスト"
        );
    }
}
