//! Panic-free string helpers for labels.
//!
//! File names are arbitrary UTF-8; slicing them at a byte offset for
//! display must never land inside a character.

/// Snap a byte position to the nearest valid UTF-8 character boundary
/// at or before `byte_pos`.
pub fn snap_to_char_boundary(s: &str, byte_pos: usize) -> usize {
    if byte_pos >= s.len() {
        return s.len();
    }
    let mut pos = byte_pos;
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Safe string slice from start to `byte_pos`.
pub fn safe_slice_to(s: &str, byte_pos: usize) -> &str {
    &s[..snap_to_char_boundary(s, byte_pos)]
}

/// Shorten `name` to at most `max_chars` characters, ending in "..." when cut.
pub fn ellipsize(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let byte_pos = name.char_indices().nth(keep).map(|(i, _)| i).unwrap_or(name.len());
    format!("{}...", safe_slice_to(name, byte_pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_ascii() {
        let s = "hello";
        assert_eq!(snap_to_char_boundary(s, 0), 0);
        assert_eq!(snap_to_char_boundary(s, 3), 3);
        assert_eq!(snap_to_char_boundary(s, 100), 5);
    }

    #[test]
    fn test_snap_cjk() {
        // '中' is 3 bytes in UTF-8
        let s = "中文";
        assert_eq!(snap_to_char_boundary(s, 1), 0);
        assert_eq!(snap_to_char_boundary(s, 2), 0);
        assert_eq!(snap_to_char_boundary(s, 3), 3);
        assert_eq!(snap_to_char_boundary(s, 4), 3);
    }

    #[test]
    fn test_safe_slice() {
        let s = "café";
        assert_eq!(safe_slice_to(s, 4), "caf");
        assert_eq!(safe_slice_to(s, 5), "café");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short.txt", 12), "short.txt");
        assert_eq!(ellipsize("a-very-long-file-name.txt", 12), "a-very-long...");
        assert_eq!(ellipsize("日本語のファイル名です.txt", 5), "日本語の...");
    }
}
