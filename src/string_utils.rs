//! UTF-8 boundary helpers
//!
//! Selections are byte ranges into the surface's plain text, while egui
//! reports cursors as character indices. Everything that crosses between the
//! two goes through these helpers so slicing never lands inside a character.

/// Largest char boundary `<= index`, clamped to the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary `>= index`, clamped to the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Byte offset of the previous character start before `index`, or 0.
pub fn prev_char_boundary(s: &str, index: usize) -> usize {
    let index = floor_char_boundary(s, index);
    s[..index]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset just past the character starting at `index`.
pub fn next_char_boundary(s: &str, index: usize) -> usize {
    let index = floor_char_boundary(s, index);
    s[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(s.len())
}

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index, counting only whole
/// characters before it.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_and_ceil_ascii() {
        let s = "hello";
        assert_eq!(floor_char_boundary(s, 3), 3);
        assert_eq!(ceil_char_boundary(s, 3), 3);
        assert_eq!(floor_char_boundary(s, 99), 5);
        assert_eq!(ceil_char_boundary(s, 99), 5);
    }

    #[test]
    fn test_floor_and_ceil_multibyte() {
        let s = "på"; // 'å' spans bytes 1..3
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(ceil_char_boundary(s, 2), 3);
    }

    #[test]
    fn test_prev_and_next_boundary() {
        let s = "a中b";
        assert_eq!(next_char_boundary(s, 1), 4);
        assert_eq!(prev_char_boundary(s, 4), 1);
        assert_eq!(prev_char_boundary(s, 0), 0);
        assert_eq!(next_char_boundary(s, s.len()), s.len());
    }

    #[test]
    fn test_index_conversion() {
        let s = "Hei på deg";
        assert_eq!(char_index_to_byte_index(s, 5), 5);
        assert_eq!(char_index_to_byte_index(s, 6), 7);
        assert_eq!(char_index_to_byte_index(s, 100), s.len());
        assert_eq!(byte_index_to_char_index(s, 7), 6);
        assert_eq!(byte_index_to_char_index(s, 6), 5);
    }

    #[test]
    fn test_emoji() {
        let s = "🔗x";
        assert_eq!(floor_char_boundary(s, 2), 0);
        assert_eq!(ceil_char_boundary(s, 2), 4);
        assert_eq!(byte_index_to_char_index(s, 4), 1);
    }
}
