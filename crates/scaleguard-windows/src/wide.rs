/// Encodes a string as a null-terminated UTF-16 buffer.
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes a fixed-size, null-terminated UTF-16 buffer.
pub(crate) fn from_wide(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wide_appends_terminator() {
        assert_eq!(to_wide("DpiValue").last(), Some(&0));
        assert_eq!(to_wide("ab"), vec![u16::from(b'a'), u16::from(b'b'), 0]);
        assert_eq!(to_wide(""), vec![0]);
    }

    #[test]
    fn from_wide_stops_at_first_terminator() {
        // Arrange
        let mut buf = [0u16; 32];
        let text: Vec<u16> = r"MONITOR\DEL4097".encode_utf16().collect();
        buf[..text.len()].copy_from_slice(&text);
        buf[text.len() + 1] = u16::from(b'x');

        // Act / Assert
        assert_eq!(from_wide(&buf), r"MONITOR\DEL4097");
    }

    #[test]
    fn from_wide_reads_unterminated_buffer_whole() {
        let buf: Vec<u16> = "Generic PnP Monitor".encode_utf16().collect();
        assert_eq!(from_wide(&buf), "Generic PnP Monitor");
    }

    #[test]
    fn round_trips_non_ascii_labels() {
        assert_eq!(from_wide(&to_wide("Écran 4K")), "Écran 4K");
    }
}
