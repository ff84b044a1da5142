//! Incremental UTF-8 decoder for streamed response bodies
//!
//! Chunks arrive on arbitrary byte boundaries. A multi-byte character split
//! across two chunks is held back until its remaining bytes arrive, so every
//! decoded increment is displayable text.
//!
//! - Chunks of any size are accepted; only an incomplete tail is held back
//! - Invalid sequences decode to U+FFFD
//! - `finish` flushes an incomplete tail lossily

/// Longest UTF-8 encoded character
const MAX_CHAR_WIDTH: usize = 4;

/// Streaming text decoder
#[derive(Debug)]
pub struct ChunkDecoder {
    /// Bytes of an incomplete trailing character, never more than three
    pending: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(MAX_CHAR_WIDTH),
        }
    }

    /// Decode one chunk, returning all text that is complete so far
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut consumed = 0;

        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_up_to = consumed + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[consumed..valid_up_to]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid_up_to + bad;
                        }
                        None => {
                            // Incomplete character at the end, wait for more bytes
                            consumed = valid_up_to;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        debug_assert!(self.pending.len() < MAX_CHAR_WIDTH);
        out
    }

    /// Flush whatever is still pending at end of stream
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }

    /// Bytes held back waiting for completion
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.decode(b"Hello. "), "Hello. ");
        assert_eq!(decoder.decode(b"World."), "World.");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_split_multibyte_character() {
        let mut decoder = ChunkDecoder::new();
        let bytes = "café".as_bytes();
        // 'é' is two bytes; cut between them
        let (head, tail) = bytes.split_at(bytes.len() - 1);

        assert_eq!(decoder.decode(head), "caf");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(tail), "é");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_four_byte_character_byte_by_byte() {
        let mut decoder = ChunkDecoder::new();
        let mut out = String::new();
        for b in "🔗".as_bytes() {
            out.push_str(&decoder.decode(&[*b]));
        }
        assert_eq!(out, "🔗");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut decoder = ChunkDecoder::new();
        let out = decoder.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_finish_flushes_incomplete_tail() {
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.decode(&[b'x', 0xE2, 0x82]), "x");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.pending_len(), 0);
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_large_chunk_decoded_whole() {
        let mut decoder = ChunkDecoder::new();
        let chunk = vec![b'a'; 2 * 1024 * 1024];
        let out = decoder.decode(&chunk);
        assert_eq!(out.len(), chunk.len());
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_large_chunk_with_split_tail() {
        let mut decoder = ChunkDecoder::new();
        let mut chunk = vec![b'a'; 2 * 1024 * 1024];
        chunk.extend_from_slice(&"🔗".as_bytes()[..3]);
        assert_eq!(decoder.decode(&chunk).len(), 2 * 1024 * 1024);
        assert_eq!(decoder.pending_len(), 3);
        assert_eq!(decoder.decode(&"🔗".as_bytes()[3..]), "🔗");
    }
}
