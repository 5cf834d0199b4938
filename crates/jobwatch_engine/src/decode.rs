use encoding_rs::{Decoder, DecoderResult, Encoding, UTF_8};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed {encoding} byte sequence at stream offset {offset}")]
    Malformed { encoding: String, offset: u64 },
}

/// Stateful decoder for a byte stream delivered in arbitrary chunks.
///
/// A multi-byte character split across chunks is held back until its
/// remaining bytes arrive. A leading BOM is removed.
pub struct StreamDecoder {
    decoder: Decoder,
    encoding: &'static Encoding,
    consumed: u64,
}

impl StreamDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
            encoding,
            consumed: 0,
        }
    }

    pub fn utf8() -> Self {
        Self::new(UTF_8)
    }

    /// Picks the encoding from a `Content-Type` charset, falling back to UTF-8.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        let encoding = content_type
            .and_then(extract_charset)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        Self::new(encoding)
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes the next chunk. Pass `last = true` once the stream has ended so
    /// that an incomplete trailing sequence is reported.
    pub fn decode(&mut self, bytes: &[u8], last: bool) -> Result<String, DecodeError> {
        let mut text = String::new();
        let mut src = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length_without_replacement(src.len())
                .unwrap_or(src.len().saturating_mul(3) + 16);
            text.reserve(needed);
            let (result, read) = self
                .decoder
                .decode_to_string_without_replacement(src, &mut text, last);
            self.consumed += read as u64;
            src = &src[read..];
            match result {
                DecoderResult::InputEmpty => return Ok(text),
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(bad, after) => {
                    return Err(DecodeError::Malformed {
                        encoding: self.encoding.name().to_string(),
                        offset: self
                            .consumed
                            .saturating_sub(u64::from(bad) + u64::from(after)),
                    });
                }
            }
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
        })
        .next()
}
