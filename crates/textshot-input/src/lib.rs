//! Input reading and sanitizing for textshot
//!
//! The first stage of the pipeline. Takes whatever arrives on stdin and
//! turns it into text the monospace font can draw: printable ASCII and
//! line breaks, nothing else.

use std::io::{self, Read};

/// Reads the whole stream into a string
///
/// Every byte that is not part of valid UTF-8 becomes its own U+FFFD,
/// which [`sanitize`] later blanks. A truncated multibyte sequence turns
/// into one space per byte.
pub fn read_input(mut reader: impl Read) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("Read {} bytes of input", bytes.len());

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => decode_bytewise(err.as_bytes()),
    })
}

fn decode_bytewise(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        for _ in chunk.invalid() {
            text.push(char::REPLACEMENT_CHARACTER);
        }
    }
    text
}

/// Whether a character survives sanitizing unchanged
pub fn is_kept(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\n')
}

/// Replaces every character outside printable ASCII with a space
///
/// Newlines are kept. The output has exactly as many characters as the
/// input.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|ch| if is_kept(ch) { ch } else { ' ' })
        .collect()
}
