/// Bytes inspected when sniffing for binary content.
const SNIFF_LEN: usize = 8192;

/// A file's bytes, classified by looking at what they contain.
#[derive(Debug, PartialEq, Eq)]
pub enum Content<'a> {
    Text(&'a str),
    Binary,
}

/// Classify file contents as text or binary without looking at the file name.
///
/// A NUL byte or a sample where more than a tenth of the bytes are control
/// characters means binary; so does anything that is not valid UTF-8.
pub fn classify(bytes: &[u8]) -> Content<'_> {
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];
    if sample.contains(&0) {
        return Content::Binary;
    }

    let suspicious = sample.iter().filter(|b| is_suspicious(**b)).count();
    if suspicious * 10 > sample.len() {
        return Content::Binary;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Content::Text(text),
        Err(_) => Content::Binary,
    }
}

fn is_suspicious(byte: u8) -> bool {
    match byte {
        b'\t' | b'\n' | b'\r' | 0x08 | 0x0c | 0x1b => false,
        0x00..=0x1f | 0x7f => true,
        _ => false,
    }
}
