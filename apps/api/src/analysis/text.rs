//! Text recovery — turns uploaded bytes into analyzable text.
//!
//! Binary uploads are decoded twice (UTF-8 lossy and latin-1), normalized,
//! and the decoding with more readable tokens wins; ties prefer UTF-8.
//! PDF payloads first try structured extraction and degrade to the byte-level
//! path when the extractor cannot produce readable text. Recovery never
//! fails: the worst case is an empty document.

use tracing::debug;

/// Decoded resume text plus its derived lowercase matching corpus.
///
/// `text` keeps line structure (tabs/newlines survive scrubbing) so section
/// detection can work line by line; `corpus` is fully collapsed and
/// lowercased for keyword scanning.
#[derive(Debug, Clone)]
pub struct DecodedText {
    text: String,
    corpus: String,
}

impl DecodedText {
    fn new(raw: String) -> Self {
        let text = scrub_text(&raw);
        let corpus = normalize_text(&text).to_lowercase();
        Self { text, corpus }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn word_count(&self) -> usize {
        self.corpus.split_whitespace().count()
    }
}

/// Recovers text from an uploaded document.
///
/// Declared plain text skips the decoding comparison entirely; PDF payloads
/// get a structured-extraction attempt first.
pub fn recover_text(bytes: &[u8], file_name: &str, content_type: Option<&str>) -> DecodedText {
    if is_plain_text(file_name, content_type) {
        return DecodedText::new(String::from_utf8_lossy(bytes).into_owned());
    }

    if is_pdf(file_name, content_type) {
        match pdf_extract::extract_text_from_mem(bytes) {
            Ok(extracted) if !normalize_text(&extracted).is_empty() => {
                return DecodedText::new(extracted);
            }
            Ok(_) => debug!("PDF extraction produced no readable text, using byte decoding"),
            Err(e) => debug!("PDF extraction failed ({e}), using byte decoding"),
        }
    }

    let utf8 = String::from_utf8_lossy(bytes).into_owned();
    let latin1 = decode_latin1(bytes);

    let utf8_tokens = token_count(&utf8);
    let latin1_tokens = token_count(&latin1);

    if utf8_tokens >= latin1_tokens {
        DecodedText::new(utf8)
    } else {
        DecodedText::new(latin1)
    }
}

/// Replaces every character outside printable ASCII with a space,
/// keeping tabs, newlines, and carriage returns so line structure survives.
pub fn scrub_text(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            ' '..='~' => c,
            _ => ' ',
        })
        .collect()
}

/// Scrubs, collapses whitespace runs to single spaces, and trims.
/// Idempotent: normalizing already-normalized text is a no-op.
pub fn normalize_text(input: &str) -> String {
    scrub_text(input)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips leading list/punctuation noise from a line and collapses whitespace.
pub fn normalize_line(line: &str) -> String {
    let stripped = line.trim_start_matches(|c: char| {
        c.is_whitespace() || "*.,;:|/\\()[]{}<>-".contains(c)
    });
    normalize_text(stripped)
}

/// Splits recovered text into normalized, non-empty lines.
/// Falls back to sentence splitting when the document has no line breaks.
pub fn split_lines(text: &str) -> Vec<String> {
    let unified = text.replace('\r', "\n");
    let lines: Vec<String> = unified
        .split('\n')
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect();

    if !lines.is_empty() {
        return lines;
    }

    normalize_text(&unified)
        .split(['.', ';'])
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect()
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn token_count(decoded: &str) -> usize {
    normalize_text(decoded).split_whitespace().count()
}

fn extension_is(file_name: &str, ext: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn is_plain_text(file_name: &str, content_type: Option<&str>) -> bool {
    extension_is(file_name, "txt")
        || content_type
            .map(|ct| ct.to_ascii_lowercase().starts_with("text/"))
            .unwrap_or(false)
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    extension_is(file_name, "pdf")
        || content_type
            .map(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            .unwrap_or(false)
}
