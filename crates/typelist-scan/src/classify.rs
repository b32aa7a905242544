//! Content classification.
//!
//! [`Classifier`] is the seam between the walk and whatever decides what a
//! file contains. [`SignatureClassifier`] is the built-in implementation: it
//! reads the head of a file and matches magic numbers, then falls back to
//! charset detection for text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use typelist_core::{ClassifyError, Label};

/// Number of bytes inspected from the start of a file.
const SNIFF_BYTES: usize = 64 * 1024;

/// Resolves the content-type label of a regular, non-empty file.
///
/// Callers never pass symbolic links, directories or empty files.
pub trait Classifier {
    /// Classify the file at `path`.
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError> {
        (**self).classify(path)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError> {
        (**self).classify(path)
    }
}

/// Magic-number and charset based classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureClassifier;

impl SignatureClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify an in-memory sample.
    ///
    /// `complete` tells whether `head` holds the whole file, which matters
    /// for formats that can only be confirmed by parsing everything.
    pub fn classify_bytes(&self, head: &[u8], complete: bool) -> Label {
        if head.is_empty() {
            return Label::empty_file();
        }

        if let Some(mime) = match_signature(head) {
            return Label::with_charset(mime, "binary");
        }

        match detect_charset(head, complete) {
            Some(charset) => Label::with_charset(text_subtype(head, complete), charset),
            None => Label::with_charset("application/octet-stream", "binary"),
        }
    }
}

impl Classifier for SignatureClassifier {
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError> {
        let file = File::open(path).map_err(|e| ClassifyError::io(path, e))?;
        let metadata = file.metadata().map_err(|e| ClassifyError::io(path, e))?;
        if !metadata.is_file() {
            return Err(ClassifyError::Unsupported {
                path: path.to_path_buf(),
            });
        }

        let mut head = Vec::with_capacity(SNIFF_BYTES.min(metadata.len() as usize));
        file.take(SNIFF_BYTES as u64 + 1)
            .read_to_end(&mut head)
            .map_err(|e| ClassifyError::io(path, e))?;

        let complete = head.len() <= SNIFF_BYTES;
        head.truncate(SNIFF_BYTES);

        Ok(self.classify_bytes(&head, complete))
    }
}

/// Binary formats recognised by a fixed byte pattern.
fn match_signature(head: &[u8]) -> Option<&'static str> {
    const PREFIXES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", "application/pdf"),
        (b"PK\x03\x04", "application/zip"),
        (b"PK\x05\x06", "application/zip"),
        (b"\x1f\x8b", "application/gzip"),
        (b"BZh", "application/x-bzip2"),
        (b"\xfd7zXZ\x00", "application/x-xz"),
        (b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
        (b"\x00asm", "application/wasm"),
        (b"SQLite format 3\x00", "application/vnd.sqlite3"),
        (b"OggS", "audio/ogg"),
        (b"fLaC", "audio/flac"),
        (b"ID3", "audio/mpeg"),
    ];

    if let Some((_, mime)) = PREFIXES.iter().find(|(magic, _)| head.starts_with(magic)) {
        return Some(*mime);
    }

    if head.starts_with(b"\x7fELF") {
        return Some(elf_kind(head));
    }

    if head.starts_with(b"RIFF") && head.len() >= 12 {
        match &head[8..12] {
            b"WEBP" => return Some("image/webp"),
            b"WAVE" => return Some("audio/x-wav"),
            b"AVI " => return Some("video/x-msvideo"),
            _ => {}
        }
    }

    if head.len() >= 262 && &head[257..262] == b"ustar" {
        return Some("application/x-tar");
    }

    if head.starts_with(b"BM") && head.len() >= 26 && head[6..10] == [0, 0, 0, 0] {
        return Some("image/bmp");
    }

    None
}

/// ELF subtype from the `e_type` header field.
fn elf_kind(head: &[u8]) -> &'static str {
    if head.len() < 18 {
        return "application/octet-stream";
    }
    // EI_DATA: 1 = little endian, 2 = big endian.
    let e_type = match head[5] {
        2 => u16::from_be_bytes([head[16], head[17]]),
        _ => u16::from_le_bytes([head[16], head[17]]),
    };
    match e_type {
        1 => "application/x-object",
        2 => "application/x-executable",
        3 => "application/x-sharedlib",
        4 => "application/x-coredump",
        _ => "application/octet-stream",
    }
}

/// Charset of a text sample, or `None` if it looks binary.
fn detect_charset(head: &[u8], complete: bool) -> Option<&'static str> {
    if head.iter().any(|&b| is_binary_control(b)) {
        return None;
    }

    if head.is_ascii() {
        return Some("us-ascii");
    }

    match std::str::from_utf8(head) {
        Ok(_) => return Some("utf-8"),
        // A multi-byte sequence cut off by the sample limit.
        Err(e) if e.error_len().is_none() && !complete => return Some("utf-8"),
        Err(_) => {}
    }

    // C1 control codes never appear in Latin-1 text.
    if head.iter().any(|&b| (0x80..0xa0).contains(&b)) {
        Some("unknown-8bit")
    } else {
        Some("iso-8859-1")
    }
}

/// Control bytes that do not occur in text files.
fn is_binary_control(b: u8) -> bool {
    matches!(b, 0x00..=0x06 | 0x0e..=0x1a | 0x1c..=0x1f | 0x7f)
}

/// MIME type of a text sample.
fn text_subtype(head: &[u8], complete: bool) -> &'static str {
    if let Some(interpreter) = shebang_interpreter(head) {
        return match interpreter {
            "sh" | "bash" | "dash" | "zsh" | "ksh" | "ash" => "text/x-shellscript",
            name if name.starts_with("python") => "text/x-script.python",
            name if name.starts_with("perl") => "text/x-perl",
            name if name.starts_with("ruby") => "text/x-ruby",
            _ => "text/plain",
        };
    }

    let trimmed = head.trim_ascii_start();
    if starts_with_ignore_case(trimmed, b"<?xml") {
        return "text/xml";
    }
    if starts_with_ignore_case(trimmed, b"<!doctype html") || starts_with_ignore_case(trimmed, b"<html") {
        return "text/html";
    }
    if complete
        && matches!(trimmed.first(), Some(b'{' | b'['))
        && serde_json::from_slice::<serde::de::IgnoredAny>(head).is_ok()
    {
        return "application/json";
    }

    "text/plain"
}

/// Program named on a `#!` line, with `env` resolved.
fn shebang_interpreter(head: &[u8]) -> Option<&str> {
    let rest = head.strip_prefix(b"#!")?;
    let line = rest.split(|&b| b == b'\n').next()?;
    let line = std::str::from_utf8(line).ok()?;

    let mut words = line.split_whitespace();
    let program = words.next()?;
    let name = program.rsplit('/').next()?;
    if name == "env" {
        words.find(|w| !w.starts_with('-'))
    } else {
        Some(name)
    }
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
