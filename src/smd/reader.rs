//! Splitting an SMD byte stream into its XML header and binary payload

use std::fs;
use std::path::Path;

use log::debug;

use super::document::ScanDocument;
use super::SmdError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Byte ranges of the two regions of an SMD file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmdLayout {
    /// Name of the single top-level XML element
    pub xml_start: usize,
    /// One past the `>` of the closing root tag
    pub xml_end: usize,
    /// First byte of the binary payload
    pub binary_offset: usize,
}

impl SmdLayout {
    /// Locate the XML header and the binary payload in `bytes`
    ///
    /// The header is the single top-level element; the payload starts right
    /// after its closing tag, skipping one line break (`\n` or `\r\n`).
    pub fn locate(bytes: &[u8]) -> Result<Self, SmdError> {
        if bytes.is_empty() {
            return Err(SmdError::EmptyFile);
        }

        let start = if bytes.starts_with(UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };

        let (root_open, name) = find_root_element(bytes, start)?;
        let xml_end = find_closing_tag(bytes, root_open, name).ok_or_else(|| {
            SmdError::MalformedFile(format!(
                "no closing </{}> tag found",
                String::from_utf8_lossy(name)
            ))
        })?;

        let binary_offset = if bytes[xml_end..].starts_with(b"\r\n") {
            xml_end + 2
        } else if bytes[xml_end..].starts_with(b"\n") {
            xml_end + 1
        } else {
            xml_end
        };

        Ok(Self {
            xml_start: start,
            xml_end,
            binary_offset,
        })
    }

    /// The XML header as text
    pub fn xml<'a>(&self, bytes: &'a [u8]) -> Result<&'a str, SmdError> {
        Ok(std::str::from_utf8(&bytes[self.xml_start..self.xml_end])?)
    }

    /// The binary payload
    pub fn binary<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.binary_offset..]
    }
}

/// Read and decode the XML header of an SMD file
///
/// Returns the decoded document and the byte offset at which the binary
/// payload starts.
pub fn read_xml_part<P: AsRef<Path>>(path: P) -> Result<(ScanDocument, usize), SmdError> {
    let path = path.as_ref();
    let read = || -> Result<(ScanDocument, usize), SmdError> {
        let bytes = fs::read(path)?;
        let layout = SmdLayout::locate(&bytes)?;
        let document = ScanDocument::parse(layout.xml(&bytes)?)?;
        Ok((document, layout.binary_offset))
    };
    read().map_err(|e| e.in_file(path))
}

/// Read the binary payload of an SMD file, starting at `offset`
pub fn read_binary_part<P: AsRef<Path>>(path: P, offset: usize) -> Result<Vec<u8>, SmdError> {
    let path = path.as_ref();
    let mut bytes = fs::read(path).map_err(|e| SmdError::from(e).in_file(path))?;
    if offset > bytes.len() {
        return Err(SmdError::MalformedFile(format!(
            "binary offset {} beyond end of file ({} bytes)",
            offset,
            bytes.len()
        ))
        .in_file(path));
    }
    debug!("{}: {} payload bytes", path.display(), bytes.len() - offset);
    Ok(bytes.split_off(offset))
}

/// Find the opening `<` of the top-level element and its tag name
fn find_root_element(bytes: &[u8], from: usize) -> Result<(usize, &[u8]), SmdError> {
    let mut pos = from;
    while let Some(lt) = find(bytes, b"<", pos) {
        let rest = &bytes[lt..];
        if rest.starts_with(b"<?") {
            pos = skip_past(bytes, b"?>", lt)?;
        } else if rest.starts_with(b"<!--") {
            pos = skip_past(bytes, b"-->", lt)?;
        } else if rest.starts_with(b"<!") {
            pos = skip_past(bytes, b">", lt)?;
        } else {
            let name_start = lt + 1;
            let name_len = bytes[name_start..]
                .iter()
                .position(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
                .unwrap_or(bytes.len() - name_start);
            if name_len == 0 {
                return Err(SmdError::MalformedFile(
                    "root element has no name".to_string(),
                ));
            }
            return Ok((lt, &bytes[name_start..name_start + name_len]));
        }
    }
    Err(SmdError::MalformedFile("no XML root element found".to_string()))
}

/// Position just past the `</name>` that closes the root element
fn find_closing_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut needle = Vec::with_capacity(name.len() + 2);
    needle.extend_from_slice(b"</");
    needle.extend_from_slice(name);

    let mut pos = from;
    while let Some(found) = find(bytes, &needle, pos) {
        let mut end = found + needle.len();
        while end < bytes.len() && bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'>' {
            return Some(end + 1);
        }
        pos = found + 1;
    }
    None
}

fn skip_past(bytes: &[u8], terminator: &[u8], from: usize) -> Result<usize, SmdError> {
    find(bytes, terminator, from)
        .map(|p| p + terminator.len())
        .ok_or_else(|| {
            SmdError::MalformedFile(format!(
                "unterminated markup, expected '{}'",
                String::from_utf8_lossy(terminator)
            ))
        })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
