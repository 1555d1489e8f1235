//! Text encoding detection and decoding.
//!
//! Benchmark CSVs arrive as UTF-8 from Linux runners and as BOM-prefixed
//! UTF-16 when redirected through a Windows console. [`Encoding::sniff`]
//! inspects the raw bytes the way a `file --mime-encoding` style sniffer
//! does; [`Encoding::decode`] turns the bytes into a `String`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, ResultsError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A text encoding the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 7-bit ASCII.
    Ascii,
    /// UTF-8, with or without a byte-order mark.
    Utf8,
    /// UTF-16 whose byte order is given by a leading byte-order mark.
    ///
    /// A sniffed `utf-16le` with a BOM is reported as this generic variant;
    /// once the BOM is present the decoder does not need the distinction.
    Utf16,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// ISO-8859-1.
    Latin1,
}

impl Encoding {
    /// Canonical label, as printed by MIME-encoding sniffers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Ascii => "us-ascii",
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Latin1 => "iso-8859-1",
        }
    }

    /// Determines the encoding of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::Decode`] if the bytes look like binary data
    /// rather than text in any supported encoding.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(UTF8_BOM) {
            return Ok(Encoding::Utf8);
        }
        if bytes.starts_with(UTF16LE_BOM) || bytes.starts_with(UTF16BE_BOM) {
            return Ok(Encoding::Utf16);
        }
        if bytes.contains(&0) {
            return sniff_bomless_utf16(bytes);
        }
        if let Some(pos) = bytes.iter().position(|&b| is_control(b)) {
            return Err(binary_data(pos, bytes[pos]));
        }
        if bytes.is_ascii() {
            return Ok(Encoding::Ascii);
        }
        if std::str::from_utf8(bytes).is_ok() {
            return Ok(Encoding::Utf8);
        }
        // C1 controls never appear in ISO-8859 text.
        if let Some(pos) = bytes.iter().position(|b| (0x80..=0x9F).contains(b)) {
            return Err(binary_data(pos, bytes[pos]));
        }
        Ok(Encoding::Latin1)
    }

    /// Decodes `bytes` into text, dropping a leading byte-order mark.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::Decode`] if the bytes are not valid in this
    /// encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(self.error(format!(
                        "non-ASCII byte {:#04x} at offset {pos}",
                        bytes[pos]
                    )));
                }
                // ASCII is a subset of UTF-8.
                self.utf8(bytes)
            }
            Encoding::Utf8 => self.utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)),
            Encoding::Utf16 => {
                if let Some(rest) = bytes.strip_prefix(UTF16BE_BOM) {
                    self.utf16(rest, u16::from_be_bytes)
                } else {
                    // No BOM: little endian, like every platform we run on.
                    self.utf16(
                        bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes),
                        u16::from_le_bytes,
                    )
                }
            }
            Encoding::Utf16Le => self.utf16(
                bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes),
                u16::from_le_bytes,
            ),
            Encoding::Utf16Be => self.utf16(
                bytes.strip_prefix(UTF16BE_BOM).unwrap_or(bytes),
                u16::from_be_bytes,
            ),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    fn utf8(self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| self.error(e.utf8_error().to_string()))
    }

    fn utf16(self, bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
        if bytes.len() % 2 != 0 {
            return Err(self.error(format!("odd byte length {}", bytes.len())));
        }
        let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|e| self.error(e.to_string()))
    }

    fn error(self, reason: String) -> ResultsError {
        ResultsError::Decode {
            encoding: self.label(),
            reason,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "us-ascii" | "ascii" => Ok(Encoding::Ascii),
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            "utf-16le" | "utf16le" => Ok(Encoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Encoding::Utf16Be),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            _ => Err(ResultsError::UnknownEncoding(s.to_string())),
        }
    }
}

/// How the decoder picks an encoding for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingChoice {
    /// Sniff the encoding from the file contents.
    #[default]
    Auto,
    /// Always use this encoding.
    Fixed(Encoding),
}

impl FromStr for EncodingChoice {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(EncodingChoice::Auto)
        } else {
            s.parse().map(EncodingChoice::Fixed)
        }
    }
}

/// Reads the file at `path` and sniffs its encoding.
///
/// # Errors
///
/// Returns [`ResultsError::Io`] if the file cannot be read, or
/// [`ResultsError::Decode`] if it does not look like text.
pub fn detect_encoding(path: &Path) -> Result<Encoding> {
    Encoding::sniff(&read_bytes(path)?)
}

/// Reads and decodes the file at `path` in one pass.
///
/// The file is closed before this returns, on success and on error.
///
/// # Errors
///
/// Returns [`ResultsError::Io`] or [`ResultsError::Decode`].
pub fn read_decoded(path: &Path, choice: EncodingChoice) -> Result<(Encoding, String)> {
    let bytes = read_bytes(path)?;
    let encoding = match choice {
        EncodingChoice::Auto => Encoding::sniff(&bytes)?,
        EncodingChoice::Fixed(encoding) => encoding,
    };
    tracing::debug!(path = %path.display(), %encoding, len = bytes.len(), "decoding input");
    Ok((encoding, encoding.decode(&bytes)?))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ResultsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Classifies NUL-bearing input as BOM-less UTF-16 or binary.
///
/// ASCII-range text in UTF-16 has a zero high byte in every code unit, so
/// the zeros all land on odd offsets (LE) or all on even offsets (BE).
fn sniff_bomless_utf16(bytes: &[u8]) -> Result<Encoding> {
    let mut even_zeros = 0usize;
    let mut odd_zeros = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == 0 {
            if i % 2 == 0 {
                even_zeros += 1;
            } else {
                odd_zeros += 1;
            }
        }
    }

    let units = bytes.len() / 2;
    if bytes.len() % 2 == 0 && even_zeros == 0 && odd_zeros * 2 > units {
        Ok(Encoding::Utf16Le)
    } else if bytes.len() % 2 == 0 && odd_zeros == 0 && even_zeros * 2 > units {
        Ok(Encoding::Utf16Be)
    } else {
        let pos = bytes.iter().position(|&b| b == 0).unwrap_or(0);
        Err(binary_data(pos, 0))
    }
}

/// Control bytes that do not occur in text files.
fn is_control(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0E..=0x1A | 0x1C..=0x1F | 0x7F)
}

fn binary_data(pos: usize, byte: u8) -> ResultsError {
    ResultsError::Decode {
        encoding: "binary",
        reason: format!("control byte {byte:#04x} at offset {pos}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str, bom: bool) -> Vec<u8> {
        let mut out = if bom { UTF16LE_BOM.to_vec() } else { Vec::new() };
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    fn utf16be(text: &str, bom: bool) -> Vec<u8> {
        let mut out = if bom { UTF16BE_BOM.to_vec() } else { Vec::new() };
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_be_bytes());
        }
        out
    }

    #[test]
    fn sniff_ascii_and_utf8() {
        assert_eq!(Encoding::sniff(b"name,real_time\n").unwrap(), Encoding::Ascii);
        assert_eq!(
            Encoding::sniff("name,µs\n".as_bytes()).unwrap(),
            Encoding::Utf8
        );
        let mut bom = UTF8_BOM.to_vec();
        bom.extend_from_slice(b"name\n");
        assert_eq!(Encoding::sniff(&bom).unwrap(), Encoding::Utf8);
    }

    #[test]
    fn sniff_utf16_bom_is_generic() {
        let le = utf16le("name,real_time\r\n", true);
        let be = utf16be("name,real_time\r\n", true);
        assert_eq!(Encoding::sniff(&le).unwrap(), Encoding::Utf16);
        assert_eq!(Encoding::sniff(&be).unwrap(), Encoding::Utf16);
    }

    #[test]
    fn sniff_bomless_utf16() {
        let le = utf16le("name,real_time\n", false);
        let be = utf16be("name,real_time\n", false);
        assert_eq!(Encoding::sniff(&le).unwrap(), Encoding::Utf16Le);
        assert_eq!(Encoding::sniff(&be).unwrap(), Encoding::Utf16Be);
    }

    #[test]
    fn sniff_latin1() {
        assert_eq!(Encoding::sniff(b"caf\xe9\n").unwrap(), Encoding::Latin1);
    }

    #[test]
    fn sniff_rejects_binary() {
        assert!(matches!(
            Encoding::sniff(&[0x7F, 0x45, 0x4C, 0x46, 0x02, 0x01]),
            Err(ResultsError::Decode { encoding: "binary", .. })
        ));
        assert!(Encoding::sniff(&[b'a', 0, 0, b'b', 1]).is_err());
    }

    #[test]
    fn decode_strips_bom() {
        let text = "name,real_time\n";
        assert_eq!(Encoding::Utf16.decode(&utf16le(text, true)).unwrap(), text);
        assert_eq!(Encoding::Utf16.decode(&utf16be(text, true)).unwrap(), text);
        assert_eq!(Encoding::Utf16Le.decode(&utf16le(text, true)).unwrap(), text);
        let mut utf8 = UTF8_BOM.to_vec();
        utf8.extend_from_slice(text.as_bytes());
        assert_eq!(Encoding::Utf8.decode(&utf8).unwrap(), text);
    }

    #[test]
    fn decode_latin1() {
        assert_eq!(Encoding::Latin1.decode(b"caf\xe9").unwrap(), "café");
    }

    #[test]
    fn decode_rejects_invalid_bytes() {
        assert!(matches!(
            Encoding::Utf8.decode(b"ok\xff"),
            Err(ResultsError::Decode { encoding: "utf-8", .. })
        ));
        assert!(Encoding::Ascii.decode("µ".as_bytes()).is_err());
        assert!(Encoding::Utf16Le.decode(&[0x41, 0x00, 0x42]).is_err());
        // Lone high surrogate.
        assert!(Encoding::Utf16Le.decode(&[0x00, 0xD8]).is_err());
    }

    #[test]
    fn labels_round_trip() {
        for encoding in [
            Encoding::Ascii,
            Encoding::Utf8,
            Encoding::Utf16,
            Encoding::Utf16Le,
            Encoding::Utf16Be,
            Encoding::Latin1,
        ] {
            assert_eq!(encoding.label().parse::<Encoding>().unwrap(), encoding);
        }
        assert_eq!("AUTO".parse::<EncodingChoice>().unwrap(), EncodingChoice::Auto);
        assert_eq!(
            "latin1".parse::<EncodingChoice>().unwrap(),
            EncodingChoice::Fixed(Encoding::Latin1)
        );
        assert!("ebcdic".parse::<EncodingChoice>().is_err());
    }

    #[test]
    fn detect_missing_file_is_io_error() {
        let err = detect_encoding(Path::new("/nonexistent/results.csv")).unwrap_err();
        assert!(matches!(err, ResultsError::Io { .. }));
    }
}
