use crate::core::detect::{utf16_byte_order, utf16_units, ByteOrder};
use crate::domain::model::{Encoding, LineEnding};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    #[error("source encoding could not be detected")]
    UnknownSource,

    #[error("cannot encode to an unknown encoding")]
    UnknownTarget,

    #[error("non-ASCII byte 0x{byte:02X} at offset {offset}")]
    NonAscii { byte: u8, offset: usize },

    #[error("invalid UTF-8 sequence after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("UTF-16 content has an odd number of bytes ({len})")]
    OddUtf16Length { len: usize },

    #[error("unpaired UTF-16 surrogate 0x{unit:04X}")]
    UnpairedSurrogate { unit: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// 只有 UTF-16 來源才有位元組順序
    pub byte_order: Option<ByteOrder>,
}

pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<DecodedText, TranscodeError> {
    match encoding {
        Encoding::Ascii => {
            if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(TranscodeError::NonAscii {
                    byte: bytes[offset],
                    offset,
                });
            }
            Ok(DecodedText {
                text: bytes.iter().map(|&b| char::from(b)).collect(),
                byte_order: None,
            })
        }
        Encoding::Utf8 => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            let text = std::str::from_utf8(body).map_err(|e| TranscodeError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            })?;
            Ok(DecodedText {
                text: text.to_string(),
                byte_order: None,
            })
        }
        Encoding::Utf16 => {
            // 沒有 BOM 時依 Unicode 慣例視為 big-endian
            let (order, body) = match utf16_byte_order(bytes) {
                Some(order) => (order, &bytes[2..]),
                None => (ByteOrder::Big, bytes),
            };
            if body.len() % 2 != 0 {
                return Err(TranscodeError::OddUtf16Length { len: bytes.len() });
            }
            let text = char::decode_utf16(utf16_units(body, order))
                .collect::<Result<String, _>>()
                .map_err(|e| TranscodeError::UnpairedSurrogate {
                    unit: e.unpaired_surrogate(),
                })?;
            Ok(DecodedText {
                text,
                byte_order: Some(order),
            })
        }
        Encoding::Unknown => Err(TranscodeError::UnknownSource),
    }
}

/// UTF-16 output always starts with a byte-order mark.
pub fn encode(text: &str, encoding: Encoding, order: ByteOrder) -> Result<Vec<u8>, TranscodeError> {
    match encoding {
        Encoding::Ascii => Ok(transliterate(text).into_bytes()),
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Utf16 => {
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            match order {
                ByteOrder::Little => out.extend_from_slice(&[0xFF, 0xFE]),
                ByteOrder::Big => out.extend_from_slice(&[0xFE, 0xFF]),
            }
            for unit in text.encode_utf16() {
                match order {
                    ByteOrder::Little => out.extend_from_slice(&unit.to_le_bytes()),
                    ByteOrder::Big => out.extend_from_slice(&unit.to_be_bytes()),
                }
            }
            Ok(out)
        }
        Encoding::Unknown => Err(TranscodeError::UnknownTarget),
    }
}

/// Best-effort ASCII rendition. Characters without an approximation become `?`.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else if let Some(replacement) = approximate(ch) {
            out.push_str(replacement);
        } else {
            out.push('?');
        }
    }
    out
}

fn approximate(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        // BOM 與零寬字元直接丟棄
        '\u{FEFF}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{00AD}' => "",
        '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => " ",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' => "*",
        '\u{00B7}' => ".",
        '\u{00AB}' => "<<",
        '\u{00BB}' => ">>",
        '\u{2039}' => "<",
        '\u{203A}' => ">",
        '\u{00A1}' => "!",
        '\u{00BF}' => "?",
        '\u{00A9}' => "(C)",
        '\u{00AE}' => "(R)",
        '\u{2122}' => "TM",
        '\u{20AC}' => "EUR",
        '\u{00A3}' => "GBP",
        '\u{00A5}' => "JPY",
        '\u{00A2}' => "c",
        '\u{00D7}' => "x",
        '\u{00F7}' => "/",
        '\u{00BC}' => "1/4",
        '\u{00BD}' => "1/2",
        '\u{00BE}' => "3/4",
        '\u{00C0}'..='\u{00C5}' | '\u{0100}' | '\u{0102}' | '\u{0104}' => "A",
        '\u{00E0}'..='\u{00E5}' | '\u{0101}' | '\u{0103}' | '\u{0105}' => "a",
        '\u{00C6}' => "AE",
        '\u{00E6}' => "ae",
        '\u{00C7}' | '\u{0106}' | '\u{010C}' => "C",
        '\u{00E7}' | '\u{0107}' | '\u{010D}' => "c",
        '\u{00D0}' | '\u{010E}' | '\u{0110}' => "D",
        '\u{00F0}' | '\u{010F}' | '\u{0111}' => "d",
        '\u{00C8}'..='\u{00CB}' | '\u{0118}' | '\u{011A}' => "E",
        '\u{00E8}'..='\u{00EB}' | '\u{0119}' | '\u{011B}' => "e",
        '\u{011E}' => "G",
        '\u{011F}' => "g",
        '\u{00CC}'..='\u{00CF}' | '\u{0130}' => "I",
        '\u{00EC}'..='\u{00EF}' | '\u{0131}' => "i",
        '\u{0141}' => "L",
        '\u{0142}' => "l",
        '\u{00D1}' | '\u{0143}' | '\u{0147}' => "N",
        '\u{00F1}' | '\u{0144}' | '\u{0148}' => "n",
        '\u{00D2}'..='\u{00D6}' | '\u{00D8}' | '\u{0150}' => "O",
        '\u{00F2}'..='\u{00F6}' | '\u{00F8}' | '\u{0151}' => "o",
        '\u{0152}' => "OE",
        '\u{0153}' => "oe",
        '\u{0158}' => "R",
        '\u{0159}' => "r",
        '\u{015A}' | '\u{015E}' | '\u{0160}' => "S",
        '\u{015B}' | '\u{015F}' | '\u{0161}' => "s",
        '\u{00DF}' => "ss",
        '\u{0162}' | '\u{0164}' => "T",
        '\u{0163}' | '\u{0165}' => "t",
        '\u{00DE}' => "TH",
        '\u{00FE}' => "th",
        '\u{00D9}'..='\u{00DC}' | '\u{016E}' | '\u{0170}' => "U",
        '\u{00F9}'..='\u{00FC}' | '\u{016F}' | '\u{0171}' => "u",
        '\u{00DD}' | '\u{0178}' => "Y",
        '\u{00FD}' | '\u{00FF}' => "y",
        '\u{0179}' | '\u{017B}' | '\u{017D}' => "Z",
        '\u{017A}' | '\u{017C}' | '\u{017E}' => "z",
        _ => return None,
    };
    Some(replacement)
}

/// CRLF -> LF, then any remaining CR -> LF. Other bytes are left alone, so this
/// is safe for every ASCII-compatible encoding.
pub fn normalize_to_lf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0usize;
    while i < input.len() {
        let b = input[i];
        if b == b'\r' {
            out.push(b'\n');
            if input.get(i + 1) == Some(&b'\n') {
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        out.push(b);
        i += 1;
    }
    out
}

pub fn expand_line_endings(lf_only: &[u8], target: LineEnding) -> Vec<u8> {
    match target {
        LineEnding::Lf => lf_only.to_vec(),
        LineEnding::Cr => lf_only
            .iter()
            .map(|&b| if b == b'\n' { b'\r' } else { b })
            .collect(),
        LineEnding::Crlf => {
            let extra = lf_only.iter().filter(|&&b| b == b'\n').count();
            let mut out = Vec::with_capacity(lf_only.len() + extra);
            for &b in lf_only {
                if b == b'\n' {
                    out.push(b'\r');
                }
                out.push(b);
            }
            out
        }
    }
}

pub fn convert_line_endings(input: &[u8], target: LineEnding) -> Vec<u8> {
    expand_line_endings(&normalize_to_lf(input), target)
}

/// Same two-phase rewrite on decoded text, used for UTF-16 content.
pub fn convert_line_endings_text(text: &str, target: LineEnding) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    match target {
        LineEnding::Lf => normalized,
        LineEnding::Cr => normalized.replace('\n', "\r"),
        LineEnding::Crlf => normalized.replace('\n', "\r\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line_endings_to_lf() {
        assert_eq!(
            convert_line_endings(b"line1\r\nline2\nline3\r", LineEnding::Lf),
            b"line1\nline2\nline3\n".to_vec()
        );
    }

    #[test]
    fn test_crlf_round_trip() {
        let original = b"one\r\ntwo\r\nthree\r\n";
        let lf = convert_line_endings(original, LineEnding::Lf);
        assert!(!lf.contains(&b'\r'));
        assert_eq!(convert_line_endings(&lf, LineEnding::Crlf), original.to_vec());
    }

    #[test]
    fn test_line_ending_conversion_is_idempotent() {
        let input = b"a\rb\r\nc\nd";
        for target in [LineEnding::Crlf, LineEnding::Cr, LineEnding::Lf] {
            let once = convert_line_endings(input, target);
            let twice = convert_line_endings(&once, target);
            assert_eq!(once, twice, "target {target}");
        }
    }

    #[test]
    fn test_empty_input_stays_empty() {
        for target in [LineEnding::Crlf, LineEnding::Cr, LineEnding::Lf] {
            assert!(convert_line_endings(b"", target).is_empty());
        }
    }

    #[test]
    fn test_text_variant_matches_byte_variant() {
        let input = "x\r\ny\rz\n";
        for target in [LineEnding::Crlf, LineEnding::Cr, LineEnding::Lf] {
            assert_eq!(
                convert_line_endings_text(input, target).into_bytes(),
                convert_line_endings(input.as_bytes(), target)
            );
        }
    }

    #[test]
    fn test_ascii_to_utf16_has_bom() {
        let decoded = decode(b"hi\n", Encoding::Ascii).unwrap();
        let encoded = encode(&decoded.text, Encoding::Utf16, ByteOrder::Little).unwrap();
        assert_eq!(encoded, vec![0xFF, 0xFE, b'h', 0, b'i', 0, b'\n', 0]);

        let back = decode(&encoded, Encoding::Utf16).unwrap();
        assert_eq!(back.text, "hi\n");
        assert_eq!(back.byte_order, Some(ByteOrder::Little));
    }

    #[test]
    fn test_utf16_big_endian_round_trip() {
        let encoded = encode("\u{00e9}t\u{00e9}", Encoding::Utf16, ByteOrder::Big).unwrap();
        assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
        assert_eq!(decode(&encoded, Encoding::Utf16).unwrap().text, "\u{00e9}t\u{00e9}");
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(
            decode(b"caf\xE9", Encoding::Unknown),
            Err(TranscodeError::UnknownSource)
        );
        assert!(matches!(
            decode(&[0xFF, 0xFE, b'a'], Encoding::Utf16),
            Err(TranscodeError::OddUtf16Length { .. })
        ));
        assert!(matches!(
            decode(&[0xFF, 0xFE, 0x00, 0xD8], Encoding::Utf16),
            Err(TranscodeError::UnpairedSurrogate { unit: 0xD800 })
        ));
        assert!(matches!(
            decode(b"ok\xC3", Encoding::Utf8),
            Err(TranscodeError::InvalidUtf8 { valid_up_to: 2 })
        ));
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("caf\u{e9} \u{2013} na\u{ef}ve"), "cafe - naive");
        assert_eq!(transliterate("\u{201c}Stra\u{df}e\u{201d}\u{2026}"), "\"Strasse\"...");
        assert_eq!(transliterate("\u{feff}\u{6f22}\u{5b57}"), "??");
    }

    #[test]
    fn test_utf8_bom_is_dropped_on_decode() {
        let decoded = decode(b"\xEF\xBB\xBFabc", Encoding::Utf8).unwrap();
        assert_eq!(decoded.text, "abc");
    }
}
