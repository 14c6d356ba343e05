use crate::domain::model::{Encoding, LineEnding};

/// 分類時只看檔案開頭這麼多位元組
pub const SNIFF_LEN: usize = 8 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// 控制字元比例超過此值即視為二進位
const CONTROL_RATIO_PERCENT: usize = 30;

const BINARY_SIGNATURES: &[&[u8]] = &[
    b"\x89PNG\r\n\x1a\n",
    &[0xFF, 0xD8, 0xFF],
    b"GIF87a",
    b"GIF89a",
    b"%PDF-",
    b"PK\x03\x04",
    b"PK\x05\x06",
    &[0x1F, 0x8B],
    &[0xFD, b'7', b'z', b'X', b'Z', 0x00],
    &[0x28, 0xB5, 0x2F, 0xFD],
    &[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C],
    b"\x7fELF",
    &[0xCA, 0xFE, 0xBA, 0xBE],
    &[0xFE, 0xED, 0xFA, 0xCE],
    &[0xFE, 0xED, 0xFA, 0xCF],
    &[0xCE, 0xFA, 0xED, 0xFE],
    &[0xCF, 0xFA, 0xED, 0xFE],
    b"SQLite format 3\0",
    b"\0asm",
    b"OggS",
    b"RIFF",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encoding: Encoding,
    pub line_ending: LineEnding,
    pub counts: LineEndingCounts,
}

/// 偵測編碼與換行慣例
pub fn inspect(bytes: &[u8]) -> Detection {
    let encoding = detect_encoding(bytes);
    let counts = match (encoding, utf16_byte_order(bytes)) {
        (Encoding::Utf16, Some(order)) => LineEndingCounts::from_units(utf16_units(&bytes[2..], order)),
        _ => LineEndingCounts::tally(bytes),
    };

    Detection {
        encoding,
        line_ending: counts.dominant(),
        counts,
    }
}

pub fn utf16_byte_order(bytes: &[u8]) -> Option<ByteOrder> {
    match bytes {
        [0xFF, 0xFE, ..] => Some(ByteOrder::Little),
        [0xFE, 0xFF, ..] => Some(ByteOrder::Big),
        _ => None,
    }
}

pub fn utf16_units(body: &[u8], order: ByteOrder) -> impl Iterator<Item = u16> + '_ {
    body.chunks_exact(2).map(move |pair| match order {
        ByteOrder::Little => u16::from_le_bytes([pair[0], pair[1]]),
        ByteOrder::Big => u16::from_be_bytes([pair[0], pair[1]]),
    })
}

/// Content sniffing in the spirit of `file(1)`: magic numbers, NUL bytes and
/// the share of control characters in the first [`SNIFF_LEN`] bytes.
pub fn is_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }

    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    // UTF-16 內容本身就含 NUL，改以解碼後的字元判斷
    if let Some(order) = utf16_byte_order(head) {
        let units: Vec<u16> = utf16_units(&head[2..], order).collect();
        if !decodes_as_utf16(&units, bytes.len() > head.len()) {
            return true;
        }
        let control = units
            .iter()
            .filter(|&&unit| unit < 0x80 && is_suspicious_control(unit as u8))
            .count();
        return exceeds_control_ratio(control, units.len());
    }

    if BINARY_SIGNATURES.iter().any(|sig| head.starts_with(sig)) {
        return true;
    }

    if head.contains(&0) {
        return true;
    }

    let control = head.iter().filter(|&&b| is_suspicious_control(b)).count();
    exceeds_control_ratio(control, head.len())
}

/// 開頭被截斷時，最後一個 code unit 可能是被切開的代理對前半，不算錯誤
fn decodes_as_utf16(units: &[u16], truncated: bool) -> bool {
    let mut decoded = char::decode_utf16(units.iter().copied()).peekable();
    while let Some(result) = decoded.next() {
        if result.is_err() && !(truncated && decoded.peek().is_none()) {
            return false;
        }
    }
    true
}

fn is_suspicious_control(byte: u8) -> bool {
    match byte {
        b'\t' | b'\n' | b'\r' | 0x08 | 0x0C | 0x1B => false,
        0x00..=0x1F | 0x7F => true,
        _ => false,
    }
}

fn exceeds_control_ratio(control: usize, total: usize) -> bool {
    total > 0 && control * 100 > total * CONTROL_RATIO_PERCENT
}

/// UTF-16 BOM, then UTF-8 multi-byte sequences, then 7-bit ASCII.
pub fn detect_encoding(bytes: &[u8]) -> Encoding {
    if utf16_byte_order(bytes).is_some() {
        return Encoding::Utf16;
    }

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if std::str::from_utf8(body).is_ok() && (body.len() != bytes.len() || !body.is_ascii()) {
        return Encoding::Utf8;
    }

    if bytes.is_ascii() {
        return Encoding::Ascii;
    }

    Encoding::Unknown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineEndingCounts {
    pub crlf: usize,
    pub cr: usize,
    pub lf: usize,
}

impl LineEndingCounts {
    pub fn tally(bytes: &[u8]) -> Self {
        Self::from_units(bytes.iter().map(|&b| u16::from(b)))
    }

    /// 單獨的 CR 與 LF 不含 CRLF 中的那一個
    pub fn from_units(units: impl Iterator<Item = u16>) -> Self {
        const CR: u16 = b'\r' as u16;
        const LF: u16 = b'\n' as u16;

        let mut counts = Self::default();
        let mut pending_cr = false;
        for unit in units {
            match unit {
                LF if pending_cr => {
                    counts.crlf += 1;
                    pending_cr = false;
                }
                LF => counts.lf += 1,
                CR => {
                    if pending_cr {
                        counts.cr += 1;
                    }
                    pending_cr = true;
                }
                _ => {
                    if pending_cr {
                        counts.cr += 1;
                        pending_cr = false;
                    }
                }
            }
        }
        if pending_cr {
            counts.cr += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.crlf + self.cr + self.lf
    }

    /// Majority vote, ties broken CRLF >= CR >= LF. No terminators at all means LF.
    pub fn dominant(&self) -> LineEnding {
        if self.total() == 0 {
            LineEnding::Lf
        } else if self.crlf >= self.cr && self.crlf >= self.lf {
            LineEnding::Crlf
        } else if self.cr >= self.lf {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }
}
