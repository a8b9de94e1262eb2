use encoding_rs::{GBK, UTF_16LE, UTF_8};

/// Character set used to turn a raw serial line into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    Auto,
    #[default]
    Utf8,
    Utf16,
    Ascii,
    Gbk,
    Gb2312,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown text encoding `{0}` (expected one of Auto, UTF-8, UTF-16, ASCII, GBK, GB2312)")]
pub struct UnknownEncoding(pub String);

impl std::str::FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Self::Auto,
            "UTF-8" | "UTF8" => Self::Utf8,
            "UTF-16" | "UTF16" => Self::Utf16,
            "ASCII" => Self::Ascii,
            "GBK" => Self::Gbk,
            "GB2312" => Self::Gb2312,
            _ => return Err(UnknownEncoding(s.to_string())),
        })
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "Auto",
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Ascii => "ASCII",
            Self::Gbk => "GBK",
            Self::Gb2312 => "GB2312",
        };
        f.write_str(name)
    }
}

impl TextEncoding {
    /// Decodes `bytes` lossily; invalid sequences become U+FFFD (or `?` for ASCII).
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Auto => detect_and_decode(bytes),
            Self::Utf8 => UTF_8.decode_without_bom_handling(bytes).0.into_owned(),
            Self::Utf16 => UTF_16LE.decode(bytes).0.into_owned(),
            Self::Ascii => bytes.iter().map(|&b| if b < 128 { b as char } else { '?' }).collect(),
            Self::Gbk | Self::Gb2312 => GBK.decode(bytes).0.into_owned(),
        }
    }

    /// Width in bytes of one code unit, the granularity line framing works at.
    pub fn code_unit(&self) -> usize {
        match self {
            Self::Utf16 => 2,
            _ => 1,
        }
    }

    /// Decodes one received line and strips the trailing line terminator.
    pub fn decode_line(&self, bytes: &[u8]) -> String {
        let mut text = self.decode(bytes);
        let trimmed = text.trim_end_matches(['\r', '\n']).len();
        text.truncate(trimmed);
        text
    }
}

fn detect_and_decode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    encoding.decode(bytes).0.into_owned()
}
