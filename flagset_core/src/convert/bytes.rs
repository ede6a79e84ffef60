use crate::api::Primitive;
use crate::error::ValueError;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PADDING: u8 = b'=';

/// Raw bytes written as hex digits, displayed in upper case (ex: `0AFF`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BytesHex(pub Vec<u8>);

/// Raw bytes written in padded standard base64 (ex: `AQ==`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BytesBase64(pub Vec<u8>);

impl Primitive for BytesHex {
    const TYPE_NAME: &'static str = "bytesHex";
    const SLICE_NAME: &'static str = "bytesHexSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        decode_hex(raw.trim())
            .map(Self)
            .ok_or_else(|| ValueError::syntax(Self::TYPE_NAME, raw))
    }

    fn format(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02X}")).collect()
    }
}

impl Primitive for BytesBase64 {
    const TYPE_NAME: &'static str = "bytesBase64";
    const SLICE_NAME: &'static str = "bytesBase64Slice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        decode_base64(raw.trim())
            .map(Self)
            .ok_or_else(|| ValueError::syntax(Self::TYPE_NAME, raw))
    }

    fn format(&self) -> String {
        encode_base64(&self.0)
    }
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }

    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn sextet(symbol: u8) -> Option<u32> {
    BASE64_ALPHABET
        .iter()
        .position(|candidate| *candidate == symbol)
        .map(|position| position as u32)
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();

    if bytes.len() % 4 != 0 {
        return None;
    }

    let mut out = Vec::with_capacity(bytes.len() / 4 * 3);
    let quads = bytes.len() / 4;

    for (index, quad) in bytes.chunks(4).enumerate() {
        // Padding may only close the final quad, as `x===` is never valid.
        let padding = quad.iter().rev().take_while(|byte| **byte == PADDING).count();

        if padding > 2 || (padding > 0 && index + 1 != quads) {
            return None;
        }

        let mut group = 0u32;

        for symbol in &quad[..4 - padding] {
            group = (group << 6) | sextet(*symbol)?;
        }

        group <<= 6 * padding as u32;
        let decoded = group.to_be_bytes();
        out.extend_from_slice(&decoded[1..4 - padding]);
    }

    Some(out)
}

fn encode_base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() + 2) / 3 * 4);

    for chunk in bytes.chunks(3) {
        let mut group = [0u8; 4];
        group[1..1 + chunk.len()].copy_from_slice(chunk);
        let group = u32::from_be_bytes(group);

        for i in 0..4 {
            if i <= chunk.len() {
                let index = (group >> (18 - 6 * i)) & 0x3f;
                out.push(BASE64_ALPHABET[index as usize] as char);
            } else {
                out.push(PADDING as char);
            }
        }
    }

    out
}
