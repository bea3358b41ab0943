use anyhow::{Error, anyhow};
use bytes::Bytes;

/// Integer code paired with a piece of field hardware.
///
/// On the wire the code is its ASCII decimal text and nothing else; the
/// datagram boundary is the only framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquipmentCode(pub u32);

impl EquipmentCode {
    pub fn encode(self) -> Bytes {
        Bytes::from(self.0.to_string())
    }

    pub fn decode(payload: &[u8]) -> Result<Self, Error> {
        if payload.is_empty() || !payload.iter().all(u8::is_ascii_digit) {
            return Err(anyhow!("equipment code payload is not decimal text"));
        }
        // Only ASCII digits remain, so the bytes are valid UTF-8.
        let text = std::str::from_utf8(payload)?;
        let code = text
            .parse()
            .map_err(|e| anyhow!("equipment code {text} out of range: {e}"))?;
        Ok(Self(code))
    }
}

impl std::fmt::Display for EquipmentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
