use std::fmt;

/// A 4-character chunk identifier, as used throughout the RIFF container
/// format (`RIFF`, `LIST`, `INFO`, `smpl`, `phdr`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub(crate) [u8; 4]);

impl FourCC {
    pub(crate) fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl PartialEq<&str> for FourCC {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<FourCC> for &str {
    fn eq(&self, other: &FourCC) -> bool {
        *self == other.as_str()
    }
}

impl From<&str> for FourCC {
    fn from(value: &str) -> Self {
        let bytes = value.as_bytes();
        let mut id = [b' '; 4];
        let len = bytes.len().min(4);
        id[..len].copy_from_slice(&bytes[..len]);
        FourCC(id)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_against_str() {
        let id = FourCC::from("RIFF");
        assert_eq!(id, "RIFF");
        assert_ne!(id, "LIST");
    }

    #[test]
    fn display_round_trips() {
        let id = FourCC::from("sfbk");
        assert_eq!(format!("{id}"), "sfbk");
    }
}
