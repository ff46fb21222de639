use tracing::debug;

use crate::effects::{ModifierProbe, Qualifiers};

/// Reads the qualifier mask the desktop exported for this invocation.
pub(crate) struct SystemModifierProbe {
    raw: Option<String>,
}

impl SystemModifierProbe {
    pub(crate) fn new(raw: Option<String>) -> Self {
        Self { raw }
    }
}

impl ModifierProbe for SystemModifierProbe {
    fn qualifiers(&self) -> Option<Qualifiers> {
        let raw = self.raw.as_deref()?;
        let parsed = parse_qualifiers(raw);
        if parsed.is_none() {
            debug!(value = raw, "unreadable qualifier mask");
        }
        parsed
    }
}

/// Decimal or `0x`-prefixed hexadecimal; unknown bits are dropped.
pub(crate) fn parse_qualifiers(raw: &str) -> Option<Qualifiers> {
    let raw = raw.trim();
    let bits = match raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok()?,
        None => raw.parse::<u16>().ok()?,
    };
    Some(Qualifiers::from_bits_truncate(bits))
}
