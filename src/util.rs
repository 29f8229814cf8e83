//! Text decoding and identifier helpers.

use std::borrow::Cow;

use encoding_rs::{Encoding, GB18030_INIT, UTF_8, UTF_8_INIT};
use tracing::{debug, warn};
use uuid::Uuid;

/// Encodings tried, in order, for input without a byte order mark.
///
/// GB18030 is a superset of GBK and GB2312, which covers nearly all legacy
/// Chinese text files.
pub static ENCODING_CANDIDATES: [&Encoding; 2] = [&UTF_8_INIT, &GB18030_INIT];

/// Decoded text together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    /// Name of the encoding that produced `text`.
    pub encoding: &'static str,
    /// True when every candidate failed and malformed bytes were replaced.
    pub lossy: bool,
}

/// Decode bytes to a string, trying each candidate encoding in turn.
///
/// This function:
/// 1. Honours a UTF-8 or UTF-16 byte order mark if present
/// 2. Tries each of [`ENCODING_CANDIDATES`] without replacement
/// 3. Falls back to UTF-8 with U+FFFD replacement, so it never fails
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// # Examples
///
/// ```
/// let gbk = encoding_rs::GBK.encode("第一章").0;
/// let decoded = txtepub::util::decode_text(&gbk);
/// assert_eq!(decoded.text, "第一章");
/// assert_eq!(decoded.encoding, "gb18030");
/// ```
pub fn decode_text(bytes: &[u8]) -> Decoded<'_> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, malformed) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        debug!(encoding = encoding.name(), malformed, "decoded text by byte order mark");
        return Decoded {
            text,
            encoding: encoding.name(),
            lossy: malformed,
        };
    }

    for encoding in &ENCODING_CANDIDATES {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!(encoding = encoding.name(), "decoded text");
            return Decoded {
                text,
                encoding: encoding.name(),
                lossy: false,
            };
        }
    }

    warn!("no candidate encoding matched; decoding with replacement characters");
    let (text, _) = UTF_8.decode_without_bom_handling(bytes);
    Decoded {
        text,
        encoding: UTF_8.name(),
        lossy: true,
    }
}

/// Build a `urn:uuid:` identifier, a version 5 UUID over `parts`.
///
/// The same parts always give the same identifier, so re-running a
/// conversion yields an identical package id.
pub fn stable_uuid<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut name = Vec::new();
    for part in parts {
        name.extend_from_slice(part.as_ref());
        // Separator so ("ab", "c") and ("a", "bc") differ.
        name.push(0);
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, &name).urn().to_string()
}
