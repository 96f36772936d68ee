//! Character-encoding recovery for untyped text.
//!
//! Plain-text files carry no declared encoding. [`resolve`] guesses one with
//! chardetng, scores the guess, and then walks an ordered list of candidate
//! decoders until one decodes the whole input without malformed sequences.
//!
//! - A confident guess (score >= [`MIN_DETECTION_CONFIDENCE`]) is tried first,
//!   followed by UTF-8 and GBK. This chain can be exhausted. A legacy guess is
//!   never confident while UTF-8 or GBK decodes the same bytes cleanly.
//! - Otherwise the blind chain UTF-8, GBK, GB2312, UTF-16, Latin-1 is used.
//!   Latin-1 maps every byte, so the blind chain always succeeds.

use chardetng::EncodingDetector;
use encoding_rs::{
    Encoding, GB18030, GBK, GBK_INIT, UTF_8, UTF_8_INIT, UTF_16BE, UTF_16LE, UTF_16LE_INIT, WINDOWS_1252_INIT,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TallyError};

/// Detection scores below this fall back to the blind candidate chain.
pub const MIN_DETECTION_CONFIDENCE: f64 = 0.5;

static SUSPICIOUS_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B-\x0C\x0E-\x1F\x7F-\x9F\u{FFFD}]")
        .expect("Suspicious chars regex pattern is valid and should compile")
});

/// A named decoder in a fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub label: &'static str,
    pub encoding: &'static Encoding,
}

impl Candidate {
    const fn new(label: &'static str, encoding: &'static Encoding) -> Self {
        Self { label, encoding }
    }
}

/// Tried in order when detection is inconclusive. `gb2312` is decoded by the GBK
/// superset and `latin-1` by windows-1252, as in the WHATWG encoding standard.
pub static BLIND_CHAIN: [Candidate; 5] = [
    Candidate::new("utf-8", &UTF_8_INIT),
    Candidate::new("gbk", &GBK_INIT),
    Candidate::new("gb2312", &GBK_INIT),
    Candidate::new("utf-16", &UTF_16LE_INIT),
    Candidate::new("latin-1", &WINDOWS_1252_INIT),
];

/// Decoded text together with the label of the decoder that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: Option<&'static str>,
}

/// Outcome of statistical detection.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub encoding: &'static Encoding,
    pub confidence: f64,
}

impl Detection {
    pub fn is_confident(&self) -> bool {
        self.confidence >= MIN_DETECTION_CONFIDENCE
    }
}

/// Weight for a guess chardetng itself does not vouch for.
const UNASSESSED_GUESS_WEIGHT: f64 = 0.4;

/// Weight for a guess that UTF-8 or GBK, both ahead of it in the blind chain,
/// can also decode cleanly.
const CONTESTED_GUESS_WEIGHT: f64 = 0.25;

/// Guess the encoding of `bytes` and score the guess in `[0, 1]`.
///
/// The score is derived from a replacing decode with the guessed encoding: the
/// more replacement and control characters it yields, the lower the score. It
/// is then scaled down when chardetng reports the guess as unreliable, and when
/// the guess is neither UTF-8 nor GBK while one of those decodes the input
/// without errors. A contested guess always scores below
/// [`MIN_DETECTION_CONFIDENCE`].
pub fn detect(bytes: &[u8]) -> Detection {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let (encoding, assessed) = detector.guess_assess(None, true);

    let (encoding, body) = strip_bom(encoding, bytes);
    let (decoded, _) = encoding.decode_without_bom_handling(body);

    let mut confidence = text_confidence(&decoded);
    if !assessed {
        confidence *= UNASSESSED_GUESS_WEIGHT;
    }
    if is_contested(encoding, bytes) {
        confidence *= CONTESTED_GUESS_WEIGHT;
    }

    Detection { encoding, confidence }
}

/// True when `guess` is a legacy encoding and a preferred decoder also accepts `bytes`.
fn is_contested(guess: &'static Encoding, bytes: &[u8]) -> bool {
    if guess == UTF_8 || guess == GBK || guess == GB18030 {
        return false;
    }
    decode_strict(UTF_8, bytes).is_some() || decode_strict(GBK, bytes).is_some()
}

/// Share of characters in `text` that are neither control nor replacement characters,
/// with suspicious characters weighted double.
pub fn text_confidence(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let total = text.chars().count() as f64;
    let suspicious = SUSPICIOUS_CHARS.find_iter(text).count() as f64;

    ((total - suspicious * 2.0) / total).clamp(0.0, 1.0)
}

/// Recover text from bytes of unknown encoding.
///
/// Empty input decodes to an empty string. Returns
/// [`TallyError::EncodingUnresolved`] only when detection was confident and the
/// guided chain (detected, UTF-8, GBK) could not decode the input.
pub fn resolve(bytes: &[u8]) -> Result<DecodedText> {
    if bytes.is_empty() {
        return Ok(DecodedText {
            text: String::new(),
            encoding: None,
        });
    }

    let detection = detect(bytes);

    if detection.is_confident() {
        tracing::debug!(
            encoding = detection.encoding.name(),
            confidence = detection.confidence,
            "Using guided encoding chain"
        );
        decode_first(bytes, &guided_chain(detection.encoding)).ok_or(TallyError::EncodingUnresolved)
    } else {
        tracing::debug!(
            confidence = detection.confidence,
            "Encoding detection inconclusive, using blind chain"
        );
        decode_first(bytes, &BLIND_CHAIN).ok_or(TallyError::EncodingUnresolved)
    }
}

/// Lenient decoding that never fails.
///
/// A confident guess decodes with that encoding; anything else decodes as UTF-8.
/// Malformed sequences become U+FFFD in both cases.
pub fn decode_lossy(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let detection = detect(bytes);
    let encoding = if detection.is_confident() { detection.encoding } else { UTF_8 };

    let (encoding, body) = strip_bom(encoding, bytes);
    let (decoded, _) = encoding.decode_without_bom_handling(body);
    decoded.into_owned()
}

/// Chain used after a confident detection.
pub fn guided_chain(detected: &'static Encoding) -> [Candidate; 3] {
    [
        Candidate::new(detected.name(), detected),
        Candidate::new("utf-8", UTF_8),
        Candidate::new("gbk", GBK),
    ]
}

/// Try each candidate in order; the first strict decode wins.
pub fn decode_first(bytes: &[u8], candidates: &[Candidate]) -> Option<DecodedText> {
    candidates.iter().find_map(|candidate| {
        decode_strict(candidate.encoding, bytes).map(|text| DecodedText {
            text,
            encoding: Some(candidate.label),
        })
    })
}

/// Decode the complete input, treating any malformed sequence as failure.
pub fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let (encoding, body) = strip_bom(encoding, bytes);
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

/// Drop a byte-order mark that agrees with `encoding`. A UTF-16 BOM also selects
/// the byte order for a UTF-16 candidate.
fn strip_bom<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> (&'static Encoding, &'a [u8]) {
    match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => (encoding, &bytes[bom_len..]),
        Some((bom_encoding, bom_len)) if is_utf16(encoding) && is_utf16(bom_encoding) => {
            (bom_encoding, &bytes[bom_len..])
        }
        _ => (encoding, bytes),
    }
}
