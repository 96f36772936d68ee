//! Text-level building blocks: encoding recovery and word counting.

pub mod encoding;
pub mod word_count;

pub use encoding::{DecodedText, decode_lossy, resolve};
pub use word_count::{count_words, is_cjk_char};
