//! Yaz0 compression codec.
//!
//! Yaz0 is the LZ77 variant Nintendo uses to compress SARC archives into
//! `.szs` files and theme packs into `.nxtheme` files.
//!
//! # Stream Format
//!
//! After the 16-byte [`Header`], data is stored in groups. Each group starts
//! with a code byte whose bits (most significant first) describe up to eight
//! chunks:
//!
//! - bit set: one literal byte follows
//! - bit clear: a back reference follows, `NR RR` where the distance is
//!   `0xRRR + 1` and the length is `N + 2`, or when `N == 0` a third byte
//!   holds `length - 0x12`
//!
//! # Example
//!
//! ```
//! let original = b"abcabcabcabcabcabc".to_vec();
//! let packed = themer_yaz0::compress(&original, 3, 0);
//!
//! assert!(themer_yaz0::is_yaz0(&packed));
//! assert_eq!(themer_yaz0::decompress(&packed)?, original);
//! # Ok::<(), themer_yaz0::Error>(())
//! ```

mod compress;
mod decompress;
mod error;
mod header;

pub use compress::{compress, MAX_LEVEL};
pub use decompress::decompress;
pub use error::{Error, Result};
pub use header::Header;

/// Check whether a buffer starts with the Yaz0 magic.
pub fn is_yaz0(data: &[u8]) -> bool {
    data.len() >= Header::SIZE && &data[..4] == Header::MAGIC
}
