//! Yaz0 compression.

use tracing::debug;
use zerocopy::IntoBytes;

use crate::Header;

/// Highest supported compression level.
pub const MAX_LEVEL: u8 = 9;

/// Maximum back-reference distance.
const WINDOW: usize = 0x1000;

/// Shortest match worth encoding.
const MIN_MATCH: usize = 3;

/// Longest match a back reference can express.
const MAX_MATCH: usize = 0xFF + 0x12;

const HASH_BITS: u32 = 15;
const NO_POS: u32 = u32::MAX;

/// Compress `data` into a Yaz0 stream.
///
/// `level` trades speed for ratio: level 0 stores every byte as a literal,
/// higher levels follow longer hash chains when searching for matches.
/// Levels above [`MAX_LEVEL`] behave like [`MAX_LEVEL`]. `alignment` is
/// recorded in the header for the loader.
pub fn compress(data: &[u8], level: u8, alignment: u32) -> Vec<u8> {
    let mut output = Vec::with_capacity(Header::SIZE + data.len() + data.len() / 8 + 1);
    output.extend_from_slice(Header::new(data.len() as u32, alignment).as_bytes());

    let mut finder = MatchFinder::new(data.len(), level.min(MAX_LEVEL));
    let mut pos = 0;

    while pos < data.len() {
        let code_index = output.len();
        output.push(0);
        let mut code = 0u8;

        for bit in 0..8 {
            if pos >= data.len() {
                break;
            }

            match finder.find(data, pos) {
                Some((distance, length)) => {
                    encode_reference(&mut output, distance, length);
                    for p in pos..pos + length {
                        finder.insert(data, p);
                    }
                    pos += length;
                }
                None => {
                    code |= 0x80 >> bit;
                    output.push(data[pos]);
                    finder.insert(data, pos);
                    pos += 1;
                }
            }
        }

        output[code_index] = code;
    }

    debug!(
        input = data.len(),
        output = output.len(),
        level,
        "compressed Yaz0 stream"
    );

    output
}

fn encode_reference(output: &mut Vec<u8>, distance: usize, length: usize) {
    let d = distance - 1;
    if length >= 0x12 {
        output.push((d >> 8) as u8);
        output.push(d as u8);
        output.push((length - 0x12) as u8);
    } else {
        output.push((((length - 2) << 4) | (d >> 8)) as u8);
        output.push(d as u8);
    }
}

/// Hash-chain match finder over 3-byte prefixes.
struct MatchFinder {
    head: Vec<u32>,
    prev: Vec<u32>,
    max_chain: usize,
}

impl MatchFinder {
    fn new(len: usize, level: u8) -> Self {
        let max_chain = if level == 0 { 0 } else { 4usize << level };
        let (head, prev) = if max_chain == 0 {
            (Vec::new(), Vec::new())
        } else {
            (vec![NO_POS; 1 << HASH_BITS], vec![NO_POS; len])
        };

        Self {
            head,
            prev,
            max_chain,
        }
    }

    #[inline]
    fn hash(bytes: &[u8]) -> usize {
        let v = (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32;
        (v.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
    }

    fn insert(&mut self, data: &[u8], pos: usize) {
        if self.max_chain == 0 || pos + MIN_MATCH > data.len() {
            return;
        }
        let h = Self::hash(&data[pos..]);
        self.prev[pos] = self.head[h];
        self.head[h] = pos as u32;
    }

    /// Find the longest earlier match for `pos`, returning `(distance, length)`.
    fn find(&self, data: &[u8], pos: usize) -> Option<(usize, usize)> {
        if self.max_chain == 0 || pos + MIN_MATCH > data.len() {
            return None;
        }

        let limit = MAX_MATCH.min(data.len() - pos);
        let mut candidate = self.head[Self::hash(&data[pos..])];
        let mut best = (0usize, 0usize);

        for _ in 0..self.max_chain {
            if candidate == NO_POS {
                break;
            }
            let cand = candidate as usize;
            let distance = pos - cand;
            if distance > WINDOW {
                break;
            }

            let length = data[cand..]
                .iter()
                .zip(&data[pos..pos + limit])
                .take_while(|(a, b)| a == b)
                .count();

            if length > best.1 {
                best = (distance, length);
                if length == limit {
                    break;
                }
            }

            candidate = self.prev[cand];
        }

        (best.1 >= MIN_MATCH).then_some(best)
    }
}
