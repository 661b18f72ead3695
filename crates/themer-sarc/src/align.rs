//! Per-file data alignment.

/// Guess the alignment a payload needs inside a SARC from its magic.
///
/// GPU resources and nested archives must start on large boundaries or the
/// console refuses to map them; everything else only needs word alignment.
pub fn guess_alignment(data: &[u8]) -> usize {
    let starts = |magic: &[u8]| data.starts_with(magic);
    let at = |offset: usize, magic: &[u8]| data.get(offset..offset + magic.len()) == Some(magic);

    if starts(b"SARC") || starts(b"FRES") || starts(b"Gfx2") || starts(b"AAHS") || starts(b"BAHS") {
        0x2000
    } else if starts(b"FFNT") {
        0x2000
    } else if starts(b"BNTX") || starts(b"BNSH") || starts(b"FSHA") {
        0x1000
    } else if starts(b"Yaz") || starts(b"YB") || starts(b"BY") || starts(b"CFNT") || starts(b"CGFX") {
        0x80
    } else if starts(b"MsgStdBn") || starts(b"MsgPrjBn") {
        0x80
    } else if at(1, b"STM") || at(1, b"WAV") || at(1, b"STP") {
        0x20
    } else if starts(b"CTPK") {
        0x10
    } else if starts(b"AAMP") {
        8
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_magics() {
        assert_eq!(guess_alignment(b"BNTX\0\0\0\0"), 0x1000);
        assert_eq!(guess_alignment(b"SARC"), 0x2000);
        assert_eq!(guess_alignment(b"Yaz0"), 0x80);
        assert_eq!(guess_alignment(b"FSTM"), 0x20);
        assert_eq!(guess_alignment(b"FLYT"), 4);
        assert_eq!(guess_alignment(b""), 4);
    }
}
