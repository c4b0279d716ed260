/// Symbol used for anything that is not one of the four canonical bases.
pub const WILDCARD: u8 = b'N';

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        _ => WILDCARD,
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}

/// 逐位比较（忽略大小写），返回不一致的位置；两条序列须等长。
/// 'N' 只与 'N' 相等，不作为通配符。
pub fn mismatch_positions(a: &[u8], b: &[u8]) -> Vec<usize> {
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| !x.eq_ignore_ascii_case(y))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revcomp_maps_unknown_symbols_to_wildcard() {
        assert_eq!(revcomp(b"ACGT"), b"ACGT");
        assert_eq!(revcomp(b"aacg"), b"CGTT");
        assert_eq!(revcomp(b"AXU"), b"NNT");
    }

    #[test]
    fn mismatches_are_case_insensitive_and_literal_for_n() {
        assert_eq!(mismatch_positions(b"ACGT", b"acgt"), Vec::<usize>::new());
        assert_eq!(mismatch_positions(b"ANGT", b"AAGA"), vec![1, 3]);
        assert_eq!(mismatch_positions(b"ANGT", b"ANGT"), Vec::<usize>::new());
    }
}
