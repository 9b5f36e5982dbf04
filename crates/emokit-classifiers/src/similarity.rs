//! Ratcliff/Obershelp sequence similarity.
//!
//! The fuzzy lexicon stages need a matching-blocks ratio rather than an edit
//! distance: the score is `2 * M / (len(a) + len(b))` where `M` is the total
//! length of all recursively matched blocks. A one-character typo of a short
//! word ("hapyy" for "happy") scores 0.8, comfortably above the default 0.72
//! cutoff, while unrelated words stay far below it.

/// Similarity ratio between two strings in [0, 1].
///
/// Both strings empty is defined as a perfect match.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_total(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total length of matched blocks: the longest common block plus,
/// recursively, the matches to its left and to its right.
fn matching_total(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_total(&a[..ai], &b[..bi]) + matching_total(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block, earliest position on ties.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                cur[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
        cur.fill(0);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("happy", "happy"), 1.0);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity_ratio("happy", ""), 0.0);
    }

    #[test]
    fn test_single_typo_stays_above_cutoff() {
        // "hap" + "y" match out of 5+5 chars.
        let ratio = similarity_ratio("hapyy", "happy");
        assert!((ratio - 0.8).abs() < 1e-9, "got {ratio}");
        assert!(ratio >= 0.72);
    }

    #[test]
    fn test_unrelated_words_stay_below_cutoff() {
        assert!(similarity_ratio("table", "happy") < 0.72);
        assert!(similarity_ratio("wrong", "sorrow") < 0.72);
    }

    #[test]
    fn test_symmetry_of_block_matching() {
        let a = similarity_ratio("grossed", "grossedout");
        let b = similarity_ratio("grossedout", "grossed");
        assert!((a - b).abs() < 1e-9);
    }
}
