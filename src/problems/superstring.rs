//! Shortest common superstring via the open-path tour.
//!
//! Words that occur inside other words are dropped first. Placing word `j`
//! right after word `i` then costs the bytes of `j` not covered by the
//! longest suffix of `i` that is a prefix of `j`, and the first word costs
//! its full length, so the cheapest open path is the shortest superstring.

use crate::error::Result;
use crate::problems::tsp::Tsp;

/// Longest `k < min(len)` such that `a` ends with the first `k` bytes of `b`,
/// cut on character boundaries.
fn overlap(a: &str, b: &str) -> usize {
    let max = a.len().min(b.len());
    (1..max)
        .rev()
        .find(|&k| {
            b.is_char_boundary(k)
                && a.is_char_boundary(a.len() - k)
                && a.as_bytes()[a.len() - k..] == b.as_bytes()[..k]
        })
        .unwrap_or(0)
}

/// Distinct non-empty words, minus any word contained in another.
fn essential<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let mut distinct: Vec<&str> = Vec::new();
    for &w in words {
        if !w.is_empty() && !distinct.contains(&w) {
            distinct.push(w);
        }
    }
    distinct
        .iter()
        .enumerate()
        .filter(|&(i, w)| {
            !distinct
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.contains(w))
        })
        .map(|(_, w)| *w)
        .collect()
}

/// A shortest string containing every word as a substring.
///
/// Among equally short answers the one found first by the search is
/// returned.
pub fn shortest_superstring(words: &[&str]) -> Result<String> {
    let words = essential(words);
    let n = words.len();
    let overlaps: Vec<Vec<usize>> = words
        .iter()
        .map(|a| words.iter().map(|b| overlap(a, b)).collect())
        .collect();
    let dist = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (words[j].len() - overlaps[i][j]) as i64)
                .collect()
        })
        .collect();
    let start = words.iter().map(|w| w.len() as i64).collect();

    let Some(tour) = Tsp::open_with_start_costs(dist, start)?.solve()? else {
        return Ok(String::new());
    };

    let mut out = String::with_capacity(tour.cost as usize);
    let mut prev = None;
    for &j in &tour.order {
        let skip = prev.map_or(0, |i: usize| overlaps[i][j]);
        out.push_str(&words[j][skip..]);
        prev = Some(j);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(words: &[&str], expected_len: usize) {
        let s = shortest_superstring(words).unwrap();
        assert_eq!(s.len(), expected_len, "{s}");
        for w in words {
            assert!(s.contains(w), "{w} missing from {s}");
        }
    }

    #[test]
    fn overlaps_are_maximal() {
        assert_eq!(overlap("abcde", "cdefg"), 3);
        assert_eq!(overlap("abc", "xyz"), 0);
        assert_eq!(overlap("aaa", "aaa"), 2);
    }

    #[test]
    fn disjoint_words_concatenate() {
        check(&["alex", "loves", "leetcode"], 17);
    }

    #[test]
    fn overlapping_words_share_text() {
        check(&["catg", "ctaagt", "gcta", "ttca", "atgcatc"], 16);
        check(&["abc", "bcd", "cde"], 5);
    }

    #[test]
    fn contained_and_repeated_words_collapse() {
        check(&["abcd", "bc", "abcd", ""], 4);
        assert_eq!(shortest_superstring(&[]).unwrap(), "");
    }

    #[test]
    fn multibyte_words_stay_valid() {
        check(&["héllo", "llo wörld"], "héllo wörld".len());
    }
}
