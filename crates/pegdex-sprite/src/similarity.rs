//! Name normalization and string similarity.

use std::collections::BTreeSet;

/// Tokens ignored by keyword matching.
pub const STOP_WORDS: &[&str] = &["the", "and", "of", "sprite", "icon", "img", "image", "tex", "texture"];

/// Tokens of this length or shorter are ignored by keyword matching.
pub const MAX_IGNORED_TOKEN_LEN: usize = 2;

/// Lower-cases and strips everything but `[a-z0-9]`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Levenshtein distance over chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

/// `1 - distance / max_len`, in `[0, 1]`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Splits a name into significant lower-case keywords.
pub fn keywords(name: &str) -> BTreeSet<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() > MAX_IGNORED_TOKEN_LEN && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Marks camel-case word breaks with `_`: `"GreenSlime"` becomes
/// `"Green_Slime"`. Other characters are kept as-is.
pub fn split_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.push(c);
    }
    out
}

/// Returns true if `needle` occurs in `haystack` with no letter directly
/// before or after it. Digits and separators count as boundaries.
pub fn contains_on_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Fire Dragon"), "firedragon");
        assert_eq!(normalize_name("fire_dragon_01"), "firedragon01");
        assert_eq!(normalize_name("  --  "), "");
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("stone", "stone"), 0);
        assert_eq!(levenshtein_distance("doctorb", "doctorbe"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "orb"), 3);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("doctorb", "doctorbe"), 0.875);
        assert_eq!(similarity("doctorbe", "doctorb"), 0.875);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_keywords() {
        let words = keywords("The Sprite of Fire-Dragon_01 ox");
        assert_eq!(
            words.into_iter().collect::<Vec<_>>(),
            vec!["dragon".to_string(), "fire".to_string()]
        );
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("GreenSlime"), "Green_Slime");
        assert_eq!(split_camel_case("StoneOrb-Lvl1"), "Stone_Orb-Lvl1");
        assert_eq!(split_camel_case("Lvl2Boss"), "Lvl2_Boss");
        assert_eq!(split_camel_case("UI panel"), "UI panel");
        assert_eq!(split_camel_case("doctorbe"), "doctorbe");
    }

    #[test]
    fn test_contains_on_boundary() {
        assert!(contains_on_boundary("firedragon01", "firedragon"));
        assert!(contains_on_boundary("fire_dragon_01", "fire_dragon"));
        assert!(!contains_on_boundary("doctorbe", "doctorb"));
        assert!(!contains_on_boundary("stone", ""));
        // Second occurrence is on a boundary.
        assert!(contains_on_boundary("orbs_orb", "orb"));
    }
}
