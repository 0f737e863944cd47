//! Accent-insensitive, case-insensitive name folding for the reverse
//! resolver, built on `deunicode` — already a teacher workspace dependency
//! for exactly this purpose (`geodb-core::text::fold_key`).

/// Folds `s` to a lowercase, ASCII-transliterated comparison key.
///
/// `"Côte d'Ivoire"` and `"cote d'ivoire"` fold to the same key.
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_ascii_lowercase()
}

/// Accent- and case-insensitive equality.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert!(equals_folded("Côte d'Ivoire", "cote d'ivoire"));
        assert!(equals_folded("FRANCE", "france"));
        assert!(!equals_folded("France", "Germany"));
    }
}
