use unicode_normalization::UnicodeNormalization;

/// Punctuation characters that separate name fragments across the source
/// datasets. Each is folded to a single space before matching.
const SEPARATORS: [char; 6] = ['-', '_', ',', '.', ';', '\''];

/// Folds a place name into its canonical matching key: accents stripped
/// via NFKD decomposition (anything outside ASCII is dropped), lower-cased,
/// separator punctuation replaced by spaces, whitespace runs collapsed,
/// and the ends trimmed.
///
/// Handles the French and Haitian Creole diacritic and punctuation
/// variance between sources while the display spelling stays untouched.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name.nfkd().filter(char::is_ascii).collect();
    let lowered = stripped.to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
