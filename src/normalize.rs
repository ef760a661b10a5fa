use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// folds a guess or an expected answer into its comparable form.
///
/// lower-cases, strips diacritics (NFD then drop combining marks), trims, and
/// collapses runs of whitespace to a single space.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Épée"), normalize("epee"));
        assert_eq!(normalize("Épée"), "epee");
        assert_eq!(normalize("BÂTON"), "baton");
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(normalize("  epee  en   diamant "), "epee en diamant");
        assert_eq!(normalize("\tÉpée\nen diamant"), "epee en diamant");
    }

    #[test]
    fn is_idempotent() {
        for input in [
            "Épée en diamant",
            "  Pioche   EN fer ",
            "Œil de l'Ender",
            "",
            "ÇA MARCHE",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn empty_and_blank_inputs_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
    }
}
