use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r#"[:?!.,;"()\[\]]"#).expect("valid regex");
}

/// Fold text into the form all matching runs on: NFKC, lowercase,
/// punctuation such as `:` and `?` dropped, whitespace collapsed.
pub fn fold(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let stripped = PUNCT.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_punctuation() {
        assert_eq!(
            fold("Nickolas Means: The Building Built on Stilts"),
            "nickolas means the building built on stilts"
        );
        assert_eq!(fold("  What is GraphQL?  "), "what is graphql");
    }

    #[test]
    fn folds_unicode_compatibility_forms() {
        assert_eq!(fold("ＧｒａｐｈＱＬ"), "graphql");
    }

    #[test]
    fn empty_and_whitespace_fold_to_empty() {
        assert_eq!(fold(""), "");
        assert_eq!(fold("   \t "), "");
    }
}
