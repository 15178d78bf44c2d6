use unicode_normalization::UnicodeNormalization;

/// Substitutions applied before the character-class strip. Brackets
/// become parens (ffmpeg metadata values and most filesystems accept
/// those), colons become underscores, and paren pairs left empty by
/// the transliteration are dropped entirely.
const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[("[", "("), ("]", ")"), (":", "_"), ("()", "")];

/// Convert free text into a filesystem- and tag-safe label.
///
/// The transliteration is deliberately lossy: the text is NFKD
/// decomposed and everything outside ASCII (including the combining
/// marks the decomposition splits off) is dropped. `overrides` are
/// merged over [DEFAULT_REPLACEMENTS] fresh on every call; an
/// override with the same pattern as a default wins.
///
/// With `keep_space` set, runs of whitespace collapse to a single
/// space; otherwise runs of whitespace and hyphens collapse to a
/// single hyphen. Empty input yields empty output; callers that need
/// a non-empty label must supply their own fallback.
pub fn slugify(value: &str, overrides: &[(&str, &str)], keep_space: bool) -> String {
    let mut text: String = value.nfkd().filter(char::is_ascii).collect();

    for &(pattern, replacement) in DEFAULT_REPLACEMENTS
        .iter()
        .filter(|(pattern, _)| !overrides.iter().any(|(o, _)| o == pattern))
        .chain(overrides.iter())
    {
        text = text.replace(pattern, replacement);
    }

    let mut kept: String = text
        .chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '(' | ')' | '_' | '-')
        })
        .collect();

    // The strip can empty out paren pairs that held only unsafe
    // characters; drop those to a fixpoint so the result re-slugifies
    // to itself.
    while kept.contains("()") {
        kept = kept.replace("()", "");
    }

    if keep_space {
        collapse_runs(kept.trim(), |c| c.is_whitespace(), ' ')
    } else {
        collapse_runs(kept.trim(), |c| c.is_whitespace() || c == '-', '-')
    }
}

fn collapse_runs(text: &str, in_run: impl Fn(char) -> bool, joiner: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for c in text.chars() {
        if in_run(c) {
            pending = true;
        } else {
            if pending && !out.is_empty() {
                out.push(joiner);
            }
            pending = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert_eq, proptest};

    #[test]
    fn bracket_and_colon_substitutions() {
        assert_eq!(slugify("My:Album", &[], true), "My_Album");
        assert_eq!(slugify("Intro [live]", &[], true), "Intro (live)");
    }

    #[test]
    fn empty_paren_pairs_are_dropped() {
        assert_eq!(slugify("Track () Two", &[], true), "Track Two");
        // Parens emptied by the ASCII fold disappear too.
        assert_eq!(slugify("Name (\u{4e2d}\u{6587})", &[], true), "Name");
    }

    #[test]
    fn diacritics_fold_to_ascii() {
        assert_eq!(slugify("Béla Bartók", &[], true), "Bela Bartok");
        assert_eq!(slugify("Motörhead", &[], true), "Motorhead");
    }

    #[test]
    fn strips_unsafe_characters() {
        assert_eq!(slugify("a/b\\c*d?e", &[], true), "abcde");
        assert_eq!(slugify("  What's Next!  ", &[], true), "Whats Next");
    }

    #[test]
    fn paren_pairs_emptied_by_the_strip_are_dropped() {
        assert_eq!(slugify("Intro (?)", &[], true), "Intro");
        assert_eq!(slugify("a (())", &[], true), "a");
    }

    #[test]
    fn whitespace_collapses_to_single_space() {
        assert_eq!(slugify("a \t b\n\nc", &[], true), "a b c");
    }

    #[test]
    fn dash_mode_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("a - b -- c", &[], false), "a-b-c");
    }

    #[test]
    fn caller_override_wins_on_collision() {
        assert_eq!(slugify("a:b", &[(":", "-")], true), "a-b");
        // Patterns not overridden keep their defaults.
        assert_eq!(slugify("[a:b]", &[(":", "-")], true), "(a-b)");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(slugify("", &[], true), "");
        assert_eq!(slugify("???", &[], true), "");
    }

    proptest! {
        #[test]
        fn idempotent(input in ".{0,64}") {
            let once = slugify(&input, &[], true);
            prop_assert_eq!(&slugify(&once, &[], true), &once);
            let dashed = slugify(&input, &[], false);
            prop_assert_eq!(&slugify(&dashed, &[], false), &dashed);
        }
    }
}
