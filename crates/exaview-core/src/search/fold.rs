// ── Text folding ──
//
// Case-insensitive matching works on a folded form of both the field and
// the term. Apostrophes are dropped and Latin-1 letters lose their accents
// first (`don't` -> `dont`, `Café` -> `Cafe`); then text is split into words at non-alphanumeric characters, at
// lower-to-upper case transitions, inside upper-case runs followed by a
// lower-case letter (`XMLHttp` -> `XML Http`), and at letter/digit
// boundaries; words are lower-cased and joined with single spaces.

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
}

fn class_of(c: char) -> CharClass {
    if c.is_numeric() {
        CharClass::Digit
    } else if c.is_uppercase() {
        CharClass::Upper
    } else {
        CharClass::Lower
    }
}

/// ASCII spelling of a Latin-1 letter, or `None` if `c` has no accent to drop.
fn deburr_char(c: char) -> Option<&'static str> {
    Some(match c {
        'À'..='Å' => "A",
        'à'..='å' => "a",
        'Æ' => "Ae",
        'æ' => "ae",
        'Ç' => "C",
        'ç' => "c",
        'È'..='Ë' => "E",
        'è'..='ë' => "e",
        'Ì'..='Ï' => "I",
        'ì'..='ï' => "i",
        'Ð' => "D",
        'ð' => "d",
        'Ñ' => "N",
        'ñ' => "n",
        'Ò'..='Ö' | 'Ø' => "O",
        'ò'..='ö' | 'ø' => "o",
        'Ù'..='Ü' => "U",
        'ù'..='ü' => "u",
        'Ý' => "Y",
        'ý' | 'ÿ' => "y",
        'Þ' => "Th",
        'þ' => "th",
        'ß' => "ss",
        _ => return None,
    })
}

/// Drop apostrophes and accents ahead of word splitting.
fn deburr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\'' | '\u{2019}' => {}
            c => match deburr_char(c) {
                Some(plain) => out.push_str(plain),
                None => out.push(c),
            },
        }
    }
    out
}

/// Fold text into lower-cased words separated by single spaces.
pub fn fold(text: &str) -> String {
    let text = deburr(text);
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<CharClass> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            prev = None;
            continue;
        }

        let class = class_of(c);
        let boundary = match prev {
            None => !out.is_empty(),
            Some(p) => {
                (p == CharClass::Lower && class == CharClass::Upper)
                    || ((p == CharClass::Digit) != (class == CharClass::Digit))
                    || (p == CharClass::Upper
                        && class == CharClass::Upper
                        && chars
                            .peek()
                            .is_some_and(|n| n.is_alphabetic() && !n.is_uppercase()))
            }
        };

        if boundary {
            out.push(' ');
        }
        out.extend(c.to_lowercase());
        prev = Some(class);
    }

    out
}

/// A folded search term, matched against field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    folded: String,
}

impl Needle {
    pub fn new(term: &str) -> Self {
        Self {
            folded: fold(term),
        }
    }

    /// `true` if the term folds to nothing and so matches every field.
    pub fn is_blank(&self) -> bool {
        self.folded.is_empty()
    }

    /// Containment test on the folded forms. Missing values fold to "".
    pub fn matches(&self, haystack: Option<&str>) -> bool {
        fold(haystack.unwrap_or_default()).contains(&self.folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_case_and_digit_boundaries() {
        assert_eq!(fold("exa01adm"), "exa 01 adm");
        assert_eq!(fold("fooBar"), "foo bar");
        assert_eq!(fold("XMLHttpRequest"), "xml http request");
        assert_eq!(fold("QM8700"), "qm 8700");
    }

    #[test]
    fn drops_punctuation_and_collapses_separators() {
        assert_eq!(fold("  BARE_METAL -- x "), "bare metal x");
        assert_eq!(fold("19.2.0.0"), "19 2 0 0");
        assert_eq!(fold("---"), "");
    }

    #[test]
    fn apostrophes_and_accents_are_dropped() {
        assert_eq!(fold("don't"), "dont");
        assert_eq!(fold("it\u{2019}s"), "its");
        assert_eq!(fold("Café-Zürich"), "cafe zurich");
        assert_eq!(fold("Straße"), "strasse");
        assert!(Needle::new("cafe").matches(Some("exa-café01")));
        assert!(Needle::new("Zürich").matches(Some("zurich-rack")));
    }

    #[test]
    fn folded_containment_is_case_insensitive() {
        let needle = Needle::new("KVM01");
        assert!(needle.matches(Some("exa-kvm01-host")));
        assert!(!needle.matches(Some("exa-kvm02")));
        assert!(!needle.matches(None));
    }

    #[test]
    fn blank_term_matches_missing_values() {
        let needle = Needle::new("__");
        assert!(needle.is_blank());
        assert!(needle.matches(None));
        assert!(needle.matches(Some("anything")));
    }
}
