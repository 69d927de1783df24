//! Comparison forms for matched tokens
//!
//! All functions are pure and total: they derive new strings and never
//! touch the token they were given.

use shroud_core::SensitiveCategory;

/// Category-specific reduction of a token to its canonical identity
pub type Simplifier = fn(&str) -> String;

/// Hyphen, minus and the Unicode dash family
pub const DASH_VARIANTS: [char; 11] = [
    '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}',
    '\u{FE58}', '\u{FE63}', '\u{FF0D}',
];

pub fn is_dash_variant(c: char) -> bool {
    DASH_VARIANTS.contains(&c)
}

/// Unify non-breaking spaces and dash glyphs, collapse whitespace runs, trim
pub fn normalize_token(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars() {
        let c = if is_dash_variant(c) { '-' } else { c };

        // NBSP is whitespace for `char::is_whitespace`
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn alnum_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Simplifier used for the last search tier, if the category has one
pub fn simplifier_for(category: SensitiveCategory) -> Option<Simplifier> {
    match category {
        SensitiveCategory::Email => None,
        SensitiveCategory::Phone | SensitiveCategory::Ssn | SensitiveCategory::CreditCard => {
            Some(digits_only)
        }
        SensitiveCategory::EmployeeId | SensitiveCategory::Mrn | SensitiveCategory::Ins => {
            Some(alnum_only)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_dashes_and_spaces() {
        assert_eq!(normalize_token("EMP\u{2013}1234\u{2014}5678"), "EMP-1234-5678");
        assert_eq!(normalize_token("(555)\u{00A0}445\u{2212}6677"), "(555) 445-6677");
        assert_eq!(normalize_token("  123 \t\u{00A0} 45  "), "123 45");
    }

    #[test]
    fn test_normalize_leaves_plain_token_alone() {
        let token = "J.Doe@Example.COM";
        assert_eq!(normalize_token(token), token);
    }

    #[test]
    fn test_simplifiers() {
        assert_eq!(digits_only("(555) 445-6677"), "5554456677");
        assert_eq!(alnum_only("EMP\u{2011}1234-5678"), "EMP12345678");
        assert_eq!(alnum_only("MRN–000123"), "MRN000123");
    }

    #[test]
    fn test_simplifier_per_category() {
        let phone = simplifier_for(SensitiveCategory::Phone).unwrap();
        assert_eq!(phone("(555) 445-6677"), "5554456677");

        let ins = simplifier_for(SensitiveCategory::Ins).unwrap();
        assert_eq!(ins("INS-87654321"), "INS87654321");

        assert!(simplifier_for(SensitiveCategory::Email).is_none());
    }

    proptest! {
        #[test]
        fn prop_digits_only_idempotent(s in "\\PC*") {
            let once = digits_only(&s);
            prop_assert_eq!(digits_only(&once), once);
        }

        #[test]
        fn prop_alnum_only_idempotent(s in "\\PC*") {
            let once = alnum_only(&s);
            prop_assert_eq!(alnum_only(&once), once);
        }

        #[test]
        fn prop_normalize_idempotent(s in "\\PC*") {
            let once = normalize_token(&s);
            prop_assert_eq!(normalize_token(&once), once);
        }
    }
}
