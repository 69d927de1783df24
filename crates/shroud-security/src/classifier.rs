use lazy_static::lazy_static;
use regex::{Captures, NoExpand, Regex};
use shroud_core::{SensitiveCategory, Token};

use crate::normalize::digits_only;

// Hyphen, the U+2010..U+2015 dash block, minus sign, small/fullwidth hyphen-minus
macro_rules! dash {
    () => {
        r"[\-\x{2010}-\x{2015}\x{2212}\x{FE58}\x{FE63}\x{FF0D}]"
    };
}

// Space, tab or non-breaking space; never a line break
macro_rules! space {
    () => {
        r"[ \t\x{00A0}]"
    };
}

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b").expect("email pattern");
    static ref PHONE: Regex = Regex::new(concat!(
        r"\(\d{3}\)",
        space!(),
        r"?\d{3}(?:",
        dash!(),
        "|",
        space!(),
        r")?\d{4}\b"
    ))
    .expect("phone pattern");
    static ref EMPLOYEE_ID: Regex = Regex::new(concat!(
        r"(?i)\bEMP",
        dash!(),
        r"\d{4}",
        dash!(),
        r"\d{4}\b"
    ))
    .expect("employee id pattern");
    static ref MRN: Regex =
        Regex::new(concat!(r"(?i)\bMRN", dash!(), r"\d{6}\b")).expect("mrn pattern");
    static ref CREDIT_CARD: Regex = Regex::new(concat!(
        r"\b\d{4}(?:",
        dash!(),
        r"\d{4}){3}\b"
    ))
    .expect("credit card pattern");
    static ref SSN: Regex = Regex::new(concat!(
        r"\b(\d{3})(?:",
        dash!(),
        "|",
        space!(),
        r")?(\d{2})(?:",
        dash!(),
        "|",
        space!(),
        r")?(\d{4})\b"
    ))
    .expect("ssn pattern");
    static ref INS: Regex =
        Regex::new(concat!(r"(?i)\bINS", dash!(), r"\d{8}\b")).expect("ins pattern");
}

/// Replace every case-insensitive occurrence of `value` with `marker`
fn mask(text: &str, value: &str, marker: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return text.to_string();
    }
    match Regex::new(&format!("(?i){}", regex::escape(value))) {
        Ok(re) => re.replace_all(text, NoExpand(marker)).into_owned(),
        Err(_) => text.replace(value, marker),
    }
}

/// Tuning for the pattern classifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Drop card-shaped numbers that fail the Luhn checksum.
    /// Off by default: any dash-grouped 16-digit number is a card.
    pub card_luhn_check: bool,
}

/// Pattern classifiers, one per sensitive category
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: ClassifierOptions,
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    /// Raw matches of one category in first-occurrence order, duplicates kept
    pub fn classify(&self, category: SensitiveCategory, text: &str) -> Vec<Token> {
        let pattern = pattern(category);

        pattern
            .captures_iter(text)
            .filter(|caps| self.accepts(category, caps))
            .filter_map(|caps| caps.get(0))
            .map(|m| Token::new(category, m.as_str()))
            .collect()
    }

    /// Dry run over a single snapshot of text.
    ///
    /// Categories run in [`SensitiveCategory::RUN_ORDER`] and each one's
    /// matches are masked with its marker in a local copy before the next
    /// category scans. Masking ignores case, the same way exact search in
    /// the host does, so the result agrees with what a real run claims.
    pub fn scan(&self, text: &str) -> Vec<(SensitiveCategory, Vec<Token>)> {
        let mut working = text.to_string();
        let mut results = Vec::with_capacity(SensitiveCategory::RUN_ORDER.len());

        for category in SensitiveCategory::RUN_ORDER {
            let tokens = self.classify(category, &working);
            for token in &tokens {
                working = mask(&working, &token.value, category.marker());
            }
            results.push((category, tokens));
        }

        results
    }

    fn accepts(&self, category: SensitiveCategory, caps: &Captures<'_>) -> bool {
        match category {
            SensitiveCategory::Ssn => is_valid_ssn(&caps[1], &caps[2], &caps[3]),
            SensitiveCategory::CreditCard if self.options.card_luhn_check => {
                luhn_valid(&digits_only(&caps[0]))
            }
            _ => true,
        }
    }
}

fn pattern(category: SensitiveCategory) -> &'static Regex {
    match category {
        SensitiveCategory::Email => &EMAIL,
        SensitiveCategory::Phone => &PHONE,
        SensitiveCategory::Ssn => &SSN,
        SensitiveCategory::CreditCard => &CREDIT_CARD,
        SensitiveCategory::EmployeeId => &EMPLOYEE_ID,
        SensitiveCategory::Mrn => &MRN,
        SensitiveCategory::Ins => &INS,
    }
}

/// Area 000, 666 and 900-999, group 00 and serial 0000 are never issued
fn is_valid_ssn(area: &str, group: &str, serial: &str) -> bool {
    !(area == "000" || area == "666" || area.starts_with('9') || group == "00" || serial == "0000")
}

fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(category: SensitiveCategory, text: &str) -> Vec<String> {
        Classifier::default()
            .classify(category, text)
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_email_detection() {
        let found = values(
            SensitiveCategory::Email,
            "Mail a.B+c@D.e.COM or J.Doe@Example.COM, not foo@bar",
        );
        assert_eq!(found, vec!["a.B+c@D.e.COM", "J.Doe@Example.COM"]);
    }

    #[test]
    fn test_phone_requires_parenthesized_area_code() {
        assert_eq!(
            values(SensitiveCategory::Phone, "call (555) 445-6677 now"),
            vec!["(555) 445-6677"]
        );
        assert_eq!(
            values(SensitiveCategory::Phone, "nbsp (555)\u{00A0}445\u{2013}6677"),
            vec!["(555)\u{00A0}445\u{2013}6677"]
        );
        assert!(values(SensitiveCategory::Phone, "call 555-445-6677").is_empty());
    }

    #[test]
    fn test_prefixed_ids_are_case_insensitive() {
        assert_eq!(
            values(SensitiveCategory::EmployeeId, "emp\u{2011}1234\u{2012}5678"),
            vec!["emp\u{2011}1234\u{2012}5678"]
        );
        assert_eq!(values(SensitiveCategory::Mrn, "mrn-000123"), vec!["mrn-000123"]);
        assert_eq!(values(SensitiveCategory::Ins, "Ins—87654321"), vec!["Ins—87654321"]);
        assert!(values(SensitiveCategory::Mrn, "MRN-12345").is_empty());
    }

    #[test]
    fn test_credit_card_shape_only() {
        assert_eq!(
            values(SensitiveCategory::CreditCard, "card 1234-5678-9012-3456"),
            vec!["1234-5678-9012-3456"]
        );
        assert!(values(SensitiveCategory::CreditCard, "1234 5678 9012 3456").is_empty());
    }

    #[test]
    fn test_credit_card_luhn_option() {
        let strict = Classifier::new(ClassifierOptions {
            card_luhn_check: true,
        });
        let text = "4111-1111-1111-1111 and 1234-5678-9012-3456";
        let found: Vec<_> = strict
            .classify(SensitiveCategory::CreditCard, text)
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(found, vec!["4111-1111-1111-1111"]);
    }

    #[test]
    fn test_ssn_separators() {
        assert_eq!(
            values(SensitiveCategory::Ssn, "SSN 123-45-6789, 123 45 6789, 123456789"),
            vec!["123-45-6789", "123 45 6789", "123456789"]
        );
    }

    #[test]
    fn test_ssn_invalid_ranges() {
        for text in [
            "000-12-3456",
            "666-12-3456",
            "900-12-3456",
            "999-12-3456",
            "123-00-4567",
            "123-45-0000",
        ] {
            assert!(values(SensitiveCategory::Ssn, text).is_empty(), "{text}");
        }
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let found = values(SensitiveCategory::Mrn, "MRN-000001 MRN-000002 MRN-000001");
        assert_eq!(found, vec!["MRN-000001", "MRN-000002", "MRN-000001"]);
    }

    #[test]
    fn test_markers_never_match() {
        let classifier = Classifier::default();
        let markers: String = SensitiveCategory::RUN_ORDER
            .iter()
            .map(|c| c.marker())
            .collect::<Vec<_>>()
            .join(" ");

        for category in SensitiveCategory::RUN_ORDER {
            assert!(classifier.classify(category, &markers).is_empty());
        }
    }

    #[test]
    fn test_scan_claims_in_run_order() {
        let classifier = Classifier::default();
        let results = classifier.scan("EMP-1234-5678 4111-1111-1111-1111 123-45-6789");

        let count = |category| {
            results
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, tokens)| tokens.len())
                .unwrap()
        };
        assert_eq!(count(SensitiveCategory::EmployeeId), 1);
        assert_eq!(count(SensitiveCategory::CreditCard), 1);
        assert_eq!(count(SensitiveCategory::Ssn), 1);
        assert_eq!(count(SensitiveCategory::Phone), 0);
    }

    #[test]
    fn test_scan_masks_case_variants() {
        // The lowercase copy sits outside a word boundary; exact search still claims it
        let results = Classifier::default().scan("EMP-1234-5678 ref xemp-1234-5678-9012-3456");

        let found = |category| {
            results
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, tokens)| tokens.len())
                .unwrap()
        };
        assert_eq!(found(SensitiveCategory::EmployeeId), 1);
        assert_eq!(found(SensitiveCategory::CreditCard), 0);
    }

    #[test]
    fn test_mask_ignores_case() {
        assert_eq!(
            mask("A@B.co and a@b.CO", "a@b.co", "[REDACTED EMAIL]"),
            "[REDACTED EMAIL] and [REDACTED EMAIL]"
        );
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("4111111111111111"));
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid(""));
    }

    proptest! {
        #[test]
        fn prop_ssn_bad_area_rejected(area in prop_oneof![Just(0u32), Just(666u32), 900u32..=999], group in 1u32..=99, serial in 1u32..=9999) {
            let text = format!("{:03}-{:02}-{:04}", area, group, serial);
            prop_assert!(values(SensitiveCategory::Ssn, &text).is_empty());
        }

        #[test]
        fn prop_ssn_zero_group_or_serial_rejected(area in 1u32..=665, serial in 0u32..=9999, zero_group in any::<bool>()) {
            let text = if zero_group {
                format!("{:03}-00-{:04}", area, serial)
            } else {
                format!("{:03}-45-0000", area)
            };
            prop_assert!(values(SensitiveCategory::Ssn, &text).is_empty());
        }

        #[test]
        fn prop_email_case_insensitive(local in "[a-z]{1,8}", domain in "[a-z]{1,8}", upper in any::<bool>()) {
            let email = format!("{local}.b+c@{domain}.e.com");
            let email = if upper { email.to_uppercase() } else { email };
            let text = format!("reach {email} today");
            prop_assert_eq!(values(SensitiveCategory::Email, &text), vec![email]);
        }
    }
}
