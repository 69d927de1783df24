//! Sensitive-data categories, their markers and per-run counts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A category of sensitive identifier detected in document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
    EmployeeId,
    Mrn,
    Ins,
}

impl SensitiveCategory {
    /// Order in which categories are classified and replaced.
    ///
    /// A span replaced by an earlier category is marker text by the time a
    /// later category scans, so it can never be claimed twice. Categories with
    /// a literal prefix (EMP, MRN) run before the bare digit shapes.
    pub const RUN_ORDER: [SensitiveCategory; 7] = [
        SensitiveCategory::Email,
        SensitiveCategory::Phone,
        SensitiveCategory::EmployeeId,
        SensitiveCategory::Mrn,
        SensitiveCategory::CreditCard,
        SensitiveCategory::Ssn,
        SensitiveCategory::Ins,
    ];

    /// Literal text substituted for every token of this category
    pub fn marker(self) -> &'static str {
        match self {
            SensitiveCategory::Email => "[REDACTED EMAIL]",
            SensitiveCategory::Phone => "[REDACTED PHONE]",
            SensitiveCategory::Ssn => "[REDACTED SSN]",
            SensitiveCategory::CreditCard => "[REDACTED CREDIT CARD]",
            SensitiveCategory::EmployeeId => "[REDACTED EMPLOYEE ID]",
            SensitiveCategory::Mrn => "[REDACTED MRN]",
            SensitiveCategory::Ins => "[REDACTED INS]",
        }
    }

    /// Stable machine name
    pub fn as_str(self) -> &'static str {
        match self {
            SensitiveCategory::Email => "email",
            SensitiveCategory::Phone => "phone",
            SensitiveCategory::Ssn => "ssn",
            SensitiveCategory::CreditCard => "credit_card",
            SensitiveCategory::EmployeeId => "employee_id",
            SensitiveCategory::Mrn => "mrn",
            SensitiveCategory::Ins => "ins",
        }
    }

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            SensitiveCategory::Email => "Email addresses",
            SensitiveCategory::Phone => "Phone numbers",
            SensitiveCategory::Ssn => "SSNs",
            SensitiveCategory::CreditCard => "Credit cards",
            SensitiveCategory::EmployeeId => "Employee IDs",
            SensitiveCategory::Mrn => "MRNs",
            SensitiveCategory::Ins => "Insurance IDs",
        }
    }
}

impl fmt::Display for SensitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensitiveCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "email" => Ok(SensitiveCategory::Email),
            "phone" => Ok(SensitiveCategory::Phone),
            "ssn" => Ok(SensitiveCategory::Ssn),
            "creditcard" | "card" => Ok(SensitiveCategory::CreditCard),
            "employeeid" | "emp" => Ok(SensitiveCategory::EmployeeId),
            "mrn" => Ok(SensitiveCategory::Mrn),
            "ins" => Ok(SensitiveCategory::Ins),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}

/// A raw substring matched by a category's pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: SensitiveCategory,
    pub value: String,
}

impl Token {
    pub fn new(category: SensitiveCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }
}

/// Number of ranges actually replaced per category.
///
/// Repeated occurrences of the same token each count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionCounts {
    pub email: usize,
    pub phone: usize,
    pub ssn: usize,
    pub credit_card: usize,
    pub employee_id: usize,
    pub mrn: usize,
    pub ins: usize,
}

impl RedactionCounts {
    pub fn get(&self, category: SensitiveCategory) -> usize {
        match category {
            SensitiveCategory::Email => self.email,
            SensitiveCategory::Phone => self.phone,
            SensitiveCategory::Ssn => self.ssn,
            SensitiveCategory::CreditCard => self.credit_card,
            SensitiveCategory::EmployeeId => self.employee_id,
            SensitiveCategory::Mrn => self.mrn,
            SensitiveCategory::Ins => self.ins,
        }
    }

    pub fn add(&mut self, category: SensitiveCategory, count: usize) {
        let slot = match category {
            SensitiveCategory::Email => &mut self.email,
            SensitiveCategory::Phone => &mut self.phone,
            SensitiveCategory::Ssn => &mut self.ssn,
            SensitiveCategory::CreditCard => &mut self.credit_card,
            SensitiveCategory::EmployeeId => &mut self.employee_id,
            SensitiveCategory::Mrn => &mut self.mrn,
            SensitiveCategory::Ins => &mut self.ins,
        };
        *slot += count;
    }

    pub fn total(&self) -> usize {
        SensitiveCategory::RUN_ORDER
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }

    /// Counts in run order
    pub fn iter(&self) -> impl Iterator<Item = (SensitiveCategory, usize)> + '_ {
        SensitiveCategory::RUN_ORDER
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }
}
