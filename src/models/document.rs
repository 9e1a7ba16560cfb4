//! Brazilian tax documents (CPF / CNPJ)
//!
//! Individuals carry an 11-digit CPF, companies a 14-digit CNPJ. Both are
//! stored with their usual punctuation: `123.456.789-09`, `12.345.678/0001-95`.

use std::fmt;

/// Which kind of tax document a string holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Individual taxpayer (11 digits)
    Cpf,
    /// Company taxpayer (14 digits)
    Cnpj,
}

impl DocumentKind {
    /// Classify a document by its digit count
    ///
    /// Anything up to 11 digits is treated as a CPF, longer as a CNPJ.
    pub fn classify(document: &str) -> Self {
        if digits(document).len() <= 11 {
            Self::Cpf
        } else {
            Self::Cnpj
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpf => write!(f, "CPF"),
            Self::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// Keep only the ASCII digits of a string
pub fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a CPF or CNPJ with punctuation
///
/// Inputs that are not exactly 11 or 14 digits are returned as bare digits.
pub fn format_document(value: &str) -> String {
    let d = digits(value);
    match d.len() {
        11 => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        ),
        _ => d,
    }
}

/// Check that a document has exactly 11 or 14 digits
pub fn validate_document(value: &str) -> Result<DocumentKind, String> {
    match digits(value).len() {
        11 => Ok(DocumentKind::Cpf),
        14 => Ok(DocumentKind::Cnpj),
        n => Err(format!(
            "Document must have 11 (CPF) or 14 (CNPJ) digits, got {}",
            n
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_document("12345678909"), "123.456.789-09");
        assert_eq!(format_document("123.456.789-09"), "123.456.789-09");
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_document("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn test_format_partial_is_left_as_digits() {
        assert_eq!(format_document("12.34"), "1234");
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate_document("123.456.789-09"), Ok(DocumentKind::Cpf));
        assert_eq!(
            validate_document("12.345.678/0001-95"),
            Ok(DocumentKind::Cnpj)
        );
        assert!(validate_document("1234").is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(DocumentKind::classify("123"), DocumentKind::Cpf);
        assert_eq!(DocumentKind::classify("12345678000195"), DocumentKind::Cnpj);
    }
}
