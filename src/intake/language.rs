//! Supported interface languages

use super::IntakeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", native: "English" },
    Language { code: "zu", name: "Zulu", native: "isiZulu" },
    Language { code: "xh", name: "Xhosa", native: "isiXhosa" },
    Language { code: "st", name: "Southern Sotho", native: "Sesotho" },
    Language { code: "tn", name: "Tswana", native: "Setswana" },
    Language { code: "nso", name: "Northern Sotho", native: "Sepedi" },
    Language { code: "ss", name: "Swati", native: "siSwati" },
    Language { code: "ve", name: "Venda", native: "Tshivenda" },
    Language { code: "ts", name: "Tsonga", native: "Xitsonga" },
    Language { code: "nr", name: "Southern Ndebele", native: "isiNdebele" },
    Language { code: "af", name: "Afrikaans", native: "Afrikaans" },
    Language { code: "sasl", name: "South African Sign Language", native: "SASL" },
];

/// Look up a language by code, case-insensitively
pub fn find_language(code: &str) -> Result<&'static Language, IntakeError> {
    let code = code.trim();
    LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| IntakeError::UnknownLanguage(code.to_string()))
}
