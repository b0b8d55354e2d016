//! Language codes offered by the control surface

use crate::error::OverlayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages the service can read
// "tam_Tamil" is the code the service expects, not the FLORES "tam_Taml"
pub const SOURCE_LANGUAGES: &[Language] = &[
    Language {
        code: "kan_Knda",
        name: "Kannada",
    },
    Language {
        code: "hin_Deva",
        name: "Hindi",
    },
    Language {
        code: "ben_Beng",
        name: "Bengali",
    },
    Language {
        code: "tam_Tamil",
        name: "Tamil",
    },
    Language {
        code: "tel_Telu",
        name: "Telugu",
    },
];

/// Languages the service can translate into
pub const TARGET_LANGUAGES: &[Language] = &[Language {
    code: "eng_Latn",
    name: "English",
}];

pub const DEFAULT_SOURCE_LANGUAGE: &str = "kan_Knda";
pub const DEFAULT_TARGET_LANGUAGE: &str = "eng_Latn";

pub fn source_language(code: &str) -> Result<Language, OverlayError> {
    find(SOURCE_LANGUAGES, code)
}

pub fn target_language(code: &str) -> Result<Language, OverlayError> {
    find(TARGET_LANGUAGES, code)
}

fn find(catalogue: &[Language], code: &str) -> Result<Language, OverlayError> {
    catalogue
        .iter()
        .find(|l| l.code == code)
        .copied()
        .ok_or_else(|| OverlayError::UnsupportedLanguage(code.to_string()))
}
