//! The languages a chat session can be held in.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::ui::Style;

/// Language selected for a chat session.
///
/// Non-English selections translate the user's text to English before routing
/// and translate the reply back afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Marathi,
    Hindi,
    English,
}

/// Every supported language, in selector order.
pub const SUPPORTED_LANGUAGES: &[Language] =
    &[Language::Marathi, Language::Hindi, Language::English];

impl Language {
    /// ISO 639-1 code, as used by the translation endpoints.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Marathi => "mr",
            Self::Hindi => "hi",
            Self::English => "en",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Marathi => "Marathi",
            Self::Hindi => "Hindi",
            Self::English => "English",
        }
    }

    pub const fn is_english(self) -> bool {
        matches!(self, Self::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    /// Accepts either the language name or its code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|lang| {
                lang.name().eq_ignore_ascii_case(needle) || lang.code().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid language: '{needle}'\n\n\
                     Valid languages: marathi (mr), hindi (hi), english (en)\n\
                     Run 'agrichat languages' to see all supported languages."
                )
            })
    }
}

/// Prints all supported languages to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported languages"));
    for lang in SUPPORTED_LANGUAGES {
        println!(
            "  {:4} {}",
            Style::code(lang.code()),
            Style::secondary(lang.name())
        );
    }
}
