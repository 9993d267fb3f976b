use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::store::KeyValueStore;

pub const LANGUAGE_STORAGE_KEY: &str = "AUTOUSATA:language";
pub const LEGACY_DIRECTION_KEY: &str = "textDirection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn dir(&self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::Ar => "rtl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown language '{}' (expected en or ar)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Stored choice, then the legacy text direction, then Arabic.
pub fn initial_language(store: &dyn KeyValueStore) -> Language {
    if let Some(lang) = store.get(LANGUAGE_STORAGE_KEY).and_then(|s| s.parse().ok()) {
        return lang;
    }

    if store.get(LEGACY_DIRECTION_KEY).as_deref() == Some("rtl") {
        return Language::Ar;
    }

    Language::Ar
}

/// Localization capability handed to pages.
pub struct LanguageContext {
    language: Language,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl LanguageContext {
    /// Context without persistence.
    pub fn fixed(language: Language) -> Self {
        Self {
            language,
            store: None,
        }
    }

    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let language = initial_language(store.as_ref());
        let ctx = Self {
            language,
            store: Some(store),
        };
        ctx.persist();
        ctx
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_arabic(&self) -> bool {
        self.language == Language::Ar
    }

    pub fn dir(&self) -> &'static str {
        self.language.dir()
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.persist();
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.set(LANGUAGE_STORAGE_KEY, self.language.code()) {
                eprintln!("Warning: could not save language preference: {}", e);
            }
        }
    }

    pub fn t(&self, en: &str, ar: &str) -> String {
        if self.is_arabic() {
            sanitize_arabic(ar)
        } else {
            en.to_string()
        }
    }

    pub fn format_number(&self, value: i64) -> String {
        if self.is_arabic() {
            to_arabic_digits(&value.to_string())
        } else {
            group_thousands(value)
        }
    }

    pub fn format_currency_egp(&self, value: i64) -> String {
        let formatted = self.format_number(value);
        if self.is_arabic() {
            format!("\u{062c} \u{0645} {}", formatted)
        } else {
            format!("EGP {}", formatted)
        }
    }
}

/// Strip punctuation from Arabic copy and collapse runs of whitespace.
pub fn sanitize_arabic(value: &str) -> String {
    const STRIPPED: [char; 8] = [
        '.', ',', '\u{060C}', '\u{061F}', '\u{061B}', ':', '\u{2026}', '!',
    ];

    value
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn to_arabic_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}
