//! Bilingual display texts for message keys

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tw_core::errors::{default_message, MessageCatalog};
use tw_shared::Language;

/// Message keys used by the HTTP layer itself
pub mod keys {
    pub const LOGOUT_SUCCESS: &str = "auth.logout.success";
    pub const INTERNAL: &str = "general.internal";
    pub const NOT_FOUND: &str = "general.not_found";
}

const EMBEDDED_MESSAGES: &str = include_str!("../../i18n/messages.toml");
const OVERRIDE_PATH: &str = "i18n/messages.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub en: String,
    pub zh: String,
}

impl Message {
    pub fn text(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.en,
            Language::Chinese => &self.zh,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Messages {
    #[serde(default)]
    pub messages: HashMap<String, Message>,
}

pub static MESSAGES: Lazy<Messages> = Lazy::new(load_messages);

fn load_messages() -> Messages {
    let path = Path::new(OVERRIDE_PATH);
    if path.exists() {
        match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(messages) => return messages,
            Err(e) => tracing::warn!(path = OVERRIDE_PATH, error = %e, "Ignoring unreadable message file"),
        }
    }

    toml::from_str(EMBEDDED_MESSAGES).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Embedded message file is invalid");
        Messages::default()
    })
}

/// Display text for `key`, falling back to the built-in English text
pub fn message(key: &str, lang: Language) -> String {
    Catalog::new(lang)
        .lookup(key)
        .unwrap_or_else(|| default_message(key).to_string())
}

/// Message catalog for one language
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    lang: Language,
}

impl Catalog {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }
}

impl MessageCatalog for Catalog {
    fn lookup(&self, key: &str) -> Option<String> {
        MESSAGES
            .messages
            .get(key)
            .map(|message| message.text(self.lang).to_string())
    }
}
