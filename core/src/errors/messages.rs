//! Message keys and default texts for token failures
//!
//! Localization itself belongs to the presentation layer. The core only
//! names a key per failure and ships the English fallback.

use super::types::TokenError;

/// Resolves a message key to display text
pub trait MessageCatalog: Send + Sync {
    /// Returns display text for `key`, or `None` if the catalog lacks it
    fn lookup(&self, key: &str) -> Option<String>;

    /// Display text for an error, falling back to the built-in English text
    fn localize(&self, error: &TokenError) -> String {
        self.lookup(error.message_key())
            .unwrap_or_else(|| default_message(error.message_key()).to_string())
    }
}

/// Catalog that only knows the built-in English texts
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageCatalog for DefaultMessages {
    fn lookup(&self, key: &str) -> Option<String> {
        builtin_message(key).map(str::to_string)
    }
}

/// Built-in English text for a message key
///
/// Unknown keys read as the generic reason.
pub fn default_message(key: &str) -> &'static str {
    builtin_message(key).unwrap_or("Unauthorized")
}

fn builtin_message(key: &str) -> Option<&'static str> {
    let text = match key {
        "jwt.token.invalid" => "Token is invalid",
        "jwt.token.expired" => "Token is expired",
        "jwt.token.not.valid.yet" => "Token is not valid yet",
        "jwt.token.signing.method" => "Wrong signing method",
        "jwt.token.parse.failed" => "Fail to parse token",
        "jwt.token.revoked" => "Token is revoked",
        "jwt.token.sign.failed" => "Failed to sign token",
        "jwt.token.store.failed" => "Token cannot be verified right now",
        _ => return None,
    };
    Some(text)
}
