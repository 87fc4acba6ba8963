//! Access token sources for the OpenStreetMap API.

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "ASPHALT_OSM_TOKEN";

/// Supplies the bearer token used for authorized writes.
pub trait AccessTokenSource: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// The current token, or `None` when not authenticated.
    fn access_token(&self) -> Option<String>;
}

/// A fixed token, typically from the config file or the environment.
#[derive(Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then(|| token.trim().to_string()),
        }
    }

    /// A source that is never authenticated.
    pub fn none() -> Self {
        Self::default()
    }

    /// Configured token if present, else [`TOKEN_ENV_VAR`].
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured {
            Some(token) if !token.trim().is_empty() => Self::new(token),
            _ => std::env::var(TOKEN_ENV_VAR)
                .map(Self::new)
                .unwrap_or_default(),
        }
    }
}

// Keep tokens out of debug output.
impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl AccessTokenSource for StaticToken {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_unauthenticated() {
        assert!(!StaticToken::new("   ").is_authenticated());
        assert!(!StaticToken::none().is_authenticated());
        assert_eq!(StaticToken::none().access_token(), None);
    }

    #[test]
    fn test_token_is_trimmed() {
        let token = StaticToken::new(" abc123\n");
        assert!(token.is_authenticated());
        assert_eq!(token.access_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_configured_token_wins() {
        let token = StaticToken::resolve(Some("from-config"));
        assert_eq!(token.access_token().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", StaticToken::new("secret"));
        assert!(!rendered.contains("secret"));
    }
}
