use serde::{Deserialize, Serialize};

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Password change; the current password must verify first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
}

/// Operator-supplied credential used by the bootstrap step.
#[derive(Debug, Clone)]
pub struct BootstrapInput {
    pub username: String,
    pub password: String,
    /// Overwrite the hash when the admin already exists.
    pub reset: bool,
}

impl BootstrapInput {
    /// Read `ADMIN_USERNAME` (default `admin`), `ADMIN_INITIAL_PASSWORD` and
    /// `ADMIN_RESET` from the process environment. `None` when no password is set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup("ADMIN_INITIAL_PASSWORD").filter(|p| !p.is_empty())?;
        let username = lookup("ADMIN_USERNAME")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "admin".to_string());
        let reset = lookup("ADMIN_RESET")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Some(Self { username, password, reset })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    Reset,
    AlreadyPresent,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub username: String,
    pub token: String,
    pub expires_at: i64,
}

/// JWT claims carried by admin tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn bootstrap_needs_an_operator_password() {
        assert!(BootstrapInput::from_lookup(lookup(&[])).is_none());
        assert!(BootstrapInput::from_lookup(lookup(&[("ADMIN_INITIAL_PASSWORD", "")])).is_none());

        let input = BootstrapInput::from_lookup(lookup(&[("ADMIN_INITIAL_PASSWORD", "s3cret-pass")])).unwrap();
        assert_eq!(input.username, "admin");
        assert!(!input.reset);

        let input = BootstrapInput::from_lookup(lookup(&[
            ("ADMIN_INITIAL_PASSWORD", "s3cret-pass"),
            ("ADMIN_USERNAME", "ops"),
            ("ADMIN_RESET", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(input.username, "ops");
        assert!(input.reset);
    }
}
