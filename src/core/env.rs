//! Environment variable scope for a shell session.
//!
//! Variables live in a sorted map, so `env` and `export` list them in
//! lexicographic order. The scope is seeded from [`DEFAULT_ENV_VARS`] plus the
//! session identity, then an optional caller overlay is merged on top.

use std::collections::BTreeMap;

use crate::config::DEFAULT_ENV_VARS;
use crate::core::error::EnvironmentError;

/// Check if a variable name can be referenced as `$NAME`.
///
/// Valid names start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics or `_`.
pub fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Mutable name -> value mapping with unique keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default seeded scope for a session.
    ///
    /// Seeds `PWD`, `HOME`, `USER`, `HOSTNAME` from the arguments and the rest
    /// from [`DEFAULT_ENV_VARS`].
    pub fn seeded(user: &str, host: &str, home: &str, cwd: &str) -> Self {
        let mut env = Self::new();
        for (key, value) in DEFAULT_ENV_VARS {
            env.vars.insert(key.to_string(), value.to_string());
        }
        env.vars.insert("USER".into(), user.into());
        env.vars.insert("HOSTNAME".into(), host.into());
        env.vars.insert("HOME".into(), home.into());
        env.vars.insert("PWD".into(), cwd.into());
        env
    }

    /// Merge `vars` over the current values. Entries with empty names are skipped.
    pub fn overlay<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            if let Err(e) = self.set(key, value) {
                log::debug!("skipping environment overlay entry: {}", e);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set a variable. Only empty names are rejected.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EnvironmentError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EnvironmentError::EmptyName);
        }
        self.vars.insert(name, value.into());
        Ok(())
    }

    /// Remove a variable, returning its old value.
    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    /// All `(name, value)` pairs in lexicographic name order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
