//! Gateway configuration for the command-line front end.
//!
//! Loads a [`GatewayConfig`] from a TOML file with support for environment
//! variable expansion in string values. Variables use `$VAR` or `${VAR}`
//! syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "sandbox"
//! merchant_id = "your_merchant_id"
//! public_key = "your_public_key"
//! private_key = "$BRAINTREE_SECRET"
//! master_merchant_account_id = "acme_marketplace"
//! timeout_secs = 30
//! ```
//!
//! # Environment Variables
//!
//! - `BRAINTREE_CONFIG`: path to the configuration file (default: `braintree.toml`)
//! - `BRAINTREE_ENVIRONMENT`, `BRAINTREE_MERCHANT_ID`, `BRAINTREE_PUBLIC_KEY`,
//!   `BRAINTREE_PRIVATE_KEY`, `BRAINTREE_MASTER_MERCHANT_ACCOUNT_ID`,
//!   `BRAINTREE_BASE_URL`: override the file values

use std::path::Path;

use braintree_facade::config::{ConfigurationError, Environment, GatewayConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "braintree.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for a gateway config.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path.
        path: String,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// `BRAINTREE_ENVIRONMENT` named an unknown environment.
    #[error(transparent)]
    Environment(#[from] ConfigurationError),
}

/// Loads configuration from `path`, reading the process environment for
/// `$VAR` expansion and `BRAINTREE_*` overrides.
///
/// A missing file yields an empty configuration, so everything can come from
/// the environment.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if
/// `BRAINTREE_ENVIRONMENT` is not a known environment.
pub fn load_from(path: &Path) -> Result<GatewayConfig, ConfigError> {
    load_with(path, |name| std::env::var(name).ok())
}

fn load_with<F>(path: &Path, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?
    } else {
        String::new()
    };

    let expanded = expand_env_vars(&content, &lookup);
    let config: GatewayConfig = toml::from_str(&expanded).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    apply_env_overrides(config, &lookup)
}

/// Applies `BRAINTREE_*` overrides on top of file values. Blank variables are
/// ignored.
fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: &F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(environment) = var("BRAINTREE_ENVIRONMENT") {
        config.environment = Some(environment.parse::<Environment>()?);
    }
    if let Some(merchant_id) = var("BRAINTREE_MERCHANT_ID") {
        config.merchant_id = Some(merchant_id);
    }
    if let Some(public_key) = var("BRAINTREE_PUBLIC_KEY") {
        config.public_key = Some(public_key);
    }
    if let Some(private_key) = var("BRAINTREE_PRIVATE_KEY") {
        config.private_key = Some(private_key);
    }
    if let Some(master) = var("BRAINTREE_MASTER_MERCHANT_ACCOUNT_ID") {
        config.master_merchant_account_id = Some(master);
    }
    if let Some(base_url) = var("BRAINTREE_BASE_URL") {
        config.base_url = Some(base_url);
    }

    Ok(config)
}

/// Expands `$VAR` and `${VAR}` patterns in a string.
///
/// Unresolved variables are left as-is.
fn expand_env_vars<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                chars.next();
                if c == '}' {
                    closed = true;
                    break;
                }
            } else if c.is_ascii_alphanumeric() || c == '_' {
                chars.next();
            } else {
                break;
            }
            name.push(c);
        }

        match lookup(&name) {
            Some(value) if !name.is_empty() && (closed || !braced) => result.push_str(&value),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "braintree-facade-{}-{name}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_expand_plain_and_braced() {
        let lookup = env(&[("KEY", "secret"), ("ID", "m1")]);
        assert_eq!(
            expand_env_vars("key = \"$KEY\"\nid = \"${ID}-x\"", &lookup),
            "key = \"secret\"\nid = \"m1-x\""
        );
    }

    #[test]
    fn test_unresolved_variables_left_as_is() {
        let lookup = env(&[]);
        assert_eq!(expand_env_vars("$MISSING ${ALSO} $ 5", &lookup), "$MISSING ${ALSO} $ 5");
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let config = load_with(Path::new("/nonexistent/braintree.toml"), env(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_file_with_expansion() {
        let path = temp_config(
            "expansion",
            "environment = \"sandbox\"\nmerchant_id = \"m1\"\npublic_key = \"pub\"\nprivate_key = \"$SECRET\"\ntimeout_secs = 30\n",
        );
        let config = load_with(&path, env(&[("SECRET", "s3cr3t")])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.environment, Some(Environment::Sandbox));
        assert_eq!(config.private_key.as_deref(), Some("s3cr3t"));
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_env_overrides_file() {
        let path = temp_config(
            "overrides",
            "environment = \"sandbox\"\nmerchant_id = \"from-file\"\n",
        );
        let config = load_with(
            &path,
            env(&[
                ("BRAINTREE_ENVIRONMENT", "production"),
                ("BRAINTREE_MERCHANT_ID", "from-env"),
                ("BRAINTREE_PUBLIC_KEY", "   "),
                ("BRAINTREE_BASE_URL", "http://127.0.0.1:9000"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.environment, Some(Environment::Production));
        assert_eq!(config.merchant_id.as_deref(), Some("from-env"));
        assert_eq!(config.public_key, None);
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn test_unknown_environment_override() {
        let err = load_with(
            Path::new("/nonexistent/braintree.toml"),
            env(&[("BRAINTREE_ENVIRONMENT", "staging")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Environment(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let path = temp_config("invalid", "environment = [\n");
        let err = load_with(&path, env(&[])).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
