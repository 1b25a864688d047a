//! `kestrel.json`: completion options read from disk.
//!
//! ```json
//! {
//!   "extends": "../base",
//!   "enterOptions": {
//!     "checkClash": true,
//!     "allowDeprecationOnImport": "yes",
//!     "preludePackage": "java.lang"
//!   }
//! }
//! ```
//!
//! Every option is optional. A file may extend another one; options set in
//! the extending file win.

use anyhow::{Context, Result, anyhow, bail};
use kestrel_enter::EnterOptions;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Accepts `true`/`false` as well as the strings `"true"`, `"1"`, `"yes"`,
/// `"on"` and their negatives.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KestrelConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub enter_options: Option<EnterOptionsConfig>,
}

/// [`EnterOptions`] as written in a file: unset fields keep their defaults.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnterOptionsConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub check_clash: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub allow_deprecation_on_import: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub track_dependencies: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub lint_deprecation: Option<bool>,
    #[serde(default)]
    pub prelude_package: Option<String>,
}

pub fn parse_config(source: &str) -> Result<KestrelConfig> {
    serde_json::from_str(source).context("failed to parse kestrel config JSON")
}

/// Load `path`, following `extends` chains.
pub fn load_config(path: &Path) -> Result<KestrelConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<KestrelConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("config extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current
        .parent()
        .ok_or_else(|| anyhow!("config has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    Ok(if candidate.is_absolute() {
        candidate
    } else {
        base_dir.join(candidate)
    })
}

fn merge_configs(base: KestrelConfig, child: KestrelConfig) -> KestrelConfig {
    let enter_options = match (base.enter_options, child.enter_options) {
        (Some(base), Some(child)) => Some(EnterOptionsConfig {
            check_clash: child.check_clash.or(base.check_clash),
            allow_deprecation_on_import: child
                .allow_deprecation_on_import
                .or(base.allow_deprecation_on_import),
            track_dependencies: child.track_dependencies.or(base.track_dependencies),
            lint_deprecation: child.lint_deprecation.or(base.lint_deprecation),
            prelude_package: child.prelude_package.or(base.prelude_package),
        }),
        (base, child) => child.or(base),
    };
    KestrelConfig {
        extends: None,
        enter_options,
    }
}

/// Turn file options into session options, checking values serde cannot.
pub fn resolve_options(options: Option<&EnterOptionsConfig>) -> Result<EnterOptions> {
    let mut resolved = EnterOptions::default();
    let Some(options) = options else {
        return Ok(resolved);
    };

    if let Some(check_clash) = options.check_clash {
        resolved.check_clash = check_clash;
    }
    if let Some(allow) = options.allow_deprecation_on_import {
        resolved.allow_deprecation_on_import = allow;
    }
    if let Some(track) = options.track_dependencies {
        resolved.track_dependencies = track;
    }
    if let Some(lint) = options.lint_deprecation {
        resolved.lint_deprecation = lint;
    }
    if let Some(prelude) = options.prelude_package.as_deref() {
        resolved.prelude_package = parse_package_name(prelude)?;
    }
    Ok(resolved)
}

fn parse_package_name(name: &str) -> Result<String> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        });
    if !valid {
        bail!("invalid preludePackage '{name}': expected a dotted package name");
    }
    Ok(name.to_string())
}

/// Load `path` and resolve its options in one step.
pub fn load_enter_options(path: &Path) -> Result<EnterOptions> {
    let config = load_config(path)?;
    resolve_options(config.enter_options.as_ref())
        .with_context(|| format!("invalid options in {}", path.display()))
}
