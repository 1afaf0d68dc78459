//! Manifest patching module
//!
//! Points the distribution URLs of an app manifest at a new host and builds
//! the install deep link for it.

use crate::config::ManifestConfig;
use crate::error::ManifestError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::path::Path;

pub const NORMAL_ICON_PATH: &str = "/asset/icon29.png";
pub const LARGE_ICON_PATH: &str = "/asset/icon1024.png";
pub const PACKAGE_PATH: &str = "/hap/AppSigned.hap";
pub const MANIFEST_PATH: &str = "/hap/manifest-jsdelivr.json5";

/// Everything except the unreserved characters `A-Z a-z 0-9 - . _ ~`
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URLs derived from one base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionUrls {
    /// Base URL without the scheme
    pub deploy_domain: String,
    pub normal_icon: String,
    pub large_icon: String,
    pub package: String,
    pub manifest: String,
}

impl DistributionUrls {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            deploy_domain: strip_scheme(base).to_string(),
            normal_icon: format!("{base}{NORMAL_ICON_PATH}"),
            large_icon: format!("{base}{LARGE_ICON_PATH}"),
            package: format!("{base}{PACKAGE_PATH}"),
            manifest: format!("{base}{MANIFEST_PATH}"),
        }
    }
}

/// Outcome of a patch run, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub urls: DistributionUrls,
    pub deep_link: String,
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

/// Overwrite the deploy domain, icon URLs and package URL in place
///
/// All four fields are located before any is written, so a document missing
/// one of them is left untouched.
pub fn patch_manifest(doc: &mut Value, urls: &DistributionUrls) -> Result<(), ManifestError> {
    let app = doc
        .get_mut("app")
        .and_then(Value::as_object_mut)
        .ok_or(ManifestError::MissingField("app"))?;

    if !app.get("icons").is_some_and(Value::is_object) {
        return Err(ManifestError::MissingField("app.icons"));
    }
    if !app
        .get("modules")
        .and_then(|m| m.get(0))
        .is_some_and(Value::is_object)
    {
        return Err(ManifestError::MissingField("app.modules[0]"));
    }

    app.insert(
        "deployDomain".to_string(),
        Value::String(urls.deploy_domain.clone()),
    );

    if let Some(icons) = app.get_mut("icons").and_then(Value::as_object_mut) {
        icons.insert("normal".to_string(), Value::String(urls.normal_icon.clone()));
        icons.insert("large".to_string(), Value::String(urls.large_icon.clone()));
    }

    if let Some(module) = app
        .get_mut("modules")
        .and_then(|m| m.get_mut(0))
        .and_then(Value::as_object_mut)
    {
        module.insert("packageUrl".to_string(), Value::String(urls.package.clone()));
    }

    Ok(())
}

/// Compact JSON, non-ASCII characters kept literal
pub fn serialize_manifest(doc: &Value) -> Result<String, ManifestError> {
    serde_json::to_string(doc).map_err(ManifestError::Serialize)
}

/// Install link with the manifest URL percent-encoded as a query value
///
/// # Examples
/// ```
/// use hap_distribution::manifest::deep_link;
/// assert_eq!(
///     deep_link("store://enterprise/manifest?url=", "https://a.dev/m.json5"),
///     "store://enterprise/manifest?url=https%3A%2F%2Fa.dev%2Fm.json5"
/// );
/// ```
pub fn deep_link(prefix: &str, manifest_url: &str) -> String {
    format!("{prefix}{}", utf8_percent_encode(manifest_url, QUERY_VALUE))
}

/// Read, patch and write the manifest to both destinations
///
/// Nothing is written unless the document parses and patches cleanly.
pub fn run(config: &ManifestConfig) -> Result<PatchReport, ManifestError> {
    let source = Path::new(&config.source_path);
    let raw = std::fs::read_to_string(source).map_err(|e| io_error(source, e))?;
    let mut doc: Value = serde_json::from_str(&raw).map_err(ManifestError::Parse)?;

    let urls = DistributionUrls::new(&config.base_url);
    patch_manifest(&mut doc, &urls)?;
    let output = serialize_manifest(&doc)?;

    std::fs::write(source, &output).map_err(|e| io_error(source, e))?;
    let copy = Path::new(&config.copy_path);
    write_creating_parent(copy, &output)?;

    let deep_link = deep_link(&config.deep_link_prefix, &urls.manifest);
    Ok(PatchReport { urls, deep_link })
}

fn write_creating_parent(path: &Path, contents: &str) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }
    std::fs::write(path, contents).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.to_path_buf(),
        source,
    }
}
