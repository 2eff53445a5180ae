//! Image configuration record.
//!
//! An [`ImageConfig`] is read from a single JSON document and then enriched
//! in place by the passes in [`crate::passes`]. Declarative fields come
//! straight from the JSON. Derived fields live in [`DerivedBlocks`] and in
//! [`ExtPkg::cont`]; each one is written by exactly one pass.
//!
//! Keys are camelCase. The short keys used by older configs (`tmplfname`,
//! `plist`, `extpkgs`, ...) are accepted as aliases. Any key that is not a
//! known field is kept in `extra` and handed to the template untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DfgenError;

/// Output name used when neither `dockerFileName` nor `image` is set.
pub const DEFAULT_DOCKERFILE_NAME: &str = "Dockerfile";

/// Wrap width for the package list when `packagesPerLine` is absent.
pub const DEFAULT_PACKAGES_PER_LINE: i64 = 10;

/// Distribution package manager flavors known to templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Rpm,
    Deb,
    Zyp,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [PackageManager::Rpm, PackageManager::Deb, PackageManager::Zyp];

    /// The `packageType` value selecting this flavor.
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Rpm => "rpm",
            PackageManager::Deb => "deb",
            PackageManager::Zyp => "zyp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pm| pm.name() == name)
    }
}

/// Booleans for template sections.
///
/// Mustache has no equality operator, so templates branch on
/// `{{#usesRpm}}` and friends instead of comparing `packageType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManagerFlags {
    pub uses_rpm: bool,
    pub uses_deb: bool,
    pub uses_zyp: bool,
}

impl PackageManagerFlags {
    /// Flags for a `packageType` value. Unknown or absent types set nothing.
    pub fn for_package_type(package_type: Option<&str>) -> Self {
        let mut flags = Self::default();
        match package_type.and_then(PackageManager::from_name) {
            Some(PackageManager::Rpm) => flags.uses_rpm = true,
            Some(PackageManager::Deb) => flags.uses_deb = true,
            Some(PackageManager::Zyp) => flags.uses_zyp = true,
            None => {}
        }
        flags
    }

    /// The single active flavor, if any.
    pub fn active(&self) -> Option<PackageManager> {
        if self.uses_rpm {
            Some(PackageManager::Rpm)
        } else if self.uses_deb {
            Some(PackageManager::Deb)
        } else if self.uses_zyp {
            Some(PackageManager::Zyp)
        } else {
            None
        }
    }
}

/// One third-party artifact to fetch and install.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtPkg {
    /// Source locator; the scheme picks the fetch method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Skip this entry entirely
    #[serde(
        default,
        alias = "disa",
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "is_false"
    )]
    pub disabled: bool,

    /// Directory the artifact is installed or unpacked into
    #[serde(default, alias = "path", skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,

    /// Extra command run after unpacking a gzip archive
    #[serde(default, alias = "run", skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,

    /// Symlink created next to a shared-object install
    #[serde(default, alias = "link", skip_serializing_if = "Option::is_none")]
    pub link_name: Option<String>,

    /// For `file://` sources: copy straight to `destinationPath`
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "is_false"
    )]
    pub direct: bool,

    /// Directives generated for this entry (derived)
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub cont: Option<String>,

    /// Unrecognized keys, passed through to the template
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtPkg {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Drop generated directives, including a `cont` key given in the
    /// input. Returns true when such an input key was present.
    pub fn clear_derived(&mut self) -> bool {
        self.cont = None;
        self.extra.remove("cont").is_some()
    }
}

/// Blocks written by the enrichment passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedBlocks {
    pub package_list_block: String,
    pub directory_create_block: String,
    pub symlink_block: String,
    /// Unset when there is no environment; templates test for its presence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_block: Option<String>,
    #[serde(flatten)]
    pub flags: PackageManagerFlags,
}

/// The image build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(default, alias = "tmplfname", skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,

    #[serde(default, alias = "pkgtype", skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    #[serde(default, alias = "dockerfname", skip_serializing_if = "Option::is_none")]
    pub docker_file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<String>,

    /// `.json` (array of names) or `.txt` (one name per line)
    #[serde(default, alias = "plfname", skip_serializing_if = "Option::is_none")]
    pub package_list_file: Option<String>,

    #[serde(default, alias = "plist", skip_serializing_if = "Option::is_none")]
    pub package_list_inline: Option<Vec<String>>,

    #[serde(default, alias = "ppl", skip_serializing_if = "Option::is_none")]
    pub packages_per_line: Option<i64>,

    #[serde(default, alias = "mkdir", skip_serializing_if = "Option::is_none")]
    pub directories: Option<Vec<String>>,

    /// Kept as raw JSON; the symlink pass validates the pair shape.
    #[serde(default, alias = "links", skip_serializing_if = "Option::is_none")]
    pub symlinks: Option<Value>,

    #[serde(default, alias = "extpkgs", skip_serializing_if = "Option::is_none")]
    pub external_packages: Option<Vec<ExtPkg>>,

    #[serde(default, alias = "env", skip_serializing_if = "Option::is_none")]
    pub environment: Option<Map<String, Value>>,

    #[serde(default)]
    pub commands_to_run: Vec<String>,

    /// Unrecognized keys, passed through to the template
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub derived: DerivedBlocks,
}

impl ImageConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DfgenError> {
        let content = fs::read_to_string(path).map_err(|e| DfgenError::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse config JSON; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, DfgenError> {
        serde_json::from_str(content).map_err(|e| DfgenError::ConfigLoad {
            path: origin.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Fill `dockerFileName` and the package manager flags.
    ///
    /// Template loading is left to the orchestrator, which knows where the
    /// config came from.
    pub fn apply_defaults(&mut self) {
        if self.docker_file_name.is_none() {
            self.docker_file_name = Some(self.default_docker_file_name());
        }
        self.derived.flags = PackageManagerFlags::for_package_type(self.package_type.as_deref());
    }

    /// `Dockerfile.<image>` when an image name is known, else `Dockerfile`.
    pub fn default_docker_file_name(&self) -> String {
        match self.image.as_deref() {
            Some(image) if !image.is_empty() => format!("{}.{}", DEFAULT_DOCKERFILE_NAME, image),
            _ => DEFAULT_DOCKERFILE_NAME.to_string(),
        }
    }

    /// The output file name, defaulted if `apply_defaults` has not run.
    pub fn docker_file_name(&self) -> String {
        self.docker_file_name
            .clone()
            .unwrap_or_else(|| self.default_docker_file_name())
    }

    /// `image[:versionTag]`, if an image name is set.
    pub fn image_reference(&self) -> Option<String> {
        let image = self.image.as_deref().filter(|i| !i.is_empty())?;
        Some(match self.version_tag.as_deref().filter(|t| !t.is_empty()) {
            Some(tag) => format!("{}:{}", image, tag),
            None => image.to_string(),
        })
    }
}

/// Resolve a path named inside a config.
///
/// Absolute paths and paths that exist relative to the working directory
/// are used as given. Otherwise the directory holding the config is tried.
pub fn resolve_input_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() || path.exists() {
        return path;
    }
    match base_dir {
        Some(dir) => {
            let candidate = dir.join(&path);
            if candidate.exists() { candidate } else { path }
        }
        None => path,
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept JSON truthiness for flags: older configs write `"disa": 1`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}
