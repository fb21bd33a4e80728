//! Runtime descriptor resolution.
//!
//! Maps a runtime id (`maven`, `python-3.11`, `go1.22`, ...) to the manifest the
//! CLI analyzes, the package manager it shells out to, and the directory the
//! runtime's scenarios live under. Resolution is a pure lookup.
use crate::error::HarnessError;

/// Environment prefix read by older CLI releases.
pub const LEGACY_ENV_PREFIX: &str = "EXHORT";
/// Environment prefix read by current CLI releases.
pub const CURRENT_ENV_PREFIX: &str = "TRUSTIFY_DA";
pub const ENV_PREFIXES: [&str; 2] = [LEGACY_ENV_PREFIX, CURRENT_ENV_PREFIX];

/// Package-manager ids whose path variables can steer runtime detection.
/// Includes the python aliases the CLI also consults.
pub const KNOWN_PACKAGE_MANAGERS: &[&str] = &[
    "pip", "pip3", "python", "python3", "npm", "mvn", "gradle", "go", "yarn", "pnpm",
];

/// Manifest placeholder reported for runtimes the CLI cannot analyze yet.
pub const PENDING_MANIFEST: &str = "TODO: Implement OCI CLI support for Syft";

const EXACT_RUNTIMES: &[(&str, &str, &str)] = &[
    ("maven", "pom.xml", "mvn"),
    ("gradle-groovy", "build.gradle", "gradle"),
    ("gradle-kotlin", "build.gradle.kts", "gradle"),
    ("npm", "package.json", "npm"),
    ("yarn-classic", "package.json", "yarn"),
    ("yarn-berry", "package.json", "yarn"),
    ("pnpm", "package.json", "pnpm"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDescriptor {
    pub runtime_id: String,
    pub manifest_file_name: String,
    pub package_manager_id: String,
    pub scenario_base_dir: String,
}

impl RuntimeDescriptor {
    /// Path variables for this runtime's package manager, legacy name first.
    pub fn env_var_names(&self) -> Vec<String> {
        ENV_PREFIXES
            .iter()
            .map(|prefix| env_var_name(prefix, &self.package_manager_id))
            .collect()
    }
}

/// Outcome of resolving a runtime id the harness recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSupport {
    Supported(RuntimeDescriptor),
    /// Recognized but not yet testable; callers skip rather than fail.
    Pending { runtime_id: String },
}

impl RuntimeSupport {
    pub fn manifest_file_name(&self) -> &str {
        match self {
            RuntimeSupport::Supported(descriptor) => &descriptor.manifest_file_name,
            RuntimeSupport::Pending { .. } => PENDING_MANIFEST,
        }
    }

    /// `None` means the runtime is pending and the run should be skipped.
    pub fn package_manager_id(&self) -> Option<&str> {
        match self {
            RuntimeSupport::Supported(descriptor) => Some(&descriptor.package_manager_id),
            RuntimeSupport::Pending { .. } => None,
        }
    }
}

pub fn resolve(runtime_id: &str) -> Result<RuntimeSupport, HarnessError> {
    let runtime = runtime_id.to_lowercase();

    if runtime.starts_with("syft") {
        return Ok(RuntimeSupport::Pending {
            runtime_id: runtime,
        });
    }

    let (manifest, package_manager, base_dir) = if runtime.starts_with("go") {
        ("go.mod", "go", "go".to_string())
    } else if runtime.starts_with("python") {
        ("requirements.txt", "pip", "python-pip".to_string())
    } else {
        let (_, manifest, package_manager) = EXACT_RUNTIMES
            .iter()
            .find(|(id, _, _)| *id == runtime)
            .ok_or_else(|| HarnessError::UnsupportedRuntime {
                runtime: runtime.clone(),
            })?;
        (*manifest, *package_manager, runtime.clone())
    };

    Ok(RuntimeSupport::Supported(RuntimeDescriptor {
        runtime_id: runtime,
        manifest_file_name: manifest.to_string(),
        package_manager_id: package_manager.to_string(),
        scenario_base_dir: base_dir,
    }))
}

pub fn env_var_name(prefix: &str, package_manager_id: &str) -> String {
    format!("{prefix}_{}_PATH", package_manager_id.to_uppercase())
}
