//! # Environment Store
//!
//! Owns the on-disk representation of environments. Every environment is a
//! directory `<root>/<name>/` holding an `env.toml` descriptor; the directory
//! itself doubles as the toolkit home of that environment, so anything the
//! toolkit installs there (packages, caches) belongs to the environment.
//!
//! All mutations publish atomically:
//! - new environments are assembled in a dot-prefixed staging directory and
//!   published with a single directory rename;
//! - descriptor replacements go through a temporary file persisted over
//!   `env.toml`;
//! - deletions first rename the directory into a dot-prefixed trash directory,
//!   then purge it.
//!
//! Dot-prefixed entries are never valid environment names, so half-finished
//! work is invisible to [`EnvironmentStore::list`] and [`EnvironmentStore::load`].

use crate::{
    constants::{DESCRIPTOR_FILENAME, STAGING_PREFIX, TRASH_PREFIX},
    core::paths::{self, PathError},
    models::{CloneOverrides, DescriptorChanges, EnvironmentDescriptor},
};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::{NamedTempFile, TempDir};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised by the environment store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The environments root could not be resolved or created.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// The descriptor could not be encoded.
    #[error("Failed to serialize descriptor to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// The temporary descriptor could not be moved into place.
    #[error("Failed to atomically replace descriptor: {0}")]
    Persist(#[from] tempfile::PersistError),
    /// The descriptor exists but could not be parsed.
    #[error("Descriptor of environment '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: toml::de::Error,
    },
    /// No descriptor is published under that name.
    #[error("Environment '{name}' does not exist.")]
    NotFound { name: String },
    /// The name is taken by a published environment.
    #[error("Environment '{name}' already exists.")]
    AlreadyExists { name: String },
    /// The name cannot be used as a directory name.
    #[error("Invalid environment name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    /// A non-directory occupies the environment's directory name.
    #[error("'{path}' is in the way and is not an environment directory.")]
    Blocked { path: String },
    /// The descriptor names no toolkit jar.
    #[error("No toolkit artifact specified.")]
    EmptyArtifact,
    /// The toolkit jar is not an existing file.
    #[error("Toolkit artifact '{path}' does not exist or is not a file.")]
    MissingArtifact { path: String },
}

type StoreResult<T> = Result<T, StoreError>;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The environment and its directory were removed.
    Removed,
    /// Nothing was stored under that name.
    Absent,
}

/// Loads, saves and enumerates environment descriptors below one root directory.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    root: PathBuf,
}

impl EnvironmentStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        paths::ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// The directory holding all environments.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory that materialises environment `name`.
    pub fn env_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn descriptor_path(&self, name: &str) -> PathBuf {
        self.env_dir(name).join(DESCRIPTOR_FILENAME)
    }

    /// Whether a published descriptor exists under `name`.
    pub fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.descriptor_path(name).is_file()
    }

    /// Returns the names of all published environments, sorted.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| {
                StoreError::Io(
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
                )
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                log::debug!("Skipping non UTF-8 entry '{}'", entry.path().display());
                continue;
            };
            if validate_name(name).is_err() {
                continue;
            }
            if entry.path().join(DESCRIPTOR_FILENAME).is_file() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Loads the descriptor stored under `name`.
    pub fn load(&self, name: &str) -> StoreResult<EnvironmentDescriptor> {
        validate_name(name)?;
        let path = self.descriptor_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let mut descriptor: EnvironmentDescriptor =
            toml::from_str(&content).map_err(|source| StoreError::Corrupt {
                name: name.to_string(),
                source,
            })?;
        if descriptor.name != name {
            log::warn!(
                "Descriptor in '{}' names itself '{}'; using the directory name.",
                path.display(),
                descriptor.name
            );
            descriptor.name = name.to_string();
        }
        Ok(descriptor)
    }

    /// Creates or replaces the descriptor. Last writer wins.
    pub fn save(&self, descriptor: &EnvironmentDescriptor) -> StoreResult<()> {
        validate_name(&descriptor.name)?;
        if descriptor.artifact.trim().is_empty() {
            return Err(StoreError::EmptyArtifact);
        }

        let env_dir = self.env_dir(&descriptor.name);
        if env_dir.is_dir() {
            return write_descriptor(&env_dir, descriptor);
        }

        let staging = self.staging_dir()?;
        write_descriptor(staging.path(), descriptor)?;
        match self.publish(staging, &descriptor.name) {
            Ok(()) => Ok(()),
            // Another writer published the same name first; replace its descriptor.
            Err(StoreError::AlreadyExists { .. }) => write_descriptor(&env_dir, descriptor),
            Err(e) => Err(e),
        }
    }

    /// Creates a new environment, failing if the name is taken.
    pub fn create(&self, descriptor: &EnvironmentDescriptor) -> StoreResult<()> {
        validate_name(&descriptor.name)?;
        if self.exists(&descriptor.name) {
            return Err(StoreError::AlreadyExists {
                name: descriptor.name.clone(),
            });
        }
        check_artifact(&descriptor.artifact)?;

        let mut descriptor = descriptor.clone();
        descriptor.runtime = normalize_runtime(&descriptor.runtime);

        let staging = self.staging_dir()?;
        write_descriptor(staging.path(), &descriptor)?;
        self.publish(staging, &descriptor.name)?;
        log::debug!("Created environment '{}'", descriptor.name);
        Ok(())
    }

    /// Removes the environment and everything stored in its directory.
    pub fn delete(&self, name: &str) -> StoreResult<DeleteOutcome> {
        validate_name(name)?;
        let env_dir = self.env_dir(name);
        if !self.exists(name) {
            if env_dir.exists() {
                log::warn!(
                    "'{}' holds no descriptor; leaving it in place.",
                    env_dir.display()
                );
            }
            return Ok(DeleteOutcome::Absent);
        }

        let trash = tempfile::Builder::new()
            .prefix(TRASH_PREFIX)
            .tempdir_in(&self.root)?;
        match fs::rename(&env_dir, trash.path().join(name)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DeleteOutcome::Absent),
            Err(e) => return Err(e.into()),
        }

        // Unpublished already; a failed purge only leaves an invisible trash directory behind.
        let trash_path = trash.path().to_path_buf();
        if let Err(e) = trash.close() {
            log::warn!(
                "Environment '{}' was removed but '{}' could not be purged: {}",
                name,
                trash_path.display(),
                e
            );
        }
        log::debug!("Deleted environment '{}'", name);
        Ok(DeleteOutcome::Removed)
    }

    /// Copies `old_name` (descriptor and directory contents) to `new_name`,
    /// applying `overrides` to the copied descriptor.
    pub fn clone_env(
        &self,
        old_name: &str,
        new_name: &str,
        overrides: &CloneOverrides,
    ) -> StoreResult<EnvironmentDescriptor> {
        validate_name(new_name)?;
        let source = self.load(old_name)?;
        if self.exists(new_name) {
            return Err(StoreError::AlreadyExists {
                name: new_name.to_string(),
            });
        }

        let descriptor = EnvironmentDescriptor {
            name: new_name.to_string(),
            runtime: normalize_runtime(overrides.runtime.as_deref().unwrap_or(&source.runtime)),
            heap: overrides
                .heap
                .as_deref()
                .unwrap_or(&source.heap)
                .trim()
                .to_string(),
            artifact: overrides
                .artifact
                .clone()
                .unwrap_or_else(|| source.artifact.clone()),
            env_vars: source.env_vars.clone(),
        };
        check_artifact(&descriptor.artifact)?;

        let staging = self.staging_dir()?;
        copy_tree(&self.env_dir(old_name), staging.path())?;
        write_descriptor(staging.path(), &descriptor)?;
        self.publish(staging, new_name)?;
        log::debug!("Cloned environment '{}' to '{}'", old_name, new_name);
        Ok(descriptor)
    }

    /// Applies `changes` to an existing environment in place.
    pub fn update(
        &self,
        name: &str,
        changes: &DescriptorChanges,
    ) -> StoreResult<EnvironmentDescriptor> {
        let mut descriptor = self.load(name)?;

        if let Some(runtime) = &changes.runtime {
            descriptor.runtime = normalize_runtime(runtime);
        }
        if let Some(heap) = &changes.heap {
            descriptor.heap = heap.trim().to_string();
        }
        if let Some(artifact) = &changes.artifact {
            check_artifact(artifact)?;
            descriptor.artifact = artifact.clone();
        }
        for key in &changes.unset_env {
            descriptor.env_vars.remove(key);
        }
        descriptor.env_vars.extend(
            changes
                .set_env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        write_descriptor(&self.env_dir(name), &descriptor)?;
        log::debug!("Updated environment '{}'", name);
        Ok(descriptor)
    }

    fn staging_dir(&self) -> StoreResult<TempDir> {
        paths::ensure_dir(&self.root)?;
        Ok(tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)?)
    }

    /// Moves a fully written staging directory to its public name in one rename.
    fn publish(&self, staging: TempDir, name: &str) -> StoreResult<()> {
        let target = self.env_dir(name);
        if target.exists() {
            if !target.is_dir() {
                return Err(StoreError::Blocked {
                    path: target.display().to_string(),
                });
            }
            if target.join(DESCRIPTOR_FILENAME).exists() {
                return Err(StoreError::AlreadyExists {
                    name: name.to_string(),
                });
            }
            // A leftover directory without descriptor is not an environment.
            log::warn!(
                "Replacing stray directory '{}' that holds no descriptor.",
                target.display()
            );
            fs::remove_dir_all(&target)?;
        }

        match fs::rename(staging.path(), &target) {
            Ok(()) => {
                // The directory now lives under its public name; nothing left to clean up.
                let _ = staging.keep();
                Ok(())
            }
            Err(_) if target.join(DESCRIPTOR_FILENAME).exists() => Err(StoreError::AlreadyExists {
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Checks that `name` can be used as an environment name (and directory name).
pub fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = |reason| StoreError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name must not start with '.'"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid("only letters, digits, '.', '_' and '-' are allowed"));
    }
    Ok(())
}

/// Verifies that the artifact references an existing regular file.
pub fn check_artifact(artifact: &str) -> StoreResult<()> {
    if artifact.trim().is_empty() {
        return Err(StoreError::EmptyArtifact);
    }
    let path = paths::expand_user_path(artifact)?;
    if !path.is_file() {
        return Err(StoreError::MissingArtifact {
            path: artifact.to_string(),
        });
    }
    Ok(())
}

/// A runtime pointing at a directory (or nothing) means "use the default runtime".
pub fn normalize_runtime(runtime: &str) -> String {
    let trimmed = runtime.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match paths::expand_user_path(trimmed) {
        Ok(path) if path.is_dir() => String::new(),
        _ => trimmed.to_string(),
    }
}

/// Writes the descriptor into `dir` through a temporary file so readers never see a partial file.
fn write_descriptor(dir: &Path, descriptor: &EnvironmentDescriptor) -> StoreResult<()> {
    let content = toml::to_string_pretty(descriptor)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dir.join(DESCRIPTOR_FILENAME))?;
    Ok(())
}

/// Recursively copies the contents of `source` into `target`, leaving out the descriptor.
fn copy_tree(source: &Path, target: &Path) -> StoreResult<()> {
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| {
            StoreError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
            )
        })?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if relative == Path::new(DESCRIPTOR_FILENAME) {
            continue;
        }
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &destination)?;
        } else {
            log::debug!("Not copying special file '{}'", entry.path().display());
        }
    }
    Ok(())
}
