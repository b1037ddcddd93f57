// src/constants.rs

/// The name of the configuration directory (inside the system config dir).
pub const APP_DIR_NAME: &str = "wekaenv";

/// Environment variable that overrides the configuration directory.
pub const HOME_OVERRIDE_VAR: &str = "WEKAENV_HOME";

/// The name of the settings file (inside the configuration directory).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// The default name of the directory holding all environments.
pub const ENVIRONMENTS_DIR: &str = "envs";

/// The name of the descriptor file inside each environment directory.
pub const DESCRIPTOR_FILENAME: &str = "env.toml";

/// Prefix for directories that are being assembled before publication.
pub const STAGING_PREFIX: &str = ".staging-";

/// Prefix for directories that have been unpublished and are being purged.
pub const TRASH_PREFIX: &str = ".trash-";

/// The runtime used when an environment does not pin one.
pub const DEFAULT_RUNTIME: &str = "java";

/// Flag prepended to the heap size (e.g. `-Xmx2g`).
pub const DEFAULT_HEAP_FLAG: &str = "-Xmx";

/// Flag that puts the artifact on the runtime's library search path.
pub const DEFAULT_CLASSPATH_FLAG: &str = "-cp";

/// Variable pointing the toolkit at the environment's own home directory.
pub const DEFAULT_HOME_VARIABLE: &str = "WEKA_HOME";

/// Script variable holding the path of the running script.
pub const SCRIPT_FILE_VAR: &str = "script_file";

/// Script variable holding the directory of the running script.
pub const SCRIPT_DIR_VAR: &str = "script_dir";
