// src/cli/args.rs
//
// Option schemas of the commands. Each struct is handed to the dispatcher as a
// `clap::Command` (via `CommandFactory`) and read back with `FromArgMatches`.

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "create", no_binary_name = true)]
pub struct CreateArgs {
    /// The name of the new environment.
    #[arg(long)]
    pub name: String,

    /// The toolkit jar to use for the environment.
    #[arg(long)]
    pub artifact: String,

    /// The runtime executable; the system default is used when omitted.
    #[arg(long, default_value = "")]
    pub runtime: String,

    /// The heap size (e.g. 2g); the runtime default is used when omitted.
    #[arg(long, default_value = "")]
    pub heap: String,

    /// Environment variables for launched processes (KEY=VALUE, repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,
}

#[derive(Parser, Debug, Default)]
#[command(name = "clone", no_binary_name = true)]
pub struct CloneArgs {
    /// The environment to clone.
    #[arg(long)]
    pub old: String,

    /// The name of the new environment.
    #[arg(long)]
    pub new: String,

    /// Overrides the runtime executable (empty for the system default).
    #[arg(long)]
    pub runtime: Option<String>,

    /// Overrides the heap size (empty for the runtime default).
    #[arg(long)]
    pub heap: Option<String>,

    /// Overrides the toolkit jar.
    #[arg(long)]
    pub artifact: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(name = "update", no_binary_name = true)]
pub struct UpdateArgs {
    /// The new runtime executable (empty for the system default).
    #[arg(long)]
    pub runtime: Option<String>,

    /// The new heap size (empty for the runtime default).
    #[arg(long)]
    pub heap: Option<String>,

    /// The new toolkit jar.
    #[arg(long)]
    pub artifact: Option<String>,

    /// Sets an environment variable (KEY=VALUE, repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Removes an environment variable (repeatable).
    #[arg(long = "unset-env", value_name = "KEY")]
    pub unset_env: Vec<String>,
}

#[derive(Parser, Debug, Default)]
#[command(name = "delete", no_binary_name = true)]
pub struct DeleteArgs {
    /// The environment to delete.
    #[arg(long)]
    pub name: String,
}

#[derive(Parser, Debug, Default)]
#[command(name = "list", no_binary_name = true)]
pub struct ListArgs {
    /// Shows runtime, heap and artifact of each environment.
    #[arg(long, short)]
    pub long: bool,

    /// Prints the environments as JSON.
    #[arg(long, conflicts_with = "long")]
    pub json: bool,
}

#[derive(Parser, Debug, Default)]
#[command(name = "info", no_binary_name = true)]
pub struct InfoArgs {
    /// Prints the descriptor as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Default)]
#[command(name = "script", no_binary_name = true)]
pub struct ScriptArgs {
    /// The script file to execute.
    pub file: String,

    /// Predefines a script variable (KEY=VALUE, repeatable).
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

#[derive(Parser, Debug, Default)]
#[command(name = "base_name", no_binary_name = true)]
pub struct BaseNameArgs {
    /// The full path to extract the file name from.
    #[arg(long)]
    pub file: String,

    /// The name of the variable to store the result in.
    #[arg(long)]
    pub dest: String,
}

#[derive(Parser, Debug, Default)]
#[command(name = "dir_name", no_binary_name = true)]
pub struct DirNameArgs {
    /// The full path to extract the directory from.
    #[arg(long)]
    pub file: String,

    /// The name of the variable to store the result in.
    #[arg(long)]
    pub dest: String,
}

#[derive(Parser, Debug, Default)]
#[command(name = "set_var", no_binary_name = true)]
pub struct SetVarArgs {
    /// The name of the variable.
    #[arg(long)]
    pub name: String,

    /// The value to store.
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Parser, Debug, Default)]
#[command(name = "get_env", no_binary_name = true)]
pub struct GetEnvArgs {
    /// The process environment variable to read.
    #[arg(long)]
    pub name: String,

    /// The name of the script variable to store the value in.
    #[arg(long)]
    pub dest: String,

    /// Used when the environment variable is not set.
    #[arg(long, allow_hyphen_values = true)]
    pub default: Option<String>,
}
