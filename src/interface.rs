use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use minigit::digest::Digest;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository in the working directory
    Init,

    /// Stage files (directories are added recursively)
    Add {
        #[arg(required = true, num_args = 1..)]
        path: Vec<Utf8PathBuf>,
    },

    /// Record the index as a new commit on the current branch
    Commit {
        #[arg(short, long, env = "MINIGIT_COMMIT_MESSAGE")]
        message: String,
    },

    /// Create a branch at HEAD and switch to it, or list branches when no name is given
    Branch { name: Option<String> },

    /// Switch to a branch, updating the working tree and index
    Checkout { branch: String },

    /// Fast-forward the current branch to another branch
    Merge { branch: String },

    /// Show the history of the current branch
    Log,

    #[command(subcommand)]
    CatFile(CatFile),
}

#[derive(Clone, Debug, Subcommand)]
pub enum CatFile {
    /// Exit successfully if `object` exists and is a valid object. Otherwise print an error and
    /// exit with a failure status.
    #[command(short_flag = 'e')]
    Exists {
        #[arg(value_name = "object")]
        object: Digest,
    },

    /// Pretty-print the contents of `object` based on its type
    #[command(short_flag = 'p')]
    PrettyPrint {
        #[arg(value_name = "object")]
        object: Digest,
    },

    /// Print the type of `object` to stdout
    #[command(short_flag = 't')]
    Type {
        #[arg(value_name = "object")]
        object: Digest,
    },

    /// Print the size of `object` to stdout
    #[command(short_flag = 's')]
    Size {
        #[arg(value_name = "object")]
        object: Digest,
    },
}

#[derive(Debug, Parser)]
#[command(name = "minigit", version)]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', env = "MINIGIT_DIR")]
    pub path: Option<Utf8PathBuf>,
}
