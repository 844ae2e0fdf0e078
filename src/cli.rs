//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::bundle::BundleKind;

/// Packwright - content bundle and machine package manager
#[derive(Parser, Debug)]
#[command(
    name = "packwright",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Manage versioned content bundles and build emulator machine packages",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  packwright bundle -t flashdrive -n dapp-test-data -v 1.0.0 dapp-test-data.ext2\n    \
                  packwright install dapp-test-data\n    \
                  packwright publish uri dapp-test-data /srv/bundles/dapp-test-data.ext2\n    \
                  packwright repo add https://example.com/bundles\n    \
                  packwright machine add flash dapp-test-data -s 0x8000000000000000 -l 0x100000\n    \
                  packwright machine build"
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'C', global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Package a local file into a content-addressed bundle
    Bundle(BundleArgs),

    /// Retrieve and display bundle listings for a name
    Fetch(FetchArgs),

    /// Install a bundle into the current project by name
    Install(InstallArgs),

    /// Publish a bundle to permanent storage
    #[command(subcommand)]
    Publish(PublishCommand),

    /// Manage package listing repos
    #[command(subcommand)]
    Repo(RepoCommand),

    /// Compose and build stored machines
    #[command(subcommand)]
    Machine(MachineCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version,
}

/// Arguments for the bundle command
#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Drive kind of the content
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: BundleKind,

    /// Bundle name
    #[arg(short = 'n', long)]
    pub name: String,

    /// Bundle version
    #[arg(short = 'v', long)]
    pub version: String,

    /// Short description
    #[arg(short = 'd', long)]
    pub desc: Option<String>,

    /// File to package
    pub file: PathBuf,
}

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Bundle name to look up
    pub name: String,
}

/// Arguments for the install command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a bundle listed by a registered repo:\n    packwright install dapp-test-data")]
pub struct InstallArgs {
    /// Bundle name to install
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum PublishCommand {
    /// Upload a bundle to an S3 bucket and register it
    S3 {
        /// Bundle name to publish
        name: String,
        /// Public-facing uri recorded in the listing
        uri: String,
        /// S3 bucket to upload to
        #[arg(long)]
        bucket: String,
        /// Register without uploading
        #[arg(long)]
        nosave: bool,
    },
    /// Copy a bundle to a directory tree and register it
    Disk {
        /// Bundle name to publish
        name: String,
        /// Target directory
        path: PathBuf,
        /// Register without copying
        #[arg(long)]
        nosave: bool,
    },
    /// Register a bundle under a uri without uploading anything
    Uri {
        /// Bundle name to register
        name: String,
        /// Location the content can be fetched from
        uri: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Register a package listing repo and fetch its listing
    Add {
        /// Listing source (path, HTTP, or git uri)
        source: String,
    },
    /// Re-fetch one repo's listing, or all of them
    Update {
        /// Listing source; all registered sources when omitted
        source: Option<String>,
    },
    /// Unregister a repo and drop its listing entries
    Rm {
        /// Listing source
        source: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MachineCommand {
    /// Create the machine package descriptor. Destructive: overwrites any
    /// existing descriptor without asking.
    Init,

    /// Add a bundle to the machine package descriptor
    #[command(subcommand)]
    Add(MachineAddCommand),

    /// Build a stored machine from the descriptor
    Build,

    /// Install every asset referenced by a machine package descriptor,
    /// then optionally build it
    Install {
        /// Descriptor location (path, HTTP, or git uri)
        uri: String,
        /// Resolve and install assets but skip the build
        #[arg(long)]
        nobuild: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MachineAddCommand {
    /// Occupy the ram slot
    Ram {
        /// Bundle name from the local listing
        bundle: String,
        /// Drive length in hex, e.g. 0x4000000
        #[arg(short = 'l', long)]
        length: String,
        /// Content path override, bypassing store resolution
        #[arg(short = 'r', long)]
        resolvedpath: Option<String>,
    },
    /// Add a flash drive
    Flash {
        /// Bundle name from the local listing
        bundle: String,
        /// Drive length in hex, e.g. 0x100000
        #[arg(short = 'l', long)]
        length: String,
        /// Drive start offset in hex, e.g. 0x8000000000000000
        #[arg(short = 's', long)]
        start: String,
        /// Mark the drive shared with the host
        #[arg(long)]
        shared: bool,
        /// Content path override, bypassing store resolution
        #[arg(short = 'r', long)]
        resolvedpath: Option<String>,
    },
    /// Occupy the rom slot
    Rom {
        /// Bundle name from the local listing
        bundle: String,
        /// Kernel boot arguments
        #[arg(short = 'b', long)]
        bootargs: Option<String>,
        /// Content path override, bypassing store resolution
        #[arg(short = 'r', long)]
        resolvedpath: Option<String>,
    },
}

/// Arguments for completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum)]
    pub shell: clap_complete::Shell,
}
