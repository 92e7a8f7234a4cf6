use clap::{Args, Parser, Subcommand};
use octopus_tools::cli::{self, CatalogArgs};
use octopus_tools::error::OctoResult;
use octopus_tools::logging::init_tracing;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "octo")]
#[command(about = "Check Octopus input files against the variables of an Octopus release.")]
#[command(long_about = "Octo - offline checking for Octopus input files

Every `Name = value` line is compared with the variable information of the
selected Octopus release: option names, integers, floats (including inline
expressions such as 0.2*angstrom or sqrt(2)) and logical values.

COMMANDS:
  check           - Report invalid values in input files
  watch           - Re-check a file every time it is saved
  vars            - List the variables of a release
  info            - Show everything known about one variable
  detect-version  - Find the installed Octopus version
  grammar         - Print a TextMate grammar for editors
  import-varinfo  - Build a catalog from an installation's varinfo file

EXAMPLES:
  octo check inp                              # Check with the default release
  octo --octopus-version 16.2 check inp       # Check against Octopus 16.2
  octo vars --filter td                       # Time-dependent variables
  octo info CalculationMode
  octo --data-dir ~/.octopus import-varinfo /opt/octopus/share/varinfo --version 16.3

Settings are also read from .octopus-tools.yaml in the input's directory or
any parent (keys: version, dataDir).")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    catalog: CatalogFlags,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogFlags {
    /// Octopus release to check against (e.g. 14.1, 16.2)
    #[arg(long = "octopus-version", global = true, env = "OCTOPUS_VERSION")]
    octopus_version: Option<String>,

    /// Directory with additional varinfo-<version>.json files
    #[arg(long, global = true, env = "OCTOPUS_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl From<CatalogFlags> for CatalogArgs {
    fn from(flags: CatalogFlags) -> Self {
        CatalogArgs {
            version: flags.octopus_version,
            data_dir: flags.data_dir,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Report invalid values in Octopus input files.

Lines starting with #, % or - and blank lines are skipped. Variables that are
not part of the selected release are assumed to be user-defined and are not
reported.

Exits with an error when at least one invalid value is found.")]
    /// Report invalid values in input files
    Check {
        /// Input file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Re-check a file every time it changes
    Watch {
        /// Input file to watch
        file: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the variables of the selected release
    Vars {
        /// Only show variables whose name or section contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show type, default, section and valid values of a variable
    Info {
        /// Variable name (case-insensitive)
        name: String,
    },

    #[command(long_about = "Find the installed Octopus version.

Tries, in order:
  1. `octopus --version` (5 second timeout)
  2. a `# octopus version: X.Y` marker in --file
  3. octopus.conf, config.inp, version.txt or .octopus-version in each root")]
    /// Find the installed Octopus version
    DetectVersion {
        /// Input file to look for a version marker in
        #[arg(long)]
        file: Option<PathBuf>,

        /// Directories to search for version files (default: current directory)
        roots: Vec<PathBuf>,
    },

    #[command(long_about = "Build a catalog from an Octopus varinfo file.

Every Octopus installation ships share/varinfo, which lists all input
variables of that release. The file is converted to varinfo-<version>.json
and written to --output, or else into --data-dir, or else into the current
directory. Catalogs in the data directory are picked up by every command and
by the language server.")]
    /// Build a catalog from an installation's varinfo file
    ImportVarinfo {
        /// Path to the varinfo file (share/varinfo in an installation)
        input: PathBuf,

        /// Octopus release the file belongs to (e.g. 16.3)
        #[arg(long = "version", value_name = "X.Y")]
        release: String,

        /// Write to this file instead of the data directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a TextMate grammar built from the selected release
    Grammar {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> OctoResult<()> {
    init_tracing("octopus_tools=warn");
    let cli = Cli::parse();
    let args = CatalogArgs::from(cli.catalog);

    match cli.command {
        Commands::Check { files } => cli::check(files, args),

        Commands::Watch { file, verbose } => cli::watch(file, args, verbose),

        Commands::Vars { filter } => cli::vars(filter, args),

        Commands::Info { name } => cli::info(name, args),

        Commands::DetectVersion { file, roots } => cli::detect_version(file, roots, args).map(|_| ()),

        Commands::Grammar { output } => cli::grammar(output, args),

        Commands::ImportVarinfo {
            input,
            release,
            output,
            verbose,
        } => cli::import_varinfo(input, release, output, args, verbose).map(|_| ()),
    }
}
