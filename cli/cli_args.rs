use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reposcribe",
    author,
    version,
    about = "Scribe a repository's non-ignored files into a single context file.",
    long_about = "reposcribe walks PROJECT_DIR, filters it against built-in ignore defaults \nplus the project's .gitignore, and concatenates the surviving files \n(with an optional file tree) into one plain-text output file."
)]
pub struct Cli {
    #[arg(
        value_name = "PROJECT_DIR",
        help = "Path to the project root directory to scribe."
    )]
    pub project_dir: PathBuf,

    #[arg(
        value_name = "OUTPUT_FILE",
        help = "Path to the output file [default: ./output/<project>_context.txt]."
    )]
    pub output_file: Option<PathBuf>,

    #[arg(long = "no-tree", help = "Exclude the file tree from the output.")]
    pub no_tree: bool,

    #[arg(short, long, help = "Skip the confirmation prompt.")]
    pub yes: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}
