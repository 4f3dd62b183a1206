use clap::Parser;
use std::ffi::OsStr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File listing the pgen file set basenames to merge, one per line
    #[arg(name = "MERGELIST", value_parser = check_path_exists)]
    pub mergelist: PathBuf,

    /// How many tiers of merging to do
    #[arg(short, long, value_name = "INT", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: u32,

    /// How many chunks to split the file list into per tier
    #[arg(short, long, value_name = "INT", default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub width: u64,

    /// The basename of the output pgen, psam, and pvar files
    #[arg(short, long = "output-basename", value_name = "NAME", default_value = "merged")]
    pub output_basename: String,

    /// Directory for intermediate and output files
    #[arg(short = 'D', long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Number of merge workers to run concurrently (0 = one per logical CPU)
    #[arg(short = 't', long, value_name = "INT", default_value_t = 0)]
    pub threads: usize,

    /// Carry on when a plink2 invocation exits non-zero, as the original
    /// merge script did
    #[arg(long)]
    pub ignore_merge_exit_status: bool,

    /// `-q` only show errors and warnings. `-qq` only show errors. `-qqq` shows nothing.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,

    /// `-v` show debug output. `-vv` show trace output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// A utility function that allows the CLI to error if a path doesn't exist
fn check_path_exists<S: AsRef<OsStr> + ?Sized>(s: &S) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("{:?} does not exist", path))
    }
}
