use anyhow::{bail, Context, Result};
use clap::Parser;
use libpgmerge::artifact::{ArtifactHandle, DATA_EXTENSIONS, LOG_EXTENSION};
use libpgmerge::{scheduler, PlinkMergeExecutor};
use log::{debug, info, LevelFilter};

mod cli;

fn setup_logging(quiet: u8, verbose: u8) {
    let sum = verbose as i16 - quiet as i16;
    let lvl = match sum {
        1 => LevelFilter::Debug,
        2.. => LevelFilter::Trace,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        i if i < -2 => LevelFilter::Off,
        _ => LevelFilter::Info,
    };
    let mut log_builder = env_logger::Builder::new();
    log_builder.filter(None, lvl);
    log_builder.init();
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    setup_logging(args.quiet, args.verbose);
    debug!("{:?}", args);

    let mergelist = std::fs::read_to_string(&args.mergelist)
        .with_context(|| format!("Failed to read merge list {:?}", args.mergelist))?;
    let files: Vec<ArtifactHandle> = mergelist
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ArtifactHandle::leaf)
        .collect();
    if files.is_empty() {
        bail!("Merge list {:?} contains no file sets", args.mergelist);
    }
    info!("Read {} file sets from {:?}", files.len(), args.mergelist);

    if !args.dir.exists() {
        std::fs::create_dir_all(&args.dir)
            .with_context(|| format!("Failed to create working directory {:?}", args.dir))?;
    }

    let executor = PlinkMergeExecutor::new(&args.dir)
        .ignore_exit_status(args.ignore_merge_exit_status);
    let merger = scheduler::Builder::new()
        .depth(args.depth)
        .chunks(args.width as usize)
        .threads(args.threads)
        .build(executor);

    let merged = merger.merge(&files).context("Hierarchical merge failed")?;

    // Move the final result to the requested basename and drop its log. A
    // single-entry merge list hands back the input itself, which has no log.
    for ext in DATA_EXTENSIONS {
        let from = merged.path_with_extension(ext);
        let to = args.dir.join(format!("{}.{}", args.output_basename, ext));
        std::fs::rename(&from, &to)
            .with_context(|| format!("Failed to rename {:?} to {:?}", from, to))?;
    }
    if merged.is_derived() {
        let log = merged.path_with_extension(LOG_EXTENSION);
        if log.exists() {
            std::fs::remove_file(&log)
                .with_context(|| format!("Failed to remove {:?}", log))?;
        }
    }

    info!(
        "Merged result written to {}",
        args.dir.join(&args.output_basename).display()
    );
    info!("Done!");
    Ok(())
}
