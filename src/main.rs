//! Tomestone CLI - Command-line tool for FFXIV asset dependency analysis.
//!
//! This is the main entry point for the Tomestone command-line application.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use tomestone::prelude::*;

/// Tomestone - FFXIV character asset dependency analysis tool
#[derive(Parser)]
#[command(name = "tomestone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify paths by file type and dependency level
    Classify {
        /// Internal game paths to classify
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Resolve the dependency roots a path belongs to
    Roots {
        /// Internal game paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show the identity fields and derived paths of a root
    Info {
        /// Any path that embeds a root identity
        path: String,
    },

    /// Expand a root into its model and metadata record paths
    Expand {
        /// Any path that embeds a root identity
        path: String,

        /// Directory of extracted game files (enables IMC records)
        #[arg(short, long, env = "TOMESTONE_DATA")]
        data: Option<PathBuf>,
    },

    /// Scan an extracted game tree and summarize its dependency structure
    Scan {
        /// Directory of extracted game files
        #[arg(short, long, env = "TOMESTONE_DATA")]
        data: PathBuf,

        /// Filter pattern (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { paths } => {
            cmd_classify(&paths);
        }
        Commands::Roots { paths } => {
            cmd_roots(&paths)?;
        }
        Commands::Info { path } => {
            cmd_info(&path)?;
        }
        Commands::Expand { path, data } => {
            cmd_expand(&path, data)?;
        }
        Commands::Scan { data, filter } => {
            cmd_scan(&data, filter.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_classify(paths: &[String]) {
    for path in paths {
        println!(
            "{:<7} {:<8} {}",
            FileType::from_path(path),
            DependencyLevel::from_path(path),
            path
        );
    }
}

fn cmd_roots(paths: &[String]) -> Result<()> {
    let refs = EmptyRefs;
    let races = StaticRaceList::default();
    let graph = DependencyGraph::new(&refs, &refs, &refs, &races, &refs);

    for path in paths {
        let roots = graph
            .resolve_roots(path)
            .with_context(|| format!("Failed to resolve {path}"))?;

        println!("{path}");
        if roots.is_empty() {
            println!("  (no roots)");
        } else {
            for root in roots {
                println!("  {root}");
            }
        }
    }

    Ok(())
}

fn cmd_info(path: &str) -> Result<()> {
    let Some(root) = RootId::extract(path) else {
        anyhow::bail!("No root identity in path: {path}");
    };

    println!("Root:      {}", root.root_path());
    println!("Primary:   {} {}", root.primary_type(), root.primary_id());
    if let (Some(kind), Some(id)) = (root.secondary_type(), root.secondary_id()) {
        println!("Secondary: {kind} {id}");
    }
    if let Some(slot) = root.slot() {
        println!("Slot:      {slot}");
    }
    if let Some(race) = root.race() {
        println!("Race:      {race}");
    }
    println!("Meta file: {}", root.meta_file_path());
    println!("IMC file:  {}", root.imc_path());

    Ok(())
}

fn cmd_expand(path: &str, data: Option<PathBuf>) -> Result<()> {
    let Some(id) = RootId::extract(path) else {
        anyhow::bail!("No root identity in path: {path}");
    };

    let files: Box<dyn FileProvider> = match data {
        Some(dir) => Box::new(DirectoryProvider::new(dir)),
        None => Box::new(EmptyRefs),
    };
    let refs = EmptyRefs;
    let races = StaticRaceList::default();
    let graph = DependencyGraph::new(&*files, &refs, &refs, &races, &refs);

    let root = graph.root(id);
    println!("Root: {}", root.id());

    let models = root.model_paths().context("Failed to expand model paths")?;
    println!("\nModels ({}):", models.len());
    for model in &models {
        println!("  {model}");
    }

    let records = root
        .meta_record_paths()
        .context("Failed to expand metadata records")?;
    println!("\nMetadata records ({}):", records.len());
    for record in &records {
        println!("  {record}");
    }

    Ok(())
}

fn cmd_scan(data: &PathBuf, filter: Option<&str>) -> Result<()> {
    println!("Scanning: {}", data.display());

    let start = Instant::now();
    let paths: Vec<String> = WalkDir::new(data)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(data)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        })
        .filter(|rel| filter.map_or(true, |pattern| glob_match(pattern, rel)))
        .collect();

    println!("Found {} files in {:?}", paths.len(), start.elapsed());

    let files = DirectoryProvider::new(data);
    let refs = EmptyRefs;
    let races = StaticRaceList::default();
    let graph = DependencyGraph::new(&files, &refs, &refs, &races, &refs);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let stats = paths
        .par_iter()
        .fold(ScanStats::default, |mut stats, path| {
            stats.tally(&graph, path);
            pb.inc(1);
            stats
        })
        .reduce(ScanStats::default, ScanStats::merge);

    pb.finish_with_message("Done");

    println!("\nScanned {} files in {:?}", paths.len(), start.elapsed());
    println!("Tracked files: {}", stats.tracked);
    for (kind, count) in &stats.by_kind {
        println!("  {kind:<6} {count}");
    }
    println!("Distinct roots: {}", stats.roots.len());
    println!("Orphaned files: {}", stats.orphans.len());
    for orphan in stats.orphans.iter().take(10) {
        println!("  {orphan}");
    }
    if stats.errors > 0 {
        println!("Resolution errors: {}", stats.errors);
    }

    Ok(())
}

/// Aggregate results of a tree scan.
#[derive(Default)]
struct ScanStats {
    tracked: usize,
    by_kind: BTreeMap<String, usize>,
    roots: BTreeSet<RootId>,
    orphans: Vec<String>,
    errors: usize,
}

impl ScanStats {
    fn tally(&mut self, graph: &DependencyGraph<'_>, path: &str) {
        let kind = FileType::from_path(path);
        if kind == FileType::Invalid {
            return;
        }
        self.tracked += 1;
        *self.by_kind.entry(kind.to_string()).or_default() += 1;

        match graph.resolve_roots(path) {
            Ok(roots) if roots.is_empty() => self.orphans.push(path.to_owned()),
            Ok(roots) => self.roots.extend(roots),
            Err(err) => {
                log::warn!("failed to resolve {path}: {err}");
                self.errors += 1;
            }
        }
    }

    fn merge(mut self, other: ScanStats) -> ScanStats {
        self.tracked += other.tracked;
        for (kind, count) in other.by_kind {
            *self.by_kind.entry(kind).or_default() += count;
        }
        self.roots.extend(other.roots);
        self.orphans.extend(other.orphans);
        self.errors += other.errors;
        self
    }
}

/// Simple glob matching for filtering.
fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let name = name.to_lowercase();

    if !pattern.contains('*') {
        return name.contains(&pattern);
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }

        match name[pos..].find(part) {
            Some(found) => {
                if i == 0 && found != 0 {
                    // No leading *, so the first part must match at the start
                    return false;
                }
                pos += found + part.len();
            }
            None => return false,
        }
    }

    // A trailing * accepts any remainder; otherwise the name must be consumed
    parts.last().map_or(true, |p| p.is_empty()) || pos == name.len()
}
