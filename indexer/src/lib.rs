pub mod pattern;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tfidf_core::{CorpusIndex, Limit, WordScore};
use walkdir::WalkDir;

pub use pattern::CorpusPattern;

#[derive(Parser, Debug)]
#[command(name = "tfidf")]
#[command(about = "Find the most important words in documents relative to a corpus", long_about = None)]
pub struct Cli {
    /// Directory containing documents to read in
    pub directory: PathBuf,
    /// File(s) to identify important words in (default: every file read in)
    pub files: Vec<PathBuf>,
    /// Glob pattern specifying which files to read in
    #[arg(short, long, default_value = "*")]
    pub pattern: String,
    /// Number of words to display per file, or "all"
    #[arg(short = 'n', long = "num-words", default_value_t = Limit::default())]
    pub num_words: Limit,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// List words found in no other file instead of tf-idf rankings
    #[arg(long, default_value_t = false)]
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct ImportantReport {
    pub document: String,
    pub words: Vec<WordScore>,
}

#[derive(Debug, Serialize)]
pub struct UniqueReport {
    pub document: String,
    pub unique: Vec<String>,
}

/// An indexed corpus plus the canonical path of every file read into it.
pub struct Corpus {
    pub index: CorpusIndex,
    keys: HashMap<PathBuf, String>,
}

impl Corpus {
    /// Read every file under `dir` matching `pattern`.
    pub fn load(dir: &Path, pattern: &CorpusPattern) -> Result<Self> {
        let mut index = CorpusIndex::new();
        let mut keys = HashMap::new();
        for file in discover(dir, pattern)? {
            index.add_file(&file)?;
            let canonical = fs::canonicalize(&file)
                .with_context(|| format!("failed to resolve {}", file.display()))?;
            // two links to one file: the first one found keeps the canonical slot
            keys.entry(canonical).or_insert_with(|| file.display().to_string());
        }
        tracing::info!(
            num_docs = index.num_documents(),
            num_terms = index.vocabulary_size(),
            pattern = pattern.as_str(),
            "ingested documents"
        );
        Ok(Self { index, keys })
    }

    /// Index key for a file named on the command line, however it was spelled.
    ///
    /// A path naming an indexed key directly wins over canonical resolution.
    pub fn key_for(&self, path: &Path) -> Option<String> {
        let direct = normalize(path).display().to_string();
        if self.index.contains(&direct) {
            return Some(direct);
        }
        let canonical = fs::canonicalize(path).ok()?;
        self.keys.get(&canonical).cloned()
    }
}

/// Drop `.` components, the way `Path.glob` spells its results: `./a.txt`
/// becomes `a.txt`, `corpus/./b.txt` becomes `corpus/b.txt`.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Regular files under `dir` whose relative path matches `pattern`, sorted by name.
pub fn discover(dir: &Path, pattern: &CorpusPattern) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("directory {} not found", dir.display());
    }
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !pattern.recursive() {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
        let p = entry.path();
        if !p.is_file() { continue; }
        let relative = p.strip_prefix(dir).unwrap_or(p);
        if pattern.matches(relative) {
            files.push(normalize(p));
        }
    }
    tracing::debug!(dir = %dir.display(), matched = files.len(), "scanned corpus directory");
    Ok(files)
}

/// Map requested files to index keys, failing on the first one that is
/// missing or outside the corpus.
fn requested_keys(cli: &Cli, corpus: &Corpus) -> Result<Vec<String>> {
    let mut keys = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        if !path.exists() {
            bail!("File {} not found", path.display());
        }
        match corpus.key_for(path) {
            Some(key) => keys.push(key),
            None => bail!(
                "file {} is not in the specified corpus ({})",
                path.display(),
                cli.directory.join(&cli.pattern).display()
            ),
        }
    }
    Ok(keys)
}

/// Index the corpus described by `cli` and write the report to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let pattern = CorpusPattern::new(&cli.pattern)?;
    let corpus = Corpus::load(&cli.directory, &pattern)?;

    let explicit = !cli.files.is_empty();
    let targets: Vec<String> = if explicit {
        requested_keys(cli, &corpus)?
    } else {
        corpus.index.documents().map(str::to_owned).collect()
    };

    if cli.unique {
        let mut reports = Vec::with_capacity(targets.len());
        for document in targets {
            let unique = corpus.index.unique_words(&document)?;
            reports.push(UniqueReport { document, unique });
        }
        return match cli.format {
            Format::Text => write_unique_text(out, &reports),
            Format::Json => write_json(out, &reports),
        };
    }

    let mut reports = Vec::with_capacity(targets.len());
    for document in targets {
        match corpus.index.important_words(&document, cli.num_words) {
            Ok(words) => reports.push(ImportantReport { document, words }),
            Err(tfidf_core::Error::EmptyDocument(_)) if !explicit => {
                tracing::warn!(document = %document, "skipping empty document");
            }
            Err(e) => return Err(e.into()),
        }
    }
    match cli.format {
        Format::Text => write_important_text(out, &reports),
        Format::Json => write_json(out, &reports),
    }
}

pub fn write_important_text<W: Write>(out: &mut W, reports: &[ImportantReport]) -> Result<()> {
    for (n, report) in reports.iter().enumerate() {
        if n != 0 {
            writeln!(out)?;
        }
        writeln!(out, "Most important words in {}:", report.document)?;
        for ws in &report.words {
            writeln!(out, "  {}: {}", ws.word, format_score(ws.score))?;
        }
    }
    Ok(())
}

/// Shortest round-trip rendering with a signed, two-digit-minimum exponent
/// (`0.0`, `0.115`, `1.234e-05`, `1e+16`).
pub fn format_score(score: f64) -> String {
    let repr = format!("{score:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

pub fn write_unique_text<W: Write>(out: &mut W, reports: &[UniqueReport]) -> Result<()> {
    for (n, report) in reports.iter().enumerate() {
        if n != 0 {
            writeln!(out)?;
        }
        writeln!(out, "Words unique to {}:", report.document)?;
        for word in &report.unique {
            writeln!(out, "  {word}")?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, reports: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}
