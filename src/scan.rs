//! Input discovery and output folder policy.
//!
//! A run takes either one folder or a list of files.
//!
//! ## Folder mode
//!
//! The folder is walked recursively. Every file whose extension is in
//! `output.extensions` (case-insensitive) is picked up, in sorted order, and
//! its folder relative to the root is kept so the films land in the same
//! layout:
//!
//! ```text
//! orders/                      orders (PRINT MODE)/
//! ├── 3_iphone15pro.png   →    ├── 3_iPhone15Pro.png
//! └── monday/                  └── monday/
//!     └── 7b ip13 mini.jpg →       └── 7b_iPhone13mini.png
//! ```
//!
//! The output folder is `<parent>/<folder><suffix>`, or
//! `<custom>/<folder><suffix>` when an output location is given.
//!
//! ## File-list mode
//!
//! Files are taken as given, without extension filtering, and all films go
//! to `<dir of first file>/<files_folder>` or `<custom>/<files_folder>`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::OutputConfig;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No inputs given")]
    NoInputs,
    #[error("Folders can only be processed one at a time: {0}")]
    MixedInputs(PathBuf),
    #[error("Cannot determine folder name of {0}")]
    Unnamed(PathBuf),
}

/// How the inputs were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMode {
    Folder { root: PathBuf },
    Files,
}

/// One artwork file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// Bare file name, the text the resolver works on.
    pub filename: String,
    /// Folder relative to the input root; empty in file-list mode.
    pub relative_dir: PathBuf,
}

impl InputFile {
    fn new(path: PathBuf, relative_dir: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            filename,
            relative_dir,
        }
    }

    /// Folder this file's film is written to.
    pub fn output_dir(&self, batch_output: &Path) -> PathBuf {
        batch_output.join(&self.relative_dir)
    }
}

/// Everything a run needs to know before the first file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub mode: BatchMode,
    pub inputs: Vec<InputFile>,
    pub output_dir: PathBuf,
}

/// Work out the batch from the command-line inputs.
///
/// A single folder selects folder mode; anything else is a file list.
pub fn plan(
    inputs: &[PathBuf],
    custom_output: Option<&Path>,
    config: &OutputConfig,
) -> Result<Batch, ScanError> {
    let first = inputs.first().ok_or(ScanError::NoInputs)?;

    if inputs.len() == 1 && first.is_dir() {
        let output_dir = folder_output_dir(first, custom_output, &config.folder_suffix)?;
        let files = scan_folder(first, &config.extensions, Some(&output_dir))?;
        return Ok(Batch {
            mode: BatchMode::Folder {
                root: first.clone(),
            },
            inputs: files,
            output_dir,
        });
    }

    if let Some(dir) = inputs.iter().find(|p| p.is_dir()) {
        return Err(ScanError::MixedInputs(dir.clone()));
    }
    Ok(Batch {
        mode: BatchMode::Files,
        inputs: inputs
            .iter()
            .map(|p| InputFile::new(p.clone(), PathBuf::new()))
            .collect(),
        output_dir: files_output_dir(first, custom_output, &config.files_folder),
    })
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(&ext)))
}

/// Recursively collect artwork under `root`, sorted by path.
///
/// `skip` excludes a folder (the batch output) when it lives inside `root`.
pub fn scan_folder(
    root: &Path,
    extensions: &[String],
    skip: Option<&Path>,
) -> Result<Vec<InputFile>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| skip.is_none_or(|s| e.path() != s));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }
        let relative_dir = entry
            .path()
            .parent()
            .and_then(|dir| dir.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        files.push(InputFile::new(entry.path().to_path_buf(), relative_dir));
    }
    Ok(files)
}

fn folder_name(root: &Path) -> Result<String, ScanError> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().to_string());
    }
    // `.` or `..`: resolve to get a real name
    fs::canonicalize(root)?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ScanError::Unnamed(root.to_path_buf()))
}

/// `<parent>/<name><suffix>` or `<custom>/<name><suffix>`.
pub fn folder_output_dir(
    root: &Path,
    custom_output: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf, ScanError> {
    let name = format!("{}{}", folder_name(root)?, suffix);
    let base = match custom_output {
        Some(custom) => custom.to_path_buf(),
        None => match root.parent() {
            Some(parent) => parent.to_path_buf(),
            None => return Err(ScanError::Unnamed(root.to_path_buf())),
        },
    };
    Ok(base.join(name))
}

/// `<dir of first>/<folder>` or `<custom>/<folder>`.
pub fn files_output_dir(first: &Path, custom_output: Option<&Path>, folder: &str) -> PathBuf {
    let base = match custom_output {
        Some(custom) => custom.to_path_buf(),
        None => first.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    base.join(folder)
}
