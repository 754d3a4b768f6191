use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories holding build output, never scanned
const SKIPPED_DIRS: &[&str] = &["bin", "obj"];

/// File scanner for solution trees.
///
/// The scan root holds one directory per **application**, and every application holds one
/// directory per **project**. All `.cs` files below a project directory belong to that
/// project. Hidden directories and the `bin` and `obj` build directories are skipped.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./services"));
/// let result = scanner.scan().unwrap();
/// for app in &result.applications {
///     println!("{}: {} projects", app.name, app.projects.len());
/// }
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Applications, projects and files are ordered by name.
pub struct ScanResult {
    pub applications: Vec<ApplicationSources>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

/// An application directory and its projects
#[derive(Debug, Clone)]
pub struct ApplicationSources {
    pub name: String,
    pub path: PathBuf,
    pub projects: Vec<ProjectFiles>,
}

/// A project directory and the C# files below it
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    pub fn file_count(&self) -> usize {
        self.applications
            .iter()
            .flat_map(|a| a.projects.iter())
            .map(|p| p.files.len())
            .sum()
    }
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the root for applications, their projects and their `.cs` files.
    ///
    /// Inaccessible directories and files are logged and added to the result as warnings,
    /// but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an accessible directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("Scan root is not a directory: {}", self.root_path.display());
        }

        let mut warnings = Vec::new();
        let mut applications = Vec::new();

        for app_dir in subdirectories(&self.root_path, &mut warnings) {
            let mut projects = Vec::new();
            for project_dir in subdirectories(&app_dir, &mut warnings) {
                let files = cs_files(&project_dir, &mut warnings);
                debug!("Project {}: {} C# files", project_dir.display(), files.len());
                projects.push(ProjectFiles {
                    name: dir_name(&project_dir),
                    path: project_dir,
                    files,
                });
            }
            applications.push(ApplicationSources {
                name: dir_name(&app_dir),
                path: app_dir,
                projects,
            });
        }

        Ok(ScanResult {
            applications,
            warnings,
        })
    }
}

/// Immediate, non-skipped subdirectories, sorted by name
fn subdirectories(dir: &Path, warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => record(warnings, e),
        }
    }
    dirs
}

fn cs_files(dir: &Path, warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e))
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && path.extension().and_then(|s| s.to_str()) == Some("cs") {
                    files.push(entry.into_path());
                }
            }
            Err(e) => record(warnings, e),
        }
    }
    files
}

/// Hidden entries and build output directories
fn is_skipped(entry: &DirEntry) -> bool {
    let file_name = entry.file_name().to_string_lossy();
    let is_hidden = file_name.starts_with('.');
    let is_build_output = entry.file_type().is_dir() && SKIPPED_DIRS.iter().any(|d| file_name == *d);
    is_hidden || is_build_output
}

fn record(warnings: &mut Vec<String>, error: walkdir::Error) {
    let warning = format!("Failed to access path: {}", error);
    warn!("{}", warning);
    warnings.push(warning);
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
