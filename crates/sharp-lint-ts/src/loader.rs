//! Loading solutions, projects and directories into a [`DocumentSet`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sharp_lint_core::{AnalyzerConfig, DocumentSet, SyntaxTree};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parser::{CSharpParser, ParseError};
use crate::solution::{compile_items, parse_solution};

/// Errors that prevent analysis from starting.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor path does not exist.
    #[error("{path} does not exist")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The descriptor is not something the loader understands.
    #[error("Unsupported input {path}: expected a .sln, .slnx, .csproj or .cs file, or a directory")]
    Unsupported {
        /// Requested path.
        path: PathBuf,
    },

    /// A solution lists no C# projects.
    #[error("Solution {path} contains no C# projects")]
    EmptySolution {
        /// Solution file.
        path: PathBuf,
    },

    /// A project listed in a solution is missing on disk.
    #[error("Project {path} listed in the solution does not exist")]
    MissingProject {
        /// Project file.
        path: PathBuf,
    },

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        source: ignore::Error,
    },

    /// A `.slnx` or `.csproj` is not well-formed XML.
    #[error("Malformed XML in {path}: {source}")]
    Xml {
        /// Solution or project file.
        path: PathBuf,
        /// Parser error with its position.
        source: roxmltree::Error,
    },

    /// A source file failed to parse.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Source file.
        path: PathBuf,
        /// Parse failure.
        source: ParseError,
    },
}

/// What a path given to the loader refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A `.sln` or `.slnx` file.
    Solution(PathBuf),
    /// A `.csproj` file.
    Project(PathBuf),
    /// A single `.cs` file.
    File(PathBuf),
    /// A directory searched for `*.cs`.
    Directory(PathBuf),
}

impl Descriptor {
    /// Classifies `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or has an unsupported
    /// extension.
    pub fn detect(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "sln" | "slnx" => Ok(Self::Solution(path.to_path_buf())),
            "csproj" => Ok(Self::Project(path.to_path_buf())),
            "cs" => Ok(Self::File(path.to_path_buf())),
            _ => Err(LoadError::Unsupported {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The descriptor path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Solution(p) | Self::Project(p) | Self::File(p) | Self::Directory(p) => p,
        }
    }

    /// Directory violations are reported relative to.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        match self {
            Self::Directory(p) => p.clone(),
            Self::Solution(p) | Self::Project(p) | Self::File(p) => p
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }
}

/// Turns a descriptor path into a [`DocumentSet`].
///
/// Source files are discovered with `.gitignore` support, parsed in
/// parallel, sorted by path and, unless disabled, bound into one
/// compilation.
#[derive(Debug, Clone)]
pub struct WorkspaceLoader {
    exclude: Vec<String>,
    respect_gitignore: bool,
    semantic: bool,
    fail_on_parse_error: bool,
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl WorkspaceLoader {
    /// Creates a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader from the `[analyzer]` configuration section.
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            exclude: config.exclude.clone(),
            respect_gitignore: config.respect_gitignore,
            semantic: config.semantic,
            fail_on_parse_error: config.fail_on_parse_error,
        }
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Sets whether `.gitignore` files are honoured.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets whether semantic models are built.
    #[must_use]
    pub fn semantic(mut self, semantic: bool) -> Self {
        self.semantic = semantic;
        self
    }

    /// Sets whether a syntax error aborts the load (default: true).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Loads the solution, project, file or directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is invalid, a file cannot be read,
    /// or a file fails to parse while `fail_on_parse_error` is set.
    pub fn load(&self, path: &Path) -> Result<DocumentSet, LoadError> {
        let descriptor = Descriptor::detect(path)?;
        info!("Loading {}", descriptor.path().display());

        let files = self.source_files(&descriptor)?;
        debug!("Found {} source files", files.len());

        let sources = files
            .into_par_iter()
            .map(|file| {
                std::fs::read_to_string(&file)
                    .map(|source| (file.clone(), source))
                    .map_err(|source| LoadError::Io { path: file, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.load_sources(descriptor.root(), sources)
    }

    /// Builds a document set from in-memory sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse while
    /// `fail_on_parse_error` is set.
    pub fn load_sources<I>(&self, root: impl Into<PathBuf>, sources: I) -> Result<DocumentSet, LoadError>
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let parser = CSharpParser::new();
        let sources: Vec<(PathBuf, String)> = sources.into_iter().collect();

        let parsed: Vec<Result<SyntaxTree, LoadError>> = sources
            .into_par_iter()
            .map(|(path, source)| {
                parser
                    .parse(path.clone(), source)
                    .map_err(|source| LoadError::Parse { path, source })
            })
            .collect();

        let mut trees = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(tree) => trees.push(tree),
                Err(LoadError::Parse { path, source }) if !self.fail_on_parse_error => {
                    warn!("Skipping {}: {}", path.display(), source);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(DocumentSet::new(root, trees, self.semantic))
    }

    fn source_files(&self, descriptor: &Descriptor) -> Result<Vec<PathBuf>, LoadError> {
        let files = match descriptor {
            Descriptor::File(path) => vec![path.clone()],
            Descriptor::Directory(dir) => self.discover(dir)?,
            Descriptor::Project(project) => self.project_files(project)?,
            Descriptor::Solution(solution) => {
                let content = read(solution)?;
                let base = descriptor.root();
                let projects = parse_solution(&content, &base).map_err(|source| LoadError::Xml {
                    path: solution.clone(),
                    source,
                })?;
                if projects.is_empty() {
                    return Err(LoadError::EmptySolution {
                        path: solution.clone(),
                    });
                }

                let mut files = BTreeSet::new();
                for project in projects {
                    if !project.path.is_file() {
                        return Err(LoadError::MissingProject { path: project.path });
                    }
                    debug!("Project {} at {}", project.name, project.path.display());
                    files.extend(self.project_files(&project.path)?);
                }
                files.into_iter().collect()
            }
        };
        Ok(files)
    }

    fn project_files(&self, project: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let dir = project.parent().unwrap_or_else(|| Path::new("."));
        let items = compile_items(&read(project)?, dir).map_err(|source| LoadError::Xml {
            path: project.to_path_buf(),
            source,
        })?;
        if items.is_empty() {
            return self.discover(dir);
        }

        let mut files: Vec<PathBuf> = items.into_iter().filter(|p| p.is_file()).collect();
        files.sort();
        Ok(files)
    }

    /// Finds every `*.cs` file under `root` that is not excluded.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut builder = ignore::WalkBuilder::new(root);
        builder.hidden(false).git_ignore(self.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("cs") {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.should_exclude(relative) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        let anchored = format!("/{path_str}");

        self.exclude.iter().any(|pattern| {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) || glob_pattern.matches(&anchored) {
                    return true;
                }
            }

            // Also check as a path fragment for patterns like "**/bin/**"
            let fragment = pattern.replace("**/", "").replace("/**", "");
            !fragment.is_empty()
                && !fragment.contains('*')
                && (anchored.split('/').any(|component| component == fragment)
                    || anchored.contains(&format!("/{fragment}/")))
        })
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let sln = dir.path().join("Shop.sln");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&sln, "").unwrap();
        std::fs::write(&txt, "").unwrap();

        assert_eq!(
            Descriptor::detect(dir.path()).unwrap(),
            Descriptor::Directory(dir.path().to_path_buf())
        );
        assert_eq!(Descriptor::detect(&sln).unwrap(), Descriptor::Solution(sln.clone()));
        assert_eq!(Descriptor::detect(&sln).unwrap().root(), dir.path());
        assert!(matches!(
            Descriptor::detect(&txt),
            Err(LoadError::Unsupported { .. })
        ));
        assert!(matches!(
            Descriptor::detect(&dir.path().join("missing.sln")),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_exclude_patterns() {
        let loader = WorkspaceLoader::new().exclude("**/Generated/**");

        assert!(loader.should_exclude(Path::new("src/Shop/bin/Debug/Temp.cs")));
        assert!(loader.should_exclude(Path::new("obj/Shop.AssemblyInfo.cs")));
        assert!(loader.should_exclude(Path::new("src/Generated/Client.cs")));
        assert!(!loader.should_exclude(Path::new("src/Shop/Binder.cs")));
        assert!(!loader.should_exclude(Path::new("src/Shop/Order.cs")));
    }

    #[test]
    fn parse_errors_can_be_skipped() {
        let sources = vec![
            (PathBuf::from("/repo/Good.cs"), "class Good { }".to_string()),
            (PathBuf::from("/repo/Bad.cs"), "class Bad {".to_string()),
        ];

        let strict = WorkspaceLoader::new().load_sources("/repo", sources.clone());
        assert!(matches!(strict, Err(LoadError::Parse { .. })));

        let lenient = WorkspaceLoader::new()
            .fail_on_parse_error(false)
            .load_sources("/repo", sources)
            .unwrap();
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient.documents()[0].relative_path(), Path::new("Good.cs"));
    }
}
