//! Solution and project file parsing.
//!
//! Only the parts needed to find source files are read: the project entries
//! of a `.sln`/`.slnx` and explicit `<Compile Include>` items of legacy
//! `.csproj` files. SDK-style projects compile every `*.cs` under their
//! directory, which the loader walks instead.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

/// A C# project listed in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionProject {
    /// Display name from the solution.
    pub name: String,
    /// Path of the `.csproj`, resolved against the solution directory.
    pub path: PathBuf,
}

/// Extracts the C# projects listed in a solution file.
///
/// Handles both the classic text format
/// (`Project("{GUID}") = "Name", "src\Name\Name.csproj", "{GUID}"`) and the
/// XML `.slnx` format (`<Project Path="src/Name/Name.csproj" />`).
/// Solution folders and non-C# projects are ignored.
///
/// # Errors
///
/// Returns an error if an XML solution is not well-formed.
pub fn parse_solution(content: &str, base: &Path) -> Result<Vec<SolutionProject>, roxmltree::Error> {
    let entries = if is_xml(content) {
        slnx_entries(content)?
    } else {
        content
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("Project("))
            .filter_map(classic_entry)
            .collect()
    };

    let mut projects: Vec<SolutionProject> = entries
        .into_iter()
        .filter(|(_, path)| path.to_ascii_lowercase().ends_with(".csproj"))
        .map(|(name, path)| SolutionProject {
            name,
            path: base.join(normalize(&path)),
        })
        .collect();

    projects.dedup_by(|a, b| a.path == b.path);
    Ok(projects)
}

fn is_xml(content: &str) -> bool {
    without_bom(content).trim_start().starts_with('<')
}

fn without_bom(content: &str) -> &str {
    content.trim_start_matches('\u{feff}')
}

fn slnx_entries(content: &str) -> Result<Vec<(String, String)>, roxmltree::Error> {
    let doc = Document::parse(without_bom(content))?;
    Ok(elements(&doc, "Project")
        .filter_map(|node| node.attribute("Path"))
        .map(|path| {
            let name = Path::new(&normalize(path))
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, path.to_owned())
        })
        .collect())
}

fn classic_entry(line: &str) -> Option<(String, String)> {
    let (_, rest) = line.split_once('=')?;
    let mut fields = rest.split(',').map(|f| f.trim().trim_matches('"').to_owned());
    let name = fields.next()?;
    let path = fields.next()?;
    Some((name, path))
}

/// Explicit `<Compile Include="...">` items of a legacy project file,
/// resolved against the project directory. Wildcard items are left to the
/// directory walk.
///
/// # Errors
///
/// Returns an error if the project file is not well-formed XML.
pub fn compile_items(content: &str, project_dir: &Path) -> Result<Vec<PathBuf>, roxmltree::Error> {
    let doc = Document::parse(without_bom(content))?;
    Ok(elements(&doc, "Compile")
        .filter_map(|node| node.attribute("Include"))
        .filter(|include| !include.contains('*') && include.ends_with(".cs"))
        .map(|include| project_dir.join(normalize(include)))
        .collect())
}

/// Every element with the given local name, at any depth.
fn elements<'a, 'input>(
    doc: &'a Document<'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants()
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}
