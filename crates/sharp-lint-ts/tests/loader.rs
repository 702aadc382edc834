//! Loading solutions, projects and directories from disk.

use std::fs;
use std::path::{Path, PathBuf};

use sharp_lint_ts::{LoadError, WorkspaceLoader};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const SLN: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop", "src\Shop\Shop.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop.Tests", "tests\Shop.Tests\Shop.Tests.csproj", "{22222222-2222-2222-2222-222222222222}"
EndProject
"#;

fn solution() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Shop.sln", SLN);
    write(root, "src/Shop/Shop.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");
    write(root, "src/Shop/Order.cs", "namespace Shop;\npublic class Order { }\n");
    write(root, "src/Shop/Services/OrderService.cs", "namespace Shop.Services;\npublic class OrderService { }\n");
    write(root, "src/Shop/obj/Debug/Shop.AssemblyInfo.cs", "class Generated { }\n");
    write(root, "src/Shop/bin/Debug/Leftover.cs", "class Leftover { }\n");
    write(root, "tests/Shop.Tests/Shop.Tests.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");
    write(root, "tests/Shop.Tests/OrderTests.cs", "public class OrderTests { }\n");
    write(root, "tools/Script.cs", "class Script { }\n");
    dir
}

fn relative_paths(set: &sharp_lint_core::DocumentSet) -> Vec<String> {
    set.iter()
        .map(|d| d.relative_path().to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn loads_solution_projects_only() {
    let dir = solution();
    let set = WorkspaceLoader::new().load(&dir.path().join("Shop.sln")).unwrap();

    assert_eq!(
        relative_paths(&set),
        vec![
            "src/Shop/Order.cs",
            "src/Shop/Services/OrderService.cs",
            "tests/Shop.Tests/OrderTests.cs",
        ]
    );
    assert!(set.compilation().is_some());
}

#[test]
fn loads_single_project() {
    let dir = solution();
    let set = WorkspaceLoader::new()
        .load(&dir.path().join("src/Shop/Shop.csproj"))
        .unwrap();
    assert_eq!(relative_paths(&set), vec!["Order.cs", "Services/OrderService.cs"]);
}

#[test]
fn loads_directory_and_single_file() {
    let dir = solution();
    let set = WorkspaceLoader::new().load(dir.path()).unwrap();
    assert_eq!(set.len(), 4);

    let set = WorkspaceLoader::new()
        .load(&dir.path().join("tools/Script.cs"))
        .unwrap();
    assert_eq!(relative_paths(&set), vec!["Script.cs"]);
}

#[test]
fn missing_project_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Shop.sln", SLN);

    let err = WorkspaceLoader::new()
        .load(&dir.path().join("Shop.sln"))
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingProject { .. }));
}

#[test]
fn solution_without_projects_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Empty.sln", "Microsoft Visual Studio Solution File\n");

    let err = WorkspaceLoader::new()
        .load(&dir.path().join("Empty.sln"))
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptySolution { .. }));
}

#[test]
fn syntax_error_aborts_load_by_default() {
    let dir = solution();
    write(dir.path(), "src/Shop/Broken.cs", "public class Broken {\n");

    let err = WorkspaceLoader::new()
        .load(&dir.path().join("Shop.sln"))
        .unwrap_err();
    match err {
        LoadError::Parse { path, .. } => assert!(path.ends_with("Broken.cs")),
        other => panic!("unexpected error: {other}"),
    }

    let set = WorkspaceLoader::new()
        .fail_on_parse_error(false)
        .load(&dir.path().join("Shop.sln"))
        .unwrap();
    assert_eq!(set.len(), 3);
}

#[test]
fn missing_path_is_not_found() {
    let err = WorkspaceLoader::new()
        .load(&PathBuf::from("/definitely/not/here.sln"))
        .unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}

#[test]
fn loads_single_line_slnx() {
    let dir = solution();
    write(
        dir.path(),
        "Shop.slnx",
        "<Solution><Folder Name=\"/src/\"><Project Path='src/Shop/Shop.csproj' /></Folder></Solution>",
    );

    let set = WorkspaceLoader::new().load(&dir.path().join("Shop.slnx")).unwrap();
    assert_eq!(
        relative_paths(&set),
        vec!["src/Shop/Order.cs", "src/Shop/Services/OrderService.cs"]
    );
}

#[test]
fn legacy_project_compiles_listed_items_only() {
    let dir = solution();
    write(
        dir.path(),
        "src/Shop/Shop.csproj",
        "<Project ToolsVersion=\"15.0\"><ItemGroup><Compile Include=\"Order.cs\" /><Compile\n  Include='Services\\OrderService.cs' /></ItemGroup></Project>",
    );
    write(dir.path(), "src/Shop/Unlisted.cs", "class Unlisted { }\n");

    let set = WorkspaceLoader::new()
        .load(&dir.path().join("src/Shop/Shop.csproj"))
        .unwrap();
    assert_eq!(relative_paths(&set), vec!["Order.cs", "Services/OrderService.cs"]);
}

#[test]
fn malformed_project_xml_is_a_load_error() {
    let dir = solution();
    write(dir.path(), "src/Shop/Shop.csproj", "<Project><ItemGroup>");

    let err = WorkspaceLoader::new()
        .load(&dir.path().join("Shop.sln"))
        .unwrap_err();
    match err {
        LoadError::Xml { path, .. } => assert!(path.ends_with("Shop.csproj")),
        other => panic!("unexpected error: {other}"),
    }
}
