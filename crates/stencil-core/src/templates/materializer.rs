//! Copy a template tree into the destination, substituting variables,
//! renaming dot-files, and resolving conflicts with existing files

use crate::error::ScaffoldError;
use crate::session::Prompter;
use crate::templates::render;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Resolution for a single conflicting file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Overwrite,
    Skip,
    /// Show the differences, then ask again
    Diff,
}

/// A materialization target that already exists with different content
#[derive(Debug)]
pub struct FileConflict {
    pub rel_path: String,
    pub existing: Vec<u8>,
    pub rendered: Vec<u8>,
}

impl FileConflict {
    /// Line-by-line comparison of existing vs rendered content.
    /// Changed lines show as `-` (on disk) and `+` (template).
    pub fn diff_text(&self) -> String {
        let existing = String::from_utf8_lossy(&self.existing);
        let rendered = String::from_utf8_lossy(&self.rendered);
        let mut out = String::new();
        let mut old_lines = existing.lines();
        let mut new_lines = rendered.lines();

        loop {
            match (old_lines.next(), new_lines.next()) {
                (None, None) => break,
                (old, new) if old == new => {
                    if let Some(line) = old {
                        out.push_str("  ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                (old, new) => {
                    if let Some(line) = old {
                        out.push_str("- ");
                        out.push_str(line);
                        out.push('\n');
                    }
                    if let Some(line) = new {
                        out.push_str("+ ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
        }

        out
    }
}

/// What happened to a single template file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written fresh, no pre-existing file
    Written,
    /// Existed with different content; user chose to replace it
    Overwritten,
    /// Existed with identical content; nothing to do
    Identical,
    /// Existed with different content; left untouched
    SkippedConflict,
}

/// Per-file result of a materialization run
#[derive(Debug)]
pub struct MaterializedFile {
    pub dest: PathBuf,
    pub outcome: FileOutcome,
}

/// Copy every file under `template_root` into `dest_root`.
///
/// Files are processed in lexicographic order of their relative path,
/// so runs are reproducible. Content goes through `{{key}}`
/// substitution (binary files are copied verbatim), leading-`_`
/// basenames become leading-`.`, and targets that already exist with
/// different content are resolved through the prompter. Nothing
/// outside `dest_root` is touched.
pub async fn materialize<P: Prompter + ?Sized>(
    template_root: &Path,
    dest_root: &Path,
    vars: &BTreeMap<String, String>,
    prompter: &mut P,
) -> Result<Vec<MaterializedFile>> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ScaffoldError::Materialization { path, source }
    };

    fs::create_dir_all(dest_root)
        .await
        .map_err(io_err(dest_root))?;

    let mut results = Vec::new();

    for rel_path in enumerate_files(template_root)? {
        let source_path = template_root.join(&rel_path);
        let dest_rel = rename_dotfile(&rel_path);
        let dest_path = dest_root.join(&dest_rel);

        let raw = fs::read(&source_path).await.map_err(io_err(&source_path))?;
        let rendered = match String::from_utf8(raw) {
            Ok(text) => render(&text, vars).into_bytes(),
            // Binary file: no substitution
            Err(e) => e.into_bytes(),
        };

        if dest_path.exists() {
            let existing = fs::read(&dest_path).await.map_err(io_err(&dest_path))?;
            if existing == rendered {
                results.push(MaterializedFile {
                    dest: dest_path,
                    outcome: FileOutcome::Identical,
                });
                continue;
            }

            let conflict = FileConflict {
                rel_path: dest_rel.to_string_lossy().into_owned(),
                existing,
                rendered,
            };
            let overwrite = loop {
                match prompter.resolve_conflict(&conflict)? {
                    ConflictChoice::Overwrite => break true,
                    ConflictChoice::Skip => break false,
                    ConflictChoice::Diff => {
                        prompter.note(&conflict.rel_path, &conflict.diff_text())?;
                    }
                }
            };

            if !overwrite {
                results.push(MaterializedFile {
                    dest: dest_path,
                    outcome: FileOutcome::SkippedConflict,
                });
                continue;
            }

            fs::write(&dest_path, &conflict.rendered)
                .await
                .map_err(io_err(&dest_path))?;
            results.push(MaterializedFile {
                dest: dest_path,
                outcome: FileOutcome::Overwritten,
            });
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err(parent))?;
        }
        fs::write(&dest_path, &rendered)
            .await
            .map_err(io_err(&dest_path))?;
        results.push(MaterializedFile {
            dest: dest_path,
            outcome: FileOutcome::Written,
        });
    }

    Ok(results)
}

/// Every file under `root`, as relative paths in lexicographic order
fn enumerate_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScaffoldError::Materialization {
                path,
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error")),
            }
        })?;
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }
    // Compare the rendered path string, not components: "a.txt" sorts
    // before "a/z.txt"
    files.sort_by_key(|p| p.to_string_lossy().into_owned());
    Ok(files)
}

/// Rewrite a leading `_` in the basename to a leading `.`, so
/// dot-files can be authored without tooling stripping them
/// (`_gitignore` becomes `.gitignore`).
fn rename_dotfile(rel_path: &Path) -> PathBuf {
    let Some(name) = rel_path.file_name().and_then(|n| n.to_str()) else {
        return rel_path.to_path_buf();
    };
    match name.strip_prefix('_') {
        Some(rest) => rel_path.with_file_name(format!(".{}", rest)),
        None => rel_path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedPrompter;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn prompter() -> ScriptedPrompter {
        ScriptedPrompter::new(vec![], vec![])
    }

    fn write_template(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_rename_dotfile() {
        assert_eq!(rename_dotfile(Path::new("_gitignore")), Path::new(".gitignore"));
        assert_eq!(
            rename_dotfile(Path::new("sub/_env")),
            Path::new("sub/.env")
        );
        assert_eq!(rename_dotfile(Path::new("server.js")), Path::new("server.js"));
        // Only the basename is rewritten
        assert_eq!(
            rename_dotfile(Path::new("_private/readme")),
            Path::new("_private/readme")
        );
    }

    #[tokio::test]
    async fn test_materialize_renders_and_renames() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "_gitignore", b"node_modules\n");
        write_template(template.path(), "README.md", b"# {{name}}\n");
        write_template(template.path(), "src/app.js", b"// {{nameSlug}}\n");

        let results = materialize(
            template.path(),
            dest.path(),
            &vars(&[("name", "My App"), ("nameSlug", "my-app")]),
            &mut prompter(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.outcome == FileOutcome::Written));
        assert_eq!(
            std::fs::read_to_string(dest.path().join(".gitignore")).unwrap(),
            "node_modules\n"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("README.md")).unwrap(),
            "# My App\n"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("src/app.js")).unwrap(),
            "// my-app\n"
        );
    }

    #[tokio::test]
    async fn test_results_are_in_lexicographic_order() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "b.txt", b"b");
        write_template(template.path(), "a/z.txt", b"z");
        write_template(template.path(), "a.txt", b"a");

        let results = materialize(template.path(), dest.path(), &vars(&[]), &mut prompter())
            .await
            .unwrap();

        let names: Vec<_> = results
            .iter()
            .map(|r| r.dest.strip_prefix(dest.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("a/z.txt"),
                PathBuf::from("b.txt")
            ]
        );
    }

    #[tokio::test]
    async fn test_identical_rerun_is_a_noop() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "README.md", b"# {{name}}\n");

        let vars = vars(&[("name", "demo")]);
        materialize(template.path(), dest.path(), &vars, &mut prompter())
            .await
            .unwrap();
        let second = materialize(template.path(), dest.path(), &vars, &mut prompter())
            .await
            .unwrap();

        assert!(second.iter().all(|r| r.outcome == FileOutcome::Identical));
    }

    #[tokio::test]
    async fn test_skip_leaves_existing_content() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "file.txt", b"B");
        std::fs::write(dest.path().join("file.txt"), b"A").unwrap();

        let mut p = prompter();
        p.conflict_choice = ConflictChoice::Skip;
        let results = materialize(template.path(), dest.path(), &vars(&[]), &mut p)
            .await
            .unwrap();

        assert_eq!(results[0].outcome, FileOutcome::SkippedConflict);
        assert_eq!(std::fs::read(dest.path().join("file.txt")).unwrap(), b"A");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_existing_content() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "file.txt", b"B");
        std::fs::write(dest.path().join("file.txt"), b"A").unwrap();

        let mut p = prompter();
        p.conflict_choice = ConflictChoice::Overwrite;
        let results = materialize(template.path(), dest.path(), &vars(&[]), &mut p)
            .await
            .unwrap();

        assert_eq!(results[0].outcome, FileOutcome::Overwritten);
        assert_eq!(std::fs::read(dest.path().join("file.txt")).unwrap(), b"B");
    }

    #[tokio::test]
    async fn test_diff_choice_shows_differences_then_reasks() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "file.txt", b"B\n");
        std::fs::write(dest.path().join("file.txt"), b"A\n").unwrap();

        let mut p = prompter();
        p.conflict_choices = [ConflictChoice::Diff, ConflictChoice::Overwrite]
            .into_iter()
            .collect();
        let results = materialize(template.path(), dest.path(), &vars(&[]), &mut p)
            .await
            .unwrap();

        // The diff was shown exactly once, then the overwrite honored
        assert_eq!(p.notes.len(), 1);
        assert!(p.notes[0].contains("- A"));
        assert!(p.notes[0].contains("+ B"));
        assert_eq!(results[0].outcome, FileOutcome::Overwritten);
        assert_eq!(std::fs::read(dest.path().join("file.txt")).unwrap(), b"B\n");
    }

    #[tokio::test]
    async fn test_diff_then_skip_leaves_existing_content() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_template(template.path(), "file.txt", b"B\n");
        std::fs::write(dest.path().join("file.txt"), b"A\n").unwrap();

        let mut p = prompter();
        p.conflict_choices = [ConflictChoice::Diff, ConflictChoice::Skip]
            .into_iter()
            .collect();
        let results = materialize(template.path(), dest.path(), &vars(&[]), &mut p)
            .await
            .unwrap();

        assert_eq!(p.notes.len(), 1);
        assert_eq!(results[0].outcome, FileOutcome::SkippedConflict);
        assert_eq!(std::fs::read(dest.path().join("file.txt")).unwrap(), b"A\n");
    }

    #[tokio::test]
    async fn test_binary_files_copied_verbatim() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = vec![0xff, 0xfe, 0x7b, 0x7b, 0x00];
        write_template(template.path(), "logo.bin", &bytes);

        materialize(template.path(), dest.path(), &vars(&[]), &mut prompter())
            .await
            .unwrap();

        assert_eq!(std::fs::read(dest.path().join("logo.bin")).unwrap(), bytes);
    }

    #[test]
    fn test_diff_text_marks_changed_lines() {
        let conflict = FileConflict {
            rel_path: "file.txt".to_string(),
            existing: b"same\nold\n".to_vec(),
            rendered: b"same\nnew\n".to_vec(),
        };
        let diff = conflict.diff_text();
        assert!(diff.contains("  same"));
        assert!(diff.contains("- old"));
        assert!(diff.contains("+ new"));
    }
}
