//! Prompt assembly for test generation.
//!
//! The instruction template is a versioned text constant, provider
//! agnostic; the builder only concatenates it with banner-delimited source
//! file contents so the backend can tell file boundaries apart and answer
//! with a path-qualified file name.

use std::path::Path;

use tracing::warn;

use crate::error::Result;

/// Version tag of the instruction template.
pub const PROMPT_VERSION: &str = "v1";

const GENERATE_TESTS_TASK: &str = r#"# TASK
You will be given a set of Go source files (one or more) belonging to the same package.
Your job is to write a comprehensive test file following these requirements:

1. Create test functions for all exported functions and methods in the source files
2. Name each test function as "Test[FunctionName]" following Go conventions
3. Import the "testing" package and any other necessary packages but NO EXTERNAL LIB UNLESS YOU SEE THEY ARE ALREADY BEING USED IN THE SOURCE FILES (meaning they are already installed)
4. Test both happy paths and edge cases for each function
5. Include tests for error conditions where applicable
6. Ensure proper assertion of expected outputs against actual results
7. Add clear, descriptive comments explaining the purpose of each test
8. Follow Go best practices for test organization and readability

The output should be a complete _test.go file that provides thorough test coverage.
"#;

const EXTEND_TESTS_CLAUSE: &str = r#"
For this specific package a set of existing _test.go files is included.
Please carefully analyze the source code of them and make sure to:
1. Determine which functions of the package are already being tested
2. Determine if more test cases should be added to the already existing test functions
3. If so, create new functions which are more comprehensive and correct
4. Once you asserted that these tests are correct, focus on the code from the package source files which is not yet being tested in the _test.go files
"#;

const OUTPUT_INSTRUCTIONS: &str = r#"
# IMPORTANT
OUTPUT ONLY THE _test.go SOURCE CODE, DO NOT ADD ANYTHING ELSE
THE OUTPUT SHOULD BE IN THE FOLLOWING JSON FORMAT:
```
{ "code": <source_code>, "fileName": "<package_name>_test.go" }
```
"#;

const EXTEND_OUTPUT_CLAUSE: &str = r#"
BE CAREFUL: if there is already a test file called <package_name>_test.go, then make sure to append your new produced code to that file.
So your output must be THAT FILE CONTENT + YOUR NEW GENERATED CONTENT.
"#;

/// Render the generation prompt for one package.
///
/// When `existing_tests` is supplied the extension-mode clauses are added
/// and the existing test sources are embedded under their own section, so
/// the backend returns the concatenation of old and new content rather
/// than a delta.
pub fn build<P, Q>(files: &[P], existing_tests: Option<&[Q]>) -> Result<String>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let extend = existing_tests.is_some_and(|t| !t.is_empty());

    let mut prompt = String::from(GENERATE_TESTS_TASK);
    if extend {
        prompt.push_str(EXTEND_TESTS_CLAUSE);
    }

    prompt.push_str("\n# GO SOURCE FILES\n");
    prompt.push_str(&format_sources(files)?);

    if let Some(tests) = existing_tests.filter(|t| !t.is_empty()) {
        prompt.push_str("\n# EXISTING TEST FILES\n");
        prompt.push_str(&format_sources(tests)?);
    }

    prompt.push_str(OUTPUT_INSTRUCTIONS);
    if extend {
        prompt.push_str(EXTEND_OUTPUT_CLAUSE);
    }

    Ok(prompt)
}

/// Concatenate file contents, each wrapped in a banner repeating its path.
///
/// A zero-length file is skipped with a warning instead of contributing an
/// empty banner block.
fn format_sources<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let mut formatted = String::new();

    for path in paths {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(crate::error::AppError::Io)?;
        if data.is_empty() {
            warn!("No data found for file {}", path.display());
            continue;
        }

        let content = String::from_utf8_lossy(&data);
        formatted.push_str(&format!(
            "*****\n{}\n*****\n\n{}\n\n*****",
            path.display(),
            content
        ));
    }

    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_build_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.go", "package a\n\nfunc A() {}\n");
        let b = write_file(&dir, "b.go", "package a\n\nfunc B() {}\n");

        let files = vec![a, b];
        let first = build(&files, None::<&[PathBuf]>).unwrap();
        let second = build(&files, None::<&[PathBuf]>).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_banner_wraps_each_file() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.go", "package a\n");

        let prompt = build(&[a.clone()], None::<&[PathBuf]>).unwrap();
        let banner = format!("*****\n{}\n*****\n\npackage a\n\n\n*****", a.display());
        assert!(prompt.contains(&banner));
    }

    #[test]
    fn test_empty_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let empty = write_file(&dir, "empty.go", "");
        let full = write_file(&dir, "full.go", "package a\n");

        let prompt = build(&[empty.clone(), full], None::<&[PathBuf]>).unwrap();
        assert!(!prompt.contains(&empty.display().to_string()));
        assert!(prompt.contains("package a"));
    }

    #[test]
    fn test_extension_mode_adds_clauses_and_sources() {
        let dir = TempDir::new().unwrap();
        let src = write_file(&dir, "a.go", "package a\n");
        let test = write_file(&dir, "a_test.go", "package a\n\nfunc TestA(t *testing.T) {}\n");

        let prompt = build(&[src], Some(&[test.clone()])).unwrap();
        assert!(prompt.contains("existing _test.go files is included"));
        assert!(prompt.contains("THAT FILE CONTENT + YOUR NEW GENERATED CONTENT"));
        assert!(prompt.contains("# EXISTING TEST FILES"));
        assert!(prompt.contains(&test.display().to_string()));
    }

    #[test]
    fn test_plain_mode_has_no_extension_clauses() {
        let dir = TempDir::new().unwrap();
        let src = write_file(&dir, "a.go", "package a\n");

        let prompt = build(&[src], None::<&[PathBuf]>).unwrap();
        assert!(!prompt.contains("existing _test.go files"));
        assert!(!prompt.contains("# EXISTING TEST FILES"));
        assert!(prompt.contains("# TASK"));
        assert!(prompt.contains("# GO SOURCE FILES"));
        assert!(prompt.contains("# IMPORTANT"));
    }

    #[test]
    fn test_missing_file_is_fatal_to_the_build() {
        let missing = vec![PathBuf::from("/nonexistent/never.go")];
        assert!(build(&missing, None::<&[PathBuf]>).is_err());
    }
}
