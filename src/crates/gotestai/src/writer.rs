//! Persistence of generated test files.

use std::path::PathBuf;

use llm::GeneratedTestFile;
use tracing::info;

/// Write the generated code to the path the backend reported, overwriting
/// any existing file. Filesystem errors are fatal to the calling task only.
pub async fn write(result: &GeneratedTestFile) -> std::io::Result<PathBuf> {
    let path = PathBuf::from(&result.file_name);
    tokio::fs::write(&path, result.code.as_bytes()).await?;
    info!("Created {}", path.display());
    Ok(path)
}
