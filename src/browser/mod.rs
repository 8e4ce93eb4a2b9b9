use anyhow::{Context, Result};
use std::path::Path;

/// Open a local file in the user's default browser
///
/// # Arguments
/// * `path` - The file to open (e.g., a generated report)
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_path(path: &Path) -> Result<()> {
    let target = path.to_string_lossy();
    webbrowser::open(&target)
        .with_context(|| format!("Failed to open browser for {}", path.display()))?;
    Ok(())
}
