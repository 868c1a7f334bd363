//! PDF page rasterization via poppler's `pdftoppm`.
//!
//! Shelling out to poppler handles more PDF variants than any pure-Rust
//! renderer currently does. Pages are rendered to PNG through temp files
//! which are removed before returning.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessError;

/// Renders every page of a PDF to a PNG image at the given DPI, in page
/// order.
pub fn render_pdf_pages(pdf_bytes: &[u8], dpi: u32) -> Result<Vec<Vec<u8>>, ProcessError> {
    let temp_dir = std::env::temp_dir();
    let pdf_path = temp_dir.join(format!("skema_raster_{}.pdf", uuid::Uuid::new_v4()));
    let output_prefix = temp_dir.join(format!("skema_page_{}", uuid::Uuid::new_v4()));

    std::fs::write(&pdf_path, pdf_bytes)
        .map_err(|e| ProcessError::Rasterize(format!("Failed to write temp PDF: {}", e)))?;

    let output = Command::new("pdftoppm")
        .args([
            "-png",
            "-r",
            &dpi.to_string(),
            pdf_path.to_str().unwrap_or_default(),
            output_prefix.to_str().unwrap_or_default(),
        ])
        .output();

    let _ = std::fs::remove_file(&pdf_path);

    let output = output.map_err(|e| {
        ProcessError::Rasterize(format!(
            "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
            e
        ))
    })?;

    if !output.status.success() {
        return Err(ProcessError::Rasterize(format!(
            "pdftoppm failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let page_files = collect_page_files(&output_prefix)?;
    if page_files.is_empty() {
        return Err(ProcessError::Rasterize(
            "pdftoppm produced no page images".to_string(),
        ));
    }

    let mut pages = Vec::with_capacity(page_files.len());
    for (_, path) in &page_files {
        let data = std::fs::read(path).map_err(|e| {
            ProcessError::Rasterize(format!("Failed to read rendered image: {}", e))
        })?;
        pages.push(data);
    }

    for (_, path) in &page_files {
        let _ = std::fs::remove_file(path);
    }

    Ok(pages)
}

/// Renders a single page (1-based) to a PNG image. Used for preview
/// generation.
pub fn render_pdf_page(pdf_bytes: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>, ProcessError> {
    let temp_dir = std::env::temp_dir();
    let pdf_path = temp_dir.join(format!("skema_raster_{}.pdf", uuid::Uuid::new_v4()));
    let output_prefix = temp_dir.join(format!("skema_preview_{}", uuid::Uuid::new_v4()));

    std::fs::write(&pdf_path, pdf_bytes)
        .map_err(|e| ProcessError::Rasterize(format!("Failed to write temp PDF: {}", e)))?;

    let output = Command::new("pdftoppm")
        .args([
            "-png",
            "-r",
            &dpi.to_string(),
            "-f",
            &page.to_string(),
            "-l",
            &page.to_string(),
            pdf_path.to_str().unwrap_or_default(),
            output_prefix.to_str().unwrap_or_default(),
        ])
        .output();

    let _ = std::fs::remove_file(&pdf_path);

    let output = output.map_err(|e| {
        ProcessError::Rasterize(format!(
            "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
            e
        ))
    })?;

    if !output.status.success() {
        return Err(ProcessError::Rasterize(format!(
            "pdftoppm failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    // pdftoppm pads the page suffix depending on total page count.
    let candidates = [
        format!("{}-{}.png", output_prefix.display(), page),
        format!("{}-{:02}.png", output_prefix.display(), page),
        format!("{}-{:03}.png", output_prefix.display(), page),
    ];
    let image_path = candidates
        .iter()
        .find(|p| Path::new(p).exists())
        .ok_or_else(|| {
            ProcessError::Rasterize("Failed to find rendered page image".to_string())
        })?;

    let data = std::fs::read(image_path)
        .map_err(|e| ProcessError::Rasterize(format!("Failed to read rendered image: {}", e)))?;

    let _ = std::fs::remove_file(image_path);

    Ok(data)
}

/// Finds the `<prefix>-N.png` files pdftoppm produced, sorted by page number.
fn collect_page_files(output_prefix: &Path) -> Result<Vec<(u32, PathBuf)>, ProcessError> {
    let dir = output_prefix.parent().unwrap_or_else(|| Path::new("."));
    let stem = output_prefix
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let entries = std::fs::read_dir(dir)
        .map_err(|e| ProcessError::Rasterize(format!("Failed to list temp dir: {}", e)))?;

    let mut pages = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(rest) = name.strip_prefix(stem) else {
            continue;
        };
        let Some(number) = rest
            .strip_prefix('-')
            .and_then(|r| r.strip_suffix(".png"))
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };
        pages.push((number, entry.path()));
    }

    pages.sort_by_key(|(number, _)| *number);
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_page_files_sorts_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("skema_page_test");
        for n in ["10", "2", "1"] {
            std::fs::write(format!("{}-{}.png", prefix.display(), n), b"png").unwrap();
        }
        // Unrelated files are ignored.
        std::fs::write(dir.path().join("other.png"), b"png").unwrap();

        let pages = collect_page_files(&prefix).unwrap();
        let numbers: Vec<u32> = pages.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn test_collect_page_files_empty_when_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("skema_page_none");
        let pages = collect_page_files(&prefix).unwrap();
        assert!(pages.is_empty());
    }
}
