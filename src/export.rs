//! Saving and printing a captured sheet

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::capture::CaptureArtifact;
use crate::config::SaveLocation;

/// Prefix of every exported file name
pub const EXPORT_PREFIX: &str = "证据材料";

/// `证据材料-YYYY-MM-DD.png`
pub fn download_file_name(date: NaiveDate) -> String {
    format!("{}-{}.png", EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

/// Today's file name; the date is taken in UTC
pub fn todays_file_name() -> String {
    download_file_name(chrono::Utc::now().date_naive())
}

/// Save-location directory joined with today's file name
pub fn default_export_path(location: SaveLocation) -> Option<PathBuf> {
    let mut path = location.dir()?;
    path.push(todays_file_name());
    Some(path)
}

/// Write the artifact's PNG bytes to `path`
pub fn save_png(artifact: &CaptureArtifact, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, artifact.png_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!(
        "Saved {}x{} sheet to {}",
        artifact.width(),
        artifact.height(),
        path.display()
    );
    Ok(())
}

/// Stand-alone page holding only the artifact, printing itself after `delay_ms`
pub fn print_html(artifact: &CaptureArtifact, delay_ms: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>打印预览</title>
    <style>
      @page {{ size: auto; margin: 0mm; }}
      body {{ margin: 0; padding: 0; }}
      img {{ width: 100%; height: auto; }}
    </style>
  </head>
  <body>
    <img src="{src}" />
    <script>window.addEventListener('load', function () {{ setTimeout(function () {{ window.print(); }}, {delay_ms}); }});</script>
  </body>
</html>
"#,
        src = artifact.data_url(),
        delay_ms = delay_ms,
    )
}

/// Write the print page to a kept temp file and open it with `opener`
pub fn print_page(artifact: &CaptureArtifact, delay_ms: u64, opener: &str) -> Result<PathBuf> {
    let html = print_html(artifact, delay_ms);

    let mut file = tempfile::Builder::new()
        .prefix("evidence-print-")
        .suffix(".html")
        .tempfile()
        .context("Failed to create print page")?;
    std::io::Write::write_all(&mut file, html.as_bytes()).context("Failed to write print page")?;
    let (_, path) = file.keep().context("Failed to keep print page")?;

    log::info!("Opening print page {} with {}", path.display(), opener);
    std::process::Command::new(opener)
        .arg(&path)
        .spawn()
        .with_context(|| format!("Failed to run {}", opener))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    fn artifact() -> CaptureArtifact {
        CaptureArtifact::encode(RgbaImage::from_pixel(3, 2, image::Rgba([255; 4]))).unwrap()
    }

    #[test]
    fn test_download_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(download_file_name(date), "证据材料-2024-03-09.png");
    }

    #[test]
    fn test_todays_file_name_shape() {
        let name = todays_file_name();
        assert!(name.starts_with("证据材料-"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.chars().count(), "证据材料-".chars().count() + 10 + 4);
    }

    #[test]
    fn test_save_png_writes_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("sheet.png");
        save_png(&artifact(), &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_print_html_embeds_only_the_artifact() {
        let html = print_html(&artifact(), 500);
        assert!(html.contains("@page { size: auto; margin: 0mm; }"));
        assert!(html.contains("<img src=\"data:image/png;base64,"));
        assert!(html.contains("}, 500);"));
        assert_eq!(html.matches("<img").count(), 1);
    }
}
