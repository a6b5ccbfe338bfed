use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use super::commands::ComposeArgs;
use crate::capture::RasterOptions;
use crate::config::SheetConfig;
use crate::domain::{LayoutState, UploadCandidate};
use crate::export;
use crate::guide;
use crate::render::{SheetRenderer, TextPainter};
use crate::session::{NoticeLevel, Session};

pub async fn handle_compose(args: ComposeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SheetConfig::load_from(path),
        None => SheetConfig::load(),
    };

    let mut candidates = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let candidate = UploadCandidate::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        candidates.push(candidate);
    }

    let title = args.title.unwrap_or_else(|| config.default_title.clone());
    let painter = TextPainter::load(config.font_path.as_deref());
    if !painter.has_font() {
        eprintln!("warning: no usable font found, the sheet will have no text");
    }
    let renderer = SheetRenderer::new(painter);
    let options = RasterOptions {
        pixel_ratio: config.pixel_ratio,
        ..Default::default()
    };
    let mut session = Session::new(LayoutState::with_title(title), Box::new(renderer), options);

    session.upload(candidates);
    session.set_page_number(args.page);

    let ids = session.layout().image_ids();
    if args.notes.len() > ids.len() {
        log::warn!(
            "{} caption(s) given for {} photo(s), ignoring the rest",
            args.notes.len(),
            ids.len()
        );
    }
    for (id, note) in ids.into_iter().zip(args.notes) {
        session.update_note(id, note);
    }

    session.set_zoom(args.zoom);
    session.open_preview().await;

    let mut failed = false;
    for notice in session.drain_notices() {
        eprintln!("{}", notice);
        failed |= notice.level == NoticeLevel::Error;
    }

    let Some(artifact) = session.artifact().cloned() else {
        bail!("No sheet was generated");
    };
    if failed {
        bail!("Sheet generation failed");
    }

    let output = match args.output {
        Some(path) => path,
        None => default_output(&config)?,
    };
    export::save_png(&artifact, &output)?;

    let (w, h) = session.zoom().apply(artifact.width(), artifact.height());
    println!(
        "Saved {} ({}x{}, preview {} at {}x{})",
        output.display(),
        artifact.width(),
        artifact.height(),
        session.zoom().label(),
        w,
        h
    );

    if args.print {
        let page = export::print_page(&artifact, config.print_delay_ms, &config.opener)?;
        println!("Print page: {}", page.display());
    }

    Ok(())
}

fn default_output(config: &SheetConfig) -> Result<PathBuf> {
    export::default_export_path(config.save_location)
        .context("Could not determine a save directory, pass --output")
}

pub fn handle_guide(method: Option<String>) -> Result<()> {
    match method {
        None => {
            for (i, method) in guide::methods().iter().enumerate() {
                println!("{}. {}", i + 1, method.name);
            }
        }
        Some(name) => {
            let Some(method) = guide::lookup(&name) else {
                bail!("Unknown complaint method: {}", name);
            };
            print!("{}", method.render());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::target::tests::png_bytes;

    fn compose_args(dir: &std::path::Path, files: Vec<PathBuf>) -> ComposeArgs {
        let config = dir.join("config.json");
        SheetConfig {
            pixel_ratio: 0.25,
            ..Default::default()
        }
        .save_to(&config)
        .unwrap();

        ComposeArgs {
            files,
            title: Some("工资证据".into()),
            page: 2,
            notes: vec!["工资条".into()],
            output: Some(dir.join("sheet.png")),
            print: false,
            zoom: 1.0,
            config: Some(config),
        }
    }

    #[tokio::test]
    async fn test_compose_saves_png() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("slip.png");
        std::fs::write(&photo, png_bytes(40, 20)).unwrap();

        let args = compose_args(dir.path(), vec![photo]);
        let output = args.output.clone().unwrap();
        handle_compose(args).await.unwrap();

        let saved = image::open(output).unwrap();
        assert!(saved.width() > saved.height());
    }

    #[tokio::test]
    async fn test_compose_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = compose_args(dir.path(), vec![dir.path().join("missing.png")]);
        assert!(handle_compose(args).await.is_err());
    }

    #[test]
    fn test_guide_unknown_method() {
        assert!(handle_guide(None).is_ok());
        assert!(handle_guide(Some("not a method".into())).is_err());
    }
}
