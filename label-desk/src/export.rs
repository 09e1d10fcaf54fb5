use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use label_core::Record;
use sheet_core::{FontSizes, OutputNaming, PreviewFrame, SheetError, rasterize_png, write_document};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not generate label sheet: {0}")]
    Generate(#[from] SheetError),
    #[error("sheet written to {path} but could not be opened: {reason}")]
    Open { path: PathBuf, reason: String },
}

/// Writes the sheet for `records` to the next free file name in `dir`.
pub fn export_sheet(
    records: &[Record],
    sizes: &FontSizes,
    dir: &Path,
    naming: &OutputNaming,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(SheetError::from)?;
    Ok(write_document(dir, naming, records, sizes)?)
}

/// Hands `path` to the desktop's default viewer.
pub fn open_with_default_app(path: &Path) -> Result<(), ExportError> {
    let mut cmd = opener(path);
    let fail = |reason: String| ExportError::Open {
        path: path.to_path_buf(),
        reason,
    };
    let status = cmd.status().map_err(|e| fail(e.to_string()))?;
    if !status.success() {
        return Err(fail(format!("viewer exited with {status}")));
    }
    info!(path = %path.display(), "opened label sheet");
    Ok(())
}

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

/// Saves a preview page. `.svg` keeps the vector source, anything else is
/// rasterized to PNG.
pub fn write_preview(frame: &PreviewFrame, path: &Path) -> Result<(), SheetError> {
    let is_svg = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        fs::write(path, frame.svg.as_bytes())?;
    } else {
        fs::write(path, rasterize_png(frame)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_core::LabelFields;
    use sheet_core::build_preview;

    fn records() -> Vec<Record> {
        vec![Record {
            id: 0,
            fields: LabelFields::new("Banheiro", "Porta toalha", "0300", "0500", 20),
        }]
    }

    #[test]
    fn consecutive_exports_get_consecutive_names() {
        let dir = tempfile::tempdir().unwrap();
        let naming = OutputNaming::default();
        let a = export_sheet(&records(), &FontSizes::default(), dir.path(), &naming).unwrap();
        let b = export_sheet(&records(), &FontSizes::default(), dir.path(), &naming).unwrap();
        assert_eq!(a.file_name().unwrap(), "etiquetas001.pdf");
        assert_eq!(b.file_name().unwrap(), "etiquetas002.pdf");
        assert!(fs::read(&b).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("sheets");
        let path = export_sheet(
            &records(),
            &FontSizes::default(),
            &nested,
            &OutputNaming::default(),
        )
        .unwrap();
        assert!(path.starts_with(std::path::absolute(&nested).unwrap()));
    }

    #[test]
    fn nothing_to_print_is_a_generate_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_sheet(&[], &FontSizes::default(), dir.path(), &OutputNaming::default())
            .unwrap_err();
        assert!(matches!(err, ExportError::Generate(SheetError::NothingToPrint)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn preview_svg_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let frame = build_preview(&records(), 0, &FontSizes::default());
        let path = dir.path().join("page.SVG");
        write_preview(&frame, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), frame.svg);
    }
}
