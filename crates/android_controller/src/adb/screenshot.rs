//! Screenshot capture from the device framebuffer

use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::executor::CommandExecutor;

/// A screenshot written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub path: PathBuf,
    pub size_bytes: usize,
    /// Image dimensions when the PNG header could be read
    pub dimensions: Option<(u32, u32)>,
}

/// Read the dimensions from an encoded image header
fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            warn!("Screenshot is not a readable image: {}", e);
            None
        }
    }
}

/// Capture the screen with `exec-out screencap -p` and write it to `path`
///
/// The bytes are written unmodified. The file is only created once the
/// capture has succeeded; an existing file at `path` is overwritten.
pub async fn screenshot(adb: &CommandExecutor, path: impl AsRef<Path>) -> Result<Screenshot> {
    let path = path.as_ref();

    let bytes = adb.run_raw(&["exec-out", "screencap", "-p"]).await?;
    debug!("Captured {} bytes of screenshot data", bytes.len());

    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    drop(file);

    info!("Screenshot saved to {}", path.display());

    Ok(Screenshot {
        path: path.to_path_buf(),
        size_bytes: bytes.len(),
        dimensions: image_dimensions(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControllerError;
    use crate::executor::testing::ScriptedRunner;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(3, 2);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_screenshot_written_byte_for_byte() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("scr.png");
        let png = tiny_png();
        let runner = Arc::new(ScriptedRunner::new().respond("exec-out screencap -p", &png));
        let adb = CommandExecutor::with_runner("adb", runner);

        let shot = screenshot(&adb, &path).await.unwrap();

        assert_eq!(shot.path, path);
        assert_eq!(shot.size_bytes, png.len());
        assert_eq!(shot.dimensions, Some((3, 2)));
        assert_eq!(std::fs::read(&path).unwrap(), png);
    }

    #[tokio::test]
    async fn test_screenshot_overwrites() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("scr.png");
        std::fs::write(&path, b"stale contents that are longer than the new capture").unwrap();
        let runner = Arc::new(ScriptedRunner::new().respond("exec-out screencap -p", b"not a png"));
        let adb = CommandExecutor::with_runner("adb", runner);

        let shot = screenshot(&adb, &path).await.unwrap();

        assert_eq!(shot.dimensions, None);
        assert_eq!(std::fs::read(&path).unwrap(), b"not a png");
    }

    #[tokio::test]
    async fn test_failed_capture_leaves_no_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("scr.png");
        let runner = Arc::new(ScriptedRunner::new().fail(
            "exec-out screencap -p",
            1,
            "error: no devices/emulators found",
        ));
        let adb = CommandExecutor::with_runner("adb", runner);

        let err = screenshot(&adb, &path).await.unwrap_err();

        assert!(matches!(err, ControllerError::CommandFailed { .. }));
        assert!(!path.exists());
    }
}
