//! The two image input slots and their locally derived previews.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Edge length the preview is scaled down to (aspect ratio preserved).
pub const PREVIEW_SIZE: u32 = 240;

/// One of the two independent image input positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    /// User-facing label for this position.
    pub fn label(self) -> &'static str {
        match self {
            SlotId::A => "Image 1",
            SlotId::B => "Image 2",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::A => write!(f, "image 1"),
            SlotId::B => write!(f, "image 2"),
        }
    }
}

/// A file the user picked for one slot. The bytes are shared so a submission
/// can hold onto them without cloning the whole file.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// Read a file from disk into a selection.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    /// File name sent to the service alongside the bytes.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }
}

/// Downscaled RGBA pixels for on-screen display. `generation` changes with
/// every selection so renderers can drop textures built from an older file.
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub generation: u64,
}

/// Holder for one input position. Selecting a file derives a preview
/// synchronously; a file whose bytes do not decode as an image is still held,
/// it just has no preview.
#[derive(Debug, Default)]
pub struct UploadSlot {
    image: Option<SelectedImage>,
    preview: Option<Preview>,
    generation: u64,
}

impl UploadSlot {
    /// Store a new file, replacing any previous selection and its preview.
    pub fn select(&mut self, image: SelectedImage) {
        self.generation += 1;
        self.preview = decode_preview(&image.bytes, self.generation);
        if self.preview.is_none() {
            tracing::warn!(
                path = %image.path.display(),
                "selected file does not decode as an image; no preview"
            );
        }
        self.image = Some(image);
    }

    /// Empty the slot, invalidating the current preview.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.image = None;
        self.preview = None;
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Current selection generation; bumped on every select/clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn decode_preview(bytes: &[u8], generation: u64) -> Option<Preview> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let thumb = decoded.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgba8();
    let (width, height) = thumb.dimensions();
    Some(Preview {
        width,
        height,
        rgba: thumb.into_raw(),
        generation,
    })
}

/// Extension-based check applied at the drag-and-drop boundary only; the
/// plain file picker may hand over files of any type.
pub fn looks_like_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(
                ext.as_str(),
                "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp"
            )
        }
        None => false,
    }
}
