//! Photo attachments.
//!
//! Reports carry their photo inline as a `data:` URL, the same form the
//! field client stores.

use std::path::Path;

use thiserror::Error;

/// Largest photo accepted, before encoding.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Cannot read photo: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported photo type (expected jpg, png, gif or webp)")]
    UnsupportedType,
    #[error("Photo is {bytes} bytes, the limit is {max}")]
    TooLarge { bytes: usize, max: usize },
}

/// MIME type for a photo file, by extension.
fn mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Reads the photo at `path` into a `data:` URL.
///
/// # Errors
///
/// Returns an error if the extension is not a supported image type, the
/// file cannot be read, or it is larger than [`MAX_PHOTO_BYTES`].
pub fn data_url(path: &Path) -> Result<String, PhotoError> {
    let mime = mime_type(path).ok_or(PhotoError::UnsupportedType)?;

    let len = usize::try_from(std::fs::metadata(path)?.len()).unwrap_or(usize::MAX);
    if len > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            bytes: len,
            max: MAX_PHOTO_BYTES,
        });
    }

    let bytes = std::fs::read(path)?;
    log::debug!("Attaching {} byte photo {}", bytes.len(), path.display());

    Ok(format!("data:{mime};base64,{}", encode(&bytes)))
}

/// Standard padded base64.
fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let n = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        out.push(char::from(ALPHABET[(n >> 18) as usize & 63]));
        out.push(char::from(ALPHABET[(n >> 12) as usize & 63]));
        out.push(if chunk.len() > 1 {
            char::from(ALPHABET[(n >> 6) as usize & 63])
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            char::from(ALPHABET[n as usize & 63])
        } else {
            '='
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("relief_map_photo_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn encodes_with_padding() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "Zg==");
        assert_eq!(encode(b"fo"), "Zm8=");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(b"foobar"), "Zm9vYmFy");
        assert_eq!(encode(&[0xff, 0xfe, 0xfd]), "//79");
    }

    #[test]
    fn reads_photo_into_data_url() {
        let path = temp_file("damage.PNG", b"\x89PNG\r\n\x1a\n");
        assert_eq!(
            data_url(&path).unwrap(),
            "data:image/png;base64,iVBORw0KGgo="
        );
    }

    #[test]
    fn rejects_non_image_files() {
        let path = temp_file("notes.txt", b"hello");
        assert!(matches!(data_url(&path), Err(PhotoError::UnsupportedType)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("relief_map_no_such_photo.jpg");
        assert!(matches!(data_url(&path), Err(PhotoError::Io(_))));
    }

    #[test]
    fn oversized_photo_is_rejected() {
        let path = temp_file("huge.jpg", &vec![0; MAX_PHOTO_BYTES + 1]);
        assert!(matches!(
            data_url(&path),
            Err(PhotoError::TooLarge { bytes, .. }) if bytes == MAX_PHOTO_BYTES + 1
        ));
    }
}
