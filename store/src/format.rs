//! On-disk encoding of a container (feature-gated).
//!
//! A RON or bincode container file is the 8-byte [`SIGNATURE`], one format
//! tag byte, and the serde-encoded root [`Group`]. With the `hdf5` feature,
//! HDF5 files are read and written through the HDF5 library instead and
//! recognized by their own signature.

use std::io::Read;
use std::path::Path;

use crate::container::Group;
use crate::error::StoreError;

#[cfg(not(any(feature = "ron", feature = "bincode", feature = "hdf5")))]
compile_error!("guidata-store needs at least one of the `ron`, `bincode` or `hdf5` features");

/// Magic bytes at the start of every RON or bincode container file.
pub const SIGNATURE: [u8; 8] = *b"\x89GDC\r\n\x1a\n";

/// Magic bytes of an HDF5 file without a user block.
pub const HDF5_SIGNATURE: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

const HEADER_LEN: usize = SIGNATURE.len() + 1;

/// Supported payload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable RON text payload.
    #[cfg(feature = "ron")]
    Ron,
    /// Compact bincode payload.
    #[cfg(feature = "bincode")]
    Bincode,
    /// An HDF5 file, readable by other HDF5 tools.
    #[cfg(feature = "hdf5")]
    Hdf5,
}

impl Format {
    /// Pick a format from the file extension: `.ron` selects RON and
    /// `.h5` / `.hdf5` select HDF5 when available, anything else the
    /// default format.
    pub fn for_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        match ext {
            #[cfg(feature = "ron")]
            "ron" => Format::Ron,
            #[cfg(feature = "hdf5")]
            "h5" | "hdf5" => Format::Hdf5,
            _ => Self::default(),
        }
    }

    /// The tag byte of a byte-encoded payload.
    fn tag(self) -> Option<u8> {
        match self {
            #[cfg(feature = "ron")]
            Format::Ron => Some(b'R'),
            #[cfg(feature = "bincode")]
            Format::Bincode => Some(b'B'),
            #[cfg(feature = "hdf5")]
            Format::Hdf5 => None,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            #[cfg(feature = "ron")]
            b'R' => Some(Format::Ron),
            #[cfg(feature = "bincode")]
            b'B' => Some(Format::Bincode),
            _ => None,
        }
    }
}

impl Default for Format {
    #[cfg(feature = "bincode")]
    fn default() -> Self {
        Format::Bincode
    }

    #[cfg(all(not(feature = "bincode"), feature = "ron"))]
    fn default() -> Self {
        Format::Ron
    }

    #[cfg(all(not(feature = "bincode"), not(feature = "ron"), feature = "hdf5"))]
    fn default() -> Self {
        Format::Hdf5
    }
}

/// Read the container at `path` and the format it was written in.
pub fn read_file(path: &Path) -> Result<(Group, Format), StoreError> {
    let mut head = Vec::with_capacity(SIGNATURE.len());
    std::fs::File::open(path)?
        .take(SIGNATURE.len() as u64)
        .read_to_end(&mut head)?;
    if head == HDF5_SIGNATURE {
        return load_hdf5(path);
    }
    decode(&std::fs::read(path)?)
}

/// Write `root` to `path` in `format`, replacing the file.
pub fn write_file(path: &Path, root: &Group, format: Format) -> Result<(), StoreError> {
    if format.tag().is_none() {
        return save_hdf5(path, root);
    }
    std::fs::write(path, encode(root, format)?)?;
    Ok(())
}

#[cfg(feature = "hdf5")]
fn load_hdf5(path: &Path) -> Result<(Group, Format), StoreError> {
    Ok((crate::h5::load(path)?, Format::Hdf5))
}

#[cfg(not(feature = "hdf5"))]
fn load_hdf5(_path: &Path) -> Result<(Group, Format), StoreError> {
    Err(StoreError::Format("HDF5 files need the `hdf5` feature".into()))
}

#[cfg(feature = "hdf5")]
fn save_hdf5(path: &Path, root: &Group) -> Result<(), StoreError> {
    crate::h5::save(path, root)
}

#[cfg(not(feature = "hdf5"))]
fn save_hdf5(_path: &Path, _root: &Group) -> Result<(), StoreError> {
    Err(StoreError::Format("HDF5 files need the `hdf5` feature".into()))
}

/// Encode a container tree into file bytes.
///
/// Fails for [`Format::Hdf5`](Format), which is only written through
/// [`write_file`].
pub fn encode(root: &Group, format: Format) -> Result<Vec<u8>, StoreError> {
    let tag = format
        .tag()
        .ok_or_else(|| StoreError::Format(format!("{format:?} is not a byte payload")))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN);
    bytes.extend_from_slice(&SIGNATURE);
    bytes.push(tag);
    match format {
        #[cfg(feature = "ron")]
        Format::Ron => {
            let text = ron::ser::to_string_pretty(root, ron::ser::PrettyConfig::default())
                .map_err(|e| StoreError::Format(e.to_string()))?;
            bytes.extend_from_slice(text.as_bytes());
        }
        #[cfg(feature = "bincode")]
        Format::Bincode => {
            let payload =
                bincode::serialize(root).map_err(|e| StoreError::Format(e.to_string()))?;
            bytes.extend_from_slice(&payload);
        }
        #[cfg(feature = "hdf5")]
        Format::Hdf5 => {}
    }
    Ok(bytes)
}

/// Decode file bytes into a container tree and the format they used.
pub fn decode(bytes: &[u8]) -> Result<(Group, Format), StoreError> {
    if bytes.len() < HEADER_LEN || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(StoreError::Format("container signature not found".into()));
    }
    let tag = bytes[SIGNATURE.len()];
    let format = Format::from_tag(tag)
        .ok_or_else(|| StoreError::Format(format!("unsupported format tag 0x{tag:02x}")))?;
    let payload = &bytes[HEADER_LEN..];
    let root = match format {
        #[cfg(feature = "ron")]
        Format::Ron => {
            let text =
                std::str::from_utf8(payload).map_err(|e| StoreError::Format(e.to_string()))?;
            ron::from_str(text).map_err(|e| StoreError::Format(e.to_string()))?
        }
        #[cfg(feature = "bincode")]
        Format::Bincode => {
            bincode::deserialize(payload).map_err(|e| StoreError::Format(e.to_string()))?
        }
        #[cfg(feature = "hdf5")]
        Format::Hdf5 => {
            return Err(StoreError::Format("HDF5 payloads carry no tag".into()));
        }
    };
    Ok((root, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Array, AttrValue};

    fn sample() -> Group {
        let mut root = Group::new();
        root.set_attr("title", AttrValue::Str("sample".into()));
        root.set_attr("ids", AttrValue::StrList(vec!["a".into(), "b".into()]));
        let meta = root.require_group("meta");
        meta.set_attr("count", AttrValue::Int(2));
        meta.set_dataset("values", Array::new(vec![0.5f64, 1.5]));
        root
    }

    #[cfg(feature = "ron")]
    #[test]
    fn ron_payload_is_text() {
        let bytes = encode(&sample(), Format::Ron).unwrap();
        assert_eq!(&bytes[..8], &SIGNATURE);
        assert_eq!(bytes[8], b'R');
        assert!(std::str::from_utf8(&bytes[9..]).unwrap().contains("sample"));
        let (root, format) = decode(&bytes).unwrap();
        assert_eq!(format, Format::Ron);
        assert_eq!(root, sample());
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn bincode_tree_survives() {
        let bytes = encode(&sample(), Format::Bincode).unwrap();
        assert_eq!(bytes[8], b'B');
        let (root, format) = decode(&bytes).unwrap();
        assert_eq!(format, Format::Bincode);
        assert_eq!(root, sample());
    }

    #[test]
    fn rejects_missing_signature() {
        assert!(matches!(decode(b"not a container"), Err(StoreError::Format(_))));
        assert!(matches!(decode(&[]), Err(StoreError::Format(_))));
    }

    #[test]
    fn rejects_unknown_tag() {
        let mut bytes = SIGNATURE.to_vec();
        bytes.push(b'?');
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("0x3f"));
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn hdf5_file_needs_feature() {
        let dir = std::env::temp_dir().join("guidata_format_test_hdf5_sig");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("foreign.h5");
        let mut bytes = HDF5_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0; 16]);
        std::fs::write(&path, bytes).unwrap();
        let err = read_file(&path).unwrap_err();
        assert!(err.to_string().contains("hdf5"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(feature = "ron")]
    #[test]
    fn ron_extension_selects_ron() {
        assert_eq!(Format::for_path(Path::new("data.ron")), Format::Ron);
    }
}
