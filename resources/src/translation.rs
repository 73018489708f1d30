//! GNU gettext `.mo` catalogs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ResourceError;

const MAGIC: u32 = 0x9504_12de;

/// Environment variables consulted for the message language, in priority
/// order.
const LANGUAGE_VARS: [&str; 4] = ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Translates user-visible messages through a loaded catalog.
///
/// Messages without a translation (or every message, for the identity
/// translator) are returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    messages: HashMap<String, String>,
}

impl Translator {
    /// A translator that returns every message unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Load the catalog of `domain` for the language configured in the
    /// environment, from `<locale_dir>/<lang>/LC_MESSAGES/<domain>.mo`.
    ///
    /// Falls back to the identity translator when no catalog is found or
    /// the catalog cannot be read.
    pub fn load(domain: &str, locale_dir: impl AsRef<Path>) -> Self {
        let languages = languages_from(|var| std::env::var(var).ok());
        Self::load_for(domain, locale_dir.as_ref(), &languages)
    }

    /// Like [`load`](Self::load) with an explicit language preference list.
    pub fn load_for(domain: &str, locale_dir: &Path, languages: &[String]) -> Self {
        let Some(path) = find_catalog(domain, locale_dir, languages) else {
            log::info!(
                "Not using translations: no {domain}.mo in {} for {languages:?}",
                locale_dir.display()
            );
            return Self::identity();
        };
        match Self::from_file(&path) {
            Ok(translator) => {
                log::debug!(
                    "Loaded {} translations from {}",
                    translator.len(),
                    path.display()
                );
                translator
            }
            Err(e) => {
                log::warn!("Not using translations from {}: {e}", path.display());
                Self::identity()
            }
        }
    }

    /// Parse the catalog at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(ResourceError::io(path))?;
        Self::from_mo_bytes(&bytes)
    }

    /// Parse a catalog in GNU `.mo` format, in either byte order.
    pub fn from_mo_bytes(bytes: &[u8]) -> Result<Self, ResourceError> {
        let catalog = MoReader::new(bytes)?;
        let count = catalog.u32_at(8)? as usize;
        let originals = catalog.u32_at(12)? as usize;
        let translations = catalog.u32_at(16)? as usize;
        catalog.check_table(originals, count)?;
        catalog.check_table(translations, count)?;

        let mut messages = HashMap::with_capacity(count);
        for idx in 0..count {
            let msgid = catalog.string_at(originals + idx * 8)?;
            let msgstr = catalog.string_at(translations + idx * 8)?;
            // The empty msgid holds the catalog header.
            if msgid.is_empty() {
                continue;
            }
            // Plural entries: keep the singular id and first form.
            let msgid = msgid.split('\0').next().unwrap_or_default();
            let msgstr = msgstr.split('\0').next().unwrap_or_default();
            messages.insert(msgid.to_owned(), msgstr.to_owned());
        }
        Ok(Self { messages })
    }

    /// The translation of `msgid`, or `msgid` itself.
    pub fn translate<'a>(&'a self, msgid: &'a str) -> &'a str {
        match self.messages.get(msgid) {
            Some(translated) if !translated.is_empty() => translated.as_str(),
            _ => msgid,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Bounds-checked view over catalog bytes with the detected byte order.
struct MoReader<'a> {
    bytes: &'a [u8],
    big_endian: bool,
}

impl<'a> MoReader<'a> {
    fn new(bytes: &'a [u8]) -> Result<Self, ResourceError> {
        let head: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ResourceError::Catalog("file too short".into()))?;
        let big_endian = if u32::from_le_bytes(head) == MAGIC {
            false
        } else if u32::from_be_bytes(head) == MAGIC {
            true
        } else {
            return Err(ResourceError::Catalog("bad magic number".into()));
        };
        let reader = Self { bytes, big_endian };
        let revision = reader.u32_at(4)? >> 16;
        if revision > 1 {
            return Err(ResourceError::Catalog(format!(
                "unsupported major revision {revision}"
            )));
        }
        Ok(reader)
    }

    /// Fail unless a table of `count` 8-byte entries fits at `offset`.
    fn check_table(&self, offset: usize, count: usize) -> Result<(), ResourceError> {
        count
            .checked_mul(8)
            .and_then(|len| offset.checked_add(len))
            .filter(|&end| end <= self.bytes.len())
            .map(|_| ())
            .ok_or_else(|| {
                ResourceError::Catalog(format!("table of {count} entries at {offset} out of range"))
            })
    }

    fn u32_at(&self, offset: usize) -> Result<u32, ResourceError> {
        let word: [u8; 4] = self
            .bytes
            .get(offset..)
            .and_then(|b| b.get(..4))
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ResourceError::Catalog(format!("offset {offset} out of range")))?;
        Ok(if self.big_endian {
            u32::from_be_bytes(word)
        } else {
            u32::from_le_bytes(word)
        })
    }

    /// The string described by the (length, offset) table entry at `entry`.
    fn string_at(&self, entry: usize) -> Result<&'a str, ResourceError> {
        let len = self.u32_at(entry)? as usize;
        let start = self.u32_at(entry + 4)? as usize;
        let raw = self
            .bytes
            .get(start..)
            .and_then(|b| b.get(..len))
            .ok_or_else(|| ResourceError::Catalog(format!("string at {start} out of range")))?;
        std::str::from_utf8(raw).map_err(|e| ResourceError::Catalog(e.to_string()))
    }
}

/// Message languages from the environment, most preferred first.
///
/// `LANGUAGE` may list several languages separated by `:`; otherwise the
/// first set variable of `LC_ALL`, `LC_MESSAGES` and `LANG` is used. Each
/// locale like `fr_FR.UTF-8` yields `fr_FR` followed by `fr`.
pub fn languages_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut languages = Vec::new();
    for var in LANGUAGE_VARS {
        let Some(value) = lookup(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        for locale in value.split(':') {
            let locale = locale.split(['.', '@']).next().unwrap_or_default();
            if locale.is_empty() || locale == "C" || locale == "POSIX" {
                continue;
            }
            push_unique(&mut languages, locale);
            if let Some((lang, _region)) = locale.split_once('_') {
                push_unique(&mut languages, lang);
            }
        }
        break;
    }
    languages
}

fn push_unique(languages: &mut Vec<String>, lang: &str) {
    if !languages.iter().any(|l| l == lang) {
        languages.push(lang.to_owned());
    }
}

fn find_catalog(domain: &str, locale_dir: &Path, languages: &[String]) -> Option<PathBuf> {
    languages
        .iter()
        .map(|lang| {
            locale_dir
                .join(lang)
                .join("LC_MESSAGES")
                .join(format!("{domain}.mo"))
        })
        .find(|path| path.is_file())
}
