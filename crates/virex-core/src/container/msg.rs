//! Outlook `.msg` decoding (MS-OXMSG) on top of the `cfb` compound file reader.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use cfb::CompoundFile;
use chrono::{DateTime, NaiveDateTime};
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

use super::{
    Attachment, AttachmentPayload, ContainerDecoder, ContainerId, MessageContainer,
    MessageMetadata, Result,
};
use crate::error::ContainerError;
use crate::text::clean_attachment_name;

const SUBSTG_PREFIX: &str = "__substg1.0_";
const ATTACH_PREFIX: &str = "__attach_version1.0_#";
const PROPERTIES_STREAM: &str = "__properties_version1.0";

// Fixed header sizes of the properties stream, by storage kind.
const TOP_LEVEL_HEADER: usize = 32;
const EMBEDDED_HEADER: usize = 24;
const PROPERTY_ENTRY: usize = 16;

const PR_SUBJECT: u16 = 0x0037;
const PR_CLIENT_SUBMIT_TIME: u16 = 0x0039;
const PR_SENDER_NAME: u16 = 0x0C1A;
const PR_SENDER_EMAIL_ADDRESS: u16 = 0x0C1F;
const PR_DISPLAY_TO: u16 = 0x0E04;
const PR_MESSAGE_DELIVERY_TIME: u16 = 0x0E06;
const PR_DISPLAY_NAME: u16 = 0x3001;
const PR_ATTACH_DATA: u16 = 0x3701;
const PR_ATTACH_FILENAME: u16 = 0x3704;
const PR_ATTACH_LONG_FILENAME: u16 = 0x3707;
const PR_SENDER_SMTP_ADDRESS: u16 = 0x5D01;

const PT_OBJECT: u16 = 0x000D;
const PT_STRING8: u16 = 0x001E;
const PT_UNICODE: u16 = 0x001F;
const PT_SYSTIME: u16 = 0x0040;
const PT_BINARY: u16 = 0x0102;

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01.
const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;

/// Property id and type encoded in a `__substg1.0_IIIITTTT` entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PropertyTag {
    id: u16,
    kind: u16,
}

impl PropertyTag {
    fn from_entry_name(name: &str) -> Option<Self> {
        let hex = name.strip_prefix(SUBSTG_PREFIX)?;
        if hex.len() != 8 {
            return None;
        }
        Some(Self {
            id: u16::from_str_radix(&hex[..4], 16).ok()?,
            kind: u16::from_str_radix(&hex[4..], 16).ok()?,
        })
    }

    fn is_string(&self) -> bool {
        self.kind == PT_UNICODE || self.kind == PT_STRING8
    }
}

struct Entry {
    name: String,
    path: PathBuf,
    is_storage: bool,
}

/// Decoder for Outlook message files.
///
/// Attachments stored as embedded messages are decoded in memory and
/// returned as [`AttachmentPayload::Embedded`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgDecoder;

impl MsgDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ContainerDecoder for MsgDecoder {
    fn decode(&self, data: &[u8]) -> Result<MessageContainer> {
        let mut file = CompoundFile::open(Cursor::new(data)).map_err(ContainerError::Open)?;
        let (metadata, attachments) = read_message(&mut file, Path::new("/"), TOP_LEVEL_HEADER)?;

        debug!(
            "Decoded message {:?} with {} attachments",
            metadata.subject,
            attachments.len()
        );

        Ok(MessageContainer {
            metadata,
            attachments,
            fingerprint: ContainerId::of_bytes(data),
        })
    }
}

fn list_storage<F: Read + Seek>(file: &CompoundFile<F>, storage: &Path) -> Result<Vec<Entry>> {
    let entries = file
        .read_storage(storage)
        .map_err(|source| ContainerError::Stream {
            path: storage.display().to_string(),
            source,
        })?;

    let mut listed: Vec<Entry> = entries
        .map(|e| Entry {
            name: e.name().to_string(),
            path: e.path().to_path_buf(),
            is_storage: e.is_storage(),
        })
        .collect();
    listed.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listed)
}

fn read_stream<F: Read + Seek>(file: &mut CompoundFile<F>, path: &Path) -> Result<Vec<u8>> {
    let to_error = |source: std::io::Error| ContainerError::Stream {
        path: path.display().to_string(),
        source,
    };
    let mut stream = file.open_stream(path).map_err(to_error)?;
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer).map_err(to_error)?;
    Ok(buffer)
}

fn decode_string(raw: &[u8], kind: u16) -> String {
    let decoded = if kind == PT_UNICODE {
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(raw).into_owned()
    };
    decoded.trim_end_matches('\0').to_string()
}

fn read_message<F: Read + Seek>(
    file: &mut CompoundFile<F>,
    root: &Path,
    header_len: usize,
) -> Result<(MessageMetadata, Vec<Attachment>)> {
    let mut strings: HashMap<u16, String> = HashMap::new();
    let mut properties = Vec::new();
    let mut attachments = Vec::new();

    for entry in list_storage(file, root)? {
        if entry.is_storage {
            if entry.name.starts_with(ATTACH_PREFIX) {
                match read_attachment(file, &entry.path) {
                    Ok(attachment) => attachments.push(attachment),
                    Err(e) => warn!("Skipping unreadable attachment {}: {}", entry.name, e),
                }
            }
            continue;
        }

        if entry.name == PROPERTIES_STREAM {
            properties = read_stream(file, &entry.path)?;
            continue;
        }

        if let Some(tag) = PropertyTag::from_entry_name(&entry.name) {
            if tag.is_string()
                && matches!(
                    tag.id,
                    PR_SUBJECT
                        | PR_SENDER_NAME
                        | PR_SENDER_EMAIL_ADDRESS
                        | PR_SENDER_SMTP_ADDRESS
                        | PR_DISPLAY_TO
                )
            {
                let raw = read_stream(file, &entry.path)?;
                strings.insert(tag.id, decode_string(&raw, tag.kind));
            }
        }
    }

    let non_empty = |id: u16| strings.get(&id).filter(|s| !s.trim().is_empty()).cloned();
    let metadata = MessageMetadata {
        subject: non_empty(PR_SUBJECT),
        sender_name: non_empty(PR_SENDER_NAME),
        sender_email: non_empty(PR_SENDER_SMTP_ADDRESS).or_else(|| non_empty(PR_SENDER_EMAIL_ADDRESS)),
        recipients: non_empty(PR_DISPLAY_TO),
        sent_at: read_systime(&properties, header_len, PR_CLIENT_SUBMIT_TIME)
            .or_else(|| read_systime(&properties, header_len, PR_MESSAGE_DELIVERY_TIME)),
    };

    Ok((metadata, attachments))
}

fn read_attachment<F: Read + Seek>(file: &mut CompoundFile<F>, storage: &Path) -> Result<Attachment> {
    let mut long_name = None;
    let mut short_name = None;
    let mut display_name = None;
    let mut payload = None;

    for entry in list_storage(file, storage)? {
        let Some(tag) = PropertyTag::from_entry_name(&entry.name) else {
            continue;
        };

        match (tag.id, tag.kind, entry.is_storage) {
            (PR_ATTACH_DATA, PT_BINARY, false) => {
                payload = Some(AttachmentPayload::Binary(read_stream(file, &entry.path)?));
            }
            (PR_ATTACH_DATA, PT_OBJECT, true) => {
                let (metadata, attachments) = read_message(file, &entry.path, EMBEDDED_HEADER)?;
                let fingerprint = fingerprint_storage(file, &entry.path)?;
                payload = Some(AttachmentPayload::Embedded(Box::new(MessageContainer {
                    metadata,
                    attachments,
                    fingerprint,
                })));
            }
            (id, _, false) if tag.is_string() => {
                let slot = match id {
                    PR_ATTACH_LONG_FILENAME => &mut long_name,
                    PR_ATTACH_FILENAME => &mut short_name,
                    PR_DISPLAY_NAME => &mut display_name,
                    _ => continue,
                };
                let raw = read_stream(file, &entry.path)?;
                *slot = clean_attachment_name(&decode_string(&raw, tag.kind));
            }
            _ => trace!("Ignoring attachment entry {}", entry.name),
        }
    }

    let payload = payload.unwrap_or(AttachmentPayload::Binary(Vec::new()));
    let mut name = long_name.or(short_name);

    if matches!(payload, AttachmentPayload::Embedded(_)) {
        name = name.or(display_name).map(|n| {
            if n.to_lowercase().ends_with(".msg") {
                n
            } else {
                format!("{}.msg", n)
            }
        });
    }

    Ok(Attachment::new(name.as_deref(), payload))
}

/// Hash every stream below a storage, keyed by relative path.
fn fingerprint_storage<F: Read + Seek>(file: &mut CompoundFile<F>, storage: &Path) -> Result<ContainerId> {
    let mut streams: Vec<PathBuf> = file
        .walk_storage(storage)
        .map_err(|source| ContainerError::Stream {
            path: storage.display().to_string(),
            source,
        })?
        .filter(|e| e.is_stream())
        .map(|e| e.path().to_path_buf())
        .collect();
    streams.sort();

    let mut hasher = Sha256::new();
    for path in streams {
        let relative = path.strip_prefix(storage).unwrap_or(&path).to_string_lossy().into_owned();
        let data = read_stream(file, &path)?;
        hasher.update(relative.as_bytes());
        hasher.update([0u8]);
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(&data);
    }

    Ok(ContainerId::from_digest(hasher.finalize().into()))
}

/// Find a PT_SYSTIME property in a fixed-layout properties stream.
fn read_systime(properties: &[u8], header_len: usize, id: u16) -> Option<NaiveDateTime> {
    properties
        .get(header_len..)?
        .chunks_exact(PROPERTY_ENTRY)
        .find_map(|entry| {
            let tag = u32::from_le_bytes(entry[0..4].try_into().ok()?);
            if (tag >> 16) as u16 != id || (tag & 0xFFFF) as u16 != PT_SYSTIME {
                return None;
            }
            let filetime = u64::from_le_bytes(entry[8..16].try_into().ok()?);
            filetime_to_datetime(filetime)
        })
}

fn filetime_to_datetime(filetime: u64) -> Option<NaiveDateTime> {
    if filetime == 0 {
        return None;
    }
    let secs = (filetime / 10_000_000) as i64 - FILETIME_UNIX_OFFSET;
    let nanos = ((filetime % 10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_property_tag_from_entry_name() {
        assert_eq!(
            PropertyTag::from_entry_name("__substg1.0_3707001F"),
            Some(PropertyTag { id: 0x3707, kind: PT_UNICODE })
        );
        assert_eq!(
            PropertyTag::from_entry_name("__substg1.0_3701000d"),
            Some(PropertyTag { id: 0x3701, kind: PT_OBJECT })
        );
        assert_eq!(PropertyTag::from_entry_name("__substg1.0_37"), None);
        assert_eq!(PropertyTag::from_entry_name("__properties_version1.0"), None);
    }

    #[test]
    fn test_decode_string() {
        let utf16: Vec<u8> = "Virement\0"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(decode_string(&utf16, PT_UNICODE), "Virement");
        assert_eq!(decode_string(b"ordre.pdf\0", PT_STRING8), "ordre.pdf");
    }

    #[test]
    fn test_filetime_conversion() {
        // 2024-03-12 09:30:00 UTC
        let unix = NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let filetime = ((unix.and_utc().timestamp() + FILETIME_UNIX_OFFSET) as u64) * 10_000_000;
        assert_eq!(filetime_to_datetime(filetime), Some(unix));
        assert_eq!(filetime_to_datetime(0), None);
    }

    #[test]
    fn test_read_systime_skips_header() {
        let when = 133_548_174_000_000_000u64;
        let mut stream = vec![0u8; TOP_LEVEL_HEADER];
        let mut entry = Vec::new();
        entry.extend_from_slice(&(((PR_CLIENT_SUBMIT_TIME as u32) << 16) | PT_SYSTIME as u32).to_le_bytes());
        entry.extend_from_slice(&6u32.to_le_bytes());
        entry.extend_from_slice(&when.to_le_bytes());
        stream.extend_from_slice(&entry);

        assert_eq!(
            read_systime(&stream, TOP_LEVEL_HEADER, PR_CLIENT_SUBMIT_TIME),
            filetime_to_datetime(when)
        );
        assert_eq!(read_systime(&stream, TOP_LEVEL_HEADER, PR_MESSAGE_DELIVERY_TIME), None);
        assert_eq!(read_systime(&stream[..10], TOP_LEVEL_HEADER, PR_CLIENT_SUBMIT_TIME), None);
    }

    #[test]
    fn test_decode_rejects_non_compound_file() {
        let err = MsgDecoder::new().decode(b"definitely not OLE").unwrap_err();
        assert!(matches!(err, ContainerError::Open(_)));
    }
}
