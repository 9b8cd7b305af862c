//! Fixtures shared by the integration tests: in-memory Outlook messages and
//! minimal text PDFs.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use cfb::CompoundFile;
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;

type MsgFile = CompoundFile<Cursor<Vec<u8>>>;

/// One attachment of a [`MsgBuilder`] message.
pub enum AttachmentSpec {
    /// A file attachment; `None` leaves every name property out.
    File { name: Option<String>, data: Vec<u8> },
    /// A message stored inline, named only by its display name.
    Message { display_name: String, message: MsgBuilder },
}

/// Builds Outlook `.msg` compound files in memory.
#[derive(Default)]
pub struct MsgBuilder {
    subject: Option<String>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    sent_at: Option<NaiveDateTime>,
    attachments: Vec<AttachmentSpec>,
}

impl MsgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn sender(mut self, name: &str, email: &str) -> Self {
        self.sender_name = Some(name.to_string());
        self.sender_email = Some(email.to_string());
        self
    }

    pub fn sent_at(mut self, when: NaiveDateTime) -> Self {
        self.sent_at = Some(when);
        self
    }

    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.attachments.push(AttachmentSpec::File {
            name: Some(name.to_string()),
            data: data.to_vec(),
        });
        self
    }

    pub fn unnamed_file(mut self, data: &[u8]) -> Self {
        self.attachments.push(AttachmentSpec::File {
            name: None,
            data: data.to_vec(),
        });
        self
    }

    pub fn embedded(mut self, display_name: &str, message: MsgBuilder) -> Self {
        self.attachments.push(AttachmentSpec::Message {
            display_name: display_name.to_string(),
            message,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut file = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        self.write_into(&mut file, Path::new("/"), 32);
        file.flush().unwrap();
        file.into_inner().into_inner()
    }

    fn write_into(&self, file: &mut MsgFile, root: &Path, header_len: usize) {
        if let Some(subject) = &self.subject {
            write_unicode(file, &root.join("__substg1.0_0037001F"), subject);
        }
        if let Some(name) = &self.sender_name {
            write_unicode(file, &root.join("__substg1.0_0C1A001F"), name);
        }
        if let Some(email) = &self.sender_email {
            write_unicode(file, &root.join("__substg1.0_5D01001F"), email);
        }

        let mut properties = vec![0u8; header_len];
        if let Some(when) = self.sent_at {
            let filetime =
                ((when.and_utc().timestamp() + FILETIME_UNIX_OFFSET) as u64) * 10_000_000;
            properties.extend_from_slice(&0x0039_0040u32.to_le_bytes());
            properties.extend_from_slice(&6u32.to_le_bytes());
            properties.extend_from_slice(&filetime.to_le_bytes());
        }
        write_stream(file, &root.join("__properties_version1.0"), &properties);

        for (index, attachment) in self.attachments.iter().enumerate() {
            let storage = root.join(format!("__attach_version1.0_#{:08X}", index));
            file.create_storage(&storage).unwrap();
            write_stream(file, &storage.join("__properties_version1.0"), &[0u8; 8]);

            match attachment {
                AttachmentSpec::File { name, data } => {
                    if let Some(name) = name {
                        write_unicode(file, &storage.join("__substg1.0_3707001F"), name);
                    }
                    write_stream(file, &storage.join("__substg1.0_37010102"), data);
                }
                AttachmentSpec::Message {
                    display_name,
                    message,
                } => {
                    write_unicode(file, &storage.join("__substg1.0_3001001F"), display_name);
                    let inner = storage.join("__substg1.0_3701000D");
                    file.create_storage(&inner).unwrap();
                    message.write_into(file, &inner, 24);
                }
            }
        }
    }
}

fn write_stream(file: &mut MsgFile, path: &Path, data: &[u8]) {
    let mut stream = file.create_stream(path).unwrap();
    stream.write_all(data).unwrap();
    stream.flush().unwrap();
}

fn write_unicode(file: &mut MsgFile, path: &Path, value: &str) {
    let encoded: Vec<u8> = value.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    write_stream(file, path, &encoded);
}

/// A one-page PDF showing `lines` in Courier, one per line.
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
        Operation::new("TL", vec![Object::Integer(16)]),
        Operation::new("Td", vec![Object::Integer(50), Object::Integer(750)]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
