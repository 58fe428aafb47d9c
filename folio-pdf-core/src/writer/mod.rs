//! PDF writing functionality
//!
//! [`PdfWriter`] appends objects to any [`Write`] sink, tracks the byte
//! position of every object header and finally emits the cross-reference
//! table and trailer (see [`xref`]).

mod object;
pub mod xref;

pub use object::{IndirectObject, ObjectState};

use crate::compression::{StreamCompressor, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{PdfError, Result};
use crate::objects::{Object, ObjectId};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};

/// Marker comment after the header line; high-bit bytes flag the file as binary.
const BINARY_MARKER: [u8; 6] = [b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PdfVersion {
    pub major: u8,
    pub minor: u8,
}

impl PdfVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for PdfVersion {
    fn default() -> Self {
        Self::new(1, 7)
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WriterConfig {
    pub version: PdfVersion,
    /// Deflate level used for every compressed stream (0-9).
    pub compression_level: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: PdfVersion::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

pub struct PdfWriter<W: Write> {
    writer: W,
    config: WriterConfig,
    current_position: u64,
    at_line_start: bool,
    object_locations: HashMap<u32, u64>,
    next_object: AtomicU32,
    compressor: StreamCompressor,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, WriterConfig::default())
    }

    pub fn with_config(writer: W, config: WriterConfig) -> Self {
        let mut object_locations = HashMap::new();
        object_locations.insert(0, 0);
        Self {
            writer,
            config,
            current_position: 0,
            at_line_start: true,
            object_locations,
            next_object: AtomicU32::new(1),
            compressor: StreamCompressor::new(config.compression_level),
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn version(&self) -> PdfVersion {
        self.config.version
    }

    /// Reserves the next object number. Nothing is written.
    pub fn next_object(&self) -> ObjectId {
        ObjectId::new(self.next_object.fetch_add(1, Ordering::Relaxed))
    }

    /// The number the next reservation will get; also the trailer `/Size`.
    pub fn peek_next_object(&self) -> u32 {
        self.next_object.load(Ordering::Relaxed)
    }

    /// Creates an object with a freshly reserved number.
    pub fn new_object(&self) -> IndirectObject {
        IndirectObject::new(self.next_object())
    }

    /// Creates an object for a number reserved earlier with
    /// [`PdfWriter::next_object`].
    pub fn new_object_with_number(&self, id: ObjectId) -> IndirectObject {
        IndirectObject::new(id)
    }

    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.current_position
    }

    /// Offset of the `N 0 obj` line of a saved object.
    pub fn object_location(&self, id: ObjectId) -> Option<u64> {
        self.object_locations.get(&id.number()).copied()
    }

    /// Writes `obj` to the output. Saving an object a second time is a no-op;
    /// saving a different object under an already written number fails.
    ///
    /// Streams get their `/Length` from the final byte count. Compressed
    /// streams additionally get `/Length1` (uncompressed size) and
    /// `/Filter /FlateDecode`.
    pub fn save(&mut self, obj: &mut IndirectObject) -> Result<()> {
        if obj.is_saved() {
            return Ok(());
        }
        let id = obj.id();
        if self.object_locations.contains_key(&id.number()) {
            return Err(PdfError::DuplicateObject(id.number()));
        }

        if let Some(comment) = obj.comment() {
            let line = format!("% {}\n", comment);
            self.eol()?;
            self.write_bytes(line.as_bytes())?;
        }

        if obj.is_raw() {
            self.start_object(id)?;
            self.write_bytes(obj.data())?;
            self.end_object()?;
            obj.mark_saved();
            tracing::debug!("saved raw object {} ({} bytes)", id.number(), obj.data().len());
            return Ok(());
        }

        let is_stream = obj.is_stream();
        if is_stream {
            let data = obj.take_data();
            let uncompressed = data.len();
            let data = if obj.is_compressed() {
                let compressed = self.compressor.compress(&data)?;
                obj.dictionary.set("Filter", Object::name("FlateDecode"));
                obj.dictionary.set("Length1", uncompressed);
                compressed
            } else {
                data
            };
            obj.dictionary.set("Length", data.len());
            obj.set_data(data);
        }

        self.start_object(id)?;
        let body = obj.body();
        self.write_bytes(&body)?;
        if is_stream {
            self.write_bytes(b"\nstream\n")?;
            self.write_bytes(obj.data())?;
            self.write_bytes(b"\nendstream")?;
        }
        self.end_object()?;
        obj.mark_saved();

        tracing::debug!(
            "saved object {} at {:?} ({} stream bytes)",
            id.number(),
            self.object_location(id),
            obj.data().len()
        );
        Ok(())
    }

    /// Appends bytes to the output, writing the file header first if nothing
    /// has been written yet.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        if self.current_position == 0 {
            self.write_header()?;
        }
        self.put(data)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<()> {
        let version = format!("%PDF-{}\n", self.config.version);
        self.put(version.as_bytes())?;
        self.put(&BINARY_MARKER)
    }

    fn put(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        if let Some(last) = data.last() {
            self.at_line_start = *last == b'\n';
        }
        Ok(())
    }

    /// Starts a new line unless the output is already at one.
    fn eol(&mut self) -> Result<()> {
        if self.current_position == 0 {
            return self.write_header();
        }
        if !self.at_line_start {
            self.put(b"\n")?;
        }
        Ok(())
    }

    fn start_object(&mut self, id: ObjectId) -> Result<()> {
        self.eol()?;
        self.object_locations
            .insert(id.number(), self.current_position);
        let header = format!("{} 0 obj\n", id.number());
        self.put(header.as_bytes())
    }

    fn end_object(&mut self) -> Result<()> {
        self.eol()?;
        self.put(b"endobj\n")
    }
}
