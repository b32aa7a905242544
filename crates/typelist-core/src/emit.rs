//! Printing the type index.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::config::{BucketOrder, LineTerminator, ListConfig, OutputFormat};
use crate::error::ScanError;
use crate::index::TypeIndex;
use crate::label::Label;

/// Writes a populated [`TypeIndex`] grouped by label.
///
/// All lines of a label precede all lines of any label that sorts after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter {
    format: OutputFormat,
    terminator: LineTerminator,
    order: BucketOrder,
}

/// One label group in JSON output.
#[derive(Serialize)]
struct JsonGroup<'a> {
    label: &'a Label,
    paths: Vec<std::borrow::Cow<'a, str>>,
}

impl Emitter {
    /// Create an emitter.
    pub fn new(format: OutputFormat, terminator: LineTerminator, order: BucketOrder) -> Self {
        Self {
            format,
            terminator,
            order,
        }
    }

    /// Create an emitter using the output settings of a config.
    pub fn from_config(config: &ListConfig) -> Self {
        Self::new(config.format, config.terminator, config.bucket_order)
    }

    /// Write every entry of `index` to `out`.
    ///
    /// Returns the number of entries written. An empty index is an error,
    /// not an empty success.
    pub fn emit<W: Write>(&self, index: &TypeIndex, mut out: W) -> Result<usize, ScanError> {
        if index.is_empty() {
            return Err(ScanError::NothingToList);
        }

        let written = match self.format {
            OutputFormat::Json => self.emit_json(index, &mut out)?,
            OutputFormat::Name | OutputFormat::Labeled => self.emit_lines(index, &mut out)?,
        };
        out.flush()?;

        Ok(written)
    }

    fn emit_lines<W: Write>(&self, index: &TypeIndex, out: &mut W) -> std::io::Result<usize> {
        let term = self.terminator.as_byte();
        let mut written = 0;

        for (label, bucket) in index.iter() {
            for path in bucket.ordered(self.order) {
                if self.format == OutputFormat::Labeled {
                    out.write_all(label.as_str().as_bytes())?;
                    out.write_all(b": ")?;
                }
                out.write_all(path_bytes(path).as_ref())?;
                out.write_all(&[term])?;
                written += 1;
            }
        }

        Ok(written)
    }

    fn emit_json<W: Write>(&self, index: &TypeIndex, out: &mut W) -> Result<usize, ScanError> {
        let groups: Vec<JsonGroup<'_>> = index
            .iter()
            .map(|(label, bucket)| JsonGroup {
                label,
                paths: bucket.ordered(self.order).map(|p| p.to_string_lossy()).collect(),
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &groups)
            .map_err(|e| ScanError::Output { source: e.into() })?;
        out.write_all(b"\n")?;

        Ok(index.len())
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    match path.to_string_lossy() {
        std::borrow::Cow::Borrowed(s) => std::borrow::Cow::Borrowed(s.as_bytes()),
        std::borrow::Cow::Owned(s) => std::borrow::Cow::Owned(s.into_bytes()),
    }
}
