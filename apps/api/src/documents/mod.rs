// Resume documents in and out: upload text extraction and DOCX rendering.
// Everything that touches the filesystem or parses a file runs on the blocking pool.

pub mod docx_writer;
pub mod extract;
pub mod handlers;
pub mod upload;
