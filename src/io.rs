use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};
use std::path::Path;

use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use tempfile::{NamedTempFile, TempPath};

use crate::config;
use crate::model::{Count, IoMode, Workload};
use crate::timing::{run_blocking, WorkloadResponse};

const DEFAULT_SIZE: u64 = 32768;
const DEFAULT_ITER: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IoResult {
    pub mode: IoMode,
    pub size: u64,
    pub iter: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
}

/// A write target that can be turned around and read back from the start.
pub trait Scratch: Write {
    type Reader: Read;

    fn into_reader(self) -> io::Result<Self::Reader>;
}

impl Scratch for Cursor<Vec<u8>> {
    type Reader = Self;

    fn into_reader(mut self) -> io::Result<Self> {
        self.rewind()?;
        Ok(self)
    }
}

/// Read handle on a scratch file; the file is removed when this is dropped.
pub struct ScratchFile {
    file: File,
    _path: TempPath,
}

impl Read for ScratchFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Scratch for NamedTempFile {
    type Reader = ScratchFile;

    // closes the write handle and reopens the same path for reading
    fn into_reader(mut self) -> io::Result<ScratchFile> {
        self.flush()?;
        let path = self.into_temp_path();
        let file = File::open(&path)?;
        Ok(ScratchFile { file, _path: path })
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Transfer {
    pub bytes_written: u64,
    pub bytes_read: u64,
}

/// Writes `chunk` `iter` times into `sink`, then reads everything back in
/// `chunk.len()` sized reads. Counts are the sums of what each call reported.
pub fn exercise<S: Scratch>(mut sink: S, chunk: &[u8], iter: u64) -> io::Result<Transfer> {
    let mut transfer = Transfer::default();

    for _ in 0..iter {
        let n = loop {
            match sink.write(chunk) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                r => break r?,
            }
        };
        transfer.bytes_written += n as u64;
    }

    let mut source = sink.into_reader()?;
    let mut buf = vec![0; chunk.len()];
    loop {
        match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => transfer.bytes_read += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(transfer)
}

#[tracing::instrument(level = "debug", skip(dir, prefix))]
pub fn run_io(
    mode: IoMode,
    size: u64,
    iter: u64,
    dir: &Path,
    prefix: &str,
) -> io::Result<IoResult> {
    let len = usize::try_from(size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk size too large"))?;
    let chunk = vec![b'a'; len];

    let transfer = match mode {
        IoMode::Memory => exercise(Cursor::new(Vec::new()), &chunk, iter)?,
        IoMode::Disk => {
            let file = tempfile::Builder::new()
                .prefix(prefix)
                .tempfile_in(dir)?;
            tracing::debug!("scratch file {:?}", file.path());
            exercise(file, &chunk, iter)?
        }
    };

    Ok(IoResult {
        mode,
        size,
        iter,
        bytes_written: transfer.bytes_written,
        bytes_read: transfer.bytes_read,
    })
}

#[get("/io?<size>&<iter>&<mode>")]
pub async fn io_workload(
    size: Option<Count>,
    iter: Option<Count>,
    mode: Option<IoMode>,
    config: &State<config::Config>,
) -> WorkloadResponse<IoResult> {
    let size = size.map_or(DEFAULT_SIZE, Count::get);
    let iter = iter.map_or(DEFAULT_ITER, Count::get);
    let mode = mode.unwrap_or_default();
    let dir = config.scratch_dir();
    let prefix = config.io_file_prefix.clone();
    run_blocking(Workload::Io, move || {
        run_io(mode, size, iter, &dir, &prefix).map_err(Into::into)
    })
    .await
}
