//! Trace file writer that opens its file on first use

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

/// A trace file that is only created when something is actually logged
///
/// A run with nothing to report leaves no file behind. If the file is deleted while
/// the viewer runs, the next write creates it again.
#[derive(Clone)]
pub struct LazyFileWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyFileWriter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Arc::new(Mutex::new(None)),
        }
    }
}

/// Writer handed out per event; shares the file handle of its [`LazyFileWriter`]
pub struct LazyWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyWriter {
    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("trace file mutex poisoned"))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for LazyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file_guard = self.lock()?;

        // Create the file on first write, or again if it was deleted
        if file_guard.is_none() || !self.path.exists() {
            *file_guard = Some(open_append(&self.path)?);
        }

        match file_guard.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("trace file handle unexpectedly missing")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file_guard = self.lock()?;

        if !self.path.exists() {
            // Deleted underneath us; drop the stale handle
            *file_guard = None;
            return Ok(());
        }

        file_guard.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for LazyFileWriter {
    type Writer = LazyWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LazyWriter {
            path: self.path.clone(),
            file: Arc::clone(&self.file),
        }
    }
}
