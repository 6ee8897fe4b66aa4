use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::Error;

/// Append `_<index>` to the file name of `path` (`out/en.txt` -> `out/en.txt_0`).
pub fn suffixed(path: &Path, index: usize) -> PathBuf {
    let mut p = path.as_os_str().to_owned();
    p.push(format!("_{}", index));
    PathBuf::from(p)
}

/// Line-aligned writer over an origin and a destination sink.
pub struct PairWriter<W: Write> {
    origin: W,
    dest: W,
    nb_lines: u64,
}

impl PairWriter<BufWriter<File>> {
    /// Create (truncating) both output files.
    pub fn create(origin: &Path, dest: &Path) -> Result<Self, Error> {
        debug!("creating output files {:?} and {:?}", origin, dest);
        let origin = BufWriter::new(File::create(origin)?);
        let dest = BufWriter::new(File::create(dest)?);
        Ok(Self::new(origin, dest))
    }
}

impl<W: Write> PairWriter<W> {
    pub fn new(origin: W, dest: W) -> Self {
        Self {
            origin,
            dest,
            nb_lines: 0,
        }
    }

    /// Write one line on each side.
    ///
    /// Newlines inside `origin`/`dest` would break the alignment, so they are replaced by spaces.
    pub fn write_pair(&mut self, origin: &str, dest: &str) -> Result<(), Error> {
        write_line(&mut self.origin, origin)?;
        write_line(&mut self.dest, dest)?;
        self.nb_lines += 1;
        Ok(())
    }

    /// Number of line pairs written so far.
    pub fn nb_lines(&self) -> u64 {
        self.nb_lines
    }

    /// Flush both sides and give the sinks back.
    pub fn finish(mut self) -> Result<(W, W), Error> {
        self.origin.flush()?;
        self.dest.flush()?;
        debug!("flushed {} line pairs", self.nb_lines);
        Ok((self.origin, self.dest))
    }
}

fn write_line<W: Write>(w: &mut W, line: &str) -> Result<(), Error> {
    if line.contains('\n') {
        w.write_all(line.replace('\n', " ").as_bytes())?;
    } else {
        w.write_all(line.as_bytes())?;
    }
    w.write_all(b"\n")?;
    Ok(())
}
