/*! Input opening

Alignment files are usually distributed gzipped (`en-es.xml.gz`),
while subtitle documents are expected to be decompressed beforehand.
Both go through [open], which picks a gzip decoder from the file extension.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::Error;

/// Returns `true` if `path` ends in `.gz`.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Open `path` for buffered reading, decompressing on the fly if it is a `.gz` file.
pub fn open(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let f = File::open(path)?;
    if is_gzip(path) {
        debug!("opening {:?} as gzip", path);
        // multi-member gzip files are common for concatenated shards.
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Open a subtitle document whose path already had its `.gz` suffix stripped.
///
/// If the decompressed file is not there but `<path>.gz` is, the compressed one is read instead.
/// When neither exists, the error of the decompressed path is returned.
pub fn open_document(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    match File::open(path) {
        Ok(f) => Ok(Box::new(BufReader::new(f))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let mut gz = path.as_os_str().to_owned();
            gz.push(".gz");
            let gz = PathBuf::from(gz);
            if gz.is_file() {
                debug!("{:?} not found, falling back on {:?}", path, gz);
                open(&gz)
            } else {
                Err(Error::Io(e))
            }
        }
        Err(e) => Err(Error::Io(e)),
    }
}
