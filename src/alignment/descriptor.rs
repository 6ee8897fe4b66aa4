/*! Alignment descriptor reading

An XCES alignment file looks like this:

```xml
<cesAlign version="1.0">
<linkGrp targType="s" fromDoc="en/1995/56/6262.xml.gz" toDoc="es/1995/56/5810.xml.gz" >
<link id="SL0" xtargets="1;1" />
<link id="SL1" xtargets="2 3;2" />
</linkGrp>
</cesAlign>
```

[Descriptor] streams it and yields one [AlignEvent] per `linkGrp` start/end and per `link`.
Anything else is skipped.
!*/
use std::{io::BufRead, path::Path};

use log::debug;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{error::Error, io::reader};

const LINK_GROUP: &[u8] = b"linkGrp";
const LINK: &[u8] = b"link";

/// Structural events of an alignment descriptor, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignEvent {
    GroupStart { from_doc: String, to_doc: String },
    Link { xtargets: String },
    GroupEnd,
}

/// Pull-based reader over an alignment descriptor.
pub struct Descriptor<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    // set when a self-closing linkGrp has been seen, so that its end is yielded next.
    pending_end: bool,
    done: bool,
}

impl Descriptor<Box<dyn BufRead>> {
    /// Open a (possibly gzipped) descriptor file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        debug!("opening alignment descriptor {:?}", path);
        Ok(Self::new(reader::open(path)?))
    }
}

impl<R: BufRead> Descriptor<R> {
    pub fn new(src: R) -> Self {
        let mut reader = Reader::from_reader(src);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            pending_end: false,
            done: false,
        }
    }

    /// Position in the underlying stream, in bytes.
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    fn next_event(&mut self) -> Result<Option<AlignEvent>, Error> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(Some(AlignEvent::GroupEnd));
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) if e.name().as_ref() == LINK_GROUP => {
                    return group_start(&e).map(Some);
                }
                Event::Empty(e) if e.name().as_ref() == LINK_GROUP => {
                    let start = group_start(&e)?;
                    self.pending_end = true;
                    return Ok(Some(start));
                }
                Event::End(e) if e.name().as_ref() == LINK_GROUP => {
                    return Ok(Some(AlignEvent::GroupEnd));
                }
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == LINK => {
                    let xtargets = required_attribute(&e, b"xtargets")?;
                    return Ok(Some(AlignEvent::Link { xtargets }));
                }
                Event::Eof => return Ok(None),
                _ => (),
            }
        }
    }
}

impl<R: BufRead> Iterator for Descriptor<R> {
    type Item = Result<AlignEvent, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // the xml reader state is not usable after an error.
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn group_start(e: &BytesStart) -> Result<AlignEvent, Error> {
    Ok(AlignEvent::GroupStart {
        from_doc: required_attribute(e, b"fromDoc")?,
        to_doc: required_attribute(e, b"toDoc")?,
    })
}

fn required_attribute(e: &BytesStart, name: &[u8]) -> Result<String, Error> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(attr.unescape_value()?.into_owned()),
        None => Err(Error::Parse(format!(
            "<{}> without {} attribute",
            String::from_utf8_lossy(e.name().as_ref()),
            String::from_utf8_lossy(name)
        ))),
    }
}

/// Approximate number of link groups in a descriptor.
///
/// Counts the lines that mention `linkGrp` and halves the result:
/// XCES files have the opening and the closing tag on their own lines,
/// so every group is seen twice. Self-closing groups or single-line files
/// make this an underestimate, which is fine since it's only used for progress.
pub fn count_groups<R: BufRead>(src: R) -> Result<usize, Error> {
    let mut nb_lines = 0;
    for line in src.split(b'\n') {
        let line = line?;
        if line.windows(LINK_GROUP.len()).any(|w| w == LINK_GROUP) {
            nb_lines += 1;
        }
    }
    Ok(nb_lines / 2)
}
