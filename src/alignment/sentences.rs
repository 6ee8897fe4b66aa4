/*! Subtitle documents

OPUS subtitle documents hold one `<s>` element per sentence,
either with raw text or with one `<w>` element per token, interleaved with `<time>` markers:

```xml
<document id="6262">
  <s id="1">
    <time id="T1S" value="00:00:51,819" />
    <w id="1.1">Hello</w>
    <w id="1.2">!</w>
  </s>
</document>
```

A [SentenceTable] maps each `<s>` id to its text.
!*/
use std::{collections::HashMap, io::BufRead, path::Path};

use log::debug;
use quick_xml::{events::Event, Reader};

use crate::{error::Error, io::reader};

const SENTENCE: &[u8] = b"s";

/// Sentence id -> normalized sentence text, for a single document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SentenceTable {
    sentences: HashMap<String, String>,
}

impl SentenceTable {
    /// Read and parse the document at `path`.
    ///
    /// Xml errors are reported as [Error::Parse] naming the document.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let src = reader::open_document(path)?;
        let table = Self::from_reader(src).map_err(|e| match e {
            Error::Xml(e) => Error::Parse(format!("{:?}: {}", path, e)),
            e => e,
        })?;
        debug!("loaded {} sentences from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(src: R) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(src);
        let mut buf = Vec::new();
        let mut sentences = HashMap::new();

        // id and raw text of the sentence being read
        let mut current: Option<(String, String)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == SENTENCE => {
                    current = Some((sentence_id(&e)?, String::new()));
                }
                Event::Empty(e) if e.name().as_ref() == SENTENCE => {
                    sentences.entry(sentence_id(&e)?).or_insert_with(String::new);
                }
                Event::End(e) if e.name().as_ref() == SENTENCE => {
                    if let Some((id, raw)) = current.take() {
                        // first occurrence wins on duplicate ids
                        sentences
                            .entry(id)
                            .or_insert_with(|| normalize_sentence(&raw));
                    }
                }
                Event::Text(e) => {
                    if let Some((_, raw)) = current.as_mut() {
                        raw.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some((_, raw)) = current.as_mut() {
                        raw.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => (),
            }
            buf.clear();
        }

        Ok(Self { sentences })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.sentences.get(id).map(String::as_str)
    }

    /// Resolve every id, joining the texts with a space.
    ///
    /// Returns the first unknown id on failure.
    pub fn join<'a, I>(&self, ids: I) -> Result<String, &'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut texts = Vec::new();
        for id in ids {
            texts.push(self.get(id).ok_or(id.as_str())?);
        }
        Ok(texts.join(" "))
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

fn sentence_id(e: &quick_xml::events::BytesStart) -> Result<String, Error> {
    match e.try_get_attribute(b"id")? {
        Some(attr) => Ok(attr.unescape_value()?.into_owned()),
        None => Err(Error::Parse("<s> without id attribute".to_string())),
    }
}

/// Collapse whitespace runs that contain a newline into a single space, then trim.
///
/// Whitespace runs without newlines are kept as is.
pub fn normalize_sentence(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut run = String::new();
    for c in raw.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            if !out.is_empty() {
                if run.contains('\n') {
                    out.push(' ');
                } else {
                    out.push_str(&run);
                }
            }
            run.clear();
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENIZED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<document id="6262">
  <s id="1">
    <time id="T1S" value="00:00:51,819" />
    <w id="1.1">Hello</w>
    <w id="1.2">!</w>
    <time id="T1E" value="00:00:53,200" />
  </s>
  <s id="2">
    <w id="2.1">Tom</w>
    <w id="2.2">&amp;</w>
    <w id="2.3">Jerry</w>
  </s>
  <s id="3"/>
</document>
"#;

    const RAW: &str = r#"<document>
<s id="1"><time id="T1S" value="00:00:01,000"/>Where are
you going?</s>
<s id="2">Home.</s>
<s id="2">Duplicate.</s>
</document>"#;

    #[test]
    fn tokenized_document() {
        let t = SentenceTable::from_reader(TOKENIZED.as_bytes()).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("1"), Some("Hello !"));
        assert_eq!(t.get("2"), Some("Tom & Jerry"));
        assert_eq!(t.get("3"), Some(""));
        assert_eq!(t.get("4"), None);
    }

    #[test]
    fn raw_document() {
        let t = SentenceTable::from_reader(RAW.as_bytes()).unwrap();
        assert_eq!(t.get("1"), Some("Where are you going?"));
        assert_eq!(t.get("2"), Some("Home."));
    }

    #[test]
    fn join_ids() {
        let t = SentenceTable::from_reader(RAW.as_bytes()).unwrap();
        let ids = vec!["1".to_string(), "2".to_string()];
        assert_eq!(t.join(&ids), Ok("Where are you going? Home.".to_string()));
        let ids = vec!["1".to_string(), "9".to_string()];
        assert_eq!(t.join(&ids), Err("9"));
    }

    #[test]
    fn malformed_document() {
        let r = SentenceTable::from_reader("<document><s id=\"1\">a</document>".as_bytes());
        assert!(matches!(r, Err(Error::Xml(_))));
    }

    #[test]
    fn load_names_document() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.xml");
        std::fs::write(&p, "<document><s id=\"1\">a</document>").unwrap();
        match SentenceTable::load(&p) {
            Err(Error::Parse(msg)) => assert!(msg.contains("bad.xml")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_sentence("\n  a\n  b \n"), "a b");
        assert_eq!(normalize_sentence("a  b"), "a  b");
        assert_eq!(normalize_sentence("a\r\nb"), "a b");
        assert_eq!(normalize_sentence("   "), "");
    }
}
