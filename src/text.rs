/*! Text utilities

Small helpers shared by dialogue corpora preprocessing:
delimiter splitting (Cornell movie lines use `+++$+++`), line normalization,
character counting and translation dictionaries.

A translation log holds one `<original> $___$___$ <translated>` pair per line.
!*/
use std::{
    collections::BTreeMap,
    io::BufRead,
    path::Path,
};

use log::{debug, info};
use serde::Serialize;

use crate::{error::Error, io::reader};

/// Separator used in translation logs.
pub const TRANSLATION_SEPARATOR: &str = "$___$___$";

/// Split `line` on every occurrence of `delim`.
///
/// Pieces are trimmed, as is the remainder after the last delimiter.
/// A line without any delimiter is returned untouched.
pub fn split_line(line: &str, delim: &str) -> Vec<String> {
    if delim.is_empty() || !line.contains(delim) {
        return vec![line.to_string()];
    }
    line.split(delim).map(|piece| piece.trim().to_string()).collect()
}

/// Make a text fit on a single line: `\n` become spaces, `\r` are removed.
pub fn normalize_line(text: &str) -> String {
    text.replace('\n', " ").replace('\r', "")
}

/// Total number of characters (unicode scalar values) of `texts`.
pub fn count_chars<I, S>(texts: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts.into_iter().map(|t| t.as_ref().chars().count()).sum()
}

/// Original text -> translated text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationDict {
    entries: BTreeMap<String, String>,
}

impl TranslationDict {
    /// Load a translation log. See [TranslationDict::from_log_reader].
    pub fn from_log(path: &Path) -> Result<Self, Error> {
        debug!("reading translation log {:?}", path);
        Self::from_log_reader(reader::open(path)?)
    }

    /// Lines that do not split into exactly two pieces on [TRANSLATION_SEPARATOR] are ignored.
    /// Later lines override earlier ones.
    pub fn from_log_reader<R: BufRead>(src: R) -> Result<Self, Error> {
        let mut entries = BTreeMap::new();
        let mut nb_ignored = 0;
        for line in src.lines() {
            let line = line?;
            let mut pieces = split_line(&line, TRANSLATION_SEPARATOR);
            if pieces.len() == 2 {
                let translated = pieces.pop().unwrap_or_default();
                let original = pieces.pop().unwrap_or_default();
                entries.insert(original, translated);
            } else {
                nb_ignored += 1;
            }
        }
        if nb_ignored > 0 {
            info!("ignored {} malformed translation log lines", nb_ignored);
        }
        Ok(Self { entries })
    }

    /// Pair lines of `origin` and `translated` positionally, stopping at the shorter one.
    pub fn from_parallel<R1: BufRead, R2: BufRead>(origin: R1, translated: R2) -> Result<Self, Error> {
        let mut entries = BTreeMap::new();
        for (o, t) in origin.lines().zip(translated.lines()) {
            entries.insert(normalize_line(&o?), normalize_line(&t?));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    /// Translate `text` after normalizing it, if known.
    pub fn translate(&self, text: &str) -> Option<&str> {
        self.get(normalize_line(text).as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn originals(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn translations(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}
