//! `xtargets` parsing.
use crate::error::Error;

/// A sentence-level correspondence: origin sentence ids and destination sentence ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub origin_ids: Vec<String>,
    pub dest_ids: Vec<String>,
}

impl Link {
    /// Parse an `xtargets` attribute (`"1 2;3"`).
    ///
    /// Ids are whitespace-separated, and exactly one `;` separates both sides.
    /// Sides may be empty (`";3"`), see [Link::is_empty].
    pub fn from_xtargets(xtargets: &str) -> Result<Self, Error> {
        let mut sides = xtargets.split(';');
        match (sides.next(), sides.next(), sides.next()) {
            (Some(origin), Some(dest), None) => Ok(Self {
                origin_ids: split_ids(origin),
                dest_ids: split_ids(dest),
            }),
            _ => Err(Error::Parse(format!(
                "invalid xtargets {:?}: expected exactly one ';'",
                xtargets
            ))),
        }
    }

    /// `true` if one of the sides has no sentence, meaning that the link is an insertion/deletion.
    pub fn is_empty(&self) -> bool {
        self.origin_ids.is_empty() || self.dest_ids.is_empty()
    }
}

fn split_ids(side: &str) -> Vec<String> {
    side.split_whitespace().map(String::from).collect()
}
