/*! OpenSubtitles alignment extraction

Alignment files (XCES) group sentence links by document pair.
The descriptor is streamed ([descriptor]), each selected group loads its two documents ([sentences]),
and links ([link]) are turned into line pairs by the [extractor].
!*/
pub mod descriptor;
pub mod extractor;
pub mod link;
mod progress;
pub mod sampling;
pub mod sentences;

pub use descriptor::{count_groups, AlignEvent, Descriptor};
pub use extractor::{
    extract, resolve_document, Extractor, ExtractorOptions, MissingDocuments, Stats,
};
pub use link::Link;
pub use progress::{Progress, Report};
pub use sampling::Sampling;
pub use sentences::SentenceTable;
