/*! Aligned sentence extraction

[Extractor] is a state accumulator fed with the [AlignEvent]s of a descriptor:

- on a selected group start, both documents are loaded into [SentenceTable]s,
- on each link of a selected group, the sentences are resolved and written as a line pair,
- on a selected group end, tables are dropped and progress is reported.

Non-selected groups are skipped without touching their documents.
!*/
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::Error,
    io::{writer::suffixed, PairWriter},
};

use super::{
    descriptor::{count_groups, AlignEvent, Descriptor},
    link::Link,
    progress::Progress,
    sampling::Sampling,
    sentences::SentenceTable,
};

/// What to do when a document of a selected group can't be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDocuments {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Log, skip the group and carry on.
    Skip,
}

#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    pub sampling: Sampling,
    pub missing_documents: MissingDocuments,
    /// Pre-count groups to get a progress estimate (reads the descriptor twice).
    pub count_groups: bool,
    /// Log progress at info level every n processed groups. 0 disables it.
    pub progress_every: usize,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            sampling: Sampling::default(),
            missing_documents: MissingDocuments::default(),
            count_groups: true,
            progress_every: 100,
        }
    }
}

/// Run summary.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub groups_seen: usize,
    pub groups_processed: usize,
    /// Selected groups that were skipped because of unreadable documents.
    pub groups_skipped: usize,
    pub links_written: usize,
    /// Links with an empty side.
    pub links_empty: usize,
    /// Links referencing unknown sentence ids.
    pub links_unresolved: usize,
}

/// Build the path of a document referenced by a `linkGrp`.
///
/// Documents are expected to be decompressed, so a trailing `.gz` is removed.
pub fn resolve_document(base_dir: &Path, declared: &str) -> PathBuf {
    let declared = declared.strip_suffix(".gz").unwrap_or(declared);
    base_dir.join(declared)
}

struct ActiveGroup {
    origin_doc: PathBuf,
    dest_doc: PathBuf,
    origin: SentenceTable,
    dest: SentenceTable,
}

enum GroupState {
    Outside,
    /// Inside a group that is not selected (or whose documents are unavailable).
    Skipped,
    Active(ActiveGroup),
}

pub struct Extractor<W: Write> {
    base_dir: PathBuf,
    options: ExtractorOptions,
    writer: PairWriter<W>,
    count: usize,
    group: GroupState,
    progress: Progress,
    stats: Stats,
}

impl<W: Write> Extractor<W> {
    /// `total_groups` is the (approximate) number of groups of the descriptor, if known.
    pub fn new(
        base_dir: &Path,
        writer: PairWriter<W>,
        options: ExtractorOptions,
        total_groups: Option<usize>,
    ) -> Self {
        let expected = total_groups.map(|t| options.sampling.expected(t));
        Self {
            base_dir: base_dir.to_path_buf(),
            options,
            writer,
            count: 0,
            group: GroupState::Outside,
            progress: Progress::new(expected),
            stats: Stats::default(),
        }
    }

    /// Feed every event of `events`, stopping at the first error.
    pub fn run<I>(&mut self, events: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Result<AlignEvent, Error>>,
    {
        for event in events {
            self.handle(event?)?;
        }
        if !matches!(self.group, GroupState::Outside) {
            return Err(Error::Parse("descriptor ends inside a linkGrp".to_string()));
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AlignEvent) -> Result<(), Error> {
        match event {
            AlignEvent::GroupStart { from_doc, to_doc } => self.group_start(&from_doc, &to_doc),
            AlignEvent::Link { xtargets } => self.link(&xtargets),
            AlignEvent::GroupEnd => self.group_end(),
        }
    }

    /// Flush outputs and return the summary along with the output sinks.
    pub fn finish(self) -> Result<(Stats, (W, W)), Error> {
        let sinks = self.writer.finish()?;
        Ok((self.stats, sinks))
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn group_start(&mut self, from_doc: &str, to_doc: &str) -> Result<(), Error> {
        if !matches!(self.group, GroupState::Outside) {
            return Err(Error::Parse(format!(
                "nested linkGrp ({} -> {})",
                from_doc, to_doc
            )));
        }

        let ordinal = self.count;
        self.count += 1;
        self.stats.groups_seen += 1;

        if !self.options.sampling.selects(ordinal) {
            self.group = GroupState::Skipped;
            return Ok(());
        }

        self.progress.start();
        let origin_doc = resolve_document(&self.base_dir, from_doc);
        let dest_doc = resolve_document(&self.base_dir, to_doc);
        debug!("group {}: {:?} -> {:?}", ordinal, origin_doc, dest_doc);

        match load_tables(&origin_doc, &dest_doc) {
            Ok((origin, dest)) => {
                self.group = GroupState::Active(ActiveGroup {
                    origin_doc,
                    dest_doc,
                    origin,
                    dest,
                });
                Ok(())
            }
            Err(Error::Io(e)) if self.options.missing_documents == MissingDocuments::Skip => {
                warn!(
                    "skipping group {} ({:?} -> {:?}): {}",
                    ordinal, origin_doc, dest_doc, e
                );
                self.stats.groups_skipped += 1;
                self.group = GroupState::Skipped;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn link(&mut self, xtargets: &str) -> Result<(), Error> {
        let group = match &self.group {
            GroupState::Active(g) => g,
            GroupState::Skipped => return Ok(()),
            GroupState::Outside => {
                return Err(Error::Parse(format!(
                    "link {:?} outside of a linkGrp",
                    xtargets
                )))
            }
        };

        let link = Link::from_xtargets(xtargets)?;
        if link.is_empty() {
            self.stats.links_empty += 1;
            return Ok(());
        }

        let resolved = (
            group.origin.join(&link.origin_ids),
            group.dest.join(&link.dest_ids),
        );
        let (side, id) = match resolved {
            (Ok(origin), Ok(dest)) => {
                self.writer.write_pair(&origin, &dest)?;
                self.stats.links_written += 1;
                return Ok(());
            }
            (Err(id), _) => ("origin", id),
            (_, Err(id)) => ("destination", id),
        };
        warn!(
            "[{:?} / {:?}] skipping link {:?} -> {:?}: unknown {} sentence {:?}",
            group.origin_doc, group.dest_doc, link.origin_ids, link.dest_ids, side, id
        );
        self.stats.links_unresolved += 1;
        Ok(())
    }

    fn group_end(&mut self) -> Result<(), Error> {
        match std::mem::replace(&mut self.group, GroupState::Outside) {
            GroupState::Active(_) => {
                self.stats.groups_processed += 1;
                let report = self.progress.tick();
                let every = self.options.progress_every;
                if report.is_last() || (every > 0 && report.processed % every == 0) {
                    info!("{}", report);
                } else {
                    debug!("{}", report);
                }
                Ok(())
            }
            GroupState::Skipped => Ok(()),
            GroupState::Outside => Err(Error::Parse(
                "linkGrp end without matching start".to_string(),
            )),
        }
    }
}

fn load_tables(origin: &Path, dest: &Path) -> Result<(SentenceTable, SentenceTable), Error> {
    Ok((SentenceTable::load(origin)?, SentenceTable::load(dest)?))
}

/// Extract aligned sentences of `alignment` into `<origin>_<index>` and `<dest>_<index>`.
pub fn extract(
    alignment: &Path,
    base_dir: &Path,
    origin: &Path,
    dest: &Path,
    options: ExtractorOptions,
) -> Result<Stats, Error> {
    let total_groups = if options.count_groups {
        info!("Gathering subtitles to process...");
        let total = count_groups(crate::io::open(alignment)?)?;
        info!("Found {} subtitles to process.", total);
        Some(total)
    } else {
        None
    };

    let index = options.sampling.index();
    let origin = suffixed(origin, index);
    let dest = suffixed(dest, index);
    let writer: PairWriter<BufWriter<File>> = PairWriter::create(&origin, &dest)?;

    let mut extractor = Extractor::new(base_dir, writer, options, total_groups);
    extractor.run(Descriptor::from_path(alignment)?)?;
    let (stats, _) = extractor.finish()?;

    info!(
        "wrote {} line pairs into {:?} and {:?}",
        stats.links_written, origin, dest
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_doc(dir: &Path, name: &str, sentences: &[(&str, &str)]) {
        let mut content = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<document>\n");
        for (id, text) in sentences {
            content.push_str(&format!("<s id=\"{}\">\n{}\n</s>\n", id, text));
        }
        content.push_str("</document>\n");
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn start(from: &str, to: &str) -> AlignEvent {
        AlignEvent::GroupStart {
            from_doc: from.to_string(),
            to_doc: to.to_string(),
        }
    }

    fn link(x: &str) -> AlignEvent {
        AlignEvent::Link {
            xtargets: x.to_string(),
        }
    }

    fn extractor(dir: &Path, options: ExtractorOptions) -> Extractor<Vec<u8>> {
        Extractor::new(dir, PairWriter::new(Vec::new(), Vec::new()), options, None)
    }

    fn outputs(e: Extractor<Vec<u8>>) -> (Stats, String, String) {
        let (stats, (o, d)) = e.finish().unwrap();
        (
            stats,
            String::from_utf8(o).unwrap(),
            String::from_utf8(d).unwrap(),
        )
    }

    #[test]
    fn resolve_strips_gz() {
        let base = Path::new("/data/OpenSubtitles/raw");
        assert_eq!(
            resolve_document(base, "en/1995/56/6262.xml.gz"),
            PathBuf::from("/data/OpenSubtitles/raw/en/1995/56/6262.xml")
        );
        assert_eq!(
            resolve_document(base, "en/1995/56/6262.xml"),
            PathBuf::from("/data/OpenSubtitles/raw/en/1995/56/6262.xml")
        );
    }

    #[test]
    fn one_to_many_link() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "en/a.xml", &[("s1", "Hi."), ("s2", "I'm Bob.")]);
        write_doc(dir.path(), "es/a.xml", &[("s3", "Hola, soy Bob.")]);

        let mut e = extractor(dir.path(), ExtractorOptions::default());
        e.run(vec![
            Ok(start("en/a.xml.gz", "es/a.xml.gz")),
            Ok(link("s1 s2;s3")),
            Ok(AlignEvent::GroupEnd),
        ])
        .unwrap();

        let (stats, o, d) = outputs(e);
        assert_eq!(o, "Hi. I'm Bob.\n");
        assert_eq!(d, "Hola, soy Bob.\n");
        assert_eq!(stats.links_written, 1);
        assert_eq!(stats.groups_processed, 1);
    }

    #[test]
    fn empty_and_unresolved_links() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "en/a.xml", &[("1", "One."), ("2", "Two.")]);
        write_doc(dir.path(), "es/a.xml", &[("1", "Uno."), ("2", "Dos.")]);

        let mut e = extractor(dir.path(), ExtractorOptions::default());
        e.run(vec![
            Ok(start("en/a.xml", "es/a.xml")),
            Ok(link(";1")),
            Ok(link("1;")),
            Ok(link("1;9")),
            Ok(link("2;2")),
            Ok(AlignEvent::GroupEnd),
        ])
        .unwrap();

        let (stats, o, d) = outputs(e);
        assert_eq!(o, "Two.\n");
        assert_eq!(d, "Dos.\n");
        assert_eq!(stats.links_empty, 2);
        assert_eq!(stats.links_unresolved, 1);
        assert_eq!(stats.links_written, 1);
    }

    #[test]
    fn skipped_groups_do_not_load_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "en/b.xml", &[("1", "B.")]);
        write_doc(dir.path(), "es/b.xml", &[("1", "Be.")]);

        // group 0 references missing documents, but is not selected
        let options = ExtractorOptions {
            sampling: Sampling::new(2, 1).unwrap(),
            ..Default::default()
        };
        let mut e = extractor(dir.path(), options);
        e.run(vec![
            Ok(start("en/missing.xml", "es/missing.xml")),
            Ok(link("1;1")),
            Ok(AlignEvent::GroupEnd),
            Ok(start("en/b.xml", "es/b.xml")),
            Ok(link("1;1")),
            Ok(AlignEvent::GroupEnd),
        ])
        .unwrap();

        let (stats, o, d) = outputs(e);
        assert_eq!((o.as_str(), d.as_str()), ("B.\n", "Be.\n"));
        assert_eq!(stats.groups_seen, 2);
        assert_eq!(stats.groups_processed, 1);
    }

    #[test]
    fn missing_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = extractor(dir.path(), ExtractorOptions::default());
        let r = e.run(vec![Ok(start("en/missing.xml", "es/missing.xml"))]);
        assert!(matches!(r, Err(Error::Io(_))));
    }

    #[test]
    fn missing_document_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "en/b.xml", &[("1", "B.")]);
        write_doc(dir.path(), "es/b.xml", &[("1", "Be.")]);

        let options = ExtractorOptions {
            missing_documents: MissingDocuments::Skip,
            ..Default::default()
        };
        let mut e = extractor(dir.path(), options);
        e.run(vec![
            Ok(start("en/missing.xml", "es/b.xml")),
            Ok(link("1;1")),
            Ok(AlignEvent::GroupEnd),
            Ok(start("en/b.xml", "es/b.xml")),
            Ok(link("1;1")),
            Ok(AlignEvent::GroupEnd),
        ])
        .unwrap();

        let (stats, o, _) = outputs(e);
        assert_eq!(o, "B.\n");
        assert_eq!(stats.groups_skipped, 1);
        assert_eq!(stats.groups_processed, 1);
    }

    #[test]
    fn structural_errors() {
        let dir = tempfile::tempdir().unwrap();

        let mut e = extractor(dir.path(), ExtractorOptions::default());
        assert!(matches!(e.handle(link("1;1")), Err(Error::Parse(_))));

        let mut e = extractor(dir.path(), ExtractorOptions::default());
        assert!(matches!(e.handle(AlignEvent::GroupEnd), Err(Error::Parse(_))));

        let options = ExtractorOptions {
            sampling: Sampling::new(2, 1).unwrap(),
            ..Default::default()
        };
        let mut e = extractor(dir.path(), options);
        let r = e.run(vec![Ok(start("a", "b"))]);
        assert!(matches!(r, Err(Error::Parse(_))));
    }

    #[test]
    fn malformed_xtargets_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "a.xml", &[("1", "A.")]);
        let mut e = extractor(dir.path(), ExtractorOptions::default());
        let r = e.run(vec![Ok(start("a.xml", "a.xml")), Ok(link("1"))]);
        assert!(matches!(r, Err(Error::Parse(_))));
    }
}
