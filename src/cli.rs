//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "subalign", about = "dialogue corpora preprocessing tool.")]
/// Holds every command that is callable by the `subalign` command.
pub enum Subalign {
    #[structopt(about = "Extract aligned sentence pairs from an OpenSubtitles alignment file")]
    Align(Align),
    #[structopt(about = "Count link groups of an alignment file")]
    Count(Count),
    #[structopt(about = "Build a translation dictionary from a translation log")]
    Dict(Dict),
}

#[derive(Debug, StructOpt)]
/// Align command and parameters.
///
/// ```sh
/// subalign-align 0.1.0
/// Extract aligned sentence pairs from an OpenSubtitles alignment file
///
/// USAGE:
///     subalign align [FLAGS] [OPTIONS] <alignment> <base-dir> <origin> <dest> [ARGS]
///
/// ARGS:
///     <alignment>    alignment file (XCES, can be gzipped)
///     <base-dir>     directory containing the (decompressed) subtitle documents
///     <origin>       origin language output file, suffixed by _<sample-index>
///     <dest>         destination language output file, suffixed by _<sample-index>
///     <rate>         subsample rate: process one link group every <rate> [default: 1]
///     <index>        sample index, in [0, rate) [default: 0]
/// ```
pub struct Align {
    #[structopt(parse(from_os_str), help = "alignment file (XCES, can be gzipped)")]
    pub alignment: PathBuf,
    #[structopt(
        parse(from_os_str),
        help = "directory containing the (decompressed) subtitle documents"
    )]
    pub base_dir: PathBuf,
    #[structopt(
        parse(from_os_str),
        help = "origin language output file, suffixed by _<sample-index>"
    )]
    pub origin: PathBuf,
    #[structopt(
        parse(from_os_str),
        help = "destination language output file, suffixed by _<sample-index>"
    )]
    pub dest: PathBuf,
    #[structopt(
        help = "subsample rate: process one link group every <rate>",
        default_value = "1"
    )]
    pub rate: usize,
    #[structopt(help = "sample index, in [0, rate)", default_value = "0")]
    pub index: usize,
    #[structopt(
        long = "skip-missing",
        help = "skip link groups whose documents can't be read instead of aborting"
    )]
    pub skip_missing: bool,
    #[structopt(long = "no-count", help = "don't pre-count link groups for progress")]
    pub no_count: bool,
    #[structopt(
        long = "progress-every",
        help = "log progress every n processed groups (0 to disable)",
        default_value = "100"
    )]
    pub progress_every: usize,
    #[structopt(
        parse(from_os_str),
        long = "report",
        help = "write a json run summary to this file"
    )]
    pub report: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct Count {
    #[structopt(parse(from_os_str), help = "alignment file (XCES, can be gzipped)")]
    pub alignment: PathBuf,
}

#[derive(Debug, StructOpt)]
pub struct Dict {
    #[structopt(
        parse(from_os_str),
        help = "translation log (<original> $___$___$ <translated> lines)"
    )]
    pub log: PathBuf,
    #[structopt(parse(from_os_str), help = "json destination")]
    pub dst: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_defaults() {
        let opt = Subalign::from_iter(&["subalign", "align", "en-es.xml.gz", "raw", "en", "es"]);
        match opt {
            Subalign::Align(a) => {
                assert_eq!(a.rate, 1);
                assert_eq!(a.index, 0);
                assert!(!a.skip_missing);
                assert_eq!(a.progress_every, 100);
                assert!(a.report.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn align_sharded() {
        let opt = Subalign::from_iter(&[
            "subalign",
            "align",
            "--skip-missing",
            "en-es.xml",
            "raw",
            "en",
            "es",
            "4",
            "3",
        ]);
        match opt {
            Subalign::Align(a) => {
                assert_eq!((a.rate, a.index), (4, 3));
                assert!(a.skip_missing);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
