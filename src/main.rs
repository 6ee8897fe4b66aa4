//! # subalign
//!
//! Preprocessing of dialogue corpora, with extraction of aligned sentence pairs
//! from OpenSubtitles (OPUS) alignment files at its core.
//!
//! ## Getting started
//!
//! ```sh
//! subalign 0.1.0
//! dialogue corpora preprocessing tool.
//!
//! USAGE:
//!     subalign <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     align    Extract aligned sentence pairs from an OpenSubtitles alignment file
//!     count    Count link groups of an alignment file
//!     dict     Build a translation dictionary from a translation log
//!     help     Prints this message or the help of the given subcommand(s)
//! ```
//!
//! Large alignment files can be split between processes with the subsample arguments:
//! `subalign align en-es.xml.gz raw/ en es 4 0` processes groups 0, 4, 8...
//! and writes `en_0` and `es_0`.
use std::fs::File;
use std::io::BufWriter;

use structopt::StructOpt;
use subalign::{
    alignment::{self, ExtractorOptions, MissingDocuments, Sampling},
    error::Error,
    io,
    text::{self, TranslationDict},
};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Subalign::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Subalign::Align(a) => {
            let options = ExtractorOptions {
                sampling: Sampling::new(a.rate, a.index)?,
                missing_documents: if a.skip_missing {
                    MissingDocuments::Skip
                } else {
                    MissingDocuments::Abort
                },
                count_groups: !a.no_count,
                progress_every: a.progress_every,
            };
            let stats = alignment::extract(&a.alignment, &a.base_dir, &a.origin, &a.dest, options)?;
            info!("{:?}", stats);

            if let Some(report) = a.report {
                let f = BufWriter::new(File::create(&report)?);
                serde_json::to_writer_pretty(f, &stats)?;
            }
        }

        cli::Subalign::Count(c) => {
            let total = alignment::count_groups(io::open(&c.alignment)?)?;
            println!("{}", total);
        }

        cli::Subalign::Dict(d) => {
            let dict = TranslationDict::from_log(&d.log)?;
            info!(
                "{} entries, {} original chars, {} translated chars",
                dict.len(),
                text::count_chars(dict.originals()),
                text::count_chars(dict.translations())
            );
            let f = BufWriter::new(File::create(&d.dst)?);
            serde_json::to_writer(f, &dict)?;
        }
    };
    Ok(())
}
