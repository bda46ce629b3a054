use super::Result;
use crate::highlighter::{Alignment, SequenceRecord};
use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

pub fn open_alignment_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

pub fn read_sequence_records<R: ioRead>(reader: R) -> Result<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    for result in fasta::Reader::new(reader).records() {
        let record = result.map_err(|e| format!("Malformed FASTA record: {}", e))?;
        let residues = String::from_utf8_lossy(record.seq())
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();
        records.push(SequenceRecord::new(record.id(), residues));
    }
    Ok(records)
}

pub fn read_alignment(path: &Path) -> Result<Alignment> {
    let reader = open_alignment_reader(path)?;
    let records = read_sequence_records(reader)?;
    let alignment = Alignment::new(records)?;
    log::info!(
        "Loaded {} sequences ({} columns) from {}",
        alignment.len(),
        alignment.width(),
        path.display()
    );
    Ok(alignment)
}
