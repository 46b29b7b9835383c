//! Writers and readers for the finished models.
//!
//! Nothing here transforms data: models go out exactly as they were built.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::{BigramModel, SentenceLengths};

/// Writes a bigram model as JSON.
///
/// Layout: `{ word1: { "total": n, "transitions": { word2: p } } }`.
pub fn write_bigram_json<W: Write>(model: &BigramModel, writer: W) -> Result<()> {
	serde_json::to_writer_pretty(writer, model)?;
	Ok(())
}

/// Reads a bigram model written by [`write_bigram_json`].
pub fn read_bigram_json<R: Read>(reader: R) -> Result<BigramModel> {
	Ok(serde_json::from_reader(reader)?)
}

pub fn save_bigram_json<P: AsRef<Path>>(model: &BigramModel, path: P) -> Result<()> {
	let mut writer = BufWriter::new(File::create(path)?);
	write_bigram_json(model, &mut writer)?;
	writer.flush()?;
	Ok(())
}

pub fn load_bigram_json<P: AsRef<Path>>(path: P) -> Result<BigramModel> {
	read_bigram_json(BufReader::new(File::open(path)?))
}

/// Writes a compact binary snapshot of a bigram model (`postcard`).
pub fn save_bigram_binary<P: AsRef<Path>>(model: &BigramModel, path: P) -> Result<()> {
	let bytes = postcard::to_stdvec(model)?;
	std::fs::write(path, bytes)?;
	Ok(())
}

pub fn load_bigram_binary<P: AsRef<Path>>(path: P) -> Result<BigramModel> {
	let bytes = std::fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

/// Writes the sentence-length table as CSV with the columns `gloss,length`.
///
/// Rows are written in the table's order.
pub fn write_lengths_csv<W: Write>(lengths: &SentenceLengths, writer: W) -> Result<()> {
	let mut csv_writer = csv::Writer::from_writer(writer);
	if lengths.is_empty() {
		csv_writer.write_record(["gloss", "length"])?;
	}
	for entry in lengths.entries() {
		csv_writer.serialize(entry)?;
	}
	csv_writer.flush()?;
	Ok(())
}

pub fn save_lengths_csv<P: AsRef<Path>>(lengths: &SentenceLengths, path: P) -> Result<()> {
	write_lengths_csv(lengths, File::create(path)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{build_bigram_model, collect_lengths, RawCountRecord};

	fn model() -> BigramModel {
		build_bigram_model(&[
			RawCountRecord::new("a", "b", 3),
			RawCountRecord::new("a", "c", 1),
			RawCountRecord::new("b", "a", 2),
		])
		.unwrap()
	}

	#[test]
	fn json_keeps_total_out_of_transitions() {
		let mut out = Vec::new();
		write_bigram_json(&model(), &mut out).unwrap();
		let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

		assert_eq!(value["a"]["total"], 4);
		assert_eq!(value["a"]["transitions"]["b"], 0.75);
		assert_eq!(value["a"]["transitions"]["c"], 0.25);
		assert_eq!(value["a"]["transitions"].as_object().unwrap().len(), 2);
		assert_eq!(value["b"]["transitions"]["a"], 1.0);
	}

	#[test]
	fn json_is_deterministic() {
		let mut first = Vec::new();
		let mut second = Vec::new();
		write_bigram_json(&model(), &mut first).unwrap();
		write_bigram_json(&model(), &mut second).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn binary_snapshot_reloads() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.bin");
		save_bigram_binary(&model(), &path).unwrap();
		assert_eq!(load_bigram_binary(&path).unwrap(), model());
	}

	#[test]
	fn csv_has_gloss_and_length_columns() {
		let lengths = collect_lengths(["hello world", "this has numbers"]);
		let mut out = Vec::new();
		write_lengths_csv(&lengths, &mut out).unwrap();
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"gloss,length\nhello world,2\nthis has numbers,3\n"
		);
	}

	#[test]
	fn empty_csv_still_has_a_header() {
		let mut out = Vec::new();
		write_lengths_csv(&SentenceLengths::default(), &mut out).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "gloss,length\n");
	}
}
