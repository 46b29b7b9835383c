use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads a whole text file into memory.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Default location of a model built from `counts_path`: same directory and
/// stem, new extension.
///
/// Example:
/// `corpus/en/counts.txt` + `"bin"` → `corpus/en/counts.bin`
///
/// # Errors
/// `InvalidInput` if `counts_path` has no file name (e.g. `..` or `/`).
pub fn build_output_path<P: AsRef<Path>>(counts_path: P, extension: &str) -> io::Result<PathBuf> {
	let counts_path = counts_path.as_ref();
	let stem = counts_path.file_stem().ok_or_else(|| {
		io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("{} has no file name", counts_path.display()),
		)
	})?;

	let mut file_name = stem.to_os_string();
	file_name.push(".");
	file_name.push(extension);
	Ok(counts_path.with_file_name(file_name))
}

/// Paths of the first `upper_bound` WikiExtractor output files in `dir`.
///
/// Files are named `wiki_00`, `wiki_01`, ... (at least two digits).
pub fn wiki_chunk_paths<P: AsRef<Path>>(dir: P, upper_bound: usize) -> Vec<PathBuf> {
	(0..upper_bound)
		.map(|i| dir.as_ref().join(format!("wiki_{:02}", i)))
		.collect()
}

/// Concatenates text chunks, in the given order, into one corpus snapshot.
///
/// # Errors
/// The first chunk that is missing or unreadable stops the read.
pub fn read_snapshot<I, P>(paths: I) -> io::Result<String>
where
	I: IntoIterator<Item = P>,
	P: AsRef<Path>,
{
	let mut snapshot = String::new();
	for path in paths {
		let path = path.as_ref();
		let chunk = fs::read_to_string(path)
			.map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
		log::debug!("read {} bytes from {}", chunk.len(), path.display());
		snapshot.push_str(&chunk);
	}
	Ok(snapshot)
}
