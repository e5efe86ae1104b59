//! Batch processing of many registry PDFs.
//!
//! Every file is handled independently: a file that fails to decode yields
//! an error outcome next to the records of the other files. Outcomes are
//! returned in input order whatever order the files finished in.
//!
//! Inputs are loaded by the worker that processes them, so at most
//! `max_concurrency` files are held in memory at any time.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use touki_core::{ExtractOptions, OwnershipRecord, PdfError, parse};

use crate::document::Document;

/// One input file: a display name and its bytes.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// An item of a batch that is turned into bytes when a worker picks it up.
pub trait BatchInput: Send {
    /// Load the input, or return the outcome that rejects it.
    fn load(self, options: &ExtractOptions) -> Result<InputFile, FileOutcome>;
}

impl BatchInput for InputFile {
    fn load(self, _options: &ExtractOptions) -> Result<InputFile, FileOutcome> {
        Ok(self)
    }
}

/// Files on disk are checked against `max_input_bytes` before they are read.
#[cfg(feature = "std")]
impl BatchInput for std::path::PathBuf {
    fn load(self, options: &ExtractOptions) -> Result<InputFile, FileOutcome> {
        let name = self.display().to_string();
        let rejected = |size: usize, error: PdfError| FileOutcome {
            name: name.clone(),
            size,
            result: Err(error),
        };

        let size = match std::fs::metadata(&self) {
            Ok(meta) => usize::try_from(meta.len()).unwrap_or(usize::MAX),
            Err(e) => return Err(rejected(0, PdfError::from(e))),
        };
        options
            .check_input_size(size)
            .map_err(|e| rejected(size, e))?;

        match std::fs::read(&self) {
            Ok(bytes) => Ok(InputFile::new(name.clone(), bytes)),
            Err(e) => Err(rejected(size, PdfError::from(e))),
        }
    }
}

/// Options for [`process_batch`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of files processed at once (default: available parallelism).
    ///
    /// Only the `parallel` feature processes more than one file at a time.
    pub max_concurrency: usize,
    /// Extraction options applied to every file.
    pub extract: ExtractOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            extract: ExtractOptions::default(),
        }
    }
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    /// Name of the input file.
    pub name: String,
    /// Input size in bytes.
    pub size: usize,
    /// Records of the file, or the error that stopped it.
    pub result: Result<Vec<OwnershipRecord>, PdfError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Completion notice passed to the progress callback.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Number of files finished so far, this one included.
    pub current: usize,
    /// Number of files in the batch.
    pub total: usize,
    /// The outcome that was just produced.
    pub outcome: &'a FileOutcome,
}

/// Process every input and return one outcome per input, in input order.
pub fn process_batch<I: BatchInput>(inputs: Vec<I>, options: &BatchOptions) -> Vec<FileOutcome> {
    process_batch_with_progress(inputs, options, |_| {})
}

/// Like [`process_batch`], calling `on_progress` as each input finishes.
///
/// With the `parallel` feature the callback may be invoked from several
/// worker threads, in completion order.
pub fn process_batch_with_progress<I, F>(
    inputs: Vec<I>,
    options: &BatchOptions,
    on_progress: F,
) -> Vec<FileOutcome>
where
    I: BatchInput,
    F: Fn(BatchProgress<'_>) + Sync,
{
    let total = inputs.len();
    let done = AtomicUsize::new(0);
    let run = |input: I| {
        let outcome = match input.load(&options.extract) {
            Ok(file) => process_file(file, &options.extract),
            Err(rejected) => rejected,
        };
        let current = done.fetch_add(1, Ordering::SeqCst) + 1;
        on_progress(BatchProgress {
            current,
            total,
            outcome: &outcome,
        });
        outcome
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        match rayon::ThreadPoolBuilder::new()
            .num_threads(options.max_concurrency.max(1))
            .build()
        {
            Ok(pool) => return pool.install(|| inputs.into_par_iter().map(run).collect()),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "could not build worker pool, processing sequentially");
            }
        }
    }

    inputs.into_iter().map(run).collect()
}

/// Extract and parse one file.
///
/// The input bytes are released as soon as the text has been produced.
pub fn process_file(file: InputFile, options: &ExtractOptions) -> FileOutcome {
    let InputFile { name, bytes } = file;
    let size = bytes.len();

    let text = Document::open(&bytes, Some(options.clone())).and_then(|doc| doc.text());
    drop(bytes);

    let result = text.map(|text| parse(&text));

    #[cfg(feature = "tracing")]
    match &result {
        Ok(records) => tracing::debug!(file = %name, size, records = records.len(), "processed file"),
        Err(e) => tracing::warn!(file = %name, size, error = %e, "failed to process file"),
    }

    FileOutcome { name, size, result }
}
