//! Chunked and streaming execution over the BERT pipeline.
//!
//! Both paths encode chunks independently with special tokens suppressed
//! and reassemble in input order: `[CLS]` + chunk ids + `[SEP]`, then
//! truncation and optional padding. The streaming variant is a pipeline
//! of bounded channels (reader → chunks → ids → ordered result) with a
//! cooperative cancel token; a cancelled call returns no partial result.

use crate::bert::BertTokenizer;
use crate::chunk::{chunk_spans, cut_point, MIN_CHUNK_SIZE};
use crate::{Error, Padding, TokenId};
use crossbeam_channel::{bounded, Sender};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Cooperative cancellation handle shared with a streaming encode.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ChunkedExecutor {
    pool: rayon::ThreadPool,
    chunk_size: usize,
}

impl ChunkedExecutor {
    pub fn new(max_parallelism: usize, chunk_size: usize) -> Result<Self, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_parallelism.max(1))
            .build()
            .map_err(|e| Error::Resource(format!("cannot build worker pool: {e}")))?;
        Ok(Self {
            pool,
            chunk_size: chunk_size.max(MIN_CHUNK_SIZE),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bracket, truncate and pad ordered chunk results.
    fn assemble(
        bert: &BertTokenizer,
        chunk_ids: impl IntoIterator<Item = Vec<TokenId>>,
        padding: Padding,
        max: Option<usize>,
    ) -> Vec<TokenId> {
        let specials = bert.specials();
        let budget = max.map_or(usize::MAX, |m| m.saturating_sub(1));
        let mut ids = vec![specials.cls];
        'outer: for chunk in chunk_ids {
            for id in chunk {
                if ids.len() >= budget {
                    break 'outer;
                }
                ids.push(id);
            }
        }
        ids.push(specials.sep);
        if let Some(m) = max {
            ids.truncate(m);
            if padding == Padding::MaxLength {
                ids.resize(m, specials.pad);
            }
        }
        ids
    }

    /// Encode a large in-memory text chunk-parallel.
    pub fn encode(
        &self,
        bert: &BertTokenizer,
        text: &str,
        padding: Padding,
        max_length: Option<usize>,
    ) -> Vec<TokenId> {
        let spans = chunk_spans(text, self.chunk_size);
        log::debug!("chunked encode: {} chunks of ~{} bytes", spans.len(), self.chunk_size);
        let chunk_ids: Vec<Vec<TokenId>> = self.pool.install(|| {
            spans
                .par_iter()
                .map(|span| {
                    let mut ids = Vec::new();
                    bert.encode_body(&text[span.clone()], &mut ids, usize::MAX);
                    ids
                })
                .collect()
        });
        let max = max_length.or(bert.model_max_length());
        Self::assemble(bert, chunk_ids, padding, max)
    }

    /// Encode from a byte source through the streaming pipeline.
    ///
    /// The producer reads and cuts chunks, workers encode, the collector
    /// reassembles by chunk index. Cancellation drains the pipeline and
    /// returns `Error::Cancelled`; read failures surface as `Error::Io`.
    pub fn encode_stream<R: Read + Send>(
        &self,
        bert: &BertTokenizer,
        reader: R,
        padding: Padding,
        max_length: Option<usize>,
        cancel: &CancelToken,
    ) -> Result<Vec<TokenId>, Error> {
        let workers = self.pool.current_num_threads().max(1);
        let (chunk_tx, chunk_rx) = bounded::<(usize, String)>(workers * 2);
        let (ids_tx, ids_rx) = bounded::<(usize, Vec<TokenId>)>(workers * 2);
        let failure: Mutex<Option<Error>> = Mutex::new(None);
        let abort = AtomicBool::new(false);
        let mut collected: BTreeMap<usize, Vec<TokenId>> = BTreeMap::new();

        let chunk_size = self.chunk_size;
        let abort_ref = &abort;
        let stopped = move || cancel.is_cancelled() || abort_ref.load(Ordering::Relaxed);
        let stopped = &stopped;
        std::thread::scope(|scope| {
            let failure_ref = &failure;

            scope.spawn(move || {
                if let Err(e) = produce_chunks(reader, chunk_size, &stopped, &chunk_tx) {
                    let mut slot = failure_ref.lock().unwrap_or_else(|p| p.into_inner());
                    slot.get_or_insert(e);
                    abort_ref.store(true, Ordering::Relaxed);
                }
                // chunk_tx drops here and closes the channel.
            });

            for _ in 0..workers {
                let rx = chunk_rx.clone();
                let tx = ids_tx.clone();
                scope.spawn(move || {
                    for (index, text) in rx.iter() {
                        if stopped() {
                            // Keep draining so the producer never blocks.
                            continue;
                        }
                        let mut ids = Vec::new();
                        bert.encode_body(&text, &mut ids, usize::MAX);
                        if tx.send((index, ids)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(chunk_rx);
            drop(ids_tx);

            for (index, ids) in ids_rx.iter() {
                if !stopped() {
                    collected.insert(index, ids);
                }
            }
        });

        if let Some(e) = failure.lock().unwrap_or_else(|p| p.into_inner()).take() {
            return Err(e);
        }
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let max = max_length.or(bert.model_max_length());
        Ok(Self::assemble(
            bert,
            collected.into_values(),
            padding,
            max,
        ))
    }
}

/// Reader side of the streaming pipeline: buffer bytes, cut chunks at
/// preferred boundaries, publish `(index, text)` in order.
fn produce_chunks<R: Read>(
    mut reader: R,
    chunk_size: usize,
    stopped: &impl Fn() -> bool,
    tx: &Sender<(usize, String)>,
) -> Result<(), Error> {
    let mut pending: Vec<u8> = Vec::new();
    let mut buf = vec![0u8; chunk_size];
    let mut index = 0usize;
    loop {
        if stopped() {
            return Ok(());
        }
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&buf[..n]);
        while pending.len() > chunk_size {
            if stopped() {
                return Ok(());
            }
            let cut = cut_point(&pending, chunk_size);
            let text = String::from_utf8_lossy(&pending[..cut]).into_owned();
            pending.drain(..cut);
            if tx.send((index, text)).is_err() {
                return Ok(());
            }
            index += 1;
        }
    }
    if !pending.is_empty() && !stopped() {
        let text = String::from_utf8_lossy(&pending).into_owned();
        let _ = tx.send((index, text));
    }
    Ok(())
}
