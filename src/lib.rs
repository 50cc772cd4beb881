//! # swifttok
//!
//! High-throughput text tokenizer for neural language models.
//!
//! ## Features
//!
//! - 🦀 Pure Rust WordPiece (BERT-family) and byte-level BPE (GPT-2)
//! - ⚡ Aho–Corasick subword matching over flat transition arrays
//! - 🧵 Chunked and streaming execution for multi-megabyte inputs
//! - 🎯 Simple API: encode, decode, tokenize, batch encode
//!
//! ## Example
//!
//! ```no_run
//! use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TokenizerConfig {
//!     kind: EngineKind::Bert,
//!     vocab_path: Some("vocab.txt".into()),
//!     ..TokenizerConfig::default()
//! };
//! let tokenizer = Tokenizer::from_config(config)?;
//!
//! // Encode text to token IDs
//! let ids = tokenizer.encode("Hello, world!")?;
//!
//! // Decode token IDs back to text
//! let text = tokenizer.decode(&ids)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Engines
//!
//! - **BERT**: normalization (whitespace/control cleanup, CJK isolation,
//!   lowercasing, accent stripping, punctuation splits) followed by
//!   WordPiece segmentation, `[CLS]`/`[SEP]` bracketing, truncation and
//!   padding. An optional bidirectional mode segments each word both
//!   ways and arbitrates.
//! - **BPE**: GPT-2 byte-level encoding, regex pre-tokenization and
//!   rank-driven pair merging.

use std::path::PathBuf;
use std::sync::OnceLock;

pub mod automaton;
pub mod bert;
pub mod bpe;
pub mod byte_encoder;
pub mod charclass;
pub mod chunk;
pub mod folding;
pub mod normalizer;
pub mod parallel;
pub mod utf8;
pub mod vocab;
pub mod wordpiece;

pub use bert::BertTokenizer;
pub use bpe::BpeTokenizer;
pub use parallel::{CancelToken, ChunkedExecutor};
pub use vocab::{BpeVocab, SpecialTokens, Vocabulary};

/// Maximum input text size in bytes (10MB).
pub const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Maximum output tokens per encode; prevents memory exhaustion.
pub const MAX_OUTPUT_TOKENS: usize = 1_000_000;

/// Type alias for token IDs.
///
/// Vocabulary size is bounded well below `u32::MAX`, so `u32` is safe
/// and keeps id buffers compact.
pub type TokenId = u32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed resource: {0}")]
    Format(String),

    #[error("tokenization failed: {0}")]
    TokenizationFailed(String),

    #[error("unknown token id: {0}")]
    InvalidToken(TokenId),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Padding mode for encode calls.
///
/// `MaxLength` pads with `[PAD]` up to the effective max length;
/// `Longest` leaves the result unpadded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    MaxLength,
    #[default]
    Longest,
}

impl From<&str> for Padding {
    /// `"max_length"` selects padding; any other value means no padding.
    fn from(value: &str) -> Self {
        if value == "max_length" {
            Padding::MaxLength
        } else {
            Padding::Longest
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Bert,
    Bpe,
}

/// Engine selection and knobs.
///
/// `model_max_length` keeps the integer sentinel shape: `-1` means
/// unbounded. `max_parallelism = 0` resolves to the number of available
/// CPUs.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub kind: EngineKind,
    pub vocab_path: Option<PathBuf>,
    pub bpe_vocab_path: Option<PathBuf>,
    pub bpe_merges_path: Option<PathBuf>,
    pub do_lower_case: bool,
    pub tokenize_cjk: bool,
    pub model_max_length: i64,
    pub enable_bidirectional: bool,
    pub max_parallelism: usize,
    pub chunk_size: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Bert,
            vocab_path: None,
            bpe_vocab_path: None,
            bpe_merges_path: None,
            do_lower_case: true,
            tokenize_cjk: true,
            model_max_length: 128,
            enable_bidirectional: false,
            max_parallelism: 0,
            chunk_size: 128 * 1024,
        }
    }
}

impl TokenizerConfig {
    /// The default encode length as an optional cap.
    pub fn effective_max_length(&self) -> Option<usize> {
        if self.model_max_length < 0 {
            None
        } else {
            Some(self.model_max_length as usize)
        }
    }

    /// Worker cap for chunked execution.
    pub fn resolved_parallelism(&self) -> usize {
        if self.max_parallelism > 0 {
            return self.max_parallelism;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

enum Engine {
    Bert(BertTokenizer),
    Bpe(BpeTokenizer),
}

/// Main tokenizer interface for encoding and decoding text.
///
/// The engine (vocabulary, automata, merge table) is built once at
/// construction and shared immutably; every encode call owns its buffers,
/// so a `Tokenizer` is freely shared among threads.
///
/// # Example
///
/// ```no_run
/// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenizerConfig {
///     kind: EngineKind::Bert,
///     vocab_path: Some("vocab.txt".into()),
///     ..TokenizerConfig::default()
/// };
/// let tokenizer = Tokenizer::from_config(config)?;
/// let ids = tokenizer.encode("Hello, world!")?;
/// let text = tokenizer.decode(&ids)?;
/// # Ok(())
/// # }
/// ```
pub struct Tokenizer {
    engine: Engine,
    // Built lazily: chunked execution is only reachable for BERT engines.
    executor: OnceLock<ChunkedExecutor>,
    max_parallelism: usize,
    chunk_size: usize,
}

impl Tokenizer {
    /// Build a tokenizer from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine selection, resource paths and knobs
    ///
    /// # Returns
    ///
    /// Returns `Ok(Tokenizer)` on success. Fails with [`Error::Config`]
    /// on missing paths or unreadable files and [`Error::Format`] on
    /// malformed vocab/merges data. After a successful construction,
    /// encode never fails on text content.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = TokenizerConfig {
    ///     kind: EngineKind::Bert,
    ///     vocab_path: Some("vocab.txt".into()),
    ///     ..TokenizerConfig::default()
    /// };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "from_config returns a Result that must be handled"]
    pub fn from_config(config: TokenizerConfig) -> Result<Self, Error> {
        let engine = match config.kind {
            EngineKind::Bert => {
                let path = config.vocab_path.as_ref().ok_or_else(|| {
                    Error::Config("bert engine requires vocab_path".to_string())
                })?;
                Engine::Bert(BertTokenizer::from_vocab_file(path, &config)?)
            }
            EngineKind::Bpe => {
                let vocab_path = config.bpe_vocab_path.as_ref().ok_or_else(|| {
                    Error::Config("bpe engine requires bpe_vocab_path".to_string())
                })?;
                let merges_path = config.bpe_merges_path.as_ref().ok_or_else(|| {
                    Error::Config("bpe engine requires bpe_merges_path".to_string())
                })?;
                Engine::Bpe(BpeTokenizer::from_files(vocab_path, merges_path)?)
            }
        };
        Ok(Self {
            engine,
            executor: OnceLock::new(),
            max_parallelism: config.resolved_parallelism(),
            chunk_size: config.chunk_size,
        })
    }

    /// Wrap an already-built BERT engine.
    ///
    /// # Arguments
    ///
    /// * `bert` - The engine to wrap
    /// * `config` - Supplies the chunked-execution knobs
    ///
    /// # Returns
    ///
    /// A facade over the given engine.
    pub fn from_bert(bert: BertTokenizer, config: &TokenizerConfig) -> Self {
        Self {
            engine: Engine::Bert(bert),
            executor: OnceLock::new(),
            max_parallelism: config.resolved_parallelism(),
            chunk_size: config.chunk_size,
        }
    }

    /// Wrap an already-built BPE engine.
    ///
    /// # Arguments
    ///
    /// * `bpe` - The engine to wrap
    /// * `config` - Supplies the chunked-execution knobs
    ///
    /// # Returns
    ///
    /// A facade over the given engine.
    pub fn from_bpe(bpe: BpeTokenizer, config: &TokenizerConfig) -> Self {
        Self {
            engine: Engine::Bpe(bpe),
            executor: OnceLock::new(),
            max_parallelism: config.resolved_parallelism(),
            chunk_size: config.chunk_size,
        }
    }

    fn executor(&self) -> Result<&ChunkedExecutor, Error> {
        if let Some(executor) = self.executor.get() {
            return Ok(executor);
        }
        let executor = ChunkedExecutor::new(self.max_parallelism, self.chunk_size)?;
        Ok(self.executor.get_or_init(|| executor))
    }

    /// Encode text into a sequence of token IDs using engine defaults
    /// (no padding, the configured default max length).
    ///
    /// # Arguments
    ///
    /// * `text` - The input text to tokenize
    ///
    /// # Returns
    ///
    /// Returns a vector of token IDs representing the input text. For
    /// the BERT engine the sequence is bracketed with `[CLS]`/`[SEP]`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let ids = tokenizer.encode("Hello world")?;
    /// println!("Tokens: {:?}", ids);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "encode returns a Result that must be handled"]
    pub fn encode(&self, text: &str) -> Result<Vec<TokenId>, Error> {
        self.encode_with(text, Padding::Longest, None)
    }

    /// Encode text with explicit padding mode and max length.
    ///
    /// For the BPE engine `max_length` truncates the id sequence and the
    /// padding mode is ignored: byte-level BPE has no `[PAD]` token.
    ///
    /// # Arguments
    ///
    /// * `text` - The input text to tokenize
    /// * `padding` - [`Padding::MaxLength`] pads to the effective max
    ///   length; [`Padding::Longest`] leaves the result unpadded
    /// * `max_length` - Per-call length cap; `None` falls back to the
    ///   engine default
    ///
    /// # Returns
    ///
    /// Returns a vector of token IDs no longer than the effective max
    /// length.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind, Padding};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let ids = tokenizer.encode_with("Hello world", Padding::MaxLength, Some(16))?;
    /// assert_eq!(ids.len(), 16);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "encode_with returns a Result that must be handled"]
    pub fn encode_with(
        &self,
        text: &str,
        padding: Padding,
        max_length: Option<usize>,
    ) -> Result<Vec<TokenId>, Error> {
        if text.len() > MAX_INPUT_SIZE {
            return Err(Error::TokenizationFailed(format!(
                "input text too large: {} bytes (max: {})",
                text.len(),
                MAX_INPUT_SIZE
            )));
        }
        match &self.engine {
            Engine::Bert(bert) => Ok(bert.encode(text, padding, max_length)),
            Engine::Bpe(bpe) => {
                let mut ids = bpe.encode(text)?;
                if let Some(max) = max_length {
                    ids.truncate(max);
                }
                Ok(ids)
            }
        }
    }

    /// Decode a sequence of token IDs back into text.
    ///
    /// # Arguments
    ///
    /// * `ids` - Slice of token IDs to decode
    ///
    /// # Returns
    ///
    /// Returns the decoded text as a String. For the BERT engine,
    /// `[PAD]`/`[CLS]`/`[SEP]` are skipped and `##` pieces re-join
    /// without a space.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let ids = tokenizer.encode("Hello world")?;
    /// let text = tokenizer.decode(&ids)?;
    /// println!("Text: {}", text);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "decode returns a Result that must be handled"]
    pub fn decode(&self, ids: &[TokenId]) -> Result<String, Error> {
        match &self.engine {
            Engine::Bert(bert) => bert.decode(ids),
            Engine::Bpe(bpe) => bpe.decode(ids),
        }
    }

    /// Decode a single token to text.
    ///
    /// This is useful for streaming generation where tokens arrive one
    /// at a time.
    ///
    /// # Arguments
    ///
    /// * `id` - The token ID to decode
    /// * `skip_special_tokens` - If true, returns an empty string for
    ///   special tokens
    ///
    /// # Returns
    ///
    /// Returns the decoded text for this token.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// for id in tokenizer.encode("Hello world")? {
    ///     print!("{}", tokenizer.decode_single(id, true)?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "decode_single returns a Result that must be handled"]
    pub fn decode_single(&self, id: TokenId, skip_special_tokens: bool) -> Result<String, Error> {
        if skip_special_tokens && self.is_special_token(id) {
            return Ok(String::new());
        }
        self.decode(&[id])
    }

    /// The WordPiece pieces of `text`, without special tokens.
    ///
    /// # Arguments
    ///
    /// * `text` - The input text to segment
    ///
    /// # Returns
    ///
    /// Returns the piece strings between `[CLS]` and `[SEP]`. Only the
    /// BERT engine supports this; the BPE engine returns
    /// [`Error::Unsupported`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let pieces = tokenizer.tokenize("unaffable")?;
    /// println!("Pieces: {:?}", pieces); // e.g. ["un", "##aff", "##able"]
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "tokenize returns a Result that must be handled"]
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, Error> {
        match &self.engine {
            Engine::Bert(bert) => Ok(bert.tokenize(text)),
            Engine::Bpe(_) => Err(Error::Unsupported(
                "tokenize is only available for the bert engine".to_string(),
            )),
        }
    }

    /// Encode multiple texts in one call.
    ///
    /// # Arguments
    ///
    /// * `texts` - Slice of text strings to tokenize
    /// * `padding` - Padding mode applied to every text
    /// * `max_length` - Per-call length cap; `None` falls back to the
    ///   engine default
    /// * `parallel` - If true, texts are encoded on the rayon pool
    ///
    /// # Returns
    ///
    /// Returns a vector of token ID vectors, one for each input text.
    /// The order of outputs matches the order of inputs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind, Padding};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let texts = ["Hello world", "Goodbye world"];
    /// let batch = tokenizer.batch_encode(&texts, Padding::Longest, None, true)?;
    /// for (text, ids) in texts.iter().zip(batch.iter()) {
    ///     println!("{}: {:?}", text, ids);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "batch_encode returns a Result that must be handled"]
    pub fn batch_encode(
        &self,
        texts: &[&str],
        padding: Padding,
        max_length: Option<usize>,
        parallel: bool,
    ) -> Result<Vec<Vec<TokenId>>, Error> {
        match &self.engine {
            Engine::Bert(bert) => Ok(bert.batch_encode(texts, padding, max_length, parallel)),
            Engine::Bpe(_) => {
                if parallel {
                    use rayon::prelude::*;
                    texts
                        .par_iter()
                        .map(|text| self.encode_with(text, padding, max_length))
                        .collect()
                } else {
                    texts
                        .iter()
                        .map(|text| self.encode_with(text, padding, max_length))
                        .collect()
                }
            }
        }
    }

    /// Chunk-parallel encode of a large in-memory text.
    ///
    /// The text is split at preferred boundaries (paragraph break,
    /// sentence end, space), chunks are encoded on the worker pool with
    /// special tokens suppressed, and results are reassembled in input
    /// order inside one `[CLS]`/`[SEP]` bracket.
    ///
    /// # Arguments
    ///
    /// * `text` - The input text to tokenize
    /// * `padding` - Padding mode for the assembled result
    /// * `max_length` - Per-call length cap; `None` falls back to the
    ///   engine default
    ///
    /// # Returns
    ///
    /// Returns the assembled token IDs. Only the BERT engine supports
    /// this; the BPE engine returns [`Error::Unsupported`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind, Padding};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let document = std::fs::read_to_string("document.txt")?;
    /// let ids = tokenizer.encode_chunked(&document, Padding::Longest, None)?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "encode_chunked returns a Result that must be handled"]
    pub fn encode_chunked(
        &self,
        text: &str,
        padding: Padding,
        max_length: Option<usize>,
    ) -> Result<Vec<TokenId>, Error> {
        match &self.engine {
            Engine::Bert(bert) => Ok(self.executor()?.encode(bert, text, padding, max_length)),
            Engine::Bpe(_) => Err(Error::Unsupported(
                "chunked encode is only available for the bert engine".to_string(),
            )),
        }
    }

    /// Streaming encode from a byte source.
    ///
    /// A producer reads and cuts chunks, pool workers encode them, and a
    /// collector reassembles results in input order. Cancelling through
    /// the token aborts promptly and discards partial results.
    ///
    /// # Arguments
    ///
    /// * `reader` - The byte source to consume
    /// * `padding` - Padding mode for the assembled result
    /// * `max_length` - Per-call length cap; `None` falls back to the
    ///   engine default
    /// * `cancel` - Cooperative cancellation handle
    ///
    /// # Returns
    ///
    /// Returns the assembled token IDs, [`Error::Cancelled`] if the
    /// token fired, or [`Error::Io`] if the source failed. Only the BERT
    /// engine supports this; the BPE engine returns
    /// [`Error::Unsupported`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{CancelToken, Tokenizer, TokenizerConfig, EngineKind, Padding};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let file = std::fs::File::open("corpus.txt")?;
    /// let cancel = CancelToken::new();
    /// let ids = tokenizer.encode_stream(file, Padding::Longest, None, &cancel)?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "encode_stream returns a Result that must be handled"]
    pub fn encode_stream<R: std::io::Read + Send>(
        &self,
        reader: R,
        padding: Padding,
        max_length: Option<usize>,
        cancel: &CancelToken,
    ) -> Result<Vec<TokenId>, Error> {
        match &self.engine {
            Engine::Bert(bert) => {
                self.executor()?
                    .encode_stream(bert, reader, padding, max_length, cancel)
            }
            Engine::Bpe(_) => Err(Error::Unsupported(
                "streaming encode is only available for the bert engine".to_string(),
            )),
        }
    }

    /// Get the vocabulary size.
    ///
    /// # Returns
    ///
    /// The total number of tokens in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        match &self.engine {
            Engine::Bert(bert) => bert.vocab().len(),
            Engine::Bpe(bpe) => bpe.vocab().len(),
        }
    }

    /// Get the text representation of a token.
    ///
    /// Returns the raw vocabulary entry for a given token ID. This is
    /// useful for debugging and introspection.
    ///
    /// # Arguments
    ///
    /// * `id` - The token ID to look up
    ///
    /// # Returns
    ///
    /// Returns the token text, or [`Error::InvalidToken`] if the ID is
    /// not in the vocabulary.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let piece = tokenizer.token_to_piece(103)?;
    /// println!("Token piece: {}", piece);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use = "token_to_piece returns a Result that must be handled"]
    pub fn token_to_piece(&self, id: TokenId) -> Result<String, Error> {
        let piece = match &self.engine {
            Engine::Bert(bert) => bert.vocab().token_of(id),
            Engine::Bpe(bpe) => bpe.vocab().token_of(id),
        };
        piece.map(String::from).ok_or(Error::InvalidToken(id))
    }

    /// Check if a token is a special token.
    ///
    /// # Arguments
    ///
    /// * `id` - The token ID to check
    ///
    /// # Returns
    ///
    /// Returns true for the structurally emitted special tokens
    /// (`[PAD]`, `[UNK]`, `[CLS]`, `[SEP]`). Always false for the BPE
    /// engine, which has none.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swifttok::{Tokenizer, TokenizerConfig, EngineKind};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = TokenizerConfig { kind: EngineKind::Bert, vocab_path: Some("vocab.txt".into()), ..TokenizerConfig::default() };
    /// let tokenizer = Tokenizer::from_config(config)?;
    /// let is_special = tokenizer.is_special_token(0); // [PAD]
    /// println!("Is special: {}", is_special);
    /// # Ok(())
    /// # }
    /// ```
    pub fn is_special_token(&self, id: TokenId) -> bool {
        match &self.engine {
            Engine::Bert(bert) => bert.vocab().is_special(id),
            Engine::Bpe(_) => false,
        }
    }
}
