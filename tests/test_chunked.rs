//! Chunked and streaming execution through the facade: equivalence with
//! the sequential path on paragraph boundaries, ordering, cancellation
//! and error propagation.

use std::io::{Cursor, Write};
use swifttok::{CancelToken, EngineKind, Error, Padding, Tokenizer, TokenizerConfig};
use tempfile::NamedTempFile;

fn write_vocab_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp vocab file");
    for token in ["[PAD]", "[UNK]", "[CLS]", "[SEP]"] {
        writeln!(file, "{token}").unwrap();
    }
    for token in [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", ".", ",",
    ] {
        writeln!(file, "{token}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn tokenizer(chunk_size: usize) -> (Tokenizer, NamedTempFile) {
    let vocab = write_vocab_file();
    let config = TokenizerConfig {
        kind: EngineKind::Bert,
        vocab_path: Some(vocab.path().to_path_buf()),
        model_max_length: -1,
        max_parallelism: 4,
        chunk_size,
        ..TokenizerConfig::default()
    };
    (Tokenizer::from_config(config).expect("tokenizer"), vocab)
}

fn paragraph_text(paragraphs: usize) -> String {
    let words = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"];
    let mut text = String::new();
    for i in 0..paragraphs {
        if i > 0 {
            text.push_str("\n\n");
        }
        for j in 0..8 {
            if j > 0 {
                text.push(' ');
            }
            text.push_str(words[(i + j) % words.len()]);
        }
    }
    text
}

#[test]
fn test_chunked_equals_sequential_on_paragraph_boundaries() {
    let (tok, _guard) = tokenizer(64);
    let text = paragraph_text(24);
    let sequential = tok.encode(&text).unwrap();
    let chunked = tok.encode_chunked(&text, Padding::Longest, None).unwrap();
    assert_eq!(chunked, sequential);
}

#[test]
fn test_chunked_small_input_single_chunk() {
    let (tok, _guard) = tokenizer(64 * 1024);
    let text = "alpha bravo charlie";
    let sequential = tok.encode(text).unwrap();
    let chunked = tok.encode_chunked(text, Padding::Longest, None).unwrap();
    assert_eq!(chunked, sequential);
}

#[test]
fn test_chunked_truncates_and_pads() {
    let (tok, _guard) = tokenizer(64);
    let text = paragraph_text(24);
    let ids = tok
        .encode_chunked(&text, Padding::MaxLength, Some(16))
        .unwrap();
    assert_eq!(ids.len(), 16);
    assert_eq!(ids[0], 2);
    assert_eq!(ids[15], 3);

    let short = tok
        .encode_chunked("alpha", Padding::MaxLength, Some(8))
        .unwrap();
    assert_eq!(short, vec![2, 4, 3, 0, 0, 0, 0, 0]);
}

#[test]
fn test_stream_matches_chunked() {
    let (tok, _guard) = tokenizer(64);
    let text = paragraph_text(24);
    let cancel = CancelToken::new();
    let streamed = tok
        .encode_stream(Cursor::new(text.clone()), Padding::Longest, None, &cancel)
        .unwrap();
    let chunked = tok.encode_chunked(&text, Padding::Longest, None).unwrap();
    assert_eq!(streamed, chunked);
}

#[test]
fn test_stream_small_reads_match() {
    /// Reader that hands out one byte at a time.
    struct TrickleReader {
        data: Vec<u8>,
        pos: usize,
    }
    impl std::io::Read for TrickleReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    let (tok, _guard) = tokenizer(64);
    let text = paragraph_text(8);
    let cancel = CancelToken::new();
    let trickled = tok
        .encode_stream(
            TrickleReader {
                data: text.clone().into_bytes(),
                pos: 0,
            },
            Padding::Longest,
            None,
            &cancel,
        )
        .unwrap();
    let chunked = tok.encode_chunked(&text, Padding::Longest, None).unwrap();
    assert_eq!(trickled, chunked);
}

#[test]
fn test_stream_cancellation_returns_no_partial_result() {
    let (tok, _guard) = tokenizer(64);
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = tok
        .encode_stream(
            Cursor::new(paragraph_text(24)),
            Padding::Longest,
            None,
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn test_stream_read_error_propagates() {
    struct FailAfter {
        remaining: usize,
    }
    impl std::io::Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::other("disk on fire"));
            }
            let n = buf.len().min(self.remaining).min(8);
            buf[..n].fill(b'a');
            self.remaining -= n;
            Ok(n)
        }
    }

    let (tok, _guard) = tokenizer(64);
    let cancel = CancelToken::new();
    let err = tok
        .encode_stream(
            FailAfter { remaining: 256 },
            Padding::Longest,
            None,
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_stream_multibyte_chunks_roundtrip_cleanly() {
    // CJK text whose bytes never align with the chunk size; boundaries
    // must stay on codepoint starts so no replacement chars appear.
    let mut file = NamedTempFile::new().unwrap();
    for token in ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "世", "界"] {
        writeln!(file, "{token}").unwrap();
    }
    file.flush().unwrap();
    let config = TokenizerConfig {
        kind: EngineKind::Bert,
        vocab_path: Some(file.path().to_path_buf()),
        model_max_length: -1,
        chunk_size: 16,
        ..TokenizerConfig::default()
    };
    let tok = Tokenizer::from_config(config).unwrap();
    let text = "世界".repeat(40);
    let cancel = CancelToken::new();
    let streamed = tok
        .encode_stream(Cursor::new(text.clone()), Padding::Longest, None, &cancel)
        .unwrap();
    let sequential = tok.encode(&text).unwrap();
    assert_eq!(streamed, sequential);
}
