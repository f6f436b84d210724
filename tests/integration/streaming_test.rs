//! Streaming output must equal the one-shot render for any chunking

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use replaykit::session::{normalize_chunks, ALT_SCREEN_SEPARATOR, CLEAR_SEPARATOR};
use replaykit::{MarkerSet, MetadataStripper, StreamingNormalizer};

use crate::helpers::load_fixture;

/// Pieces random recordings are assembled from. Escape sequences are also
/// offered cut in half so chunk boundaries and content both split them.
const PIECES: &[&[u8]] = &[
    b"a",
    b"hello",
    b"$ ",
    b" ",
    b"\t",
    b"\n",
    b"\r\n",
    b"\x1b[2J",
    b"\x1b[3J",
    b"\x1b[H\x1b[2J",
    b"\x1b[1;1H\x1b[0J",
    b"\x1b[2J\x1b[H",
    b"\x1b[H",
    b"\x1b[",
    b"\x1b[?1049h",
    b"\x1b[?1049l",
    b"\x1b[?47h",
    b"\x1b[?1047l",
    b"\x1b[?10",
    b"\x1b[31mred\x1b[0m",
    "caf\u{e9}".as_bytes(),
    b"Script started on 2025-01-01\n",
    b"Command: bash\n",
    b"Script done on 2025-01-01\n",
    b"[COMMAND_EXIT_STATUS=\"0\"]\n",
];

fn random_recording(rng: &mut StdRng) -> Vec<u8> {
    let pieces = rng.random_range(0..60);
    let mut content = Vec::new();
    for _ in 0..pieces {
        content.extend_from_slice(PIECES[rng.random_range(0..PIECES.len())]);
    }
    content
}

fn random_chunks<'a>(rng: &mut StdRng, content: &'a [u8]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let size = rng.random_range(1..=rest.len().min(16));
        let (chunk, tail) = rest.split_at(size);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

fn fixed_chunks(content: &[u8], size: usize) -> Vec<&[u8]> {
    content.chunks(size).collect()
}

fn assert_streams_like_batch(stripper: &MetadataStripper, seed: u64, cases: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    for case in 0..cases {
        let content = random_recording(&mut rng);
        let expected = stripper.strip(&content);
        let chunks = random_chunks(&mut rng, &content);
        let streamed = normalize_chunks(stripper.clone(), chunks.iter().copied());
        assert_eq!(
            String::from_utf8_lossy(&streamed),
            String::from_utf8_lossy(&expected),
            "seed {seed} case {case}: input {:?}",
            String::from_utf8_lossy(&content)
        );
    }
}

// ============================================================================
// Random recordings
// ============================================================================

#[test]
fn random_chunking_matches_render() {
    assert_streams_like_batch(&MetadataStripper::default(), 0x5eed, 300);
}

#[test]
fn random_chunking_matches_render_with_small_windows() {
    let stripper = MetadataStripper {
        markers: MarkerSet::default(),
        header_scan_lines: 2,
        footer_window: 32,
    };
    assert_streams_like_batch(&stripper, 7, 300);
}

#[test]
fn random_chunking_matches_render_without_header_scan() {
    let stripper = MetadataStripper {
        markers: MarkerSet::default(),
        header_scan_lines: 0,
        footer_window: 0,
    };
    assert_streams_like_batch(&stripper, 42, 200);
}

// ============================================================================
// Fixtures
// ============================================================================

#[test]
fn fixture_session_streams_at_any_chunk_size() {
    let content = load_fixture("session.log");
    let expected = MetadataStripper::default().strip(&content);
    for size in [1, 2, 7, 64, 1024] {
        let streamed = normalize_chunks(MetadataStripper::default(), fixed_chunks(&content, size));
        assert_eq!(streamed, expected, "chunk size {size}");
    }
}

#[test]
fn fixture_session_renders_expected_content() {
    let rendered = MetadataStripper::default().strip(&load_fixture("session.log"));
    let expected = format!(
        "$ ls\r\nfile1  file2\r\n$ clear\r\n{}$ echo done\r\ndone\r\n$ exit\r",
        ALT_SCREEN_SEPARATOR
    );
    assert_eq!(String::from_utf8(rendered).unwrap(), expected);
}

#[test]
fn simple_dialect_fixture_streams_byte_by_byte() {
    let content = load_fixture("simple.log");
    let streamed = normalize_chunks(MetadataStripper::default(), fixed_chunks(&content, 1));
    assert_eq!(
        String::from_utf8(streamed).unwrap(),
        format!("hello{}world", CLEAR_SEPARATOR)
    );
}

#[test]
fn output_is_released_before_the_stream_ends() {
    let mut body = b"Script started on x\n".to_vec();
    for i in 0..200 {
        body.extend_from_slice(format!("line {i}\n").as_bytes());
    }

    let released = RefCell::new(Vec::new());
    let mut normalizer =
        StreamingNormalizer::new(MetadataStripper::default(), |b: &[u8]| {
            released.borrow_mut().extend_from_slice(b)
        });
    normalizer.write(&body);
    // everything but the footer window is final already
    let early = released.borrow().len();
    normalizer.end();

    assert!(early > 0);
    assert!(early <= body.len() - 20 - MetadataStripper::default().footer_window);
    assert_eq!(released.into_inner(), MetadataStripper::default().strip(&body));
}
