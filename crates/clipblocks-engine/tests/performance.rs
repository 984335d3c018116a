//! Coarse guards against superlinear behaviour on megabyte inputs.

use std::time::{Duration, Instant};

use clipblocks_engine::{classify, parsing::lexer::tokenize};

const ONE_MB: usize = 1_000_000;
/// Far above release timings; catches quadratic blowups, not slowdowns.
const BUDGET: Duration = Duration::from_secs(10);

fn document(len: usize) -> String {
    let chunk = "# Heading\n\nSome text with **bold** and `code`.\n\n- item\n  - nested\n\n> a quote\n\n| a | b |\n| --- | --- |\n| 1 | 2 |\n\n";
    chunk.repeat(len / chunk.len() + 1)
}

fn timed(input: &str) -> Duration {
    let start = Instant::now();
    let classification = classify(input);
    let tokens = tokenize(input).count();
    let elapsed = start.elapsed();
    assert!(classification.confidence > 0.0);
    assert!(tokens > 0);
    elapsed
}

#[test]
fn megabyte_document_is_fast() {
    let input = document(ONE_MB);
    assert!(input.len() >= ONE_MB);
    let elapsed = timed(&input);
    assert!(elapsed < BUDGET, "took {elapsed:?}");
}

#[test]
fn repeated_characters_stay_linear() {
    for c in ['*', '`', '$', '>', '|', '<', '{', 'a'] {
        let input = c.to_string().repeat(ONE_MB);
        let elapsed = timed(&input);
        assert!(elapsed < BUDGET, "{c:?} took {elapsed:?}");
    }
}

#[test]
fn many_short_lines_stay_linear() {
    let input = "*\n".repeat(ONE_MB / 2);
    let elapsed = timed(&input);
    assert!(elapsed < BUDGET, "took {elapsed:?}");
}

#[test]
fn unclosed_block_openers_stay_linear() {
    for line in ["\\begin{a}\n", "$$ x\n", "<aside>\n", "```\n", "$$\n"] {
        let input = line.repeat(ONE_MB / line.len());
        let elapsed = timed(&input);
        assert!(elapsed < BUDGET, "{line:?} took {elapsed:?}");
    }
}
