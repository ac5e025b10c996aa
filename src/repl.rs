//! Line protocol. Whitespace-separated tokens, read across lines:
//!
//! ```text
//! <hold><queue> <bag>     query; the first token is exactly `see` pieces long
//! -f <fingerprint>        change the starting field
//! -m <threads>            change the worker count
//! -s <see>                change the number of known pieces
//! ```
//!
//! The bag is either the unseen shapes spelled out or a single digit `n`:
//! the full bag minus the last `7 - n` pieces of the query. A first token of
//! any other length ends the session. Every malformed token is fatal.
use anyhow::{Context, Result};
use log::info;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::time::Instant;

use crate::config::{self, Settings};
use crate::error::QueryError;
use crate::graph::FieldGraph;
use crate::piece::{Bag, Shape, PIECE_SHAPES};
use crate::search::{write_tree, Query, SearchParams, SearchResult, Searcher};
use crate::weights::WeightTable;

/// Whitespace tokenizer over a line reader, pulling lines on demand.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self { Self { reader, pending: VecDeque::new() } }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line).context("read query input")? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    fn value<T: std::str::FromStr>(&mut self, flag: &'static str) -> Result<T> {
        let tok = self.next_token()?.ok_or(QueryError::MissingValue(flag))?;
        let v = tok.parse().map_err(|_| QueryError::Number(tok.clone()))?;
        Ok(v)
    }
}

fn shape(c: char) -> Result<Shape, QueryError> { Shape::from_char(c).ok_or(QueryError::InvalidPiece(c)) }

/// Parse a query token and its bag token.
pub fn parse_query(field: usize, pieces: &str, bag_token: &str, see: usize) -> Result<Query, QueryError> {
    let shapes = pieces.chars().map(shape).collect::<Result<Vec<_>, _>>()?;
    if shapes.len() != see || shapes.is_empty() {
        return Err(QueryError::Length { expected: see, got: shapes.len() });
    }
    let bag = match bag_token.as_bytes() {
        [d @ b'1'..=b'7'] => {
            let size = (d - b'0') as usize;
            if size + see < PIECE_SHAPES { return Err(QueryError::TooFewToInfer); }
            let mut bag = Bag::FULL;
            for &s in shapes.iter().rev().take(PIECE_SHAPES - size) {
                if !bag.contains(s) { return Err(QueryError::DuplicateInferred); }
                bag.remove(s);
            }
            bag
        }
        _ => bag_token.chars().map(shape).collect::<Result<Bag, _>>()?,
    };
    Ok(Query::new(field, shapes[0], shapes[1..].to_vec(), bag))
}

pub struct Session<'a> {
    graph: &'a FieldGraph,
    weights: &'a WeightTable,
    settings: Settings,
    queries: usize,
}

impl<'a> Session<'a> {
    pub fn new(graph: &'a FieldGraph, weights: &'a WeightTable, settings: Settings) -> Self {
        Self { graph, weights, settings, queries: 0 }
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// Answer queries until input ends or a query token has the wrong
    /// length. In stdout mode each bare result is also written to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<Vec<SearchResult>> {
        let mut tokens = Tokens::new(input);
        let mut results = Vec::new();
        while let Some(tok) = tokens.next_token()? {
            match tok.as_str() {
                "-f" => {
                    let hash = config::check_fingerprint(tokens.value("-f")?)?;
                    self.settings.field = self.graph.start_field(hash)?;
                    info!("Changed starting field to {} (hash {})", self.settings.field, hash);
                    continue;
                }
                "-m" => {
                    self.settings.threads = config::clamp_threads(tokens.value("-m")?)?;
                    info!("Changed max threads to {}", self.settings.threads);
                    continue;
                }
                "-s" => {
                    self.settings.see = config::check_see(tokens.value("-s")?)?;
                    info!("Changed see to {}", self.settings.see);
                    continue;
                }
                _ => {}
            }
            if tok.chars().count() != self.settings.see { break; }
            let bag_token = tokens.next_token()?.ok_or_else(|| QueryError::MissingBag(tok.clone()))?;
            let query = parse_query(self.settings.field, &tok, &bag_token, self.settings.see)?;
            info!("[{}] Testing queue {} with bag {}", self.queries, tok, query.bag);
            let result = self.answer(&query)?;
            if self.settings.modes.stdout {
                writeln!(out, "{}", result.value())?;
                out.flush()?;
            }
            results.push(result);
            self.queries += 1;
        }
        Ok(results)
    }

    fn answer(&self, query: &Query) -> Result<SearchResult> {
        let modes = self.settings.modes;
        let params = SearchParams { threads: self.settings.threads, two_line: modes.two_line };
        let searcher = Searcher::new(self.graph, self.weights, params);
        let t0 = Instant::now();
        let result = if modes.decision {
            let tree = searcher.tree(query)?;
            if let Some(path) = &self.settings.tree_out {
                let file = File::create(path).with_context(|| format!("create tree file: {}", path.display()))?;
                write_tree(BufWriter::new(file), self.graph, query.field, &tree.decision)?;
            }
            tree.summary()
        } else if modes.boolean {
            searcher.boolean(query)?
        } else {
            searcher.count(query)?
        };
        info!("Result: {}", result);
        info!("Time: {} ms ({} nodes)", t0.elapsed().as_millis(), result.nodes);
        Ok(result)
    }
}
