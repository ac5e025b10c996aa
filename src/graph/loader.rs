use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::time::Instant;

use super::{FieldGraph, GraphBuilder, HASH_LENGTH, NUM_FIELDS, PTR_LENGTH};
use crate::piece::{Shape, PIECE_SHAPES};

const MAX_PTR: u32 = (1 << (8 * PTR_LENGTH)) - 1;

impl FieldGraph {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Format (no header, no delimiters), one record per field in fingerprint order:
        // u40 fingerprint (big endian)
        // 7 x { u8 count, count x u24 successor index (little endian) }
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open graph file: {}", path.display()))?;
        let total = f.metadata().map(|m| m.len()).unwrap_or(0);
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] graph {bar:40.cyan/blue} {bytes}/{total_bytes}")?
                .progress_chars("=>-"),
        );
        let t0 = Instant::now();
        let graph = Self::decode(pb.wrap_read(BufReader::new(f)))
            .with_context(|| format!("decode graph file: {}", path.display()))?;
        pb.finish_and_clear();
        info!("Loaded {} fields, {} edges (took {} ms)", graph.len(), graph.edge_count(), t0.elapsed().as_millis());
        if graph.len() != NUM_FIELDS {
            debug!("graph has {} fields, full perfect clear graph has {}", graph.len(), NUM_FIELDS);
        }
        Ok(graph)
    }

    pub fn decode<R: Read>(mut r: R) -> Result<Self> {
        let mut b = GraphBuilder::with_capacity(0, 0);
        let mut succ: [Vec<u32>; PIECE_SHAPES] = Default::default();
        let mut hbuf = [0u8; HASH_LENGTH];
        let mut ptr = [0u8; PTR_LENGTH];
        let mut count = [0u8; 1];
        while read_or_eof(&mut r, &mut hbuf).with_context(|| format!("read fingerprint of field {}", b.len()))? {
            let hash = hbuf.iter().fold(0u64, |h, &x| (h << 8) | x as u64);
            for (shape, list) in succ.iter_mut().enumerate() {
                list.clear();
                r.read_exact(&mut count)
                    .with_context(|| format!("read edge count of field {} shape {}", b.len(), shape))?;
                for _ in 0..count[0] {
                    r.read_exact(&mut ptr).with_context(|| format!("read edge of field {}", b.len()))?;
                    list.push(u32::from_le_bytes([ptr[0], ptr[1], ptr[2], 0]));
                }
            }
            b.push(hash, &succ)?;
        }
        b.build()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create graph file: {}", path.display()))?;
        let mut w = BufWriter::new(f);
        self.encode(&mut w)?;
        w.flush().context("flush graph file")?;
        Ok(())
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<()> {
        for field in 0..self.len() {
            let h = self.hash(field).to_be_bytes();
            w.write_all(&h[8 - HASH_LENGTH..])?;
            for shape in Shape::ALL {
                let edges = self.edges(field, shape);
                let Ok(n) = u8::try_from(edges.len()) else {
                    bail!("field {} has {} successors for {}", field, edges.len(), shape);
                };
                w.write_all(&[n])?;
                for &e in edges {
                    if e > MAX_PTR { bail!("successor index {} does not fit in {} bytes", e, PTR_LENGTH); }
                    w.write_all(&e.to_le_bytes()[..PTR_LENGTH])?;
                }
            }
        }
        Ok(())
    }
}

/// Fill `buf` completely; `Ok(false)` on a clean end of input before the first byte.
fn read_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut off = 0usize;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) if off == 0 => return Ok(false),
            Ok(0) => bail!("truncated record ({} of {} bytes)", off, buf.len()),
            Ok(k) => off += k,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}
