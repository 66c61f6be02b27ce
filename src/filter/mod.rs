mod classifier;

pub use classifier::{classify, LineKind, CLOSING_MARKER};

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{FilterError, Result};

/// Scan position within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before and including the root element's opening tag; copied verbatim.
    Preamble,
    /// At document top level, between description blocks.
    Scanning,
    /// Inside a block whose subject is in the used set.
    Keeping,
    /// Inside a block whose subject is not in the used set.
    Skipping,
}

/// Counters reported after one filter pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterStats {
    pub lines_read: u64,
    pub blocks_kept: u64,
    pub blocks_dropped: u64,
}

/// Stream one RDF/XML document through the block filter.
///
/// The preamble is copied verbatim, then only the description blocks whose
/// subject URI is a member of `used` are copied, byte-identical and in input
/// order. The root closing marker is appended unconditionally at end of
/// input, even if the scan ends mid-block (the upstream dumps are balanced;
/// an unterminated block is logged, not failed). Lines at top level that are
/// not block boundaries are dropped silently.
///
/// Memory use is one line buffer plus the borrowed used set; the document is
/// never held in memory whole.
pub fn filter_blocks<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    used: &HashSet<String>,
    input: &Path,
    output: &Path,
) -> Result<FilterStats> {
    let mut state = State::Preamble;
    let mut stats = FilterStats::default();
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .map_err(|e| FilterError::io("read", input, e))?;
        if n == 0 {
            break;
        }
        stats.lines_read += 1;

        let keep = match (state, classify(&line)) {
            (State::Preamble, LineKind::PreambleEnd) => {
                state = State::Scanning;
                true
            }
            (State::Preamble, _) => true,
            // A new open while inside a block re-evaluates membership:
            // blocks do not nest in these documents.
            (_, LineKind::DescriptionOpen(uri)) => {
                if used.contains(uri) {
                    stats.blocks_kept += 1;
                    state = State::Keeping;
                    true
                } else {
                    stats.blocks_dropped += 1;
                    state = State::Skipping;
                    false
                }
            }
            (State::Keeping, LineKind::DescriptionClose) => {
                state = State::Scanning;
                true
            }
            (State::Keeping, _) => true,
            (State::Skipping, LineKind::DescriptionClose) => {
                state = State::Scanning;
                false
            }
            (State::Skipping, _) => false,
            // Stray top-level lines (including a dangling close) are dropped.
            (State::Scanning, _) => false,
        };

        if keep {
            writer
                .write_all(line.as_bytes())
                .map_err(|e| FilterError::io("write", output, e))?;
        }
    }

    if matches!(state, State::Keeping | State::Skipping) {
        warn!(
            "{}: input ended inside a description block; closing the document anyway",
            input.display()
        );
    }

    writeln!(writer, "{}", CLOSING_MARKER).map_err(|e| FilterError::io("write", output, e))?;

    debug!(
        "{}: {} lines read, {} blocks kept, {} blocks dropped",
        input.display(),
        stats.lines_read,
        stats.blocks_kept,
        stats.blocks_dropped
    );
    Ok(stats)
}
