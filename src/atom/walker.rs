//! Bounded traversal of container atoms.

use std::io::{Read, Seek};

use tracing::{trace, warn};

use crate::{consts::HEADER_SIZE, errors::Severity, parser::ParseContext, AtomHeader, Mp4Error};

/// Walks the children of container atom `parent`,
/// calling `handler` once per child.
///
/// Children are read while at least a minimal header (8 bytes) remains
/// within the parent. A child whose declared size exceeds what remains
/// of the parent ends the walk for this parent without raising an error.
/// Handlers may under-read: the cursor is always moved to the end of
/// the child before the next sibling is read.
///
/// Errors raised by `handler` with severity `Atom` or `Recoverable`
/// skip that child only. `Track` and `Fatal` errors are propagated.
pub(crate) fn walk<R, F>(
    ctx: &mut ParseContext<R>,
    parent: &AtomHeader,
    mut handler: F,
) -> Result<(), Mp4Error>
where
    R: Read + Seek,
    F: FnMut(&mut ParseContext<R>, AtomHeader) -> Result<(), Mp4Error>,
{
    let end = parent.end().min(ctx.reader.len());
    ctx.reader.seek_to(parent.data_offset().min(end))?;

    loop {
        let pos = ctx.reader.pos()?;
        if end.saturating_sub(pos) < HEADER_SIZE as u64 {
            break;
        }

        let child = match AtomHeader::read(&mut ctx.reader, end) {
            Ok(hdr) => hdr,
            Err(err) if err.severity() != Severity::Fatal => {
                warn!(parent = %parent.name, offset = pos, "Stopped reading children: {err}");
                break;
            }
            Err(err) => return Err(err),
        };

        if child.end() > end {
            warn!(
                parent = %parent.name,
                child = %child.name,
                offset = child.offset,
                size = child.atom_size,
                parent_end = end,
                "Child atom exceeds parent bounds"
            );
            break;
        }

        trace!(name = %child.name, offset = child.offset, size = child.atom_size, "atom");

        if let Err(err) = handler(ctx, child) {
            match err.severity() {
                Severity::Atom | Severity::Recoverable => {
                    warn!(name = %child.name, offset = child.offset, "Skipped atom: {err}");
                }
                Severity::Track | Severity::Fatal => return Err(err),
            }
        }

        ctx.reader.seek_to(child.end())?;
    }

    Ok(())
}
