use std::{
    io::{LineWriter, Write},
    thread::{self, JoinHandle},
};

use crate::error::LandsatError;
use crossbeam_channel::Receiver;

/// Start the only thread that ever writes to the result file.
///
/// Each identifier received becomes one line. The thread ends once every sender is dropped and
/// reports how many lines it wrote.
pub fn start_sink_thread<W>(
    ids: Receiver<String>,
    out: W,
) -> Result<JoinHandle<Result<usize, LandsatError>>, LandsatError>
where
    W: Write + Send + 'static,
{
    let jh = thread::Builder::new()
        .name("Result Sink".to_owned())
        .spawn(move || {
            let mut out = LineWriter::new(out);
            let mut written = 0;

            for id in ids {
                match writeln!(out, "{}", id) {
                    Ok(()) => written += 1,
                    Err(err) => log::error!("Failed to write id \"{}\": {}", id, err),
                }
            }

            out.flush()?;
            Ok(written)
        })?;

    Ok(jh)
}
