use std::io::{self, BufRead, Write};

use lognorm::{boot, Event};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (processor, _config) = boot::boot()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut event = Event::from_message(line);
        processor.process(&mut event);
        serde_json::to_writer(&mut out, &event)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    let snapshot = processor.metrics().snapshot();
    tracing::info!(
        events = snapshot.events_processed,
        unmatched = snapshot.events_unmatched,
        match_rate = snapshot.match_rate,
        avg_us = snapshot.avg_process_time_us,
        "done"
    );
    Ok(())
}
