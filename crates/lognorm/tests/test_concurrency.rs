use std::thread;

use pretty_assertions::assert_eq;

use lognorm::{Event, ParserConfig};

use fixtures::*;

const THREADS: usize = 4;
const EVENTS_PER_THREAD: usize = 50;

#[test]
fn test_shared_processor_across_threads() {
    let processor = asa(&ParserConfig::default());
    let lines = [VPN_TEARDOWN, ACL_DENY, ACL_DENY_ICMP, NOT_ASA];

    let expected: Vec<Event> = lines
        .iter()
        .map(|line| {
            let mut event = Event::from_message(*line);
            processor.process_at(&mut event, clock());
            event
        })
        .collect();

    thread::scope(|s| {
        for t in 0..THREADS {
            let processor = &processor;
            let expected = &expected;
            s.spawn(move || {
                for i in 0..EVENTS_PER_THREAD {
                    let idx = (t + i) % lines.len();
                    let mut event = Event::from_message(lines[idx]);
                    processor.process_at(&mut event, clock());
                    assert_eq!(event, expected[idx]);
                }
            });
        }
    });

    let snapshot = processor.metrics().snapshot();
    assert_eq!(
        snapshot.events_processed,
        (lines.len() + THREADS * EVENTS_PER_THREAD) as u64
    );
}
