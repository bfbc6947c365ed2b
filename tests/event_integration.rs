//! Event log and event pipe integration tests (requires "midi" feature)
//!
//! Run with:
//! ```bash
//! cargo test -p cadenza --test event_integration
//! ```

#![cfg(feature = "midi")]

mod helpers;

use cadenza::midi::{HEADER_SIZE, MAX_PAYLOAD};
use cadenza::prelude::*;
use helpers::*;

#[test]
fn insert_out_of_order_iterates_sorted() {
    init_tracing();
    let mut log = EventLog::with_capacity(64).unwrap();
    for frame in [20, 0, 10, 50] {
        log.insert(&[0x90, 60, frame as u8], frame).unwrap();
    }

    assert_eq!(frames_of(&log), vec![0, 10, 20, 50]);
    for event in &log {
        assert_eq!(event.len(), 3);
        assert_eq!(event.data, &[0x90, 60, event.frame as u8]);
    }
}

#[test]
fn thousand_inserts_grow_from_tiny_reserve() {
    let mut log = EventLog::with_capacity(8).unwrap();
    for i in 0..1000i32 {
        log.insert(&[0xB0, 1, (i % 128) as u8], (i * 31) % 997)
            .unwrap();
    }

    let frames = frames_of(&log);
    assert_eq!(frames.len(), 1000);
    assert!(frames.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(log.used(), 1000 * (HEADER_SIZE + 3));
    assert!(log.capacity() >= log.used());
}

#[test]
fn swap_twice_restores_both() {
    let mut a = EventLog::with_capacity(128).unwrap();
    let mut b = EventLog::with_capacity(16).unwrap();
    a.insert(&[0x90, 60, 100], 0).unwrap();
    b.insert(&[0x80, 60, 0], 5).unwrap();
    b.insert(&[0x80, 61, 0], 6).unwrap();

    let (a_before, b_before) = (a.clone(), b.clone());
    let (a_capacity, b_capacity) = (a.capacity(), b.capacity());

    a.swap(&mut b);
    assert_eq!(a, b_before);
    assert_eq!(a.capacity(), b_capacity);

    a.swap(&mut b);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
    assert_eq!(a.capacity(), a_capacity);
    assert_eq!(b.capacity(), b_capacity);
}

#[test]
fn midi_messages_through_a_log() {
    let mut log = EventLog::new();
    log.insert_message(&MidiMessage::note_off(2, 64, 0), 256)
        .unwrap();
    log.insert_message(&MidiMessage::note_on(2, 64, 90), 0)
        .unwrap();
    log.insert_message(&MidiMessage::controller(2, 64, 127), 128)
        .unwrap();

    let messages: Vec<MidiMessage> = log.iter().map(|event| event.to_message()).collect();
    assert!(messages[0].is_note_on());
    assert!(messages[1].is_controller());
    assert!(messages[2].is_note_off());
    assert!(messages.iter().all(|msg| msg.channel() == 2));
}

#[test]
fn sysex_payloads_keep_their_length() {
    let sysex: Vec<u8> = std::iter::once(0xF0)
        .chain(0..200u8)
        .chain(std::iter::once(0xF7))
        .collect();
    let mut log = EventLog::new();
    log.insert(&sysex, 3).unwrap();
    log.insert(&[0xF8], 3).unwrap();

    let lengths: Vec<usize> = log.iter().map(|event| event.len()).collect();
    assert_eq!(lengths, vec![1, 202]);
}

#[test]
#[should_panic]
fn oversized_payload_is_a_caller_bug() {
    let payload = vec![0u8; MAX_PAYLOAD + 1];
    let _ = EventLog::new().insert(&payload, 0);
}

#[test]
fn merge_logs_with_offset() {
    let mut source = EventLog::new();
    for frame in (0..512).step_by(64) {
        source.insert(&[0xF8], frame).unwrap();
    }

    let mut next_block = EventLog::new();
    next_block.add_events(&source, 256, None, -256).unwrap();
    assert_eq!(frames_of(&next_block), vec![0, 64, 128, 192]);

    source.clear_range(256, 256);
    assert_eq!(source.last_frame(), Some(192));
}

#[test]
fn pipe_shrink_preserves_and_grow_discards() {
    let mut pipe = EventPipe::with_capacity(4, 256).unwrap();
    for (port, log) in pipe.iter_mut().enumerate() {
        log.insert(&[0x90, port as u8, 100], port as i32).unwrap();
    }

    pipe.resize(2).unwrap();
    assert_eq!(pipe.len(), 2);
    assert_eq!(pipe.size(), 4);
    assert_eq!(pipe.get(0).unwrap().first_frame(), Some(0));
    assert_eq!(pipe.get(1).unwrap().first_frame(), Some(1));
    assert!(pipe.get(2).is_none());

    pipe.resize(8).unwrap();
    assert_eq!(pipe.len(), 8);
    assert_eq!(pipe.size(), 8);
    assert!(pipe.iter().all(|log| log.is_empty()));
    assert!(pipe.iter().all(|log| log.capacity() >= 256));
}

#[test]
fn pipe_clear_all_touches_active_ports_only() {
    let mut pipe = EventPipe::new(3).unwrap();
    for log in pipe.iter_mut() {
        log.insert(&[0xFE], 0).unwrap();
    }

    pipe.resize(1).unwrap();
    pipe.clear_all();
    pipe.resize(3).unwrap();

    assert!(pipe.get(0).unwrap().is_empty());
    assert_eq!(pipe.get(2).unwrap().num_events(), 1);
    assert_eq!(format!("{}", pipe), "EventPipe: nbuffers=3");
}
