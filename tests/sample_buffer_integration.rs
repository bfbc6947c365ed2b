//! SampleBuffer integration tests
//!
//! Exercises owned and referenced storage through the public API, the way a
//! host hands channel arrays to the real-time callback.

mod helpers;

use approx::assert_relative_eq;
use cadenza::{Ownership, ResizePolicy, SampleBuffer};
use helpers::tolerances::{FLOAT_EPSILON, NARROWING_EPSILON, RAMP_EPSILON};
use helpers::*;

#[test]
fn fresh_buffer_reports_shape_and_reads_safely() {
    init_tracing();
    let buffer = SampleBuffer::<f32>::new(4, TEST_FRAMES).unwrap();
    assert_eq!(buffer.channels(), 4);
    assert_eq!(buffer.frames(), TEST_FRAMES);
    assert!(!buffer.is_cleared());

    let mut count = 0;
    for channel in buffer.channels_iter() {
        count += channel.iter().filter(|s| s.is_finite()).count();
    }
    assert_eq!(count, 4 * TEST_FRAMES);
}

#[test]
fn clear_all_then_set() {
    let mut buffer = staircase_buffer(2, TEST_FRAMES);
    buffer.clear_all();
    assert!(buffer.is_cleared());
    for channel in buffer.channels_iter() {
        assert_silence(channel);
    }

    buffer.set(1, TEST_FRAMES - 1, 0.5);
    assert!(!buffer.is_cleared());
}

#[test]
fn refer_to_writes_through_to_host_memory() {
    let mut left = vec![0.0f32; 64];
    let mut right = vec![0.0f32; 64];
    let host = [left.as_mut_ptr(), right.as_mut_ptr()];

    let mut buffer = SampleBuffer::<f32>::empty();
    unsafe { buffer.refer_to(&host, 32, 16).unwrap() };

    assert_eq!(buffer.ownership(), Ownership::Referenced { offset: 16 });
    let table = buffer.channel_ptrs();
    assert_eq!(table[0], unsafe { host[0].add(16) });
    assert_eq!(table[1], unsafe { host[1].add(16) });

    buffer.set(0, 0, 0.25);
    buffer.set(1, 31, -0.75);
    buffer.apply_gain_channel(0, 2.0);
    drop(buffer);

    assert_eq!(left[16], 0.5);
    assert_eq!(right[47], -0.75);
    assert_eq!(left[15], 0.0);
}

#[test]
fn referenced_clear_zeroes_host_memory() {
    let mut host_channel = generate_dc(1.0, 8);
    let host = [host_channel.as_mut_ptr()];

    let mut buffer = SampleBuffer::<f32>::new(2, 2).unwrap();
    unsafe { buffer.refer_to(&host, 8, 0).unwrap() };
    buffer.clear_channel(0);
    assert!(buffer.is_cleared());
    drop(buffer);

    assert_silence(&host_channel);
}

#[test]
fn preserve_resize_keeps_overlap() {
    let mut buffer = staircase_buffer(3, 16);
    buffer
        .resize(2, 32, ResizePolicy::default().preserve().clear())
        .unwrap();

    for c in 0..2 {
        for f in 0..16 {
            assert_eq!(buffer.get(c, f), (c * 1000 + f) as f32);
        }
        assert_silence(&buffer.channel(c)[16..]);
    }
}

#[test]
fn no_realloc_keeps_block_across_shrink_and_regrow() {
    let mut buffer = SampleBuffer::<f32>::new(2, TEST_FRAMES).unwrap();
    let bytes = buffer.allocated_bytes();
    let policy = ResizePolicy::default().clear().no_realloc();

    buffer.resize(2, 128, policy).unwrap();
    assert_eq!(buffer.allocated_bytes(), bytes);
    buffer.resize(1, TEST_FRAMES * 2, policy).unwrap();
    assert_eq!(buffer.allocated_bytes(), bytes);
    buffer.resize(2, TEST_FRAMES, policy).unwrap();
    assert_eq!(buffer.allocated_bytes(), bytes);
    assert!(buffer.is_cleared());
}

#[test]
fn gain_and_fade() {
    let mut buffer = SampleBuffer::<f32>::new(2, 1000).unwrap();
    for c in 0..2 {
        buffer.channel_mut(c).copy_from_slice(&generate_dc(1.0, 1000));
    }

    buffer.apply_gain(0.5);
    assert_relative_eq!(buffer.get(0, 999), 0.5, epsilon = FLOAT_EPSILON);

    buffer.fade(1.0, 0.0);
    assert_relative_eq!(buffer.get(0, 0), 0.5, epsilon = FLOAT_EPSILON);
    assert_relative_eq!(buffer.get(1, 500), 0.25, epsilon = RAMP_EPSILON);
    assert_relative_eq!(buffer.get(1, 999), 0.0005, epsilon = RAMP_EPSILON);
}

#[test]
fn gain_on_cleared_buffer_is_skipped() {
    let mut buffer = SampleBuffer::<f64>::new(1, 8).unwrap();
    buffer.clear_all();
    buffer.apply_gain(4.0);
    buffer.fade(0.0, 2.0);
    assert!(buffer.is_cleared());
}

#[test]
fn duplicate_narrows_f64_source() {
    let source: Vec<f64> = (0..TEST_FRAMES).map(|i| (i as f64 * 0.1).sin()).collect();
    let mut buffer = SampleBuffer::<f32>::new(8, 8).unwrap();
    buffer.duplicate(&[source.as_slice(), source.as_slice()], TEST_FRAMES)
        .unwrap();

    assert_eq!(buffer.channels(), 2);
    assert_eq!(buffer.frames(), TEST_FRAMES);
    for (actual, expected) in buffer.channel(1).iter().zip(&source) {
        assert_relative_eq!(*actual as f64, *expected, epsilon = NARROWING_EPSILON);
    }
}

#[test]
fn duplicate_widens_into_owned_copy() {
    let mut staircase = generate_integer_staircase(16);
    let host = [staircase.as_mut_ptr()];
    let mut referenced = SampleBuffer::<f32>::empty();
    unsafe { referenced.refer_to(&host, 16, 0).unwrap() };

    let mut copy = SampleBuffer::<f64>::empty();
    copy.duplicate(&[referenced.channel(0)], 16).unwrap();
    drop(referenced);

    staircase[3] = -1.0;
    assert_eq!(copy.get(0, 3), 3.0);
    assert_eq!(copy.ownership(), Ownership::Owned);
}

#[test]
fn display_format() {
    let buffer = SampleBuffer::<f32>::new(2, 256).unwrap();
    assert_eq!(format!("{}", buffer), "SampleBuffer: channels=2 length=256");
}
