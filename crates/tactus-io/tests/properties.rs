//! Property-based tests for the renderer's block accounting.

use proptest::prelude::*;
use tactus_config::InstrumentConfig;
use tactus_core::AudioBlock;
use tactus_io::{EngineContext, RenderStatus};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A recording of `len` frames rendered in blocks of `block` frames plays
    /// for exactly `ceil(len / block)` blocks, the cursor never passes the
    /// recorded length, and the part of the last block past the recording is
    /// silent.
    #[test]
    fn playback_covers_recording_exactly_once(
        len in 1usize..600,
        block in 1usize..=256,
        channels in 1u16..=2,
    ) {
        let mut config = InstrumentConfig::default();
        config.audio.channels = channels;
        config.audio.block_size = 256;
        let (surface, mut engine, mut capture) =
            EngineContext::with_capacity(&config, len).unwrap().into_parts();

        let ch = usize::from(channels);
        prop_assert_eq!(capture.capture(&vec![0.5; len * ch]), len);
        surface.request_start();

        let expected_blocks = len.div_ceil(block);
        let mut out = AudioBlock::new(ch, block);
        for n in 1..=expected_blocks {
            let status = engine.render_block(&mut out);
            prop_assert!(status.is_audible(), "block {} of {}: {:?}", n, expected_blocks, status);
            prop_assert_eq!(engine.read_index(), (n * block).min(len));

            if let RenderStatus::Ended { frames } = status {
                prop_assert_eq!(n, expected_blocks);
                for c in 0..ch {
                    prop_assert!(out.channel(c)[frames..].iter().all(|&s| s == 0.0));
                }
            }
        }

        prop_assert_eq!(engine.render_block(&mut out), RenderStatus::Stopped);
        prop_assert_eq!(engine.read_index(), 0);
        for c in 0..ch {
            prop_assert!(out.channel(c).iter().all(|&s| s == 0.0));
        }
    }
}
