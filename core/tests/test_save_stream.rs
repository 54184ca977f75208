// Delivery contract: exactly one delivery per successful frame, none for a
// failed one, and no chunk outliving a failure.

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::thread;

    use crossbeam::channel;
    use flate2::read::MultiGzDecoder;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use framezip_core::buffer::ChunkList;
    use framezip_core::compression::{create_engine, EngineKind};
    use framezip_core::config::EngineConfig;
    use framezip_core::frame::{Frame, HeaderMap};
    use framezip_core::save_stream::SaveStream;
    use framezip_core::sink::{Delivery, MemorySink, Sink};
    use framezip_core::types::EngineError;

    fn pixels(len: usize, seed: u32) -> Vec<u8> {
        (0..len as u32).map(|i| (i.wrapping_mul(seed) >> 3) as u8).collect()
    }

    #[test]
    fn successful_frames_are_delivered_once_each_in_order() {
        let config = EngineConfig::new(EngineKind::BitshuffleLz4);
        let mut stream = SaveStream::from_config(&config, MemorySink::new()).unwrap();
        let data = pixels(8192, 3);

        for n in [10, 11, 13] {
            stream.submit(&Frame::new(n, &data, 2)).unwrap();
        }

        assert_eq!(stream.sink().frame_numbers(), vec![10, 11, 13]);
        assert_eq!(stream.counters().frames_compressed, 3);

        let (sink, _) = stream.finish();
        let deliveries = sink.into_deliveries();
        assert_eq!(deliveries.len(), 3);
        assert!(deliveries.iter().all(|d| d.chunks.len() == 1));
    }

    #[test]
    fn failed_frame_is_never_delivered() {
        let config = EngineConfig::new(EngineKind::RawDeflate);
        let mut stream = SaveStream::from_config(&config, MemorySink::new()).unwrap();
        let data = pixels(1000, 5);

        stream.submit(&Frame::new(0, &data, 2)).unwrap();
        assert!(stream.submit(&Frame::new(1, &data, 0)).is_err());
        stream.submit(&Frame::new(2, &data, 2)).unwrap();

        assert_eq!(stream.sink().frame_numbers(), vec![0, 2]);
        assert_eq!(stream.counters().frames_failed, 1);
        assert_eq!(stream.counters().frames_total(), 3);
    }

    #[test]
    fn budget_failure_leaves_no_live_chunks_and_no_delivery() {
        let config = EngineConfig::new(EngineKind::StreamDeflate)
            .with_chunk_size(4096)
            .with_memory_budget(2 * 4096);
        let mut stream = SaveStream::from_config(&config, MemorySink::new()).unwrap();
        let mut noisy = vec![0u8; 100_000];
        StdRng::seed_from_u64(1).fill_bytes(&mut noisy);

        let err = stream.submit(&Frame::new(0, &noisy, 1)).unwrap_err();

        assert!(matches!(err, EngineError::Allocation(_)));
        assert!(stream.sink().is_empty());
        assert_eq!(stream.allocator().live_chunks(), 0);
    }

    #[test]
    fn delivered_chunks_stay_accounted_until_the_sink_drops_them() {
        let config = EngineConfig::new(EngineKind::FrameLz4);
        let mut stream = SaveStream::from_config(&config, MemorySink::new()).unwrap();
        let data = pixels(4096, 7);

        stream.submit(&Frame::new(0, &data, 1)).unwrap();
        stream.submit(&Frame::new(1, &data, 1)).unwrap();
        assert_eq!(stream.allocator().live_chunks(), 2);

        let allocator = stream.allocator().clone();
        let (sink, snapshot) = stream.finish();
        assert_eq!(snapshot.chunks_delivered, 2);
        drop(sink);
        assert_eq!(allocator.live_chunks(), 0);
    }

    #[test]
    fn gzip_file_of_frames_decodes_with_headers() {
        let config = EngineConfig::new(EngineKind::StreamDeflate)
            .with_frames_per_file(2)
            .with_header_entry("detector", "test");
        let mut stream = SaveStream::from_config(&config, MemorySink::new()).unwrap();
        let a = pixels(2000, 3);
        let b = pixels(3000, 11);

        stream.submit(&Frame::new(0, &a, 2)).unwrap();
        stream.submit(&Frame::new(1, &b, 2)).unwrap();

        let mut plain = Vec::new();
        MultiGzDecoder::new(stream.sink().concatenated().as_slice()).read_to_end(&mut plain).unwrap();
        let text = String::from_utf8_lossy(&plain);
        assert_eq!(text.matches("frames_per_file = 2 ;").count(), 2);
        assert_eq!(text.matches("detector = test ;").count(), 2);
        assert!(plain.ends_with(&b));
    }

    #[test]
    fn custom_header_writer_via_config() {
        fn fixed(_: &Frame<'_>, _: &HeaderMap, _: u32, out: &mut Vec<u8>) {
            out.extend_from_slice(b"HEADER");
        }
        let config = EngineConfig::new(EngineKind::FrameLz4);
        let mut stream = SaveStream::from_config_with_header(&config, Box::new(fixed), MemorySink::new()).unwrap();

        stream.submit(&Frame::new(0, b"abc", 1)).unwrap();

        let mut plain = Vec::new();
        lz4_flex::frame::FrameDecoder::new(stream.sink().concatenated().as_slice())
            .read_to_end(&mut plain)
            .unwrap();
        assert_eq!(plain, b"HEADERabc");
    }

    #[test]
    fn channel_sink_hands_chunks_to_a_writer_thread() {
        let (tx, rx) = channel::unbounded::<Delivery>();
        let config = EngineConfig::new(EngineKind::RawDeflate).with_level(1);
        let mut stream = SaveStream::from_config(&config, tx).unwrap();

        let writer = thread::spawn(move || {
            let mut seen = Vec::new();
            for delivery in rx {
                seen.push((delivery.frame_number, delivery.chunks.total_used_bytes()));
            }
            seen
        });

        let data = pixels(10_000, 13);
        for n in 0..5 {
            stream.submit(&Frame::new(n, &data, 2)).unwrap();
        }
        let (engine, tx) = stream.into_parts();
        drop(tx);

        let seen = writer.join().unwrap();
        assert_eq!(seen.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(seen.iter().all(|(_, bytes)| *bytes > 0));
        assert_eq!(engine.allocator().live_chunks(), 0);
    }

    #[test]
    fn disconnected_channel_frees_the_frame() {
        let (mut tx, rx) = channel::unbounded::<Delivery>();
        drop(rx);
        let engine = create_engine(&EngineConfig::new(EngineKind::RawDeflate)).unwrap();
        let allocator = engine.allocator().clone();
        let mut list = ChunkList::new();
        list.append(allocator.allocate(4096).unwrap());

        tx.deliver(0, list);

        assert_eq!(allocator.live_chunks(), 0);
    }

    #[test]
    fn independent_streams_run_in_parallel_with_identical_output() {
        let data = pixels(200_000, 17);
        let kinds = [EngineKind::StreamDeflate, EngineKind::FrameLz4, EngineKind::BitshuffleLz4, EngineKind::RawDeflate];

        let run = |kind: EngineKind| {
            let mut stream = SaveStream::from_config(&EngineConfig::new(kind), MemorySink::new()).unwrap();
            for n in 0..3 {
                stream.submit(&Frame::new(n, &data, 2)).unwrap();
            }
            stream.finish().0.concatenated()
        };

        let sequential: Vec<Vec<u8>> = kinds.iter().map(|&k| run(k)).collect();
        let parallel: Vec<Vec<u8>> = crossbeam::scope(|s| {
            let handles: Vec<_> = kinds.iter().map(|&k| s.spawn(move |_| run(k))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
        .unwrap();

        assert_eq!(sequential, parallel);
    }
}
