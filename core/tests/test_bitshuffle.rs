#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use framezip_core::buffer::{AllocationError, ChunkAllocator};
    use framezip_core::compression::codecs::BitshuffleLz4;
    use framezip_core::compression::shuffle::shuffle_into;
    use framezip_core::compression::{CompressionError, FrameCompressor};
    use framezip_core::config::ConfigurationError;
    use framezip_core::frame::Frame;
    use framezip_core::types::EngineError;

    fn noise(len: usize, seed: u64) -> Vec<u8> {
        let mut data = vec![0u8; len];
        StdRng::seed_from_u64(seed).fill_bytes(&mut data);
        data
    }

    fn ramp32(elements: usize) -> Vec<u8> {
        (0..elements as u32).flat_map(|i| (1000 + i / 3).to_le_bytes()).collect()
    }

    fn unshuffle(src: &[u8], depth: usize) -> Vec<u8> {
        if depth <= 1 {
            return src.to_vec();
        }
        let count = src.len() / depth;
        let body = count * depth;
        let mut out = vec![0u8; src.len()];
        for i in 0..count {
            for j in 0..depth {
                out[i * depth + j] = src[j * count + i];
            }
        }
        out[body..].copy_from_slice(&src[body..]);
        out
    }

    /// Decode a full bitshuffle frame back into the original bytes.
    fn decode(bytes: &[u8], depth: usize) -> Vec<u8> {
        let size = u64::from_be_bytes(bytes[0..8].try_into().unwrap()) as usize;
        let block_elements = u32::from_be_bytes(bytes[8..12].try_into().unwrap()) as usize;
        let payload = &bytes[12..];

        if block_elements == 0 {
            let shuffled = lz4_flex::block::decompress(payload, size).unwrap();
            return unshuffle(&shuffled, depth);
        }

        let block_bytes = block_elements * depth;
        let mut out = Vec::with_capacity(size);
        let mut pos = 0;
        while out.len() < size {
            let want = block_bytes.min(size - out.len());
            let n = u32::from_be_bytes(payload[pos..pos + 4].try_into().unwrap()) as usize;
            pos += 4;
            let shuffled = lz4_flex::block::decompress(&payload[pos..pos + n], want).unwrap();
            pos += n;
            out.extend_from_slice(&unshuffle(&shuffled, depth));
        }
        assert_eq!(pos, payload.len());
        out
    }

    #[test]
    fn shuffle_groups_bytes_by_significance() {
        let src = [0x01, 0xa1, 0x02, 0xa2, 0x03, 0xa3, 0xff];
        let mut dst = Vec::new();

        shuffle_into(&src, 2, &mut dst);

        assert_eq!(dst, vec![0x01, 0x02, 0x03, 0xa1, 0xa2, 0xa3, 0xff]);
        assert_eq!(unshuffle(&dst, 2), src);
    }

    #[test]
    fn sixteen_bytes_of_depth_four() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc.clone(), 0).unwrap();
        let data: Vec<u8> = (1..=16).collect();

        let list = bs.process(&Frame::new(0, &data, 4)).unwrap();

        assert_eq!(list.len(), 1);
        let bytes = list.to_vec();
        assert_eq!(u64::from_be_bytes(bytes[0..8].try_into().unwrap()), 16);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0]);
        assert!(list[0].capacity() >= 16);
        assert_eq!(decode(&bytes, 4), data);
    }

    #[test]
    fn smooth_image_compresses_below_raw_size() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc, 0).unwrap();
        let data = ramp32(250_000);

        let list = bs.process(&Frame::new(3, &data, 4)).unwrap();

        assert_eq!(list.len(), 1);
        assert!(list[0].capacity() >= data.len());
        assert!(list.total_used_bytes() < data.len() / 2);
        assert_eq!(decode(&list.to_vec(), 4), data);
    }

    #[test]
    fn incompressible_image_fits_its_chunk() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc, 0).unwrap();
        let data = noise(100_000, 21);

        let list = bs.process(&Frame::new(0, &data, 2)).unwrap();

        assert!(list[0].used() <= list[0].capacity());
        assert_eq!(decode(&list.to_vec(), 2), data);
    }

    #[test]
    fn trailing_partial_element_survives() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc, 0).unwrap();
        let data = noise(4 * 1000 + 3, 4);

        let bytes = bs.process(&Frame::new(0, &data, 4)).unwrap().to_vec();

        assert_eq!(decode(&bytes, 4), data);
    }

    #[test]
    fn blocked_payload_round_trips() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc, 1024).unwrap();
        let data = ramp32(10_000);

        let bytes = bs.process(&Frame::new(8, &data, 4)).unwrap().to_vec();

        assert_eq!(u32::from_be_bytes(bytes[8..12].try_into().unwrap()), 1024);
        assert_eq!(decode(&bytes, 4), data);
    }

    #[test]
    fn empty_frame_is_just_a_prefix_and_empty_block() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc, 0).unwrap();

        let bytes = bs.process(&Frame::new(0, &[], 2)).unwrap().to_vec();

        assert_eq!(u64::from_be_bytes(bytes[0..8].try_into().unwrap()), 0);
        assert!(decode(&bytes, 2).is_empty());
    }

    #[test]
    fn block_size_must_be_a_multiple_of_eight() {
        assert!(matches!(
            BitshuffleLz4::new(ChunkAllocator::new(), 100),
            Err(ConfigurationError::InvalidBlockSize { elements: 100 })
        ));
        assert!(BitshuffleLz4::new(ChunkAllocator::new(), 4096).is_ok());
    }

    #[test]
    fn allocation_failure_leaves_nothing_behind() {
        let alloc = ChunkAllocator::with_budget(4096);
        let mut bs = BitshuffleLz4::new(alloc.clone(), 0).unwrap();
        let data = vec![0u8; 16_384];

        let err = bs.process(&Frame::new(0, &data, 2)).unwrap_err();

        assert!(matches!(err, EngineError::Allocation(AllocationError::BudgetExceeded { .. })));
        assert_eq!(alloc.live_chunks(), 0);
    }

    #[test]
    fn zero_sample_depth_is_rejected() {
        let alloc = ChunkAllocator::new();
        let mut bs = BitshuffleLz4::new(alloc.clone(), 0).unwrap();

        let err = bs.process(&Frame::new(0, &[1, 2], 0)).unwrap_err();

        assert!(matches!(err, EngineError::Compression(CompressionError::InvalidFrame { .. })));
        assert_eq!(alloc.stats().allocations, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prefix_records_original_size(
            depth in prop::sample::select(vec![1usize, 2, 4, 8]),
            elements in 0usize..4096,
            seed in any::<u64>(),
        ) {
            let data = noise(depth * elements, seed);
            let mut bs = BitshuffleLz4::new(ChunkAllocator::new(), 0).unwrap();

            let list = bs.process(&Frame::new(0, &data, depth)).unwrap();
            let bytes = list.to_vec();

            prop_assert_eq!(list.len(), 1);
            prop_assert_eq!(u64::from_be_bytes(bytes[0..8].try_into().unwrap()), data.len() as u64);
            prop_assert_eq!(decode(&bytes, depth), data);
        }

        #[test]
        fn blocked_output_round_trips(
            depth in prop::sample::select(vec![1usize, 2, 4]),
            blocks_of_eight in 1u32..64,
            elements in 0usize..3000,
        ) {
            let data: Vec<u8> = (0..depth * elements).map(|i| (i / 7) as u8).collect();
            let mut bs = BitshuffleLz4::new(ChunkAllocator::new(), blocks_of_eight * 8).unwrap();

            let bytes = bs.process(&Frame::new(1, &data, depth)).unwrap().to_vec();

            prop_assert_eq!(decode(&bytes, depth), data);
        }
    }
}
