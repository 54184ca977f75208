#[cfg(test)]
mod tests {
    use framezip_core::compression::{create_engine, resolve, EngineKind, EngineScope};
    use framezip_core::config::{ConfigurationError, EngineConfig, Lz4BlockSize};
    use framezip_core::constants::DEFAULT_CHUNK_SIZE;
    use framezip_core::types::EngineError;

    #[test]
    fn defaults_match_the_documented_table() {
        let config = EngineConfig::default();

        assert_eq!(config.kind, EngineKind::StreamDeflate);
        assert_eq!(config.effective_level(), 8);
        assert_eq!(config.frames_per_file, 1);
        assert!(config.header.is_empty());
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.lz4_block_size, Lz4BlockSize::Max64Kb);
        assert!(config.lz4_content_checksum);
        assert_eq!(config.bitshuffle_block_size, 0);
        assert_eq!(config.memory_budget, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn raw_deflate_defaults_to_level_six() {
        assert_eq!(EngineConfig::new(EngineKind::RawDeflate).effective_level(), 6);
        assert_eq!(EngineConfig::new(EngineKind::RawDeflate).with_level(2).effective_level(), 2);
        assert_eq!(EngineConfig::new(EngineKind::FrameLz4).effective_level(), 0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = EngineConfig::from_json(r#"{ "kind": "raw_deflate", "level": 3 }"#).unwrap();

        assert_eq!(config.kind, EngineKind::RawDeflate);
        assert_eq!(config.level, Some(3));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn json_round_trip_keeps_header_order() {
        let config = EngineConfig::new(EngineKind::FrameLz4)
            .with_lz4_block_size(Lz4BlockSize::Max1Mb)
            .with_lz4_content_checksum(false)
            .with_header_entry("zeta", "1")
            .with_header_entry("alpha", "2")
            .with_memory_budget(1 << 20);

        let json = config.to_json().unwrap();
        let back = EngineConfig::from_json(&json).unwrap();

        assert_eq!(back, config);
        let keys: Vec<&str> = back.header.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert!(json.contains("\"max1_mb\"") || json.contains("max1_mb"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(EngineConfig::from_json("{ not json"), Err(ConfigurationError::Parse(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "kind": "zstd" }"#),
            Err(ConfigurationError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cases = [
            (EngineConfig::new(EngineKind::RawDeflate).with_level(12), "level"),
            (EngineConfig::new(EngineKind::FrameLz4).with_level(3), "level"),
            (EngineConfig::default().with_chunk_size(1000), "chunk"),
            (EngineConfig::default().with_chunk_size(64 * 1024 * 1024), "chunk"),
            (EngineConfig::new(EngineKind::BitshuffleLz4).with_bitshuffle_block_size(12), "block"),
            (EngineConfig::default().with_memory_budget(1024), "budget"),
        ];
        for (config, what) in cases {
            let err = config.validate().unwrap_err();
            let ok = match what {
                "level" => matches!(err, ConfigurationError::LevelOutOfRange { .. } | ConfigurationError::LevelNotSupported { .. }),
                "chunk" => matches!(err, ConfigurationError::InvalidChunkSize { .. }),
                "block" => matches!(err, ConfigurationError::InvalidBlockSize { .. }),
                _ => matches!(err, ConfigurationError::BudgetTooSmall { .. }),
            };
            assert!(ok, "{}: unexpected {:?}", what, err);
        }
    }

    #[test]
    fn engine_ids_are_stable() {
        assert_eq!(EngineKind::StreamDeflate.id(), 1);
        assert_eq!(EngineKind::FrameLz4.id(), 2);
        assert_eq!(EngineKind::BitshuffleLz4.id(), 3);
        assert_eq!(EngineKind::RawDeflate.id(), 4);
        assert_eq!(EngineKind::verify(3).unwrap(), EngineKind::BitshuffleLz4);
    }

    #[test]
    fn unknown_engine_id_is_reported_in_hex() {
        let err = EngineKind::verify(0x2a).unwrap_err();

        assert_eq!(err, ConfigurationError::UnknownEngine { raw: 0x2a });
        assert!(err.to_string().contains("0x2a"));
        assert!(resolve(0).is_err());
    }

    #[test]
    fn registry_describes_every_engine() {
        let gzip = resolve(1).unwrap();
        assert_eq!((gzip.name, gzip.scope, gzip.default_level), ("gzip", EngineScope::File, Some(8)));

        let lz4 = resolve(2).unwrap();
        assert_eq!((lz4.name, lz4.scope, lz4.default_level), ("lz4", EngineScope::File, None));

        let bslz4 = resolve(3).unwrap();
        assert_eq!((bslz4.name, bslz4.scope), ("bslz4", EngineScope::Image));

        let deflate = resolve(4).unwrap();
        assert_eq!((deflate.name, deflate.scope, deflate.default_level), ("deflate", EngineScope::Image, Some(6)));
    }

    #[test]
    fn factory_builds_the_configured_variant() {
        for kind in [EngineKind::StreamDeflate, EngineKind::FrameLz4, EngineKind::BitshuffleLz4, EngineKind::RawDeflate] {
            let engine = create_engine(&EngineConfig::new(kind)).unwrap();
            assert_eq!(engine.kind(), kind);
            assert_eq!(engine.scope(), kind.scope());
        }
    }

    #[test]
    fn factory_honours_the_memory_budget() {
        let engine = create_engine(&EngineConfig::new(EngineKind::RawDeflate).with_memory_budget(4096)).unwrap();
        assert_eq!(engine.allocator().budget(), Some(4096));

        let err: EngineError = create_engine(&EngineConfig::new(EngineKind::RawDeflate).with_level(10))
            .unwrap_err()
            .into();
        assert!(matches!(err, EngineError::Configuration(ConfigurationError::LevelOutOfRange { level: 10, .. })));
    }
}
