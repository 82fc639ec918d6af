use approx::assert_relative_eq;
use classic_codecs::code_table::{deserialize, serialize};
use classic_codecs::compression::{
    entropy, lz77, lzw, Compression, FrequencyTable, Huffman, Lz77, Lzw, PrefixCoder, ShannonFano,
};
use classic_codecs::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_buffer(rng: &mut StdRng, len: usize, alphabet: u8) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..=alphabet)).collect()
}

/// Empty, repeated byte, every byte once, and random buffers of varying length.
fn corpus() -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut buffers = vec![
        Vec::new(),
        vec![b'q'],
        vec![0x42; 1000],
        (0..=255u8).collect(),
        b"TOBEORNOTTOBEORTOBEORNOT#".to_vec(),
    ];
    for &len in &[2usize, 17, 300, 4096] {
        buffers.push(random_buffer(&mut rng, len, 255));
        buffers.push(random_buffer(&mut rng, len, 3));
    }
    buffers
}

#[test]
fn test_prefix_coders_round_trip() {
    let coders: [&dyn PrefixCoder; 2] = [&ShannonFano, &Huffman];
    for coder in coders {
        for data in corpus() {
            let (bits, table) = coder.encode(&data).unwrap();
            assert_eq!(coder.decode(&bits, &table).unwrap(), data);

            let (packed, table) = coder.encode_packed(&data).unwrap();
            assert_eq!(packed.len(), bits.len().div_ceil(8));
            let decoded = coder
                .decode_packed(&packed, &table, Some(data.len()))
                .unwrap();
            assert_eq!(decoded, data);
        }
    }
}

#[test]
fn test_stream_codecs_round_trip() {
    let default_lz77 = Lz77::default();
    let small_lz77 = Lz77::new(8, 3).unwrap();
    let codecs: [&dyn Compression; 3] = [&default_lz77, &small_lz77, &Lzw];
    for codec in codecs {
        for data in corpus() {
            let stream = codec.compress(&data).unwrap();
            assert_eq!(codec.decompress(&stream).unwrap(), data);
        }
    }
}

#[test]
fn test_prefix_free_codes() {
    let mut rng = StdRng::seed_from_u64(7);
    for alphabet in [1u8, 2, 5, 40, 255] {
        let data = random_buffer(&mut rng, 2000, alphabet);
        let freq = FrequencyTable::from_data(&data);
        assert!(freq.distinct() >= 2);
        for table in [
            ShannonFano.code_table_for(&freq),
            Huffman.code_table_for(&freq),
        ] {
            assert_eq!(table.len(), freq.distinct());
            assert!(table.is_prefix_free());
        }
    }
}

#[test]
fn test_huffman_is_optimal() {
    let freq: FrequencyTable = [
        (b'a', 5),
        (b'b', 9),
        (b'c', 12),
        (b'd', 13),
        (b'e', 16),
        (b'f', 45),
    ]
    .into_iter()
    .collect();
    let huffman = Huffman.code_table_for(&freq).expected_length(&freq);
    let shannon_fano = ShannonFano.code_table_for(&freq).expected_length(&freq);
    assert_relative_eq!(huffman, 2.24, epsilon = 1e-12);
    assert!(huffman <= shannon_fano);
    // Never below the entropy bound.
    assert!(huffman >= freq.entropy());
}

#[test]
fn test_huffman_never_longer_than_shannon_fano() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let data = random_buffer(&mut rng, 500, 20);
        let freq = FrequencyTable::from_data(&data);
        let huffman = Huffman.code_table_for(&freq).expected_length(&freq);
        let shannon_fano = ShannonFano.code_table_for(&freq).expected_length(&freq);
        assert!(huffman <= shannon_fano + 1e-12);
    }
}

#[test]
fn test_code_table_round_trip() {
    for data in corpus() {
        for table in [
            ShannonFano.build_code_table(&data),
            Huffman.build_code_table(&data),
        ] {
            assert_eq!(deserialize(&serialize(&table)).unwrap(), table);
        }
    }
}

#[test]
fn test_lz77_offsets_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let data = random_buffer(&mut rng, 5000, 4);
    for window in [1u16, 7, 64, 256] {
        let codec = Lz77::new(window, 16).unwrap();
        let tokens = codec.tokens(&data);
        let mut position = 0usize;
        for token in &tokens {
            if token.is_literal() {
                assert_eq!(token.offset, 0);
            } else {
                assert!(token.offset >= 1 && token.offset <= window);
                assert!(token.offset as usize <= position);
                assert!(token.length <= 16);
            }
            position += token.length as usize + 1;
        }
        assert_eq!(position, data.len());
        assert_eq!(lz77::decompress(&tokens).unwrap(), data);
    }
}

#[test]
fn test_lzw_dictionary_growth() {
    for data in corpus() {
        let (codes, added) = lzw::compress_with_stats(&data);
        assert!(added <= data.len());
        let (decoded, dict) = lzw::decompress_with_dictionary(&codes).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(dict.added(), added);
        assert_eq!(added, codes.len().saturating_sub(1));
    }
}

#[test]
fn test_entropy_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for data in corpus().into_iter().chain((0..10).map(|_| random_buffer(&mut rng, 64, 9))) {
        let h = entropy(&data);
        let distinct = FrequencyTable::from_data(&data).distinct();
        assert!(h >= 0.0);
        if distinct <= 1 {
            assert_eq!(h, 0.0);
        } else {
            assert!(h > 0.0);
            assert!(h <= (distinct as f64).log2() + 1e-12);
        }
    }
}

#[test]
fn test_corrupt_lzw_stream() {
    let mut codes = lzw::compress(b"abababababab");
    let next = 256 + codes.len() as u32 - 1;
    codes.push(next + 5);
    match lzw::decompress(&codes) {
        Err(Error::Dictionary { code, expected }) => {
            assert_eq!(code, next + 5);
            assert_eq!(expected, next);
        }
        other => panic!("expected a dictionary error, got {:?}", other),
    }

    // An out-of-range code inside a persisted record stream.
    let mut stream = Lzw.compress(b"abc").unwrap();
    stream.extend_from_slice(&[0x01, 0xFF]);
    assert!(matches!(
        Lzw.decompress(&stream),
        Err(Error::Dictionary { code: 511, .. })
    ));
}
