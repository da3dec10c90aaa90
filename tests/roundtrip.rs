//! Integration tests exercising the encoder/decoder/repairer pipeline end to end.

use frad_codec::{
    common::{crc16_ansi, crc32, FRM_SIGN, SIGNATURE},
    head, ASFH, Decoder, Encoder, Endian, PCMFormat, Repairer,
};

fn f64be_bytes(samples: &[f64]) -> Vec<u8> {
    samples.iter().flat_map(|x| x.to_be_bytes()).collect()
}

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 - 1024.0) / 1024.0).collect()
}

/// E1 + property 1: profile 4 (untransformed lossless) round-trips exactly
/// (to within the declared bit depth's quantisation step).
#[test]
fn e1_profile4_mono_ramp_round_trips() {
    let samples = ramp(2048);
    let mut enc = Encoder::new(4, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(2048).unwrap();
    enc.set_srate(48000).unwrap();
    enc.set_bit_depth(16).unwrap();
    enc.set_little_endian(false);

    let bytes = f64be_bytes(&samples);
    let mut result = enc.process(bytes);
    result.buf.extend(enc.flush().buf);

    assert_eq!(&result.buf[0..4], &FRM_SIGN);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(result.buf);

    assert_eq!(decoded.pcm.len(), samples.len());
    for (got, want) in decoded.pcm.iter().zip(samples.iter()) {
        assert!((got[0] - want).abs() < 1.0 / 32768.0, "got={} want={}", got[0], want);
    }
}

/// Property 1: profile 0 (lossless, transformed) round-trips exactly at 64-bit depth.
#[test]
fn profile0_stereo_round_trips_at_max_depth() {
    let n = 512usize;
    let samples: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let t = i as f64 / 48000.0;
            vec![(2.0 * std::f64::consts::PI * 300.0 * t).sin(), (2.0 * std::f64::consts::PI * 450.0 * t).cos()]
        })
        .collect();
    let flat: Vec<f64> = samples.iter().flatten().cloned().collect();

    let mut enc = Encoder::new(0, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(2).unwrap();
    enc.set_frame_size(n as u32).unwrap();
    enc.set_srate(48000).unwrap();
    enc.set_bit_depth(64).unwrap();
    enc.set_little_endian(false);

    let mut result = enc.process(f64be_bytes(&flat));
    result.buf.extend(enc.flush().buf);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(result.buf);

    assert_eq!(decoded.pcm.len(), n);
    for (got, want) in decoded.pcm.iter().zip(samples.iter()) {
        for (g, w) in got.iter().zip(want.iter()) {
            assert!((g - w).abs() < 1e-6, "got={g} want={w}");
        }
    }
}

/// Property 2: profile 1's decode length matches the input length and stays near the source.
#[test]
fn profile1_near_round_trip_preserves_length() {
    let n = 2048usize;
    let srate = 48000u32;
    let samples: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / srate as f64).sin() * 0.4)
        .collect();

    let mut enc = Encoder::new(1, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(2048).unwrap();
    enc.set_srate(srate).unwrap();
    enc.set_bit_depth(16).unwrap();
    enc.set_loss_level(0.5);

    let mut result = enc.process(f64be_bytes(&samples));
    result.buf.extend(enc.flush().buf);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(result.buf);

    assert_eq!(decoded.pcm.len(), samples.len());
    let rms_err: f64 = decoded
        .pcm
        .iter()
        .zip(samples.iter())
        .map(|(d, s)| (d[0] - s).powi(2))
        .sum::<f64>()
        .sqrt()
        / decoded.pcm.len() as f64;
    assert!(rms_err < 0.1, "rms_err={rms_err}");
}

/// E2: extended (64-bit) frame byte length is parsed correctly when the 32-bit field is 0xFFFFFFFF.
#[test]
fn e2_extended_frmbytes_parses_to_65536() {
    // Build a minimal lossless-profile header by hand: signature, 0xFFFFFFFF frmbytes,
    // PFB, channel byte, ecc ratio, srate, 8 reserved bytes, fsize, crc32, then the
    // extended 8-byte length appended after the normal 32-byte header.
    let mut header = FRM_SIGN.to_vec();
    header.extend([0xffu8, 0xff, 0xff, 0xff]); // frmbytes placeholder -> extended mode
    header.push(0); // PFB: profile 0, ecc off, big endian, bit depth index 0
    header.push(0); // channels - 1 = 0 -> 1 channel
    header.extend([0u8, 0]); // ecc ratio
    header.extend(48000u32.to_be_bytes());
    header.extend([0u8; 8]);
    header.extend(1024u32.to_be_bytes());
    header.extend([0u8; 4]); // crc32 placeholder
    header.extend([0, 0, 0, 0, 0, 1, 0, 0]); // extended frmbytes = 65536

    let mut asfh = ASFH::new();
    asfh.buffer = header[0..4].to_vec();
    let mut rest = header[4..].to_vec();
    asfh.read(&mut rest);
    assert_eq!(asfh.frmbytes, 65536);
}

/// E3: repairing with a wider ECC ratio re-wraps every frame without touching the payload.
#[test]
fn e3_repairer_rewraps_ecc_ratio() {
    let samples = ramp(512);
    let mut enc = Encoder::new(4, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(512).unwrap();
    enc.set_srate(48000).unwrap();
    enc.set_bit_depth(16).unwrap();
    enc.set_ecc(true, [96, 24]);

    let mut encoded = enc.process(f64be_bytes(&samples));
    encoded.buf.extend(enc.flush().buf);

    let mut repairer = Repairer::new([200, 55]);
    let repaired = repairer.process(encoded.buf);
    let repaired_tail = repairer.flush();
    let mut full = repaired;
    full.extend(repaired_tail);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(full.clone());

    assert_eq!(decoded.pcm.len(), samples.len());
    for (got, want) in decoded.pcm.iter().zip(samples.iter()) {
        assert!((got[0] - want).abs() < 1.0 / 32768.0);
    }

    assert_eq!(&full[0..4], &FRM_SIGN);
    let mut check = ASFH::new();
    check.buffer = full[0..4].to_vec();
    let mut rest = full[4..].to_vec();
    check.read(&mut rest);
    assert_eq!(check.ecc_ratio, [200, 55]);
    assert!(check.ecc);
}

/// E4: a compact-profile force-flush frame is recognised and flushes the overlap buffer.
#[test]
fn e4_force_flush_frame_flushes_overlap() {
    let n = 4096usize;
    let srate = 48000u32;
    let samples: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / srate as f64).sin() * 0.4)
        .collect();

    let mut enc = Encoder::new(1, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(2048).unwrap();
    enc.set_srate(srate).unwrap();
    enc.set_bit_depth(16).unwrap();
    enc.set_overlap_ratio(8);

    let mut encoded = enc.process(f64be_bytes(&samples));
    encoded.buf.extend(enc.flush().buf);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(encoded.buf);
    assert!(decoded.frames > 0);
}

/// E5: the container header's byte layout matches the spec's literal example.
#[test]
fn e5_head_builder_matches_literal_layout() {
    let meta = vec![("TITLE".to_string(), b"hi".to_vec())];
    let header = head::builder(&meta, Vec::new());

    assert_eq!(&header[0..4], &SIGNATURE);
    assert_eq!(header.len(), 64 + 19); // 64-byte prefix + one 19-byte comment block

    let block = &header[64..];
    assert_eq!(block[0..2], [0xfa, 0xaa]);
    assert_eq!(&block[2..8], &[0x00, 0x00, 0x00, 0x00, 0x00, 0x13]);
    assert_eq!(&block[8..12], &[0x00, 0x00, 0x00, 0x05]);
    assert_eq!(&block[12..17], b"TITLE");
    assert_eq!(&block[17..19], b"hi");

    let (parsed_meta, parsed_img) = head::parser(block.to_vec());
    assert_eq!(parsed_meta, meta);
    assert!(parsed_img.is_empty());
}

/// Property 8 / E6: resynchronisation after arbitrary leading junk, and incomplete-then-complete parsing.
#[test]
fn resynchronises_after_garbage_prefix() {
    let samples = ramp(512);
    let mut enc = Encoder::new(4, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(512).unwrap();
    enc.set_srate(48000).unwrap();
    enc.set_bit_depth(16).unwrap();

    let mut encoded = enc.process(f64be_bytes(&samples));
    encoded.buf.extend(enc.flush().buf);

    let mut with_garbage = vec![0x11u8, 0x22, 0x33, 0x00, 0xff, 0xd0]; // partial false-positive signature too
    with_garbage.extend(encoded.buf);

    let mut dec = Decoder::new(false);
    let decoded = dec.process(with_garbage);

    assert_eq!(decoded.pcm.len(), samples.len());
}

/// E6: a stream truncated inside the next frame's header yields no frames yet, and
/// completes once the remaining bytes arrive.
#[test]
fn e6_truncated_header_then_completes() {
    let samples = ramp(512);
    let mut enc = Encoder::new(1, PCMFormat::F64(Endian::Big)).unwrap();
    enc.set_channels(1).unwrap();
    enc.set_frame_size(512).unwrap();
    enc.set_srate(48000).unwrap();
    enc.set_bit_depth(16).unwrap();

    let mut encoded = enc.process(f64be_bytes(&samples));
    encoded.buf.extend(enc.flush().buf);

    let cut = encoded.buf.len() - 3;
    let (first, rest) = encoded.buf.split_at(cut);

    let mut dec = Decoder::new(false);
    let first_result = dec.process(first.to_vec());
    let second_result = dec.process(rest.to_vec());

    assert_eq!(first_result.pcm.len() + second_result.pcm.len(), samples.len());
}

/// Property 9: a channel-count change between frames is reported as a critical transition.
#[test]
fn critical_change_is_flagged_on_channel_count_change() {
    let mono = ramp(512);
    let stereo: Vec<f64> = ramp(512).into_iter().flat_map(|x| [x, -x]).collect();

    let mut enc1 = Encoder::new(4, PCMFormat::F64(Endian::Big)).unwrap();
    enc1.set_channels(1).unwrap();
    enc1.set_frame_size(512).unwrap();
    enc1.set_srate(48000).unwrap();
    enc1.set_bit_depth(16).unwrap();
    let mut stream = enc1.process(f64be_bytes(&mono));
    stream.buf.extend(enc1.flush().buf);

    let mut enc2 = Encoder::new(4, PCMFormat::F64(Endian::Big)).unwrap();
    enc2.set_channels(2).unwrap();
    enc2.set_frame_size(512).unwrap();
    enc2.set_srate(48000).unwrap();
    enc2.set_bit_depth(16).unwrap();
    let mut stream2 = enc2.process(f64be_bytes(&stereo));
    stream2.buf.extend(enc2.flush().buf);

    let mut full = stream.buf;
    full.extend(stream2.buf);

    let mut dec = Decoder::new(false);
    let first = dec.process(full);
    assert!(first.crit);
}

/// Property 4: CRC check vectors, exercised through the public `common` module.
#[test]
fn crc_check_vectors() {
    assert_eq!(crc16_ansi(b"123456789"), vec![0xbb, 0x3d]);
    assert_eq!(crc32(b"123456789"), vec![0xcb, 0xf4, 0x39, 0x26]);
}
