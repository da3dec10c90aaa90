/**                              FrAD Profile 1                               */
/**
 * Copyright 2024 HaמuL
 * Description: FrAD Profile 1 encoding and decoding core
 * Dependencies: flate2, half
 */

use crate::backend::{SplitFront, Transpose};
use super::{
    backend::core::{dct, idct},
    profiles::compact::{get_valid_srate, get_samples_min_ge},
    tools::p1tools
};

use flate2::{write::DeflateEncoder, read::DeflateDecoder, Compression};
use std::io::prelude::*;

// Bit depth table
pub const DEPTHS: [i16; 8] = [8, 12, 16, 24, 32, 48, 64, 0];

/** pad_pcm
 * Pads the PCM to the nearest sample count greater than the original
 * Parameters: f64 PCM
 * Returns: Padded f64 PCM
 */
pub(super) fn pad_pcm(mut pcm: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    if pcm.is_empty() { return pcm; }
    let len_smpl = pcm.len();
    let chnl = pcm[0].len();
    let pad_len = get_samples_min_ge(len_smpl as u32) as usize - len_smpl;

    pcm.extend(std::iter::repeat(vec![0.0; chnl]).take(pad_len));
    return pcm;
}

/** get_scale_factors
 * Gets the scale factors for PCM and thresholds
 * Parameters: Bit depth
 * Returns: 2.0^(bit_depth - 1) as PCM scale factor
 */
pub(super) fn get_scale_factors(bit_depth: i16) -> f64 {
    return 2.0_f64.powi(bit_depth as i32 - 1);
}

fn finite(x: f64) -> f64 {
    return if x.is_finite() { x } else { 0.0 };
}

/// `loss_level` is computed from an integer level as `1.25^level / 19 + 0.5`, clamped to `>= 0.125`.
pub fn loss_level_from_int(level: i32) -> f64 {
    return (1.25f64.powi(level) / 19.0 + 0.5).max(0.125);
}

/** analogue
 * Encodes PCM to FrAD Profile 1
 * Parameters: f64 PCM, Bit depth, Sample rate, Loss level (and channel count, same note as profile 0)
 * Returns: Encoded audio data, Encoded bit depth index, Encoded channel count
 */
pub fn analogue(pcm: Vec<Vec<f64>>, bit_depth: i16, mut srate: u32, loss_level: f64) -> (Vec<u8>, i16, i16, u32) {
    let loss_level = loss_level.abs().max(0.125);
    let pcm_scale = get_scale_factors(bit_depth);
    srate = get_valid_srate(srate);

    // 1. Pad and transform PCM with scaling
    let pcm = pad_pcm(pcm);
    let pcm_trans: Vec<Vec<f64>> = pcm.trans().iter().map(|x| x.iter().map(|y| y * pcm_scale).collect()).collect();

    // 2. DCT
    let freqs: Vec<Vec<f64>> = pcm_trans.iter().map(|x| dct(x.to_vec())).collect();
    let channels = freqs.len();

    // 3. Subband masking and quantisation
    let mut freqs_masked: Vec<Vec<f64>> = Vec::new();
    let mut thresholds: Vec<Vec<f64>> = Vec::new();

    for c in 0..channels {
        // 3.1. Masking threshold calculation over modified-Opus subbands
        let freqs_abs: Vec<f64> = freqs[c].iter().map(|x| x.abs()).collect();
        let thres_channel: Vec<f64> = p1tools::mask_thres_mos(&freqs_abs, srate, loss_level, p1tools::MASK_ALPHA);

        // 3.2. Remapping thresholds to DCT bins, zeroes become infinite divisors
        let div_factor: Vec<f64> = p1tools::mapping_from_opus(&thres_channel, freqs[c].len(), srate)
            .into_iter().map(|x| if x == 0.0 { f64::INFINITY } else { x }).collect();

        // 3.3. Masking and quantisation with remapped thresholds
        let chnl_masked: Vec<f64> = freqs[c].iter().zip(div_factor).map(|(x, y)| finite(p1tools::quant(x / y))).collect();

        freqs_masked.push(chnl_masked);
        thresholds.push(thres_channel);
    }

    // 4. Flattening frequencies and thresholds
    let freqs_flat: Vec<i64> = freqs_masked.trans().iter().flat_map(|x| x.iter().map(|y| y.round() as i64)).collect();
    let thres_flat: Vec<i64> = thresholds.trans().iter().flat_map(|x| x.iter().map(|y| (y * pcm_scale).round() as i64)).collect();

    // 5. Exponential Golomb-Rice encoding
    let freqs_gol: Vec<u8> = p1tools::exp_golomb_encode(freqs_flat);
    let thres_gol: Vec<u8> = p1tools::exp_golomb_encode(thres_flat);

    // 6. Connecting data
    //    [ Thresholds length in u32be | Thresholds | Frequencies ]
    let frad: Vec<u8> = (thres_gol.len() as u32).to_be_bytes().to_vec().into_iter().chain(thres_gol).chain(freqs_gol).collect();

    // 7. Raw DEFLATE compression (zlib window bits -15, best compression)
    let mut compressor = DeflateEncoder::new(Vec::new(), Compression::best());
    compressor.write_all(&frad).unwrap();
    let frad = compressor.finish().unwrap();

    return (frad, DEPTHS.iter().position(|&x| x == bit_depth).unwrap() as i16, channels as i16, srate);
}

/** digital
 * Decodes FrAD Profile 1 to PCM
 * Parameters: Encoded audio data, Bit depth index, Channel count, Sample rate, Frame size
 * Returns: f64 PCM
 */
pub fn digital(frad: Vec<u8>, bit_depth_index: i16, channels: i16, srate: u32, fsize: u32) -> Vec<Vec<f64>> {
    let (bit_depth, channels) = (DEPTHS[bit_depth_index as usize], channels as usize);
    let (pcm_scale, fsize) = (get_scale_factors(bit_depth), fsize as usize);

    // 1. Raw DEFLATE decompression; failures yield a silent frame of declared size
    let mut decompressor = DeflateDecoder::new(&frad[..]);
    let mut buf = Vec::new();
    if decompressor.read_to_end(&mut buf).is_err() {
        log::warn!("profile 1 decompression failed, substituting silence");
        return vec![vec![0.0; channels]; fsize];
    }
    let mut frad = buf;

    if frad.len() < 4 {
        log::warn!("profile 1 payload truncated, substituting silence");
        return vec![vec![0.0; channels]; fsize];
    }

    // 2. Splitting thresholds and frequencies
    let thres_len = u32::from_be_bytes(frad.split_front(4).try_into().unwrap()) as usize;
    let thres_gol = frad.split_front(thres_len.min(frad.len()));

    // 3. Exponential Golomb-Rice decoding
    let mut thres_flat: Vec<f64> = p1tools::exp_golomb_decode(thres_gol).into_iter().map(|x| x as f64 / pcm_scale).collect();
    let mut freqs_flat: Vec<f64> = p1tools::exp_golomb_decode(frad).into_iter().map(|x| x as f64).collect();
    thres_flat.resize(p1tools::MOSLEN * channels, 0.0);
    freqs_flat.resize(fsize * channels, 0.0);

    // 4. Unflattening frequencies and thresholds
    let thresholds: Vec<Vec<f64>> = (0..channels).map(|i| thres_flat.iter().skip(i).step_by(channels).copied().collect()).collect();
    let freqs_masked: Vec<Vec<f64>> = (0..channels).map(|i| freqs_flat.iter().skip(i).step_by(channels).copied().collect()).collect();

    // 5. Dequantisation and inverse masking
    let mut freqs: Vec<Vec<f64>> = Vec::new();
    for c in 0..channels {
        freqs.push(freqs_masked[c].iter()
        .zip(p1tools::mapping_from_opus(&thresholds[c], fsize, srate))
        .map(|(x, y)| p1tools::dequant(*x) * y).collect());
    }

    // 6. Inverse DCT and scaling
    return freqs.iter().map(|x|
        idct(x.to_vec()).iter().map(|y| y / pcm_scale).collect()
    ).collect::<Vec<Vec<f64>>>().trans();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_near_lossless_for_tone() {
        let srate = 48000u32;
        let samples: Vec<Vec<f64>> = (0..1024).map(|i| {
            let t = i as f64 / srate as f64;
            vec![(2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5]
        }).collect();

        let (frad, idx, channels, srate) = analogue(samples.clone(), 16, srate, 1.0);
        let decoded = digital(frad, idx, channels, srate, 1024);

        assert_eq!(decoded.len(), samples.len());
        let rms_err: f64 = decoded.iter().zip(samples.iter())
            .map(|(d, s)| (d[0] - s[0]).powi(2)).sum::<f64>().sqrt() / decoded.len() as f64;
        assert!(rms_err < 0.1, "rms_err={rms_err}");
    }

    #[test]
    fn decompression_failure_yields_silence() {
        let decoded = digital(vec![0xff, 0xff, 0xff, 0xff], 2, 1, 48000, 256);
        assert_eq!(decoded.len(), 256);
        assert!(decoded.iter().all(|frame| frame == &vec![0.0]));
    }
}
