/**                              Profile 1 Tools                              */
/**
 * Copyright 2024 HaמuL
 * Description: Quantisation and Dequantisation tools for Profile 1
 */

use crate::backend::{bitcvt, linspace};
use core::iter::repeat;

/// Exponent applied to per-band RMS energy when deriving a masking threshold.
pub const MASK_ALPHA: f64 = 0.5;
/// Exponent applied in the coefficient quant/dequant power law.
const QUANT_ALPHA: f64 = 0.75;

pub const MOSLEN: usize = MODIFIED_OPUS_SUBBANDS.len() - 1;
const MODIFIED_OPUS_SUBBANDS: [u32; 22] = [
    0,     400,   800,   1200,  1600,  2000,  3200,  4000,
    4800,  5600,  6800,  8000,  9600,  12000, 15600, 20000,
    24000, 28800, 34400, 40800, 48000, u32::MAX
];

/** get_bin_range
 * Gets the range of DCT bins covered by a subband
 * Parameters: Length of the DCT array, Sample rate, Subband index
 * Returns: Range of bins
 */
fn get_bin_range(len: usize, srate: u32, i: usize) -> core::ops::Range<usize> {
    let start = (MODIFIED_OPUS_SUBBANDS[i] as f64 / (srate as f64 / 2.0) * len as f64).round() as usize;
    let end = (MODIFIED_OPUS_SUBBANDS[i + 1] as f64 / (srate as f64 / 2.0) * len as f64).round() as usize;
    return start.min(len)..end.min(len);
}

/** mask_thres_mos
 * Calculates the masking threshold for each modified-Opus subband
 * Parameters: Scaled DCT magnitudes, Sample rate, Loss level, Alpha
 * Returns: Masking threshold per band
 */
pub fn mask_thres_mos(freqs: &[f64], srate: u32, loss_level: f64, alpha: f64) -> Vec<f64> {
    let mut thres = vec![0.0; MOSLEN];

    for i in 0..MOSLEN {
        let range = get_bin_range(freqs.len(), srate, i);
        if range.start >= range.end { continue; }
        let subfreqs = &freqs[range];

        // Centre frequency of the subband, used to evaluate the absolute threshold of hearing
        let f = (MODIFIED_OPUS_SUBBANDS[i] as f64 + MODIFIED_OPUS_SUBBANDS[i + 1] as f64) / 2.0;
        let ath = 10.0f64.powf(
            (3.64 * (f / 1000.0).powf(-0.8) - 6.5 * (-0.6 * (f / 1000.0 - 3.3).powi(2)).exp() + 1e-3 * (f / 1000.0).powi(4)) / 20.0
        );

        let rms = (subfreqs.iter().map(|x| x * x).sum::<f64>() / subfreqs.len() as f64).sqrt();
        let sfq = rms.powf(alpha);
        thres[i] = sfq.max(ath.min(1.0)) * loss_level;
    }

    return thres;
}

/** mapping_from_opus
 * Linearly interpolates per-band thresholds onto DCT bins
 * Parameters: MOS-mapped thresholds, Length of the DCT array, Sample rate
 * Returns: Per-bin threshold values
 */
pub fn mapping_from_opus(mapped_thres: &[f64], freqs_len: usize, srate: u32) -> Vec<f64> {
    let mut thres = vec![0.0; freqs_len];

    for i in 0..MOSLEN - 1 {
        let range = get_bin_range(freqs_len, srate, i);
        if range.start >= range.end { continue; }
        thres[range.clone()].copy_from_slice(&linspace(mapped_thres[i], mapped_thres[i + 1], range.end - range.start));
    }

    return thres;
}

/** quant
 * Non-linear quantisation function
 * Parameters: f64 value to quantise
 * Returns: Quantised value
 */
pub fn quant(x: f64) -> f64 { return x.signum() * x.abs().powf(QUANT_ALPHA); }

/** dequant
 * Non-linear dequantisation function
 * Parameters: f64 value to dequantise
 * Returns: Dequantised value
 */
pub fn dequant(y: f64) -> f64 { return y.signum() * y.abs().powf(1.0 / QUANT_ALPHA); }

/** exp_golomb_encode
 * Encodes any integer array with Exponential Golomb Encoding
 * Parameters: Integer array
 * Returns: Encoded binary data
 */
pub fn exp_golomb_encode(data: Vec<i64>) -> Vec<u8> {
    if data.is_empty() { return vec![0]; }
    let dmax = data.iter().map(|x| x.abs()).max().unwrap();
    let k = if dmax > 0 { (dmax as f64).log2().ceil() as u8 } else { 0 };

    let mut encoded_binary: Vec<bool> = bitcvt::to_bits(&[k]);

    for n in data {
        let x = if n > 0 { (n << 1) - 1 } else { -n << 1 } + (1 << k);
        let code: Vec<bool> = bitcvt::to_bits(&x.to_be_bytes()).into_iter().skip_while(|&x| !x).collect();
        encoded_binary.extend(repeat(false).take(code.len() - (k + 1) as usize));
        encoded_binary.extend(code);
    }
    return bitcvt::to_bytes(&encoded_binary);
}

/** exp_golomb_decode
 * Decodes any integer array with Exponential Golomb Encoding
 * Parameters: Binary data
 * Returns: Decoded integer array
 */
pub fn exp_golomb_decode(data: Vec<u8>) -> Vec<i64> {
    if data.is_empty() { return Vec::new(); }
    let k = data[0] as usize;
    let (data, kx, mut decoded, mut idx) =
        (bitcvt::to_bits(&data[1..]), 1i64 << k, Vec::new(), 0);

    while idx < data.len() {
        let m = data[idx..].iter().position(|&x| x).unwrap_or(data.len() - idx);
        if idx + m >= data.len() { break; }
        let cwlen = (m * 2) + k + 1;
        if idx + cwlen > data.len() { break; }

        let cache = &data[(idx + m)..(idx + cwlen)];
        let n = cache.iter().fold(0i64, |acc, &bit| (acc << 1) | (bit as i64)) - kx;
        decoded.push(if n & 1 == 1 { (n + 1) >> 1 } else { -(n >> 1) });
        idx += cwlen;
    }

    return decoded;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golomb_round_trip() {
        let data = vec![0, 1, -1, 42, -42, 1000, -1000];
        let encoded = exp_golomb_encode(data.clone());
        assert_eq!(exp_golomb_decode(encoded), data);
    }

    #[test]
    fn golomb_empty() {
        assert_eq!(exp_golomb_encode(vec![]), vec![0]);
        assert_eq!(exp_golomb_decode(vec![0]), Vec::<i64>::new());
    }

    #[test]
    fn quant_dequant_round_trip() {
        for x in [0.0, 1.0, -1.0, 123.456, -987.6] {
            assert!((dequant(quant(x)) - x).abs() < 1e-9);
        }
    }

    #[test]
    fn mos_table_has_21_bands() {
        assert_eq!(MOSLEN, 21);
    }
}
