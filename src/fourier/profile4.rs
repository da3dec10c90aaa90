/**                              FrAD Profile 4                               */
/**
 * Copyright 2024 HaמuL
 * Description: FrAD Profile 4 (lossless, untransformed) encoding and decoding core
 * Dependencies: half
 */

use super::backend::u8pack;
use half::f16;

// Bit depth table
pub const DEPTHS: [i16; 8] = [12, 16, 24, 32, 48, 64, 0, 0];
// Dynamic ranges for preventing overflow
const FLOAT_DR_LIMITS: [f64; 8] = [
    f16::MAX.to_f64_const(), f16::MAX.to_f64_const(), f32::MAX as f64, f32::MAX as f64,
    f64::MAX, f64::MAX, f64::INFINITY, f64::INFINITY
];

/** analogue
 * Encodes PCM to FrAD Profile 4 directly, with no transform
 * Parameters: f64 PCM, Bit depth, Sample rate, Little endian toggle
 * Returns: Encoded audio data, Encoded bit depth index, Encoded channel count
 */
pub fn analogue(pcm: Vec<Vec<f64>>, mut bit_depth: i16, srate: u32, little_endian: bool) -> (Vec<u8>, i16, i16, u32) {
    if !DEPTHS.contains(&bit_depth) || bit_depth == 0 { bit_depth = 16; }
    let channels = pcm[0].len();

    let pcm_flat: Vec<f64> = pcm.into_iter().flatten().collect();
    let max_abs = pcm_flat.iter().map(|&x| x.abs()).fold(0.0f64, f64::max);

    let bit_depth_index = DEPTHS.iter().zip(FLOAT_DR_LIMITS.iter())
    .enumerate().find(|(_, (&value, &limit))| value >= bit_depth && value > 0 && max_abs < limit)
    .map(|(i, _)| i).unwrap_or_else(|| panic!("Overflow with reaching the max bit depth."));

    let frad = u8pack::pack(pcm_flat, DEPTHS[bit_depth_index], !little_endian);

    return (frad, bit_depth_index as i16, channels as i16, srate);
}

/** digital
 * Decodes FrAD Profile 4 to PCM
 * Parameters: Encoded audio data, Bit depth index, Channel count, Little endian toggle
 * Returns: Decoded PCM
 */
pub fn digital(frad: Vec<u8>, bit_depth_index: i16, channels: i16, little_endian: bool) -> Vec<Vec<f64>> {
    let pcm_flat: Vec<f64> = u8pack::unpack(frad, DEPTHS[bit_depth_index as usize], !little_endian);
    let pcm: Vec<Vec<f64>> = pcm_flat.chunks(channels.max(1) as usize).map(|chunk| chunk.to_vec()).collect();
    return pcm;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact() {
        let pcm: Vec<Vec<f64>> = (0..64).map(|i| vec![(i as f64 / 10.0).sin(), (i as f64 / 7.0).cos()]).collect();

        let (frad, idx, channels, srate) = analogue(pcm.clone(), 32, 48000, false);
        let decoded = digital(frad, idx, channels, false);

        assert_eq!(decoded.len(), pcm.len());
        for (a, b) in decoded.iter().zip(pcm.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-6);
            }
        }
        let _ = srate;
    }
}
