/**                                  Encoder                                  */
/**
 * Copyright 2024 HaמuL
 * Description: FrAD encoder
 */

use crate::{
    PCMFormat, f64cvt::any_to_f64,
    backend::{Prepend, SplitFront},
    error::CodecError,
    fourier::{self, profiles::{compact, COMPACT}, AVAILABLE, BIT_DEPTHS, SEGMAX},
    tools::  {asfh::ASFH, ecc},
};

pub struct EncodeResult {
    pub buf: Vec<u8>,
    pub samples: usize
}

/** Encoder
 * Struct for FrAD encoder
 */
pub struct Encoder {
    asfh: ASFH, buffer: Vec<u8>,
    bit_depth: i16, channels: i16,
    fsize: u32, srate: u32,
    overlap_fragment: Vec<Vec<f64>>,

    pcm_format: PCMFormat,
    loss_level: f64,
}

impl Encoder {
    pub fn new(profile: u8, pcm_format: PCMFormat) -> Result<Encoder, CodecError> {
        if !AVAILABLE.contains(&profile) { return Err(CodecError::InvalidProfile(profile)); }
        let mut asfh = ASFH::new();
        asfh.profile = profile;
        Ok(Encoder {
            asfh, buffer: Vec::new(),
            bit_depth: 0, channels: 0,
            fsize: 0, srate: 0,
            overlap_fragment: Vec::new(),

            pcm_format,
            loss_level: 0.5,
        })
    }

    // true dynamic info - set every frame
    pub fn get_channels(&self) -> i16 { self.channels }
    pub fn set_channels(&mut self, channels: i16) -> Result<(), CodecError> {
        if channels == 0 { return Err(CodecError::InvalidChannels(channels)); }
        self.channels = channels;
        Ok(())
    }
    pub fn get_frame_size(&self) -> u32 { self.fsize }
    pub fn set_frame_size(&mut self, frame_size: u32) -> Result<(), CodecError> {
        let max = SEGMAX[self.asfh.profile as usize];
        if frame_size == 0 || frame_size > max { return Err(CodecError::InvalidFrameSize(frame_size, max)); }
        self.fsize = frame_size;
        Ok(())
    }
    pub fn get_srate(&self) -> u32 { self.srate }
    pub fn set_srate(&mut self, mut srate: u32) -> Result<(), CodecError> {
        if srate == 0 { return Err(CodecError::InvalidSampleRate(srate, self.asfh.profile)); }
        if COMPACT.contains(&self.asfh.profile) {
            let valid = compact::get_valid_srate(srate);
            if valid != srate {
                log::warn!(
                    "sample rate {srate} invalid for profile {}, auto-adjusting to {valid}",
                    self.asfh.profile
                );
            }
            srate = valid;
        }
        self.srate = srate;
        Ok(())
    }

    // half-dynamic info - This will be conveted to bit depth index for ASFH on encoding each frame
    pub fn get_bit_depth(&self) -> i16 { self.bit_depth }
    pub fn set_bit_depth(&mut self, bit_depth: i16) -> Result<(), CodecError> {
        if bit_depth == 0 || !BIT_DEPTHS[self.asfh.profile as usize].contains(&bit_depth) {
            return Err(CodecError::InvalidBitDepth(bit_depth, self.asfh.profile));
        }
        self.bit_depth = bit_depth;
        Ok(())
    }

    // static info - set once before encoding
    pub fn set_ecc(&mut self, ecc: bool, mut ecc_ratio: [u8; 2]) {
        self.asfh.ecc = ecc;
        if ecc_ratio[0] == 0 || ecc_ratio[0] as i16 + ecc_ratio[1] as i16 > 255 {
            log::warn!("invalid ECC ratio {ecc_ratio:?}, falling back to default [96, 24]");
            ecc_ratio = [96, 24];
        }
        self.asfh.ecc_ratio = ecc_ratio;
    }
    pub fn set_little_endian(&mut self, little_endian: bool) { self.asfh.endian = little_endian; }
    pub fn set_loss_level(&mut self, loss_level: f64) {
        self.loss_level = loss_level.abs().max(0.125);
    }
    pub fn set_overlap_ratio(&mut self, mut overlap_ratio: u16) {
        if overlap_ratio != 0 { overlap_ratio = overlap_ratio.max(2).min(256); }
        self.asfh.overlap_ratio = overlap_ratio;
    }

    /** get_asfh
     * Get a reference to the ASFH struct
     * Returns: Immutable reference to the ASFH struct
     */
    pub fn get_asfh(&self) -> &ASFH { return &self.asfh; }

    /** overlap
     * Overlaps the current frame with the overlap fragment
     * Parameters: Current frame
     * Returns: Overlapped frame
     */
    fn overlap(&mut self, mut frame: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
        // 1. If overlap fragment is not empty,
        if !self.overlap_fragment.is_empty() {
            // prepent the fragment to the frame
            frame.prepend(&self.overlap_fragment);
        }

        // 2. If overlap is enabled and profile uses overlap
        let mut next_overlap = Vec::new();
        if COMPACT.contains(&self.asfh.profile) && self.asfh.overlap_ratio > 1 {
            // Copy the last olap samples to the next overlap fragment
            let cutoff = (frame.len() * (self.asfh.overlap_ratio as usize - 1)) / self.asfh.overlap_ratio as usize;
            next_overlap = frame[cutoff..].to_vec();
        }
        self.overlap_fragment = next_overlap;
        return frame;
    }

    /** inner
     * Inner encoder loop
     * Parameters: PCM stream, Flush flag
     * Returns: Encoded audio data
     */
    fn inner(&mut self, stream: Vec<u8>, flush: bool) -> EncodeResult {
        self.buffer.extend(stream);
        let (mut ret, mut samples) = (Vec::new(), 0);

        loop {
            // 0. Set read length in samples
            let mut rlen = self.fsize as usize;
            if COMPACT.contains(&self.asfh.profile) {
                // Read length = smallest value in the sample-count table bigger than frame size and overlap fragment size
                let li_val = compact::get_samples_min_ge(self.fsize) as usize;
                if li_val < self.overlap_fragment.len() {
                    // find the smallest table value bigger than fragment and subtract fragment size
                    rlen = compact::get_samples_min_ge(self.overlap_fragment.len() as u32) as usize - self.overlap_fragment.len();
                }
                else { // else, just subtract fragment size
                    rlen = li_val - self.overlap_fragment.len();
                };
            }
            let bytes_per_sample = self.pcm_format.bit_depth() / 8;
            let read_bytes = rlen * self.channels as usize * bytes_per_sample;
            if self.buffer.len() < read_bytes && !flush { break; }

            // 1. Cut out the frame from the buffer
            let pcm_bytes: Vec<u8> = self.buffer.split_front(read_bytes);
            let pcm_flat: Vec<f64> = pcm_bytes.chunks(bytes_per_sample).map(|bytes| any_to_f64(bytes, &self.pcm_format)).collect();

            // Unravel flat PCM to 2D PCM array
            let mut frame: Vec<Vec<f64>> = pcm_flat.chunks(self.channels as usize).map(Vec::from).collect();
            if frame.is_empty() { ret.extend(self.asfh.force_flush()); break; } // If frame is empty, break
            samples += frame.len();

            // 2. Overlap the frame with the previous overlap fragment
            frame = self.overlap(frame);
            let fsize: u32 = frame.len() as u32;

            // 3. Encode the frame
            if !BIT_DEPTHS[self.asfh.profile as usize].contains(&self.bit_depth) {
                log::error!("invalid bit depth {} for profile {}, skipping frame", self.bit_depth, self.asfh.profile);
                continue;
            }
            let (mut frad, bit_depth_index, channels, srate) = match self.asfh.profile {
                1 => fourier::profile1::analogue(frame, self.bit_depth, self.srate, self.loss_level),
                2 => fourier::profile2::analogue(frame, self.bit_depth, self.srate),
                4 => fourier::profile4::analogue(frame, self.bit_depth, self.srate, self.asfh.endian),
                _ => fourier::profile0::analogue(frame, self.bit_depth, self.srate, self.asfh.endian)
            };

            // 4. Create Reed-Solomon error correction code
            if self.asfh.ecc {
                frad = ecc::encode(frad, self.asfh.ecc_ratio);
            }

            // 5. Write the frame to the buffer
            (self.asfh.bit_depth_index, self.asfh.channels, self.asfh.fsize, self.asfh.srate) = (bit_depth_index, channels, fsize, srate);
            ret.extend(self.asfh.write(frad));
            if flush { ret.extend(self.asfh.force_flush()); }
        }

        return EncodeResult { buf: ret, samples };
    }

    /** process
     * Processes the input stream
     * Parameters: Input stream
     * Returns: Encoded audio data
     */
    pub fn process(&mut self, stream: Vec<u8>) -> EncodeResult {
        return self.inner(stream, false);
    }

    /** flush
     * Encodes the remaining data in the buffer and flush
     * Returns: Encoded audio data
     */
    pub fn flush(&mut self) -> EncodeResult {
        return self.inner(Vec::new(), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Endian;

    #[test]
    fn rejects_invalid_profile() {
        assert_eq!(Encoder::new(9, PCMFormat::F64(Endian::Little)).unwrap_err(), CodecError::InvalidProfile(9));
    }

    #[test]
    fn rejects_zero_channels() {
        let mut enc = Encoder::new(0, PCMFormat::F64(Endian::Little)).unwrap();
        assert!(enc.set_channels(0).is_err());
    }

    #[test]
    fn auto_adjusts_invalid_compact_srate() {
        let mut enc = Encoder::new(1, PCMFormat::F64(Endian::Little)).unwrap();
        enc.set_srate(44099).unwrap();
        assert_eq!(enc.get_srate(), compact::get_valid_srate(44099));
    }
}
