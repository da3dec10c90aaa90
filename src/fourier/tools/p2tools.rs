/**                              Profile 2 Tools                              */
/**
 * Copyright 2024 HaמuL
 * Description: TNS analysis and synthesis tools for Profile 2
 */

use crate::fourier::backend::signal::{correlate_full, impulse_filt};

pub const TNS_MAX_ORDER: usize = 12;
const LPC_QUANT_L: f64 = 1.5;
const LPC_QUANT_SCALE: f64 = 3.0;
pub const TNS_MIN_PRED: f64 = 5.0;

/** calc_autocorr
 * Calculates the auto-correlation of a frequency-domain signal
 * Parameters: Frequency-domain signal
 * Returns: Auto-correlation array of the signal
 */
fn calc_autocorr(freq: &[f64]) -> Vec<f64> {
    let window: Vec<f64> = (0..=TNS_MAX_ORDER).map(|i| (-0.5 * (i as f64 * 0.4).powi(2)).exp()).collect();
    let corr = correlate_full(freq, freq);
    return (0..=TNS_MAX_ORDER).map(|i| corr[freq.len() - 1 + i] * window[i]).collect();
}

/** levinson_durbin
 * Calculates the LPC coefficients using the Levinson-Durbin algorithm
 * Parameters: Auto-correlation array
 * Returns: LPC coefficients
 */
fn levinson_durbin(autocorr: &[f64]) -> Vec<f64> {
    let mut lpc = vec![0.0; TNS_MAX_ORDER + 1];
    lpc[0] = 1.0;
    let mut error = autocorr[0];

    if error <= 0.0 { return lpc; }

    for i in 1..=TNS_MAX_ORDER {
        let mut reflection = -(0..i).map(|j| lpc[j] * autocorr[i - j]).sum::<f64>();
        if error < 1e-9 { break; }

        reflection /= error;
        if reflection.abs() >= 1.0 { break; }

        lpc[i] = reflection;
        for j in 1..i {
            lpc[j] += reflection * lpc[i - j];
        }

        error *= 1.0 - reflection * reflection;
        if error <= 0.0 { break; }
    }

    return lpc;
}

/** quantise_lpc
 * Quantises the LPC coefficients to integers via the inverse of `dequantise_lpc`'s
 * curve: val = sign(q)*(|q/3| / (1.5 + |q/3|)), solved for q given val in (-1, 1).
 * Parameters: LPC coefficients
 * Returns: Quantised LPC coefficients
 */
fn quantise_lpc(lpc: &[f64]) -> Vec<i64> {
    return lpc.iter().map(|&val| {
        let absval = val.abs().min(0.999999);
        let q = (LPC_QUANT_SCALE * LPC_QUANT_L * absval / (1.0 - absval)).round() as i64;
        if val < 0.0 { -q } else { q }
    }).collect();
}

/** dequantise_lpc
 * Dequantises the LPC coefficients to floats
 * Parameters: Quantised LPC coefficients
 * Returns: LPC coefficients
 */
fn dequantise_lpc(lpcq: &[i64]) -> Vec<f64> {
    return lpcq.iter().map(|&q| {
        let absq = (q as f64 / LPC_QUANT_SCALE).abs();
        let val = absq / (LPC_QUANT_L + absq);
        if q < 0 { -val } else { val }
    }).collect();
}

/** predgain
 * Calculates the prediction gain of a signal
 * Parameters: Original signal, Predicted signal
 * Returns: Prediction gain in dB SPL
 */
fn predgain(orig: &[f64], prc: &[f64]) -> f64 {
    let orig_energy: f64 = orig.iter().map(|x| x * x).sum();
    let error: f64 = orig.iter().zip(prc.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    if error < 1e-12 { return 1000.0; }

    return 10.0 * (orig_energy / error).log10();
}

/** tns_analysis
 * Performs TNS analysis on Frequency-domain signals
 * Parameters: DCT Array
 * Returns: TNS frequencies and LPC coefficients
 */
pub fn tns_analysis(freqs: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<Vec<i64>>) {
    let mut tns_freqs = Vec::with_capacity(freqs.len());
    let mut lpcqs = Vec::with_capacity(freqs.len());

    for freq in freqs {
        let autocorr = calc_autocorr(freq);
        let lpc = levinson_durbin(&autocorr);
        // lpc[0] is always the implicit leading 1 of A(z); only lpc[1..] is transmitted.
        let coefs = &lpc[1..];

        if coefs.iter().any(|&x| x.abs() >= 1.0) {
            tns_freqs.push(freq.to_vec());
            lpcqs.push(vec![0; TNS_MAX_ORDER]);
            continue;
        }

        let lpcq = quantise_lpc(coefs);
        let lpcdeq = dequantise_lpc(&lpcq);
        let a_full: Vec<f64> = std::iter::once(1.0).chain(lpcdeq.iter().map(|&a| -a)).collect();

        let filtered = impulse_filt(&a_full, &[1.0], freq);
        if filtered.iter().any(|x| !x.is_finite()) || predgain(freq, &filtered) < TNS_MIN_PRED {
            tns_freqs.push(freq.to_vec());
            lpcqs.push(vec![0; TNS_MAX_ORDER]);
        }
        else {
            tns_freqs.push(filtered);
            lpcqs.push(lpcq);
        }
    }

    return (tns_freqs, lpcqs);
}

/** tns_synthesis
 * Performs TNS synthesis on Frequency-domain signals
 * Parameters: TNS frequencies and LPC coefficients
 * Returns: Synthesised DCT Array
 */
pub fn tns_synthesis(tns_freqs: &[Vec<f64>], lpcqs: &[Vec<i64>]) -> Vec<Vec<f64>> {
    return tns_freqs.iter().zip(lpcqs.iter()).map(|(tns_freq, lpcq)| {
        if lpcq.iter().all(|&x| x == 0) { return tns_freq.to_vec(); }

        let lpcdeq = dequantise_lpc(lpcq);
        let a_full: Vec<f64> = std::iter::once(1.0).chain(lpcdeq.iter().map(|&a| -a)).collect();
        let filtered = impulse_filt(&[1.0], &a_full, tns_freq);

        if filtered.iter().any(|x| !x.is_finite()) { tns_freq.to_vec() }
        else { filtered }
    })
    .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lpc_quant_round_trip() {
        let coefs = vec![0.4, -0.2, 0.05, -0.6];
        let q = quantise_lpc(&coefs);
        let deq = dequantise_lpc(&q);
        for (a, b) in coefs.iter().zip(deq.iter()) {
            assert!((a - b).abs() < 0.02, "a={a} b={b}");
        }
    }

    #[test]
    fn tns_round_trip_on_ar_signal() {
        let n = 256;
        let mut freq = vec![0.0; n];
        freq[0] = 1.0;
        for i in 1..n { freq[i] = freq[i - 1] * 0.6 + if i % 17 == 0 { 0.3 } else { 0.0 }; }

        let (tns_freqs, lpcqs) = tns_analysis(&[freq.clone()]);
        let reconstructed = tns_synthesis(&tns_freqs, &lpcqs);

        let err: f64 = reconstructed[0].iter().zip(freq.iter()).map(|(a, b)| (a - b).powi(2)).sum();
        assert!(err.sqrt() / n as f64 < 1e-6, "err={}", err.sqrt());
    }
}