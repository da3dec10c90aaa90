/**                              Library Backend                              */
/**
 * Copyright 2024 HaמuL
 * Description: Backend for FrAD Library
 */

pub mod bitcvt; pub mod f64cvt; pub mod pcmformat;
pub use pcmformat::{PCMFormat, Endian};

/** linspace
 * Generates a linear spaced vector
* Parameters: Start value, Stop value, Number of values
* Returns: Linear spaced vector
*/
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num == 0 { return vec![]; }
    if num == 1 { return vec![start]; }
    let step = (stop - start) / (num - 1) as f64;

    let mut result = Vec::with_capacity(num);
    for i in 0..num {
        let value = if i == num - 1 { stop }
        else { start + step * i as f64 };
        result.push(value);
    }
    return result;
}

pub trait Transpose<T> {
    fn trans(&self) -> Vec<Vec<T>> where T: Clone;
}

impl<T: Clone> Transpose<T> for Vec<Vec<T>> {
    fn trans(&self) -> Vec<Vec<T>> {
        if self.is_empty() || self[0].is_empty() { return Vec::new(); }
        return (0..self[0].len()).map(|i| self.iter().map(|inner| inner[i].clone()).collect()).collect();
    }
}

pub trait SplitFront<T> {
    fn split_front(&mut self, n: usize) -> Vec<T> where T: Clone;
}

impl<T: Clone> SplitFront<T> for Vec<T> {
    fn split_front(&mut self, at: usize) -> Self {
        let mut other = if at >= self.len() { Vec::new() } else { self.split_off(at) };
        std::mem::swap(self, &mut other);
        return other;
    }
}

pub trait VecPatternFind<T: PartialEq> {
    fn find_pattern(&self, pattern: &[T]) -> Option<usize>;
}

impl<T: PartialEq> VecPatternFind<T> for Vec<T> {
    fn find_pattern(&self, pattern: &[T]) -> Option<usize> {
        if self.is_empty() || self.len() < pattern.len() { return None; }
        if pattern.is_empty() { return Some(0); }
        return self.windows(pattern.len()).position(|window| window == pattern);
    }
}

pub trait Prepend<T> {
    fn prepend(&mut self, other: &[T]) where T: Clone;
}

impl<T: Clone> Prepend<T> for Vec<T> {
    fn prepend(&mut self, other: &[T]) {
        self.splice(0..0, other.iter().cloned());
    }
}

/** hanning_in_overlap
 * Builds the symmetric Hanning crossfade used in overlap-add, such that
 * fade[i] + fade[L-1-i] == 1 for every i, with a midpoint of 0.5 when L is odd.
 * Parameters: Overlap length L
 * Returns: Fade-in weights of length L (fade-out weights are this reversed)
 */
pub fn hanning_in_overlap(l: usize) -> Vec<f64> {
    if l == 0 { return Vec::new(); }
    let lf = l as f64;
    let m = (l + 1) / 2 + 1;
    let h = |i: usize| 0.5 * (1.0 - (std::f64::consts::PI * i as f64 / (lf + 1.0)).cos());

    let mut fade = Vec::with_capacity(l);
    for i in (m..=l).rev() { fade.push(1.0 - h(i)); }
    if l % 2 == 1 { fade.push(0.5); }
    for i in m..=l { fade.push(h(i)); }
    return fade;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanning_fade_paired_sums() {
        for l in 1..40usize {
            let fade = hanning_in_overlap(l);
            assert_eq!(fade.len(), l);
            let mut total = 0.0;
            for i in 0..l {
                let pair = fade[i] + fade[l - 1 - i];
                assert!((pair - 1.0).abs() < 1e-9, "L={l} i={i} pair={pair}");
                total += pair;
            }
            assert!((total - l as f64).abs() < 1e-7);
        }
    }

    #[test]
    fn split_front_behaves() {
        let mut v = vec![1, 2, 3, 4, 5];
        let front = v.split_front(2);
        assert_eq!(front, vec![1, 2]);
        assert_eq!(v, vec![3, 4, 5]);
    }

    #[test]
    fn find_pattern_locates_signature() {
        let haystack = vec![0u8, 1, 2, 0xff, 0xd0, 0xd2, 0x97, 9];
        assert_eq!(haystack.find_pattern(&[0xff, 0xd0, 0xd2, 0x97]), Some(3));
    }
}