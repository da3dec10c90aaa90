/**                             Fourier Backend                               */
/**
 * Copyright 2024 HaמuL
 * Description: DCT/IDCT, signal-processing primitives, and bit-depth packing
 */

pub mod core;
pub mod signal;
pub mod u8pack;
