/**                              Fourier Tools                                */
/**
 * Copyright 2024 HaמuL
 * Description: Shared DSP tooling for the compact-profile encoders
 */

pub mod p1tools;
pub mod p2tools;
