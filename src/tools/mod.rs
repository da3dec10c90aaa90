/**                                   Tools                                   */
/**
 * Copyright 2024 HaמuL
 * Description: Stream-level tools for the FrAD container format
 */

pub mod asfh;
pub mod ecc;
pub mod head;
