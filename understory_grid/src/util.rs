// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Returns the square root of the number, rounded up.
#[inline]
pub(crate) const fn isqrt_ceil(num: usize) -> usize {
    let s = num.isqrt();

    // `s * s <= num` because `s` is the rounded-down square root, so this cannot overflow.
    if s * s < num { s + 1 } else { s }
}
