//! Compact integer codes for the symmetries of the cube.
//!
//! A cube symmetry is a signed permutation of 3-space: a 3x3 matrix with one
//! `±1` per row and column. There are 48 of them (24 pure rotations plus
//! their mirror images). A code packs one into six bits:
//!
//! - bits 0..=2: permutation selector `perm`, valid iff `perm % 3 != 2`;
//!   `perm / 3` is the output axis of basis vector X, the low bit picks
//!   which of the remaining two axes Y lands on.
//! - bits 3..=5: one sign bit per output column (bit set = column negated).
//!
//! Codes are stored per tile-grid cell; the matrices are reconstructed on
//! demand or looked up from a table built on first use.
#![forbid(unsafe_code)]

use std::sync::LazyLock;

use golem_geom::{Mat3, Vec3};

/// The identity symmetry (perm 0, no sign flips).
pub const IDENTITY: u8 = 0;

/// Number of distinct cube symmetries.
pub const GROUP_ORDER: usize = 48;

/// Codes occupy six bits; values `64..` are never valid.
pub const CODE_BOUND: u8 = 64;

#[inline]
fn sign_of(signs: u8, k: usize) -> f32 {
    if signs & (1 << k) != 0 { -1.0 } else { 1.0 }
}

/// Returns whether `code` denotes an actual cube symmetry.
#[inline]
pub fn is_valid(code: u8) -> bool {
    code < CODE_BOUND && (code & 0b111) % 3 != 2
}

/// Reconstructs the signed-permutation matrix for `code`.
///
/// Returns `None` for codes with invalid permutation bits or beyond the
/// six-bit range.
pub fn decode(code: u8) -> Option<Mat3> {
    if !is_valid(code) {
        return None;
    }
    let perm = (code & 0b111) as usize;
    let signs = code >> 3;
    let i0 = perm / 3;
    let i1 = (i0 + 1 + perm % 2) % 3;
    let i2 = 3 - i0 - i1;
    let axis = |row: usize, s: f32| match row {
        0 => Vec3::new(s, 0.0, 0.0),
        1 => Vec3::new(0.0, s, 0.0),
        _ => Vec3::new(0.0, 0.0, s),
    };
    Some(Mat3::from_cols(
        axis(i0, sign_of(signs, 0)),
        axis(i1, sign_of(signs, 1)),
        axis(i2, sign_of(signs, 2)),
    ))
}

// Entry tolerance: wide enough that matrices built from trig land on the
// axis grid, tight enough that genuinely skewed matrices do not.
const EPS: f32 = 1e-4;

// One column of a signed permutation: exactly one entry at ±1, the other
// two at zero.
#[inline]
fn column_axis(col: Vec3) -> Option<(usize, bool)> {
    let picks = [(0usize, col.x), (1, col.y), (2, col.z)];
    let mut hit: Option<(usize, bool)> = None;
    for (row, v) in picks {
        if (v.abs() - 1.0).abs() <= EPS {
            if hit.is_some() {
                return None;
            }
            hit = Some((row, v < 0.0));
        } else if v.abs() > EPS {
            return None;
        }
    }
    hit
}

/// Encodes a signed-permutation matrix; `None` if `m` is not one.
pub fn encode(m: &Mat3) -> Option<u8> {
    let (i0, neg0) = column_axis(m.col(0))?;
    let (i1, neg1) = column_axis(m.col(1))?;
    let (i2, neg2) = column_axis(m.col(2))?;
    if i0 == i1 || i2 != 3 - i0 - i1 {
        return None;
    }
    // Low perm bit: parity that places Y's output axis, see decode.
    let p = (i1 + 3 - i0 - 1) % 3;
    let perm = 3 * i0 + (p + i0) % 2;
    let mut signs = 0u8;
    if neg0 {
        signs |= 1;
    }
    if neg1 {
        signs |= 2;
    }
    if neg2 {
        signs |= 4;
    }
    Some(perm as u8 | (signs << 3))
}

static MATRICES: LazyLock<[Option<Mat3>; 64]> =
    LazyLock::new(|| core::array::from_fn(|c| decode(c as u8)));

/// Table lookup of the decoded matrix for `code`; built once on first use.
#[inline]
pub fn matrix(code: u8) -> Option<&'static Mat3> {
    MATRICES.get(code as usize)?.as_ref()
}

/// Composes two symmetries: the result applies `b` first, then `a`.
pub fn compose(a: u8, b: u8) -> Option<u8> {
    let ma = decode(a)?;
    let mb = decode(b)?;
    encode(&(ma * mb))
}

/// Code of the rotation by `90° × k` about +Z.
pub fn rot_z(k: u32) -> u8 {
    let m = Mat3::rotation_z(core::f32::consts::FRAC_PI_2 * (k % 4) as f32);
    encode(&m).unwrap_or(IDENTITY)
}

/// Iterates the 48 valid codes in ascending order.
pub fn codes() -> impl Iterator<Item = u8> {
    (0..CODE_BOUND).filter(|&c| is_valid(c))
}
