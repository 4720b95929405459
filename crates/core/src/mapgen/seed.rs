//! Coordinate-hashed pseudo-random values and coherent noise for map generation.
//!
//! Everything here is a pure function of `(seed, x, y)`. Only `+ - * /` and `floor` touch
//! floating point, so results are bit-identical on every IEEE 754 platform.

pub(super) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

fn coordinate_stream(x: i64, y: i64) -> u64 {
    let mut mixed = (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed ^= mixed >> 29;
    mixed ^ (y as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

/// Uniform value in `[0, 1)` for the lattice point `(x, y)`.
pub(super) fn random(seed: u64, x: i64, y: i64) -> f64 {
    let bits = mix_seed_stream(seed, coordinate_stream(x, y)) >> 11;
    bits as f64 / (1_u64 << 53) as f64
}

/// Smooth noise in roughly `[-1.4, 1.4]`; three octaves of value noise scaled by 0.8.
pub(super) fn noise(seed: u64, x: f64, y: f64) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    for octave in 0..3_i64 {
        total += amplitude * lattice_noise(seed, octave, x * frequency, y * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    total * 0.8
}

fn lattice_noise(seed: u64, octave: i64, x: f64, y: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);
    let (ix, iy) = (x0 as i64, y0 as i64);
    // Each octave samples its own lattice so octaves stay decorrelated.
    let shift = octave * 7_919;

    let corner = |dx: i64, dy: i64| random(seed, ix + dx + shift, iy + dy - shift) * 2.0 - 1.0;
    let top = lerp(corner(0, 0), corner(1, 0), tx);
    let bottom = lerp(corner(0, 1), corner(1, 1), tx);
    lerp(top, bottom, ty)
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
