//! Dice and probability primitives
//!
//! Every helper takes the generator explicitly so callers can seed it.

use rand::Rng;

/// Sum of `count` dice with `sides` sides each; zero when either is not positive
pub fn dice<R: Rng + ?Sized>(count: i32, sides: i32, rng: &mut R) -> i32 {
    if count <= 0 || sides <= 0 {
        return 0;
    }
    (0..count).map(|_| rng.gen_range(1..=sides)).sum()
}

/// True with probability `x / y` (always true once `x >= y`)
pub fn x_in_y<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> bool {
    if x <= 0.0 {
        return false;
    }
    if x >= y {
        return true;
    }
    rng.gen::<f64>() < x / y
}

/// True with probability `1 / chance`
pub fn one_in<R: Rng + ?Sized>(chance: i32, rng: &mut R) -> bool {
    chance <= 1 || rng.gen_range(0..chance) == 0
}

/// Exponential sample shifted to start at `min`, with the given mean
pub fn rng_exponential<R: Rng + ?Sized>(min: f64, mean: f64, rng: &mut R) -> f64 {
    let scale = (mean - min).max(0.0);
    let u: f64 = rng.gen();
    min - scale * (1.0 - u).ln()
}

/// Round randomly so that the expected result equals `value`
pub fn roll_remainder<R: Rng + ?Sized>(value: f64, rng: &mut R) -> i32 {
    let whole = value.floor();
    let frac = value - whole;
    whole as i32 + i32::from(x_in_y(frac, 1.0, rng))
}
