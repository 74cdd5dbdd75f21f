// Copyright 2026 The Swvk Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lossless number <-> string conversion in bases 2..=36, built entirely on
//! [`SoftFloat`] so that the text produced for a given `f64` is identical no
//! matter which host produced it -- unlike going through the platform's own
//! `printf`/`long double`.
//!
//! `append_double_to_string` is a generalization of ECMAScript's
//! `Number::toString` to an arbitrary base: find the shortest digit string
//! that round-trips, then lay it out as decimal or scientific notation
//! depending on the magnitude of the exponent.

use crate::soft_float::SoftFloat;

const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn digit_char(value: u32) -> char {
    DIGITS[value as usize] as char
}

fn digit_value(c: char, base: u32) -> Option<u32> {
    let v = match c {
        '0'..='9' => c as u32 - '0' as u32,
        'a'..='z' => c as u32 - 'a' as u32 + 10,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => return None,
    };
    if v < base {
        Some(v)
    } else {
        None
    }
}

fn exponent_char(base: u32) -> char {
    match base {
        10 => 'e',
        16 => 'h',
        8 => 'o',
        _ => 'E',
    }
}

/// Appends `value` in `base` (2..=36) to `buffer`, writing at least
/// `min_digits` digits (left-padded with `'0'`).
pub fn append_unsigned_integer_to_string(buffer: &mut String, mut value: u64, base: u32, min_digits: usize) {
    assert!((2..=36).contains(&base));
    let mut digits = Vec::new();
    if value == 0 {
        digits.push('0');
    }
    while value > 0 {
        digits.push(digit_char((value % base as u64) as u32));
        value /= base as u64;
    }
    while digits.len() < min_digits {
        digits.push('0');
    }
    digits.reverse();
    buffer.extend(digits);
}

pub fn append_signed_integer_to_string(buffer: &mut String, value: i64, base: u32, min_digits: usize) {
    if value < 0 {
        buffer.push('-');
        append_unsigned_integer_to_string(buffer, value.unsigned_abs(), base, min_digits);
    } else {
        append_unsigned_integer_to_string(buffer, value as u64, base, min_digits);
    }
}

fn round_to_nearest_i64(value: f64) -> i64 {
    value.round() as i64
}

/// `ceil(log_base(magnitude))`-style integer `n` such that
/// `base^(n-1) <= magnitude < base^n`, for finite nonzero `magnitude`.
fn decimal_point_exponent(magnitude: &SoftFloat, base: &SoftFloat) -> i64 {
    let log = (*magnitude).log2() / (*base).log2();
    let mut n = log.floor().to_i64_saturating() + 1;
    // correct for boundary rounding error in `log2`/division
    loop {
        let lower = base.pow_i64(n - 1);
        let upper = base.pow_i64(n);
        if *magnitude < lower {
            n -= 1;
        } else if *magnitude >= upper {
            n += 1;
        } else {
            break;
        }
    }
    n
}

/// Base-`b` digits (most significant first, exactly `k` of them) of the
/// smallest `s` with `0 <= s < b^k` such that rounding `s * b^(n-k)` to the
/// nearest representable value reproduces `magnitude` exactly.
fn shortest_round_trip_digits(magnitude: SoftFloat, base_float: SoftFloat, base: u32, n: i64) -> (u128, u32) {
    let max_k = (128.0 / (base as f64).log2().max(1.0)) as u32 + 4;
    for k in 1..=max_k {
        let scale = base_float.pow_i64(n - k as i64);
        let scaled = magnitude / scale;
        let s = scaled.round();
        let s_int = s.to_u64_saturating() as u128;
        let reconstructed = SoftFloat::from_u64(s_int as u64) * scale;
        if reconstructed.to_f64().to_bits() == magnitude.to_f64().to_bits() {
            return (s_int, k);
        }
    }
    // fall back to the full-precision digit string (should not happen for
    // any finite f64 with a base in 2..=36).
    let scale = base_float.pow_i64(n - max_k as i64);
    let s = (magnitude / scale).round();
    (s.to_u64_saturating() as u128, max_k)
}

fn digits_to_string(mut s: u128, base: u32, count: u32) -> Vec<char> {
    let mut out = vec!['0'; count as usize];
    for i in (0..count).rev() {
        out[i as usize] = digit_char((s % base as u128) as u32);
        s /= base as u128;
    }
    out
}

/// Generalized `Number::toString`: appends `value` in `base` (2..=36) using
/// the shortest digit string that parses back to the same `f64`.
pub fn append_double_to_string(buffer: &mut String, value: f64, base: u32) {
    assert!((2..=36).contains(&base));
    if value.is_nan() {
        buffer.push_str("NaN");
        return;
    }
    if value == 0.0 {
        if value.is_sign_negative() {
            buffer.push('-');
        }
        buffer.push('0');
        return;
    }
    if value.is_sign_negative() {
        buffer.push('-');
    }
    if value.is_infinite() {
        buffer.push_str("Infinity");
        return;
    }
    let magnitude = SoftFloat::from_f64(value.abs());
    let base_float = SoftFloat::from_u64(base as u64);
    let n = decimal_point_exponent(&magnitude, &base_float);
    let (s, k) = shortest_round_trip_digits(magnitude, base_float, base, n);
    let digits = digits_to_string(s, base, k);

    let log_b_10 = 10f64.ln() / (base as f64).ln();
    let limit21 = round_to_nearest_i64(21.0 * log_b_10);
    let limit6 = round_to_nearest_i64(6.0 * log_b_10);

    if -limit6 < n && n <= limit21 {
        append_decimal_form(buffer, &digits, n, k as i64);
    } else {
        append_scientific_form(buffer, &digits, n, base);
    }
}

fn append_decimal_form(buffer: &mut String, digits: &[char], n: i64, k: i64) {
    if k <= n {
        buffer.extend(digits.iter());
        for _ in 0..(n - k) {
            buffer.push('0');
        }
    } else if n > 0 {
        buffer.extend(digits[..n as usize].iter());
        buffer.push('.');
        buffer.extend(digits[n as usize..].iter());
    } else {
        buffer.push_str("0.");
        for _ in 0..(-n) {
            buffer.push('0');
        }
        buffer.extend(digits.iter());
    }
}

fn append_scientific_form(buffer: &mut String, digits: &[char], n: i64, base: u32) {
    buffer.push(digits[0]);
    if digits.len() > 1 {
        buffer.push('.');
        buffer.extend(digits[1..].iter());
    }
    buffer.push(exponent_char(base));
    if n - 1 >= 0 {
        buffer.push('+');
    }
    append_signed_integer_to_string(buffer, n - 1, 10, 0);
}

/// Parses text produced by [`append_double_to_string`] (or any equivalent
/// base-`base` rendering of a finite or special `f64`) back into an `f64`.
pub fn parse_double(text: &str, base: u32) -> Option<f64> {
    assert!((2..=36).contains(&base));
    let text = text.trim();
    if text == "NaN" {
        return Some(f64::NAN);
    }
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    if rest == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    let exp_char = exponent_char(base);
    let (mantissa_part, explicit_exponent) = match rest.find(|c: char| c.eq_ignore_ascii_case(&exp_char)) {
        Some(idx) => {
            let exp_str = &rest[idx + 1..];
            let exp = exp_str.parse::<i64>().ok()?;
            (&rest[..idx], exp)
        }
        None => (rest, 0),
    };
    let (int_part, frac_part) = match mantissa_part.find('.') {
        Some(idx) => (&mantissa_part[..idx], &mantissa_part[idx + 1..]),
        None => (mantissa_part, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut s: u128 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        let d = digit_value(c, base)?;
        s = s.checked_mul(base as u128)?.checked_add(d as u128)?;
    }
    let fractional_digit_count = frac_part.chars().count() as i64;
    let total_exponent = explicit_exponent - fractional_digit_count;
    let base_float = SoftFloat::from_u64(base as u64);
    let value = SoftFloat::from_u64(s as u64) * base_float.pow_i64(total_exponent);
    Some(sign * value.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doubles() -> Vec<f64> {
        let mut values = vec![0.0, -0.0, 1.0, -1.0, 0.1, 1.0 / 3.0, 123456789.125, f64::MIN_POSITIVE];
        for i in -400..400 {
            values.push(2f64.powf(i as f64 / 17.0));
            values.push(-2f64.powf(i as f64 / 17.0));
        }
        values
    }

    #[test]
    fn one_third_in_base_ten() {
        let mut buffer = String::new();
        append_double_to_string(&mut buffer, 1.0 / 3.0, 10);
        assert!(buffer.starts_with("0.3333333333333333"), "got {}", buffer);
        assert_eq!(parse_double(&buffer, 10), Some(1.0 / 3.0));
    }

    #[test]
    fn round_trips_across_bases() {
        for base in [2u32, 8, 10, 16, 36] {
            for v in sample_doubles() {
                let mut buffer = String::new();
                append_double_to_string(&mut buffer, v, base);
                let parsed = parse_double(&buffer, base).unwrap_or_else(|| panic!("failed to parse {} (base {})", buffer, base));
                assert_eq!(parsed.to_bits(), v.to_bits(), "base {} value {} -> {} -> {}", base, v, buffer, parsed);
            }
        }
    }

    #[test]
    fn integer_formatting_pads_minimum_digits() {
        let mut buffer = String::new();
        append_unsigned_integer_to_string(&mut buffer, 5, 16, 4);
        assert_eq!(buffer, "0005");
    }

    #[test]
    fn signed_integer_formatting() {
        let mut buffer = String::new();
        append_signed_integer_to_string(&mut buffer, -255, 16, 0);
        assert_eq!(buffer, "-ff");
    }
}
