//! This module provides a %g-like formatter.

use std::fmt::{Display, Formatter, Result};

/// Wrap this type around an `f64` in order to print it nicely: in
/// whichever of plain or scientific notation is shorter.
pub struct PrettyFloat(pub f64);

/// Number of decimals needed to show `digits` significant digits.
fn n_decimals(value: f64, digits: usize) -> usize {
    if value == 0.0 || !value.is_finite() {
        return digits;
    }
    let log10 = value.abs().log10().floor() as isize;
    let d = digits as isize - 1 - log10;
    if d < 0 {
        0
    } else {
        d as usize
    }
}

fn shortest(a: String, b: String) -> String {
    if b.len() < a.len() {
        b
    } else {
        a
    }
}

impl Display for PrettyFloat {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let x = self.0;
        let s = if let Some(precision) = f.precision() {
            // precision means significant digits, as with %g
            let digits = precision.max(1);
            let fixed = format!("{:.*}", n_decimals(x, digits), x);
            let sci = format!("{:.*e}", digits - 1, x);
            // plain output is preferred unless it loses information
            let plain = format!("{}", x);
            if plain.len() <= fixed.len() && plain.len() <= sci.len() {
                plain
            } else {
                shortest(fixed, sci)
            }
        } else {
            shortest(format!("{}", x), format!("{:e}", x))
        };
        // Precision is already spent on significant digits; it must not
        // also truncate the string.
        f.write_str(&s)
    }
}

#[test]
fn short_representation() {
    for &f in &[0.1_f64, 1e-100, 0.1111111111111111, -72.0, 3.0, 1e21] {
        let s = format!("{}", PrettyFloat(f));
        println!("{} -> {}", f, s);
        assert!(s.len() <= format!("{}", f).len());
        assert!(s.len() <= format!("{:e}", f).len());
        assert_eq!(s.parse::<f64>(), Ok(f));
    }
}

#[test]
fn short_representation_with_prec() {
    for &prec in &[1, 3, 6, 16] {
        for &f in &[0.1_f64, 1e-100, 0.1111111111111111, 2.269185314213022, -512.0] {
            let s = format!("{:.*}", prec, PrettyFloat(f));
            println!("{:.*} -> {}", prec, f, s);
            assert!(s.len() <= format!("{:.*e}", prec, f).len() + 1);
            let back: f64 = s.parse().unwrap();
            assert!(((back - f) / f).abs() < 10_f64.powf(1.0 - prec as f64));
        }
    }
}

#[test]
fn integers_print_short() {
    assert_eq!(format!("{}", PrettyFloat(100.0)), "100");
    assert_eq!(format!("{}", PrettyFloat(1000.0)), "1e3");
    assert_eq!(format!("{:.4}", PrettyFloat(3.0)), "3");
    assert_eq!(format!("{:.4}", PrettyFloat(-72.0)), "-72");
}

#[test]
fn precision_rounds_rather_than_truncates() {
    assert_eq!(format!("{:.4}", PrettyFloat(2.269)), "2.269");
    assert_eq!(format!("{:.4}", PrettyFloat(0.001)), "0.001");
    assert_eq!(format!("{:.4}", PrettyFloat(12.345)), "12.35");
    assert_eq!(format!("{:.4}", PrettyFloat(-1.234567)), "-1.235");
    assert_eq!(format!("{:.6}", PrettyFloat(-123.456)), "-123.456");
    assert_eq!(format!("{:.1}", PrettyFloat(0.1)), "0.1");
}
