//! Integer helpers backing the rule generators.

/// Nth Fibonacci number with `F(0) = 0` and `F(1) = 1`.
#[must_use]
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return u64::from(n);
    }
    let (mut a, mut b) = (0_u64, 1_u64);
    for _ in 2..=n {
        let c = a.saturating_add(b);
        a = b;
        b = c;
    }
    b
}

#[must_use]
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5_i64;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// `n!`, treating everything at or below one as `1`.
#[must_use]
pub fn factorial(n: u32) -> u64 {
    (2..=u64::from(n)).fold(1_u64, u64::saturating_mul)
}

fn digits(n: i64) -> impl DoubleEndedIterator<Item = i64> {
    n.unsigned_abs()
        .to_string()
        .into_bytes()
        .into_iter()
        .map(|b| i64::from(b - b'0'))
}

#[must_use]
pub fn sum_digits(n: i64) -> i64 {
    digits(n).sum()
}

#[must_use]
pub fn multiply_digits(n: i64) -> i64 {
    digits(n).product()
}

/// Reverse the decimal digits; leading zeros of the result are dropped (40 -> 4).
#[must_use]
pub fn reverse_digits(n: i64) -> i64 {
    digits(n).rev().fold(0_i64, |acc, d| acc * 10 + d)
}
