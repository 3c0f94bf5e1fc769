//! Canonicalising constructors for [`Expr`].
//!
//! Every expression the crate produces goes through these. The canonical form
//! is:
//! - sums and products are flat, sorted, and have at least two operands;
//! - a sum holds at most one number; like terms are merged (`x + 2*x = 3*x`);
//! - a product holds at most one number, in front; like bases are merged by
//!   adding their exponents (`x * x**2 = x**3`), exponentials are merged by
//!   adding their arguments (`exp(x) * exp(y) = exp(x + y)`), and a number
//!   times a single sum is distributed (`2*(x + 1) = 2*x + 2`);
//! - powers of rationals are folded whenever the result is rational. What is
//!   left is written over the prime factors of the bases, with integral parts
//!   moved into the coefficient and primes sharing a fractional exponent
//!   multiplied together (`sqrt(2)*sqrt(3) = sqrt(6)`, `sqrt(12) = 2*sqrt(3)`);
//! - `cos` and `abs` drop the sign of a negated argument, `sin` and `tan` pull
//!   it out (`sin(-x) = -sin(x)`);
//! - elementary functions are folded at the points with a closed form: `exp(0)`,
//!   `log(1)`, and the trigonometric functions at multiples of `pi/6` and
//!   `pi/4`.

use super::{Expr, Function};
use crate::models::Rational;
use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use std::{
    collections::BTreeMap,
    ops::{Add, Div, Mul, Neg, Sub},
};

// Beyond this, folding a rational power would build numbers nobody asked for.
const MAX_FOLDED_EXPONENT: i32 = 4096;

impl Expr {
    /// The canonical sum of `terms`
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut constant = Rational::zero();
        let mut like: BTreeMap<Expr, Rational> = BTreeMap::new();
        let mut pending: Vec<Expr> = terms.into_iter().collect();

        while let Some(term) = pending.pop() {
            match term {
                Expr::Sum(inner) => pending.extend(inner),
                Expr::Number(value) => constant += value,
                other => {
                    let (coefficient, rest) = other.split_coefficient();
                    *like.entry(rest).or_insert_with(Rational::zero) += coefficient;
                }
            }
        }

        let mut terms: Vec<Expr> = like
            .into_iter()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .map(|(rest, coefficient)| rest.scaled(coefficient))
            .collect();
        if !constant.is_zero() {
            terms.push(Expr::Number(constant));
        }
        terms.sort();

        match terms.len() {
            0 => Expr::zero(),
            1 => terms.swap_remove(0),
            _ => Expr::Sum(terms),
        }
    }

    /// The canonical product of `factors`
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut coefficient = Rational::one();
        let mut powers: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut exponentials = Vec::new();
        let mut pending: Vec<Expr> = factors.into_iter().collect();

        loop {
            while let Some(factor) = pending.pop() {
                match factor {
                    Expr::Product(inner) => pending.extend(inner),
                    Expr::Number(value) => coefficient *= value,
                    Expr::Power(base, exponent) => powers.entry(*base).or_default().push(*exponent),
                    Expr::Apply(Function::Exp, argument) => exponentials.push(*argument),
                    other => powers.entry(other).or_default().push(Expr::one()),
                }
            }
            if exponentials.is_empty() {
                break;
            }
            match Expr::apply(Function::Exp, Expr::sum(exponentials.drain(..))) {
                merged @ Expr::Apply(Function::Exp, _) => {
                    powers.entry(merged).or_default().push(Expr::one());
                    break;
                }
                // exp(log(a)) collapsed to `a`, which may hold further factors
                other => pending.push(other),
            }
        }

        if coefficient.is_zero() {
            return Expr::zero();
        }

        let mut radicals = Radicals::default();
        let mut factors = Vec::with_capacity(powers.len());
        for (base, mut exponents) in powers {
            let exponent = if exponents.len() == 1 {
                exponents.swap_remove(0)
            } else {
                Expr::sum(exponents)
            };
            match (base, exponent) {
                (Expr::Number(base), Expr::Number(exponent)) if base.is_positive() => {
                    radicals.push(&base, &exponent)
                }
                (base, exponent) => gather(
                    Expr::power(base, exponent),
                    &mut coefficient,
                    &mut radicals,
                    &mut factors,
                ),
            }
        }
        factors.extend(radicals.into_factors(&mut coefficient));

        if coefficient.is_zero() {
            return Expr::zero();
        }
        factors.sort();

        match factors.len() {
            0 => Expr::Number(coefficient),
            1 if coefficient.is_one() => factors.swap_remove(0),
            1 if matches!(factors[0], Expr::Sum(_)) => match factors.swap_remove(0) {
                Expr::Sum(terms) => Expr::sum(
                    terms
                        .into_iter()
                        .map(|term| Expr::product([Expr::Number(coefficient.clone()), term])),
                ),
                other => Expr::Product(vec![Expr::Number(coefficient), other]),
            },
            _ if coefficient.is_one() => Expr::Product(factors),
            _ => {
                factors.insert(0, Expr::Number(coefficient));
                Expr::Product(factors)
            }
        }
    }

    /// The canonical power `base ** exponent`
    pub fn power(base: Expr, exponent: Expr) -> Expr {
        if let Expr::Number(value) = &exponent {
            if value.is_zero() {
                return Expr::one();
            }
            if value.is_one() {
                return base;
            }
        }

        match (base, exponent) {
            (Expr::Number(base), Expr::Number(exponent)) => match rational_power(&base, &exponent) {
                Some(value) => Expr::Number(value),
                None => irrational_power(base, exponent),
            },
            (Expr::Number(base), _) if base.is_one() => Expr::one(),
            // (b**e)**n = b**(e*n) holds for integral n, or for any n when b > 0
            (Expr::Power(base, inner), Expr::Number(exponent))
                if exponent.is_integer() || base.is_positive_number() =>
            {
                Expr::power(*base, Expr::product([*inner, Expr::Number(exponent)]))
            }
            (Expr::Product(factors), Expr::Number(exponent))
                if exponent.is_integer() || factors.iter().all(Expr::is_positive_radical) =>
            {
                Expr::product(
                    factors
                        .into_iter()
                        .map(|factor| Expr::power(factor, Expr::Number(exponent.clone()))),
                )
            }
            (Expr::Apply(Function::Exp, argument), exponent) => {
                Expr::apply(Function::Exp, Expr::product([*argument, exponent]))
            }
            (base, exponent) => Expr::Power(Box::new(base), Box::new(exponent)),
        }
    }

    /// The canonical application of `function` to `argument`
    pub fn apply(function: Function, argument: Expr) -> Expr {
        if let Some(value) = fold_function(function, &argument) {
            return value;
        }

        match (function, argument) {
            (Function::Sin | Function::Tan, argument) if argument.is_negated() => {
                -Expr::apply(function, -argument)
            }
            (Function::Cos | Function::Abs, argument) if argument.is_negated() => {
                Expr::apply(function, -argument)
            }
            (Function::Exp, Expr::Apply(Function::Log, inner))
            | (Function::Log, Expr::Apply(Function::Exp, inner)) => *inner,
            (Function::Abs, Expr::Pi) => Expr::Pi,
            (function, argument) => Expr::Apply(function, Box::new(argument)),
        }
    }

    /// Whether this reads as the negation of a simpler expression.
    ///
    /// Exactly one of `a` and `-a` is negated: a sum is judged by the
    /// coefficient of its smallest non-constant term.
    fn is_negated(&self) -> bool {
        match self {
            Expr::Number(value) => value.is_negative(),
            Expr::Product(factors) => {
                matches!(factors.first(), Some(Expr::Number(value)) if value.is_negative())
            }
            Expr::Sum(terms) => terms
                .iter()
                .filter(|term| !matches!(term, Expr::Number(_)))
                .map(|term| term.clone().split_coefficient())
                .min_by(|(_, lhs), (_, rhs)| lhs.cmp(rhs))
                .is_some_and(|(coefficient, _)| coefficient.is_negative()),
            _ => false,
        }
    }

    fn is_positive_number(&self) -> bool {
        self.as_rational().is_some_and(Signed::is_positive)
    }

    /// A positive rational, or a power of one
    fn is_positive_radical(&self) -> bool {
        match self {
            Expr::Power(base, _) => base.is_positive_number(),
            other => other.is_positive_number(),
        }
    }

    /// Split off the numeric coefficient of a non-numeric term.
    fn split_coefficient(self) -> (Rational, Expr) {
        match self {
            Expr::Product(factors) => {
                let mut coefficient = Rational::one();
                let mut rest = Vec::with_capacity(factors.len());
                for factor in factors {
                    match factor {
                        Expr::Number(value) => coefficient *= value,
                        other => rest.push(other),
                    }
                }
                let rest = match rest.len() {
                    0 => Expr::one(),
                    1 => rest.swap_remove(0),
                    _ => Expr::Product(rest),
                };
                (coefficient, rest)
            }
            other => (Rational::one(), other),
        }
    }

    fn scaled(self, coefficient: Rational) -> Expr {
        if coefficient.is_one() {
            self
        } else {
            Expr::product([Expr::Number(coefficient), self])
        }
    }

    /// If this is `k*pi` for rational `k`, returns `k`
    fn pi_multiple(&self) -> Option<Rational> {
        match self {
            Expr::Pi => Some(Rational::one()),
            Expr::Product(factors) => match factors.as_slice() {
                [Expr::Number(k), Expr::Pi] => Some(k.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `base ** exponent` when the result is rational
fn rational_power(base: &Rational, exponent: &Rational) -> Option<Rational> {
    if exponent.is_integer() {
        let exponent = exponent.to_integer().to_i32()?;
        if exponent.abs() > MAX_FOLDED_EXPONENT || (base.is_zero() && exponent < 0) {
            return None;
        }
        return Some(Pow::pow(base.clone(), exponent));
    }

    if base.is_zero() {
        return exponent.is_positive().then(Rational::zero);
    }
    if base.is_negative() {
        return None;
    }

    let degree = exponent.denom().to_u32()?;
    let power = exponent.numer().to_i32()?;
    if power.abs() > MAX_FOLDED_EXPONENT {
        return None;
    }
    let numer = exact_root(base.numer(), degree)?;
    let denom = exact_root(base.denom(), degree)?;
    Some(Pow::pow(Rational::new(numer, denom), power))
}

/// Normal form of `base ** exponent` for a rational power that is not rational.
///
/// Positive bases are rewritten over their prime factors (see [`Radicals`]), so
/// `(1/2)**(1/2)` is `sqrt(2)/2` and `8**(1/2)` is `2*sqrt(2)`. Other bases are
/// left as they are.
fn irrational_power(base: Rational, exponent: Rational) -> Expr {
    let positive = base.is_positive();
    let power = Expr::Power(Box::new(Expr::Number(base)), Box::new(Expr::Number(exponent)));
    if positive {
        Expr::product([power])
    } else {
        power
    }
}

/// Sort one factor of a product into the coefficient, the numeric radicals, or
/// the remaining factors.
fn gather(
    factor: Expr,
    coefficient: &mut Rational,
    radicals: &mut Radicals,
    factors: &mut Vec<Expr>,
) {
    match factor {
        Expr::Number(value) => *coefficient *= value,
        Expr::Product(inner) => {
            for factor in inner {
                gather(factor, coefficient, radicals, factors);
            }
        }
        Expr::Power(base, exponent) => match (*base, *exponent) {
            (Expr::Number(base), Expr::Number(exponent)) if base.is_positive() => {
                radicals.push(&base, &exponent)
            }
            (base, exponent) => factors.push(Expr::Power(Box::new(base), Box::new(exponent))),
        },
        other => factors.push(other),
    }
}

// Bases are factored by trial division up to here; a larger cofactor is kept
// whole.
const TRIAL_DIVISION_LIMIT: u32 = 10_000;

/// Rational powers of positive rationals, as one exponent per prime.
#[derive(Debug, Default)]
struct Radicals(BTreeMap<BigInt, Rational>);

impl Radicals {
    fn push(&mut self, base: &Rational, exponent: &Rational) {
        let numer = factorise(base.numer()).into_iter().map(|(prime, count)| (prime, count, false));
        let denom = factorise(base.denom()).into_iter().map(|(prime, count)| (prime, count, true));
        for (prime, count, inverted) in numer.chain(denom) {
            let mut share = exponent * Rational::from_integer(count.into());
            if inverted {
                share = -share;
            }
            *self.0.entry(prime).or_insert_with(Rational::zero) += share;
        }
    }

    /// Move the integral part of every exponent into `coefficient`, and return
    /// one `k**f` factor per fractional exponent `0 < f < 1`, where `k` is the
    /// product of the primes raised to `f`.
    fn into_factors(self, coefficient: &mut Rational) -> Vec<Expr> {
        let mut factors = Vec::new();
        let mut grouped: BTreeMap<Rational, BigInt> = BTreeMap::new();
        for (prime, exponent) in self.0 {
            let whole = exponent.floor();
            let fraction = &exponent - &whole;
            match whole.to_integer().to_i32() {
                Some(whole) if whole.abs() <= MAX_FOLDED_EXPONENT => {
                    *coefficient *= Pow::pow(Rational::from_integer(prime.clone()), whole);
                }
                _ => {
                    factors.push(Expr::Power(
                        Box::new(Expr::Number(Rational::from_integer(prime))),
                        Box::new(Expr::Number(exponent)),
                    ));
                    continue;
                }
            }
            if !fraction.is_zero() {
                *grouped.entry(fraction).or_insert_with(BigInt::one) *= prime;
            }
        }
        factors.extend(grouped.into_iter().map(|(fraction, radicand)| {
            Expr::Power(
                Box::new(Expr::Number(Rational::from_integer(radicand))),
                Box::new(Expr::Number(fraction)),
            )
        }));
        factors
    }
}

/// Prime factors of a positive integer with their multiplicities
fn factorise(value: &BigInt) -> Vec<(BigInt, u32)> {
    let mut rest = value.clone();
    let mut factors = Vec::new();
    let mut divisor: u32 = 2;
    while divisor <= TRIAL_DIVISION_LIMIT {
        let prime = BigInt::from(divisor);
        if &prime * &prime > rest {
            break;
        }
        let mut count = 0;
        while (&rest % &prime).is_zero() {
            rest /= &prime;
            count += 1;
        }
        if count > 0 {
            factors.push((prime, count));
        }
        divisor += if divisor == 2 { 1 } else { 2 };
    }
    if rest > BigInt::one() {
        factors.push(perfect_power(&rest).unwrap_or((rest, 1)));
    }
    factors
}

/// `value == root**degree` with the largest possible `degree > 1`
fn perfect_power(value: &BigInt) -> Option<(BigInt, u32)> {
    let bits = u32::try_from(value.bits()).ok()?;
    (2..=bits).rev().find_map(|degree| {
        let root = exact_root(value, degree)?;
        (root > BigInt::one()).then_some((root, degree))
    })
}

fn exact_root(value: &BigInt, degree: u32) -> Option<BigInt> {
    let root = value.nth_root(degree);
    (Pow::pow(&root, degree) == *value).then_some(root)
}

/// Values of elementary functions at special points
fn fold_function(function: Function, argument: &Expr) -> Option<Expr> {
    if let Expr::Number(value) = argument {
        let value = match function {
            Function::Sin | Function::Tan if value.is_zero() => Rational::zero(),
            Function::Cos | Function::Exp if value.is_zero() => Rational::one(),
            Function::Log if value.is_one() => Rational::zero(),
            Function::Abs => value.abs(),
            _ => return None,
        };
        return Some(Expr::Number(value));
    }

    // Position on the unit circle in steps of pi/12
    let steps = argument.pi_multiple()? * Rational::from_integer(BigInt::from(12));
    if !steps.is_integer() {
        return None;
    }
    let turn = BigInt::from(24);
    let steps = ((steps.to_integer() % &turn + &turn) % &turn).to_u8()?;
    let cosine = || sine((steps + 6) % 24);
    match function {
        Function::Sin => sine(steps),
        Function::Cos => cosine(),
        Function::Tan => {
            let cosine = cosine().filter(|cosine| *cosine != Expr::zero())?;
            Some(sine(steps)? / cosine)
        }
        _ => None,
    }
}

/// `sin(steps * pi/12)`, for the steps where it is a rational or a square root
fn sine(steps: u8) -> Option<Expr> {
    let (sign, reference) = match steps {
        0..=6 => (1, steps),
        7..=12 => (1, 12 - steps),
        13..=18 => (-1, steps - 12),
        _ => (-1, 24 - steps),
    };
    let magnitude = match reference {
        0 => Expr::zero(),
        2 => Expr::rational(1, 2),
        3 => Expr::power(Expr::integer(2), Expr::rational(-1, 2)),
        4 => Expr::rational(1, 2) * Expr::power(Expr::integer(3), Expr::rational(1, 2)),
        6 => Expr::one(),
        _ => return None,
    };
    Some(Expr::integer(sign) * magnitude)
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::product([self, Expr::power(rhs, Expr::integer(-1))])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product([Expr::integer(-1), self])
    }
}
