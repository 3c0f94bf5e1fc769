use super::{Expr, Function, Symbol};

impl Expr {
    /// Replace every occurrence of `symbol` by `value`, re-canonicalising the result.
    ///
    /// Substituting a number into a single-variable formula reduces it to a
    /// constant expression, which is a plain [`Expr::Number`] whenever the value
    /// is rational.
    pub fn subs(&self, symbol: &Symbol, value: &Expr) -> Expr {
        if !self.contains(symbol) {
            return self.clone();
        }

        match self {
            Expr::Number(_) | Expr::Pi => self.clone(),
            Expr::Symbol(_) => value.clone(),
            Expr::Sum(terms) => Expr::sum(terms.iter().map(|term| term.subs(symbol, value))),
            Expr::Product(factors) => {
                Expr::product(factors.iter().map(|factor| factor.subs(symbol, value)))
            }
            Expr::Power(base, exponent) => {
                Expr::power(base.subs(symbol, value), exponent.subs(symbol, value))
            }
            Expr::Apply(function, argument) => Expr::apply(*function, argument.subs(symbol, value)),
        }
    }

    /// The first derivative with respect to `symbol`
    pub fn derivative(&self, symbol: &Symbol) -> Expr {
        if !self.contains(symbol) {
            return Expr::zero();
        }

        match self {
            Expr::Number(_) | Expr::Pi => Expr::zero(),
            Expr::Symbol(_) => Expr::one(),
            Expr::Sum(terms) => Expr::sum(terms.iter().map(|term| term.derivative(symbol))),
            // Product rule: sum over i of f_i' * prod_{j != i} f_j
            Expr::Product(factors) => Expr::sum((0..factors.len()).map(|i| {
                Expr::product(factors.iter().enumerate().map(|(j, factor)| {
                    if i == j {
                        factor.derivative(symbol)
                    } else {
                        factor.clone()
                    }
                }))
            })),
            Expr::Power(base, exponent) => {
                let base = base.as_ref().clone();
                let exponent = exponent.as_ref().clone();
                let d_base = base.derivative(symbol);
                let d_exponent = exponent.derivative(symbol);

                if !exponent.contains(symbol) {
                    // (b**n)' = n * b**(n-1) * b'
                    let reduced = Expr::power(base, exponent.clone() - Expr::one());
                    exponent * reduced * d_base
                } else if !base.contains(symbol) {
                    // (a**e)' = a**e * log(a) * e'
                    self.clone() * Expr::apply(Function::Log, base) * d_exponent
                } else {
                    // (b**e)' = b**e * (e' * log(b) + e * b' / b)
                    let log_base = Expr::apply(Function::Log, base.clone());
                    self.clone() * (d_exponent * log_base + exponent * d_base / base)
                }
            }
            Expr::Apply(function, argument) => {
                let argument = argument.as_ref().clone();
                let d_argument = argument.derivative(symbol);
                let outer = match function {
                    Function::Sin => Expr::apply(Function::Cos, argument),
                    Function::Cos => -Expr::apply(Function::Sin, argument),
                    Function::Tan => {
                        Expr::one() + Expr::power(Expr::apply(Function::Tan, argument), Expr::integer(2))
                    }
                    Function::Exp => Expr::apply(Function::Exp, argument),
                    Function::Log => Expr::power(argument, Expr::integer(-1)),
                    Function::Abs => argument.clone() / Expr::apply(Function::Abs, argument),
                };
                outer * d_argument
            }
        }
    }
}
