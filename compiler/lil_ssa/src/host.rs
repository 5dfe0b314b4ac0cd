//! Host implementations of external functions.
//!
//! `echo`/`echod` print their argument (`%d`/`%lf` style) and return it.
//! `pow` backs the `^` operator. The rest are the libm functions a program
//! can reach through `extern double name(double x)`.

use crate::error::EvalError;
use crate::eval::Value;
use crate::print_handler::PrintHandler;

const UNARY_MATH: &[(&str, fn(f64) -> f64)] = &[
    ("sqrt", f64::sqrt),
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("exp", f64::exp),
    ("log", f64::ln),
    ("fabs", f64::abs),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
];

/// Whether the host provides `name`.
pub fn is_host_function(name: &str) -> bool {
    matches!(name, "echo" | "echod" | "pow") || UNARY_MATH.iter().any(|(n, _)| *n == name)
}

pub(crate) fn call(name: &str, args: &[Value], print: &PrintHandler) -> Result<Value, EvalError> {
    match (name, args) {
        ("echo", [value]) => {
            let n = value.as_int()?;
            print.println(&n.to_string());
            Ok(Value::Int(n))
        }
        ("echod", [value]) => {
            let x = value.as_float()?;
            print.println(&format!("{x:.6}"));
            Ok(Value::Float(x))
        }
        ("pow", [base, exp]) => Ok(Value::Float(base.as_float()?.powf(exp.as_float()?))),
        (_, [value]) => match UNARY_MATH.iter().find(|(n, _)| *n == name) {
            Some((_, f)) => Ok(Value::Float(f(value.as_float()?))),
            None => Err(unknown(name)),
        },
        _ => Err(unknown(name)),
    }
}

fn unknown(name: &str) -> EvalError {
    EvalError::UnknownExtern {
        name: name.to_owned(),
    }
}
