//! Module evaluator.
//!
//! Walks a function's blocks instruction by instruction. Stack memory is
//! one vector of [`Value`] cells shared by all activations: each `alloca`
//! claims one cell the first time it runs in an activation (reusing it on
//! later iterations of a loop), and a returning activation releases all
//! cells it claimed. A freshly claimed cell holds the zero of its kind.
//!
//! Calls to declared-only functions go to the host (see [`crate::host`]).

use std::fmt;

use lil_codegen::{FloatPredicate, IntPredicate, ValueKind};
use lil_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::EvalError;
use crate::host;
use crate::module::{BinOp, BlockId, CastOp, Const, Function, FunctionId, Inst, Module, ValueId};
use crate::print_handler::PrintHandler;

/// Deepest permitted call nesting.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// A runtime value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    Function(FunctionId),
    /// Address of a stack cell.
    Ptr(usize),
}

impl Value {
    /// Initial contents of a stack cell holding `kind`.
    pub fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Function | ValueKind::Void => Value::Void,
        }
    }

    pub fn as_bool(self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(other.confused(ValueKind::Bool)),
        }
    }

    pub fn as_int(self) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(n),
            other => Err(other.confused(ValueKind::Int)),
        }
    }

    pub fn as_float(self) -> Result<f64, EvalError> {
        match self {
            Value::Float(x) => Ok(x),
            other => Err(other.confused(ValueKind::Float)),
        }
    }

    fn as_ptr(self) -> Result<usize, EvalError> {
        match self {
            Value::Ptr(p) => Ok(p),
            other => Err(EvalError::TypeConfusion {
                expected: "pointer",
                found: other.to_string(),
            }),
        }
    }

    fn confused(self, expected: ValueKind) -> EvalError {
        EvalError::TypeConfusion {
            expected: expected.as_str(),
            found: self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Function(func) => write!(f, "<function {func:?}>"),
            Value::Ptr(p) => write!(f, "<ptr {p}>"),
        }
    }
}

/// Values defined so far in one call.
#[derive(Default)]
struct Activation {
    values: FxHashMap<ValueId, Value>,
    slots: FxHashMap<ValueId, usize>,
}

impl Activation {
    fn get(&self, id: ValueId) -> Result<Value, EvalError> {
        self.values
            .get(&id)
            .copied()
            .ok_or(EvalError::UndefinedValue(id))
    }

    fn set(&mut self, id: ValueId, value: Value) {
        self.values.insert(id, value);
    }
}

/// Executes functions of a [`Module`].
pub struct Evaluator<'m> {
    module: &'m Module,
    print: PrintHandler,
    memory: Vec<Value>,
    depth: usize,
}

impl<'m> Evaluator<'m> {
    pub fn new(module: &'m Module) -> Self {
        Self::with_print_handler(module, PrintHandler::Stdout)
    }

    pub fn with_print_handler(module: &'m Module, print: PrintHandler) -> Self {
        Evaluator {
            module,
            print,
            memory: Vec::new(),
            depth: 0,
        }
    }

    pub fn print_handler(&self) -> &PrintHandler {
        &self.print
    }

    /// Run the function named `name` without arguments.
    pub fn run_by_name(&mut self, name: &str) -> Result<Value, EvalError> {
        let func = self
            .module
            .function_by_name(name)
            .ok_or_else(|| EvalError::NoSuchFunction {
                name: name.to_owned(),
            })?;
        self.call(func, &[])
    }

    /// Call `func` with `args`.
    pub fn call(&mut self, func: FunctionId, args: &[Value]) -> Result<Value, EvalError> {
        let module = self.module;
        let function = module
            .function(func)
            .ok_or(EvalError::UnknownFunction { func })?;
        if args.len() != function.params.len() {
            return Err(EvalError::ArgumentCount {
                name: function.name.clone(),
                expected: function.params.len(),
                found: args.len(),
            });
        }
        if function.is_declaration() {
            trace!(name = %function.name, "host call");
            return host::call(&function.name, args, &self.print);
        }
        if self.depth >= MAX_CALL_DEPTH {
            debug!(name = %function.name, depth = self.depth, "call depth limit reached");
            return Err(EvalError::StackOverflow);
        }

        self.depth += 1;
        let base = self.memory.len();
        let result = ensure_sufficient_stack(|| self.execute(func, function, args));
        self.memory.truncate(base);
        self.depth -= 1;
        result
    }

    fn execute(
        &mut self,
        func: FunctionId,
        function: &'m Function,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        let module = self.module;
        let mut act = Activation::default();
        for (&param, &arg) in function.param_values.iter().zip(args) {
            act.set(param, arg);
        }

        let Some(&entry) = function.blocks.first() else {
            return Err(EvalError::UnknownFunction { func });
        };
        let mut current = entry;
        loop {
            let Some(block) = module.block(current) else {
                return Err(self.missing_terminator(function, current));
            };
            let mut next = None;
            for &id in &block.insts {
                let data = module.inst(id);
                let value = match &data.inst {
                    Inst::Param(_) => continue,
                    Inst::Const(c) => match *c {
                        Const::Bool(b) => Value::Bool(b),
                        Const::Int(n) => Value::Int(n),
                        Const::Float(x) => Value::Float(x),
                    },
                    Inst::FuncRef(target) => Value::Function(*target),
                    Inst::Alloca => {
                        let memory = &mut self.memory;
                        let cell = *act.slots.entry(id).or_insert_with(|| {
                            memory.push(Value::zero(data.kind));
                            memory.len() - 1
                        });
                        Value::Ptr(cell)
                    }
                    Inst::Load { ptr } => {
                        let cell = act.get(*ptr)?.as_ptr()?;
                        self.memory.get(cell).copied().unwrap_or(Value::Void)
                    }
                    Inst::Store { value, ptr } => {
                        let cell = act.get(*ptr)?.as_ptr()?;
                        let value = act.get(*value)?;
                        if let Some(slot) = self.memory.get_mut(cell) {
                            *slot = value;
                        }
                        continue;
                    }
                    Inst::Binary { op, lhs, rhs } => {
                        binary(*op, act.get(*lhs)?, act.get(*rhs)?)?
                    }
                    Inst::ICmp { pred, lhs, rhs } => {
                        let (l, r) = (act.get(*lhs)?.as_int()?, act.get(*rhs)?.as_int()?);
                        Value::Bool(int_compare(*pred, l, r))
                    }
                    Inst::FCmp { pred, lhs, rhs } => {
                        let (l, r) = (act.get(*lhs)?.as_float()?, act.get(*rhs)?.as_float()?);
                        Value::Bool(float_compare(*pred, l, r))
                    }
                    Inst::Not(value) => Value::Bool(!act.get(*value)?.as_bool()?),
                    Inst::Cast { op, value } => cast(*op, act.get(*value)?)?,
                    Inst::Call { func: callee, args } => {
                        let argv = args
                            .iter()
                            .map(|&a| act.get(a))
                            .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
                        let result = self.call(*callee, &argv)?;
                        if data.kind == ValueKind::Void {
                            continue;
                        }
                        result
                    }
                    Inst::Br(dest) => {
                        next = Some(*dest);
                        break;
                    }
                    Inst::CondBr {
                        cond,
                        then_block,
                        else_block,
                    } => {
                        next = Some(if act.get(*cond)?.as_bool()? {
                            *then_block
                        } else {
                            *else_block
                        });
                        break;
                    }
                    Inst::Ret(value) => {
                        return match value {
                            Some(value) => act.get(*value),
                            None => Ok(Value::Void),
                        };
                    }
                };
                act.set(id, value);
            }
            match next {
                Some(dest) => current = dest,
                None => return Err(self.missing_terminator(function, current)),
            }
        }
    }

    fn missing_terminator(&self, function: &Function, block: BlockId) -> EvalError {
        EvalError::MissingTerminator {
            function: function.name.clone(),
            block: self
                .module
                .block(block)
                .map_or_else(|| format!("{block:?}"), |b| b.name.clone()),
        }
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    Ok(match op {
        BinOp::Add => Value::Int(lhs.as_int()?.wrapping_add(rhs.as_int()?)),
        BinOp::Sub => Value::Int(lhs.as_int()?.wrapping_sub(rhs.as_int()?)),
        BinOp::Mul => Value::Int(lhs.as_int()?.wrapping_mul(rhs.as_int()?)),
        BinOp::SDiv => {
            let divisor = rhs.as_int()?;
            if divisor == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Value::Int(lhs.as_int()?.wrapping_div(divisor))
        }
        BinOp::FAdd => Value::Float(lhs.as_float()? + rhs.as_float()?),
        BinOp::FSub => Value::Float(lhs.as_float()? - rhs.as_float()?),
        BinOp::FMul => Value::Float(lhs.as_float()? * rhs.as_float()?),
        BinOp::FDiv => Value::Float(lhs.as_float()? / rhs.as_float()?),
    })
}

fn int_compare(pred: IntPredicate, l: i64, r: i64) -> bool {
    match pred {
        IntPredicate::Eq => l == r,
        IntPredicate::Ne => l != r,
        IntPredicate::Slt => l < r,
        IntPredicate::Sle => l <= r,
        IntPredicate::Sgt => l > r,
        IntPredicate::Sge => l >= r,
    }
}

/// Ordered predicates are false whenever either side is NaN; `une` is true.
#[expect(clippy::float_cmp, reason = "IR equality is exact")]
fn float_compare(pred: FloatPredicate, l: f64, r: f64) -> bool {
    if pred == FloatPredicate::Une {
        return l != r;
    }
    if l.is_nan() || r.is_nan() {
        return false;
    }
    match pred {
        FloatPredicate::Oeq => l == r,
        FloatPredicate::One | FloatPredicate::Une => l != r,
        FloatPredicate::Olt => l < r,
        FloatPredicate::Ole => l <= r,
        FloatPredicate::Ogt => l > r,
        FloatPredicate::Oge => l >= r,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "sitofp and fptosi are lossy by definition"
)]
fn cast(op: CastOp, value: Value) -> Result<Value, EvalError> {
    Ok(match op {
        CastOp::SiToFp => Value::Float(value.as_int()? as f64),
        // Truncates toward zero; saturates out of range, NaN becomes 0.
        CastOp::FpToSi => Value::Int(value.as_float()? as i64),
        CastOp::ZExt => Value::Int(i64::from(value.as_bool()?)),
    })
}
