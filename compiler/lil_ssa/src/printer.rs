//! Human-readable module listing, loosely in LLVM's textual syntax.
//!
//! ```text
//! declare i64 @echo(i64)
//!
//! define i64 @main() {
//! entry1:
//!   %2 = const i64 40
//!   %x.3 = alloca i64
//!   store i64 %2, ptr %x.3
//!   %x.4 = load i64, ptr %x.3
//!   ret i64 %x.4
//! }
//! ```
//!
//! Meant for debugging output, not as a stable format.

use std::fmt::{self, Write};

use lil_codegen::{FloatPredicate, IntPredicate, Linkage, ValueKind};

use crate::module::{BlockId, Const, Function, FunctionId, Inst, Module, ValueId};

fn ty(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Bool => "i1",
        ValueKind::Int => "i64",
        ValueKind::Float => "double",
        ValueKind::Function => "ptr",
        ValueKind::Void => "void",
    }
}

fn int_pred(pred: IntPredicate) -> &'static str {
    match pred {
        IntPredicate::Eq => "eq",
        IntPredicate::Ne => "ne",
        IntPredicate::Slt => "slt",
        IntPredicate::Sle => "sle",
        IntPredicate::Sgt => "sgt",
        IntPredicate::Sge => "sge",
    }
}

fn float_pred(pred: FloatPredicate) -> &'static str {
    match pred {
        FloatPredicate::Oeq => "oeq",
        FloatPredicate::One => "one",
        FloatPredicate::Une => "une",
        FloatPredicate::Olt => "olt",
        FloatPredicate::Ole => "ole",
        FloatPredicate::Ogt => "ogt",
        FloatPredicate::Oge => "oge",
    }
}

fn function_name(module: &Module, id: FunctionId) -> &str {
    module.function(id).map_or("<erased>", |f| f.name.as_str())
}

struct Printer<'m, W> {
    module: &'m Module,
    out: W,
}

impl<W: Write> Printer<'_, W> {
    fn value(&mut self, id: ValueId) -> fmt::Result {
        let data = self.module.inst(id);
        if data.name.is_empty() {
            write!(self.out, "%{}", id.raw())
        } else {
            write!(self.out, "%{}.{}", data.name, id.raw())
        }
    }

    fn typed(&mut self, id: ValueId) -> fmt::Result {
        let kind = self.module.inst(id).kind;
        write!(self.out, "{} ", ty(kind))?;
        self.value(id)
    }

    fn function(&mut self, function: &Function) -> fmt::Result {
        let keyword = if function.is_declaration() {
            "declare"
        } else {
            "define"
        };
        let linkage = match (function.linkage, function.is_declaration()) {
            (Linkage::Internal, false) => "internal ",
            _ => "",
        };
        write!(
            self.out,
            "{keyword} {linkage}{} @{}(",
            ty(function.ret),
            function.name
        )?;
        for (i, (&kind, &param)) in function
            .params
            .iter()
            .zip(&function.param_values)
            .enumerate()
        {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.out.write_str(ty(kind))?;
            if !function.is_declaration() {
                self.out.write_char(' ')?;
                self.value(param)?;
            }
        }
        self.out.write_char(')')?;
        if function.is_declaration() {
            return self.out.write_char('\n');
        }

        self.out.write_str(" {\n")?;
        let module = self.module;
        for &bb in &function.blocks {
            let Some(block) = module.block(bb) else {
                continue;
            };
            writeln!(self.out, "{}{}:", block.name, bb.raw())?;
            for &id in &block.insts {
                self.out.write_str("  ")?;
                self.inst(id)?;
                self.out.write_char('\n')?;
            }
        }
        self.out.write_str("}\n")
    }

    fn block_label(&mut self, bb: BlockId) -> fmt::Result {
        let name = self.module.block(bb).map_or("<erased>", |b| b.name.as_str());
        write!(self.out, "label %{name}{}", bb.raw())
    }

    fn inst(&mut self, id: ValueId) -> fmt::Result {
        let module = self.module;
        let data = module.inst(id);
        let defines = data.kind != ValueKind::Void && !matches!(data.inst, Inst::Store { .. });
        if defines {
            self.value(id)?;
            self.out.write_str(" = ")?;
        }
        match &data.inst {
            Inst::Param(n) => write!(self.out, "param {n}"),
            Inst::Const(c) => match *c {
                Const::Bool(b) => write!(self.out, "const i1 {b}"),
                Const::Int(n) => write!(self.out, "const i64 {n}"),
                Const::Float(x) => write!(self.out, "const double {x:?}"),
            },
            Inst::FuncRef(func) => write!(self.out, "funcref @{}", function_name(module, *func)),
            Inst::Alloca => write!(self.out, "alloca {}", ty(data.kind)),
            Inst::Load { ptr } => {
                write!(self.out, "load {}, ptr ", ty(data.kind))?;
                self.value(*ptr)
            }
            Inst::Store { value, ptr } => {
                self.out.write_str("store ")?;
                self.typed(*value)?;
                self.out.write_str(", ptr ")?;
                self.value(*ptr)
            }
            Inst::Binary { op, lhs, rhs } => {
                write!(self.out, "{} ", op.mnemonic())?;
                self.typed(*lhs)?;
                self.out.write_str(", ")?;
                self.value(*rhs)
            }
            Inst::ICmp { pred, lhs, rhs } => {
                write!(self.out, "icmp {} ", int_pred(*pred))?;
                self.typed(*lhs)?;
                self.out.write_str(", ")?;
                self.value(*rhs)
            }
            Inst::FCmp { pred, lhs, rhs } => {
                write!(self.out, "fcmp {} ", float_pred(*pred))?;
                self.typed(*lhs)?;
                self.out.write_str(", ")?;
                self.value(*rhs)
            }
            Inst::Not(value) => {
                self.out.write_str("not ")?;
                self.typed(*value)
            }
            Inst::Cast { op, value } => {
                write!(self.out, "{} ", op.mnemonic())?;
                self.typed(*value)?;
                write!(self.out, " to {}", ty(data.kind))
            }
            Inst::Call { func, args } => {
                write!(self.out, "call {} @{}(", ty(data.kind), function_name(module, *func))?;
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.typed(arg)?;
                }
                self.out.write_char(')')
            }
            Inst::Br(dest) => {
                self.out.write_str("br ")?;
                self.block_label(*dest)
            }
            Inst::CondBr {
                cond,
                then_block,
                else_block,
            } => {
                self.out.write_str("br ")?;
                self.typed(*cond)?;
                self.out.write_str(", ")?;
                self.block_label(*then_block)?;
                self.out.write_str(", ")?;
                self.block_label(*else_block)
            }
            Inst::Ret(None) => self.out.write_str("ret void"),
            Inst::Ret(Some(value)) => {
                self.out.write_str("ret ")?;
                self.typed(*value)
            }
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer { module: self, out: f };
        for (i, (_, function)) in self.functions().enumerate() {
            if i > 0 {
                printer.out.write_char('\n')?;
            }
            printer.function(function)?;
        }
        Ok(())
    }
}
