//! Lexical scope stack and symbol resolution.
//!
//! Every block-like construct (program body, function body, `if`/`while`
//! arm, bare block) pushes a [`ScopeFrame`]. Frames are strictly LIFO.
//!
//! Two flags shape lookup:
//!
//! - `TRANSPARENT`: lookup may continue into the next outer frame. Set on
//!   control-flow arms, bare blocks and local function bodies. Top-level
//!   function bodies and the program frame are opaque.
//! - `FUNCTION_BOUNDARY`: the frame is a function body. When lookup walks
//!   out of such a frame and then succeeds, the name is a capture of that
//!   function and is recorded in the [`CaptureTable`].

use bitflags::bitflags;
use lil_ir::Name;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::function_cache::FunctionEntry;
use crate::traits::BackendTypes;
use crate::{CaptureTable, FunctionKey, FunctionPath, TypedValue, ValueKind};

bitflags! {
    /// Lookup behavior of a frame.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// Lookup continues into the enclosing frame.
        const TRANSPARENT = 1 << 0;
        /// Frame is a function body.
        const FUNCTION_BOUNDARY = 1 << 1;
    }
}

/// Storage of a variable: the address of its stack slot and its kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slot<V> {
    pub ptr: V,
    pub kind: ValueKind,
}

/// One lexical frame.
pub struct ScopeFrame<B: BackendTypes> {
    /// Block that code for this frame is currently emitted into.
    pub block: B::BasicBlock,
    pub name: Name,
    pub flags: FrameFlags,
    /// Key of the function whose body this is (boundary frames only).
    function: Option<FunctionKey>,
    locals: FxHashMap<Name, Slot<B::Value>>,
    functions: FxHashMap<Name, FunctionEntry<B::Function>>,
    /// Value set by `return` in this frame.
    pub return_value: Option<TypedValue<B::Value>>,
}

impl<B: BackendTypes> ScopeFrame<B> {
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(FrameFlags::TRANSPARENT)
    }

    pub fn is_function_boundary(&self) -> bool {
        self.flags.contains(FrameFlags::FUNCTION_BOUNDARY)
    }

    pub fn function(&self) -> Option<&FunctionKey> {
        self.function.as_ref()
    }

    /// Slot declared directly in this frame.
    pub fn local(&self, name: Name) -> Option<Slot<B::Value>> {
        self.locals.get(&name).copied()
    }
}

/// Ordered frames, innermost last.
pub struct ScopeStack<B: BackendTypes> {
    frames: Vec<ScopeFrame<B>>,
}

impl<B: BackendTypes> ScopeStack<B> {
    pub fn new() -> Self {
        ScopeStack { frames: Vec::new() }
    }

    pub fn push(
        &mut self,
        block: B::BasicBlock,
        name: Name,
        flags: FrameFlags,
        function: Option<FunctionKey>,
    ) {
        debug_assert!(
            flags.contains(FrameFlags::FUNCTION_BOUNDARY) == function.is_some(),
            "boundary frames carry their function key"
        );
        trace!(depth = self.frames.len(), ?flags, "push scope");
        self.frames.push(ScopeFrame {
            block,
            name,
            flags,
            function,
            locals: FxHashMap::default(),
            functions: FxHashMap::default(),
            return_value: None,
        });
    }

    pub fn pop(&mut self) -> Option<ScopeFrame<B>> {
        let frame = self.frames.pop();
        trace!(depth = self.frames.len(), "pop scope");
        frame
    }

    /// Pop frames until the innermost one emits into `block`. Returns the
    /// number of frames removed.
    pub fn pop_until(&mut self, block: B::BasicBlock) -> usize {
        let mut popped = 0;
        while let Some(frame) = self.frames.last() {
            if frame.block == block {
                break;
            }
            self.frames.pop();
            popped += 1;
        }
        popped
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&ScopeFrame<B>> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut ScopeFrame<B>> {
        self.frames.last_mut()
    }

    /// Retarget the innermost frame after control flow moved to `block`.
    pub fn set_current_block(&mut self, block: B::BasicBlock) {
        if let Some(frame) = self.frames.last_mut() {
            frame.block = block;
        }
    }

    /// Bind `name` in the innermost frame, shadowing outer bindings.
    pub fn declare(&mut self, name: Name, slot: Slot<B::Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.locals.insert(name, slot);
        }
    }

    /// Bind a local function in the innermost frame.
    pub fn bind_function(&mut self, name: Name, entry: FunctionEntry<B::Function>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.functions.insert(name, entry);
        }
    }

    pub fn set_return_value(&mut self, value: TypedValue<B::Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.return_value = Some(value);
        }
    }

    /// Resolve `name` from the innermost frame outward.
    ///
    /// The walk stops at the first opaque frame. On success, `name` is
    /// recorded as a capture of every function boundary that was crossed,
    /// innermost first.
    pub fn resolve(&self, name: Name, captures: &mut CaptureTable) -> Option<Slot<B::Value>> {
        let mut crossed: SmallVec<[&FunctionKey; 4]> = SmallVec::new();
        for frame in self.frames.iter().rev() {
            if let Some(slot) = frame.local(name) {
                for key in crossed {
                    if captures.record(key, name, slot.kind) {
                        debug!(?name, function = ?key, kind = %slot.kind, "capture discovered");
                    }
                }
                return Some(slot);
            }
            if let Some(key) = &frame.function {
                crossed.push(key);
            }
            if !frame.is_transparent() {
                return None;
            }
        }
        None
    }

    /// Find a local function binding visible from the innermost frame.
    pub fn lookup_function(&self, name: Name) -> Option<&FunctionEntry<B::Function>> {
        for frame in self.frames.iter().rev() {
            if let Some(entry) = frame.functions.get(&name) {
                return Some(entry);
            }
            if !frame.is_transparent() {
                return None;
            }
        }
        None
    }

    /// Path of the function body currently being compiled.
    pub fn function_path(&self) -> FunctionPath {
        FunctionPath::from_names(
            self.frames
                .iter()
                .filter(|f| f.is_function_boundary())
                .map(|f| f.name),
        )
    }

    /// Key of the innermost enclosing function, if any.
    pub fn innermost_function(&self) -> Option<&FunctionKey> {
        self.frames.iter().rev().find_map(|f| f.function.as_ref())
    }
}

impl<B: BackendTypes> Default for ScopeStack<B> {
    fn default() -> Self {
        Self::new()
    }
}
