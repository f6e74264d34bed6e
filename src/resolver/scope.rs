//! Arena of scope frames.
//!
//! Frames form a tree through parent indices. Sibling blocks get distinct
//! frames, and a frame is never reused once it has been popped, so the tree
//! stays intact for the passes that run after resolution.

use std::collections::HashMap;

use tracing::trace;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Global,
    Function,
    Block,
    /// The frame of a `for`, hosting its initializer.
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Variable or parameter type, or a function's return type.
    pub declared_type: Type,
    /// Empty unless `kind` is `Function`.
    pub parameters: Vec<ParameterInfo>,
    pub frame: FrameId,
    pub level: u32,
    pub position: Position,
}

impl Symbol {
    pub fn variable(name: &str, declared_type: Type, position: Position) -> Self {
        Symbol::new(name, SymbolKind::Variable, declared_type, vec![], position)
    }

    pub fn parameter(name: &str, declared_type: Type, position: Position) -> Self {
        Symbol::new(name, SymbolKind::Parameter, declared_type, vec![], position)
    }

    pub fn function(
        name: &str,
        return_type: Type,
        parameters: Vec<ParameterInfo>,
        position: Position,
    ) -> Self {
        Symbol::new(name, SymbolKind::Function, return_type, parameters, position)
    }

    /// Frame and level are filled in by [`ScopeTree::declare`].
    fn new(
        name: &str,
        kind: SymbolKind,
        declared_type: Type,
        parameters: Vec<ParameterInfo>,
        position: Position,
    ) -> Self {
        Symbol {
            name: name.to_string(),
            kind,
            declared_type,
            parameters,
            frame: FrameId(0),
            level: 0,
            position,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub parent: Option<FrameId>,
    pub kind: FrameKind,
    pub symbols: HashMap<String, SymbolId>,
    /// 0 for the global frame, parent level + 1 otherwise.
    pub level: u32,
}

impl Frame {
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTree {
    frames: Vec<Frame>,
    symbols: Vec<Symbol>,
    current: FrameId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}

impl ScopeTree {
    /// Creates a tree holding only the global frame.
    pub fn new() -> Self {
        ScopeTree {
            frames: vec![Frame {
                parent: None,
                kind: FrameKind::Global,
                symbols: HashMap::new(),
                level: 0,
            }],
            symbols: vec![],
            current: FrameId(0),
        }
    }

    pub fn global(&self) -> FrameId {
        FrameId(0)
    }

    pub fn current(&self) -> FrameId {
        self.current
    }

    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Opens a new frame below the current one and makes it current.
    pub fn push(&mut self, kind: FrameKind) -> FrameId {
        let parent = self.current;
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            parent: Some(parent),
            kind,
            symbols: HashMap::new(),
            level: self.frame(parent).level + 1,
        });
        self.current = id;
        trace!(frame = id.0, ?kind, "pushed frame");
        id
    }

    /// Returns to the parent of the current frame. The global frame is never popped.
    pub fn pop(&mut self) {
        if let Some(parent) = self.frame(self.current).parent {
            trace!(frame = self.current.0, "popped frame");
            self.current = parent;
        }
    }

    /// Binds `symbol` in the current frame.
    ///
    /// Returns the existing binding as the error when the name is already
    /// taken in this frame; bindings in outer frames are shadowed freely.
    pub fn declare(&mut self, mut symbol: Symbol) -> Result<SymbolId, SymbolId> {
        let frame_id = self.current;
        if let Some(existing) = self.frame(frame_id).get(&symbol.name) {
            return Err(existing);
        }

        let id = SymbolId(self.symbols.len());
        symbol.frame = frame_id;
        symbol.level = self.frame(frame_id).level;

        let frame = &mut self.frames[frame_id.0];
        frame.symbols.insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Resolves `name` from the current frame outwards.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.lookup_from(self.current, name)
    }

    /// Resolves `name` starting at `frame` and walking up through its parents.
    pub fn lookup_from(&self, frame: FrameId, name: &str) -> Option<SymbolId> {
        self.ancestors(frame)
            .find_map(|id| self.frame(id).get(name))
    }

    /// `frame` followed by each of its parents up to the global frame.
    pub fn ancestors(&self, frame: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        std::iter::successors(Some(frame), |id| self.frame(*id).parent)
    }

    /// Nearest frame of `kind` enclosing `frame`, `frame` included.
    pub fn enclosing(&self, frame: FrameId, kind: FrameKind) -> Option<FrameId> {
        self.ancestors(frame)
            .find(|id| self.frame(*id).kind == kind)
    }
}
