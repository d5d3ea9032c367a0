//! The erased call model the rewriting machinery materializes.
//!
//! Call sites in dynamically-loaded build logic arrive here with their
//! static types erased: the dispatch table sees only a receiver, an ordered
//! argument list, and an operation name. Interceptors re-discover the shape
//! they support through explicit case analysis and decline everything else
//! by delegating to the original call.

use crate::props::PropertyMap;
use crate::snapshot::{TrackedEnv, TrackedProperties};
use crate::spawn::CommandSpec;
use envtrace_core::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A directory-listing filter, in the shapes build logic passes one.
#[derive(Clone)]
pub enum EntryFilter {
    /// Glob pattern matched against entry file names.
    Pattern(String),
    /// Arbitrary predicate over the full entry path.
    Predicate(Arc<dyn Fn(&Path) -> bool + Send + Sync>),
}

impl EntryFilter {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        EntryFilter::Pattern(pattern.into())
    }

    pub fn predicate(f: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        EntryFilter::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryFilter::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            EntryFilter::Predicate(_) => f.debug_tuple("Predicate").finish(),
        }
    }
}

/// A character encoding requested by name for a whole-file read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding(String);

impl Encoding {
    pub fn named(name: impl Into<String>) -> Self {
        Encoding(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Lowercased name for decoder selection.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

/// The closed set of receiver types the rewriting machinery can name
/// statically at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// The process-wide property store API.
    Properties,
    /// The environment variable API.
    Environ,
    /// The whole-file text reading API.
    FileText,
    /// The streaming file handle type (intercepted at construction).
    FileStream,
    /// The process runner handle.
    Runner,
    /// The structured process builder type.
    CommandSpec,
    /// The flat-command execute API.
    Execute,
}

impl TargetType {
    pub fn name(&self) -> &'static str {
        match self {
            TargetType::Properties => "Properties",
            TargetType::Environ => "Environ",
            TargetType::FileText => "FileText",
            TargetType::FileStream => "FileStream",
            TargetType::Runner => "Runner",
            TargetType::CommandSpec => "CommandSpec",
            TargetType::Execute => "Execute",
        }
    }
}

/// An erased argument value at an intercepted call site.
#[derive(Debug, Clone)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    StrList(Vec<String>),
    Path(PathBuf),
    Props(PropertyMap),
    Filter(EntryFilter),
    Encoding(Encoding),
    Command(CommandSpec),
    CommandList(Vec<CommandSpec>),
    /// The process runner handle; carries no data of its own.
    Runner,
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }
}

/// The receiver of an intercepted call.
#[derive(Debug, Clone)]
pub enum Receiver {
    /// A static call site: the receiver is the declared type itself.
    Type(TargetType),
    /// An instance call site: the receiver is an erased value.
    Value(Arg),
}

/// The erased return value of an intercepted call.
#[derive(Debug)]
pub enum CallResult {
    Unit,
    Bool(bool),
    Str(String),
    OptStr(Option<String>),
    OptInt(Option<i64>),
    Paths(Vec<PathBuf>),
    Properties(TrackedProperties),
    Env(TrackedEnv),
    Child(std::process::Child),
    Children(Vec<std::process::Child>),
    Stream(std::fs::File),
}

impl CallResult {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CallResult::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn into_opt_str(self) -> Option<Option<String>> {
        match self {
            CallResult::OptStr(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_child(self) -> Option<std::process::Child> {
        match self {
            CallResult::Child(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_children(self) -> Option<Vec<std::process::Child>> {
        match self {
            CallResult::Children(c) => Some(c),
            _ => None,
        }
    }
}

type OriginalFn = Box<dyn FnOnce() -> Result<CallResult> + Send>;

const NULL_ARG: Arg = Arg::Null;

/// A transient, per-call descriptor.
///
/// Exposes the receiver, the ordered argument list with absent trailing
/// positions read as [`Arg::Null`], and the call-original escape hatch that
/// performs the real, unintercepted operation. The escape hatch consumes
/// the invocation; it is invoked at most once.
pub struct Invocation {
    receiver: Receiver,
    args: Vec<Arg>,
    original: OriginalFn,
}

impl Invocation {
    pub fn new(
        receiver: Receiver,
        args: Vec<Arg>,
        original: impl FnOnce() -> Result<CallResult> + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            args,
            original: Box::new(original),
        }
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    pub fn args_len(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Argument at `index`, or [`Arg::Null`] when the call shape has fewer
    /// arguments. Supports shapes with optional trailing arguments.
    pub fn opt_arg(&self, index: usize) -> &Arg {
        self.args.get(index).unwrap_or(&NULL_ARG)
    }

    /// Perform the real, unintercepted operation.
    pub fn call_original(self) -> Result<CallResult> {
        (self.original)()
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("receiver", &self.receiver)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_arg_reads_absent_positions_as_null() {
        let inv = Invocation::new(
            Receiver::Type(TargetType::Properties),
            vec![Arg::Str("key".to_string())],
            || Ok(CallResult::Unit),
        );
        assert_eq!(inv.opt_arg(0).as_str(), Some("key"));
        assert!(inv.opt_arg(1).is_null());
        assert!(inv.opt_arg(7).is_null());
    }

    #[test]
    fn call_original_runs_the_continuation() {
        let inv = Invocation::new(Receiver::Value(Arg::Runner), Vec::new(), || {
            Ok(CallResult::Bool(true))
        });
        let result = inv.call_original().expect("original call");
        assert_eq!(result.as_bool(), Some(true));
    }
}
