//! Interceptors for filesystem probes, listings, and reads.

use crate::call::{Arg, CallResult, Encoding, Invocation, Receiver, TargetType};
use crate::router::{Binding, CallInterceptor, InterceptScope};
use crate::tracked;
use envtrace_core::Result;
use std::path::{Path, PathBuf};

/// `exists()`, `is_file()`, and `is_dir()` on path values.
///
/// These operation names exist on receivers this layer has no business
/// with, so the rule is name-bound and re-checks that the runtime receiver
/// really is a path before acting.
pub struct EntryCheckInterceptor {
    name: &'static str,
    check: fn(&Path, &str) -> bool,
}

impl EntryCheckInterceptor {
    pub fn exists() -> Self {
        Self {
            name: "exists",
            check: tracked::entry_exists,
        }
    }

    pub fn is_file() -> Self {
        Self {
            name: "is_file",
            check: tracked::entry_is_file,
        }
    }

    pub fn is_dir() -> Self {
        Self {
            name: "is_dir",
            check: tracked::entry_is_dir,
        }
    }
}

impl CallInterceptor for EntryCheckInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named(self.name)]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        if invocation.args_len() == 0 {
            if let Receiver::Value(Arg::Path(path)) = invocation.receiver() {
                return Ok(CallResult::Bool((self.check)(path, consumer)));
            }
        }
        invocation.call_original()
    }
}

/// `list_entries()` with no filter, a predicate filter, or a pattern
/// filter, on path values.
pub struct ListEntriesInterceptor;

impl CallInterceptor for ListEntriesInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("list_entries")]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        if invocation.args_len() > 1 {
            return invocation.call_original();
        }
        let path = match invocation.receiver() {
            Receiver::Value(Arg::Path(path)) => path.clone(),
            _ => return invocation.call_original(),
        };
        match invocation.arg(0).cloned() {
            None => Ok(CallResult::Paths(tracked::list_entries(
                &path, None, consumer,
            )?)),
            Some(Arg::Filter(filter)) => Ok(CallResult::Paths(tracked::list_entries(
                &path,
                Some(&filter),
                consumer,
            )?)),
            Some(_) => invocation.call_original(),
        }
    }
}

/// `read_to_string(path)` and `read_to_string(path, encoding)` on the
/// whole-file reading API.
pub struct ReadToStringInterceptor;

impl CallInterceptor for ReadToStringInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("read_to_string")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::FileText)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let path = invocation.arg(0).cloned();
        let encoding = invocation.opt_arg(1).clone();
        match (invocation.args_len(), path, encoding) {
            (1, Some(Arg::Path(path)), _) => Ok(CallResult::Str(tracked::read_to_string(
                &path, None, consumer,
            )?)),
            (2, Some(Arg::Path(path)), Arg::Encoding(encoding)) => Ok(CallResult::Str(
                tracked::read_to_string(&path, Some(&encoding), consumer)?,
            )),
            _ => invocation.call_original(),
        }
    }
}

/// Construction of a streaming file handle from a path or a path string.
pub struct StreamOpenInterceptor;

impl StreamOpenInterceptor {
    fn path_of(arg: &Arg) -> Option<PathBuf> {
        match arg {
            Arg::Path(path) => Some(path.clone()),
            Arg::Str(path) => Some(PathBuf::from(path)),
            _ => None,
        }
    }
}

impl CallInterceptor for StreamOpenInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::constructors_of(TargetType::FileStream)]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        if invocation.args_len() == 1 {
            if let Some(path) = invocation.arg(0).and_then(Self::path_of) {
                return Ok(CallResult::Stream(tracked::open(&path, consumer)?));
            }
        }
        invocation.call_original()
    }
}
