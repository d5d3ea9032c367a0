//! Interceptors for property store operations.
//!
//! All property operations are static-style calls on the `Properties` API
//! type, so every rule here is type-bound: a call site whose receiver is
//! anything else declines and delegates before the case analysis runs.

use crate::call::{Arg, CallResult, Invocation, TargetType};
use crate::router::{Binding, CallInterceptor, InterceptScope};
use crate::tracked;
use envtrace_core::Result;

/// `property(key)` and `property(key, default)`.
pub struct PropertyReadInterceptor;

impl CallInterceptor for PropertyReadInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("property")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.arg(0).cloned();
        let default = invocation.opt_arg(1).clone();
        match (invocation.args_len(), key, default) {
            (1, Some(Arg::Str(key)), _) => {
                Ok(CallResult::OptStr(tracked::property(&key, None, consumer)))
            }
            (2, Some(Arg::Str(key)), Arg::Str(default)) => Ok(CallResult::OptStr(
                tracked::property(&key, Some(&default), consumer),
            )),
            (2, Some(Arg::Str(key)), Arg::Null) => {
                Ok(CallResult::OptStr(tracked::property(&key, None, consumer)))
            }
            _ => invocation.call_original(),
        }
    }
}

/// `int_property(key)` and `int_property(key, default)`.
pub struct IntPropertyInterceptor;

impl CallInterceptor for IntPropertyInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("int_property")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.arg(0).cloned();
        let default = invocation.opt_arg(1).clone();
        match (invocation.args_len(), key, default) {
            (1, Some(Arg::Str(key)), _) => Ok(CallResult::OptInt(tracked::int_property(
                &key, None, consumer,
            ))),
            (2, Some(Arg::Str(key)), Arg::Int(default)) => Ok(CallResult::OptInt(
                tracked::int_property(&key, Some(default), consumer),
            )),
            (2, Some(Arg::Str(key)), Arg::Null) => Ok(CallResult::OptInt(tracked::int_property(
                &key, None, consumer,
            ))),
            _ => invocation.call_original(),
        }
    }
}

/// `bool_property(key)`.
pub struct BoolPropertyInterceptor;

impl CallInterceptor for BoolPropertyInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("bool_property")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.arg(0).cloned();
        match (invocation.args_len(), key) {
            (1, Some(Arg::Str(key))) => {
                Ok(CallResult::Bool(tracked::bool_property(&key, consumer)))
            }
            _ => invocation.call_original(),
        }
    }
}

/// `set_property(key, value)`.
pub struct PropertyWriteInterceptor;

impl CallInterceptor for PropertyWriteInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("set_property")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.arg(0).cloned();
        let value = invocation.arg(1).cloned();
        match (invocation.args_len(), key, value) {
            (2, Some(Arg::Str(key)), Some(Arg::Str(value))) => Ok(CallResult::OptStr(
                tracked::set_property(&key, &value, consumer),
            )),
            _ => invocation.call_original(),
        }
    }
}

/// `remove_property(key)`.
pub struct PropertyRemoveInterceptor;

impl CallInterceptor for PropertyRemoveInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("remove_property")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.arg(0).cloned();
        match (invocation.args_len(), key) {
            (1, Some(Arg::Str(key))) => Ok(CallResult::OptStr(tracked::remove_property(
                &key, consumer,
            ))),
            _ => invocation.call_original(),
        }
    }
}

/// The bulk snapshot, reachable both as a `properties()` method call and as
/// a read of the `properties` accessor.
pub struct PropertiesSnapshotInterceptor;

impl CallInterceptor for PropertiesSnapshotInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![
            InterceptScope::reads_of_properties_named("properties"),
            InterceptScope::methods_named("properties"),
        ]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        if invocation.args_len() == 0 {
            return Ok(CallResult::Properties(tracked::properties(consumer)));
        }
        invocation.call_original()
    }
}

/// `replace_properties(map)`.
pub struct PropertiesReplaceInterceptor;

impl CallInterceptor for PropertiesReplaceInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("replace_properties")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Properties)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let entries = invocation.arg(0).cloned();
        match (invocation.args_len(), entries) {
            (1, Some(Arg::Props(entries))) => {
                tracked::replace_properties(entries, consumer);
                Ok(CallResult::Unit)
            }
            _ => invocation.call_original(),
        }
    }
}
