//! Interceptor for environment variable reads.

use crate::call::{Arg, CallResult, Invocation, TargetType};
use crate::router::{Binding, CallInterceptor, InterceptScope};
use crate::tracked;
use envtrace_core::Result;

/// `env()` for the full read-only snapshot, `env(key)` for one variable.
pub struct EnvInterceptor;

impl CallInterceptor for EnvInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("env")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::Environ)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let key = invocation.opt_arg(0).clone();
        match (invocation.args_len(), key) {
            (0, _) => Ok(CallResult::Env(tracked::env_vars(consumer))),
            (1, Arg::Str(key)) => Ok(CallResult::OptStr(tracked::env_var(&key, consumer))),
            _ => invocation.call_original(),
        }
    }
}
