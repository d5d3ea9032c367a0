//! Interceptors for the process-launch family.
//!
//! Build logic starts processes through several unrelated surfaces: the
//! runner handle's `exec`, the flat-command `execute` (as a static call or
//! extension-style on the command itself), the structured builder's
//! `start`, and the multi-stage `start_pipeline`. Every launch is reported
//! with the joined command line before any process is spawned.

use crate::call::{Arg, CallResult, Invocation, Receiver, TargetType};
use crate::router::{Binding, CallInterceptor, InterceptScope};
use crate::spawn::CommandSpec;
use crate::tracked;
use envtrace_core::Result;

/// Assemble a spec from an erased (command, env, dir) triple. `None` means
/// the shape is not one this layer understands and the call must be
/// delegated.
fn build_spec(command: Option<Arg>, env: Option<Arg>, dir: Option<Arg>) -> Option<CommandSpec> {
    let mut spec = match command? {
        Arg::Str(line) => CommandSpec::from_line(&line),
        Arg::StrList(argv) => CommandSpec::from_argv(argv),
        _ => return None,
    };
    match env {
        None | Some(Arg::Null) => {}
        Some(Arg::StrList(entries)) => spec = spec.with_env(entries),
        Some(_) => return None,
    }
    match dir {
        None | Some(Arg::Null) => {}
        Some(Arg::Path(path)) => spec = spec.with_cwd(path),
        Some(_) => return None,
    }
    Some(spec)
}

/// `exec(command)`, `exec(command, env)`, `exec(command, env, dir)` on the
/// runner handle. Name-bound: `exec` exists on other receivers, so the
/// runtime receiver is re-checked before acting.
pub struct RunnerExecInterceptor;

impl CallInterceptor for RunnerExecInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("exec")]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let argc = invocation.args_len();
        if !(1..=3).contains(&argc) {
            return invocation.call_original();
        }
        if !matches!(invocation.receiver(), Receiver::Value(Arg::Runner)) {
            return invocation.call_original();
        }

        let command = invocation.arg(0).cloned();
        let env = invocation.arg(1).cloned();
        let dir = invocation.arg(2).cloned();
        match build_spec(command, env, dir) {
            Some(spec) => Ok(CallResult::Child(tracked::launch(&spec, consumer)?)),
            None => invocation.call_original(),
        }
    }
}

/// `execute` in both call shapes: a static call on the execute API with
/// the command as the first argument, or extension-style with the command
/// itself as the receiver. Either way the trailing argument count must be
/// exactly 0 or 2 (env, dir); anything else is an unsupported overload and
/// delegates.
pub struct ExecuteInterceptor;

impl CallInterceptor for ExecuteInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("execute")]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let is_static_call = matches!(invocation.receiver(), Receiver::Type(TargetType::Execute));
        // Offset accounts for the command being in the argument list on
        // static calls.
        let command_args_offset = usize::from(is_static_call);
        let Some(trailing) = invocation.args_len().checked_sub(command_args_offset) else {
            return invocation.call_original();
        };
        if trailing != 0 && trailing != 2 {
            return invocation.call_original();
        }

        let command = if is_static_call {
            invocation.arg(0).cloned()
        } else {
            match invocation.receiver() {
                Receiver::Value(arg) => Some(arg.clone()),
                Receiver::Type(_) => None,
            }
        };
        let env = invocation.arg(command_args_offset).cloned();
        let dir = invocation.arg(command_args_offset + 1).cloned();
        match build_spec(command, env, dir) {
            Some(spec) => Ok(CallResult::Child(tracked::launch(&spec, consumer)?)),
            None => invocation.call_original(),
        }
    }
}

/// `start()` on a structured builder value. Name-bound: `start` appears on
/// several unrelated builder-like types.
pub struct StartInterceptor;

impl CallInterceptor for StartInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("start")]
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        if invocation.args_len() == 0 {
            if let Receiver::Value(Arg::Command(spec)) = invocation.receiver() {
                let spec = spec.clone();
                return Ok(CallResult::Child(tracked::launch(&spec, consumer)?));
            }
        }
        invocation.call_original()
    }
}

/// `start_pipeline(stages)` on the builder API type.
pub struct StartPipelineInterceptor;

impl CallInterceptor for StartPipelineInterceptor {
    fn scopes(&self) -> Vec<InterceptScope> {
        vec![InterceptScope::methods_named("start_pipeline")]
    }

    fn binding(&self) -> Binding {
        Binding::Type(TargetType::CommandSpec)
    }

    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult> {
        let stages = invocation.arg(0).cloned();
        match (invocation.args_len(), stages) {
            (1, Some(Arg::CommandList(stages))) => Ok(CallResult::Children(
                tracked::launch_pipeline(&stages, consumer)?,
            )),
            _ => invocation.call_original(),
        }
    }
}
