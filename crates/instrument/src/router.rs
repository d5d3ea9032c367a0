//! The interception dispatch table.
//!
//! A fixed, ordered set of rules is built once at startup. The call-site
//! rewriting machinery asks the table whether a prospective call site
//! matches a rule; on a match the call is redirected through the rule's
//! interceptor, otherwise it proceeds unmodified. Matching is structural
//! (receiver type and operation name) because overload resolution by
//! declared argument type is unavailable to the rewriting machinery; the
//! interceptor itself performs run-time argument inspection and declines
//! anything it does not recognize by delegating to the original call.

use crate::call::{CallResult, Invocation, Receiver, TargetType};
use envtrace_core::Result;
use std::collections::HashMap;
use tracing::debug;

/// The call-site kinds the rewriting machinery distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Method,
    PropertyRead,
    Construction,
}

/// The call-site shapes a rule wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptScope {
    /// Method calls with this name, on any receiver.
    MethodsNamed(&'static str),
    /// Reads of a named property-style accessor.
    ReadsOfPropertiesNamed(&'static str),
    /// Constructions of a specific type.
    ConstructorsOf(TargetType),
}

impl InterceptScope {
    pub fn methods_named(name: &'static str) -> Self {
        InterceptScope::MethodsNamed(name)
    }

    pub fn reads_of_properties_named(name: &'static str) -> Self {
        InterceptScope::ReadsOfPropertiesNamed(name)
    }

    pub fn constructors_of(target: TargetType) -> Self {
        InterceptScope::ConstructorsOf(target)
    }

    fn key(&self) -> RouteKey {
        match self {
            InterceptScope::MethodsNamed(name) => RouteKey {
                kind: CallKind::Method,
                name: (*name).to_string(),
            },
            InterceptScope::ReadsOfPropertiesNamed(name) => RouteKey {
                kind: CallKind::PropertyRead,
                name: (*name).to_string(),
            },
            InterceptScope::ConstructorsOf(target) => RouteKey {
                kind: CallKind::Construction,
                name: target.name().to_string(),
            },
        }
    }
}

/// A prospective call site as the rewriting machinery sees it: the declared
/// receiver type when it is known, the operation name, and the call kind.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub target: Option<TargetType>,
    pub operation: &'a str,
    pub kind: CallKind,
}

impl<'a> CallSite<'a> {
    /// A method call site. `target` is `None` when the declared receiver
    /// type is erased.
    pub fn method(target: Option<TargetType>, operation: &'a str) -> Self {
        Self {
            target,
            operation,
            kind: CallKind::Method,
        }
    }

    /// A property-style accessor read.
    pub fn property_read(target: Option<TargetType>, name: &'a str) -> Self {
        Self {
            target,
            operation: name,
            kind: CallKind::PropertyRead,
        }
    }

    /// A construction site of `target`.
    pub fn construction(target: TargetType) -> Self {
        Self {
            target: Some(target),
            operation: target.name(),
            kind: CallKind::Construction,
        }
    }

    fn key(&self) -> RouteKey {
        RouteKey {
            kind: self.kind,
            name: self.operation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    kind: CallKind,
    name: String,
}

/// Receiver binding flavor of an interception rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Applies to any receiver exposing the operation; the interceptor
    /// re-checks the runtime receiver before acting.
    AnyReceiver,
    /// Applies only when the receiver is the declared type. A mismatched
    /// receiver declines rather than attempting an invalid interpretation.
    Type(TargetType),
}

/// One interception rule: the call-site shapes it binds to and the behavior
/// to run on a match.
pub trait CallInterceptor: Send + Sync {
    /// Call-site shapes this interceptor binds to.
    fn scopes(&self) -> Vec<InterceptScope>;

    /// Receiver binding flavor; defaults to name-bound.
    fn binding(&self) -> Binding {
        Binding::AnyReceiver
    }

    /// Handle a matched call or delegate it to the original operation.
    fn intercept(&self, invocation: Invocation, consumer: &str) -> Result<CallResult>;
}

/// The fixed dispatch table. Immutable once built; lookups need no
/// synchronization.
pub struct CallRouter {
    interceptors: Vec<Box<dyn CallInterceptor>>,
    routes: HashMap<RouteKey, usize>,
}

impl CallRouter {
    /// Build the table from an ordered rule set. When two rules claim the
    /// same scope the earlier registration wins.
    pub fn new(interceptors: Vec<Box<dyn CallInterceptor>>) -> Self {
        let mut routes = HashMap::new();
        for (index, interceptor) in interceptors.iter().enumerate() {
            for scope in interceptor.scopes() {
                let key = scope.key();
                if routes.contains_key(&key) {
                    debug!(scope = ?scope, "interception scope already bound, keeping earlier rule");
                    continue;
                }
                routes.insert(key, index);
            }
        }
        Self {
            interceptors,
            routes,
        }
    }

    /// The interceptor bound to `site`, if any. Type-bound rules only match
    /// when the site's declared target agrees or is erased; in the erased
    /// case the interceptor's own receiver check decides at call time.
    pub fn find(&self, site: &CallSite<'_>) -> Option<&dyn CallInterceptor> {
        let index = *self.routes.get(&site.key())?;
        let interceptor = self.interceptors[index].as_ref();
        match interceptor.binding() {
            Binding::Type(expected) => match site.target {
                Some(declared) if declared != expected => None,
                _ => Some(interceptor),
            },
            Binding::AnyReceiver => Some(interceptor),
        }
    }

    /// Route one call: run the matching interceptor, or perform the
    /// original operation when no rule matches. A type-bound rule handed a
    /// receiver of the wrong runtime type declines here, before its case
    /// analysis runs.
    pub fn dispatch(
        &self,
        site: &CallSite<'_>,
        invocation: Invocation,
        consumer: &str,
    ) -> Result<CallResult> {
        let Some(interceptor) = self.find(site) else {
            return invocation.call_original();
        };

        if let Binding::Type(expected) = interceptor.binding() {
            let matches = matches!(invocation.receiver(), Receiver::Type(t) if *t == expected);
            if !matches {
                debug!(
                    operation = site.operation,
                    "type-bound rule declined unexpected receiver"
                );
                return invocation.call_original();
            }
        }
        interceptor.intercept(invocation, consumer)
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}
