//! Interception and environment-access tracking for build logic.
//!
//! This crate transparently wraps the environment-sensitive primitives that
//! dynamically-loaded build logic calls (process-wide properties,
//! environment variables, filesystem probes, directory listings, file
//! reads, and process launches) and reports each access to a pluggable
//! listener before or while performing the real operation. Interception is
//! observationally transparent: a wrapped call returns exactly what the
//! unwrapped call would, and failures propagate unaltered.
//!
//! Two cooperating pieces:
//!
//! - the [`listener`] registry: a single process-wide listener slot,
//!   replaceable at any time, read at the moment of every tracked call;
//! - the [`router`] dispatch table: a fixed rule set the call-site
//!   rewriting machinery consults per call site, redirecting matches
//!   through the [`interceptors`] and leaving everything else untouched.
//!
//! Rewritten call sites that know their shape statically can skip the
//! erased dispatch and call the [`tracked`] entry points directly.

pub mod call;
pub mod environ;
pub mod fsops;
pub mod interceptors;
pub mod listener;
pub mod paths;
pub mod props;
pub mod router;
pub mod snapshot;
pub mod spawn;
pub mod tracked;

pub use call::{Arg, CallResult, Encoding, EntryFilter, Invocation, Receiver, TargetType};
pub use interceptors::standard_router;
pub use listener::{
    current_listener, discard_listener, set_listener, AccessEvent, AccessListener, NoopListener,
};
pub use props::{PropValue, PropertyMap, PropertyStore};
pub use router::{Binding, CallInterceptor, CallKind, CallRouter, CallSite, InterceptScope};
pub use snapshot::{TrackedEnv, TrackedProperties};
pub use spawn::CommandSpec;
