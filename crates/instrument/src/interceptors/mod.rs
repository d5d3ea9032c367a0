//! The standard interception rule set.
//!
//! One interceptor per tracked operation family, each performing an
//! explicit, ordered case analysis over the erased argument shapes it
//! understands and delegating everything else to the original call. The
//! full set is registered once into a process-wide router at first use and
//! never mutated.

mod environ;
mod fsio;
mod process;
mod properties;

pub use environ::EnvInterceptor;
pub use fsio::{
    EntryCheckInterceptor, ListEntriesInterceptor, ReadToStringInterceptor, StreamOpenInterceptor,
};
pub use process::{
    ExecuteInterceptor, RunnerExecInterceptor, StartInterceptor, StartPipelineInterceptor,
};
pub use properties::{
    BoolPropertyInterceptor, IntPropertyInterceptor, PropertiesReplaceInterceptor,
    PropertiesSnapshotInterceptor, PropertyReadInterceptor, PropertyRemoveInterceptor,
    PropertyWriteInterceptor,
};

use crate::router::{CallInterceptor, CallRouter};
use once_cell::sync::Lazy;

static STANDARD: Lazy<CallRouter> = Lazy::new(|| CallRouter::new(standard_interceptors()));

/// The process-wide dispatch table with every standard rule registered.
pub fn standard_router() -> &'static CallRouter {
    &STANDARD
}

/// The standard rule set, in registration order.
pub fn standard_interceptors() -> Vec<Box<dyn CallInterceptor>> {
    vec![
        Box::new(PropertyReadInterceptor),
        Box::new(PropertyWriteInterceptor),
        Box::new(PropertiesSnapshotInterceptor),
        Box::new(PropertiesReplaceInterceptor),
        Box::new(PropertyRemoveInterceptor),
        Box::new(IntPropertyInterceptor),
        Box::new(BoolPropertyInterceptor),
        Box::new(EnvInterceptor),
        Box::new(RunnerExecInterceptor),
        Box::new(EntryCheckInterceptor::exists()),
        Box::new(EntryCheckInterceptor::is_file()),
        Box::new(EntryCheckInterceptor::is_dir()),
        Box::new(ListEntriesInterceptor),
        Box::new(ReadToStringInterceptor),
        Box::new(ExecuteInterceptor),
        Box::new(StartInterceptor),
        Box::new(StartPipelineInterceptor),
        Box::new(StreamOpenInterceptor),
    ]
}
