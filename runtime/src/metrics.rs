//! Metrics emitted by the Store runtime.
//!
//! The runtime records through the [`metrics`] facade. Nothing is exported
//! unless the application installs a recorder; without one every call is a
//! no-op.
//!
//! # Example
//!
//! ```rust,no_run
//! // After installing a recorder of your choice:
//! unidirection_runtime::metrics::describe_metrics();
//! ```

use metrics::{describe_counter, describe_histogram, Unit};

/// Metric names recorded by the runtime.
///
/// Every store metric carries a `store` label with [`StoreConfig::name`](crate::StoreConfig).
pub mod names {
    /// Actions dispatched into a store
    pub const DISPATCH_TOTAL: &str = "store.dispatch.total";
    /// Time spent inside the reducer
    pub const REDUCER_DURATION_SECONDS: &str = "store.reducer.duration_seconds";
    /// Commands returned by the reducer
    pub const COMMANDS_EMITTED: &str = "store.commands.emitted";
    /// Commands dropped because no subscriber was registered
    pub const COMMANDS_UNOBSERVED: &str = "store.commands.unobserved";
    /// Dispatches through a handle whose store was already dropped
    pub const HANDLE_DROPPED_DISPATCHES: &str = "store.handle.dropped_dispatches";
    /// Actions delivered from a mailbox into a store
    pub const MAILBOX_DELIVERED: &str = "store.mailbox.delivered";
}

/// Register descriptions for all runtime metrics.
///
/// Call once after installing a recorder so exporters can render help text.
pub fn describe_metrics() {
    describe_counter!(
        names::DISPATCH_TOTAL,
        Unit::Count,
        "Total number of actions dispatched into a store"
    );
    describe_histogram!(
        names::REDUCER_DURATION_SECONDS,
        Unit::Seconds,
        "Time taken by the reducer for a single action"
    );
    describe_counter!(
        names::COMMANDS_EMITTED,
        Unit::Count,
        "Total number of commands returned by reducers"
    );
    describe_counter!(
        names::COMMANDS_UNOBSERVED,
        Unit::Count,
        "Commands dropped because the store had no subscriber"
    );
    describe_counter!(
        names::HANDLE_DROPPED_DISPATCHES,
        Unit::Count,
        "Dispatches attempted through a handle after its store was dropped"
    );
    describe_counter!(
        names::MAILBOX_DELIVERED,
        Unit::Count,
        "Actions delivered from a mailbox into a store"
    );
}
