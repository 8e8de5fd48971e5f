//! Application layer: client lifecycle, probe orchestration and the widget
//! outcome bridge.
//!
//! `ProbeOrchestrator` is the entry point. It owns the `SdkLifecycleManager`,
//! so the readiness gate cannot be bypassed, and routes widget mounts through
//! the `WidgetOutcomeBridge`, whose callbacks publish into the same log bus and
//! result board the probes use.

pub mod bridge;
pub mod lifecycle;
pub mod orchestrator;
