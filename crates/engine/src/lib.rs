//! Task network engine
//!
//! This crate runs the network on top of the lower layers:
//! - Generators: the fast and slow periodic streams, with suspend/resume
//! - Coordinators: capture (pair and record) and lookup (pause and search)
//! - Dispatch: input events routed to the coordinators
//! - Config and bootstrap: `NetworkConfig`, `TaskNetwork`
//!
//! The engine is the only component that knows about threads and the
//! console; stores and the ledger know nothing of either.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capture;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod generator;
pub mod lookup;
pub mod network;
pub mod observer;
pub mod producers;

pub use capture::{CaptureCoordinator, CaptureOutcome};
pub use config::{NetworkConfig, CONFIG_FILE_NAME};
pub use console::{Console, RecordingConsole, StdoutConsole};
pub use dispatch::{
    DispatchStats, EventDispatcher, EventSource, InputEvent, InputMode, KeyMap, LineEventSource,
    ScriptedEventSource, LOOKUP_PROMPT,
};
pub use generator::{
    GeneratorState, PeriodicGenerator, Producer, SuspendGuard, Suspendable, ValueSource,
};
pub use lookup::{LookupCoordinator, LookupOutcome, LookupState, PendingLookup};
pub use network::{NetworkBuilder, TaskNetwork};
pub use observer::{ConsoleEmitter, GeneratorObserver, StoreInserter};
pub use producers::{
    FastGenerator, FastProducer, PairingStore, SlowGenerator, SlowProducer, SlowStore,
};
