//! # Example: forwarding
//!
//! Two dispatchers bridged by a [`ForwardingHandler`], with a failing handler
//! whose fault is observed as an [`ErrorEvent`].
//!
//! ## Flow
//! ```text
//! front.dispatch_event(ev)
//!     ├─► LogHandler            (prio i32::MIN, logs, continues)
//!     ├─► ForwardingHandler     (prio 0) ──► back.dispatch_event(ev)
//!     │                                          ├─► "flaky" fails ──► ErrorEvent on back
//!     │                                          └─► "store" stops
//!     └─► "audit"               (prio 10, continues)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug cargo run --example forwarding --features logging
//! ```

use std::sync::Arc;

use eventvisor::{
    DispatcherConfig, ErrorEvent, Event, EventDispatcher, EventRef, EventSource,
    ForwardingHandler, LogHandler, SimpleEvent,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let front = EventDispatcher::builder(DispatcherConfig::named("front")?).build();
    let back = EventDispatcher::builder(DispatcherConfig::named("back")?).build();

    front.add_handler::<SimpleEvent>(i32::MIN, LogHandler::arc());
    front.add_handler::<SimpleEvent>(0, ForwardingHandler::arc(&back));
    front.add_fn::<SimpleEvent, _>(10, "audit", |d, ev| {
        println!("[audit] {} saw {}", d.name(), ev.identity());
        Ok(false)
    });

    back.add_fn::<SimpleEvent, _>(0, "flaky", |_d, ev| {
        if ev.note() == Some("poison") {
            anyhow::bail!("refusing poisoned event");
        }
        Ok(false)
    });
    back.add_fn::<SimpleEvent, _>(5, "store", |d, ev| {
        println!("[store] {} stored {:?}", d.name(), ev.note());
        Ok(true)
    });
    back.add_fn::<ErrorEvent, _>(0, "errors", |_d, err| {
        println!("[errors] {}", err.description());
        Ok(true)
    });

    let source = EventSource::new("demo")?;
    for note in ["hello", "poison"] {
        let ev: EventRef = Arc::new(SimpleEvent::new(Some(source.clone())).with_note(note));
        let stopped = front.dispatch_event(&ev);
        println!("[main] {note}: stopped={stopped}");
        ev.release()?;
    }
    Ok(())
}
