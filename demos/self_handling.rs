//! # Example: self_handling
//!
//! An event that acts as its own first handler, followed by a registered one.
//!
//! ## Flow
//! ```text
//! dispatch_event(ev)
//!     ├─► ev.as_handler() ──► closure (prints, continues)
//!     └─► "registered"    ──► stops
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=trace cargo run --example self_handling
//! ```

use eventvisor::{
    Event, EventDispatcher, EventRef, EventType, HandlerFn, SelfHandlingEvent,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dispatcher = EventDispatcher::new();

    let ev = SelfHandlingEvent::arc(
        None,
        |d: &EventDispatcher, ev: &EventRef| -> anyhow::Result<bool> {
            println!("[self] {} handling {}", d.name(), ev.identity());
            Ok(false)
        },
    );

    // Self-handling events carry a closure type, so register for this exact type.
    dispatcher.add_handler_for(
        0,
        EventType::of_val(ev.as_ref()),
        HandlerFn::arc("registered", |_d: &EventDispatcher, ev: &EventRef| {
            println!("[registered] {}", ev.description());
            Ok(true)
        }),
    );

    let ev: EventRef = ev;
    let stopped = dispatcher.dispatch_event(&ev);
    println!("[main] stopped={stopped}");

    ev.release()?;
    assert!(ev.is_disposed());
    Ok(())
}
