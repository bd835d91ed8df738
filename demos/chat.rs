//! Chat room demo: components talk through one registry without knowing each other.
//!
//! Run with `RUST_LOG=trace cargo run --example chat` to see registry tracing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use event_registry::{DeferredSink, EventRegistry, Listener, LogSink, RegistryConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct ChatMessage {
    from: String,
    text: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let sink = DeferredSink::spawn(Arc::new(LogSink::new()));
    let room: EventRegistry<ChatMessage> = EventRegistry::builder(RegistryConfig::default())
        .with_sink(sink.clone())
        .build();

    // Transcript printer: persistent.
    let printer =
        Listener::new(|m: &ChatMessage| println!("<{}> {}", m.from, m.text)).named("printer");
    room.on("message", printer.clone())?;

    // Greeter: welcomes only the first message, then re-arms itself for the next one.
    let weak = room.downgrade();
    let greeter = Listener::new(move |m: &ChatMessage| {
        println!("* welcome, {}!", m.from);
        if let Some(room) = weak.upgrade() {
            let back = Listener::new(|m: &ChatMessage| println!("* {} is back", m.from));
            if let Err(e) = room.once("joined", back) {
                tracing::warn!(error = %e, "greeter could not re-arm");
            }
        }
    })
    .named("greeter");
    room.once("joined", greeter)?;

    // Moderator: fails on forbidden words; delivery to the printer is unaffected.
    let flagged = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&flagged);
    room.on(
        "message",
        Listener::fallible(move |m: &ChatMessage| {
            if m.text.contains("spam") {
                f.fetch_add(1, Ordering::SeqCst);
                return Err(format!("message from {} flagged", m.from));
            }
            Ok(())
        })
        .named("moderator"),
    )?;

    let say = |from: &str, text: &str| ChatMessage {
        from: from.to_string(),
        text: text.to_string(),
    };

    room.emit("joined", &say("ana", ""));
    room.emit("message", &say("ana", "hi all"));
    room.emit("message", &say("bot", "buy spam now"));
    room.emit("joined", &say("ana", ""));
    room.emit("joined", &say("ana", ""));

    room.off("message", &printer);
    let report = room.emit("message", &say("ana", "anyone here?"));
    println!(
        "last emit: delivered={} failed={} (flagged so far: {})",
        report.delivered,
        report.failed,
        flagged.load(Ordering::SeqCst)
    );

    sink.shutdown().await;
    Ok(())
}
