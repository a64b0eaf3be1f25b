/// Messaging module for Event/Command architecture
///
/// - **Events**: notifications of fade lifecycle (past tense, broadcast)
/// - **Commands**: requests to fade groups or change master volume (imperative)
///
/// ```text
/// ┌─────────┐   Command    ┌────────────┐   Event    ┌───────────┐
/// │  stdin  │ ───────────> │ Controller │ ─────────> │ Event Bus │
/// │ / game  │              │ (tick loop)│            │           │
/// └─────────┘              └────────────┘            └───────────┘
/// ```

pub mod bus;
pub mod commands;
pub mod events;

pub use bus::{EventBus, SubscriberId};
pub use commands::{Command, CommandParseError, CommandResult};
pub use events::Event;
