//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from the data they show:
//! - `ChatHeader`: persona banner and status line
//! - `MessageBubble`: one message, as a function of (Message, Persona)
//! - `NlpPanel`: the analysis summary of the latest turn
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep presentation state between frames and emit events to their parent:
//! - `InputBox`: text buffer and cursor
//! - `MessageList`: scroll position over the conversation
//! - `PersonaPicker`: selection on the Home view
//!
//! Components receive external data as props (struct fields), never by
//! reaching into the session themselves.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── chat_header.rs     (persona banner)
//! ├── input_box.rs       (text field)
//! ├── message.rs         (single bubble)
//! ├── message_list.rs    (scrollable conversation)
//! ├── nlp_panel.rs       (analysis side panel)
//! └── persona_picker.rs  (Home view list)
//! ```

pub mod chat_header;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod nlp_panel;
pub mod persona_picker;

pub use chat_header::ChatHeader;
pub use input_box::{InputBox, InputEvent};
pub use message::MessageBubble;
pub use message_list::{MessageList, MessageListState};
pub use nlp_panel::NlpPanel;
pub use persona_picker::{PersonaPicker, PersonaPickerState, PickerEvent};
