//! Dadicator Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Typen, Traits, Pure Functions und die Paket-Codecs
//! für den Captive Portal (DHCP/DNS).

#![no_std]

pub mod dhcp;
pub mod dns;
pub mod logic;
pub mod render;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use logic::{PanelController, apply_request, sync_outputs};
pub use render::{MAX_PAGE_LEN, render_html};
pub use traits::{LampError, LampWriter};
pub use types::{
    CommandError, Light, LightCommand, LightPanel, MAX_ECHOED_TOKEN_CHARS, Notice, PanelStatus,
    Switch,
};
