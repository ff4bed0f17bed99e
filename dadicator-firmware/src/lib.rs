// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

// Re-exports von dadicator-core
pub use dadicator_core::{
    LampError, LampWriter, Light, LightPanel, Notice, PanelController, Switch,
};

use crate::hal::GpioLampWriter;

// ============================================================================
// Type-Aliase für den geteilten Panel-Zustand
// ============================================================================
//
// Es gibt genau einen Controller. main() legt ihn in einer StaticCell an und
// reicht die Referenz an den HTTP-Task weiter. Nur dieser Task greift zu,
// daher reicht ein NoopRawMutex (kein Critical Section nötig).

/// Controller mit den echten GPIO-Ausgängen
pub type Panel = PanelController<GpioLampWriter<'static>>;

/// Geteilter Controller für die HTTP-Handler
pub type SharedPanel = Mutex<NoopRawMutex, RefCell<Panel>>;
