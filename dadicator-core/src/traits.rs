//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::{Light, Switch};

/// Fehler-Typ für Lampen-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LampError {
    WriteFailed(Light),
}

/// Trait für den Zugriff auf die drei Lampen-Ausgänge
///
/// # Implementierungen
/// - **Production:** GpioLampWriter (drei ESP32 GPIO-Ausgänge)
/// - **Testing:** MockLampWriter (in-memory Mock)
pub trait LampWriter: Send {
    /// Setzt den Ausgang einer Lampe
    ///
    /// # Fehlerbehandlung
    /// Gibt `LampError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, light: Light, switch: Switch) -> Result<(), LampError>;
}
