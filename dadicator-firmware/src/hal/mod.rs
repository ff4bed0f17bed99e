// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe hinter den Traits aus
// dadicator-core, damit die Logik auf dem Host getestet werden kann.

pub mod lamp_writer;

pub use lamp_writer::GpioLampWriter;
