// GPIO Lamp Writer - drei digitale Ausgänge für Rot, Gelb und Grün
//
// Implementiert den LampWriter-Trait aus dadicator-core.
// Der Mock für Tests liegt in dadicator-tests.

use dadicator_core::{LampError, LampWriter, Light, Switch};
use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};

/// Real Hardware Lamp Writer
///
/// Jede Lampe hängt an einem eigenen GPIO (High = an).
pub struct GpioLampWriter<'a> {
    red: Output<'a>,
    yellow: Output<'a>,
    green: Output<'a>,
}

impl<'a> GpioLampWriter<'a> {
    /// Erstellt einen neuen GpioLampWriter
    ///
    /// Alle Ausgänge starten auf Low, die Lampen sind also beim Boot aus,
    /// noch bevor der erste Sync läuft.
    ///
    /// # Parameter
    /// - `red`, `yellow`, `green`: GPIO Peripherals der drei Lampen
    pub fn new(
        red: impl OutputPin + 'a,
        yellow: impl OutputPin + 'a,
        green: impl OutputPin + 'a,
    ) -> Self {
        Self {
            red: Output::new(red, Level::Low, OutputConfig::default()),
            yellow: Output::new(yellow, Level::Low, OutputConfig::default()),
            green: Output::new(green, Level::Low, OutputConfig::default()),
        }
    }

    fn output(&mut self, light: Light) -> &mut Output<'a> {
        match light {
            Light::Red => &mut self.red,
            Light::Yellow => &mut self.yellow,
            Light::Green => &mut self.green,
        }
    }
}

impl LampWriter for GpioLampWriter<'_> {
    // GPIO-Schreiben kann nicht fehlschlagen, der Result-Typ kommt vom Trait
    fn write(&mut self, light: Light, switch: Switch) -> Result<(), LampError> {
        let level = if switch.is_on() { Level::High } else { Level::Low };
        self.output(light).set_level(level);
        Ok(())
    }
}
