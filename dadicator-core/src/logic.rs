//! Pure Business Logic Functions
//!
//! Mutator, Hardware-Sync und der Controller, der beides pro Request
//! zusammenführt. Keine Hardware-Dependencies (testbar!)

use crate::traits::{LampError, LampWriter};
use crate::types::{CommandError, Light, LightCommand, LightPanel, Notice};

/// Validiert ein (Farbe, Aktion)-Paar und setzt die Lampe
///
/// Bei ungültiger Eingabe bleibt der Zustand unverändert (kein Teil-Update).
///
/// # Beispiele
///
/// ```
/// # use dadicator_core::{LightPanel, Light, Switch, apply_request};
/// let mut panel = LightPanel::new();
/// assert!(apply_request(&mut panel, "red", "on").is_ok());
/// assert_eq!(panel.get(Light::Red), Switch::On);
///
/// assert!(apply_request(&mut panel, "purple", "off").is_err());
/// assert_eq!(panel.get(Light::Red), Switch::On);
/// ```
pub fn apply_request<'a>(
    panel: &mut LightPanel,
    light: &'a str,
    action: &'a str,
) -> Result<LightCommand, CommandError<'a>> {
    let command = LightCommand::parse(light, action)?;
    panel.set(command.light, command.switch);
    Ok(command)
}

/// Schreibt alle drei Lampen-Zustände auf die Ausgänge
///
/// Es werden immer alle drei Kanäle geschrieben, nicht nur der geänderte.
/// Schlägt ein Kanal fehl, werden die übrigen trotzdem geschrieben und der
/// erste Fehler zurückgegeben.
pub fn sync_outputs<W: LampWriter>(panel: &LightPanel, writer: &mut W) -> Result<(), LampError> {
    let mut result = Ok(());
    for light in Light::ALL {
        let written = writer.write(light, panel.get(light));
        if result.is_ok() {
            result = written;
        }
    }
    result
}

/// Besitzt den Panel-Zustand und den Lampen-Writer
///
/// Eine Instanz pro Gerät. Die Firmware legt sie einmal beim Boot an und
/// reicht eine Referenz an den HTTP-Task weiter.
pub struct PanelController<W: LampWriter> {
    panel: LightPanel,
    writer: W,
}

impl<W: LampWriter> PanelController<W> {
    /// Erstellt den Controller mit allen Lampen aus
    ///
    /// Die Ausgänge werden erst mit `sync()` geschrieben.
    pub fn new(writer: W) -> Self {
        Self {
            panel: LightPanel::new(),
            writer,
        }
    }

    /// Aktueller Zustand (Kopie, für das Rendering)
    pub fn panel(&self) -> LightPanel {
        self.panel
    }

    /// Setzt die Ausgänge erneut auf den gespeicherten Zustand
    pub fn sync(&mut self) -> Result<(), LampError> {
        sync_outputs(&self.panel, &mut self.writer)
    }

    /// Mutation + Sync für einen `/led/...` oder `/json_led/...` Request
    ///
    /// Der Sync läuft auch bei abgelehnten Kommandos. Ein Sync-Fehler
    /// ändert nichts an der Statuszeile, er wird an den Aufrufer zum
    /// Loggen durchgereicht.
    pub fn handle<'a>(
        &mut self,
        light: &'a str,
        action: &'a str,
    ) -> (Notice<'a>, Result<(), LampError>) {
        let notice = Notice::from(apply_request(&mut self.panel, light, action));
        (notice, self.sync())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Switch;

    struct CountingWriter {
        writes: usize,
    }

    impl LampWriter for CountingWriter {
        fn write(&mut self, _light: Light, _switch: Switch) -> Result<(), LampError> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_apply_request_sets_one_channel() {
        let mut panel = LightPanel::new();
        let command = apply_request(&mut panel, "green", "on").unwrap();
        assert_eq!(command, LightCommand::new(Light::Green, Switch::On));
        assert!(panel.is_on(Light::Green));
        assert!(!panel.is_on(Light::Red));
        assert!(!panel.is_on(Light::Yellow));
    }

    #[test]
    fn test_apply_request_invalid_action_changes_nothing() {
        let mut panel = LightPanel::new();
        panel.set(Light::Red, Switch::On);
        let before = panel;

        let result = apply_request(&mut panel, "red", "blink");
        assert_eq!(result, Err(CommandError::UnknownAction("blink")));
        assert_eq!(panel, before);
    }

    #[test]
    fn test_sync_outputs_writes_all_three() {
        let panel = LightPanel::new();
        let mut writer = CountingWriter { writes: 0 };
        sync_outputs(&panel, &mut writer).unwrap();
        assert_eq!(writer.writes, 3);
    }

    #[test]
    fn test_controller_syncs_on_rejected_command() {
        let mut controller = PanelController::new(CountingWriter { writes: 0 });
        let (notice, synced) = controller.handle("purple", "on");
        assert_eq!(notice, Notice::Rejected(CommandError::UnknownLight("purple")));
        assert!(synced.is_ok());
        assert_eq!(controller.writer().writes, 3);
        assert_eq!(controller.panel(), LightPanel::new());
    }
}
