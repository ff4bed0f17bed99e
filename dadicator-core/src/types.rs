//! Core Types für die Ampel-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use rgb::RGB8;

/// Eine der drei Lampen des Panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Light {
    Red,
    Yellow,
    Green,
}

impl Light {
    /// Alle Lampen in Anzeige-Reihenfolge (oben → unten)
    pub const ALL: [Light; 3] = [Light::Red, Light::Yellow, Light::Green];

    /// Pfad-Token der Lampe (`/led/<token>/...`)
    pub fn as_str(self) -> &'static str {
        match self {
            Light::Red => "red",
            Light::Yellow => "yellow",
            Light::Green => "green",
        }
    }

    /// Anzeigename für die HTML-Seite
    pub fn label(self) -> &'static str {
        match self {
            Light::Red => "Red",
            Light::Yellow => "Yellow",
            Light::Green => "Green",
        }
    }

    /// Farbe der leuchtenden Lampe
    pub fn lit_color(self) -> RGB8 {
        match self {
            Light::Red => RGB8 { r: 255, g: 0, b: 0 },
            Light::Yellow => RGB8 { r: 255, g: 200, b: 0 },
            Light::Green => RGB8 { r: 0, g: 200, b: 0 },
        }
    }

    /// Farbe der ausgeschalteten Lampe (auf ein Viertel gedimmt)
    pub fn dimmed_color(self) -> RGB8 {
        let lit = self.lit_color();
        RGB8 {
            r: lit.r / 4,
            g: lit.g / 4,
            b: lit.b / 4,
        }
    }
}

impl<'a> TryFrom<&'a str> for Light {
    type Error = CommandError<'a>;

    /// Exakter, case-sensitiver Vergleich. "Red" oder "RED" sind ungültig.
    fn try_from(token: &'a str) -> Result<Self, Self::Error> {
        match token {
            "red" => Ok(Light::Red),
            "yellow" => Ok(Light::Yellow),
            "green" => Ok(Light::Green),
            _ => Err(CommandError::UnknownLight(token)),
        }
    }
}

/// Schaltzustand einer Lampe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    On,
    #[default]
    Off,
}

impl Switch {
    pub fn as_str(self) -> &'static str {
        match self {
            Switch::On => "on",
            Switch::Off => "off",
        }
    }

    pub fn is_on(self) -> bool {
        self == Switch::On
    }

    /// Gegenteiliger Zustand (Ziel des Toggle-Links)
    pub fn toggled(self) -> Self {
        match self {
            Switch::On => Switch::Off,
            Switch::Off => Switch::On,
        }
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on { Switch::On } else { Switch::Off }
    }
}

impl<'a> TryFrom<&'a str> for Switch {
    type Error = CommandError<'a>;

    fn try_from(token: &'a str) -> Result<Self, Self::Error> {
        match token {
            "on" => Ok(Switch::On),
            "off" => Ok(Switch::Off),
            _ => Err(CommandError::UnknownAction(token)),
        }
    }
}

/// Validiertes Schalt-Kommando (Lampe + Zielzustand)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightCommand {
    pub light: Light,
    pub switch: Switch,
}

impl LightCommand {
    pub fn new(light: Light, switch: Switch) -> Self {
        Self { light, switch }
    }

    /// Parst die beiden Pfad-Segmente eines `/led/{color}/{action}` Requests
    ///
    /// Eine ungültige Lampe wird vor einer ungültigen Aktion gemeldet.
    pub fn parse<'a>(light: &'a str, action: &'a str) -> Result<Self, CommandError<'a>> {
        let light = Light::try_from(light)?;
        let switch = Switch::try_from(action)?;
        Ok(Self { light, switch })
    }

    /// Pfad, der dieses Kommando auslöst
    pub fn path(&self) -> LedPath {
        LedPath(*self)
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turning {} {} led",
            self.switch.as_str(),
            self.light.as_str()
        )
    }
}

/// `Display`-Adapter für `/led/<color>/<action>`
pub struct LedPath(LightCommand);

impl fmt::Display for LedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/led/{}/{}",
            self.0.light.as_str(),
            self.0.switch.as_str()
        )
    }
}

/// Fehler beim Parsen eines Kommandos
///
/// Enthält das abgelehnte Token, damit es auf der Seite angezeigt werden kann.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError<'a> {
    UnknownLight(&'a str),
    UnknownAction(&'a str),
}

impl fmt::Display for CommandError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownLight(token) => {
                write!(f, "Invalid led chosen: {}", Echoed(token))
            }
            CommandError::UnknownAction(token) => write!(f, "Invalid state: {}", Echoed(token)),
        }
    }
}

/// Maximale Anzahl Zeichen eines abgelehnten Tokens in der Statuszeile
///
/// Hält die gerenderte Seite unter `render::MAX_PAGE_LEN`, auch wenn jedes
/// Zeichen beim HTML-Escaping zu einer Entity wird.
pub const MAX_ECHOED_TOKEN_CHARS: usize = 32;

/// Abgelehntes Token, gekürzt auf `MAX_ECHOED_TOKEN_CHARS` Zeichen plus `…`
struct Echoed<'a>(&'a str);

impl fmt::Display for Echoed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.char_indices().nth(MAX_ECHOED_TOKEN_CHARS) {
            Some((cut, _)) => write!(f, "{}…", &self.0[..cut]),
            None => f.write_str(self.0),
        }
    }
}

/// Zustand aller drei Lampen (der "State Store")
///
/// Keine Validierung und kein Hardware-Zugriff: `set` überschreibt
/// bedingungslos, das Schreiben auf die Pins ist ein eigener Schritt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightPanel {
    red: Switch,
    yellow: Switch,
    green: Switch,
}

impl LightPanel {
    /// Alle Lampen aus
    pub const fn new() -> Self {
        Self {
            red: Switch::Off,
            yellow: Switch::Off,
            green: Switch::Off,
        }
    }

    pub fn get(&self, light: Light) -> Switch {
        match light {
            Light::Red => self.red,
            Light::Yellow => self.yellow,
            Light::Green => self.green,
        }
    }

    pub fn set(&mut self, light: Light, switch: Switch) {
        match light {
            Light::Red => self.red = switch,
            Light::Yellow => self.yellow = switch,
            Light::Green => self.green = switch,
        }
    }

    pub fn is_on(&self, light: Light) -> bool {
        self.get(light).is_on()
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus::from(self)
    }
}

/// JSON-Sicht auf den Panel-Zustand (`/status`, `/json_led/...`)
///
/// Flaches Objekt mit drei Booleans, ohne Metadaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelStatus {
    pub red_led: bool,
    pub yellow_led: bool,
    pub green_led: bool,
}

impl From<&LightPanel> for PanelStatus {
    fn from(panel: &LightPanel) -> Self {
        Self {
            red_led: panel.is_on(Light::Red),
            yellow_led: panel.is_on(Light::Yellow),
            green_led: panel.is_on(Light::Green),
        }
    }
}

/// Statuszeile über den Lampen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// Startseite ohne Kommando
    Welcome,
    /// Kommando wurde ausgeführt
    Applied(LightCommand),
    /// Kommando wurde abgelehnt, Zustand unverändert
    Rejected(CommandError<'a>),
}

impl<'a> From<Result<LightCommand, CommandError<'a>>> for Notice<'a> {
    fn from(result: Result<LightCommand, CommandError<'a>>) -> Self {
        match result {
            Ok(command) => Notice::Applied(command),
            Err(error) => Notice::Rejected(error),
        }
    }
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Welcome => f.write_str("welcome"),
            Notice::Applied(command) => command.fmt(f),
            Notice::Rejected(error) => error.fmt(f),
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CommandError::UnknownLight(token) => {
                defmt::write!(fmt, "UnknownLight({})", token)
            }
            CommandError::UnknownAction(token) => {
                defmt::write!(fmt, "UnknownAction({})", token)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LightPanel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LightPanel {{ red: {}, yellow: {}, green: {} }}",
            self.red,
            self.yellow,
            self.green
        )
    }
}
