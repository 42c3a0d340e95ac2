use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PortEntry {
    pub port: String,
    pub purpose: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AddressEntry {
    pub format: String,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LedEntry {
    pub color: String,
    pub meaning: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Muted,
    Critical,
    Warning,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SymbolEntry {
    pub symbol: String,
    pub meaning: String,
    #[serde(default)]
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StatusEntry {
    pub icon: String,
    pub meaning: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServerEntry {
    pub server: String,
    pub note: String,
}

/// Static cheat sheet shown beside the wizard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuickReference {
    pub ports: Vec<PortEntry>,
    pub ips: Vec<AddressEntry>,
    pub leds: Vec<LedEntry>,
    pub ci0: Vec<SymbolEntry>,
    pub remi: Vec<StatusEntry>,
    pub cloud: Vec<ServerEntry>,
    pub support_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedState {
    Steady,
    Blinking,
    Off,
}

impl LedEntry {
    pub fn state(&self) -> LedState {
        if self.color.contains("Green") {
            LedState::Steady
        } else if self.color.contains("Orange") {
            LedState::Blinking
        } else {
            LedState::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let reference: QuickReference =
            serde_json::from_str(r#"{ "ports": [{ "port": "UDP 3838", "purpose": "Discovery" }] }"#)
                .expect("valid reference");
        assert_eq!(reference.ports.len(), 1);
        assert!(reference.leds.is_empty());
        assert_eq!(reference.support_url, None);
    }

    #[test]
    fn led_state_follows_colour_name() {
        let led = |color: &str| LedEntry {
            color: color.to_owned(),
            meaning: String::new(),
        };
        assert_eq!(led("Green (steady)").state(), LedState::Steady);
        assert_eq!(led("Orange (blinking)").state(), LedState::Blinking);
        assert_eq!(led("No LEDs").state(), LedState::Off);
    }
}
