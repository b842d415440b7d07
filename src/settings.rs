//! Runtime configuration
//!
//! Set once at startup and mutable live through the external `config`
//! message. Nothing here persists across sessions.

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Runtime settings for the game core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Play-field width in pixels (matches the camera canvas)
    pub field_width: f32,
    /// Play-field height in pixels
    pub field_height: f32,
    /// Take wrist positions from the external sensor app instead of the
    /// local pose estimator
    pub use_external_sensors: bool,
    /// Verbose per-frame logging
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            use_external_sensors: false,
            debug_mode: false,
        }
    }
}

impl Settings {
    /// Apply a partial update from the external `config` message.
    ///
    /// Absent fields leave the current value untouched.
    pub fn apply_config(&mut self, use_external_sensors: Option<bool>, debug_mode: Option<bool>) {
        if let Some(external) = use_external_sensors {
            if external != self.use_external_sensors {
                log::info!("config: use_external_sensors -> {external}");
            }
            self.use_external_sensors = external;
        }
        if let Some(debug) = debug_mode {
            if debug != self.debug_mode {
                log::info!("config: debug_mode -> {debug}");
            }
            self.debug_mode = debug;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_config_partial() {
        let mut settings = Settings::default();
        settings.apply_config(Some(true), None);
        assert!(settings.use_external_sensors);
        assert!(!settings.debug_mode);

        // Absent fields leave prior values alone
        settings.apply_config(None, Some(true));
        assert!(settings.use_external_sensors);
        assert!(settings.debug_mode);
    }
}
