//! Grapple configuration resource.
//!
//! Holds the tunables of the grappling hook. Defaults are safe to run with;
//! values can be overridden from an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [grapple]
//! max_distance = 100
//! delay = 0.5
//! overshoot = 2
//! traversal_timeout = 1
//! foot_offset = 1
//! layer_mask = 4294967295
//!
//! [cooldown]
//! duration = 2
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::resources::anchorquery::LayerMask;

/// Default values
const DEFAULT_MAX_DISTANCE: f32 = 100.0;
const DEFAULT_DELAY: f32 = 0.5;
const DEFAULT_OVERSHOOT: f32 = 2.0;
const DEFAULT_COOLDOWN: f32 = 2.0;
const DEFAULT_TRAVERSAL_TIMEOUT: f32 = 1.0;
const DEFAULT_FOOT_OFFSET: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./grapple.ini";

/// Grapple tunables.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GrappleConfig {
    /// Maximum length of the sight ray, and distance of the air anchor on a miss.
    pub max_distance: f32,
    /// Seconds between the trigger and the traversal (or abort). Also the
    /// duration of the arc itself.
    pub delay: f32,
    /// Extra height added on top of the anchor when computing the arc peak.
    pub overshoot: f32,
    /// Seconds before another attempt is accepted once an attempt ends.
    pub cooldown: f32,
    /// Hard cap on time spent traversing.
    pub traversal_timeout: f32,
    /// Distance from the player's position down to their feet.
    pub foot_offset: f32,
    /// Layers the hook can attach to.
    pub layer_mask: LayerMask,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GrappleConfig {
    pub fn new() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            delay: DEFAULT_DELAY,
            overshoot: DEFAULT_OVERSHOOT,
            cooldown: DEFAULT_COOLDOWN,
            traversal_timeout: DEFAULT_TRAVERSAL_TIMEOUT,
            foot_offset: DEFAULT_FOOT_OFFSET,
            layer_mask: LayerMask::ALL,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Check that durations and distances make sense.
    ///
    /// Every value must be finite. `delay` and `max_distance` must be
    /// positive, `cooldown` and `traversal_timeout` must not be negative.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("max_distance", self.max_distance),
            ("delay", self.delay),
            ("overshoot", self.overshoot),
            ("cooldown", self.cooldown),
            ("traversal_timeout", self.traversal_timeout),
            ("foot_offset", self.foot_offset),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }
        if self.delay <= 0.0 {
            return Err(format!("delay must be positive, got {}", self.delay));
        }
        if self.max_distance <= 0.0 {
            return Err(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            ));
        }
        if self.cooldown < 0.0 {
            return Err(format!("cooldown must not be negative, got {}", self.cooldown));
        }
        if self.traversal_timeout < 0.0 {
            return Err(format!(
                "traversal_timeout must not be negative, got {}",
                self.traversal_timeout
            ));
        }
        Ok(())
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or the result does not validate; `self` is left
    /// untouched in that case.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let float = |section: &str, key: &str| match config.getfloat(section, key) {
            Ok(value) => value.map(|v| v as f32),
            Err(e) => {
                warn!("Ignoring [{}] {}: {}", section, key, e);
                None
            }
        };

        let mut next = self.clone();

        // [grapple] section
        if let Some(v) = float("grapple", "max_distance") {
            next.max_distance = v;
        }
        if let Some(v) = float("grapple", "delay") {
            next.delay = v;
        }
        if let Some(v) = float("grapple", "overshoot") {
            next.overshoot = v;
        }
        if let Some(v) = float("grapple", "traversal_timeout") {
            next.traversal_timeout = v;
        }
        if let Some(v) = float("grapple", "foot_offset") {
            next.foot_offset = v;
        }
        match config.getuint("grapple", "layer_mask") {
            Ok(Some(mask)) => match u32::try_from(mask) {
                Ok(mask) => next.layer_mask = LayerMask(mask),
                Err(_) => warn!("Ignoring [grapple] layer_mask: {} does not fit in 32 bits", mask),
            },
            Ok(None) => {}
            Err(e) => warn!("Ignoring [grapple] layer_mask: {}", e),
        }

        // [cooldown] section
        if let Some(v) = float("cooldown", "duration") {
            next.cooldown = v;
        }

        next.validate()?;
        *self = next;

        info!(
            "Loaded grapple config: range={}, delay={}s, overshoot={}, cooldown={}s, timeout={}s",
            self.max_distance, self.delay, self.overshoot, self.cooldown, self.traversal_timeout
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [grapple] section
        config.set("grapple", "max_distance", Some(self.max_distance.to_string()));
        config.set("grapple", "delay", Some(self.delay.to_string()));
        config.set("grapple", "overshoot", Some(self.overshoot.to_string()));
        config.set(
            "grapple",
            "traversal_timeout",
            Some(self.traversal_timeout.to_string()),
        );
        config.set("grapple", "foot_offset", Some(self.foot_offset.to_string()));
        config.set("grapple", "layer_mask", Some(self.layer_mask.0.to_string()));

        // [cooldown] section
        config.set("cooldown", "duration", Some(self.cooldown.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved grapple config to {:?}", self.config_path);

        Ok(())
    }
}
