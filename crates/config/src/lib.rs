// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{anyhow, Context, Result};
use bcm_gpio_core::layout::{GpioLayout, GPIO_OFFSET};
use bcm_gpio_core::startup::PinAction;
use bcm_gpio_core::{Function, Level, Pin};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Soc {
    #[serde(alias = "rpi1", alias = "rpi0")]
    Bcm2835,
    #[serde(alias = "rpi2")]
    Bcm2836,
    #[serde(alias = "rpi3")]
    Bcm2837,
    #[serde(alias = "rpi4")]
    Bcm2711,
}

impl Soc {
    pub fn peripheral_base(self) -> u64 {
        match self {
            Soc::Bcm2835 => 0x2000_0000,
            Soc::Bcm2836 | Soc::Bcm2837 => 0x3F00_0000,
            Soc::Bcm2711 => 0xFE00_0000,
        }
    }

    pub fn layout(self) -> GpioLayout {
        GpioLayout::at(self.peripheral_base() as usize + GPIO_OFFSET)
    }
}

impl std::str::FromStr for Soc {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        serde_yaml::from_str(value.trim()).with_context(|| {
            format!(
                "unsupported SoC '{}'; supported: bcm2835, bcm2836, bcm2837, bcm2711",
                value
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionName {
    #[serde(alias = "in")]
    Input,
    #[serde(alias = "out")]
    Output,
    Alt0,
    Alt1,
    Alt2,
    Alt3,
    Alt4,
    Alt5,
}

impl From<FunctionName> for Function {
    fn from(name: FunctionName) -> Self {
        match name {
            FunctionName::Input => Function::Input,
            FunctionName::Output => Function::Output,
            FunctionName::Alt0 => Function::Alt0,
            FunctionName::Alt1 => Function::Alt1,
            FunctionName::Alt2 => Function::Alt2,
            FunctionName::Alt3 => Function::Alt3,
            FunctionName::Alt4 => Function::Alt4,
            FunctionName::Alt5 => Function::Alt5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelName {
    Low,
    High,
}

impl From<LevelName> for Level {
    fn from(name: LevelName) -> Self {
        match name {
            LevelName::Low => Level::Low,
            LevelName::High => Level::High,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StartupAction {
    pub pin: u8,
    pub function: FunctionName,
    #[serde(default)]
    pub level: Option<LevelName>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub name: String,
    pub soc: Soc,
    /// Overrides the SoC's peripheral base, e.g. for BCM2711 high-peripheral mode.
    #[serde(default)]
    pub peripheral_base: Option<u64>,
    #[serde(default)]
    pub startup: Vec<StartupAction>,
}

impl Default for BoardConfig {
    /// Raspberry Pi 3B+ with the LED on GPIO17 switched on.
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            name: "rpi3b-plus".to_string(),
            soc: Soc::Bcm2837,
            peripheral_base: None,
            startup: vec![StartupAction {
                pin: 17,
                function: FunctionName::Output,
                level: Some(LevelName::High),
            }],
        }
    }
}

impl BoardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board config {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("in {:?}", path))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse Board Config")?;
        if config.schema_version != "1.0" {
            tracing::warn!(
                "Board '{}' uses schema version {}, expected 1.0",
                config.name,
                config.schema_version
            );
        }
        Ok(config)
    }

    pub fn peripheral_base(&self) -> u64 {
        self.peripheral_base
            .unwrap_or_else(|| self.soc.peripheral_base())
    }

    /// GPIO layout at the configured peripheral base. Fails when the block
    /// does not fit in the host address space.
    pub fn layout(&self) -> Result<GpioLayout> {
        let base = self.peripheral_base();
        base.checked_add(GPIO_OFFSET as u64)
            .and_then(|gpio| usize::try_from(gpio).ok())
            .and_then(GpioLayout::try_at)
            .ok_or_else(|| {
                anyhow!(
                    "board '{}': peripheral base {:#x} puts the GPIO block outside the address space",
                    self.name,
                    base
                )
            })
    }

    /// Validated startup actions, in file order.
    pub fn actions(&self) -> Result<Vec<PinAction>> {
        self.startup
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let pin = Pin::new(action.pin).with_context(|| {
                    format!("board '{}': startup action #{}", self.name, i)
                })?;
                Ok(PinAction::new(
                    pin,
                    action.function.into(),
                    action.level.map(Level::from),
                ))
            })
            .collect()
    }
}
