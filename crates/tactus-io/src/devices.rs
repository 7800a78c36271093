//! Audio device enumeration.

use crate::{Error, Result};
use cpal::Device;
use cpal::traits::{DeviceTrait, HostTrait};

const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device can record.
    pub is_input: bool,
    /// Whether the device can play.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

impl AudioDevice {
    fn from_input(device: &Device, name: String) -> Self {
        Self {
            name,
            is_input: true,
            is_output: device.default_output_config().is_ok(),
            default_sample_rate: device
                .default_input_config()
                .map(|c| c.sample_rate())
                .unwrap_or(FALLBACK_SAMPLE_RATE),
        }
    }

    fn from_output(device: &Device, name: String) -> Self {
        Self {
            name,
            is_input: device.default_input_config().is_ok(),
            is_output: true,
            default_sample_rate: device
                .default_output_config()
                .map(|c| c.sample_rate())
                .unwrap_or(FALLBACK_SAMPLE_RATE),
        }
    }
}

/// Lists every device on the default host, inputs first.
///
/// A device that both records and plays appears once.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices: Vec<AudioDevice> = Vec::new();

    if let Ok(inputs) = host.input_devices() {
        for device in inputs {
            if let Ok(name) = device_name(&device) {
                devices.push(AudioDevice::from_input(&device, name));
            }
        }
    }

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device)
                && !devices.iter().any(|d| d.name == name)
            {
                devices.push(AudioDevice::from_output(&device, name));
            }
        }
    }

    tracing::debug!(count = devices.len(), "enumerated audio devices");
    Ok(devices)
}

/// Default (input, output) devices of the default host.
pub fn default_device() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();

    let input = host
        .default_input_device()
        .and_then(|d| device_name(&d).ok().map(|name| AudioDevice::from_input(&d, name)));
    let output = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok().map(|name| AudioDevice::from_output(&d, name)));

    Ok((input, output))
}

/// Picks a device from `devices` by index, exact name, or case-insensitive
/// substring, in that order.
pub(crate) fn select_device(devices: Vec<Device>, search: &str, kind: &str) -> Result<Device> {
    if let Ok(index) = search.parse::<usize>() {
        let available = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "{kind} device index {index} (only {available} devices available)"
            ))
        });
    }

    if let Some(exact) = devices
        .iter()
        .position(|d| device_name(d).is_ok_and(|n| n == search))
    {
        return devices.into_iter().nth(exact).ok_or(Error::NoDevice);
    }

    let search_lower = search.to_lowercase();
    let mut matches: Vec<(Device, String)> = devices
        .into_iter()
        .filter_map(|d| {
            let name = device_name(&d).ok()?;
            name.to_lowercase().contains(&search_lower).then_some((d, name))
        })
        .collect();

    if matches.len() > 1 {
        let names: Vec<&str> = matches.iter().map(|(_, n)| n.as_str()).collect();
        tracing::warn!(search, kind, ?names, "several devices match, using the first");
    }
    if matches.is_empty() {
        return Err(Error::DeviceNotFound(format!("no {kind} device matching '{search}'")));
    }
    Ok(matches.swap_remove(0).0)
}
