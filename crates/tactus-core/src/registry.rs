//! Name → cell registry with single-owner claiming.
//!
//! Parameters are declared once, up front, and then claimed by the stage that
//! reads them. The registry owns the cells; stages and the router hold
//! `Arc` clones. Because claiming happens while the processing chain is being
//! built, a stage that asks for an undeclared parameter or a parameter another
//! stage already owns fails construction instead of silently sharing a cell.
//!
//! ```rust
//! use tactus_core::{ParamRegistry, RegistryError, PITCH};
//!
//! let mut registry = ParamRegistry::with_defaults();
//! registry.claim(PITCH, "stretch").unwrap();
//!
//! let err = registry.claim(PITCH, "other").unwrap_err();
//! assert_eq!(err, RegistryError::AlreadyClaimed { name: "pitch", owner: "stretch" });
//! ```

#[cfg(not(feature = "std"))]
use alloc::{
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
#[cfg(feature = "std")]
use std::sync::Arc;

use core::fmt;

use crate::param::ParamCell;
use crate::param_info::ParamDescriptor;

/// Output level of the gain stage.
pub const GAIN_LEVEL: &str = "gainLevel";
/// Pitch control of the stretch stage.
pub const PITCH: &str = "pitch";
/// Tempo control of the stretch stage.
pub const TEMPO: &str = "tempo";
/// Cutoff frequency of the low-pass stage.
pub const LOWPASS_CUTOFF: &str = "lpfc";

/// Errors raised while declaring or claiming parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A parameter with this name was already declared.
    DuplicateDeclaration(&'static str),
    /// No parameter with this name has been declared.
    Undeclared(String),
    /// The parameter is already owned by another stage.
    AlreadyClaimed {
        /// Parameter name.
        name: &'static str,
        /// Stage that owns it.
        owner: &'static str,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDeclaration(name) => write!(f, "parameter '{name}' declared twice"),
            Self::Undeclared(name) => write!(f, "parameter '{name}' is not declared"),
            Self::AlreadyClaimed { name, owner } => {
                write!(f, "parameter '{name}' is already owned by stage '{owner}'")
            }
        }
    }
}

impl core::error::Error for RegistryError {}

#[derive(Debug)]
struct Entry {
    cell: Arc<ParamCell>,
    owner: Option<&'static str>,
}

/// Owns every parameter cell of an instrument.
#[derive(Debug, Default)]
pub struct ParamRegistry {
    entries: Vec<Entry>,
}

impl ParamRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the four instrument parameters
    /// (`gainLevel`, `pitch`, `tempo`, `lpfc`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for desc in [
            ParamDescriptor::gain_level(),
            ParamDescriptor::pitch(),
            ParamDescriptor::tempo(),
            ParamDescriptor::lowpass_cutoff(),
        ] {
            // Names are distinct constants; declaration cannot collide.
            let _ = registry.declare(desc);
        }
        registry
    }

    /// Declares a new parameter and returns its cell.
    pub fn declare(&mut self, descriptor: ParamDescriptor) -> Result<Arc<ParamCell>, RegistryError> {
        if self.position(descriptor.name).is_some() {
            return Err(RegistryError::DuplicateDeclaration(descriptor.name));
        }
        let cell = Arc::new(ParamCell::new(descriptor));
        self.entries.push(Entry {
            cell: Arc::clone(&cell),
            owner: None,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(name = descriptor.name, min = descriptor.min, max = descriptor.max, "parameter declared");
        Ok(cell)
    }

    /// Claims a declared parameter for `stage`.
    ///
    /// Each parameter can be claimed exactly once.
    pub fn claim(&mut self, name: &str, stage: &'static str) -> Result<Arc<ParamCell>, RegistryError> {
        let index = self
            .position(name)
            .ok_or_else(|| RegistryError::Undeclared(name.to_string()))?;
        let entry = &mut self.entries[index];
        if let Some(owner) = entry.owner {
            return Err(RegistryError::AlreadyClaimed {
                name: entry.cell.name(),
                owner,
            });
        }
        entry.owner = Some(stage);
        #[cfg(feature = "tracing")]
        tracing::debug!(name, stage, "parameter claimed");
        Ok(Arc::clone(&entry.cell))
    }

    /// Looks up a cell by name without claiming it.
    pub fn get(&self, name: &str) -> Option<&Arc<ParamCell>> {
        self.position(name).map(|i| &self.entries[i].cell)
    }

    /// Descriptor of a declared parameter.
    pub fn descriptor(&self, name: &str) -> Option<&ParamDescriptor> {
        self.get(name).map(|cell| cell.descriptor())
    }

    /// Stage that owns the parameter, if any.
    pub fn owner(&self, name: &str) -> Option<&'static str> {
        self.position(name).and_then(|i| self.entries[i].owner)
    }

    /// True when no stage reads this parameter.
    ///
    /// Writes to an unclaimed parameter are retained but have no audible effect.
    pub fn is_unclaimed(&self, name: &str) -> bool {
        self.position(name).is_some_and(|i| self.entries[i].owner.is_none())
    }

    /// Iterates over all cells in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ParamCell>> {
        self.entries.iter().map(|e| &e.cell)
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resets every cell to its default.
    pub fn reset_all(&self) {
        for entry in &self.entries {
            entry.cell.reset();
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.cell.name() == name)
    }
}
