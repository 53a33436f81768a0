//! Operational switch.
//!
//! A single administrator-owned flag. When off, every state-changing entry
//! point is rejected; queries keep working.

use crate::core::{Address, Error, Result};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct OperationalSwitch {
    admin: Address,
    operational: bool,
}

impl OperationalSwitch {
    /// On by default.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            operational: true,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Flip the switch. Returns whether the value changed.
    pub fn set(&mut self, value: bool, caller: Address) -> Result<bool> {
        if caller != self.admin {
            warn!(caller = %caller, "operational status change rejected");
            return Err(Error::Unauthorized(format!(
                "{} is not the administrator",
                caller
            )));
        }
        let changed = self.operational != value;
        self.operational = value;
        if changed {
            info!(operational = value, "operational status changed");
        }
        Ok(changed)
    }

    /// Gate for mutating entry points.
    pub fn ensure_operational(&self) -> Result<()> {
        if self.operational {
            Ok(())
        } else {
            Err(Error::NotOperational)
        }
    }
}
