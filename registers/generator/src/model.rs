// Licensed under the Apache-2.0 license

//! Data types describing the TDC peripheral's register map.
//!
//! ```text
//! Peripheral
//! ├── registers: Vec<Register>     # bus-addressable units, in address order
//! │   └── fields: Vec<Field>       # bit ranges with per-side permissions
//! └── interrupts: Vec<Interrupt>   # edge-triggered event lines
//! ```
//!
//! The model is built once per generation run by [`crate::builder::build`],
//! traversed once by [`crate::emit::emit`], and discarded. States the
//! external register-map compiler would reject (an `SLV` field without a
//! size, access attributes on a `MONOSTABLE` strobe) are unrepresentable:
//! the size lives inside [`FieldKind::Slv`] and [`FieldKind::Monostable`]
//! carries no access pair.

/// Permission for one side (bus or device) of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

impl AccessMode {
    /// DSL token for this mode.
    pub fn token(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "READ_ONLY",
            AccessMode::ReadWrite => "READ_WRITE",
            AccessMode::WriteOnly => "WRITE_ONLY",
        }
    }
}

/// Bus-side and device-side permissions of a field.
///
/// Exactly one side writes a field; the other side is read-only. The two
/// constructors cover the two directions that occur in the register map,
/// so the builder produces only complementary pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Permission from the software/bus side.
    pub bus: AccessMode,
    /// Permission from the hardware/device side.
    pub dev: AccessMode,
}

impl Access {
    /// Hardware status: the device writes, software reads.
    pub fn status() -> Self {
        Access {
            bus: AccessMode::ReadOnly,
            dev: AccessMode::WriteOnly,
        }
    }

    /// Software configuration: software writes, the device reads.
    pub fn config() -> Self {
        Access {
            bus: AccessMode::ReadWrite,
            dev: AccessMode::ReadOnly,
        }
    }

    /// True if exactly one side may write and the other is read-only.
    pub fn is_complementary(self) -> bool {
        matches!(
            (self.bus, self.dev),
            (
                AccessMode::ReadOnly,
                AccessMode::ReadWrite | AccessMode::WriteOnly
            ) | (
                AccessMode::ReadWrite | AccessMode::WriteOnly,
                AccessMode::ReadOnly
            )
        )
    }
}

/// The shape of a field within a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A single bit.
    Bit { access: Access },
    /// A bit vector of `size` bits.
    Slv { size: u32, access: Access },
    /// A self-clearing strobe: set from the bus side, consumed and
    /// deasserted by the device after one cycle. Carries no explicit
    /// access attributes.
    Monostable,
}

impl FieldKind {
    /// Access attributes, if this kind carries them.
    pub fn access(&self) -> Option<Access> {
        match self {
            FieldKind::Bit { access } | FieldKind::Slv { access, .. } => Some(*access),
            FieldKind::Monostable => None,
        }
    }
}

/// A named bit range within a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Identifier suffix within the register. A register with exactly one
    /// field may omit it; the field then takes over the register's identity.
    pub prefix: Option<String>,
    pub kind: FieldKind,
}

/// A bus-addressable unit of one or more fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    pub description: String,
    /// Identifier suffix, unique within the peripheral.
    pub prefix: String,
    pub fields: Vec<Field>,
}

/// Trigger condition of an interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    EdgeRising,
}

impl Trigger {
    /// DSL token for this trigger.
    pub fn token(self) -> &'static str {
        match self {
            Trigger::EdgeRising => "EDGE_RISING",
        }
    }
}

/// An edge-triggered event line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interrupt {
    pub name: String,
    pub description: String,
    /// Identifier suffix, unique among the peripheral's interrupts.
    pub prefix: String,
    pub trigger: Trigger,
}

/// The root of the description: one bus-addressable peripheral.
///
/// Register and interrupt order is significant; the downstream compiler
/// assigns addresses by traversal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peripheral {
    pub name: String,
    pub description: String,
    /// Name of the generated hardware entity.
    pub hdl_entity: String,
    /// Namespace prefix for all register and field identifiers.
    pub prefix: String,
    pub registers: Vec<Register>,
    pub interrupts: Vec<Interrupt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_constructors_are_complementary() {
        assert!(Access::status().is_complementary());
        assert!(Access::config().is_complementary());
    }

    #[test]
    fn test_is_complementary_rejects_same_side_pairs() {
        let both_write = Access {
            bus: AccessMode::ReadWrite,
            dev: AccessMode::ReadWrite,
        };
        assert!(!both_write.is_complementary());
        let both_read = Access {
            bus: AccessMode::ReadOnly,
            dev: AccessMode::ReadOnly,
        };
        assert!(!both_read.is_complementary());
    }

    #[test]
    fn test_tokens() {
        assert_eq!(AccessMode::ReadOnly.token(), "READ_ONLY");
        assert_eq!(AccessMode::ReadWrite.token(), "READ_WRITE");
        assert_eq!(AccessMode::WriteOnly.token(), "WRITE_ONLY");
        assert_eq!(Trigger::EdgeRising.token(), "EDGE_RISING");
    }

    #[test]
    fn test_monostable_has_no_access() {
        assert_eq!(FieldKind::Monostable.access(), None);
        let bit = FieldKind::Bit {
            access: Access::status(),
        };
        assert_eq!(bit.access(), Some(Access::status()));
    }
}
