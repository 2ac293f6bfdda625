// Licensed under the Apache-2.0 license

//! Builds the register-map model for a given channel count.
//!
//! Construction order is fixed: control/status, per-channel deskew pairs,
//! polarity, per-channel measurement triples, then the debug block; event
//! interrupts per channel followed by the two fixed interrupts. The
//! downstream compiler assigns addresses by traversal order, so reordering
//! any of these is a breaking change for existing driver code.
//!
//! Each per-channel family is a single parameterized template applied once
//! per channel, keeping the shape defined in one place and the index
//! substitution centralized.

use crate::error::Error;
use crate::model::{Access, Field, FieldKind, Interrupt, Peripheral, Register, Trigger};

/// Build the peripheral description for `channel_count` measurement channels.
///
/// Pure function of its argument: two calls with the same count produce
/// structurally identical models. A zero channel count is rejected; a TDC
/// with no channels has nothing to measure.
pub fn build(channel_count: u32) -> Result<Peripheral, Error> {
    if channel_count == 0 {
        return Err(Error::InvalidConfiguration(
            "channel count must be at least 1".to_string(),
        ));
    }

    let mut registers = vec![control_status_reg()];
    for channel in 0..channel_count {
        registers.push(deskew_reg(channel, Word::High));
        registers.push(deskew_reg(channel, Word::Low));
    }
    registers.push(polarity_reg(channel_count));
    for channel in 0..channel_count {
        registers.push(raw_reg(channel));
        registers.push(measurement_reg(channel, Word::High));
        registers.push(measurement_reg(channel, Word::Low));
    }
    registers.extend(debug_regs());

    let mut interrupts: Vec<Interrupt> = (0..channel_count).map(event_irq).collect();
    interrupts.push(Interrupt {
        name: "Startup calibration done".to_string(),
        description: "Interrupt triggered after the startup calibration is completed."
            .to_string(),
        prefix: "isc".to_string(),
        trigger: Trigger::EdgeRising,
    });
    interrupts.push(Interrupt {
        name: "Coarse counter overflow".to_string(),
        description: "Interrupt triggered when the coarse cycle counter overflows.".to_string(),
        prefix: "icc".to_string(),
        trigger: Trigger::EdgeRising,
    });

    Ok(Peripheral {
        name: "TDC".to_string(),
        description: "Time to digital converter.".to_string(),
        hdl_entity: "tdc_wb".to_string(),
        prefix: "tdc".to_string(),
        registers,
        interrupts,
    })
}

/// Half of a 64-bit quantity split across two 32-bit registers.
#[derive(Clone, Copy)]
enum Word {
    High,
    Low,
}

impl Word {
    /// One-letter form used in register prefixes (`desh3`, `mesl0`).
    fn short(self) -> &'static str {
        match self {
            Word::High => "h",
            Word::Low => "l",
        }
    }

    fn long(self) -> &'static str {
        match self {
            Word::High => "high",
            Word::Low => "low",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Word::High => "High",
            Word::Low => "Low",
        }
    }
}

fn control_status_reg() -> Register {
    Register {
        name: "Control and status".to_string(),
        description: "Control and status.".to_string(),
        prefix: "cs".to_string(),
        fields: vec![
            Field {
                name: "Reset".to_string(),
                prefix: Some("rst".to_string()),
                kind: FieldKind::Monostable,
            },
            Field {
                name: "Ready".to_string(),
                prefix: Some("rdy".to_string()),
                kind: FieldKind::Bit {
                    access: Access::status(),
                },
            },
        ],
    }
}

fn deskew_reg(channel: u32, word: Word) -> Register {
    Register {
        name: format!("Deskew value for channel {channel} ({} word)", word.long()),
        description: format!(
            "A constant value added to all measurements of channel {channel}."
        ),
        prefix: format!("des{}{channel}", word.short()),
        fields: vec![Field {
            name: format!("{} word value", word.title()),
            prefix: None,
            kind: FieldKind::Slv {
                size: 32,
                access: Access::config(),
            },
        }],
    }
}

fn polarity_reg(channel_count: u32) -> Register {
    Register {
        name: "Detected polarities".to_string(),
        description: "A bit vector representing the polarities (rising/falling edges) of the \
                      detected transitions."
            .to_string(),
        prefix: "pol".to_string(),
        fields: vec![Field {
            name: "Value".to_string(),
            prefix: None,
            kind: FieldKind::Slv {
                size: channel_count,
                access: Access::status(),
            },
        }],
    }
}

fn raw_reg(channel: u32) -> Register {
    Register {
        name: format!("Raw measured value for channel {channel}"),
        description: format!("Raw encoded value from the fine delay line for channel {channel}."),
        prefix: format!("raw{channel}"),
        fields: vec![Field {
            name: "Value".to_string(),
            prefix: None,
            kind: FieldKind::Slv {
                size: 32,
                access: Access::status(),
            },
        }],
    }
}

fn measurement_reg(channel: u32, word: Word) -> Register {
    Register {
        name: format!(
            "Fixed point measurement for channel {channel} ({} word)",
            word.long()
        ),
        description: format!("Fully calibrated time stamp for channel {channel}."),
        prefix: format!("mes{}{channel}", word.short()),
        fields: vec![Field {
            name: format!("{} word value", word.title()),
            prefix: None,
            kind: FieldKind::Slv {
                size: 32,
                access: Access::status(),
            },
        }],
    }
}

fn event_irq(channel: u32) -> Interrupt {
    Interrupt {
        name: format!("Event detection {channel}"),
        description: format!(
            "Interrupt triggered when the input signal changes state on channel {channel}."
        ),
        prefix: format!("ie{channel}"),
        trigger: Trigger::EdgeRising,
    }
}

/// The debug-interface block: lookup tables, histograms and the frequency
/// counter, exposed for diagnostics. Shape and order are independent of the
/// channel count.
fn debug_regs() -> Vec<Register> {
    vec![
        Register {
            name: "Debug control".to_string(),
            description: "Controls entering and leaving debug mode.".to_string(),
            prefix: "dctl".to_string(),
            fields: vec![
                Field {
                    name: "Freeze request".to_string(),
                    prefix: Some("req".to_string()),
                    kind: FieldKind::Bit {
                        access: Access::config(),
                    },
                },
                Field {
                    name: "Freeze acknowledgement".to_string(),
                    prefix: Some("ack".to_string()),
                    kind: FieldKind::Bit {
                        access: Access::status(),
                    },
                },
            ],
        },
        Register {
            name: "Channel selection".to_string(),
            description: "Selects the channel the debug interface operates on.".to_string(),
            prefix: "csel".to_string(),
            fields: vec![
                Field {
                    name: "Switch to next channel".to_string(),
                    prefix: Some("next".to_string()),
                    kind: FieldKind::Monostable,
                },
                Field {
                    name: "Last channel reached".to_string(),
                    prefix: Some("last".to_string()),
                    kind: FieldKind::Bit {
                        access: Access::status(),
                    },
                },
            ],
        },
        Register {
            name: "Calibration signal selection".to_string(),
            description: "Forced switch to calibration signal.".to_string(),
            prefix: "cal".to_string(),
            fields: vec![Field {
                name: "Calibration signal select".to_string(),
                prefix: None,
                kind: FieldKind::Bit {
                    access: Access::config(),
                },
            }],
        },
        Register {
            name: "LUT read address".to_string(),
            description: "LUT address to read when debugging.".to_string(),
            prefix: "luta".to_string(),
            fields: vec![Field {
                name: "Address".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 16,
                    access: Access::config(),
                },
            }],
        },
        Register {
            name: "LUT read data".to_string(),
            description: "LUT data readback for debugging.".to_string(),
            prefix: "lutd".to_string(),
            fields: vec![Field {
                name: "Data".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 32,
                    access: Access::status(),
                },
            }],
        },
        Register {
            name: "Histogram read address".to_string(),
            description: "Histogram address to read when debugging.".to_string(),
            prefix: "hisa".to_string(),
            fields: vec![Field {
                name: "Address".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 16,
                    access: Access::config(),
                },
            }],
        },
        Register {
            name: "Histogram read data".to_string(),
            description: "Histogram data readback for debugging.".to_string(),
            prefix: "hisd".to_string(),
            fields: vec![Field {
                name: "Data".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 32,
                    access: Access::status(),
                },
            }],
        },
        Register {
            name: "Frequency counter control and status".to_string(),
            description: "Starts the frequency counter and reports its status for debugging."
                .to_string(),
            prefix: "fcc".to_string(),
            fields: vec![
                Field {
                    name: "Measurement start".to_string(),
                    prefix: Some("st".to_string()),
                    kind: FieldKind::Monostable,
                },
                Field {
                    name: "Measurement ready".to_string(),
                    prefix: Some("rdy".to_string()),
                    kind: FieldKind::Bit {
                        access: Access::status(),
                    },
                },
            ],
        },
        Register {
            name: "Frequency counter current value".to_string(),
            description: "Reports the latest measurement result of the frequency counter for \
                          debugging."
                .to_string(),
            prefix: "fcr".to_string(),
            fields: vec![Field {
                name: "Result".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 32,
                    access: Access::status(),
                },
            }],
        },
        Register {
            name: "Frequency counter stored value".to_string(),
            description: "Reports the latest stored measurement result of the frequency counter \
                          for debugging."
                .to_string(),
            prefix: "fcsr".to_string(),
            fields: vec![Field {
                name: "Result".to_string(),
                prefix: None,
                kind: FieldKind::Slv {
                    size: 32,
                    access: Access::status(),
                },
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessMode;
    use std::collections::HashSet;

    const DEBUG_PREFIXES: [&str; 10] = [
        "dctl", "csel", "cal", "luta", "lutd", "hisa", "hisd", "fcc", "fcr", "fcsr",
    ];

    #[test]
    fn test_rejects_zero_channels() {
        assert!(matches!(build(0), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build(8).unwrap(), build(8).unwrap());
        assert_eq!(build(1).unwrap(), build(1).unwrap());
    }

    #[test]
    fn test_per_channel_families_scale_with_channel_count() {
        for n in [1u32, 2, 5, 8, 16] {
            let p = build(n).unwrap();
            let deskew = p
                .registers
                .iter()
                .filter(|r| r.prefix.starts_with("des"))
                .count();
            assert_eq!(deskew, 2 * n as usize, "deskew registers for n={n}");
            let raw = p
                .registers
                .iter()
                .filter(|r| r.prefix.starts_with("raw"))
                .count();
            assert_eq!(raw, n as usize, "raw registers for n={n}");
            let mes = p
                .registers
                .iter()
                .filter(|r| r.prefix.starts_with("mes"))
                .count();
            assert_eq!(mes, 2 * n as usize, "measurement registers for n={n}");
            let events = p
                .interrupts
                .iter()
                .filter(|i| i.prefix.starts_with("ie"))
                .count();
            assert_eq!(events, n as usize, "event interrupts for n={n}");

            let pol = p.registers.iter().find(|r| r.prefix == "pol").unwrap();
            assert_eq!(
                pol.fields[0].kind,
                FieldKind::Slv {
                    size: n,
                    access: Access::status()
                },
                "polarity width for n={n}"
            );
        }
    }

    #[test]
    fn test_prefixes_are_unique() {
        for n in [1u32, 3, 8, 16] {
            let p = build(n).unwrap();
            let regs: HashSet<_> = p.registers.iter().map(|r| r.prefix.as_str()).collect();
            assert_eq!(regs.len(), p.registers.len(), "register prefixes for n={n}");
            let irqs: HashSet<_> = p.interrupts.iter().map(|i| i.prefix.as_str()).collect();
            assert_eq!(
                irqs.len(),
                p.interrupts.len(),
                "interrupt prefixes for n={n}"
            );
        }
    }

    #[test]
    fn test_non_monostable_fields_have_complementary_access() {
        let p = build(8).unwrap();
        for reg in &p.registers {
            for field in &reg.fields {
                if let Some(access) = field.kind.access() {
                    assert!(
                        access.is_complementary(),
                        "register {} field {}",
                        reg.prefix,
                        field.name
                    );
                    assert_ne!((access.bus, access.dev), (AccessMode::ReadWrite, AccessMode::ReadWrite));
                    assert_ne!((access.bus, access.dev), (AccessMode::ReadOnly, AccessMode::ReadOnly));
                }
            }
        }
    }

    #[test]
    fn test_fixed_blocks_do_not_depend_on_channel_count() {
        let small = build(1).unwrap();
        let large = build(12).unwrap();
        for prefix in ["cs"].iter().chain(DEBUG_PREFIXES.iter()) {
            let a = small.registers.iter().find(|r| r.prefix == *prefix).unwrap();
            let b = large.registers.iter().find(|r| r.prefix == *prefix).unwrap();
            assert_eq!(a, b, "register {prefix}");
        }
        for prefix in ["isc", "icc"] {
            let a = small.interrupts.iter().find(|i| i.prefix == prefix).unwrap();
            let b = large.interrupts.iter().find(|i| i.prefix == prefix).unwrap();
            assert_eq!(a, b, "interrupt {prefix}");
        }
        // The polarity register is always present; only its width varies.
        assert!(small.registers.iter().any(|r| r.prefix == "pol"));
        assert!(large.registers.iter().any(|r| r.prefix == "pol"));
    }

    #[test]
    fn test_two_channel_model_matches_expected_census() {
        let p = build(2).unwrap();
        let prefixes: Vec<_> = p.registers.iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(
            prefixes,
            [
                "cs", "desh0", "desl0", "desh1", "desl1", "pol", "raw0", "mesh0", "mesl0",
                "raw1", "mesh1", "mesl1", "dctl", "csel", "cal", "luta", "lutd", "hisa",
                "hisd", "fcc", "fcr", "fcsr",
            ]
        );
        let irqs: Vec<_> = p.interrupts.iter().map(|i| i.prefix.as_str()).collect();
        assert_eq!(irqs, ["ie0", "ie1", "isc", "icc"]);
    }

    #[test]
    fn test_single_channel_model_uses_index_zero_only() {
        let p = build(1).unwrap();
        assert!(p.registers.iter().any(|r| r.prefix == "desh0"));
        assert!(p.registers.iter().any(|r| r.prefix == "raw0"));
        assert!(p.registers.iter().all(|r| !r.prefix.ends_with('1')));
        assert_eq!(
            p.interrupts
                .iter()
                .filter(|i| i.prefix.starts_with("ie"))
                .count(),
            1
        );
        assert_eq!(p.interrupts[0].prefix, "ie0");
    }

    #[test]
    fn test_channel_index_appears_in_derived_text() {
        let p = build(3).unwrap();
        let desh2 = p.registers.iter().find(|r| r.prefix == "desh2").unwrap();
        assert_eq!(desh2.name, "Deskew value for channel 2 (high word)");
        assert_eq!(
            desh2.description,
            "A constant value added to all measurements of channel 2."
        );
        let ie2 = p.interrupts.iter().find(|i| i.prefix == "ie2").unwrap();
        assert_eq!(ie2.name, "Event detection 2");
        assert_eq!(ie2.trigger, Trigger::EdgeRising);
    }

    #[test]
    fn test_peripheral_identity() {
        let p = build(8).unwrap();
        assert_eq!(p.name, "TDC");
        assert_eq!(p.hdl_entity, "tdc_wb");
        assert_eq!(p.prefix, "tdc");
    }
}
