// Licensed under the Apache-2.0 license

//! Serializes a peripheral model into the register-map compiler's DSL.
//!
//! One depth-first pass: the peripheral's attributes, then every register
//! with its fields, then every interrupt. Four spaces of indentation per
//! nesting level, every block terminated with `};`. The emitter performs no
//! validation of its own; the model types already rule out anything the
//! external compiler would reject. A write failure from the sink is
//! returned to the caller unmodified.

use crate::model::{Access, Field, FieldKind, Interrupt, Peripheral, Register};
use std::io::{self, Write};

/// Write the DSL block for `peripheral` to `out`.
pub fn emit(peripheral: &Peripheral, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "peripheral {{")?;
    writeln!(out, "    name = \"{}\";", peripheral.name)?;
    writeln!(out, "    description = \"{}\";", peripheral.description)?;
    writeln!(out, "    hdl_entity = \"{}\";", peripheral.hdl_entity)?;
    writeln!(out, "    prefix = \"{}\";", peripheral.prefix)?;
    for reg in &peripheral.registers {
        writeln!(out)?;
        emit_register(reg, out)?;
    }
    for irq in &peripheral.interrupts {
        writeln!(out)?;
        emit_interrupt(irq, out)?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

/// Render the DSL for `peripheral` into a string.
pub fn emit_to_string(peripheral: &Peripheral) -> String {
    let mut buf = Vec::new();
    emit(peripheral, &mut buf).expect("writes to a Vec cannot fail");
    String::from_utf8(buf).expect("emitted DSL is valid UTF-8")
}

fn emit_register(reg: &Register, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "    reg {{")?;
    writeln!(out, "        name = \"{}\";", reg.name)?;
    writeln!(out, "        description = \"{}\";", reg.description)?;
    writeln!(out, "        prefix = \"{}\";", reg.prefix)?;
    for field in &reg.fields {
        writeln!(out)?;
        emit_field(field, out)?;
    }
    writeln!(out, "    }};")?;
    Ok(())
}

fn emit_field(field: &Field, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "        field {{")?;
    writeln!(out, "            name = \"{}\";", field.name)?;
    if let Some(prefix) = &field.prefix {
        writeln!(out, "            prefix = \"{}\";", prefix)?;
    }
    match &field.kind {
        FieldKind::Bit { access } => {
            writeln!(out, "            type = BIT;")?;
            emit_access(*access, out)?;
        }
        FieldKind::Slv { size, access } => {
            writeln!(out, "            type = SLV;")?;
            writeln!(out, "            size = {};", size)?;
            emit_access(*access, out)?;
        }
        FieldKind::Monostable => {
            writeln!(out, "            type = MONOSTABLE;")?;
        }
    }
    writeln!(out, "        }};")?;
    Ok(())
}

fn emit_access(access: Access, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "            access_bus = {};", access.bus.token())?;
    writeln!(out, "            access_dev = {};", access.dev.token())?;
    Ok(())
}

fn emit_interrupt(irq: &Interrupt, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "    irq {{")?;
    writeln!(out, "        name = \"{}\";", irq.name)?;
    writeln!(out, "        description = \"{}\";", irq.description)?;
    writeln!(out, "        prefix = \"{}\";", irq.prefix)?;
    writeln!(out, "        trigger = {};", irq.trigger.token())?;
    writeln!(out, "    }};")?;
    Ok(())
}
