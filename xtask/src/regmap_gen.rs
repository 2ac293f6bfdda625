// Licensed under the Apache-2.0 license

//! Command to run the register-map generator.

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tdc_registers_generator::{build, emit};

/// Build the model for `channels` channels and emit the DSL to `output`,
/// or to standard output when no path is given.
pub fn generate(channels: u32, output: Option<&Path>) -> Result<()> {
    let peripheral = build(channels)?;

    if let Some(output_path) = output {
        let mut file = std::fs::File::create(output_path)?;
        emit(&peripheral, &mut file)?;
        println!("Output written to: {}", output_path.display());
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        emit(&peripheral, &mut out)?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::generate;
    use tdc_registers_generator::parse;

    #[test]
    fn test_writes_dsl_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tdc.regmap");
        generate(2, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let peripheral = parse(&text).unwrap();
        assert_eq!(peripheral.prefix, "tdc");
        assert_eq!(peripheral.interrupts.len(), 4);
        assert!(peripheral.registers.iter().any(|r| r.prefix == "desh1"));
    }

    #[test]
    fn test_rejects_zero_channels() {
        assert!(generate(0, None).is_err());
    }
}
