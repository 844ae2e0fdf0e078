//! Machine-configuration artifact generation
//!
//! Renders the resolved machine configuration as the Lua table the emulator
//! toolchain's run script loads. Image paths are relative to the package
//! directory, which is the script's working directory inside the container.

use std::fmt::Write;

/// Resolved machine configuration, image files staged beside the artifact
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub ram: Option<RamConfig>,
    pub rom: Option<RomConfig>,
    pub flash_drives: Vec<FlashConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamConfig {
    pub length: String,
    pub image_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomConfig {
    pub bootargs: Option<String>,
    pub image_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashConfig {
    pub start: String,
    pub length: String,
    pub shared: bool,
    pub image_filename: String,
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the configuration as Lua, prefixed by e.g. `return`
pub fn generate_lua_config(config: &MachineConfig, prefix: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {{", prefix);

    if let Some(ram) = &config.ram {
        let _ = writeln!(
            out,
            "  ram = {{ length = {}, image_filename = {} }},",
            ram.length,
            quote(&ram.image_filename)
        );
    }
    if let Some(rom) = &config.rom {
        match &rom.bootargs {
            Some(bootargs) => {
                let _ = writeln!(
                    out,
                    "  rom = {{ bootargs = {}, image_filename = {} }},",
                    quote(bootargs),
                    quote(&rom.image_filename)
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  rom = {{ image_filename = {} }},",
                    quote(&rom.image_filename)
                );
            }
        }
    }
    let _ = writeln!(out, "  flash_drive = {{");
    for drive in &config.flash_drives {
        let _ = writeln!(
            out,
            "    {{ start = {}, length = {}, shared = {}, image_filename = {} }},",
            drive.start,
            drive.length,
            drive.shared,
            quote(&drive.image_filename)
        );
    }
    let _ = writeln!(out, "  }},");
    out.push('}');
    out.push('\n');
    out
}
