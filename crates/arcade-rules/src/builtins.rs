//! Built-in launch rules - SINGLE SOURCE OF TRUTH
//!
//! Program names carry the platform executable suffix and runner artifacts
//! the platform dynamic-library suffix, so the same table works against a
//! programs directory populated for the running platform.

use crate::schema::{RuleEntry, RunnerLink, SecondaryRunner};
use crate::template::Template;

/// Executable suffix of the running platform (`.exe` on Windows)
pub const EXE_SUFFIX: &str = std::env::consts::EXE_SUFFIX;

/// Dynamic library suffix of the running platform (`.dll`, `.so`, `.dylib`)
pub const DLL_SUFFIX: &str = std::env::consts::DLL_SUFFIX;

/// Number of built-in rules.
pub const BUILTIN_RULE_COUNT: usize = 12;

/// Id of the built-in secondary runner
pub const RETROARCH: &str = "retroarch";

const PRIMARY_TEMPLATE: &str = r#""{program}" "{file}""#;

/// Returns the built-in secondary runners.
pub fn builtin_runners() -> Vec<SecondaryRunner> {
    vec![SecondaryRunner {
        id: RETROARCH.to_string(),
        program: format!("retroarch{EXE_SUFFIX}"),
        label: "RetroArch".to_string(),
        template: builtin_template(r#""{runner}" -L "{artifact}" "{file}""#),
    }]
}

/// Returns all built-in rules.
///
/// This is the SINGLE SOURCE OF TRUTH for built-in rules.
pub fn builtin_rules() -> Vec<RuleEntry> {
    let all = ["windows", "linux", "macos"];
    let windows = ["windows"];

    vec![
        emulated("nes", "Nintendo Entertainment System", "fceux", "FCEUX", "fceumm_libretro", &windows,
            "A classic NES emulator. On Linux and macOS consider Nestopia or RetroArch."),
        emulated("smc", "Super Nintendo", "snes9x", "Snes9x", "snes9x_libretro", &all,
            "Highly compatible SNES emulator."),
        emulated("sfc", "Super Nintendo", "snes9x", "Snes9x", "snes9x_libretro", &all,
            "Alias for .smc, handled by Snes9x."),
        mgba("gba", "Game Boy Advance"),
        mgba("gbc", "Game Boy Color"),
        mgba("gb", "Game Boy"),
        emulated("md", "Sega Genesis", "gens", "Gens", "genesis_plus_gx_libretro", &windows,
            "Popular Genesis emulator for Windows. The Genesis Plus GX core is highly accurate."),
        emulated("gen", "Sega Genesis", "gens", "Gens", "genesis_plus_gx_libretro", &windows,
            "Alias for .md, handled by Gens."),
        emulated("n64", "Nintendo 64", "project64", "Project64", "mupen64plus_next_libretro", &windows,
            "Well-known N64 emulator for Windows. Mupen64Plus Next is a good alternative core."),
        emulated("ps1", "PlayStation 1", "epsxe", "ePSXe", "pcsx_rearmed_libretro", &all,
            "Versatile PS1 emulator. Requires BIOS files for full functionality."),
        emulated("nds", "Nintendo DS", "desmume", "DeSmuME", "desmume_libretro", &all,
            "Popular Nintendo DS emulator."),
        RuleEntry {
            extension: "exe".to_string(),
            system: "PC".to_string(),
            program: None,
            label: "PC Game".to_string(),
            template: builtin_template(r#""{file}""#),
            runner: None,
            self_executing: true,
            platforms: vec!["windows".to_string()],
            notes: Some("Launches the executable directly. Use with caution for untrusted files.".to_string()),
        },
    ]
}

fn emulated(
    extension: &str,
    system: &str,
    program: &str,
    label: &str,
    core: &str,
    platforms: &[&str],
    notes: &str,
) -> RuleEntry {
    RuleEntry {
        extension: extension.to_string(),
        system: system.to_string(),
        program: Some(format!("{program}{EXE_SUFFIX}")),
        label: label.to_string(),
        template: builtin_template(PRIMARY_TEMPLATE),
        runner: Some(RunnerLink {
            runner: RETROARCH.to_string(),
            artifact: format!("{core}{DLL_SUFFIX}"),
        }),
        self_executing: false,
        platforms: platforms.iter().map(|p| p.to_string()).collect(),
        notes: Some(notes.to_string()),
    }
}

/// mGBA ships as an application bundle on macOS, opened through `open -a`.
fn mgba(extension: &str, system: &str) -> RuleEntry {
    let (program, template) = if cfg!(target_os = "macos") {
        ("mgba/mGBA.app".to_string(), r#"open -a "{program}" --args "{file}""#)
    } else {
        (format!("mgba{EXE_SUFFIX}"), PRIMARY_TEMPLATE)
    };
    RuleEntry {
        program: Some(program),
        template: builtin_template(template),
        notes: Some("Accurate Game Boy family emulator.".to_string()),
        ..emulated(extension, system, "mgba", "mGBA", "mgba_libretro", &["windows", "linux", "macos"], "")
    }
}

fn builtin_template(source: &str) -> Template {
    match Template::parse(source) {
        Ok(template) => template,
        Err(e) => unreachable!("built-in template {source:?} is invalid: {e}"),
    }
}
