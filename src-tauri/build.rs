//! Build script for the Kanji Lens Tauri app.
//!
//! Generates Tauri's context and capability code. The bundled kanji table
//! is embedded with `include_str!`, so changes to it must trigger a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=resources/kanji_table.json");
    tauri_build::build();
}
