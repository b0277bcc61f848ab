fn main() {
    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=capabilities");

    // The Tauri context is only generated for the desktop shell; the library
    // and its tests build without a webview toolchain.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
