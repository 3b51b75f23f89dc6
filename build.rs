fn main() {
    println!("cargo:rerun-if-changed=thermoguard.json");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to link against.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
