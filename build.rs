fn main() {
    println!("cargo:rerun-if-env-changed=BOILERCTL_CONFIG");

    // Only the ESP-IDF build needs the toolchain environment; host builds
    // (tests, fuzzing) skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
