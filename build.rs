fn main() {
    // ESP-IDF link arguments only matter when building for the device.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
