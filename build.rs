fn main() {
    // Only the ESP-IDF target needs the IDF environment forwarded to the linker
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
