//! Configuration access port.

/// Lookups over `[section] key = value` settings. Missing or unparseable
/// integers fall back to `default`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
}
