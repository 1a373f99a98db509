//! Configuration access port trait.
//!
//! Adapters hand back raw strings; typed parsing and validation live in
//! `domain::config_validation` so a malformed value is reported, not defaulted.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Comma-separated list, trimmed, empty entries dropped. `None` when the key is absent.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
