//! Shared formatting for the demo commands

use reticular::GroupModule;

/// Private modules still load like any other; this one declares nothing.
pub fn module() -> GroupModule {
    GroupModule::new()
}

/// Upper-cases `text` when `shout` is set
pub fn loudness(text: &str, shout: bool) -> String {
    if shout {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shouting() {
        assert_eq!(loudness("hi", true), "HI");
        assert_eq!(loudness("hi", false), "hi");
    }
}
